use coindeck::{apis::CoinGecko, AnyError, Coindeck};

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Warn)
        .env()
        .with_utc_timestamps()
        .init()
        .unwrap();

    Coindeck::default().run(CoinGecko::new()).await
}
