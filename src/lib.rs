#![deny(unused_must_use)]
#![deny(unsafe_code)]
#![allow(clippy::new_without_default)]

pub mod apis;
mod candle;
pub mod charts;
mod coin;
mod dashboard;
mod history;
mod ranking;
pub mod transform;

use std::io;

pub use candle::*;
pub use coin::*;
pub use dashboard::*;
pub use history::*;
pub use ranking::*;
pub use transform::VolumeShare;

use apis::Api;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::{backend::CrosstermBackend, Terminal};

/// Entry point and defaults of a dashboard session.
pub struct Coindeck {
    pub currency: Currency,
    pub days: u32,
    pub top: usize,
}

impl Default for Coindeck {
    fn default() -> Self {
        Coindeck {
            currency: Currency::usd(),
            days: 30,
            top: 5,
        }
    }
}

impl Coindeck {
    /// Take over the terminal and run the dashboard until the user quits.
    pub async fn run<A: Api>(self, api: A) -> Result<(), AnyError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let result = Dashboard::new(api, self.currency, self.days, self.top)
            .run(&mut terminal)
            .await;

        disable_raw_mode()?;
        crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }
}
