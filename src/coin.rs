use once_cell::sync::Lazy;
use std::{collections::HashSet, fmt, sync::Mutex};

// Flyweight pattern
// Leaks memory if and only if no name with the same spelling exists.
// This allows us to pass identifiers around as static strs, which in turn
// enables implementing Copy.
fn intern<R: AsRef<str>>(name: R) -> &'static str {
    static SET: Lazy<Mutex<HashSet<&'static str>>> = Lazy::new(|| Mutex::new(HashSet::new()));
    let mut set = SET.lock().unwrap();
    if !set.contains(name.as_ref()) {
        let leaked: &'static str = Box::leak(name.as_ref().to_owned().into_boxed_str());
        set.insert(leaked);
    }

    *set.get(name.as_ref()).unwrap()
}

/// A coin identifier as used by the upstream API, e.g. `bitcoin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoinId(&'static str);

impl CoinId {
    pub fn new<R: AsRef<str>>(id: R) -> Self {
        CoinId(intern(id))
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The quote currency all amounts are expressed in, e.g. `usd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Currency(&'static str);

impl Currency {
    pub fn new<R: AsRef<str>>(code: R) -> Self {
        Currency(intern(code))
    }

    pub fn usd() -> Self {
        Currency::new("usd")
    }

    /// Uppercase form for axis titles and the status line.
    pub fn label(&self) -> String {
        self.0.to_uppercase()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation() {
        let coin1 = CoinId::new("bitcoin");
        let coin2 = CoinId::new("bitcoin");
        let coin3 = CoinId::new("ethereum");
        assert!(std::ptr::eq(coin1.0, coin2.0));
        assert!(!std::ptr::eq(coin1.0, coin3.0));
    }

    #[test]
    fn currency_label() {
        assert_eq!(Currency::usd().label(), "USD");
        assert_eq!(Currency::new("eur").to_string(), "eur");
    }
}
