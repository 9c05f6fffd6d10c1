//! Screening universes.
//!
//! A universe is the list of tickers a screen scores. Business models with a
//! curated peer group come with a default universe; the others take their
//! tickers from the data source.

pub mod curated;

pub use curated::BusinessModelUniverse;

/// Trait for stock universes.
pub trait Universe {
    /// Get all symbols in the universe.
    fn symbols(&self) -> Vec<String>;

    /// Check if a symbol is in the universe.
    fn contains(&self, symbol: &str) -> bool {
        self.symbols().iter().any(|s| s == symbol)
    }

    /// Get the number of constituents.
    fn size(&self) -> usize {
        self.symbols().len()
    }
}

impl Universe for BusinessModelUniverse {
    fn symbols(&self) -> Vec<String> {
        self.tickers().to_vec()
    }

    fn contains(&self, symbol: &str) -> bool {
        self.tickers().iter().any(|s| s == symbol)
    }
}

impl Universe for Vec<String> {
    fn symbols(&self) -> Vec<String> {
        self.clone()
    }
}
