pub mod cache;
pub mod normalizer;
pub mod series;
pub mod yahoo;

// Re-export the core data types for convenient access (e.g. `use crate::market_data::TimeSeries`).
pub use cache::{SeriesCache, SeriesKey};
pub use normalizer::normalize;
pub use series::TimeSeries;
pub use yahoo::YahooClient;
