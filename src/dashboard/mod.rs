//! Refresh controller and the state it exposes to the presentation layer

pub mod controller;
pub mod fetcher;
pub mod state;

#[cfg(test)]
mod tests;

pub use controller::{CycleOutcome, RefreshController};
pub use fetcher::{validate_series, FetchError, SeriesFetcher, TokenTarget};
pub use state::{DashboardSnapshot, DashboardState};
