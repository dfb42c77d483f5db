pub mod api;
pub mod app;
pub mod config;
pub mod diff;
pub mod error;
pub mod intake;
pub mod session;
pub mod store;
pub mod terminal;
pub mod transport;
pub mod types;
pub mod ui;
pub mod util;

#[cfg(test)]
pub mod test_support;
