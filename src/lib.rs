pub mod analysis;
pub mod app;
pub mod calendar;
pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod keywords;
pub mod models;
pub mod session;
pub mod state;
pub mod stats;
pub mod toggle;
pub mod ui;

pub use app::router;
pub use client::ApiClient;
pub use config::Config;
pub use state::AppState;
