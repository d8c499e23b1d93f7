pub mod app_state;
pub mod config;
pub mod database;
pub mod http;
pub mod live_metadata;
pub mod logging;
pub mod migrations;
pub mod programs;
pub mod schedule;
pub mod seed;
pub mod stations;

pub use app_state::AppState;
pub use http::build_router;
