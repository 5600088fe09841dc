pub mod app;
pub mod catalog;
pub mod config;
pub mod entries;
pub mod errors;
pub mod form;
pub mod handlers;
pub mod models;
pub mod reminder;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod state;

pub use app::router;
pub use config::Config;
pub use state::{AppState, Session};
pub use storage::{FileStore, KeyValueStore};
