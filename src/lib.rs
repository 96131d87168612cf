pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod navigation;
pub mod session;
pub mod store;
pub mod sync;

pub use app::ClientApp;
pub use error::{BootError, ClientError};
