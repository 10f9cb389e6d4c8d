pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod rate_limit;
pub mod sanitize;
pub mod server;

pub use error::{Error, Result};
