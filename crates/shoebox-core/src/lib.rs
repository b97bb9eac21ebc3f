pub mod config;
pub mod error;

pub use config::ShoeboxConfig;
pub use error::{ShoeboxError, ShoeboxResult};
