pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod release;
pub mod updater;
pub mod version_file;

pub use error::UpdateError;
