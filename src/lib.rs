pub mod config;
pub mod env;
pub mod error;
pub mod pipeline;
pub mod render;

pub use config::BuildConfig;
pub use error::BuildError;
