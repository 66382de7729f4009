pub mod config;
pub mod intent;
pub mod meeting;
pub mod taxonomy;

pub use config::Config;
