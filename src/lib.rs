pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod importer;
pub mod uploads;
pub mod utils;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
pub use importer::{ImageOutcome, ImportError, ImportReport, Importer, NormalizedRecipe};
