/// Command-line parsing and batch processing
pub mod cli;
/// Defaults and limits
pub mod configuration;
/// Error types
pub mod error;
/// PNG loading and export
pub mod image;
/// Progress bars for batch runs
pub mod progress;
