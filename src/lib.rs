pub mod check;
pub mod config;
pub mod error;
pub mod export;
pub mod key;
pub mod profiling;

// Re-exports
pub use check::{check_file, check_unique, Report};
pub use export::DiffExport;
pub use profiling::Profile;
