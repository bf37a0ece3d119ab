// All splitting logic is in splitter-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod config_locator;
pub mod logging;
pub mod output;

// Re-export core types for convenience
pub use splitter_core::*;

// Re-export CLI utilities
pub use config_locator::{load_config, locate_config, ConfigSource};
pub use output::{output_path, write_outputs};
