// Utility functions

pub mod logger;

pub use logger::{init_file_logger, init_stderr_logger};
