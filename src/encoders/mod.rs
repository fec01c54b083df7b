pub mod algorithms;
pub mod streaming;
pub mod transcoder;

// Re-export commonly used items
pub use algorithms::{chunked, padding};
