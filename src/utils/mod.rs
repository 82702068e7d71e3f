//! Cross-cutting utilities: path containment, directory helpers and progress bars.

pub mod fs;
pub mod progress;

pub use fs::{ensure_dir, ensure_parent_dir, join_within, normalize_relative};
pub use progress::ProgressBar;
