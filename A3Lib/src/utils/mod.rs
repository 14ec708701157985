//! Utility functions

pub mod path;

pub use path::{ProjectRoot, normalize_internal, normalize_path, relative_path};
