pub(crate) mod fs;

// Public API - utilities used by commands
pub use fs::shorten_path;
