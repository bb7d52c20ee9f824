//! Configuration model for tplsync.
//!
//! This module defines the Config struct that represents `tplsync.yaml` at the
//! repository root. The file is optional: without it the built-in layout
//! (`template/` sources, README and CI workflow outputs) is used. Unknown
//! fields are ignored and missing fields fall back to defaults.

mod model;
mod operations;


pub use model::{CONFIG_FILE_NAME, Config, DEFAULT_ENV_FILE, DEFAULT_TEMPLATE_DIR};
