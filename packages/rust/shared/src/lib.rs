//! Shared types, error model, and configuration for menuforge.
//!
//! This crate is the foundation depended on by all other menuforge crates.
//! It provides:
//! - [`MenuforgeError`] — the unified error type
//! - Domain types ([`MenuItem`], [`MenuMap`], [`MenuBuilder`], [`ArticleIndex`])
//! - Configuration ([`AppConfig`], [`GenerateConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, GenerateConfig, ListingOrder, OutputConfig, PathsConfig, ScanConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from, local_config_path,
};
pub use error::{MenuforgeError, Result};
pub use types::{ArticleIndex, ArticleKey, MenuBuilder, MenuItem, MenuKey, MenuMap};
