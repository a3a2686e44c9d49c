//! Configuration loading, validation, and env substitution.
//!
//! Config files: `drape.toml`, `drape.yaml`, or `drape.json`
//! Searched in `./` then `~/.config/drape/`.
//!
//! Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod template;
pub mod validate;

pub use {
    loader::{config_dir, discover_and_load, find_config_file, load_config, load_or_discover},
    schema::{ClassifierConfig, DatabaseConfig, DrapeConfig, RoutingConfig},
    template::default_config_template,
    validate::{Diagnostic, Severity, has_errors, validate},
};
