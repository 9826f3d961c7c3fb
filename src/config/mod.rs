//! Configuration module.
//!
//! Settings come from a TOML file, the environment and command-line flags,
//! resolved by [`loader::resolve`]. Key bindings translate terminal key
//! events into [`GridAction`](crate::model::GridAction)s.

pub mod keybindings;
pub mod loader;

pub use keybindings::KeyBindings;
pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, resolve, CliOverrides,
    ConfigError, ConfigFile, ResolvedConfig, CONFIG_ENV, PAGE_SIZE_ENV,
};
