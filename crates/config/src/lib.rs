//! Configuration loading for the meishi bot.
//!
//! Config files: `meishi.toml`, `meishi.yaml`, or `meishi.json`,
//! searched in `./` then the platform config dir. String values support
//! `${ENV_VAR}` substitution, and the two channel secrets fall back to
//! dedicated environment variables.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::{Error, Result},
    loader::{
        ENV_CHANNEL_SECRET, ENV_CHANNEL_TOKEN, apply_env_overrides, discover_and_load, load_config,
    },
    schema::{
        GithubCard, LineConfig, MediaConfig, MeishiConfig, ProfileCard, ProfileConfig,
        ServerConfig,
    },
};
