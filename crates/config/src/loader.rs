use std::path::{Path, PathBuf};

use {
    secrecy::{ExposeSecret, Secret},
    tracing::{debug, info, warn},
};

use crate::{
    env_subst::substitute_env,
    error::{Error, Result},
    schema::MeishiConfig,
};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["meishi.toml", "meishi.yaml", "meishi.yml", "meishi.json"];

/// Environment fallback for `line.channel_secret`.
pub const ENV_CHANNEL_SECRET: &str = "MEISHI_CHANNEL_SECRET";
/// Environment fallback for `line.channel_token`.
pub const ENV_CHANNEL_TOKEN: &str = "MEISHI_CHANNEL_TOKEN";

/// Load config from an explicit path (any supported format).
pub fn load_config(path: &Path) -> Result<MeishiConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::io(path, source))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order: `./meishi.{toml,yaml,yml,json}`, then the same names
/// under the platform config dir. A missing file is not an error; the
/// defaults boot a bot that can decode webhooks but not reply.
pub fn discover_and_load() -> MeishiConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        info!("no config file found, using defaults");
    }
    MeishiConfig::default()
}

/// Fill in channel secrets from the environment when the config file
/// left them empty.
pub fn apply_env_overrides(config: &mut MeishiConfig) {
    apply_env_overrides_with(config, |name| std::env::var(name).ok());
}

fn apply_env_overrides_with(config: &mut MeishiConfig, lookup: impl Fn(&str) -> Option<String>) {
    if config.line.channel_secret.expose_secret().is_empty()
        && let Some(value) = lookup(ENV_CHANNEL_SECRET)
    {
        config.line.channel_secret = Secret::new(value);
    }
    if config.line.channel_token.expose_secret().is_empty()
        && let Some(value) = lookup(ENV_CHANNEL_TOKEN)
    {
        config.line.channel_token = Secret::new(value);
    }
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    if let Some(dirs) = directories::ProjectDirs::from("", "", "meishi") {
        let config_dir = dirs.config_dir();
        for name in CONFIG_FILENAMES {
            let p = config_dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

fn parse_config(raw: &str, path: &Path) -> Result<MeishiConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => toml::from_str(raw).map_err(|e| Error::parse(path, e)),
        "yaml" | "yml" => serde_yaml::from_str(raw).map_err(|e| Error::parse(path, e)),
        "json" => serde_json::from_str(raw).map_err(|e| Error::parse(path, e)),
        _ => Err(Error::unsupported_format(ext)),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "meishi.toml", "[server]\nport = 9000\n");
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.server.port, 9000);
    }

    #[test]
    fn loads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "meishi.yaml", "server:\n  port: 9001\n");
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.server.port, 9001);
    }

    #[test]
    fn loads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "meishi.json", r#"{"server": {"port": 9002}}"#);
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.server.port, 9002);
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "meishi.ini", "port=1");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_config(Path::new("/nonexistent/meishi.toml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "meishi.toml", "server = not toml");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn env_overrides_fill_empty_secrets() {
        let mut cfg = MeishiConfig::default();
        apply_env_overrides_with(&mut cfg, |name| match name {
            ENV_CHANNEL_SECRET => Some("env-secret".into()),
            ENV_CHANNEL_TOKEN => Some("env-token".into()),
            _ => None,
        });
        assert_eq!(cfg.line.channel_secret.expose_secret(), "env-secret");
        assert_eq!(cfg.line.channel_token.expose_secret(), "env-token");
    }

    #[test]
    fn env_overrides_never_clobber_file_values() {
        let mut cfg = MeishiConfig::default();
        cfg.line.channel_secret = Secret::new("from-file".into());
        apply_env_overrides_with(&mut cfg, |_| Some("from-env".into()));
        assert_eq!(cfg.line.channel_secret.expose_secret(), "from-file");
        // The token was empty, so the fallback applies.
        assert_eq!(cfg.line.channel_token.expose_secret(), "from-env");
    }
}
