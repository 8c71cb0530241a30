//! Layered configuration: built-in defaults, then an optional file, then
//! `SAFEPATH_*` environment variables. CLI flags are applied on top by the
//! binary.

use crate::error::Result;
use crate::types::DashboardConfig;
use ::config::{Config, ConfigError, Environment, File};
use std::path::Path;

pub const ENV_PREFIX: &str = "SAFEPATH";

/// Load configuration. `file` may be TOML, YAML or JSON (by extension) and
/// must exist when given.
pub fn load_config(file: Option<&Path>) -> Result<DashboardConfig> {
    let mut builder = Config::builder();
    if let Some(path) = file {
        builder = builder.add_source(File::from(path).required(true));
    }
    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

    let config: DashboardConfig = builder.build()?.try_deserialize()?;
    if config.request_timeout_ms == 0 {
        return Err(
            ConfigError::Message("request_timeout_ms must be greater than zero".into()).into(),
        );
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        std::fs::write(
            &path,
            "base_url = \"http://backend:9000\"\npoll_interval_ms = 250\n",
        )
        .unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.base_url, "http://backend:9000");
        assert_eq!(cfg.poll_interval_ms, 250);
        // Untouched keys keep their defaults.
        assert_eq!(cfg.request_timeout_ms, DashboardConfig::default().request_timeout_ms);
        assert_eq!(cfg.svg_out, None);
    }

    #[test]
    fn zero_request_timeout_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.toml");
        std::fs::write(&path, "request_timeout_ms = 0\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("request_timeout_ms"));
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
