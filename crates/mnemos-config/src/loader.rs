//! Config file loading.

use crate::error::ConfigError;
use crate::model::MnemosConfig;
use log::{debug, info};
use std::path::Path;

/// Load a config file from disk, falling back to defaults when absent.
///
/// The file is parsed as JSON5 so hand-edited configs may carry comments
/// and trailing commas.
pub fn load_config(path: impl AsRef<Path>) -> Result<MnemosConfig, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        debug!("config file not found, using defaults (path={})", path.display());
        return Ok(MnemosConfig::default());
    }
    let raw = std::fs::read_to_string(path)?;
    let config: MnemosConfig =
        json5::from_str(&raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
    info!("loaded config (path={})", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::load_config;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().expect("tempdir");
        let config = load_config(temp.path().join("absent.json5")).expect("config");
        assert_eq!(config.volatile.max_messages, 20);
    }

    #[test]
    fn parses_json5_with_comments() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("mnemos.json5");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(
            file,
            "{{\n  // short log for tests\n  volatile: {{ max_messages: 3, ttl_secs: 10 }},\n}}"
        )
        .expect("write");

        let config = load_config(&path).expect("config");
        assert_eq!(config.volatile.max_messages, 3);
        assert_eq!(config.volatile.ttl_secs, 10);
        assert_eq!(config.coordinator.promotion_threshold, 0.5);
    }

    #[test]
    fn invalid_file_reports_parse_error() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("broken.json5");
        std::fs::write(&path, "{ volatile: ").expect("write");
        let err = load_config(&path).expect_err("should fail");
        assert!(err.to_string().contains("parse error"));
    }
}
