use std::fs;
use std::path::Path;

use markup_diff_core::DiffOptions;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    diff: DiffOptions,
}

/// Errors returned when loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Diff options from an optional TOML file; defaults when no file is given.
pub fn load_options(path: Option<&Path>) -> Result<DiffOptions, ConfigError> {
    let Some(path) = path else {
        return Ok(DiffOptions::default());
    };

    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_options(&raw, path.display().to_string())
}

fn parse_options(raw: &str, path: String) -> Result<DiffOptions, ConfigError> {
    let parsed: ConfigFile =
        toml::from_str(raw).map_err(|source| ConfigError::Parse { path, source })?;
    Ok(parsed.diff)
}

#[cfg(test)]
mod tests {
    use super::parse_options;

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let raw = r#"
[diff]
skip_attribute = "data-frozen"

[diff.generated_ids]
prefix = "G"
"#;
        let opts = parse_options(raw, "inline".to_string()).expect("config should parse");
        assert_eq!(opts.skip_attribute, "data-frozen");
        assert_eq!(opts.id_attribute, "id");
        assert_eq!(opts.generated_ids.prefix, "G");
        assert_eq!(opts.generated_ids.length, 17);
    }

    #[test]
    fn empty_file_means_defaults() {
        let opts = parse_options("", "inline".to_string()).expect("config should parse");
        assert_eq!(opts, markup_diff_core::DiffOptions::default());
    }

    #[test]
    fn bad_types_are_parse_errors() {
        let raw = "[diff]\nid_attribute = 3\n";
        assert!(parse_options(raw, "inline".to_string()).is_err());
    }
}
