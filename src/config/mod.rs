use serde::Deserialize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::kml::ExportOptions;

fn default_verbose() -> bool {
    false
}

/// Settings read from `parcelkml.toml`.
///
/// ```toml
/// verbose = true
///
/// [export]
/// document_name = "Blida inspection 2026"
/// unnamed_placemark = "Unnamed Land"
/// ```
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub export: ExportOptions,
}

impl FileConfig {
    /// First parseable config from the search paths, if any.
    ///
    /// Unparseable files are skipped; one warning per skipped file is returned
    /// for the caller to log once logging is set up.
    pub fn load() -> (Option<Self>, Vec<String>) {
        Self::load_from(&get_config_paths())
    }

    pub fn load_from(paths: &[PathBuf]) -> (Option<Self>, Vec<String>) {
        let mut warnings = Vec::new();
        for path in paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return (Some(config), warnings),
                    Err(e) => {
                        warnings.push(format!(
                            "Failed to parse config file {}: {}",
                            path.display(),
                            e
                        ));
                    }
                }
            }
        }
        (None, warnings)
    }

    /// Load an explicitly requested config; it must exist and parse
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {}", path.display());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("parcelkml.toml"));
    paths.push(PathBuf::from(".parcelkml.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("parcelkml").join("config.toml"));
        paths.push(config_dir.join("parcelkml.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".parcelkml.toml"));
        paths.push(home.join(".config").join("parcelkml").join("config.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_from_path_with_partial_export_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("parcelkml.toml");
        fs::write(
            &path,
            "verbose = true\n\n[export]\ndocument_name = \"Blida 2026\"\n",
        )
        .unwrap();

        let config = FileConfig::from_path(&path).unwrap();
        assert!(config.verbose);
        assert_eq!(config.export.document_name, "Blida 2026");
        assert_eq!(
            config.export.unnamed_placemark,
            ExportOptions::default().unnamed_placemark
        );
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        fs::write(&path, "").unwrap();

        let config = FileConfig::from_path(&path).unwrap();
        assert!(!config.verbose);
        assert_eq!(config.export, ExportOptions::default());
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = tempdir().unwrap();
        let err = FileConfig::from_path(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_search_skips_unparseable_file_with_warning() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("parcelkml.toml");
        let good = dir.path().join("config.toml");
        fs::write(&bad, "verbose = maybe").unwrap();
        fs::write(&good, "verbose = true").unwrap();

        let paths = vec![dir.path().join("absent.toml"), bad.clone(), good];
        let (config, warnings) = FileConfig::load_from(&paths);
        assert!(config.unwrap().verbose);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains(&bad.display().to_string()));

        let (config, warnings) = FileConfig::load_from(&[bad]);
        assert!(config.is_none());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "verbose = maybe").unwrap();
        assert!(FileConfig::from_path(&path).is_err());
    }
}
