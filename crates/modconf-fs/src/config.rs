//! Format-agnostic loading of typed settings files

use crate::{DocumentFormat, Error, NormalizedPath, Result, io};
use serde::de::DeserializeOwned;

/// Format-agnostic settings store.
///
/// Detects the format from the file extension and deserializes
/// straight into `T`.
#[derive(Debug, Default)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load settings from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let content = io::read_text(path)?;
        let extension = path.extension().unwrap_or("");

        match DocumentFormat::from_extension(extension) {
            Some(DocumentFormat::Toml) => toml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_native(),
                format: "TOML".into(),
                message: e.to_string(),
            }),
            Some(DocumentFormat::Json) => {
                serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
                    path: path.to_native(),
                    format: "JSON".into(),
                    message: e.to_string(),
                })
            }
            Some(DocumentFormat::Yaml) => {
                serde_yaml::from_str(&content).map_err(|e| Error::ConfigParse {
                    path: path.to_native(),
                    format: "YAML".into(),
                    message: e.to_string(),
                })
            }
            None => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }
}
