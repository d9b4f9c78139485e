//! Loading structured documents from disk
//!
//! [`DocumentLoader`] picks a parser from the file extension. YAML
//! documents may pull in other files with the `!include <path>` tag,
//! which is expanded at load time relative to the including file.

use serde_yaml::value::TaggedValue;

use crate::{Error, NormalizedPath, Result, io};

const INCLUDE_TAG: &str = "include";

/// Structured formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Toml,
}

impl DocumentFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    pub fn from_path(path: &NormalizedPath) -> Option<Self> {
        path.extension().and_then(Self::from_extension)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Toml => "TOML",
        }
    }
}

/// The parsed contents of a file.
///
/// Files without a recognised extension are kept as text.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Json(serde_json::Value),
    Yaml(serde_yaml::Value),
    Toml(toml::Value),
    Text(String),
}

impl Document {
    pub fn format(&self) -> Option<DocumentFormat> {
        match self {
            Self::Json(_) => Some(DocumentFormat::Json),
            Self::Yaml(_) => Some(DocumentFormat::Yaml),
            Self::Toml(_) => Some(DocumentFormat::Toml),
            Self::Text(_) => None,
        }
    }

    /// Whether the document holds a mapping or a sequence at its root.
    pub fn is_composite(&self) -> bool {
        match self {
            Self::Json(value) => value.is_object() || value.is_array(),
            Self::Yaml(value) => value.is_mapping() || value.is_sequence(),
            Self::Toml(value) => value.is_table() || value.is_array(),
            Self::Text(_) => false,
        }
    }

    fn into_yaml(self, path: &NormalizedPath) -> Result<serde_yaml::Value> {
        let converted = match self {
            Self::Yaml(value) => return Ok(value),
            Self::Text(text) => return Ok(serde_yaml::Value::String(text)),
            Self::Json(value) => serde_yaml::to_value(value),
            Self::Toml(value) => serde_yaml::to_value(value),
        };
        converted.map_err(|e| Error::InvalidInclude {
            path: path.to_native(),
            message: e.to_string(),
        })
    }
}

/// Loads documents and expands YAML `!include` tags.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    expand_includes: bool,
}

impl Default for DocumentLoader {
    fn default() -> Self {
        Self {
            expand_includes: true,
        }
    }
}

impl DocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave `!include` tags in place instead of expanding them.
    pub fn without_includes() -> Self {
        Self {
            expand_includes: false,
        }
    }

    /// Load and parse the file at `path`.
    pub fn load(&self, path: &NormalizedPath) -> Result<Document> {
        let mut stack = Vec::new();
        self.load_inner(path, &mut stack)
    }

    fn load_inner(&self, path: &NormalizedPath, stack: &mut Vec<NormalizedPath>) -> Result<Document> {
        tracing::debug!(path = %path, "Loading document");
        let content = io::read_text(path)?;

        let Some(format) = DocumentFormat::from_path(path) else {
            return Ok(Document::Text(content));
        };
        let parse_error = |message: String| Error::ConfigParse {
            path: path.to_native(),
            format: format.name().into(),
            message,
        };

        match format {
            DocumentFormat::Json => serde_json::from_str(&content)
                .map(Document::Json)
                .map_err(|e| parse_error(e.to_string())),
            DocumentFormat::Toml => toml::from_str(&content)
                .map(Document::Toml)
                .map_err(|e| parse_error(e.to_string())),
            DocumentFormat::Yaml => {
                let value: serde_yaml::Value =
                    serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?;
                if !self.expand_includes {
                    return Ok(Document::Yaml(value));
                }
                let dir = path.parent().unwrap_or_else(|| NormalizedPath::new("."));
                stack.push(path.clone());
                let expanded = self.expand(value, path, &dir, stack);
                stack.pop();
                expanded.map(Document::Yaml)
            }
        }
    }

    fn expand(
        &self,
        value: serde_yaml::Value,
        source: &NormalizedPath,
        dir: &NormalizedPath,
        stack: &mut Vec<NormalizedPath>,
    ) -> Result<serde_yaml::Value> {
        use serde_yaml::Value;

        match value {
            Value::Tagged(tagged) if tagged.tag == INCLUDE_TAG => {
                let Value::String(target) = tagged.value else {
                    return Err(Error::InvalidInclude {
                        path: source.to_native(),
                        message: "!include expects a path string".into(),
                    });
                };
                let candidate = NormalizedPath::new(&target);
                let target = if candidate.is_absolute() {
                    candidate
                } else {
                    dir.join(&target)
                };
                if stack.contains(&target) {
                    return Err(Error::IncludeCycle {
                        path: target.to_native(),
                    });
                }
                tracing::debug!(from = %source, include = %target, "Expanding include");
                self.load_inner(&target, stack)?.into_yaml(&target)
            }
            Value::Tagged(tagged) => {
                let TaggedValue { tag, value } = *tagged;
                Ok(Value::Tagged(Box::new(TaggedValue {
                    tag,
                    value: self.expand(value, source, dir, stack)?,
                })))
            }
            Value::Sequence(items) => items
                .into_iter()
                .map(|item| self.expand(item, source, dir, stack))
                .collect::<Result<Vec<_>>>()
                .map(Value::Sequence),
            Value::Mapping(mapping) => {
                let mut expanded = serde_yaml::Mapping::with_capacity(mapping.len());
                for (key, item) in mapping {
                    expanded.insert(key, self.expand(item, source, dir, stack)?);
                }
                Ok(Value::Mapping(expanded))
            }
            other => Ok(other),
        }
    }
}
