//! The configuration tree
//!
//! [`Node`] is used both for the raw tree handed to the resolver and for
//! the resolved output. Only resolution produces
//! [`Node::MissingPackage`].

use indexmap::IndexMap;
use modconf_fs::Document;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Number;

use crate::{Error, Result};

/// Ordered string-keyed mapping.
pub type Mapping = IndexMap<String, Node>;

/// A node of a configuration tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Node>),
    Mapping(Mapping),
    /// A package reference whose package could not be located.
    MissingPackage { name: String },
}

impl Node {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Look up `key` when this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    pub fn is_missing_package(&self) -> bool {
        matches!(self, Self::MissingPackage { .. })
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Sequence(_) | Self::Mapping(_))
    }

    /// Short name of the variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
            Self::MissingPackage { .. } => "missing package",
        }
    }
}

fn float(value: f64) -> Node {
    match Number::from_f64(value) {
        Some(number) => Node::Number(number),
        // NaN and infinities have no JSON number form
        None => Node::String(value.to_string()),
    }
}

/// Render a YAML mapping key as a string key.
fn yaml_key(key: serde_yaml::Value) -> String {
    use serde_yaml::Value;

    match key {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Tagged(tagged) => yaml_key(tagged.value),
        composite => serde_yaml::to_string(&composite)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Fails when two distinct YAML keys render to the same string key,
/// e.g. `1` and `"1"`.
impl TryFrom<serde_yaml::Value> for Node {
    type Error = Error;

    fn try_from(value: serde_yaml::Value) -> Result<Self> {
        use serde_yaml::Value;

        Ok(match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Node::Number(i.into())
                } else if let Some(u) = n.as_u64() {
                    Node::Number(u.into())
                } else {
                    float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Node::String(s),
            Value::Sequence(items) => Node::Sequence(
                items
                    .into_iter()
                    .map(Node::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Mapping(map) => {
                let mut converted = Mapping::with_capacity(map.len());
                for (key, value) in map {
                    let key = yaml_key(key);
                    if converted.contains_key(&key) {
                        return Err(Error::DuplicateKey { key });
                    }
                    converted.insert(key, Node::try_from(value)?);
                }
                Node::Mapping(converted)
            }
            Value::Tagged(tagged) => Node::try_from(tagged.value)?,
        })
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::Number(n),
            Value::String(s) => Node::String(s),
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => Node::Mapping(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect()),
        }
    }
}

impl From<toml::Value> for Node {
    fn from(value: toml::Value) -> Self {
        use toml::Value;

        match value {
            Value::String(s) => Node::String(s),
            Value::Integer(i) => Node::Number(i.into()),
            Value::Float(f) => float(f),
            Value::Boolean(b) => Node::Bool(b),
            Value::Datetime(dt) => Node::String(dt.to_string()),
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Table(table) => Node::Mapping(table.into_iter().map(|(k, v)| (k, Node::from(v))).collect()),
        }
    }
}

impl TryFrom<Document> for Node {
    type Error = Error;

    fn try_from(document: Document) -> Result<Self> {
        match document {
            Document::Json(value) => Ok(value.into()),
            Document::Yaml(value) => Node::try_from(value),
            Document::Toml(value) => Ok(value.into()),
            Document::Text(text) => Ok(Node::String(text)),
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

impl From<Mapping> for Node {
    fn from(map: Mapping) -> Self {
        Node::Mapping(map)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            // the marker carries no data a consumer could use
            Node::Null | Node::MissingPackage { .. } => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Number(n) => n.serialize(serializer),
            Node::String(s) => serializer.serialize_str(s),
            Node::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn yaml_integer_keys_become_strings() {
        let value: serde_yaml::Value = serde_yaml::from_str("0: a\n1: b\n").unwrap();
        let node = Node::try_from(value).unwrap();

        let map = node.as_mapping().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["0", "1"]);
    }

    #[test]
    fn yaml_mapping_order_is_preserved() {
        let value: serde_yaml::Value = serde_yaml::from_str("z: 1\na: 2\nm: 3\n").unwrap();
        let node = Node::try_from(value).unwrap();

        let keys: Vec<_> = node.as_mapping().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn colliding_yaml_keys_are_rejected() {
        let value: serde_yaml::Value = serde_yaml::from_str("1: a\n\"1\": b\n0: c\n").unwrap();

        let err = Node::try_from(value).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { ref key } if key == "1"), "got {err:?}");
    }

    #[test]
    fn colliding_keys_in_nested_mapping_are_rejected() {
        let value: serde_yaml::Value =
            serde_yaml::from_str("outer:\n  - true: x\n    \"true\": y\n").unwrap();

        assert!(matches!(
            Node::try_from(value),
            Err(Error::DuplicateKey { ref key }) if key == "true"
        ));
    }

    #[test]
    fn missing_package_serializes_as_null() {
        let mut map = Mapping::new();
        map.insert("pkg".into(), Node::MissingPackage { name: "x".into() });
        map.insert("n".into(), Node::Number(3.into()));

        let json = serde_json::to_value(Node::Mapping(map)).unwrap();
        assert_eq!(json, serde_json::json!({"pkg": null, "n": 3}));
    }

    #[test]
    fn toml_datetime_becomes_string() {
        let value: toml::Value = toml::from_str("at = 1979-05-27T07:32:00Z").unwrap();
        let node = Node::from(value);
        assert_eq!(node.get("at").and_then(Node::as_str), Some("1979-05-27T07:32:00Z"));
    }
}
