//! Schema model deserialized from API description JSON files.

use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

use crate::kind::Kind;

/// The dynamic `type` field of a schema node.
///
/// Schemas write it either as a single type name or as an ordered union of
/// type names. Anything else is kept as `Malformed` so generation can fall
/// back to the opaque host type instead of rejecting the whole file.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawType {
    #[default]
    Absent,
    Single(String),
    List(Vec<String>),
    Malformed(JsonValue),
}

impl RawType {
    /// Resolved type string: the single name, or the first union member.
    ///
    /// `None` only for malformed tags; an absent tag resolves to `""`.
    pub fn resolved(&self) -> Option<&str> {
        match self {
            RawType::Absent => Some(""),
            RawType::Single(name) => Some(name.as_str()),
            RawType::List(names) => names.first().map(String::as_str),
            RawType::Malformed(_) => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, RawType::Malformed(_))
    }
}

impl From<JsonValue> for RawType {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => RawType::Absent,
            JsonValue::String(name) => RawType::Single(name),
            JsonValue::Array(items) if !items.is_empty() && items.iter().all(JsonValue::is_string) => {
                RawType::List(
                    items
                        .into_iter()
                        .filter_map(|item| match item {
                            JsonValue::String(s) => Some(s),
                            _ => None,
                        })
                        .collect(),
                )
            }
            other => RawType::Malformed(other),
        }
    }
}

impl<'de> Deserialize<'de> for RawType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(RawType::from(JsonValue::deserialize(deserializer)?))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
/// Process contexts a member is available in.
pub struct Process {
    #[serde(default)]
    pub main: bool,
    #[serde(default)]
    pub renderer: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
/// Fields shared by every schema entity.
pub struct Base {
    /// Raw schema name, used verbatim for struct tags and event literals.
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub raw_type: RawType,
    #[serde(default)]
    pub description: String,
    /// Platforms the member is restricted to; empty means all.
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub process: Process,
    #[serde(default)]
    pub required: bool,

    /// Optional package metadata.
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default, rename = "repoUrl")]
    pub repo_url: Option<String>,
    #[serde(default, rename = "websiteUrl")]
    pub website_url: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

impl Base {
    pub fn kind(&self) -> Kind {
        Kind::classify(&self.raw_type)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
/// A field, parameter, or nested composite.
pub struct Property {
    #[serde(flatten)]
    pub base: Base,
    /// Members when the property is an Object or Structure.
    #[serde(default)]
    pub properties: Vec<Property>,
    /// Arguments when the property is a function-typed value.
    #[serde(default)]
    pub parameters: Vec<Property>,
    /// Enumerated constant members.
    #[serde(default, rename = "possibleValues")]
    pub possible_values: Option<Vec<PossibleValue>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
/// One member of an enumerated constant set.
pub struct PossibleValue {
    #[serde(flatten)]
    pub base: Base,
    #[serde(default)]
    pub value: String,
}

impl PossibleValue {
    /// Literal carried by the constant: `value` when set, else the member name.
    pub fn literal(&self) -> &str {
        if self.value.is_empty() {
            &self.base.name
        } else {
            &self.value
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
/// A named notification and its payload shape.
pub struct Event {
    #[serde(flatten)]
    pub base: Base,
    #[serde(default)]
    pub returns: Vec<Property>,
}

#[derive(Debug, Clone, Default, Deserialize)]
/// A callable with an ordered parameter list and an optional return.
pub struct Method {
    #[serde(flatten)]
    pub base: Base,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub parameters: Vec<Property>,
    #[serde(default)]
    pub returns: Option<Property>,
}

#[derive(Debug, Clone, Default, Deserialize)]
/// Top-level schema unit.
///
/// Modules fill the module-scoped collections, classes fill the instance-scoped
/// ones. Structures, objects and functions only use `properties`.
pub struct Block {
    #[serde(flatten)]
    pub base: Base,

    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default, alias = "Properties")]
    pub properties: Vec<Property>,
    #[serde(default, alias = "Methods")]
    pub methods: Vec<Method>,

    #[serde(default, rename = "instanceName")]
    pub instance_name: Option<String>,
    #[serde(default, rename = "instanceEvents")]
    pub instance_events: Vec<Event>,
    #[serde(default, rename = "instanceProperties")]
    pub instance_properties: Vec<Property>,
    #[serde(default, rename = "instanceMethods")]
    pub instance_methods: Vec<Method>,

    #[serde(default, rename = "constructorMethod")]
    pub constructor_method: Option<Method>,
    #[serde(default, rename = "staticMethods")]
    pub static_methods: Vec<Method>,
}

/// Ordered list of blocks; order is emission order.
#[derive(Debug, Clone, Default)]
pub struct ApiFile {
    pub blocks: Vec<Block>,
}

impl<'de> Deserialize<'de> for ApiFile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(ApiFile {
            blocks: Vec::<Block>::deserialize(deserializer)?,
        })
    }
}
