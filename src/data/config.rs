use crate::data::persistence::Persistable;
use crate::data::{TimeFormat, ValueError};
use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_COLOR: &str = "#f06292";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Layout {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "portrait" => Ok(Layout::Portrait),
            "landscape" => Ok(Layout::Landscape),
            other => Err(ValueError::Unknown {
                kind: "layout",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::Portrait => write!(f, "portrait"),
            Layout::Landscape => write!(f, "landscape"),
        }
    }
}

/// Fully resolved appearance and behavior of one panel session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PickerConfig {
    pub color: String,
    pub layout: Layout,
    pub format: TimeFormat,
    #[serde(deserialize_with = "bool_or_text")]
    pub simplify: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        PickerConfig {
            color: DEFAULT_COLOR.to_string(),
            layout: Layout::Portrait,
            format: TimeFormat::H24,
            simplify: false,
        }
    }
}

impl PickerConfig {
    /// Returns a copy with every option present in `overrides` applied.
    pub fn merged(&self, overrides: &ConfigOverrides) -> PickerConfig {
        PickerConfig {
            color: overrides
                .color
                .clone()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| self.color.clone()),
            layout: overrides.layout.unwrap_or(self.layout),
            format: overrides.format.unwrap_or(self.format),
            simplify: overrides.simplify.unwrap_or(self.simplify),
        }
    }
}

/// Partial configuration: per-instance options or per-field attributes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<TimeFormat>,
    #[serde(
        deserialize_with = "optional_bool_or_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub simplify: Option<bool>,
}

impl ConfigOverrides {
    /// Reads recognized attributes from a field's string attribute map.
    /// Unrecognized tokens are dropped so the defaults apply.
    pub fn from_attributes(attributes: &HashMap<String, String>) -> Self {
        let token = |name: &str| attributes.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());
        ConfigOverrides {
            color: token("color").map(str::to_string),
            layout: token("layout").and_then(|v| parse_logged::<Layout>("layout", v)),
            format: token("format").and_then(|v| parse_logged::<TimeFormat>("format", v)),
            simplify: token("simplify").map(text_to_bool),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ConfigOverrides::default()
    }
}

fn parse_logged<T: FromStr<Err = ValueError>>(name: &str, value: &str) -> Option<T> {
    match value.parse() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(attribute = name, %e, "ignoring attribute");
            None
        }
    }
}

/// Attribute booleans arrive as text; only `"true"` is true.
pub fn text_to_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoolOrText {
    Bool(bool),
    Text(String),
}

impl BoolOrText {
    fn into_bool(self) -> bool {
        match self {
            BoolOrText::Bool(b) => b,
            BoolOrText::Text(s) => text_to_bool(&s),
        }
    }
}

fn bool_or_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(BoolOrText::deserialize(deserializer)?.into_bool())
}

fn optional_bool_or_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<bool>, D::Error> {
    Ok(Option::<BoolOrText>::deserialize(deserializer)?.map(BoolOrText::into_bool))
}

/// Wrapper that reads the `picker` key from picker.yaml.
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct PickerSettings {
    #[serde(default)]
    pub picker: PickerConfig,
}

impl Persistable for PickerSettings {
    fn filename() -> &'static str {
        "picker.yaml"
    }
    fn is_json() -> bool {
        false
    }
}

impl PickerSettings {
    /// Loads `picker.yaml` from `dir`, or a JSON settings file when `dir`
    /// points at a `.json` file.
    pub fn load_path(path: &Path) -> Result<PickerConfig> {
        if path.extension().is_some_and(|ext| ext == "json") {
            return Ok(JsonPickerSettings::load_file(path)?.picker);
        }
        Ok(PickerSettings::load_from(path)?.picker)
    }
}

#[derive(Serialize, Deserialize, Default, Debug)]
struct JsonPickerSettings {
    #[serde(default)]
    picker: PickerConfig,
}

impl Persistable for JsonPickerSettings {
    fn filename() -> &'static str {
        "picker.json"
    }
    fn is_json() -> bool {
        true
    }
}
