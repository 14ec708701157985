//! Plain nested-map view of a config, and its JSON form
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! ```json
//! {
//!   "name": "config",
//!   "properties": { "version": 3 },
//!   "classes": [
//!     { "name": "Item", "parent": "Base", "properties": { "tags": { "+=": ["a"] } } }
//!   ]
//! }
//! ```
//!
//! Arrays declared with `+=` are wrapped in a `{"+=": [...]}` object.

use super::document::{ClassId, ClassRef, Config, ConfigArray, ConfigValue};
use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One class and everything below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDict {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub reference: bool,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, ValueDict>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<ClassDict>,
}

/// A property value in dict form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ValueDict {
    Long(i64),
    Float(f64),
    String(String),
    Array(Vec<ValueDict>),
    Append {
        #[serde(rename = "+=")]
        items: Vec<ValueDict>,
    },
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

impl From<&ConfigValue> for ValueDict {
    fn from(value: &ConfigValue) -> Self {
        match value {
            ConfigValue::String(s) => ValueDict::String(s.clone()),
            ConfigValue::Long(v) => ValueDict::Long(*v),
            ConfigValue::Float(v) => ValueDict::Float(*v),
            ConfigValue::Array(array) => {
                let items = array.items.iter().map(ValueDict::from).collect();
                if array.extends {
                    ValueDict::Append { items }
                } else {
                    ValueDict::Array(items)
                }
            }
        }
    }
}

impl From<&ValueDict> for ConfigValue {
    fn from(value: &ValueDict) -> Self {
        let array = |items: &[ValueDict], extends| {
            ConfigValue::Array(ConfigArray {
                items: items.iter().map(ConfigValue::from).collect(),
                extends,
            })
        };
        match value {
            ValueDict::Long(v) => ConfigValue::Long(*v),
            ValueDict::Float(v) => ConfigValue::Float(*v),
            ValueDict::String(s) => ConfigValue::String(s.clone()),
            ValueDict::Array(items) => array(items, false),
            ValueDict::Append { items } => array(items, true),
        }
    }
}

impl ClassRef<'_> {
    /// Nested-map view of this class and its descendants.
    pub fn as_dict(&self) -> ClassDict {
        ClassDict {
            name: self.name().to_string(),
            parent: self.parent().map(|p| p.name().to_string()),
            reference: self.is_reference(),
            properties: self
                .properties()
                .map(|p| (p.name.clone(), ValueDict::from(&p.value)))
                .collect(),
            classes: self.classes().map(|c| c.as_dict()).collect(),
        }
    }
}

impl Config {
    pub fn as_dict(&self) -> ClassDict {
        self.root().as_dict()
    }

    /// Rebuild a config from its dict form.
    ///
    /// Classes are added in list order, so a parent must appear before (or
    /// in an enclosing scope of) the classes that inherit from it.
    ///
    /// # Errors
    /// Returns an error on duplicate class names or unresolvable parents.
    pub fn from_dict(dict: &ClassDict) -> Result<Config> {
        let mut config = Config::new(dict.name.clone());
        let root = config.root_id();
        fill_class(&mut config, root, dict)?;
        Ok(config)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.as_dict())?)
    }

    /// # Errors
    /// Returns an error if the JSON does not describe a valid config.
    pub fn from_json(json: &str) -> Result<Config> {
        let dict: ClassDict = serde_json::from_str(json)?;
        Config::from_dict(&dict)
    }
}

fn fill_class(config: &mut Config, id: ClassId, dict: &ClassDict) -> Result<()> {
    for (name, value) in &dict.properties {
        if !config.insert_property(id, name, ConfigValue::from(value)) {
            tracing::warn!("Ignoring duplicate property '{}' in '{}'", name, dict.name);
        }
    }
    for child in &dict.classes {
        let child_id = config.add_class(id, &child.name, child.parent.as_deref(), child.reference)?;
        fill_class(config, child_id, child)?;
    }
    Ok(())
}
