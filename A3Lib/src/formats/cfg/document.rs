//! Config class tree
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Classes live in an arena owned by [`Config`] and refer to each other by
//! [`ClassId`]. `parent` (inheritance) and `container` (lexical enclosure)
//! are plain indices, so the tree stays single-owner.

use crate::error::{Error, Result};
use indexmap::IndexMap;

/// Stable index of a class inside its [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(usize);

/// A property value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Long(i64),
    Float(f64),
    Array(ConfigArray),
}

/// An array value. `extends` marks `+=` (append to the inherited array).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigArray {
    pub items: Vec<ConfigValue>,
    pub extends: bool,
}

/// A named property inside a class body.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigProperty {
    pub name: String,
    pub value: ConfigValue,
}

#[derive(Debug, Clone, PartialEq)]
struct ClassData {
    name: String,
    parent: Option<ClassId>,
    container: Option<ClassId>,
    // keyed by lowercase name
    properties: IndexMap<String, ConfigProperty>,
    classes: IndexMap<String, ClassId>,
    is_reference: bool,
}

/// A parsed config: a single named root class and everything below it.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    classes: Vec<ClassData>,
    root: ClassId,
}

impl ConfigValue {
    /// Short type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::String(_) => "string",
            ConfigValue::Long(_) => "long",
            ConfigValue::Float(_) => "float",
            ConfigValue::Array(_) => "array",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            ConfigValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value as a float. Longs are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(v) => Some(*v),
            ConfigValue::Long(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ConfigArray> {
        match self {
            ConfigValue::Array(a) => Some(a),
            _ => None,
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Long(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(items: Vec<ConfigValue>) -> Self {
        ConfigValue::Array(ConfigArray {
            items,
            extends: false,
        })
    }
}

impl Config {
    /// Create a config holding only an empty root class.
    pub fn new(root_name: impl Into<String>) -> Self {
        Config {
            classes: vec![ClassData {
                name: root_name.into(),
                parent: None,
                container: None,
                properties: IndexMap::new(),
                classes: IndexMap::new(),
                is_reference: false,
            }],
            root: ClassId(0),
        }
    }

    pub fn root_id(&self) -> ClassId {
        self.root
    }

    pub fn root(&self) -> ClassRef<'_> {
        self.class(self.root)
    }

    /// Borrow a class by id.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this config. Use [`Config::try_class`]
    /// for ids that may belong to another config.
    pub fn class(&self, id: ClassId) -> ClassRef<'_> {
        assert!(id.0 < self.classes.len(), "class id out of range");
        ClassRef { config: self, id }
    }

    /// Borrow a class by id, or `None` if the id is out of range for this config.
    pub fn try_class(&self, id: ClassId) -> Option<ClassRef<'_>> {
        (id.0 < self.classes.len()).then_some(ClassRef { config: self, id })
    }

    /// Number of classes in the arena, root included.
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Find `name` for a class declared inside `context`.
    ///
    /// Searches the children of `context`, then the children of each
    /// enclosing class up to the root. Only classes already added are seen.
    pub fn resolve_parent(&self, context: ClassId, name: &str) -> Option<ClassId> {
        let key = name.to_lowercase();
        let mut scope = Some(context);
        while let Some(current) = scope {
            let data = &self.classes[current.0];
            if let Some(&found) = data.classes.get(&key) {
                return Some(found);
            }
            scope = data.container;
        }
        None
    }

    /// Add a child class to `container`.
    ///
    /// `parent` is resolved with [`Config::resolve_parent`] before the class
    /// is inserted. Fails on a case-insensitive name collision or an
    /// unresolvable parent.
    pub fn add_class(
        &mut self,
        container: ClassId,
        name: &str,
        parent: Option<&str>,
        is_reference: bool,
    ) -> Result<ClassId> {
        let key = name.to_lowercase();
        if self.classes[container.0].classes.contains_key(&key) {
            return Err(Error::DuplicateDefinition {
                path: self.class(container).path(),
                name: name.to_string(),
            });
        }

        let parent_id = match parent.filter(|p| !p.is_empty()) {
            Some(parent_name) => Some(self.resolve_parent(container, parent_name).ok_or_else(
                || Error::UnresolvedParent {
                    class: format!("{}/{}", self.class(container).path(), name),
                    parent: parent_name.to_string(),
                },
            )?),
            None => None,
        };

        let id = ClassId(self.classes.len());
        self.classes.push(ClassData {
            name: name.to_string(),
            parent: parent_id,
            container: Some(container),
            properties: IndexMap::new(),
            classes: IndexMap::new(),
            is_reference,
        });
        self.classes[container.0].classes.insert(key, id);
        Ok(id)
    }

    /// Insert a property unless one with the same name exists.
    ///
    /// Returns `false` (leaving the first definition untouched) on collision.
    pub fn insert_property(
        &mut self,
        class: ClassId,
        name: &str,
        value: impl Into<ConfigValue>,
    ) -> bool {
        let key = name.to_lowercase();
        let properties = &mut self.classes[class.0].properties;
        if properties.contains_key(&key) {
            return false;
        }
        properties.insert(
            key,
            ConfigProperty {
                name: name.to_string(),
                value: value.into(),
            },
        );
        true
    }

    /// Insert or replace a property, returning the previous value.
    pub fn set_property(
        &mut self,
        class: ClassId,
        name: &str,
        value: impl Into<ConfigValue>,
    ) -> Option<ConfigValue> {
        let key = name.to_lowercase();
        let properties = &mut self.classes[class.0].properties;
        match properties.get_mut(&key) {
            Some(existing) => Some(std::mem::replace(&mut existing.value, value.into())),
            None => {
                properties.insert(
                    key,
                    ConfigProperty {
                        name: name.to_string(),
                        value: value.into(),
                    },
                );
                None
            }
        }
    }

    /// Remove a property, keeping the order of the remaining ones.
    pub fn remove_property(&mut self, class: ClassId, name: &str) -> Option<ConfigProperty> {
        self.classes[class.0]
            .properties
            .shift_remove(&name.to_lowercase())
    }
}

/// Borrowed view of one class.
#[derive(Debug, Clone, Copy)]
pub struct ClassRef<'a> {
    config: &'a Config,
    id: ClassId,
}

impl<'a> ClassRef<'a> {
    fn data(&self) -> &'a ClassData {
        &self.config.classes[self.id.0]
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    /// Class this one inherits from.
    pub fn parent(&self) -> Option<ClassRef<'a>> {
        self.data().parent.map(|id| self.config.class(id))
    }

    /// Class whose body lexically contains this one.
    pub fn container(&self) -> Option<ClassRef<'a>> {
        self.data().container.map(|id| self.config.class(id))
    }

    /// Forward-declared external class (`class Name;`).
    pub fn is_reference(&self) -> bool {
        self.data().is_reference
    }

    pub fn is_root(&self) -> bool {
        self.id == self.config.root
    }

    /// Slash-joined names from the root down to this class.
    pub fn path(&self) -> String {
        let mut names = vec![self.name()];
        let mut current = self.container();
        while let Some(class) = current {
            names.push(class.name());
            current = class.container();
        }
        names.reverse();
        names.join("/")
    }

    pub fn properties(self) -> impl Iterator<Item = &'a ConfigProperty> + 'a {
        self.data().properties.values()
    }

    pub fn classes(self) -> impl Iterator<Item = ClassRef<'a>> + 'a {
        let config = self.config;
        self.data().classes.values().map(move |&id| config.class(id))
    }

    /// Property defined directly on this class.
    pub fn local_prop(&self, name: &str) -> Option<&'a ConfigValue> {
        self.data()
            .properties
            .get(&name.to_lowercase())
            .map(|p| &p.value)
    }

    /// Child class defined directly on this class.
    pub fn local_class(&self, name: &str) -> Option<ClassRef<'a>> {
        self.data()
            .classes
            .get(&name.to_lowercase())
            .map(|&id| self.config.class(id))
    }

    /// This class followed by its ancestors.
    pub fn inheritance_chain(self) -> impl Iterator<Item = ClassRef<'a>> + 'a {
        // Bounded by the arena size so a malformed parent cycle cannot spin forever.
        let limit = self.config.classes.len();
        std::iter::successors(Some(self), ClassRef::parent).take(limit)
    }

    /// Property lookup falling back along the parent chain.
    pub fn find_prop(&self, name: &str) -> Option<&'a ConfigValue> {
        self.inheritance_chain().find_map(|class| class.local_prop(name))
    }

    /// Child class lookup falling back along the parent chain.
    pub fn find_class(&self, name: &str) -> Option<ClassRef<'a>> {
        self.inheritance_chain()
            .find_map(|class| class.local_class(name))
    }

    /// Walk a `/`- or `.`-separated class path, case-insensitively.
    ///
    /// Each segment is looked up with [`ClassRef::find_class`], so inherited
    /// child classes are visible. An empty path returns this class.
    pub fn get_class(&self, path: &str) -> Option<ClassRef<'a>> {
        split_path(path).try_fold(*self, |class, segment| class.find_class(segment))
    }

    /// Resolve a property path such as `CfgPatches/MyAddon/units`.
    pub fn get_prop(&self, path: &str) -> Option<&'a ConfigValue> {
        let segments: Vec<&str> = split_path(path).collect();
        let (name, classes) = segments.split_last()?;
        let mut class = *self;
        for segment in classes {
            class = class.find_class(segment)?;
        }
        class.find_prop(name)
    }

    /// [`ClassRef::get_prop`] with a fallback value.
    pub fn get_prop_or(&self, path: &str, default: &'a ConfigValue) -> &'a ConfigValue {
        self.get_prop(path).unwrap_or(default)
    }

    /// Whether `name` appears anywhere in this class's parent chain.
    pub fn inherits_from(&self, name: &str) -> bool {
        self.inheritance_chain()
            .skip(1)
            .any(|class| class.name().eq_ignore_ascii_case(name))
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split(['/', '.']).filter(|s| !s.is_empty())
}
