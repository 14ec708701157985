//! Skeleton lookup used to convert legacy animations
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use crate::formats::cfg::{ClassRef, Config, ConfigValue};
use indexmap::IndexMap;

/// Bone name to parent name lookup, case-insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoneHierarchy {
    // lowercase bone name -> (bone name, parent name)
    bones: IndexMap<String, (String, Option<String>)>,
}

impl BoneHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(bone, parent)` pairs. An empty parent marks a root bone.
    pub fn from_pairs<I, B, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (B, P)>,
        B: AsRef<str>,
        P: AsRef<str>,
    {
        let mut hierarchy = Self::new();
        for (bone, parent) in pairs {
            hierarchy.insert(bone.as_ref(), parent.as_ref());
        }
        hierarchy
    }

    /// Add or replace a bone.
    pub fn insert(&mut self, bone: &str, parent: &str) {
        let parent = (!parent.is_empty()).then(|| parent.to_string());
        self.bones
            .insert(bone.to_lowercase(), (bone.to_string(), parent));
    }

    pub fn contains(&self, bone: &str) -> bool {
        self.bones.contains_key(&bone.to_lowercase())
    }

    /// Parent of `bone`: `None` if the bone is unknown, `Some(None)` for a root.
    pub fn parent_of(&self, bone: &str) -> Option<Option<&str>> {
        self.bones
            .get(&bone.to_lowercase())
            .map(|(_, parent)| parent.as_deref())
    }

    /// Bones in insertion order.
    pub fn bones(&self) -> impl Iterator<Item = &str> {
        self.bones.values().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// Read `CfgSkeletons/<skeleton>` from a model config.
    ///
    /// `skeletonBones[]` is a flat `{bone, parent, bone, parent, ...}` list.
    /// Bones from the `skeletonInherit` skeleton come first.
    pub fn from_config_skeleton(config: &Config, skeleton: &str) -> Option<Self> {
        let skeletons = config.root().get_class("CfgSkeletons")?;
        let start = skeletons.get_class(skeleton)?;

        // Walk skeletonInherit to the base, then add bones base first.
        let mut chain: Vec<ClassRef<'_>> = vec![start];
        let mut current = start;
        while let Some(base) = current
            .get_prop("skeletonInherit")
            .and_then(ConfigValue::as_str)
            .filter(|s| !s.is_empty())
        {
            let Some(next) = skeletons.get_class(base) else {
                tracing::warn!("Skeleton '{}' inherits unknown skeleton '{}'", current.name(), base);
                break;
            };
            if chain.iter().any(|c| c.id() == next.id()) {
                tracing::warn!("Skeleton inheritance cycle at '{}'", next.name());
                break;
            }
            chain.push(next);
            current = next;
        }

        let mut hierarchy = Self::new();
        for class in chain.iter().rev() {
            let Some(list) = class
                .local_prop("skeletonBones")
                .and_then(ConfigValue::as_array)
            else {
                continue;
            };
            for pair in list.items.chunks(2) {
                let bone = pair.first().and_then(ConfigValue::as_str).unwrap_or_default();
                let parent = pair.get(1).and_then(ConfigValue::as_str).unwrap_or_default();
                if !bone.is_empty() {
                    hierarchy.insert(bone, parent);
                }
            }
        }
        Some(hierarchy)
    }
}
