// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Supertype/subtype hierarchy for one schema version.
//!
//! The [`EntityHierarchy`] owns every [`EntityNode`] in a slot map and keeps
//! a case-insensitive name index over them. A schema loader streams
//! `(entity, parent, predefinedTypeEnum, isAbstract)` tuples into
//! [`EntityHierarchy::add`] in any order: a parent referenced before it is
//! declared gets a placeholder node that the real declaration later fills in.
//!
//! Once loaded, the hierarchy is only read. Unknown names never raise an
//! error; queries return `None`, `false` or an empty list.
//!
//! ## Example
//!
//! ```
//! use ifc_lite_schema::EntityHierarchy;
//!
//! let mut tree = EntityHierarchy::new();
//! tree.add("IfcWall", "IfcBuildingElement", Some("IfcWallTypeEnum"), false);
//! tree.add("IfcBuildingElement", "IfcElement", None, true);
//! tree.add("IfcElement", "Entity", None, true);
//!
//! assert!(tree.is_sub_type_of("IfcWall", "IfcElement", true));
//! assert!(tree.find_non_abstract_super_type("IfcBuildingElement").is_none());
//! ```

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use std::fmt::Write as _;

use crate::config::SchemaConfig;
use crate::entity::{
    fold_name, has_type_suffix, strip_type_suffix, with_type_suffix, EntityNode, EntityRecord,
    EnumerationRecord, ROOT_ENTITY,
};
use crate::keys::EntityKey;

/// Entity tree of a single schema version.
#[derive(Debug, Clone)]
pub struct EntityHierarchy {
    version: String,
    config: SchemaConfig,

    nodes: SlotMap<EntityKey, EntityNode>,
    by_name: FxHashMap<String, EntityKey>,
    roots: Vec<EntityKey>,

    // Enumeration name (folded) -> allowed literals
    predefined_types: FxHashMap<String, Vec<String>>,
}

impl EntityHierarchy {
    /// Creates an empty hierarchy with an empty version key and default configuration.
    pub fn new() -> Self {
        Self::with_config("", SchemaConfig::default())
    }

    /// Creates an empty hierarchy for `version`.
    pub fn with_config(version: impl Into<String>, config: SchemaConfig) -> Self {
        Self {
            version: version.into(),
            config,
            nodes: SlotMap::with_key(),
            by_name: FxHashMap::default(),
            roots: Vec::new(),
            predefined_types: FxHashMap::default(),
        }
    }

    /// Schema version key this hierarchy was built for.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Number of entities, placeholders included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // --- Construction ---

    /// Adds one entity declaration.
    ///
    /// Names that neither start with the configured prefix nor equal
    /// `Entity` are ignored, as is the whole tuple when the parent name
    /// fails the same test. Re-declaring an entity updates its abstractness;
    /// its parent is only set if it has none yet.
    pub fn add(
        &mut self,
        entity_name: &str,
        parent_name: &str,
        predefined_type: Option<&str>,
        is_abstract: bool,
    ) {
        let entity_name = entity_name.trim();
        let parent_name = parent_name.trim();

        if !self.accepts(entity_name) || (!parent_name.is_empty() && !self.accepts(parent_name)) {
            tracing::trace!(
                entity = entity_name,
                parent = parent_name,
                "Skipping entity outside the schema namespace"
            );
            return;
        }
        let predefined_type = predefined_type.map(str::trim).filter(|s| !s.is_empty());

        let parent = if parent_name.is_empty() {
            None
        } else {
            Some(self.find_or_insert_placeholder(parent_name))
        };

        let folded = fold_name(entity_name);
        let Some(key) = self.by_name.get(&folded).copied() else {
            let key = self
                .nodes
                .insert(EntityNode::new(entity_name, is_abstract, predefined_type));
            self.by_name.insert(folded, key);
            match parent {
                Some(parent) => self.attach(key, parent),
                None => self.roots.push(key),
            }
            return;
        };

        let node = &mut self.nodes[key];
        node.is_abstract = is_abstract;
        if node.predefined_type.is_none() {
            node.predefined_type = predefined_type.map(str::to_string);
        }
        let existing_parent = node.parent;

        match (existing_parent, parent) {
            (None, Some(parent)) => self.attach(key, parent),
            (Some(existing), Some(parent)) if existing != parent => {
                tracing::trace!(
                    entity = entity_name,
                    parent = parent_name,
                    kept = %self.nodes[existing].name,
                    "Ignoring second parent assignment"
                );
            }
            _ => {}
        }
    }

    /// Adds a feed record.
    pub fn add_record(&mut self, record: &EntityRecord) {
        self.add(
            &record.name,
            record.parent.as_deref().unwrap_or(""),
            record.predefined_type.as_deref(),
            record.is_abstract,
        );
    }

    /// Registers the allowed values of a predefined type enumeration.
    pub fn add_predefined_type_list<I, S>(&mut self, enum_name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.predefined_types
            .insert(fold_name(enum_name), values.into_iter().map(Into::into).collect());
    }

    /// Registers an enumeration feed record.
    pub fn add_enumeration(&mut self, record: &EnumerationRecord) {
        self.add_predefined_type_list(&record.name, record.values.iter().cloned());
    }

    fn accepts(&self, name: &str) -> bool {
        let prefix = &self.config.entity_prefix;
        name.eq_ignore_ascii_case(ROOT_ENTITY)
            || (name.len() >= prefix.len()
                && name.is_char_boundary(prefix.len())
                && name[..prefix.len()].eq_ignore_ascii_case(prefix))
    }

    fn find_or_insert_placeholder(&mut self, name: &str) -> EntityKey {
        let folded = fold_name(name);
        if let Some(&key) = self.by_name.get(&folded) {
            return key;
        }
        // The root sentinel is never instantiable.
        let is_abstract = name.eq_ignore_ascii_case(ROOT_ENTITY);
        let key = self.nodes.insert(EntityNode::new(name, is_abstract, None));
        self.by_name.insert(folded, key);
        self.roots.push(key);
        key
    }

    /// Links `child` under `parent` unless that would close a cycle.
    fn attach(&mut self, child: EntityKey, parent: EntityKey) {
        if self.ancestor_keys(parent).any(|k| k == child) || parent == child {
            tracing::trace!(
                entity = %self.nodes[child].name,
                parent = %self.nodes[parent].name,
                "Rejecting parent assignment that would create a cycle"
            );
            return;
        }
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        self.roots.retain(|&k| k != child);
    }

    // --- Lookup ---

    /// Case-insensitive lookup.
    pub fn find(&self, name: &str) -> Option<&EntityNode> {
        self.find_key(name).map(|k| &self.nodes[k])
    }

    /// Case-insensitive lookup returning the arena key.
    pub fn find_key(&self, name: &str) -> Option<EntityKey> {
        self.by_name.get(&fold_name(name.trim())).copied()
    }

    pub fn node(&self, key: EntityKey) -> Option<&EntityNode> {
        self.nodes.get(key)
    }

    pub fn parent_of(&self, node: &EntityNode) -> Option<&EntityNode> {
        node.parent.and_then(|k| self.nodes.get(k))
    }

    pub fn children_of<'a>(&'a self, node: &'a EntityNode) -> impl Iterator<Item = &'a EntityNode> + 'a {
        node.children.iter().filter_map(|&k| self.nodes.get(k))
    }

    /// Nodes without a resolved parent.
    pub fn roots(&self) -> impl Iterator<Item = &EntityNode> + '_ {
        self.roots.iter().filter_map(|&k| self.nodes.get(k))
    }

    /// All entity names in insertion order.
    pub fn entity_names(&self) -> impl Iterator<Item = &str> + '_ {
        // Nodes are never removed, so slot order is insertion order.
        self.nodes.values().map(|n| n.name.as_str())
    }

    /// Abstractness of `name`, `None` if unknown.
    pub fn is_abstract(&self, name: &str) -> Option<bool> {
        self.find(name).map(EntityNode::is_abstract)
    }

    fn ancestor_keys(&self, key: EntityKey) -> impl Iterator<Item = EntityKey> + '_ {
        std::iter::successors(self.nodes.get(key).and_then(|n| n.parent), move |&k| {
            self.nodes.get(k).and_then(|n| n.parent)
        })
    }

    fn ancestors(&self, key: EntityKey) -> impl Iterator<Item = &EntityNode> + '_ {
        self.ancestor_keys(key).map(move |k| &self.nodes[k])
    }

    /// Pre-order descendants of `key`, excluding `key` itself.
    fn descendants(&self, key: EntityKey) -> Vec<&EntityNode> {
        let mut result = Vec::new();
        let Some(root) = self.nodes.get(key) else {
            return result;
        };
        let mut stack: Vec<EntityKey> = root.children.iter().rev().copied().collect();
        while let Some(k) = stack.pop() {
            let node = &self.nodes[k];
            result.push(node);
            stack.extend(node.children.iter().rev());
        }
        result
    }

    // --- Subtype queries ---

    /// Whether `sub_type` descends from `super_type`.
    ///
    /// With `strict == false` an entity is also a subtype of itself.
    pub fn is_sub_type_of(&self, sub_type: &str, super_type: &str, strict: bool) -> bool {
        let Some(key) = self.find_key(sub_type) else {
            return false;
        };
        if !strict && self.nodes[key].is_named(super_type.trim()) {
            return true;
        }
        self.ancestors(key).any(|n| n.is_named(super_type.trim()))
    }

    /// Whether `sub_type` appears in the subtree below `super_type`.
    pub fn is_super_type_of(&self, super_type: &str, sub_type: &str, strict: bool) -> bool {
        let Some(key) = self.find_key(super_type) else {
            return false;
        };
        if !strict && self.nodes[key].is_named(sub_type.trim()) {
            return true;
        }
        self.descendants(key)
            .into_iter()
            .any(|n| n.is_named(sub_type.trim()))
    }

    /// Every subtype of `name`, pre-order with children in insertion order.
    pub fn find_all_subtypes(&self, name: &str) -> Vec<&EntityNode> {
        self.find_key(name)
            .map(|k| self.descendants(k))
            .unwrap_or_default()
    }

    /// Ancestors of `name`, nearest first, stopping before the first one
    /// named in `stop_names`.
    ///
    /// Empty if `name` is unknown or is itself a stop name.
    pub fn find_all_super_types(&self, name: &str, stop_names: &[&str]) -> Vec<&EntityNode> {
        let is_stop = |candidate: &str| stop_names.iter().any(|s| s.trim().eq_ignore_ascii_case(candidate));
        let Some(key) = self.find_key(name) else {
            return Vec::new();
        };
        if is_stop(self.nodes[key].name.as_str()) {
            return Vec::new();
        }
        self.ancestors(key).take_while(|n| !is_stop(n.name.as_str())).collect()
    }

    /// Nearest non-abstract ancestor of `name`. Never `name` itself.
    pub fn find_non_abstract_super_type(&self, name: &str) -> Option<&EntityNode> {
        let key = self.find_key(name)?;
        self.ancestors(key).find(|n| !n.is_abstract)
    }

    /// Nearest concrete instance entity for a type entity.
    ///
    /// `IfcPump` and `IfcPumpType` both resolve through the ancestors of
    /// `IfcPumpType`: each ancestor `XType` is mapped to the instance entity
    /// `X` and the first non-abstract one wins. Configured supertype
    /// overrides for this hierarchy's version take precedence over the walk.
    pub fn find_non_abstract_instance_super_type(&self, name: &str) -> Option<&EntityNode> {
        let type_name = with_type_suffix(name.trim());

        if let Some(forced) = self.config.supertype_override(&self.version, &type_name) {
            tracing::debug!(
                version = %self.version,
                entity = %type_name,
                forced = %forced.forced,
                "Applying supertype override"
            );
            return self.find(&forced.forced);
        }

        let key = self.find_key(&type_name)?;
        self.ancestors(key)
            .filter(|n| has_type_suffix(&n.name))
            .filter_map(|n| self.find(strip_type_suffix(&n.name)))
            .find(|instance| !instance.is_abstract)
    }

    // --- Predefined types ---

    /// Allowed predefined type values for `name`.
    ///
    /// Tries `<Name>Enum` then `<Name>TypeEnum`, with any `Type` suffix of
    /// `name` stripped first. The enumeration declared on the entity is only
    /// used when neither naming convention is registered.
    pub fn get_predefined_type_list(&self, name: &str) -> Option<&[String]> {
        let name = name.trim();
        let stem = strip_type_suffix(name);
        let by_convention = [format!("{stem}Enum"), format!("{stem}TypeEnum")]
            .iter()
            .find_map(|candidate| self.predefined_types.get(&fold_name(candidate)));
        if let Some(list) = by_convention {
            return Some(list.as_slice());
        }

        self.find(name)
            .and_then(EntityNode::predefined_type)
            .and_then(|e| self.predefined_types.get(&fold_name(e)))
            .map(Vec::as_slice)
    }

    /// Number of registered enumerations.
    pub fn predefined_type_list_count(&self) -> usize {
        self.predefined_types.len()
    }

    // --- Diagnostics ---

    /// Indented pre-order dump of every tree, roots in insertion order.
    pub fn dump_tree(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<(EntityKey, usize)> =
            self.roots.iter().rev().map(|&k| (k, 0)).collect();

        while let Some((key, depth)) = stack.pop() {
            let node = &self.nodes[key];
            let _ = write!(out, "{:indent$}{}", "", node.name, indent = depth * 2);
            if node.is_abstract {
                out.push_str(" (ABSTRACT)");
            }
            if let Some(enum_name) = &node.predefined_type {
                let _ = write!(out, " [{enum_name}]");
            }
            out.push('\n');
            stack.extend(node.children.iter().rev().map(|&k| (k, depth + 1)));
        }
        out
    }
}

impl Default for EntityHierarchy {
    fn default() -> Self {
        Self::new()
    }
}
