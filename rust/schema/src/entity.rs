// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity nodes and the records a schema loader feeds into a hierarchy.

use crate::keys::EntityKey;

/// Literal suffix carried by IFC type-object entities (`IfcWallType`).
pub(crate) const TYPE_SUFFIX: &str = "Type";

/// Root sentinel that every IFC schema tree hangs from.
pub const ROOT_ENTITY: &str = "Entity";

/// A single named entity in a schema hierarchy.
///
/// Nodes are owned by their [`EntityHierarchy`](crate::EntityHierarchy);
/// `parent` and `children` are arena keys into the same hierarchy.
#[derive(Debug, Clone)]
pub struct EntityNode {
    pub(crate) name: String,
    pub(crate) is_abstract: bool,
    pub(crate) predefined_type: Option<String>,
    pub(crate) parent: Option<EntityKey>,
    pub(crate) children: Vec<EntityKey>,
}

impl EntityNode {
    pub(crate) fn new(name: &str, is_abstract: bool, predefined_type: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            is_abstract,
            predefined_type: predefined_type.map(str::to_string),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Entity name with its original casing.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Abstract entities cannot be instantiated directly.
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Name of the predefined type enumeration declared for this entity.
    pub fn predefined_type(&self) -> Option<&str> {
        self.predefined_type.as_deref()
    }

    /// Key of the supertype, `None` for a root.
    pub fn parent(&self) -> Option<EntityKey> {
        self.parent
    }

    /// Keys of the direct subtypes, in insertion order.
    pub fn children(&self) -> &[EntityKey] {
        &self.children
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// One `(entityName, parentName, predefinedTypeEnum, isAbstract)` tuple from
/// a schema loader.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityRecord {
    pub name: String,
    /// Empty or `None` means the entity declares no supertype.
    pub parent: Option<String>,
    pub predefined_type: Option<String>,
    pub is_abstract: bool,
}

impl EntityRecord {
    /// Concrete entity with the given supertype.
    pub fn new(name: impl Into<String>, parent: impl Into<String>) -> Self {
        let parent = parent.into();
        Self {
            name: name.into(),
            parent: (!parent.is_empty()).then_some(parent),
            predefined_type: None,
            is_abstract: false,
        }
    }

    /// Marks the entity abstract.
    pub fn abstract_entity(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Attaches a predefined type enumeration name.
    pub fn with_predefined_type(mut self, enum_name: impl Into<String>) -> Self {
        self.predefined_type = Some(enum_name.into());
        self
    }
}

/// An enumeration and its allowed literal values, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumerationRecord {
    pub name: String,
    pub values: Vec<String>,
}

impl EnumerationRecord {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Lookup key for case-insensitive name maps.
#[inline]
pub(crate) fn fold_name(name: &str) -> String {
    name.to_ascii_uppercase()
}

/// `true` when `name` ends in `Type`, ignoring case.
pub(crate) fn has_type_suffix(name: &str) -> bool {
    name.len() > TYPE_SUFFIX.len()
        && name.is_char_boundary(name.len() - TYPE_SUFFIX.len())
        && name[name.len() - TYPE_SUFFIX.len()..].eq_ignore_ascii_case(TYPE_SUFFIX)
}

/// `IfcWallType` → `IfcWall`; names without the suffix are returned as-is.
pub(crate) fn strip_type_suffix(name: &str) -> &str {
    if has_type_suffix(name) {
        &name[..name.len() - TYPE_SUFFIX.len()]
    } else {
        name
    }
}

/// `IfcWall` → `IfcWallType`; names already suffixed are returned as-is.
pub(crate) fn with_type_suffix(name: &str) -> String {
    if has_type_suffix(name) {
        name.to_string()
    } else {
        format!("{name}{TYPE_SUFFIX}")
    }
}
