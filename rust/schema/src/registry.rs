// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-version cache of schema hierarchies.
//!
//! A [`SchemaRegistry`] builds each [`EntityHierarchy`] at most once from a
//! [`SchemaSource`] and then hands out shared, read-only `Arc`s. Building
//! happens without holding the cache lock; if two threads race on the same
//! version the first inserted hierarchy wins and both callers receive it.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::SchemaConfig;
use crate::entity::{fold_name, EntityRecord, EnumerationRecord};
use crate::error::{Error, Result};
use crate::hierarchy::EntityHierarchy;
use crate::name_index::EntityNameIndex;

/// Everything a loader knows about one schema version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchemaDescription {
    pub entities: Vec<EntityRecord>,
    pub enumerations: Vec<EnumerationRecord>,
}

impl SchemaDescription {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entity(mut self, record: EntityRecord) -> Self {
        self.entities.push(record);
        self
    }

    pub fn with_enumeration(mut self, record: EnumerationRecord) -> Self {
        self.enumerations.push(record);
        self
    }

    /// Feeds every record into a fresh hierarchy.
    pub fn build(&self, version: &str, config: SchemaConfig) -> EntityHierarchy {
        let mut hierarchy = EntityHierarchy::with_config(version, config);
        for record in &self.entities {
            hierarchy.add_record(record);
        }
        for record in &self.enumerations {
            hierarchy.add_enumeration(record);
        }
        hierarchy
    }
}

/// Locates the schema description for a version key.
///
/// Implementations report a missing schema with [`Error::SchemaNotFound`].
pub trait SchemaSource: Send + Sync {
    fn load(&self, version: &str) -> Result<SchemaDescription>;
}

impl<F> SchemaSource for F
where
    F: Fn(&str) -> Result<SchemaDescription> + Send + Sync,
{
    fn load(&self, version: &str) -> Result<SchemaDescription> {
        self(version)
    }
}

/// In-memory schema source keyed by case-insensitive version.
#[derive(Debug, Clone, Default)]
pub struct MemorySchemaSource {
    schemas: FxHashMap<String, SchemaDescription>,
}

impl MemorySchemaSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, version: &str, description: SchemaDescription) {
        self.schemas.insert(fold_name(version), description);
    }

    pub fn with_schema(mut self, version: &str, description: SchemaDescription) -> Self {
        self.insert(version, description);
        self
    }
}

impl SchemaSource for MemorySchemaSource {
    fn load(&self, version: &str) -> Result<SchemaDescription> {
        self.schemas
            .get(&fold_name(version))
            .cloned()
            .ok_or_else(|| Error::not_found(version))
    }
}

/// Lazily built, shared hierarchies and name indices per schema version.
pub struct SchemaRegistry<S> {
    source: S,
    config: SchemaConfig,
    hierarchies: RwLock<FxHashMap<String, Arc<EntityHierarchy>>>,
    indices: RwLock<FxHashMap<String, Arc<EntityNameIndex>>>,
}

impl<S: SchemaSource> SchemaRegistry<S> {
    pub fn new(source: S, config: SchemaConfig) -> Self {
        Self {
            source,
            config,
            hierarchies: RwLock::new(FxHashMap::default()),
            indices: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Hierarchy for `version`, built from the source on first request.
    pub fn get_hierarchy(&self, version: &str) -> Result<Arc<EntityHierarchy>> {
        let key = fold_name(version.trim());

        // Fast path: already built (read lock)
        if let Some(hierarchy) = self.hierarchies.read().get(&key) {
            tracing::trace!(version, "Serving cached schema hierarchy");
            return Ok(Arc::clone(hierarchy));
        }

        // Slow path: build without holding the lock
        let description = self.source.load(version.trim()).map_err(|e| {
            tracing::warn!(version, error = %e, "Failed to locate schema description");
            e
        })?;
        let built = description.build(version.trim(), self.config.clone());
        tracing::debug!(
            version,
            entities = built.len(),
            roots = built.roots().count(),
            enumerations = built.predefined_type_list_count(),
            "Built schema hierarchy"
        );

        // A concurrent builder may have won; keep its instance.
        let mut hierarchies = self.hierarchies.write();
        Ok(Arc::clone(
            hierarchies.entry(key).or_insert_with(|| Arc::new(built)),
        ))
    }

    /// Substring index over every entity name of `version`.
    pub fn name_index(&self, version: &str) -> Result<Arc<EntityNameIndex>> {
        let key = fold_name(version.trim());

        if let Some(index) = self.indices.read().get(&key) {
            return Ok(Arc::clone(index));
        }

        let hierarchy = self.get_hierarchy(version)?;
        let built = EntityNameIndex::from_hierarchy(&hierarchy);

        let mut indices = self.indices.write();
        Ok(Arc::clone(indices.entry(key).or_insert_with(|| Arc::new(built))))
    }

    /// Whether a hierarchy for `version` has already been built.
    pub fn is_loaded(&self, version: &str) -> bool {
        self.hierarchies
            .read()
            .contains_key(&fold_name(version.trim()))
    }

    /// Folded version keys of every built hierarchy, sorted.
    pub fn cached_versions(&self) -> Vec<String> {
        let mut versions: Vec<String> = self.hierarchies.read().keys().cloned().collect();
        versions.sort_unstable();
        versions
    }
}

// Sources are often closures, so the source itself is not printed.
impl<S> fmt::Debug for SchemaRegistry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut versions: Vec<String> = self.hierarchies.read().keys().cloned().collect();
        versions.sort_unstable();
        f.debug_struct("SchemaRegistry")
            .field("config", &self.config)
            .field("hierarchies", &versions)
            .field("indices", &self.indices.read().len())
            .finish_non_exhaustive()
    }
}
