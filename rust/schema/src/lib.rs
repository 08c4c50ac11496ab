// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-Lite Schema
//!
//! IFC schema entity model: supertype/subtype hierarchies per schema
//! version, a substring index over entity names, and the IFC4 → IFC2x3
//! compatibility table used when downgrading exports.
//!
//! ## Overview
//!
//! - **[`EntityHierarchy`]**: arena-backed single-inheritance tree fed by
//!   `(entity, parent, predefinedTypeEnum, isAbstract)` tuples in any order.
//!   Answers subtype tests, ancestor/descendant walks, nearest concrete
//!   supertype resolution and predefined type lookups.
//! - **[`EntityNameIndex`]**: trie answering "which names contain this
//!   substring" for interactive filtering.
//! - **[`CompatibilityTable`]**: static IFC4 leaf type → IFC2x3 supertype map.
//! - **[`SchemaRegistry`]**: builds one hierarchy per schema version from a
//!   [`SchemaSource`] and caches it for the process lifetime.
//!
//! ## Quick Start
//!
//! ```rust
//! use ifc_lite_schema::{
//!     EntityRecord, MemorySchemaSource, SchemaConfig, SchemaDescription, SchemaRegistry,
//! };
//!
//! let ifc4 = SchemaDescription::new()
//!     .with_entity(EntityRecord::new("IfcElement", "Entity").abstract_entity())
//!     .with_entity(EntityRecord::new("IfcWall", "IfcElement"));
//! let registry = SchemaRegistry::new(
//!     MemorySchemaSource::new().with_schema("IFC4", ifc4),
//!     SchemaConfig::default(),
//! );
//!
//! let tree = registry.get_hierarchy("IFC4")?;
//! assert!(tree.is_sub_type_of("IfcWall", "IfcElement", true));
//!
//! let index = registry.name_index("IFC4")?;
//! assert_eq!(index.search("wall"), vec!["IfcWall"]);
//! # Ok::<(), ifc_lite_schema::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for schema feed records

pub mod compatibility;
pub mod config;
pub mod entity;
pub mod error;
pub mod hierarchy;
pub mod keys;
pub mod name_index;
pub mod registry;

pub use compatibility::CompatibilityTable;
pub use config::{SchemaConfig, SupertypeOverride};
pub use entity::{EntityNode, EntityRecord, EnumerationRecord, ROOT_ENTITY};
pub use error::{Error, Result};
pub use hierarchy::EntityHierarchy;
pub use keys::EntityKey;
pub use name_index::EntityNameIndex;
pub use registry::{MemorySchemaSource, SchemaDescription, SchemaRegistry, SchemaSource};
