// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Schema configuration loaded from environment variables.

use crate::error::{Error, Result};

/// Forces the non-abstract instance supertype of a type entity for schema
/// versions starting with `version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupertypeOverride {
    pub version: String,
    pub type_name: String,
    pub forced: String,
}

impl SupertypeOverride {
    pub fn new(
        version: impl Into<String>,
        type_name: impl Into<String>,
        forced: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            type_name: type_name.into(),
            forced: forced.into(),
        }
    }

    /// Whether this override applies to `version` / `type_name`.
    pub fn matches(&self, version: &str, type_name: &str) -> bool {
        let prefix = self.version.len();
        version.len() >= prefix
            && version.is_char_boundary(prefix)
            && version[..prefix].eq_ignore_ascii_case(&self.version)
            && self.type_name.eq_ignore_ascii_case(type_name)
    }

    /// Parse `VERSION:TypeName=Forced;VERSION:TypeName=Forced`.
    pub fn parse_list(input: &str) -> Result<Vec<Self>> {
        input
            .split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (version, rest) = entry
                    .split_once(':')
                    .ok_or_else(|| Error::InvalidOverride(entry.to_string()))?;
                let (type_name, forced) = rest
                    .split_once('=')
                    .ok_or_else(|| Error::InvalidOverride(entry.to_string()))?;
                let (version, type_name, forced) = (version.trim(), type_name.trim(), forced.trim());
                if version.is_empty() || type_name.is_empty() || forced.is_empty() {
                    return Err(Error::InvalidOverride(entry.to_string()));
                }
                Ok(Self::new(version, type_name, forced))
            })
            .collect()
    }

    /// IFC2x2/IFC2x3 implementer agreement: space heater types export as
    /// flow terminals.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("IFC2X2", "IfcSpaceHeaterType", "IfcFlowTerminal"),
            Self::new("IFC2X3", "IfcSpaceHeaterType", "IfcFlowTerminal"),
        ]
    }
}

/// Schema hierarchy configuration.
#[derive(Debug, Clone)]
pub struct SchemaConfig {
    /// Reserved prefix every domain entity name starts with.
    pub entity_prefix: String,
    /// Supertype overrides consulted by instance supertype resolution.
    pub supertype_overrides: Vec<SupertypeOverride>,
}

impl SchemaConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            entity_prefix: std::env::var("IFC_SCHEMA_ENTITY_PREFIX")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "Ifc".into()),
            supertype_overrides: match std::env::var("IFC_SUPERTYPE_OVERRIDES") {
                Ok(raw) => SupertypeOverride::parse_list(&raw).unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "Ignoring IFC_SUPERTYPE_OVERRIDES");
                    SupertypeOverride::defaults()
                }),
                Err(_) => SupertypeOverride::defaults(),
            },
        }
    }

    /// Override for `type_name` under `version`, if any.
    pub fn supertype_override(&self, version: &str, type_name: &str) -> Option<&SupertypeOverride> {
        self.supertype_overrides
            .iter()
            .find(|o| o.matches(version, type_name))
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            entity_prefix: "Ifc".into(),
            supertype_overrides: SupertypeOverride::defaults(),
        }
    }
}
