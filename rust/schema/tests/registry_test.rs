// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry behaviour across versions and threads.

use std::sync::Arc;

use ifc_lite_schema::{
    CompatibilityTable, EntityRecord, EnumerationRecord, MemorySchemaSource, SchemaConfig,
    SchemaDescription, SchemaRegistry,
};

/// Flow terminal branch shared by both versions; IFC4 adds the space
/// heater and pump leaf entities.
fn flow_schema(ifc4: bool) -> SchemaDescription {
    let mut schema = SchemaDescription::new()
        .with_entity(EntityRecord::new("IfcRoot", "Entity").abstract_entity())
        .with_entity(EntityRecord::new("IfcProduct", "IfcRoot").abstract_entity())
        .with_entity(EntityRecord::new("IfcElement", "IfcProduct").abstract_entity())
        .with_entity(EntityRecord::new("IfcDistributionElement", "IfcElement"))
        .with_entity(EntityRecord::new("IfcDistributionFlowElement", "IfcDistributionElement"))
        .with_entity(EntityRecord::new("IfcFlowTerminal", "IfcDistributionFlowElement").abstract_entity())
        .with_entity(EntityRecord::new("IfcFlowMovingDevice", "IfcDistributionFlowElement"))
        .with_entity(EntityRecord::new("IfcTypeObject", "IfcRoot"))
        .with_entity(EntityRecord::new("IfcTypeProduct", "IfcTypeObject"))
        .with_entity(EntityRecord::new("IfcElementType", "IfcTypeProduct").abstract_entity())
        .with_entity(EntityRecord::new("IfcDistributionElementType", "IfcElementType"))
        .with_entity(
            EntityRecord::new("IfcDistributionFlowElementType", "IfcDistributionElementType")
                .abstract_entity(),
        )
        .with_entity(
            EntityRecord::new("IfcFlowTerminalType", "IfcDistributionFlowElementType")
                .abstract_entity(),
        )
        .with_entity(
            EntityRecord::new("IfcSpaceHeaterType", "IfcFlowTerminalType")
                .with_predefined_type("IfcSpaceHeaterTypeEnum"),
        )
        .with_enumeration(EnumerationRecord::new(
            "IfcSpaceHeaterTypeEnum",
            ["CONVECTOR", "RADIATOR", "USERDEFINED", "NOTDEFINED"],
        ));

    if ifc4 {
        schema = schema
            .with_entity(EntityRecord::new("IfcSpaceHeater", "IfcFlowTerminal"))
            .with_entity(EntityRecord::new("IfcPump", "IfcFlowMovingDevice"));
    }
    schema
}

fn registry() -> SchemaRegistry<MemorySchemaSource> {
    SchemaRegistry::new(
        MemorySchemaSource::new()
            .with_schema("IFC2X3", flow_schema(false))
            .with_schema("IFC4", flow_schema(true)),
        SchemaConfig::default(),
    )
}

#[test]
fn versions_are_cached_separately() {
    let registry = registry();
    let legacy = registry.get_hierarchy("IFC2X3").unwrap();
    let modern = registry.get_hierarchy("IFC4").unwrap();

    assert!(!Arc::ptr_eq(&legacy, &modern));
    assert!(legacy.find("IfcPump").is_none());
    assert!(modern.is_sub_type_of("IfcPump", "IfcDistributionFlowElement", true));
    assert_eq!(registry.cached_versions(), vec!["IFC2X3".to_string(), "IFC4".to_string()]);
}

#[test]
fn space_heater_override_applies_to_legacy_only() {
    let registry = registry();

    let legacy = registry.get_hierarchy("IFC2X3").unwrap();
    let resolved = legacy.find_non_abstract_instance_super_type("IfcSpaceHeaterType").unwrap();
    assert_eq!(resolved.name(), "IfcFlowTerminal");

    let modern = registry.get_hierarchy("IFC4").unwrap();
    let resolved = modern.find_non_abstract_instance_super_type("IfcSpaceHeater").unwrap();
    assert_eq!(resolved.name(), "IfcDistributionFlowElement");
}

#[test]
fn downgrade_through_compatibility_table() {
    let registry = registry();
    let legacy = registry.get_hierarchy("IFC2X3").unwrap();
    let table = CompatibilityTable::builtin();

    for ifc4_type in ["IfcPump", "IfcSpaceHeater", "IfcFlowTerminal"] {
        let target = table.try_get_legacy_supertype(ifc4_type).unwrap();
        assert!(legacy.find(target).is_some(), "{target} missing from IFC2X3");
    }
}

#[test]
fn predefined_types_resolve_from_instance_name() {
    let registry = registry();
    let modern = registry.get_hierarchy("IFC4").unwrap();
    let values = modern.get_predefined_type_list("IfcSpaceHeater").unwrap();
    assert_eq!(values.first().map(String::as_str), Some("CONVECTOR"));
    assert_eq!(values.len(), 4);
}

#[test]
fn concurrent_readers_share_one_hierarchy() {
    let registry = Arc::new(registry());

    let hierarchies: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                scope.spawn(move || {
                    let tree = registry.get_hierarchy("IFC4").unwrap();
                    let index = registry.name_index("IFC4").unwrap();
                    assert!(tree.is_super_type_of("IfcElement", "IfcPump", true));
                    assert_eq!(index.search("heater"), vec!["IfcSpaceHeater", "IfcSpaceHeaterType"]);
                    tree
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let first = &hierarchies[0];
    assert!(hierarchies.iter().all(|h| Arc::ptr_eq(h, first)));
}
