// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC4 → IFC2x3 compatibility table.
//!
//! Many IFC4 concrete leaf entities have no IFC2x3 counterpart. Exporters
//! targeting the older schema substitute the nearest IFC2x3 supertype,
//! e.g. `IfcPump` is written as `IfcFlowMovingDevice`. The table also maps
//! each legacy bucket onto itself so one lookup answers both "needs
//! translation" and "already fine".

use rustc_hash::FxHashMap;
use std::sync::OnceLock;

use crate::entity::fold_name;

/// Static lookup from a concrete entity to the legacy entity to export instead.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityTable {
    // Folded concrete name -> legacy supertype
    entries: FxHashMap<String, String>,
}

impl CompatibilityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a mapping.
    pub fn insert(&mut self, concrete: &str, legacy: &str) {
        self.entries.insert(fold_name(concrete), legacy.to_string());
    }

    /// Legacy supertype for `concrete`, case-insensitive.
    pub fn try_get_legacy_supertype(&self, concrete: &str) -> Option<&str> {
        self.entries
            .get(&fold_name(concrete.trim()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Process-wide IFC4 → IFC2x3 table, built on first use.
    pub fn builtin() -> &'static CompatibilityTable {
        static BUILTIN: OnceLock<CompatibilityTable> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let mut table = CompatibilityTable::new();
            for &(legacy, concrete_types) in IFC4_TO_IFC2X3 {
                table.insert(legacy, legacy);
                for concrete in concrete_types {
                    table.insert(concrete, legacy);
                }
            }
            tracing::debug!(entries = table.len(), "Initialised IFC4 compatibility table");
            table
        })
    }
}

/// Legacy bucket and the IFC4 leaf entities that collapse onto it.
const IFC4_TO_IFC2X3: &[(&str, &[&str])] = &[
    (
        "IfcFlowController",
        &[
            "IfcAirTerminalBox",
            "IfcDamper",
            "IfcElectricDistributionBoard",
            "IfcElectricTimeControl",
            "IfcFlowMeter",
            "IfcProtectiveDevice",
            "IfcSwitchingDevice",
            "IfcValve",
        ],
    ),
    (
        "IfcFlowFitting",
        &[
            "IfcCableCarrierFitting",
            "IfcCableFitting",
            "IfcDuctFitting",
            "IfcJunctionBox",
            "IfcPipeFitting",
        ],
    ),
    ("IfcFlowMovingDevice", &["IfcCompressor", "IfcFan", "IfcPump"]),
    (
        "IfcFlowSegment",
        &[
            "IfcCableCarrierSegment",
            "IfcCableSegment",
            "IfcDuctSegment",
            "IfcPipeSegment",
        ],
    ),
    ("IfcFlowStorageDevice", &["IfcElectricFlowStorageDevice", "IfcTank"]),
    (
        "IfcFlowTerminal",
        &[
            "IfcAirTerminal",
            "IfcAudioVisualAppliance",
            "IfcCommunicationsAppliance",
            "IfcElectricAppliance",
            "IfcFireSuppressionTerminal",
            "IfcLamp",
            "IfcLightFixture",
            "IfcMedicalDevice",
            "IfcOutlet",
            "IfcSanitaryTerminal",
            "IfcSpaceHeater",
            "IfcStackTerminal",
            "IfcWasteTerminal",
        ],
    ),
    (
        "IfcFlowTreatmentDevice",
        &["IfcDuctSilencer", "IfcFilter", "IfcInterceptor"],
    ),
    (
        "IfcEnergyConversionDevice",
        &[
            "IfcAirToAirHeatRecovery",
            "IfcBoiler",
            "IfcBurner",
            "IfcChiller",
            "IfcCoil",
            "IfcCondenser",
            "IfcCooledBeam",
            "IfcCoolingTower",
            "IfcElectricGenerator",
            "IfcElectricMotor",
            "IfcEngine",
            "IfcEvaporativeCooler",
            "IfcEvaporator",
            "IfcHeatExchanger",
            "IfcHumidifier",
            "IfcMotorConnection",
            "IfcSolarDevice",
            "IfcTransformer",
            "IfcTubeBundle",
            "IfcUnitaryEquipment",
        ],
    ),
    (
        "IfcDistributionControlElement",
        &[
            "IfcActuator",
            "IfcAlarm",
            "IfcController",
            "IfcFlowInstrument",
            "IfcProtectiveDeviceTrippingUnit",
            "IfcSensor",
            "IfcUnitaryControlElement",
        ],
    ),
    (
        "IfcBuildingElementProxy",
        &[
            "IfcChimney",
            "IfcCivilElement",
            "IfcGeographicElement",
            "IfcShadingDevice",
        ],
    ),
    ("IfcDistributionChamberElement", &[]),
];
