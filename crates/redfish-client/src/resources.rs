// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Typed views of the Redfish resource tree.
//!
//! Every measurement field is an `Option` so that a value the endpoint does
//! not report stays distinguishable from a legitimate zero reading.
//! Categorical fields stay as the raw wire strings; encoding them into
//! ordinals is the collector's job.

use serde::Deserialize;

/// A `@odata.id` reference to another resource.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct ODataRef {
    #[serde(rename = "@odata.id", default)]
    pub odata_id: String,
}

/// A Redfish resource collection: a list of member references.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Collection {
    pub members: Vec<ODataRef>,
}

/// Common `Status` block carried by nearly every resource.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Status {
    pub health: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct ServiceRootLinks {
    pub sessions: Option<ODataRef>,
}

/// `/redfish/v1/` service root.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct ServiceRoot {
    pub chassis: Option<ODataRef>,
    pub systems: Option<ODataRef>,
    pub managers: Option<ODataRef>,
    pub links: ServiceRootLinks,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct PhysicalSecurity {
    pub intrusion_sensor: Option<String>,
    pub intrusion_sensor_number: Option<i64>,
    pub intrusion_sensor_re_arm: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Chassis {
    pub id: String,
    pub name: String,
    pub chassis_type: Option<String>,
    pub power_state: Option<String>,
    pub physical_security: Option<PhysicalSecurity>,
    pub status: Status,
    pub thermal: Option<ODataRef>,
    pub power: Option<ODataRef>,
    pub network_adapters: Option<ODataRef>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Thermal {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub fans: Vec<Fan>,
    pub temperatures: Vec<Temperature>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Fan {
    pub member_id: String,
    pub name: String,
    pub reading: Option<f64>,
    pub reading_units: Option<String>,
    pub sensor_number: Option<i64>,
    pub physical_context: Option<String>,
    pub status: Status,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Temperature {
    pub member_id: String,
    pub name: String,
    pub reading_celsius: Option<f64>,
    pub sensor_number: Option<i64>,
    pub physical_context: Option<String>,
    pub status: Status,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Power {
    pub id: String,
    pub name: String,
    pub power_control: Vec<PowerControl>,
    pub power_supplies: Vec<PowerSupply>,
    pub voltages: Vec<Voltage>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct PowerLimit {
    pub limit_in_watts: Option<f64>,
    pub correction_in_ms: Option<i64>,
    pub limit_exception: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct PowerControl {
    pub member_id: String,
    pub name: String,
    pub power_allocated_watts: Option<f64>,
    pub power_capacity_watts: Option<f64>,
    pub power_consumed_watts: Option<f64>,
    pub power_requested_watts: Option<f64>,
    pub power_limit: Option<PowerLimit>,
    pub status: Status,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct PowerSupply {
    pub member_id: String,
    pub name: String,
    pub power_supply_type: Option<String>,
    pub efficiency_percent: Option<f64>,
    pub line_input_voltage: Option<f64>,
    pub line_input_voltage_type: Option<String>,
    pub power_capacity_watts: Option<f64>,
    pub power_input_watts: Option<f64>,
    pub power_output_watts: Option<f64>,
    pub status: Status,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Voltage {
    pub member_id: String,
    pub name: String,
    pub reading_volts: Option<f64>,
    pub sensor_number: Option<i64>,
    pub physical_context: Option<String>,
    pub status: Status,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct NetworkAdapter {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub network_ports: Option<ODataRef>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct NetworkPort {
    pub id: String,
    pub name: String,
    pub active_link_technology: Option<String>,
    pub current_link_speed_mbps: Option<f64>,
    pub link_status: Option<String>,
    pub status: Status,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct ComputerSystem {
    pub id: String,
    pub name: String,
    pub system_type: Option<String>,
    pub power_state: Option<String>,
    pub status: Status,
    pub ethernet_interfaces: Option<ODataRef>,
    pub memory: Option<ODataRef>,
    pub network_interfaces: Option<ODataRef>,
    // Direct list of device references, not a collection resource. The same
    // device can be linked more than once.
    #[serde(rename = "PCIeDevices")]
    pub pcie_devices: Vec<ODataRef>,
    pub processors: Option<ODataRef>,
    pub storage: Option<ODataRef>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct EthernetInterface {
    pub id: String,
    pub name: String,
    pub ethernet_interface_type: Option<String>,
    #[serde(rename = "MACAddress")]
    pub mac_address: Option<String>,
    pub interface_enabled: Option<bool>,
    pub speed_mbps: Option<f64>,
    pub full_duplex: Option<bool>,
    pub link_status: Option<String>,
    pub status: Status,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Memory {
    pub id: String,
    pub name: String,
    pub memory_type: Option<String>,
    #[serde(rename = "CacheSizeMiB")]
    pub cache_size_mib: Option<f64>,
    #[serde(rename = "CapacityMiB")]
    pub capacity_mib: Option<f64>,
    #[serde(rename = "NonVolatileSizeMiB")]
    pub non_volatile_size_mib: Option<f64>,
    pub operating_speed_mhz: Option<f64>,
    #[serde(rename = "VolatileSizeMiB")]
    pub volatile_size_mib: Option<f64>,
    pub status: Status,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct NetworkInterface {
    pub id: String,
    pub name: String,
    pub status: Status,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct PCIeDevice {
    pub id: String,
    pub name: String,
    pub device_type: Option<String>,
    pub status: Status,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Processor {
    pub id: String,
    pub name: String,
    pub processor_type: Option<String>,
    #[serde(rename = "MaxSpeedMHz")]
    pub max_speed_mhz: Option<f64>,
    #[serde(rename = "MaxTDPWatts")]
    pub max_tdp_watts: Option<f64>,
    #[serde(rename = "TDPWatts")]
    pub tdp_watts: Option<f64>,
    pub total_cores: Option<i64>,
    pub total_enabled_cores: Option<i64>,
    pub total_threads: Option<i64>,
    pub status: Status,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Storage {
    pub id: String,
    pub name: String,
    pub status: Status,
    pub storage_controllers: Vec<StorageController>,
    pub drives: Vec<ODataRef>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct CacheSummary {
    #[serde(rename = "PersistentCacheSizeMiB")]
    pub persistent_cache_size_mib: Option<f64>,
    #[serde(rename = "TotalCacheSizeMiB")]
    pub total_cache_size_mib: Option<f64>,
    pub status: Option<Status>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct StorageController {
    pub member_id: String,
    pub name: String,
    pub speed_gbps: Option<f64>,
    pub cache_summary: Option<CacheSummary>,
    pub status: Status,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Drive {
    pub id: String,
    pub name: String,
    pub media_type: Option<String>,
    pub capable_speed_gbs: Option<f64>,
    pub capacity_bytes: Option<f64>,
    pub failure_predicted: Option<bool>,
    pub negotiated_speed_gbs: Option<f64>,
    pub write_cache_enabled: Option<bool>,
    pub encryption_ability: Option<String>,
    pub encryption_status: Option<String>,
    pub hotspare_type: Option<String>,
    pub hotspare_replacement_mode: Option<String>,
    #[serde(rename = "RotationSpeedRPM")]
    pub rotation_speed_rpm: Option<f64>,
    pub predicted_media_life_left_percent: Option<f64>,
    pub status_indicator: Option<String>,
    pub status: Status,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct ConsoleService {
    pub service_enabled: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Manager {
    pub id: String,
    pub name: String,
    pub manager_type: Option<String>,
    pub power_state: Option<String>,
    pub command_shell: Option<ConsoleService>,
    pub graphical_console: Option<ConsoleService>,
    pub serial_console: Option<ConsoleService>,
    pub status: Status,
    pub ethernet_interfaces: Option<ODataRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_reading_stays_none() {
        let fan: Fan = serde_json::from_str(r#"{"MemberId": "0", "Name": "Fan 0"}"#)
            .expect("fan should parse");
        assert_eq!(fan.member_id, "0");
        assert!(fan.reading.is_none());
        assert!(fan.status.health.is_none());
    }

    #[test]
    fn test_zero_reading_is_not_missing() {
        let fan: Fan = serde_json::from_str(r#"{"MemberId": "0", "Reading": 0}"#)
            .expect("fan should parse");
        assert_eq!(fan.reading, Some(0.0));
    }

    #[test]
    fn test_mixed_case_acronym_fields() {
        let memory: Memory = serde_json::from_str(
            r#"{"Id": "DIMM0", "CapacityMiB": 16384, "OperatingSpeedMhz": 2933}"#,
        )
        .expect("memory should parse");
        assert_eq!(memory.capacity_mib, Some(16384.0));
        assert_eq!(memory.operating_speed_mhz, Some(2933.0));

        let processor: Processor =
            serde_json::from_str(r#"{"Id": "CPU0", "MaxSpeedMHz": 3800, "TDPWatts": 165}"#)
                .expect("processor should parse");
        assert_eq!(processor.max_speed_mhz, Some(3800.0));
        assert_eq!(processor.tdp_watts, Some(165.0));
    }

    #[test]
    fn test_pcie_device_links_are_plain_refs() {
        let system: ComputerSystem = serde_json::from_str(
            r#"{
                "Id": "1",
                "PCIeDevices": [
                    {"@odata.id": "/redfish/v1/Systems/1/PCIeDevices/GPU0"},
                    {"@odata.id": "/redfish/v1/Systems/1/PCIeDevices/GPU0"}
                ]
            }"#,
        )
        .expect("system should parse");
        assert_eq!(system.pcie_devices.len(), 2);
        assert_eq!(
            system.pcie_devices[0].odata_id,
            "/redfish/v1/Systems/1/PCIeDevices/GPU0"
        );
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let chassis: Chassis = serde_json::from_str(
            r#"{
                "Id": "1U",
                "Name": "Computer System Chassis",
                "ChassisType": "RackMount",
                "PowerState": "On",
                "Oem": {"Vendor": {"Opaque": true}},
                "Status": {"Health": "OK", "State": "Enabled"},
                "Thermal": {"@odata.id": "/redfish/v1/Chassis/1U/Thermal"}
            }"#,
        )
        .expect("chassis should parse");
        assert_eq!(chassis.power_state.as_deref(), Some("On"));
        assert_eq!(
            chassis.thermal.as_ref().map(|r| r.odata_id.as_str()),
            Some("/redfish/v1/Chassis/1U/Thermal")
        );
    }
}
