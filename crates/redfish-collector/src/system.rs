// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Computer system subtree: ethernet interfaces, memory modules, network
//! interfaces, PCIe devices (deduplicated by id), processors and storage
//! with its controllers and drives.

use crate::emit::{
    gauge, status_gauges, with_labels, Label, SampleSink, GIGA, MEBI, MEGA, POWER_STATE_DOC,
};
use crate::encode;
use crate::error::CollectError;
use crate::Collector;
use async_trait::async_trait;
use redfish_client::resources::{
    ComputerSystem, Drive, EthernetInterface, Memory, NetworkInterface, PCIeDevice, Processor,
    Storage, StorageController,
};
use redfish_client::ApiClient;
use std::collections::HashSet;
use std::sync::Arc;

const SUBSYSTEM: &str = "system";

pub struct SystemCollector {
    client: Arc<ApiClient>,
}

impl SystemCollector {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    fn process_system(&self, sink: &SampleSink, system: &ComputerSystem) {
        let labels: Vec<Label> = vec![
            ("id", system.id.clone()),
            ("name", system.name.clone()),
            ("system_id", system.id.clone()),
            ("system_type", system.system_type.clone().unwrap_or_default()),
        ];

        if let Some(ordinal) = system.power_state.as_deref().and_then(encode::power_state) {
            gauge(
                sink,
                SUBSYSTEM,
                "power_state",
                format!("System power state; {POWER_STATE_DOC}"),
                &labels,
                ordinal,
            );
        }

        status_gauges(sink, SUBSYSTEM, "", "System", &system.status, &labels);
    }

    fn process_ethernet_interface(
        &self,
        sink: &SampleSink,
        intf: &EthernetInterface,
        system_id: &str,
    ) {
        let labels: Vec<Label> = vec![
            ("id", intf.id.clone()),
            ("name", intf.name.clone()),
            ("system_id", system_id.to_string()),
            (
                "interface_type",
                intf.ethernet_interface_type.clone().unwrap_or_default(),
            ),
            (
                "address",
                intf.mac_address
                    .as_deref()
                    .map(str::to_lowercase)
                    .unwrap_or_default(),
            ),
        ];

        if let Some(enabled) = intf.interface_enabled {
            gauge(
                sink,
                SUBSYSTEM,
                "ethernet_interface_status",
                "Ethernet interface status; 0: Disabled, 1: Enabled",
                &labels,
                encode::bool_gauge(enabled),
            );
        }

        if let Some(mbps) = intf.speed_mbps {
            let labels = with_labels(
                &labels,
                &[(
                    "duplex",
                    if intf.full_duplex.unwrap_or(false) {
                        "full".to_string()
                    } else {
                        "half".to_string()
                    },
                )],
            );
            gauge(
                sink,
                SUBSYSTEM,
                "ethernet_interface_speed_bytes",
                "Ethernet interface speed, bytes/s",
                &labels,
                mbps * MEGA / 8.0,
            );
        }

        if let Some(ordinal) = intf
            .link_status
            .as_deref()
            .and_then(encode::interface_link_status)
        {
            gauge(
                sink,
                SUBSYSTEM,
                "ethernet_interface_link_status",
                "Ethernet interface link status; 0: LinkDown, 1: LinkUp, 2: NoLink",
                &labels,
                ordinal,
            );
        }

        status_gauges(
            sink,
            SUBSYSTEM,
            "ethernet_interface_",
            "Ethernet interface",
            &intf.status,
            &labels,
        );
    }

    fn process_memory(&self, sink: &SampleSink, memory: &Memory, system_id: &str) {
        let labels: Vec<Label> = vec![
            ("id", memory.id.clone()),
            ("name", memory.name.clone()),
            ("system_id", system_id.to_string()),
            ("memory_type", memory.memory_type.clone().unwrap_or_default()),
        ];

        if let Some(mib) = memory.cache_size_mib {
            gauge(
                sink,
                SUBSYSTEM,
                "memory_cache_size_bytes",
                "Memory cache size, bytes",
                &labels,
                mib * MEBI,
            );
        }
        if let Some(mib) = memory.capacity_mib {
            gauge(
                sink,
                SUBSYSTEM,
                "memory_capacity_bytes",
                "Memory capacity, bytes",
                &labels,
                mib * MEBI,
            );
        }
        if let Some(mib) = memory.non_volatile_size_mib {
            gauge(
                sink,
                SUBSYSTEM,
                "memory_non_volatile_size_bytes",
                "Memory non-volatile size, bytes",
                &labels,
                mib * MEBI,
            );
        }
        if let Some(mhz) = memory.operating_speed_mhz {
            gauge(
                sink,
                SUBSYSTEM,
                "memory_operating_speed_hertz",
                "Memory operating speed, Hz",
                &labels,
                mhz * MEGA,
            );
        }
        if let Some(mib) = memory.volatile_size_mib {
            gauge(
                sink,
                SUBSYSTEM,
                "memory_volatile_size_bytes",
                "Memory volatile size, bytes",
                &labels,
                mib * MEBI,
            );
        }

        status_gauges(sink, SUBSYSTEM, "memory_", "Memory", &memory.status, &labels);
    }

    fn process_network_interface(&self, sink: &SampleSink, intf: &NetworkInterface, system_id: &str) {
        let labels: Vec<Label> = vec![
            ("id", intf.id.clone()),
            ("name", intf.name.clone()),
            ("system_id", system_id.to_string()),
        ];
        status_gauges(
            sink,
            SUBSYSTEM,
            "network_interface_",
            "Network interface",
            &intf.status,
            &labels,
        );
    }

    fn process_pcie_device(&self, sink: &SampleSink, device: &PCIeDevice, system_id: &str) {
        let labels: Vec<Label> = vec![
            ("id", device.id.clone()),
            ("name", device.name.clone()),
            ("system_id", system_id.to_string()),
            ("device_type", device.device_type.clone().unwrap_or_default()),
        ];
        status_gauges(
            sink,
            SUBSYSTEM,
            "pcie_device_",
            "PCIe device",
            &device.status,
            &labels,
        );
    }

    fn process_processor(&self, sink: &SampleSink, processor: &Processor, system_id: &str) {
        let labels: Vec<Label> = vec![
            ("id", processor.id.clone()),
            ("name", processor.name.clone()),
            ("system_id", system_id.to_string()),
            (
                "processor_type",
                processor.processor_type.clone().unwrap_or_default(),
            ),
        ];

        if let Some(mhz) = processor.max_speed_mhz {
            gauge(
                sink,
                SUBSYSTEM,
                "processor_speed_max_hertz",
                "Maximum processor speed, Hz",
                &labels,
                mhz * MEGA,
            );
        }
        if let Some(watts) = processor.max_tdp_watts {
            gauge(
                sink,
                SUBSYSTEM,
                "processor_tdp_max_watts",
                "Maximum processor TDP, W",
                &labels,
                watts,
            );
        }
        if let Some(watts) = processor.tdp_watts {
            gauge(
                sink,
                SUBSYSTEM,
                "processor_tdp_current_watts",
                "Current processor TDP, W",
                &labels,
                watts,
            );
        }
        if let Some(cores) = processor.total_cores {
            gauge(
                sink,
                SUBSYSTEM,
                "processor_cores",
                "Total processor cores",
                &labels,
                cores as f64,
            );
        }
        if let Some(cores) = processor.total_enabled_cores {
            gauge(
                sink,
                SUBSYSTEM,
                "processor_cores_enabled",
                "Enabled processor cores",
                &labels,
                cores as f64,
            );
        }
        if let Some(threads) = processor.total_threads {
            gauge(
                sink,
                SUBSYSTEM,
                "processor_threads",
                "Processor threads",
                &labels,
                threads as f64,
            );
        }

        status_gauges(
            sink,
            SUBSYSTEM,
            "processor_",
            "Processor",
            &processor.status,
            &labels,
        );
    }

    fn process_storage(&self, sink: &SampleSink, storage: &Storage, system_id: &str) {
        let labels: Vec<Label> = vec![
            ("id", storage.id.clone()),
            ("name", storage.name.clone()),
            ("system_id", system_id.to_string()),
            ("storage_id", storage.id.clone()),
        ];
        status_gauges(sink, SUBSYSTEM, "storage_", "Storage", &storage.status, &labels);
    }

    fn process_storage_controller(
        &self,
        sink: &SampleSink,
        controller: &StorageController,
        system_id: &str,
        storage_id: &str,
    ) {
        let labels: Vec<Label> = vec![
            ("id", controller.member_id.clone()),
            ("name", controller.name.clone()),
            ("system_id", system_id.to_string()),
            ("storage_id", storage_id.to_string()),
        ];

        if let Some(gbps) = controller.speed_gbps {
            gauge(
                sink,
                SUBSYSTEM,
                "storage_controller_speed_bytes",
                "Storage controller speed, bytes/s",
                &labels,
                gbps * GIGA / 8.0,
            );
        }

        if let Some(cache) = &controller.cache_summary {
            if let Some(mib) = cache.persistent_cache_size_mib {
                gauge(
                    sink,
                    SUBSYSTEM,
                    "storage_controller_cache_size_persistent_bytes",
                    "Persistent cache size, bytes",
                    &labels,
                    mib * MEBI,
                );
            }
            if let Some(mib) = cache.total_cache_size_mib {
                gauge(
                    sink,
                    SUBSYSTEM,
                    "storage_controller_cache_size_bytes",
                    "Total cache size, bytes",
                    &labels,
                    mib * MEBI,
                );
            }
            if let Some(status) = &cache.status {
                status_gauges(
                    sink,
                    SUBSYSTEM,
                    "storage_controller_cache_",
                    "Storage controller cache",
                    status,
                    &labels,
                );
            }
        }

        status_gauges(
            sink,
            SUBSYSTEM,
            "storage_controller_",
            "Storage controller",
            &controller.status,
            &labels,
        );
    }

    fn process_drive(&self, sink: &SampleSink, drive: &Drive, system_id: &str) {
        let labels: Vec<Label> = vec![
            ("id", drive.id.clone()),
            ("name", drive.name.clone()),
            ("system_id", system_id.to_string()),
            ("drive_type", drive.media_type.clone().unwrap_or_default()),
        ];

        if let Some(gbs) = drive.capable_speed_gbs {
            gauge(
                sink,
                SUBSYSTEM,
                "drive_speed_capable_bytes",
                "Fastest capable drive speed, bytes/s",
                &labels,
                gbs * GIGA / 8.0,
            );
        }
        if let Some(bytes) = drive.capacity_bytes {
            gauge(
                sink,
                SUBSYSTEM,
                "drive_capacity_bytes",
                "Drive raw capacity, bytes",
                &labels,
                bytes,
            );
        }
        if let Some(predicted) = drive.failure_predicted {
            gauge(
                sink,
                SUBSYSTEM,
                "drive_predicted_failure",
                "Drive failure predicted; 0: NoFailure, 1: Failure",
                &labels,
                encode::bool_gauge(predicted),
            );
        }
        if let Some(gbs) = drive.negotiated_speed_gbs {
            gauge(
                sink,
                SUBSYSTEM,
                "drive_speed_negotiated_bytes",
                "Actual drive speed, bytes/s",
                &labels,
                gbs * GIGA / 8.0,
            );
        }
        if let Some(enabled) = drive.write_cache_enabled {
            gauge(
                sink,
                SUBSYSTEM,
                "drive_write_cache_status",
                "Drive write cache status; 0: Disabled, 1: Enabled",
                &labels,
                encode::bool_gauge(enabled),
            );
        }

        // Rotational drives report spindle speed; solid-state drives report
        // remaining media life. The two never coexist on one drive.
        match drive.media_type.as_deref() {
            Some("HDD") | Some("SMR") => {
                if let Some(rpm) = drive.rotation_speed_rpm {
                    gauge(
                        sink,
                        SUBSYSTEM,
                        "drive_rotation_speed_rpm",
                        "Drive rotation speed, RPM",
                        &labels,
                        rpm,
                    );
                }
            }
            Some("SSD") => {
                if let Some(percent) = drive.predicted_media_life_left_percent {
                    gauge(
                        sink,
                        SUBSYSTEM,
                        "drive_predicted_media_life_left_ratio",
                        "Drive media life left, %",
                        &labels,
                        percent / 100.0,
                    );
                }
            }
            _ => {}
        }

        if let Some(ordinal) = drive
            .encryption_status
            .as_deref()
            .and_then(encode::encryption_status)
        {
            let labels = with_labels(
                &labels,
                &[(
                    "encryption_ability",
                    drive.encryption_ability.clone().unwrap_or_default(),
                )],
            );
            gauge(
                sink,
                SUBSYSTEM,
                "drive_encryption_status",
                "Drive encryption status; 0: Unencrypted, 1: Unlocked, 2: Locked, 3: Foreign",
                &labels,
                ordinal,
            );
        }
        if let Some(ordinal) = drive
            .hotspare_type
            .as_deref()
            .and_then(encode::hotspare_type)
        {
            let labels = with_labels(
                &labels,
                &[(
                    "hotspare_replacement_mode",
                    drive.hotspare_replacement_mode.clone().unwrap_or_default(),
                )],
            );
            gauge(
                sink,
                SUBSYSTEM,
                "drive_hotspare_type",
                "Drive hotspare type; 0: None, 1: Global, 2: Chassis, 3: Dedicated",
                &labels,
                ordinal,
            );
        }
        if let Some(ordinal) = drive
            .status_indicator
            .as_deref()
            .and_then(encode::drive_status_indicator)
        {
            gauge(
                sink,
                SUBSYSTEM,
                "drive_status",
                "Drive status; 0: Fail, 1: OK, 2: Rebuild, 3: PredictiveFailureAnalysis, \
                 4: Hotspare, 5: InACriticalArray, 6: InAFailedArray",
                &labels,
                ordinal,
            );
        }

        status_gauges(sink, SUBSYSTEM, "drive_", "Drive", &drive.status, &labels);
    }
}

#[async_trait]
impl Collector for SystemCollector {
    fn name(&self) -> &'static str {
        "system"
    }

    async fn collect(&self, sink: &SampleSink) -> Result<(), CollectError> {
        let systems = self
            .client
            .systems()
            .await
            .map_err(|e| CollectError::subtree("/Systems", e))?;

        for system in &systems {
            self.process_system(sink, system);

            let interfaces: Vec<EthernetInterface> = self
                .client
                .fetch_collection(system.ethernet_interfaces.as_ref())
                .await
                .map_err(|e| {
                    CollectError::subtree(format!("/Systems/{}/EthernetInterfaces", system.id), e)
                })?;
            for intf in &interfaces {
                self.process_ethernet_interface(sink, intf, &system.id);
            }

            let memories: Vec<Memory> = self
                .client
                .fetch_collection(system.memory.as_ref())
                .await
                .map_err(|e| CollectError::subtree(format!("/Systems/{}/Memory", system.id), e))?;
            for memory in &memories {
                self.process_memory(sink, memory, &system.id);
            }

            let network_interfaces: Vec<NetworkInterface> = self
                .client
                .fetch_collection(system.network_interfaces.as_ref())
                .await
                .map_err(|e| {
                    CollectError::subtree(format!("/Systems/{}/NetworkInterfaces", system.id), e)
                })?;
            for intf in &network_interfaces {
                self.process_network_interface(sink, intf, &system.id);
            }

            // The same device may be linked through more than one path;
            // emit each id once.
            let mut seen = HashSet::new();
            for reference in &system.pcie_devices {
                let device: PCIeDevice = self.client.fetch(reference).await.map_err(|e| {
                    CollectError::subtree(format!("/Systems/{}/PCIeDevices", system.id), e)
                })?;
                if seen.insert(device.id.clone()) {
                    self.process_pcie_device(sink, &device, &system.id);
                }
            }

            let processors: Vec<Processor> = self
                .client
                .fetch_collection(system.processors.as_ref())
                .await
                .map_err(|e| {
                    CollectError::subtree(format!("/Systems/{}/Processors", system.id), e)
                })?;
            for processor in &processors {
                self.process_processor(sink, processor, &system.id);
            }

            let storages: Vec<Storage> = self
                .client
                .fetch_collection(system.storage.as_ref())
                .await
                .map_err(|e| CollectError::subtree(format!("/Systems/{}/Storage", system.id), e))?;
            for storage in &storages {
                self.process_storage(sink, storage, &system.id);

                for controller in &storage.storage_controllers {
                    self.process_storage_controller(sink, controller, &system.id, &storage.id);
                }

                for reference in &storage.drives {
                    let drive: Drive = self.client.fetch(reference).await.map_err(|e| {
                        CollectError::subtree(
                            format!("/Systems/{}/Storage/{}/Drives", system.id, storage.id),
                            e,
                        )
                    })?;
                    self.process_drive(sink, &drive, &system.id);
                }
            }
        }

        Ok(())
    }
}
