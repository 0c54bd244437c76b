// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Manager (BMC) subtree: console services, power state, health and the
//! manager's own ethernet interfaces.

use crate::emit::{gauge, status_gauges, with_labels, Label, SampleSink, MEGA, POWER_STATE_DOC};
use crate::encode;
use crate::error::CollectError;
use crate::Collector;
use async_trait::async_trait;
use redfish_client::resources::{EthernetInterface, Manager};
use redfish_client::ApiClient;
use std::sync::Arc;

const SUBSYSTEM: &str = "manager";

pub struct ManagerCollector {
    client: Arc<ApiClient>,
}

impl ManagerCollector {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    fn process_manager(&self, sink: &SampleSink, manager: &Manager) {
        let labels: Vec<Label> = vec![
            ("id", manager.id.clone()),
            ("name", manager.name.clone()),
            ("manager_id", manager.id.clone()),
            (
                "manager_type",
                manager.manager_type.clone().unwrap_or_default(),
            ),
        ];

        if let Some(enabled) = manager
            .command_shell
            .as_ref()
            .and_then(|service| service.service_enabled)
        {
            gauge(
                sink,
                SUBSYSTEM,
                "command_shell_status",
                "Command shell status; 0: Disabled, 1: Enabled",
                &labels,
                encode::bool_gauge(enabled),
            );
        }
        if let Some(enabled) = manager
            .graphical_console
            .as_ref()
            .and_then(|service| service.service_enabled)
        {
            gauge(
                sink,
                SUBSYSTEM,
                "console_graphical_status",
                "Graphical console status; 0: Disabled, 1: Enabled",
                &labels,
                encode::bool_gauge(enabled),
            );
        }
        if let Some(enabled) = manager
            .serial_console
            .as_ref()
            .and_then(|service| service.service_enabled)
        {
            gauge(
                sink,
                SUBSYSTEM,
                "console_serial_status",
                "Serial console status; 0: Disabled, 1: Enabled",
                &labels,
                encode::bool_gauge(enabled),
            );
        }

        if let Some(ordinal) = manager.power_state.as_deref().and_then(encode::power_state) {
            gauge(
                sink,
                SUBSYSTEM,
                "power_state",
                format!("Manager power state; {POWER_STATE_DOC}"),
                &labels,
                ordinal,
            );
        }

        status_gauges(sink, SUBSYSTEM, "", "Manager", &manager.status, &labels);
    }

    fn process_ethernet_interface(
        &self,
        sink: &SampleSink,
        intf: &EthernetInterface,
        manager_id: &str,
    ) {
        let labels: Vec<Label> = vec![
            ("id", intf.id.clone()),
            ("name", intf.name.clone()),
            ("manager_id", manager_id.to_string()),
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

        status_gauges(
            sink,
            SUBSYSTEM,
            "ethernet_interface_",
            "Ethernet interface",
            &intf.status,
            &labels,
        );
    }
}

#[async_trait]
impl Collector for ManagerCollector {
    fn name(&self) -> &'static str {
        "manager"
    }

    async fn collect(&self, sink: &SampleSink) -> Result<(), CollectError> {
        let managers = self
            .client
            .managers()
            .await
            .map_err(|e| CollectError::subtree("/Managers", e))?;

        for manager in &managers {
            self.process_manager(sink, manager);

            let interfaces: Vec<EthernetInterface> = self
                .client
                .fetch_collection(manager.ethernet_interfaces.as_ref())
                .await
                .map_err(|e| {
                    CollectError::subtree(format!("/Managers/{}/EthernetInterfaces", manager.id), e)
                })?;
            for intf in &interfaces {
                self.process_ethernet_interface(sink, intf, &manager.id);
            }
        }

        Ok(())
    }
}
