// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Chassis subtree: thermal (fans, temperatures), power (controls, supplies,
//! voltages) and network adapters with their ports.

use crate::emit::{
    gauge, status_gauges, with_labels, Label, SampleSink, MEGA, POWER_STATE_DOC,
};
use crate::encode;
use crate::error::CollectError;
use crate::Collector;
use async_trait::async_trait;
use redfish_client::resources::{
    Chassis, Fan, NetworkAdapter, NetworkPort, Power, PowerControl, PowerSupply, Temperature,
    Thermal, Voltage,
};
use redfish_client::ApiClient;
use std::sync::Arc;

const SUBSYSTEM: &str = "chassis";

pub struct ChassisCollector {
    client: Arc<ApiClient>,
}

impl ChassisCollector {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    fn process_chassis(&self, sink: &SampleSink, chassis: &Chassis) {
        let labels: Vec<Label> = vec![
            ("id", chassis.id.clone()),
            ("name", chassis.name.clone()),
            ("chassis_id", chassis.id.clone()),
            ("chassis_type", chassis.chassis_type.clone().unwrap_or_default()),
        ];

        if let Some(security) = &chassis.physical_security {
            if let Some(ordinal) = security
                .intrusion_sensor
                .as_deref()
                .and_then(encode::intrusion_sensor)
            {
                let labels = with_labels(
                    &labels,
                    &[
                        (
                            "sensor_number",
                            security
                                .intrusion_sensor_number
                                .map(|n| n.to_string())
                                .unwrap_or_default(),
                        ),
                        (
                            "sensor_re_arm",
                            security.intrusion_sensor_re_arm.clone().unwrap_or_default(),
                        ),
                    ],
                );
                gauge(
                    sink,
                    SUBSYSTEM,
                    "intrusion_sensor",
                    "Intrusion sensor reading; 0: Normal, 1: HardwareIntrusion, 2: TamperingDetected",
                    &labels,
                    ordinal,
                );
            }
        }

        if let Some(ordinal) = chassis
            .power_state
            .as_deref()
            .and_then(encode::power_state)
        {
            gauge(
                sink,
                SUBSYSTEM,
                "power_state",
                format!("Chassis power state; {POWER_STATE_DOC}"),
                &labels,
                ordinal,
            );
        }

        status_gauges(sink, SUBSYSTEM, "", "Chassis", &chassis.status, &labels);
    }

    fn process_thermal(&self, sink: &SampleSink, thermal: &Thermal, chassis_id: &str) {
        let labels: Vec<Label> = vec![
            ("id", thermal.id.clone()),
            ("name", thermal.name.clone()),
            ("chassis_id", chassis_id.to_string()),
        ];
        status_gauges(sink, SUBSYSTEM, "thermal_", "Thermal", &thermal.status, &labels);
    }

    fn process_fan(&self, sink: &SampleSink, fan: &Fan, chassis_id: &str) {
        let labels: Vec<Label> = vec![
            ("id", fan.member_id.clone()),
            ("name", fan.name.clone()),
            ("chassis_id", chassis_id.to_string()),
            (
                "sensor_number",
                fan.sensor_number.map(|n| n.to_string()).unwrap_or_default(),
            ),
            ("physical_context", fan.physical_context.clone().unwrap_or_default()),
        ];

        if let Some(reading) = fan.reading {
            match fan.reading_units.as_deref() {
                Some("RPM") => gauge(
                    sink,
                    SUBSYSTEM,
                    "fan_speed_rpm",
                    "Fan speed, RPM",
                    &labels,
                    reading,
                ),
                Some("Percent") => gauge(
                    sink,
                    SUBSYSTEM,
                    "fan_speed_ratio",
                    "Fan speed, %",
                    &labels,
                    reading / 100.0,
                ),
                // Unknown unit: no way to name the metric truthfully.
                _ => {}
            }
        }

        status_gauges(sink, SUBSYSTEM, "fan_", "Fan", &fan.status, &labels);
    }

    fn process_temperature(&self, sink: &SampleSink, t: &Temperature, chassis_id: &str) {
        let labels: Vec<Label> = vec![
            ("id", t.member_id.clone()),
            ("name", t.name.clone()),
            ("chassis_id", chassis_id.to_string()),
            (
                "sensor_number",
                t.sensor_number.map(|n| n.to_string()).unwrap_or_default(),
            ),
            ("physical_context", t.physical_context.clone().unwrap_or_default()),
        ];

        if let Some(reading) = t.reading_celsius {
            gauge(
                sink,
                SUBSYSTEM,
                "temperature_celsius",
                "Temperature sensor reading, \u{b0}C",
                &labels,
                reading,
            );
        }

        status_gauges(
            sink,
            SUBSYSTEM,
            "temperature_",
            "Temperature sensor",
            &t.status,
            &labels,
        );
    }

    fn process_power_control(&self, sink: &SampleSink, control: &PowerControl, chassis_id: &str) {
        let labels: Vec<Label> = vec![
            ("id", control.member_id.clone()),
            ("name", control.name.clone()),
            ("chassis_id", chassis_id.to_string()),
        ];

        if let Some(watts) = control.power_allocated_watts {
            gauge(
                sink,
                SUBSYSTEM,
                "power_control_power_allocated_watts",
                "Power allocated to chassis resources, W",
                &labels,
                watts,
            );
        }
        if let Some(watts) = control.power_capacity_watts {
            gauge(
                sink,
                SUBSYSTEM,
                "power_control_power_capacity_watts",
                "Power available for allocation to chassis resources, W",
                &labels,
                watts,
            );
        }
        if let Some(watts) = control.power_consumed_watts {
            gauge(
                sink,
                SUBSYSTEM,
                "power_control_power_consumed_watts",
                "Power consumed by the chassis resources, W",
                &labels,
                watts,
            );
        }
        if let Some(limit) = &control.power_limit {
            if let Some(watts) = limit.limit_in_watts {
                let labels = with_labels(
                    &labels,
                    &[
                        (
                            "correction_interval",
                            limit
                                .correction_in_ms
                                .map(|ms| (ms / 1000).to_string())
                                .unwrap_or_default(),
                        ),
                        ("action", limit.limit_exception.clone().unwrap_or_default()),
                    ],
                );
                gauge(
                    sink,
                    SUBSYSTEM,
                    "power_control_power_limit_watts",
                    "Configured power limit for the chassis resources, W",
                    &labels,
                    watts,
                );
            }
        }
        if let Some(watts) = control.power_requested_watts {
            gauge(
                sink,
                SUBSYSTEM,
                "power_control_power_requested_watts",
                "Power requested by the chassis resources, W",
                &labels,
                watts,
            );
        }

        status_gauges(
            sink,
            SUBSYSTEM,
            "power_control_",
            "Power control",
            &control.status,
            &labels,
        );
    }

    fn process_power_supply(&self, sink: &SampleSink, supply: &PowerSupply, chassis_id: &str) {
        let labels: Vec<Label> = vec![
            ("id", supply.member_id.clone()),
            ("name", supply.name.clone()),
            ("chassis_id", chassis_id.to_string()),
            (
                "power_supply_type",
                supply.power_supply_type.clone().unwrap_or_default(),
            ),
        ];

        if let Some(percent) = supply.efficiency_percent {
            gauge(
                sink,
                SUBSYSTEM,
                "power_supply_efficiency_ratio",
                "Power supply measured efficiency, %",
                &labels,
                percent / 100.0,
            );
        }
        if let Some(volts) = supply.line_input_voltage {
            let labels = with_labels(
                &labels,
                &[(
                    "input_voltage_type",
                    supply.line_input_voltage_type.clone().unwrap_or_default(),
                )],
            );
            gauge(
                sink,
                SUBSYSTEM,
                "power_supply_input_voltage_volts",
                "Power supply measured input voltage, V",
                &labels,
                volts,
            );
        }
        if let Some(watts) = supply.power_capacity_watts {
            gauge(
                sink,
                SUBSYSTEM,
                "power_supply_capacity_watts",
                "Power supply maximum capacity, W",
                &labels,
                watts,
            );
        }
        if let Some(watts) = supply.power_input_watts {
            gauge(
                sink,
                SUBSYSTEM,
                "power_supply_input_power_watts",
                "Power supply measured input power, W",
                &labels,
                watts,
            );
        }
        if let Some(watts) = supply.power_output_watts {
            gauge(
                sink,
                SUBSYSTEM,
                "power_supply_output_power_watts",
                "Power supply measured output power, W",
                &labels,
                watts,
            );
        }

        status_gauges(
            sink,
            SUBSYSTEM,
            "power_supply_",
            "Power supply",
            &supply.status,
            &labels,
        );
    }

    fn process_voltage(&self, sink: &SampleSink, voltage: &Voltage, chassis_id: &str) {
        let labels: Vec<Label> = vec![
            ("id", voltage.member_id.clone()),
            ("name", voltage.name.clone()),
            ("chassis_id", chassis_id.to_string()),
            (
                "sensor_number",
                voltage.sensor_number.map(|n| n.to_string()).unwrap_or_default(),
            ),
            (
                "physical_context",
                voltage.physical_context.clone().unwrap_or_default(),
            ),
        ];

        if let Some(volts) = voltage.reading_volts {
            gauge(
                sink,
                SUBSYSTEM,
                "voltage_reading_volts",
                "Voltage sensor reading, V",
                &labels,
                volts,
            );
        }

        status_gauges(
            sink,
            SUBSYSTEM,
            "voltage_",
            "Voltage sensor",
            &voltage.status,
            &labels,
        );
    }

    fn process_network_adapter(&self, sink: &SampleSink, adapter: &NetworkAdapter, chassis_id: &str) {
        let labels: Vec<Label> = vec![
            ("id", adapter.id.clone()),
            ("name", adapter.name.clone()),
            ("chassis_id", chassis_id.to_string()),
        ];
        status_gauges(
            sink,
            SUBSYSTEM,
            "network_adapter_",
            "Network adapter",
            &adapter.status,
            &labels,
        );
    }

    fn process_network_port(&self, sink: &SampleSink, port: &NetworkPort, chassis_id: &str) {
        let labels: Vec<Label> = vec![
            ("id", port.id.clone()),
            ("name", port.name.clone()),
            ("chassis_id", chassis_id.to_string()),
            (
                "link_type",
                port.active_link_technology.clone().unwrap_or_default(),
            ),
        ];

        if let Some(mbps) = port.current_link_speed_mbps {
            gauge(
                sink,
                SUBSYSTEM,
                "network_port_speed_bytes",
                "Network port speed, bytes/s",
                &labels,
                mbps * MEGA / 8.0,
            );
        }

        if let Some(ordinal) = port.link_status.as_deref().and_then(encode::port_link_status) {
            gauge(
                sink,
                SUBSYSTEM,
                "network_port_status",
                "Network port status; 0: Down, 1: Up",
                &labels,
                ordinal,
            );
        }

        status_gauges(
            sink,
            SUBSYSTEM,
            "network_port_",
            "Network port",
            &port.status,
            &labels,
        );
    }
}

#[async_trait]
impl Collector for ChassisCollector {
    fn name(&self) -> &'static str {
        "chassis"
    }

    async fn collect(&self, sink: &SampleSink) -> Result<(), CollectError> {
        let chassis_list = self
            .client
            .chassis()
            .await
            .map_err(|e| CollectError::subtree("/Chassis", e))?;

        for chassis in &chassis_list {
            self.process_chassis(sink, chassis);

            let thermal: Option<Thermal> = self
                .client
                .fetch_opt(chassis.thermal.as_ref())
                .await
                .map_err(|e| {
                    CollectError::subtree(format!("/Chassis/{}/Thermal", chassis.id), e)
                })?;
            if let Some(thermal) = &thermal {
                self.process_thermal(sink, thermal, &chassis.id);
                for fan in &thermal.fans {
                    self.process_fan(sink, fan, &chassis.id);
                }
                for temperature in &thermal.temperatures {
                    self.process_temperature(sink, temperature, &chassis.id);
                }
            }

            let power: Option<Power> = self
                .client
                .fetch_opt(chassis.power.as_ref())
                .await
                .map_err(|e| CollectError::subtree(format!("/Chassis/{}/Power", chassis.id), e))?;
            if let Some(power) = &power {
                for control in &power.power_control {
                    self.process_power_control(sink, control, &chassis.id);
                }
                for supply in &power.power_supplies {
                    self.process_power_supply(sink, supply, &chassis.id);
                }
                for voltage in &power.voltages {
                    self.process_voltage(sink, voltage, &chassis.id);
                }
            }

            let adapters: Vec<NetworkAdapter> = self
                .client
                .fetch_collection(chassis.network_adapters.as_ref())
                .await
                .map_err(|e| {
                    CollectError::subtree(format!("/Chassis/{}/NetworkAdapters", chassis.id), e)
                })?;
            for adapter in &adapters {
                self.process_network_adapter(sink, adapter, &chassis.id);

                let ports: Vec<NetworkPort> = self
                    .client
                    .fetch_collection(adapter.network_ports.as_ref())
                    .await
                    .map_err(|e| {
                        CollectError::subtree(
                            format!(
                                "/Chassis/{}/NetworkAdapters/{}/NetworkPorts",
                                chassis.id, adapter.id
                            ),
                            e,
                        )
                    })?;
                for port in &ports {
                    self.process_network_port(sink, port, &chassis.id);
                }
            }
        }

        Ok(())
    }
}
