// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Sample construction and the shared output sink.
//!
//! A [`Sample`] is one labeled gauge observation. Collectors write samples
//! through a [`SampleSink`]; sends are atomic at sample granularity, so
//! concurrent collectors never interleave a sample's fields. A send failure
//! (receiver dropped) discards that one sample and nothing else.

use crate::encode;
use redfish_client::resources::Status;
use tokio::sync::mpsc;
use tracing::debug;

/// Metric namespace prefix shared by every sample.
pub const NAMESPACE: &str = "redfish";

pub const HEALTH_DOC: &str = "0: OK, 1: Warning, 2: Critical";
pub const STATE_DOC: &str = "0: Disabled, 1: Enabled, 2: StandbyOffline, 3: StandbySpare, \
     4: InTest, 5: Starting, 6: Absent, 7: UnavailableOffline, 8: Deferring, 9: Quiesced, \
     10: Updating";
pub const POWER_STATE_DOC: &str = "0: Off, 1: On, 2: PoweringOn, 3: PoweringOff";

/// Binary multiplier for memory and storage sizes (MiB to bytes).
pub const MEBI: f64 = 1024.0 * 1024.0;
/// Decimal multiplier for rates and frequencies (Mbps, MHz).
pub const MEGA: f64 = 1_000_000.0;
/// Decimal multiplier for rates (Gbps).
pub const GIGA: f64 = 1_000_000_000.0;

/// One label pair. Keys are fixed per metric name; values vary per instance.
pub type Label = (&'static str, String);

/// One gauge observation: name, help text, ordered labels, value.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: String,
    pub help: String,
    pub labels: Vec<Label>,
    pub value: f64,
}

/// Write side of the sample stream, shared by all collectors of one scrape.
pub type SampleSink = mpsc::UnboundedSender<Sample>;

/// Creates the sample stream for one scrape.
pub fn sample_channel() -> (SampleSink, mpsc::UnboundedReceiver<Sample>) {
    mpsc::unbounded_channel()
}

/// Builds `redfish_<subsystem>_<metric>`.
pub fn fq_name(subsystem: &str, metric: &str) -> String {
    format!("{NAMESPACE}_{subsystem}_{metric}")
}

/// Emits exactly one gauge sample to the sink.
pub fn gauge(
    sink: &SampleSink,
    subsystem: &str,
    metric: &str,
    help: impl Into<String>,
    labels: &[Label],
    value: f64,
) {
    gauge_named(sink, fq_name(subsystem, metric), help, labels, value);
}

/// Like [`gauge`], for metrics outside the `redfish_<subsystem>_` scheme
/// (availability and scrape meta metrics).
pub fn gauge_named(
    sink: &SampleSink,
    name: String,
    help: impl Into<String>,
    labels: &[Label],
    value: f64,
) {
    let sample = Sample {
        name,
        help: help.into(),
        labels: labels.to_vec(),
        value,
    };
    if let Err(e) = sink.send(sample) {
        debug!("sample receiver dropped, discarding {}", e.0.name);
    }
}

/// Emits the health/state ordinal pair for a resource's `Status` block.
/// Unrecognized or absent values suppress the corresponding sample.
pub fn status_gauges(
    sink: &SampleSink,
    subsystem: &str,
    metric_prefix: &str,
    subject: &str,
    status: &Status,
    labels: &[Label],
) {
    if let Some(ordinal) = status.health.as_deref().and_then(encode::health) {
        gauge(
            sink,
            subsystem,
            &format!("{metric_prefix}health"),
            format!("{subject} health; {HEALTH_DOC}"),
            labels,
            ordinal,
        );
    }
    if let Some(ordinal) = status.state.as_deref().and_then(encode::state) {
        gauge(
            sink,
            subsystem,
            &format!("{metric_prefix}state"),
            format!("{subject} state; {STATE_DOC}"),
            labels,
            ordinal,
        );
    }
}

/// Base labels plus metric-specific extras, preserving order.
pub fn with_labels(base: &[Label], extra: &[Label]) -> Vec<Label> {
    let mut labels = Vec::with_capacity(base.len() + extra.len());
    labels.extend_from_slice(base);
    labels.extend_from_slice(extra);
    labels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fq_name() {
        assert_eq!(
            fq_name("chassis", "fan_speed_rpm"),
            "redfish_chassis_fan_speed_rpm"
        );
    }

    #[test]
    fn test_gauge_writes_one_sample() {
        let (sink, mut rx) = sample_channel();
        let labels = vec![("id", "Fan0".to_string())];
        gauge(&sink, "chassis", "fan_speed_rpm", "Fan speed, RPM", &labels, 3000.0);
        drop(sink);

        let sample = rx.try_recv().expect("one sample expected");
        assert_eq!(sample.name, "redfish_chassis_fan_speed_rpm");
        assert_eq!(sample.labels, labels);
        assert_eq!(sample.value, 3000.0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_gauge_on_closed_sink_is_a_noop() {
        let (sink, rx) = sample_channel();
        drop(rx);
        gauge(&sink, "chassis", "health", "Chassis health", &[], 0.0);
    }

    #[test]
    fn test_status_gauges_suppress_unknown_values() {
        let (sink, mut rx) = sample_channel();
        let status = Status {
            health: Some("Mystery".to_string()),
            state: Some("Enabled".to_string()),
        };
        status_gauges(&sink, "system", "memory_", "Memory", &status, &[]);
        drop(sink);

        let sample = rx.try_recv().expect("state sample expected");
        assert_eq!(sample.name, "redfish_system_memory_state");
        assert_eq!(sample.value, 1.0);
        assert!(rx.try_recv().is_err(), "unknown health must be suppressed");
    }

    #[test]
    fn test_with_labels_preserves_order() {
        let base = vec![("id", "0".to_string()), ("name", "Fan".to_string())];
        let merged = with_labels(&base, &[("sensor_number", "7".to_string())]);
        assert_eq!(
            merged.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            vec!["id", "name", "sensor_number"]
        );
    }
}
