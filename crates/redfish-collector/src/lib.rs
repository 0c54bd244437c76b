// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Concurrent, fault-isolated collection of Redfish telemetry.
//!
//! One scrape is one [`RedfishCollector::collect`] call: it opens a session,
//! fans out the chassis, system and manager collectors as concurrent tasks
//! against a shared sample sink, joins on all of them, reports per-collector
//! duration/success, and releases the session. A failing collector never
//! takes down its siblings; only a failed connection aborts the scrape.

pub mod chassis;
pub mod emit;
pub mod encode;
pub mod error;
pub mod manager;
pub mod orchestrator;
pub mod system;

use crate::emit::SampleSink;
use crate::error::CollectError;
use async_trait::async_trait;

pub use emit::{Sample, sample_channel};
pub use orchestrator::RedfishCollector;

/// One resource subtree's traversal and sample emission.
#[async_trait]
pub trait Collector: Send + Sync {
    /// Label value for the per-collector duration/success samples.
    fn name(&self) -> &'static str;

    /// Walks the collector's subtree and writes samples to the sink.
    /// Returns an error naming the subtree that failed; samples already
    /// written stay valid.
    async fn collect(&self, sink: &SampleSink) -> Result<(), CollectError>;
}
