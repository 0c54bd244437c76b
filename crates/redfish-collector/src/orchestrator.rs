// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Scrape orchestration: session lifecycle, collector fan-out and the
//! availability and per-collector meta samples.

use crate::chassis::ChassisCollector;
use crate::emit::{gauge_named, SampleSink, NAMESPACE};
use crate::error::CollectError;
use crate::manager::ManagerCollector;
use crate::system::SystemCollector;
use crate::Collector;
use redfish_client::{ApiClient, ClientConfig};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, error};

const UP_HELP: &str = "Redfish service status; 0: Down, 1: Up";
const DURATION_HELP: &str = "Scrape duration, s";
const SUCCESS_HELP: &str = "Scrape success; 0: Fail, 1: Success";

/// One endpoint's full scrape: connect, fan out the subtree collectors,
/// join, report meta samples, log out.
pub struct RedfishCollector {
    config: ClientConfig,
}

impl RedfishCollector {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Runs one scrape against the endpoint, writing every sample to `sink`.
    ///
    /// A failed connection emits `redfish_up 0` and nothing else. Otherwise
    /// the chassis, system and manager collectors run concurrently over the
    /// shared session; each contributes its own duration/success pair, and a
    /// failure in one never suppresses the others' samples. The session is
    /// released before this returns, whatever the collectors did.
    pub async fn collect(&self, sink: &SampleSink) {
        let client = match ApiClient::connect(&self.config).await {
            Ok(client) => Arc::new(client),
            Err(e) => {
                error!("connecting to {} failed: {e}", self.config.endpoint);
                self.up_gauge(sink, 0.0);
                return;
            }
        };

        let collectors: Vec<Arc<dyn Collector>> = vec![
            Arc::new(ChassisCollector::new(Arc::clone(&client))),
            Arc::new(SystemCollector::new(Arc::clone(&client))),
            Arc::new(ManagerCollector::new(Arc::clone(&client))),
        ];

        type CollectorHandle = JoinHandle<(f64, Result<(), CollectError>)>;
        let mut handles: Vec<(&'static str, CollectorHandle)> =
            Vec::with_capacity(collectors.len());
        for collector in collectors {
            let name = collector.name();
            let task_sink = sink.clone();
            handles.push((
                name,
                tokio::spawn(async move {
                    let started = Instant::now();
                    let result = collector.collect(&task_sink).await;
                    (started.elapsed().as_secs_f64(), result)
                }),
            ));
        }

        // Full barrier: every collector settles before the meta samples and
        // the logout.
        for (name, handle) in handles {
            let (duration, success) = match handle.await {
                Ok((duration, Ok(()))) => {
                    debug!(
                        "collector {name} finished against {} in {duration:.3}s",
                        self.config.endpoint
                    );
                    (duration, 1.0)
                }
                Ok((duration, Err(e))) => {
                    error!(
                        "collector {name} against {} failed: {e}",
                        self.config.endpoint
                    );
                    (duration, 0.0)
                }
                Err(e) => {
                    error!(
                        "collector {name} task against {} aborted: {e}",
                        self.config.endpoint
                    );
                    (0.0, 0.0)
                }
            };
            let labels = vec![("collector", name.to_string())];
            gauge_named(
                sink,
                format!("{NAMESPACE}_scrape_duration_seconds"),
                DURATION_HELP,
                &labels,
                duration,
            );
            gauge_named(
                sink,
                format!("{NAMESPACE}_scrape_success"),
                SUCCESS_HELP,
                &labels,
                success,
            );
        }

        self.up_gauge(sink, 1.0);
        client.logout().await;
    }

    fn up_gauge(&self, sink: &SampleSink, value: f64) {
        gauge_named(sink, format!("{NAMESPACE}_up"), UP_HELP, &[], value);
    }
}
