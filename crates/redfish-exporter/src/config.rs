// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use anyhow::{bail, Context};
use redfish_client::ClientConfig;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Credentials for one management endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub insecure: bool,
}

/// The endpoint inventory: a YAML map of endpoint URL to credentials.
///
/// ```yaml
/// https://10.0.0.1:
///   username: admin
///   password: hunter2
/// https://bmc.rack2.example.com:
///   username: monitor
///   password: s3cret
///   insecure: true
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    endpoints: HashMap<String, EndpointConfig>,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let endpoints: HashMap<String, EndpointConfig> = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        if endpoints.is_empty() {
            bail!("config file {} lists no endpoints", path.display());
        }
        Ok(Self { endpoints })
    }

    /// Connection parameters for a scrape target, or `None` if the target is
    /// not in the inventory.
    pub fn endpoint(&self, target: &str) -> Option<ClientConfig> {
        self.endpoints.get(target).map(|creds| ClientConfig {
            endpoint: target.to_string(),
            username: creds.username.clone(),
            password: creds.password.clone(),
            insecure: creds.insecure,
        })
    }
}
