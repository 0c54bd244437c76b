// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use redfish_client::ClientError;

/// A subtree read failed mid-traversal. Fatal to the collector that hit it,
/// never to the scrape.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("error collecting {path}: {source}")]
    Subtree {
        path: String,
        #[source]
        source: ClientError,
    },
}

impl CollectError {
    pub fn subtree(path: impl Into<String>, source: ClientError) -> Self {
        Self::Subtree {
            path: path.into(),
            source,
        }
    }

    /// The resource path whose read failed.
    pub fn path(&self) -> &str {
        match self {
            Self::Subtree { path, .. } => path,
        }
    }
}
