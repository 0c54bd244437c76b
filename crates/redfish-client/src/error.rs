// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Errors surfaced by the Redfish client. `Login` variants are fatal to the
/// whole scrape; `Http`/`Status`/`Decode` abort only the read that hit them.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid endpoint URL {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("could not build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("login to {endpoint} failed with status {status}")]
    LoginRejected {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("login to {endpoint} returned no session token")]
    MissingToken { endpoint: String },

    #[error("request for {path} failed: {source}")]
    Http {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request for {path} returned status {status}")]
    Status {
        path: String,
        status: reqwest::StatusCode,
    },

    #[error("could not decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}
