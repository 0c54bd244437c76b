// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Minimal Redfish HTTP client: session login/logout against the
//! SessionService plus typed reads of the resource tree. One `ApiClient` is
//! scoped to one scrape; concurrent reads over a shared reference are safe
//! (the underlying reqwest client multiplexes connections).

pub mod client;
pub mod error;
pub mod resources;

pub use client::{ApiClient, ClientConfig};
pub use error::ClientError;
