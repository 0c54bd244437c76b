// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

mod config;
mod render;
mod server;

use anyhow::Context;
use std::net::SocketAddr;
use std::path::Path;
use std::{env, sync::Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:10015";
const DEFAULT_CONFIG_PATH: &str = "./config.yml";

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    let log_level = env::var("REDFISH_LOG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or("info".to_string());
    let env_filter = format!("h2=off,hyper=off,rustls=off,{log_level}");

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(env_filter).context("could not parse log level in configuration")?,
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let config_path =
        env::var("REDFISH_CONFIG_PATH").unwrap_or(DEFAULT_CONFIG_PATH.to_string());
    let config = Arc::new(config::Config::load(Path::new(&config_path))?);

    let listen_address =
        env::var("REDFISH_LISTEN_ADDRESS").unwrap_or(DEFAULT_LISTEN_ADDRESS.to_string());
    let addr: SocketAddr = listen_address
        .parse()
        .with_context(|| format!("invalid listen address {listen_address}"))?;
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!("Redfish exporter listening on {addr}");
    server::serve(listener, config).await
}
