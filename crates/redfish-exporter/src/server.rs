// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::config::Config;
use crate::render;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::service::service_fn;
use hyper::{http, Method, Request, Response, StatusCode};
use redfish_collector::{sample_channel, RedfishCollector};
use std::io;
use std::sync::Arc;
use tracing::{debug, error};

const SCRAPE_ENDPOINT_PATH: &str = "/redfish";

const LANDING_PAGE: &str = "<html>\n<head><title>Redfish Exporter</title></head>\n\
<body>\n<h1>Redfish Exporter</h1>\n\
<p><a href=\"/redfish?target=https%3A%2F%2F10.0.0.1\">scrape example</a></p>\n\
</body>\n</html>\n";

/// Accept loop: each connection is served on its own task; a panicking
/// handler is logged and never takes the server down.
pub async fn serve(listener: tokio::net::TcpListener, config: Arc<Config>) -> anyhow::Result<()> {
    let server = hyper::server::conn::http1::Builder::new();
    let mut joinset = tokio::task::JoinSet::new();

    loop {
        let conn = tokio::select! {
            con_res = listener.accept() => match con_res {
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::ConnectionAborted
                            | io::ErrorKind::ConnectionReset
                            | io::ErrorKind::ConnectionRefused
                    ) =>
                {
                    continue;
                }
                Err(e) => {
                    error!("Server error: {e}");
                    return Err(e.into());
                }
                Ok((conn, _)) => conn,
            },
            finished = async {
                match joinset.join_next().await {
                    Some(finished) => finished,
                    None => std::future::pending().await,
                }
            } => match finished {
                Err(e) if e.is_panic() => {
                    error!("Connection handler panicked: {e:?}");
                    continue;
                },
                Ok(()) | Err(_) => continue,
            },
        };

        let conn = hyper_util::rt::TokioIo::new(conn);
        let server = server.clone();
        let config = Arc::clone(&config);
        let service = service_fn(move |req| endpoint_handler(Arc::clone(&config), req));
        joinset.spawn(async move {
            if let Err(e) = server.serve_connection(conn, service).await {
                error!("Connection error: {e}");
            }
        });
    }
}

async fn endpoint_handler(
    config: Arc<Config>,
    req: Request<hyper::body::Incoming>,
) -> http::Result<Response<Full<Bytes>>> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, SCRAPE_ENDPOINT_PATH) => {
            scrape_handler(config, req.uri().query()).await
        }
        (&Method::GET, "/") => Response::builder()
            .status(StatusCode::OK)
            .header(hyper::header::CONTENT_TYPE, "text/html; charset=utf-8")
            .body(Full::from(LANDING_PAGE)),
        _ => text_response(StatusCode::NOT_FOUND, "not found"),
    }
}

/// Runs one full scrape against the requested target and renders the
/// collected samples. Targets outside the configured inventory are rejected
/// before any connection is attempted.
async fn scrape_handler(
    config: Arc<Config>,
    query: Option<&str>,
) -> http::Result<Response<Full<Bytes>>> {
    let Some(target) = query.and_then(target_param) else {
        return text_response(StatusCode::BAD_REQUEST, "missing target parameter");
    };
    let Some(endpoint) = normalize_target(&target) else {
        return text_response(
            StatusCode::BAD_REQUEST,
            format!("malformed target {target}"),
        );
    };
    let Some(client_config) = config.endpoint(&endpoint) else {
        error!("scrape request for unknown target {target}");
        return text_response(
            StatusCode::BAD_REQUEST,
            format!("unknown target {target}"),
        );
    };

    debug!("scraping {target}");
    let (sink, mut rx) = sample_channel();
    RedfishCollector::new(client_config).collect(&sink).await;
    drop(sink);

    let mut samples = Vec::new();
    while let Some(sample) = rx.recv().await {
        samples.push(sample);
    }

    Response::builder()
        .status(StatusCode::OK)
        .header(hyper::header::CONTENT_TYPE, render::CONTENT_TYPE)
        .body(Full::from(render::render(&samples)))
}

/// Reduces a target to `scheme://host[:port]` so that a path or trailing
/// slash in the query parameter still matches the configured endpoint key.
/// Default ports are dropped during URL parsing, so config keys must omit
/// them too.
fn normalize_target(target: &str) -> Option<String> {
    let url = url::Url::parse(target).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    })
}

fn target_param(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "target")
        .map(|(_, value)| value.into_owned())
}

fn text_response(
    status: StatusCode,
    message: impl Into<String>,
) -> http::Result<Response<Full<Bytes>>> {
    Response::builder()
        .status(status)
        .body(Full::from(message.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_param_decodes_percent_encoding() {
        assert_eq!(
            target_param("target=https%3A%2F%2F10.0.0.1"),
            Some("https://10.0.0.1".to_string())
        );
    }

    #[test]
    fn test_target_param_missing() {
        assert_eq!(target_param("module=foo"), None);
        assert_eq!(target_param(""), None);
    }

    #[test]
    fn test_normalize_target_strips_path_and_slash() {
        assert_eq!(
            normalize_target("https://10.0.0.1/"),
            Some("https://10.0.0.1".to_string())
        );
        assert_eq!(
            normalize_target("https://10.0.0.1/redfish/v1/"),
            Some("https://10.0.0.1".to_string())
        );
    }

    #[test]
    fn test_normalize_target_keeps_explicit_port() {
        assert_eq!(
            normalize_target("https://bmc.example.com:8443/redfish"),
            Some("https://bmc.example.com:8443".to_string())
        );
    }

    #[test]
    fn test_normalize_target_rejects_malformed() {
        assert_eq!(normalize_target("10.0.0.1"), None);
        assert_eq!(normalize_target("http://"), None);
    }

    #[test]
    fn test_target_param_among_others() {
        assert_eq!(
            target_param("module=foo&target=https%3A%2F%2Fbmc.example.com"),
            Some("https://bmc.example.com".to_string())
        );
    }
}
