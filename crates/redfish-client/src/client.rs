// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ClientError;
use crate::resources::{
    Chassis, Collection, ComputerSystem, Manager, ODataRef, ServiceRoot,
};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

const SERVICE_ROOT_PATH: &str = "/redfish/v1/";
const DEFAULT_SESSIONS_PATH: &str = "/redfish/v1/SessionService/Sessions";
const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Connection parameters for one management endpoint.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the endpoint, e.g. `https://10.0.0.1`.
    pub endpoint: String,
    pub username: String,
    pub password: String,
    /// Skip TLS certificate verification.
    pub insecure: bool,
}

/// An authenticated session against one Redfish endpoint.
///
/// Created by [`ApiClient::connect`], released by [`ApiClient::logout`]. All
/// reads are plain GETs carrying the session token; the client holds no other
/// mutable state, so sharing one instance across concurrent readers is fine.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    endpoint: String,
    root: ServiceRoot,
    token: Option<String>,
    session_uri: Option<String>,
}

impl ApiClient {
    /// Establishes a session: reads the service root, then logs in against
    /// the SessionService and stores the returned token.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&config.endpoint).map_err(|e| ClientError::InvalidEndpoint {
            endpoint: config.endpoint.clone(),
            reason: e.to_string(),
        })?;

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(ClientError::Build)?;

        let mut client = Self {
            http,
            base,
            endpoint: config.endpoint.clone(),
            root: ServiceRoot::default(),
            token: None,
            session_uri: None,
        };

        client.root = client.get(SERVICE_ROOT_PATH).await?;
        client.login(config).await?;

        Ok(client)
    }

    async fn login(&mut self, config: &ClientConfig) -> Result<(), ClientError> {
        let sessions_path = self
            .root
            .links
            .sessions
            .as_ref()
            .map_or(DEFAULT_SESSIONS_PATH, |r| r.odata_id.as_str());

        let url = self.url_for(sessions_path)?;
        let response = self
            .http
            .post(url)
            .json(&json!({
                "UserName": config.username,
                "Password": config.password,
            }))
            .send()
            .await
            .map_err(|e| ClientError::Http {
                path: sessions_path.to_string(),
                source: e,
            })?;

        if !response.status().is_success() {
            return Err(ClientError::LoginRejected {
                endpoint: self.endpoint.clone(),
                status: response.status(),
            });
        }

        let token = response
            .headers()
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| ClientError::MissingToken {
                endpoint: self.endpoint.clone(),
            })?;

        self.session_uri = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        debug!("established session with {}", self.endpoint);
        self.token = Some(token);
        Ok(())
    }

    /// Deletes the session. Failures are logged, never propagated; the
    /// remote side expires abandoned sessions on its own schedule.
    pub async fn logout(&self) {
        let Some(session_uri) = self.session_uri.as_deref() else {
            return;
        };
        let url = match self.url_for(session_uri) {
            Ok(url) => url,
            Err(e) => {
                warn!("skipping logout from {}: {e}", self.endpoint);
                return;
            }
        };
        let request = self.http.delete(url).headers(self.auth_headers());
        match request.send().await {
            Ok(response) if response.status().is_success() => {
                debug!("released session with {}", self.endpoint);
            }
            Ok(response) => {
                warn!(
                    "logout from {} returned status {}",
                    self.endpoint,
                    response.status()
                );
            }
            Err(e) => warn!("logout from {} failed: {e}", self.endpoint),
        }
    }

    /// The endpoint this session is bound to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// GET one resource by path and deserialize it.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url_for(path)?;
        let response = self
            .http
            .get(url)
            .headers(self.auth_headers())
            .send()
            .await
            .map_err(|e| ClientError::Http {
                path: path.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                path: path.to_string(),
                status,
            });
        }

        response.json().await.map_err(|e| ClientError::Decode {
            path: path.to_string(),
            source: e,
        })
    }

    /// Fetch the resource behind a reference.
    pub async fn fetch<T: DeserializeOwned>(&self, reference: &ODataRef) -> Result<T, ClientError> {
        self.get(&reference.odata_id).await
    }

    /// Fetch the resource behind an optional reference. An absent reference
    /// means the subtree does not exist and is not an error.
    pub async fn fetch_opt<T: DeserializeOwned>(
        &self,
        reference: Option<&ODataRef>,
    ) -> Result<Option<T>, ClientError> {
        match reference {
            Some(reference) => Ok(Some(self.fetch(reference).await?)),
            None => Ok(None),
        }
    }

    /// Fetch every member of the collection behind an optional reference.
    /// An absent reference yields an empty list.
    pub async fn fetch_collection<T: DeserializeOwned>(
        &self,
        reference: Option<&ODataRef>,
    ) -> Result<Vec<T>, ClientError> {
        let Some(reference) = reference else {
            return Ok(Vec::new());
        };
        let collection: Collection = self.fetch(reference).await?;
        let mut members = Vec::with_capacity(collection.members.len());
        for member in &collection.members {
            members.push(self.fetch(member).await?);
        }
        Ok(members)
    }

    /// All chassis reachable from the service root.
    pub async fn chassis(&self) -> Result<Vec<Chassis>, ClientError> {
        self.fetch_collection(self.root.chassis.as_ref()).await
    }

    /// All computer systems reachable from the service root.
    pub async fn systems(&self) -> Result<Vec<ComputerSystem>, ClientError> {
        self.fetch_collection(self.root.systems.as_ref()).await
    }

    /// All managers reachable from the service root.
    pub async fn managers(&self) -> Result<Vec<Manager>, ClientError> {
        self.fetch_collection(self.root.managers.as_ref()).await
    }

    fn url_for(&self, path: &str) -> Result<Url, ClientError> {
        self.base.join(path).map_err(|e| ClientError::InvalidEndpoint {
            endpoint: format!("{}{path}", self.endpoint),
            reason: e.to_string(),
        })
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = self.token.as_deref() {
            if let Ok(value) = HeaderValue::from_str(token) {
                headers.insert(AUTH_TOKEN_HEADER, value);
            }
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn service_root_body() -> String {
        serde_json::json!({
            "Chassis": {"@odata.id": "/redfish/v1/Chassis"},
            "Systems": {"@odata.id": "/redfish/v1/Systems"},
            "Managers": {"@odata.id": "/redfish/v1/Managers"},
            "Links": {"Sessions": {"@odata.id": "/redfish/v1/SessionService/Sessions"}}
        })
        .to_string()
    }

    async fn mock_login(server: &mut mockito::ServerGuard) -> Vec<mockito::Mock> {
        let root = server
            .mock("GET", "/redfish/v1/")
            .with_status(200)
            .with_body(service_root_body())
            .create_async()
            .await;
        let login = server
            .mock("POST", "/redfish/v1/SessionService/Sessions")
            .with_status(201)
            .with_header("X-Auth-Token", "token-123")
            .with_header("Location", "/redfish/v1/SessionService/Sessions/42")
            .with_body("{}")
            .create_async()
            .await;
        vec![root, login]
    }

    fn config_for(server: &mockito::ServerGuard) -> ClientConfig {
        ClientConfig {
            endpoint: server.url(),
            username: "admin".to_string(),
            password: "hunter2".to_string(),
            insecure: false,
        }
    }

    #[tokio::test]
    async fn test_connect_stores_token_and_session_uri() {
        let mut server = mockito::Server::new_async().await;
        let mocks = mock_login(&mut server).await;

        let client = ApiClient::connect(&config_for(&server))
            .await
            .expect("connect should succeed");

        assert_eq!(client.token.as_deref(), Some("token-123"));
        assert_eq!(
            client.session_uri.as_deref(),
            Some("/redfish/v1/SessionService/Sessions/42")
        );
        for mock in mocks {
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_connect_rejected_credentials() {
        let mut server = mockito::Server::new_async().await;
        let _root = server
            .mock("GET", "/redfish/v1/")
            .with_status(200)
            .with_body(service_root_body())
            .create_async()
            .await;
        let _login = server
            .mock("POST", "/redfish/v1/SessionService/Sessions")
            .with_status(401)
            .create_async()
            .await;

        let err = ApiClient::connect(&config_for(&server))
            .await
            .expect_err("connect should fail");
        assert!(matches!(err, ClientError::LoginRejected { .. }));
    }

    #[tokio::test]
    async fn test_get_propagates_status_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mocks = mock_login(&mut server).await;
        let _missing = server
            .mock("GET", "/redfish/v1/Chassis")
            .with_status(500)
            .create_async()
            .await;

        let client = ApiClient::connect(&config_for(&server))
            .await
            .expect("connect should succeed");

        let err = client.chassis().await.expect_err("read should fail");
        match err {
            ClientError::Status { path, status } => {
                assert_eq!(path, "/redfish/v1/Chassis");
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_reads_carry_session_token() {
        let mut server = mockito::Server::new_async().await;
        let _mocks = mock_login(&mut server).await;
        let chassis_mock = server
            .mock("GET", "/redfish/v1/Chassis")
            .match_header("x-auth-token", "token-123")
            .with_status(200)
            .with_body(r#"{"Members": []}"#)
            .create_async()
            .await;

        let client = ApiClient::connect(&config_for(&server))
            .await
            .expect("connect should succeed");
        let chassis = client.chassis().await.expect("read should succeed");
        assert!(chassis.is_empty());
        chassis_mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_logout_deletes_session() {
        let mut server = mockito::Server::new_async().await;
        let _mocks = mock_login(&mut server).await;
        let delete = server
            .mock("DELETE", "/redfish/v1/SessionService/Sessions/42")
            .match_header("x-auth-token", "token-123")
            .with_status(204)
            .create_async()
            .await;

        let client = ApiClient::connect(&config_for(&server))
            .await
            .expect("connect should succeed");
        client.logout().await;
        delete.assert_async().await;
    }
}
