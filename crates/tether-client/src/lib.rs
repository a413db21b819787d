//! HTTP client for the tether server, used by the game-side plugin.

pub mod plugin;

use reqwest::{RequestBuilder, StatusCode, Url, header};
use serde::de::DeserializeOwned;
use thiserror::Error;

use tether_types::api::{CodeRequest, IssueCodeRequest, Payload};
use tether_types::error::ApplicationError;
use tether_types::models::{Binding, CodeInfo};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a user-facing error.
    #[error(transparent)]
    Application(#[from] ApplicationError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("invalid server URL: {0}")]
    InvalidUrl(String),
    #[error("can't access {0}")]
    Unreachable(String),
    #[error("unexpected response (HTTP {0})")]
    UnexpectedResponse(StatusCode),
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Clone)]
pub struct TetherClient {
    http: reqwest::Client,
    base: Url,
    access_token: String,
}

impl TetherClient {
    pub fn new(host: &str, access_token: impl Into<String>) -> ClientResult<Self> {
        let base = Url::parse(host)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", host, e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(host.to_string()));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base,
            access_token: access_token.into(),
        })
    }

    /// Build a client and make sure the server answers its health check.
    pub async fn connect(host: &str, access_token: impl Into<String>) -> ClientResult<Self> {
        let client = Self::new(host, access_token)?;
        if !client.health().await {
            return Err(ClientError::Unreachable(host.to_string()));
        }
        Ok(client)
    }

    pub async fn health(&self) -> bool {
        match self.http.get(self.endpoint(&["health"])).send().await {
            Ok(resp) => resp.status() == StatusCode::OK,
            Err(_) => false,
        }
    }

    pub async fn issue_code(&self, subject_id: &str) -> ClientResult<CodeInfo> {
        let body = IssueCodeRequest {
            subject_id: subject_id.to_string(),
        };
        let req = self.http.post(self.endpoint(&["codes", "issue"])).json(&body);
        self.fetch(req).await
    }

    pub async fn check_code(&self, code: &str) -> ClientResult<CodeInfo> {
        let body = CodeRequest {
            code: code.to_string(),
        };
        let req = self.http.post(self.endpoint(&["codes", "check"])).json(&body);
        self.fetch(req).await
    }

    pub async fn revoke_code(&self, code: &str) -> ClientResult<()> {
        let body = CodeRequest {
            code: code.to_string(),
        };
        let req = self.http.post(self.endpoint(&["codes", "revoke"])).json(&body);
        self.send::<serde::de::IgnoredAny>(req).await?;
        Ok(())
    }

    pub async fn get_binding_by_chat(&self, chat_id: &str) -> ClientResult<Binding> {
        let req = self.http.get(self.endpoint(&["bindings", "chat", chat_id]));
        self.fetch(req).await
    }

    pub async fn get_binding_by_game(&self, game_id: &str) -> ClientResult<Binding> {
        let req = self.http.get(self.endpoint(&["bindings", "game", game_id]));
        self.fetch(req).await
    }

    /// Appends percent-encoded path segments to the server URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let (status, payload) = self.send::<T>(req).await?;
        payload.data.ok_or(ClientError::UnexpectedResponse(status))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
    ) -> ClientResult<(StatusCode, Payload<T>)> {
        let resp = req
            .header(header::AUTHORIZATION, self.access_token.as_str())
            .send()
            .await?;
        let status = resp.status();

        let payload = match resp.json::<Payload<T>>().await {
            Ok(payload) => payload,
            Err(_) if !status.is_success() => return Err(ClientError::UnexpectedResponse(status)),
            Err(e) => return Err(e.into()),
        };

        if let Some(err) = &payload.error {
            return Err(ApplicationError::from(err.clone()).into());
        }
        Ok((status, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tether_api::state::AppStateInner;
    use tether_core::{BindingService, MemoryCodeStore};
    use tether_db::Database;

    const TOKEN: &str = "plugin-token";

    /// Serve the real router on an ephemeral port.
    pub(crate) async fn spawn_server() -> (String, Arc<BindingService>) {
        let service = Arc::new(BindingService::new(
            Arc::new(MemoryCodeStore::new()),
            Arc::new(Database::open_in_memory().unwrap()),
        ));
        let app = tether_api::router(AppStateInner::new(service.clone(), TOKEN));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), service)
    }

    pub(crate) async fn client() -> (TetherClient, Arc<BindingService>) {
        let (url, service) = spawn_server().await;
        (TetherClient::connect(&url, TOKEN).await.unwrap(), service)
    }

    #[tokio::test]
    async fn test_code_round_trip() {
        let (client, _) = client().await;

        let info = client.issue_code("XUID-1").await.unwrap();
        assert_eq!(info.subject_id, "XUID-1");

        let checked = client.check_code(&info.code).await.unwrap();
        assert_eq!(checked, info);

        match client.issue_code("XUID-1").await {
            Err(ClientError::Application(e)) => {
                assert!(e.is_conflict());
                assert!(e.message.contains(&info.code));
            }
            other => panic!("expected conflict, got {:?}", other.map(|i| i.code)),
        }

        client.revoke_code(&info.code).await.unwrap();
        match client.check_code(&info.code).await {
            Err(ClientError::Application(e)) => assert!(e.is_not_found()),
            other => panic!("expected not found, got {:?}", other.map(|i| i.code)),
        }
    }

    #[tokio::test]
    async fn test_binding_lookups() {
        let (client, service) = client().await;

        match client.get_binding_by_game("XUID-1").await {
            Err(ClientError::Application(e)) => assert_eq!(e.code, 40400),
            other => panic!("expected not found, got {:?}", other),
        }

        service.create_binding("disc 1/a", "XUID-1").unwrap();

        let by_game = client.get_binding_by_game("XUID-1").await.unwrap();
        assert_eq!(by_game.chat_id, "disc 1/a");
        let by_chat = client.get_binding_by_chat("disc 1/a").await.unwrap();
        assert_eq!(by_chat.game_id, "XUID-1");
    }

    #[tokio::test]
    async fn test_wrong_token_is_unauthorized() {
        let (url, _) = spawn_server().await;
        let client = TetherClient::connect(&url, "not-the-token").await.unwrap();

        match client.issue_code("XUID-1").await {
            Err(ClientError::Application(e)) => assert_eq!(e.status_code(), 401),
            other => panic!("expected unauthorized, got {:?}", other.map(|i| i.code)),
        }
    }

    #[tokio::test]
    async fn test_connect_fails_without_server() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = TetherClient::connect(&format!("http://{}", addr), TOKEN).await;
        assert!(matches!(result, Err(ClientError::Unreachable(_))));
    }

    #[test]
    fn test_rejects_invalid_host() {
        assert!(matches!(
            TetherClient::new("not a url", TOKEN),
            Err(ClientError::InvalidUrl(_))
        ));
    }
}
