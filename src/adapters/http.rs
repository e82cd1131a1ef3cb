use crate::core::history::normalize_history;
use crate::domain::model::{Endpoint, HistoryEntry, ReadingRequest, RevealResponse};
use crate::domain::ports::{AccountGateway, GatewaySettings, ReadingGateway};
use crate::utils::error::{ReadingError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};

/// reqwest-backed client for the reading server.
pub struct HttpGateway<C: GatewaySettings> {
    settings: C,
    client: Client,
}

impl<C: GatewaySettings> HttpGateway<C> {
    pub fn new(settings: C) -> Self {
        Self {
            settings,
            client: Client::new(),
        }
    }

    pub fn settings(&self) -> &C {
        &self.settings
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!(
            "{}{}",
            self.settings.base_url().trim_end_matches('/'),
            endpoint.path()
        )
    }

    fn prepare(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder
            .header("Content-Type", "application/json")
            .header("X-API-Key", self.settings.api_key());
        match self.settings.timeout() {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    async fn decode(&self, url: &str, response: Response, is_post: bool) -> Result<Value> {
        let status = response.status();
        tracing::debug!("Response status from {}: {}", url, status);

        if status.is_success() {
            return Ok(response.json().await?);
        }
        match status {
            StatusCode::NOT_FOUND => Err(ReadingError::EndpointNotFound {
                endpoint: url.to_string(),
            }),
            StatusCode::UNPROCESSABLE_ENTITY if is_post => {
                Err(ReadingError::InterpretationUnavailable)
            }
            other => Err(ReadingError::HttpStatus {
                status: other.as_u16(),
            }),
        }
    }

    pub async fn post(&self, endpoint: Endpoint, body: &Value) -> Result<Value> {
        let url = self.url(endpoint);
        tracing::debug!("POST {}", url);
        let response = self.prepare(self.client.post(&url)).json(body).send().await?;
        self.decode(&url, response, true).await
    }

    pub async fn get(&self, endpoint: Endpoint) -> Result<Value> {
        let url = self.url(endpoint);
        tracing::debug!("GET {}", url);
        let response = self
            .prepare(self.client.get(&url))
            .header("accept", "application/json")
            .query(&[("user_id", self.settings.user_id())])
            .send()
            .await?;
        self.decode(&url, response, false).await
    }
}

#[async_trait]
impl<C: GatewaySettings> ReadingGateway for HttpGateway<C> {
    async fn reveal(&self, request: &ReadingRequest) -> Result<RevealResponse> {
        let body = request.body(self.settings.user_id());
        let value = self.post(request.endpoint, &body).await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl<C: GatewaySettings> AccountGateway for HttpGateway<C> {
    async fn tarot_reading(&self, reading_type: &str) -> Result<String> {
        let body = json!({"type": reading_type, "userId": self.settings.user_id()});
        let value = self.post(Endpoint::TarotReading, &body).await?;
        Ok(match value.get("result") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        })
    }

    async fn user_profile(&self) -> Result<Value> {
        self.get(Endpoint::UserProfile).await
    }

    async fn history(&self) -> Vec<HistoryEntry> {
        match self.get(Endpoint::UserHistory).await {
            Ok(raw) => normalize_history(&raw, chrono::Utc::now()),
            Err(e) => {
                tracing::error!("Error fetching tarot history: {}", e);
                Vec::new()
            }
        }
    }

    async fn delete_history(&self, id: &str) -> Result<()> {
        let body = json!({"id": id, "userId": self.settings.user_id()});
        self.post(Endpoint::DeleteHistory, &body).await?;
        Ok(())
    }

    async fn update_autopayment(&self, enabled: bool) -> Result<()> {
        let body = json!({"enabled": enabled, "userId": self.settings.user_id()});
        self.post(Endpoint::UpdateAutopayment, &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::GatewayConfig;
    use crate::domain::model::RevealParams;
    use httpmock::prelude::*;

    fn gateway(server: &MockServer) -> HttpGateway<GatewayConfig> {
        HttpGateway::new(GatewayConfig::new(server.base_url()))
    }

    #[tokio::test]
    async fn test_reveal_posts_body_with_api_key() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/analyze")
                .header("X-API-Key", "V1")
                .json_body(json!({"cards": [0, 1, 2, 3, 4], "category": "Суть", "userId": "7300593025"}));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"message": "ok", "meanings": ["a", "b", "c", "d", "e"]}));
        });

        let request = ReadingRequest::new(
            Endpoint::Analyze,
            vec![0, 1, 2, 3, 4],
            RevealParams {
                category: "Суть".to_string(),
                ..Default::default()
            },
        );
        let response = gateway(&server).reveal(&request).await.unwrap();

        api_mock.assert();
        assert_eq!(response.message, "ok");
        assert_eq!(response.meanings.len(), 5);
    }

    #[tokio::test]
    async fn test_status_codes_map_to_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/tarot-reveal");
            then.status(422);
        });
        server.mock(|when, then| {
            when.method(POST).path("/runes-reveal");
            then.status(503);
        });
        let gw = gateway(&server);

        let err = gw
            .reveal(&ReadingRequest::new(Endpoint::TarotReveal, vec![1], RevealParams::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, ReadingError::InterpretationUnavailable));

        let err = gw
            .reveal(&ReadingRequest::new(Endpoint::RunesReveal, vec![1], RevealParams::default()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 503");

        let err = gw
            .reveal(&ReadingRequest::new(Endpoint::Analyze, vec![1], RevealParams::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, ReadingError::EndpointNotFound { .. }));
    }

    #[tokio::test]
    async fn test_history_get_sends_user_and_unwraps() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/user/history")
                .query_param("user_id", "7300593025")
                .header("accept", "application/json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"history": [{"question": "Q", "cards": ["1"], "summary": "S"}]}));
        });

        let entries = gateway(&server).history().await;

        api_mock.assert();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].question, "Q");
    }

    #[tokio::test]
    async fn test_history_failure_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/user/history");
            then.status(403);
        });
        assert!(gateway(&server).history().await.is_empty());
    }

    #[tokio::test]
    async fn test_tarot_reading_returns_result_text() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/tarot-reading")
                .json_body(json!({"type": "Совет дня", "userId": "7300593025"}));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"result": "Доверьтесь интуиции"}));
        });

        let text = gateway(&server).tarot_reading("Совет дня").await.unwrap();
        assert_eq!(text, "Доверьтесь интуиции");
    }

    #[tokio::test]
    async fn test_user_profile_queries_by_user_id() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/user/profile")
                .query_param("user_id", "7300593025")
                .header("X-API-Key", "V1");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"username": "luna", "subscription": {"active": true}}));
        });

        let profile = gateway(&server).user_profile().await.unwrap();

        api_mock.assert();
        assert_eq!(profile["username"], "luna");
        assert_eq!(profile["subscription"]["active"], true);
    }
}
