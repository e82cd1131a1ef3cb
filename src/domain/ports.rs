use crate::domain::model::{HistoryEntry, ReadingRequest, RevealResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Resolves selected slots into interpretive text.
#[async_trait]
pub trait ReadingGateway: Send + Sync {
    async fn reveal(&self, request: &ReadingRequest) -> Result<RevealResponse>;
}

/// Account-level calls used by the profile and history views.
#[async_trait]
pub trait AccountGateway: Send + Sync {
    async fn tarot_reading(&self, reading_type: &str) -> Result<String>;
    async fn user_profile(&self) -> Result<serde_json::Value>;
    async fn history(&self) -> Vec<HistoryEntry>;
    async fn delete_history(&self, id: &str) -> Result<()>;
    async fn update_autopayment(&self, enabled: bool) -> Result<()>;
}

/// Key/value store for flags and caches that outlive a screen.
pub trait PersistencePort: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn clear(&self, key: &str) -> Result<()>;
}

pub trait GatewaySettings: Send + Sync {
    fn base_url(&self) -> &str;
    fn api_key(&self) -> &str;
    fn user_id(&self) -> &str;
    fn timeout(&self) -> Option<Duration>;
}

#[async_trait]
impl<T: ReadingGateway + ?Sized> ReadingGateway for Box<T> {
    async fn reveal(&self, request: &ReadingRequest) -> Result<RevealResponse> {
        (**self).reveal(request).await
    }
}

#[async_trait]
impl<T: ReadingGateway + ?Sized> ReadingGateway for Arc<T> {
    async fn reveal(&self, request: &ReadingRequest) -> Result<RevealResponse> {
        (**self).reveal(request).await
    }
}
