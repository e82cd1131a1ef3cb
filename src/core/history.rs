use crate::domain::model::HistoryEntry;
use crate::domain::ports::{AccountGateway, PersistencePort};
use crate::utils::error::Result;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

pub const HISTORY_CACHE_KEY: &str = "tarotHistory";
pub const LAST_CLEAR_KEY: &str = "lastClearDate";
pub const CLEAR_ALL_ID: &str = "all";
const CLEAR_INTERVAL_DAYS: i64 = 7;

/// Turns whatever the history endpoint returned into display entries.
///
/// Accepts a bare array or an object with a `history` array; anything else is empty.
pub fn normalize_history(raw: &Value, now: DateTime<Utc>) -> Vec<HistoryEntry> {
    let items = match raw {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("history") {
            Some(Value::Array(items)) => items,
            _ => {
                tracing::error!("Unexpected response format for tarot history");
                return Vec::new();
            }
        },
        _ => {
            tracing::error!("Unexpected response format for tarot history");
            return Vec::new();
        }
    };

    let base_id = now.timestamp_millis();
    items
        .iter()
        .enumerate()
        .map(|(index, item)| normalize_entry(item, base_id + index as i64))
        .collect()
}

fn text_field<'a>(item: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| item.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
}

fn normalize_entry(item: &Value, id: i64) -> HistoryEntry {
    let cards = match item.get("cards") {
        Some(Value::Array(cards)) => cards
            .iter()
            .map(|card| match card {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(s)) => s.split(',').map(|c| c.trim().to_string()).collect(),
        Some(other) => {
            tracing::warn!("Non-array cards data found: {}", other);
            Vec::new()
        }
        None => Vec::new(),
    };

    let date = text_field(item, &["date"])
        .map(format_date)
        .unwrap_or_default();

    HistoryEntry {
        id: id.to_string(),
        date,
        reading_type: text_field(item, &["readingType", "reading_type"]).map(str::to_string),
        question: text_field(item, &["question"])
            .unwrap_or("Вопрос не указан")
            .to_string(),
        cards,
        summary: text_field(item, &["summary", "interpretation"])
            .unwrap_or("Нет описания")
            .to_string(),
    }
}

fn format_date(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%d.%m.%Y %H:%M").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%d.%m.%Y %H:%M").to_string();
    }
    raw.to_string()
}

/// 歷史紀錄：伺服器讀取、本地快取與每週清除
pub struct HistoryBook<P: PersistencePort> {
    store: P,
}

impl<P: PersistencePort> HistoryBook<P> {
    pub fn new(store: P) -> Self {
        Self { store }
    }

    pub async fn load<G>(&self, gateway: &G) -> Result<Vec<HistoryEntry>>
    where
        G: AccountGateway + ?Sized,
    {
        let entries = gateway.history().await;
        self.store
            .set(HISTORY_CACHE_KEY, &serde_json::to_string(&entries)?)?;
        tracing::debug!("Cached {} history entries", entries.len());
        Ok(entries)
    }

    pub fn cached(&self) -> Result<Vec<HistoryEntry>> {
        match self.store.get(HISTORY_CACHE_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn clear_due(&self, now: DateTime<Utc>) -> Result<bool> {
        let last = self
            .store
            .get(LAST_CLEAR_KEY)?
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok());
        Ok(match last {
            Some(last) => (now - last.with_timezone(&Utc)).num_days().abs() > CLEAR_INTERVAL_DAYS,
            None => true,
        })
    }

    /// Clears server and cached history when the last clear is over a week old.
    ///
    /// The clear date only advances once the server accepted the delete.
    pub async fn enforce_weekly_clear<G>(&self, gateway: &G, now: DateTime<Utc>) -> Result<bool>
    where
        G: AccountGateway + ?Sized,
    {
        if !self.clear_due(now)? {
            return Ok(false);
        }

        tracing::info!("🧹 Weekly history clear");
        gateway.delete_history(CLEAR_ALL_ID).await?;
        self.store.clear(HISTORY_CACHE_KEY)?;
        self.store.set(LAST_CLEAR_KEY, &now.to_rfc3339())?;
        Ok(true)
    }
}
