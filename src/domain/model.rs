use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Zero-based position of a card in a screen's layout.
pub type CardSlot = usize;

/// Logical operations exposed by the reading server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Endpoint {
    Analyze,
    TarotReveal,
    PersonalForecast,
    RunesReveal,
    SpiritualGrowth,
    TarotReading,
    UserProfile,
    UserHistory,
    DeleteHistory,
    UpdateAutopayment,
}

impl Endpoint {
    pub const REVEAL_ENDPOINTS: [Endpoint; 5] = [
        Endpoint::Analyze,
        Endpoint::TarotReveal,
        Endpoint::PersonalForecast,
        Endpoint::RunesReveal,
        Endpoint::SpiritualGrowth,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Analyze => "/analyze",
            Endpoint::TarotReveal => "/tarot-reveal",
            Endpoint::PersonalForecast => "/personal-forecast",
            Endpoint::RunesReveal => "/runes-reveal",
            Endpoint::SpiritualGrowth => "/spiritual-growth",
            Endpoint::TarotReading => "/tarot-reading",
            Endpoint::UserProfile => "/user/profile",
            Endpoint::UserHistory => "/user/history",
            Endpoint::DeleteHistory => "/user/delete-tarot-history",
            Endpoint::UpdateAutopayment => "/payment/update-autopayment",
        }
    }
}

/// Free-form strings that travel with a reveal next to the selected cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealParams {
    pub category: String,
    pub reading_type: String,
    pub time_periods: Vec<String>,
    pub rune_aspect: String,
    pub relationship_aspect: String,
    pub aspect: String,
    pub question: String,
}

/// Everything a gateway needs to resolve one reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingRequest {
    pub endpoint: Endpoint,
    pub cards: Vec<CardSlot>,
    pub params: RevealParams,
}

impl ReadingRequest {
    pub fn new(endpoint: Endpoint, cards: Vec<CardSlot>, params: RevealParams) -> Self {
        Self {
            endpoint,
            cards,
            params,
        }
    }

    /// 依端點組出請求主體 (欄位名稱沿用伺服器的 camelCase)
    pub fn body(&self, user_id: &str) -> Value {
        let p = &self.params;
        match self.endpoint {
            Endpoint::TarotReveal => json!({
                "cards": self.cards,
                "timePeriods": p.time_periods,
                "readingType": p.reading_type,
                "userId": user_id,
            }),
            Endpoint::RunesReveal => json!({
                "runes": self.cards,
                "runeAspect": p.rune_aspect,
                "relationshipAspect": p.relationship_aspect,
                "userId": user_id,
            }),
            Endpoint::SpiritualGrowth => json!({
                "cards": self.cards,
                "aspect": p.aspect,
                "userId": user_id,
            }),
            _ => json!({
                "cards": self.cards,
                "category": p.category,
                "userId": user_id,
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub meanings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_type: Option<String>,
    pub question: String,
    pub cards: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    Result,
    Validation,
    Error,
}

/// Text the screen asks its host to show in the result modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalMessage {
    pub kind: ModalKind,
    pub text: String,
}

impl ModalMessage {
    pub fn result(text: impl Into<String>) -> Self {
        Self {
            kind: ModalKind::Result,
            text: text.into(),
        }
    }

    pub fn validation(text: impl Into<String>) -> Self {
        Self {
            kind: ModalKind::Validation,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: ModalKind::Error,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tarot_reveal_body_uses_wire_names() {
        let request = ReadingRequest::new(
            Endpoint::TarotReveal,
            vec![1, 4, 7],
            RevealParams {
                time_periods: vec!["Прошлое".to_string()],
                reading_type: "Совет дня".to_string(),
                ..Default::default()
            },
        );
        let body = request.body("42");
        assert_eq!(body["cards"], json!([1, 4, 7]));
        assert_eq!(body["timePeriods"], json!(["Прошлое"]));
        assert_eq!(body["readingType"], "Совет дня");
        assert_eq!(body["userId"], "42");
        assert!(body.get("category").is_none());
    }

    #[test]
    fn test_runes_body_renames_cards() {
        let request = ReadingRequest::new(Endpoint::RunesReveal, vec![0, 2, 3], RevealParams::default());
        let body = request.body("42");
        assert_eq!(body["runes"], json!([0, 2, 3]));
        assert!(body.get("cards").is_none());
        assert_eq!(body["runeAspect"], "");
    }

    #[test]
    fn test_reveal_response_tolerates_missing_meanings() {
        let response: RevealResponse = serde_json::from_value(json!({"message": "ok"})).unwrap();
        assert_eq!(response.message, "ok");
        assert!(response.meanings.is_empty());
    }
}
