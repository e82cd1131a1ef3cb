use crate::domain::model::{ReadingRequest, RevealResponse};
use crate::domain::ports::ReadingGateway;
use crate::utils::error::{ReadingError, Result};
use async_trait::async_trait;

const RUNES: [(&str, &str); 7] = [
    ("Феху", "Богатство и процветание ждут вас"),
    ("Уруз", "Сила и выносливость помогут преодолеть препятствия"),
    ("Турисаз", "Защита и оборона от негативных влияний"),
    ("Ансуз", "Мудрость и знания откроются вам"),
    ("Райдо", "Путешествие и движение к цели"),
    ("Кеназ", "Творчество и вдохновение"),
    ("Гебо", "Дар и взаимный обмен энергией"),
];

/// Answers rune readings locally from a fixed table.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuneOracle;

impl RuneOracle {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReadingGateway for RuneOracle {
    async fn reveal(&self, request: &ReadingRequest) -> Result<RevealResponse> {
        let meanings = request
            .cards
            .iter()
            .map(|&slot| {
                RUNES
                    .get(slot)
                    .map(|(name, meaning)| format!("{}: {}", name, meaning))
                    .ok_or_else(|| ReadingError::gateway(format!("Нет руны в позиции {}", slot + 1)))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("Rune oracle answered {} rune(s)", meanings.len());
        Ok(RevealResponse {
            message: format!(
                "Руны дают ответ на ваш вопрос о {}",
                request.params.question.to_lowercase()
            ),
            meanings,
        })
    }
}
