use crate::core::catalog::{QuickReadingSource, TopicField};
use crate::core::screen::ReadingScreen;
use crate::domain::model::{CardSlot, ModalMessage};
use crate::domain::ports::{AccountGateway, ReadingGateway};
use std::sync::Arc;

/// One user interaction with a reading screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Click(CardSlot),
    ActivatePartition(String),
    ChooseTopic(TopicField, String),
    /// Quick reading for a named type, answered locally or by the account gateway.
    QuickReading(String),
    Reveal,
    CloseModal,
}

/// Drives a screen through a scripted sequence of actions.
pub struct ReadingSession<G: ReadingGateway> {
    gateway: G,
    account: Option<Arc<dyn AccountGateway>>,
}

impl<G: ReadingGateway> ReadingSession<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            account: None,
        }
    }

    /// Gateway used for quick readings that go to the server.
    pub fn with_account(mut self, account: Arc<dyn AccountGateway>) -> Self {
        self.account = Some(account);
        self
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Replays `actions` in order and returns every modal raised along the way.
    pub async fn run(&self, screen: &mut ReadingScreen, actions: &[Action]) -> Vec<ModalMessage> {
        let mut modals = Vec::new();
        tracing::debug!("Replaying {} action(s) on {}", actions.len(), screen.spec().kind);

        for action in actions {
            match action {
                Action::Click(index) => {
                    if !screen.click(*index) {
                        tracing::debug!("Click on {} left the selection unchanged", index);
                    }
                }
                Action::ActivatePartition(name) => {
                    if !screen.set_active_partition(name) {
                        tracing::warn!("No partition '{}' on {}", name, screen.spec().kind);
                    }
                }
                Action::ChooseTopic(field, value) => {
                    screen.choose_topic(*field, value);
                }
                Action::QuickReading(reading_type) => {
                    let source = screen.spec().quick_reading.map(|quick| quick.source);
                    let modal = match (source, &self.account) {
                        (Some(QuickReadingSource::Remote), Some(account)) => {
                            screen.remote_reading(account.as_ref(), reading_type).await
                        }
                        (Some(QuickReadingSource::Remote), None) => {
                            tracing::warn!("No account gateway for quick reading on {}", screen.spec().kind);
                            None
                        }
                        _ => screen.canned_reading(reading_type),
                    };
                    modals.extend(modal);
                }
                Action::Reveal => modals.push(screen.reveal(&self.gateway).await),
                Action::CloseModal => screen.close_modal(),
            }
        }

        modals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::oracle::RuneOracle;
    use crate::core::catalog::{ScreenKind, ScreenSpec};
    use crate::domain::model::ModalKind;

    #[tokio::test]
    async fn test_rune_reading_requires_question() {
        let session = ReadingSession::new(RuneOracle::new());
        let mut screen = ReadingScreen::new(ScreenSpec::for_kind(ScreenKind::RuneReading));

        let modals = session
            .run(
                &mut screen,
                &[
                    Action::Click(0),
                    Action::Click(3),
                    Action::Click(5),
                    Action::Reveal,
                    Action::ChooseTopic(TopicField::Question, "Духовный путь".to_string()),
                    Action::Reveal,
                ],
            )
            .await;

        assert_eq!(modals.len(), 2);
        assert_eq!(modals[0].text, "Пожалуйста, выберите ровно 3 руны и тип вопроса.");
        assert_eq!(modals[1].kind, ModalKind::Result);
        assert!(modals[1].text.starts_with("Руны дают ответ на ваш вопрос о духовный путь"));
        assert!(modals[1].text.contains("Ансуз: Мудрость и знания откроются вам"));
        assert_eq!(screen.revealed().get(5), Some("Кеназ: Творчество и вдохновение"));
    }

    #[tokio::test]
    async fn test_boxed_gateway_drives_session() {
        let gateway: Box<dyn ReadingGateway> = Box::new(RuneOracle::new());
        let session = ReadingSession::new(gateway);
        let mut screen = ReadingScreen::new(ScreenSpec::for_kind(ScreenKind::RuneReading));

        let modals = session.run(&mut screen, &[Action::Click(1), Action::CloseModal]).await;

        assert!(modals.is_empty());
        assert_eq!(screen.selected(), vec![1]);
    }

    #[tokio::test]
    async fn test_love_quick_reading_needs_no_account() {
        let session = ReadingSession::new(RuneOracle::new());
        let mut screen = ReadingScreen::new(ScreenSpec::for_kind(ScreenKind::Love));

        let modals = session
            .run(
                &mut screen,
                &[
                    Action::QuickReading("Чувства партнера".to_string()),
                    Action::QuickReading("Гороскоп".to_string()),
                ],
            )
            .await;

        assert_eq!(modals.len(), 1);
        assert!(modals[0].text.starts_with("Результат расклада на любовь для \"Чувства партнера\""));
    }

    #[tokio::test]
    async fn test_remote_quick_reading_without_account_is_skipped() {
        let session = ReadingSession::new(RuneOracle::new());
        let mut screen = ReadingScreen::new(ScreenSpec::for_kind(ScreenKind::Tarot));

        let modals = session
            .run(&mut screen, &[Action::QuickReading("Совет дня".to_string())])
            .await;

        assert!(modals.is_empty());
        assert!(screen.modal().is_none());
    }
}
