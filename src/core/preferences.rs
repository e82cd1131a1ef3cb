use crate::domain::ports::{AccountGateway, PersistencePort};
use crate::utils::error::Result;

pub const AUTOPAYMENT_KEY: &str = "autoPaymentEnabled";
pub const AGREEMENT_KEY: &str = "userAgreementAccepted";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub is_error: bool,
}

/// User flags backed by an injected store.
pub struct Preferences<P: PersistencePort> {
    store: P,
}

impl<P: PersistencePort> Preferences<P> {
    pub fn new(store: P) -> Self {
        Self { store }
    }

    fn flag(&self, key: &str) -> Result<bool> {
        Ok(self.store.get(key)?.as_deref() == Some("true"))
    }

    fn set_flag(&self, key: &str, value: bool) -> Result<()> {
        self.store.set(key, if value { "true" } else { "false" })
    }

    pub fn autopayment_enabled(&self) -> Result<bool> {
        self.flag(AUTOPAYMENT_KEY)
    }

    pub fn agreement_accepted(&self) -> Result<bool> {
        self.flag(AGREEMENT_KEY)
    }

    pub fn accept_agreement(&self) -> Result<()> {
        self.set_flag(AGREEMENT_KEY, true)
    }

    /// 切換自動扣款：先更新本地旗標，伺服器失敗時還原
    pub async fn toggle_autopayment<G>(&self, gateway: &G) -> Result<Notification>
    where
        G: AccountGateway + ?Sized,
    {
        let enabled = !self.autopayment_enabled()?;
        self.set_flag(AUTOPAYMENT_KEY, enabled)?;

        match gateway.update_autopayment(enabled).await {
            Ok(()) => {
                tracing::info!("Autopayment set to {}", enabled);
                Ok(Notification {
                    title: if enabled {
                        "Автоплатеж включен"
                    } else {
                        "Автоплатеж отключен"
                    }
                    .to_string(),
                    message: if enabled {
                        "Автоплатеж успешно включен."
                    } else {
                        "Автоплатеж успешно отключен."
                    }
                    .to_string(),
                    is_error: false,
                })
            }
            Err(e) => {
                tracing::error!("Autopayment update failed, reverting: {}", e);
                self.set_flag(AUTOPAYMENT_KEY, !enabled)?;
                Ok(Notification {
                    title: "Ошибка".to_string(),
                    message: "Не удалось обновить статус автоплатежа на сервере. Попробуйте снова."
                        .to_string(),
                    is_error: true,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStore;
    use crate::domain::model::HistoryEntry;
    use crate::utils::error::ReadingError;
    use async_trait::async_trait;

    struct FlakyAccount {
        fail: bool,
    }

    #[async_trait]
    impl AccountGateway for FlakyAccount {
        async fn tarot_reading(&self, _reading_type: &str) -> Result<String> {
            Ok(String::new())
        }

        async fn user_profile(&self) -> Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }

        async fn history(&self) -> Vec<HistoryEntry> {
            Vec::new()
        }

        async fn delete_history(&self, _id: &str) -> Result<()> {
            Ok(())
        }

        async fn update_autopayment(&self, _enabled: bool) -> Result<()> {
            if self.fail {
                Err(ReadingError::HttpStatus { status: 500 })
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_toggle_autopayment_persists_flag() {
        let prefs = Preferences::new(MemoryStore::new());
        assert!(!prefs.autopayment_enabled().unwrap());

        let note = prefs
            .toggle_autopayment(&FlakyAccount { fail: false })
            .await
            .unwrap();

        assert!(!note.is_error);
        assert_eq!(note.title, "Автоплатеж включен");
        assert!(prefs.autopayment_enabled().unwrap());
    }

    #[tokio::test]
    async fn test_toggle_autopayment_reverts_on_failure() {
        let prefs = Preferences::new(MemoryStore::new());

        let note = prefs
            .toggle_autopayment(&FlakyAccount { fail: true })
            .await
            .unwrap();

        assert!(note.is_error);
        assert!(!prefs.autopayment_enabled().unwrap());
    }

    #[test]
    fn test_agreement_flag() {
        let prefs = Preferences::new(MemoryStore::new());
        assert!(!prefs.agreement_accepted().unwrap());
        prefs.accept_agreement().unwrap();
        assert!(prefs.agreement_accepted().unwrap());
    }
}
