pub mod catalog;
pub mod history;
pub mod layout;
pub mod preferences;
pub mod reveal;
pub mod screen;
pub mod selection;
pub mod session;

pub use crate::domain::model::{CardSlot, ModalMessage, ReadingRequest, RevealResponse};
pub use crate::domain::ports::{AccountGateway, GatewaySettings, PersistencePort, ReadingGateway};
pub use crate::utils::error::Result;
