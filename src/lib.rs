pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::adapters::{http::HttpGateway, oracle::RuneOracle, storage::{FileStore, MemoryStore}};
pub use config::{GatewayConfig, TomlConfig};
pub use crate::core::{
    catalog::{ScreenKind, ScreenSpec},
    layout::LayoutKind,
    reveal::RevealMap,
    screen::{ReadingScreen, ScreenState},
    selection::SelectionModel,
    session::{Action, ReadingSession},
};
pub use utils::error::{ReadingError, Result};
