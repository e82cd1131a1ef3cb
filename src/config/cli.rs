use crate::config::toml_config::{StorageConfig, TomlConfig};
use crate::core::catalog::ScreenKind;
use crate::core::layout::LayoutKind;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "tarot-reading")]
#[command(about = "Run a card reading screen from the terminal")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, default_value = "love")]
    pub screen: ScreenKind,

    /// Override the screen's layout (fan, square, rune)
    #[arg(long)]
    pub layout: Option<LayoutKind>,

    #[arg(long, default_value = "5", help = "Columns for the square layout")]
    pub columns: usize,

    /// Slots to click, in order
    #[arg(long, value_delimiter = ',')]
    pub select: Vec<usize>,

    /// Period receiving each click on partitioned screens, one per click
    #[arg(long, value_delimiter = ',')]
    pub period: Vec<String>,

    /// Topic choices, each `field=value` or just the value for the screen's first topic
    #[arg(long)]
    pub topic: Vec<String>,

    /// Quick reading for a type (love topic or tarot reading type)
    #[arg(long)]
    pub reading: Option<String>,

    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub state_file: Option<String>,

    /// Show reading history instead of running a screen
    #[arg(long)]
    pub history: bool,

    /// Flip the autopayment flag instead of running a screen
    #[arg(long, conflicts_with = "history")]
    pub toggle_autopayment: bool,

    /// Print the user profile instead of running a screen
    #[arg(long, conflicts_with_all = ["history", "toggle_autopayment"])]
    pub profile: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn layout(&self) -> Option<LayoutKind> {
        self.layout.map(|layout| match layout {
            LayoutKind::Square { .. } => LayoutKind::Square {
                columns: self.columns,
            },
            other => other,
        })
    }

    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(base_url) = &self.base_url {
            config.gateway.base_url = base_url.clone();
        }
        if let Some(state_file) = &self.state_file {
            config.storage = Some(StorageConfig {
                state_file: state_file.clone(),
            });
        }
    }
}
