use clap::Parser;
use std::sync::Arc;
use tarot_reading::core::catalog::{ScreenKind, ScreenSpec, TopicField};
use tarot_reading::core::history::HistoryBook;
use tarot_reading::core::preferences::Preferences;
use tarot_reading::core::ReadingGateway;
use tarot_reading::domain::model::ModalKind;
use tarot_reading::domain::ports::{AccountGateway, PersistencePort};
use tarot_reading::utils::logger::{self, LogFormat};
use tarot_reading::utils::{validation, validation::Validate};
use tarot_reading::{
    Action, CliConfig, FileStore, HttpGateway, MemoryStore, ReadingScreen, ReadingSession,
    RuneOracle, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let mut config = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path, e);
                std::process::exit(1);
            }
        },
        None => TomlConfig::default(),
    };
    cli.apply_overrides(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    logger::init_logger(
        config.log_level(),
        cli.verbose,
        LogFormat::from_flag(config.json_logs()),
    );
    tracing::info!("Starting tarot-reading CLI");
    tracing::debug!("CLI config: {:?}", cli);

    let store: Arc<dyn PersistencePort> = match config.state_file() {
        Some(path) => Arc::new(FileStore::new(path)),
        None => Arc::new(MemoryStore::new()),
    };
    let gateway = Arc::new(HttpGateway::new(config.gateway.clone()));

    if cli.profile {
        match gateway.user_profile().await {
            Ok(profile) => println!("{}", serde_json::to_string_pretty(&profile)?),
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(2);
            }
        }
        return Ok(());
    }

    if cli.history {
        let book = HistoryBook::new(store);
        if let Err(e) = book.enforce_weekly_clear(gateway.as_ref(), chrono::Utc::now()).await {
            tracing::error!("💡 {}", e.recovery_suggestion());
            eprintln!("❌ Не удалось очистить историю. Пожалуйста, попробуйте снова. ({})", e);
        }
        for entry in book.load(gateway.as_ref()).await? {
            println!("{} | {} | {} | {}", entry.date, entry.question, entry.cards.join(", "), entry.summary);
        }
        return Ok(());
    }

    if cli.toggle_autopayment {
        let note = Preferences::new(store).toggle_autopayment(gateway.as_ref()).await?;
        println!("{}: {}", note.title, note.message);
        if note.is_error {
            std::process::exit(2);
        }
        return Ok(());
    }

    let mut spec = ScreenSpec::for_kind(cli.screen);
    if let Some(layout) = cli.layout() {
        spec = spec.with_layout(layout);
    }

    if let Err(e) = validation::validate_slot_indices("select", &cli.select, spec.total_slots) {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let actions = build_actions(&cli, &spec);
    let mut screen = ReadingScreen::new(spec);

    let reader: Box<dyn ReadingGateway> = match cli.screen {
        ScreenKind::RuneReading => Box::new(RuneOracle::new()),
        _ => Box::new(gateway.clone()),
    };
    let session = ReadingSession::new(reader).with_account(gateway);
    let modals = session.run(&mut screen, &actions).await;

    println!("🃏 {} ({})", screen.spec().title, screen.spec().layout);
    for card in screen.render() {
        println!(
            "{} {:<40} rotate={:>6.1} x={:>6.1} y={:>6.1}",
            if card.selected { "●" } else { "○" },
            card.label,
            card.rotate_deg,
            card.translate_x,
            card.translate_y
        );
    }

    for modal in &modals {
        println!("\n{}", modal.text);
    }

    let last = modals.last();
    match last.map(|m| m.kind) {
        Some(ModalKind::Error) => std::process::exit(2),
        Some(ModalKind::Validation) => std::process::exit(1),
        _ => Ok(()),
    }
}

fn build_actions(cli: &CliConfig, spec: &ScreenSpec) -> Vec<Action> {
    let mut actions = Vec::new();

    for raw in &cli.topic {
        let (field, value) = match raw.split_once('=') {
            Some((field, value)) => match field.parse::<TopicField>() {
                Ok(field) => (field, value),
                Err(e) => {
                    tracing::warn!("{}", e);
                    continue;
                }
            },
            None => match spec.topics.first() {
                Some(topic) => (topic.field, raw.as_str()),
                None => continue,
            },
        };
        actions.push(Action::ChooseTopic(field, value.to_string()));
    }

    for (position, &index) in cli.select.iter().enumerate() {
        if let Some(period) = cli.period.get(position) {
            actions.push(Action::ActivatePartition(period.clone()));
        }
        actions.push(Action::Click(index));
    }

    if let Some(reading) = &cli.reading {
        actions.push(Action::QuickReading(reading.clone()));
        if cli.select.is_empty() {
            return actions;
        }
    }

    actions.push(Action::Reveal);
    actions
}
