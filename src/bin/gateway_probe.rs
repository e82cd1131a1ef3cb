use tarot_reading::core::ReadingGateway;
use tarot_reading::domain::model::{Endpoint, ReadingRequest, RevealParams};
use tarot_reading::utils::logger::{self, LogFormat};
use tarot_reading::utils::validation::Validate;
use tarot_reading::{HttpGateway, TomlConfig};

/// 對每個揭示端點送出一筆範例請求
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => TomlConfig::from_file(path)?,
        None => TomlConfig::default(),
    };
    config.validate()?;
    logger::init_logger(
        config.log_level(),
        false,
        LogFormat::from_flag(config.json_logs()),
    );

    println!("🚀 Probing reveal endpoints at {}", config.gateway.base_url);
    let gateway = HttpGateway::new(config.gateway.clone());

    let mut failures = 0;
    for endpoint in Endpoint::REVEAL_ENDPOINTS {
        let cards = match endpoint {
            Endpoint::SpiritualGrowth => vec![0],
            Endpoint::Analyze => vec![0, 1, 2, 3, 4],
            _ => vec![0, 1, 2],
        };
        let request = ReadingRequest::new(endpoint, cards, RevealParams::default());

        match gateway.reveal(&request).await {
            Ok(response) => println!(
                "  ✅ {}: {} meaning(s), message: {}",
                endpoint.path(),
                response.meanings.len(),
                response.message
            ),
            Err(e) => {
                failures += 1;
                println!("  ❌ {}: {}", endpoint.path(), e);
            }
        }
    }

    println!(
        "📊 {} of {} endpoints answered",
        Endpoint::REVEAL_ENDPOINTS.len() - failures,
        Endpoint::REVEAL_ENDPOINTS.len()
    );
    if failures > 0 {
        std::process::exit(2);
    }
    Ok(())
}
