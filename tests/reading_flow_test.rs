use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use tarot_reading::core::catalog::TopicField;
use tarot_reading::domain::model::ModalKind;
use tarot_reading::utils::error::INTERPRETATION_UNAVAILABLE_TEXT;
use tarot_reading::{
    Action, GatewayConfig, HttpGateway, LayoutKind, ReadingScreen, ReadingSession, RevealMap,
    ScreenKind, ScreenSpec, ScreenState,
};

fn session(server: &MockServer) -> ReadingSession<HttpGateway<GatewayConfig>> {
    ReadingSession::new(HttpGateway::new(GatewayConfig::new(server.base_url())))
}

#[tokio::test]
async fn test_love_reading_reveals_selected_slots() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/tarot-reveal")
            .header("X-API-Key", "V1")
            .json_body(json!({
                "cards": [0, 4, 8],
                "timePeriods": [],
                "readingType": "",
                "userId": "7300593025"
            }));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"message": "ok", "meanings": ["A", "B", "C"]}));
    });

    let mut screen = ReadingScreen::new(ScreenSpec::for_kind(ScreenKind::Love));
    let modals = session(&server)
        .run(
            &mut screen,
            &[
                Action::QuickReading("Совет в любви".to_string()),
                Action::Click(0),
                Action::Click(4),
                Action::Click(8),
                Action::Reveal,
            ],
        )
        .await;

    api_mock.assert();
    assert_eq!(
        modals[0].text,
        "Результат расклада на любовь для \"Совет в любви\": Карты указывают на гармонию в отношениях."
    );
    assert_eq!(modals[1].text, "Раскрытие карт: ok");
    assert_eq!(
        screen.revealed(),
        &RevealMap::from_iter([(0, "A"), (4, "B"), (8, "C")])
    );
    assert_eq!(screen.state(), ScreenState::Revealed);

    let labels: Vec<String> = screen.render().into_iter().map(|c| c.label).collect();
    assert_eq!(labels[0], "A");
    assert_eq!(labels[1], "Карта 2");
}

#[tokio::test]
async fn test_two_cards_never_reach_the_server() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/tarot-reveal");
        then.status(200).json_body(json!({"message": "ok", "meanings": []}));
    });

    let mut screen = ReadingScreen::new(ScreenSpec::for_kind(ScreenKind::Love));
    let modals = session(&server)
        .run(&mut screen, &[Action::Click(1), Action::Click(2), Action::Reveal])
        .await;

    api_mock.assert_hits(0);
    assert_eq!(modals[0].kind, ModalKind::Validation);
    assert_eq!(modals[0].text, "Пожалуйста, выберите ровно 3 карты для расклада.");
}

#[tokio::test]
async fn test_server_error_is_reported_in_modal() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/analyze");
        then.status(500);
    });

    let mut screen = ReadingScreen::new(ScreenSpec::for_kind(ScreenKind::SituationAnalysis));
    let mut actions: Vec<Action> = (0..5).map(Action::Click).collect();
    actions.push(Action::Reveal);

    let modals = session(&server).run(&mut screen, &actions).await;

    assert_eq!(modals[0].kind, ModalKind::Error);
    assert_eq!(modals[0].text, "Ошибка при анализе: HTTP error! status: 500");
    assert!(screen.revealed().is_empty());
    assert_eq!(screen.selected(), vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_unprocessable_reply_shows_ai_notice() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/personal-forecast");
        then.status(422);
    });

    let spec = ScreenSpec::for_kind(ScreenKind::PersonalForecast)
        .with_layout(LayoutKind::Square { columns: 5 });
    let mut screen = ReadingScreen::new(spec);
    let modals = session(&server)
        .run(
            &mut screen,
            &[Action::Click(0), Action::Click(1), Action::Click(2), Action::Reveal],
        )
        .await;

    assert!(modals[0].text.contains(INTERPRETATION_UNAVAILABLE_TEXT));
    assert_eq!(screen.render()[4].grid_cell, Some((0, 4)));
}

#[tokio::test]
async fn test_relationship_runes_send_both_aspects() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/runes-reveal").json_body(json!({
            "runes": [2, 5, 6],
            "runeAspect": "Партнер",
            "relationshipAspect": "Текущее состояние",
            "userId": "7300593025"
        }));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"message": "гармония", "meanings": ["x", "y", "z"]}));
    });

    let mut screen = ReadingScreen::new(ScreenSpec::for_kind(ScreenKind::RelationshipStatus));
    let modals = session(&server)
        .run(
            &mut screen,
            &[
                Action::ChooseTopic(TopicField::RuneAspect, "Партнер".to_string()),
                Action::ChooseTopic(
                    TopicField::RelationshipAspect,
                    "Текущее состояние".to_string(),
                ),
                Action::Click(2),
                Action::Click(5),
                Action::Click(6),
                Action::Reveal,
            ],
        )
        .await;

    api_mock.assert();
    assert_eq!(
        modals[0].text,
        "Толкование рун (Партнер, Текущее состояние): гармония"
    );
    assert_eq!(screen.render()[2].label, "x");
}

#[tokio::test]
async fn test_tarot_periods_and_reading_type() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/tarot-reveal").json_body(json!({
            "cards": [8, 1, 3],
            "timePeriods": ["Прошлое", "Настоящее", "Будущее"],
            "readingType": "Карьера и финансы",
            "userId": "7300593025"
        }));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"message": "путь открыт", "meanings": ["I", "II", "III"]}));
    });

    let mut screen = ReadingScreen::new(ScreenSpec::for_kind(ScreenKind::Tarot));
    let modals = session(&server)
        .run(
            &mut screen,
            &[
                Action::Click(1),
                Action::ActivatePartition("Прошлое".to_string()),
                Action::Click(8),
                Action::ActivatePartition("Будущее".to_string()),
                Action::Click(3),
                Action::ChooseTopic(TopicField::ReadingType, "Карьера и финансы".to_string()),
                Action::Reveal,
            ],
        )
        .await;

    api_mock.assert();
    assert!(modals[0].text.contains("Прошлое: Карта 9\n"));
    assert!(modals[0].text.ends_with("Тип гадания: Карьера и финансы"));
    assert_eq!(screen.revealed().get(8), Some("I"));
}

#[tokio::test]
async fn test_tarot_quick_reading_through_account_gateway() {
    let server = MockServer::start();
    let reading_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/tarot-reading")
            .header("X-API-Key", "V1")
            .json_body(json!({"type": "Общее предсказание", "userId": "7300593025"}));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"result": "Вас ждут перемены"}));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/tarot-reading")
            .json_body(json!({"type": "Совет дня", "userId": "7300593025"}));
        then.status(500);
    });

    let account = Arc::new(HttpGateway::new(GatewayConfig::new(server.base_url())));
    let reader = session(&server).with_account(account);
    let mut screen = ReadingScreen::new(ScreenSpec::for_kind(ScreenKind::Tarot));

    let modals = reader
        .run(
            &mut screen,
            &[
                Action::QuickReading("Общее предсказание".to_string()),
                Action::QuickReading("Совет дня".to_string()),
            ],
        )
        .await;

    reading_mock.assert();
    assert_eq!(modals[0].kind, ModalKind::Result);
    assert_eq!(
        modals[0].text,
        "Результат гадания на Таро для \"Общее предсказание\": Вас ждут перемены"
    );
    assert_eq!(modals[1].kind, ModalKind::Error);
    assert_eq!(
        modals[1].text,
        "Ошибка при получении гадания для \"Совет дня\": HTTP error! status: 500"
    );
    assert!(screen.revealed().is_empty());
}
