use crate::core::layout::LayoutKind;
use crate::core::selection::Selection;
use crate::domain::model::{Endpoint, RevealParams, RevealResponse};
use std::fmt;
use std::str::FromStr;

pub const TIME_PERIODS: [&str; 3] = ["Прошлое", "Настоящее", "Будущее"];
pub const DEFAULT_PERIOD: &str = "Настоящее";

const LOVE_TOPICS: &[&str] = &[
    "Будущее отношений",
    "Чувства партнера",
    "Совместимость",
    "Совет в любви",
];
const LOVE_CANNED_ANSWER: &str = "Карты указывают на гармонию в отношениях.";
const TAROT_TYPES: &[&str] = &[
    "Общее предсказание",
    "Любовь и отношения",
    "Карьера и финансы",
    "Совет дня",
];
const FORECAST_CATEGORIES: &[&str] = &[
    "Причина",
    "Суть",
    "Совет",
    "Итог",
    "Дополнительно",
    "Перспектива",
];
const ANALYSIS_CATEGORIES: &[&str] = &["Причина", "Суть", "Совет", "Итог", "Дополнительно"];
const RUNE_ASPECTS: &[&str] = &["Вы", "Партнер", "Связь"];
const RELATIONSHIP_ASPECTS: &[&str] = &[
    "Текущее состояние",
    "Потенциальные проблемы",
    "Советы по улучшению",
    "Будущее отношений",
];
const SPIRITUAL_ASPECTS: &[&str] = &[
    "Текущий уровень",
    "Препятствия на пути",
    "Следующий шаг",
    "Духовная цель",
];
const RUNE_QUESTIONS: &[&str] = &[
    "Прошлое, настоящее, будущее",
    "Любовь и отношения",
    "Карьера и успех",
    "Духовный путь",
];

/// 各種占卜畫面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    Love,
    Tarot,
    PersonalForecast,
    SituationAnalysis,
    RelationshipStatus,
    SpiritualGrowth,
    RuneReading,
}

impl ScreenKind {
    pub const ALL: [ScreenKind; 7] = [
        ScreenKind::Love,
        ScreenKind::Tarot,
        ScreenKind::PersonalForecast,
        ScreenKind::SituationAnalysis,
        ScreenKind::RelationshipStatus,
        ScreenKind::SpiritualGrowth,
        ScreenKind::RuneReading,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScreenKind::Love => "love",
            ScreenKind::Tarot => "tarot",
            ScreenKind::PersonalForecast => "personal-forecast",
            ScreenKind::SituationAnalysis => "situation-analysis",
            ScreenKind::RelationshipStatus => "relationship-status",
            ScreenKind::SpiritualGrowth => "spiritual-growth",
            ScreenKind::RuneReading => "rune-reading",
        }
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScreenKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ScreenKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = ScreenKind::ALL.iter().map(|k| k.name()).collect();
                format!("unknown screen '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// Which reveal parameter a topic choice fills in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicField {
    Category,
    ReadingType,
    RuneAspect,
    RelationshipAspect,
    Aspect,
    Question,
}

impl FromStr for TopicField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "category" => Ok(TopicField::Category),
            "reading-type" => Ok(TopicField::ReadingType),
            "rune-aspect" => Ok(TopicField::RuneAspect),
            "relationship-aspect" => Ok(TopicField::RelationshipAspect),
            "aspect" => Ok(TopicField::Aspect),
            "question" => Ok(TopicField::Question),
            other => Err(format!("unknown topic field '{}'", other)),
        }
    }
}

impl TopicField {
    pub fn assign(&self, params: &mut RevealParams, value: String) {
        match self {
            TopicField::Category => params.category = value,
            TopicField::ReadingType => params.reading_type = value,
            TopicField::RuneAspect => params.rune_aspect = value,
            TopicField::RelationshipAspect => params.relationship_aspect = value,
            TopicField::Aspect => params.aspect = value,
            TopicField::Question => params.question = value,
        }
    }

    pub fn read<'a>(&self, params: &'a RevealParams) -> &'a str {
        match self {
            TopicField::Category => &params.category,
            TopicField::ReadingType => &params.reading_type,
            TopicField::RuneAspect => &params.rune_aspect,
            TopicField::RelationshipAspect => &params.relationship_aspect,
            TopicField::Aspect => &params.aspect,
            TopicField::Question => &params.question,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topic {
    pub field: TopicField,
    pub options: &'static [&'static str],
    pub required: bool,
}

impl Topic {
    const fn optional(field: TopicField, options: &'static [&'static str]) -> Self {
        Self {
            field,
            options,
            required: false,
        }
    }

    const fn required(field: TopicField, options: &'static [&'static str]) -> Self {
        Self {
            field,
            options,
            required: true,
        }
    }
}

/// Where the answer to a quick reading for a chosen type comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickReadingSource {
    /// Fixed text shown locally, nothing is sent.
    Canned(&'static str),
    /// `AccountGateway::tarot_reading`.
    Remote,
}

/// A one-shot reading for a named type, independent of the card selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickReading {
    pub options: &'static [&'static str],
    pub source: QuickReadingSource,
}

/// Static description of one reading screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenSpec {
    pub kind: ScreenKind,
    pub title: &'static str,
    pub total_slots: usize,
    pub max_selectable: usize,
    pub required_count: usize,
    pub allow_multi_select: bool,
    pub layout: LayoutKind,
    pub label_prefix: &'static str,
    pub endpoint: Endpoint,
    pub partitions: Option<&'static [&'static str]>,
    pub topics: Vec<Topic>,
    pub quick_reading: Option<QuickReading>,
    pub validation_message: &'static str,
    pub error_prefix: &'static str,
}

impl ScreenSpec {
    pub fn for_kind(kind: ScreenKind) -> Self {
        match kind {
            ScreenKind::Love => Self {
                kind,
                title: "Расклады на любовь",
                total_slots: 9,
                max_selectable: 3,
                required_count: 3,
                allow_multi_select: true,
                layout: LayoutKind::Fan,
                label_prefix: "Карта",
                endpoint: Endpoint::TarotReveal,
                partitions: None,
                topics: Vec::new(),
                quick_reading: Some(QuickReading {
                    options: LOVE_TOPICS,
                    source: QuickReadingSource::Canned(LOVE_CANNED_ANSWER),
                }),
                validation_message: "Пожалуйста, выберите ровно 3 карты для расклада.",
                error_prefix: "Ошибка при раскрытии карт",
            },
            ScreenKind::Tarot => Self {
                kind,
                title: "Гадание на Таро",
                total_slots: 9,
                max_selectable: 3,
                required_count: 3,
                allow_multi_select: true,
                layout: LayoutKind::Fan,
                label_prefix: "Карта",
                endpoint: Endpoint::TarotReveal,
                partitions: Some(&TIME_PERIODS),
                topics: vec![Topic::optional(TopicField::ReadingType, TAROT_TYPES)],
                quick_reading: Some(QuickReading {
                    options: TAROT_TYPES,
                    source: QuickReadingSource::Remote,
                }),
                validation_message: "Пожалуйста, выберите по одной карте для каждого временного периода (Прошлое, Настоящее, Будущее).",
                error_prefix: "Ошибка при раскрытии карт",
            },
            ScreenKind::PersonalForecast => Self {
                kind,
                title: "Личный прогноз",
                total_slots: 5,
                max_selectable: 3,
                required_count: 3,
                allow_multi_select: true,
                layout: LayoutKind::Fan,
                label_prefix: "Карта",
                endpoint: Endpoint::PersonalForecast,
                partitions: None,
                topics: vec![Topic::optional(TopicField::Category, FORECAST_CATEGORIES)],
                quick_reading: None,
                validation_message: "Пожалуйста, выберите ровно 3 карты для прогноза.",
                error_prefix: "Ошибка при получении прогноза",
            },
            ScreenKind::SituationAnalysis => Self {
                kind,
                title: "Анализ ситуации",
                total_slots: 5,
                max_selectable: 5,
                required_count: 5,
                allow_multi_select: true,
                layout: LayoutKind::Fan,
                label_prefix: "Карта",
                endpoint: Endpoint::Analyze,
                partitions: None,
                topics: vec![Topic::optional(TopicField::Category, ANALYSIS_CATEGORIES)],
                quick_reading: None,
                validation_message: "Пожалуйста, выберите ровно 5 карт для анализа.",
                error_prefix: "Ошибка при анализе",
            },
            ScreenKind::RelationshipStatus => Self {
                kind,
                title: "Статус отношений",
                total_slots: 9,
                max_selectable: 3,
                required_count: 3,
                allow_multi_select: true,
                layout: LayoutKind::Fan,
                label_prefix: "Руна",
                endpoint: Endpoint::RunesReveal,
                partitions: None,
                topics: vec![
                    Topic::optional(TopicField::RuneAspect, RUNE_ASPECTS),
                    Topic::optional(TopicField::RelationshipAspect, RELATIONSHIP_ASPECTS),
                ],
                quick_reading: None,
                validation_message: "Пожалуйста, выберите ровно 3 руны для расклада.",
                error_prefix: "Ошибка при толковании рун",
            },
            ScreenKind::SpiritualGrowth => Self {
                kind,
                title: "Духовный рост",
                total_slots: 5,
                max_selectable: 1,
                required_count: 1,
                allow_multi_select: false,
                layout: LayoutKind::Fan,
                label_prefix: "Карта",
                endpoint: Endpoint::SpiritualGrowth,
                partitions: None,
                topics: vec![Topic::required(TopicField::Aspect, SPIRITUAL_ASPECTS)],
                quick_reading: None,
                validation_message: "Пожалуйста, выберите одну карту и один аспект для совета.",
                error_prefix: "Ошибка при получении духовного анализа",
            },
            ScreenKind::RuneReading => Self {
                kind,
                title: "Гадание на рунах",
                total_slots: 7,
                max_selectable: 3,
                required_count: 3,
                allow_multi_select: true,
                layout: LayoutKind::Rune,
                label_prefix: "Руна",
                endpoint: Endpoint::RunesReveal,
                partitions: None,
                topics: vec![Topic::required(TopicField::Question, RUNE_QUESTIONS)],
                quick_reading: None,
                validation_message: "Пожалуйста, выберите ровно 3 руны и тип вопроса.",
                error_prefix: "Ошибка при получении толкования рун",
            },
        }
    }

    pub fn with_layout(mut self, layout: LayoutKind) -> Self {
        self.layout = layout;
        self
    }

    pub fn topic(&self, field: TopicField) -> Option<&Topic> {
        self.topics.iter().find(|t| t.field == field)
    }

    /// Text for the result modal after a successful reveal.
    pub fn success_text(
        &self,
        response: &RevealResponse,
        params: &RevealParams,
        selection: &Selection,
    ) -> String {
        let suffix = |value: &str| {
            if value.is_empty() {
                String::new()
            } else {
                format!(" ({})", value)
            }
        };

        match self.kind {
            ScreenKind::Love => format!("Раскрытие карт: {}", response.message),
            ScreenKind::Tarot => {
                let mut text = format!("Раскрытие карт: {}\n\nВыбранные карты:\n", response.message);
                if let Some(parts) = selection.as_partitioned() {
                    for (period, slots) in parts.partitions() {
                        if let Some(slot) = slots.first() {
                            text.push_str(&format!("{}: Карта {}\n", period, slot + 1));
                        }
                    }
                }
                if !params.reading_type.is_empty() {
                    text.push_str(&format!("\nТип гадания: {}", params.reading_type));
                }
                text
            }
            ScreenKind::PersonalForecast => format!(
                "Результат прогноза{}: {}",
                suffix(&params.category),
                response.message
            ),
            ScreenKind::SituationAnalysis => format!(
                "Результат анализа{}: {}",
                suffix(&params.category),
                response.message
            ),
            ScreenKind::RelationshipStatus => {
                let aspects: Vec<&str> = [
                    params.rune_aspect.as_str(),
                    params.relationship_aspect.as_str(),
                ]
                .into_iter()
                .filter(|a| !a.is_empty())
                .collect();
                format!(
                    "Толкование рун{}: {}",
                    suffix(&aspects.join(", ")),
                    response.message
                )
            }
            ScreenKind::SpiritualGrowth => {
                format!("Результат духовного анализа: {}", response.message)
            }
            ScreenKind::RuneReading => format!(
                "{}\n\nВыбранные руны:\n{}",
                response.message,
                response.meanings.join("\n")
            ),
        }
    }

    /// Modal text for a quick reading answered with `result`.
    pub fn quick_reading_text(&self, reading_type: &str, result: &str) -> String {
        match self.kind {
            ScreenKind::Love => format!(
                "Результат расклада на любовь для \"{}\": {}",
                reading_type, result
            ),
            _ => format!("Результат гадания на Таро для \"{}\": {}", reading_type, result),
        }
    }

    pub fn quick_reading_error(&self, reading_type: &str, error: &str) -> String {
        format!(
            "Ошибка при получении гадания для \"{}\": {}",
            reading_type,
            if error.is_empty() { "Неизвестная ошибка" } else { error }
        )
    }

    pub fn error_text(&self, error: &str) -> String {
        let detail = if error.is_empty() {
            "Неизвестная ошибка"
        } else {
            error
        };
        format!("{}: {}", self.error_prefix, detail)
    }
}
