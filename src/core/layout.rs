use crate::core::reveal::RevealMap;
use crate::domain::model::CardSlot;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const FAN_BASE_DROP: f64 = 6.0;
const SQUARE_GAP: f64 = 16.0;

/// Visual state of one slot, derived only from its index and the inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct CardVisual {
    pub index: CardSlot,
    pub label: String,
    pub revealed: bool,
    pub selected: bool,
    pub rotate_deg: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub grid_cell: Option<(usize, usize)>,
    pub texture: Option<&'static str>,
}

/// Inputs every layout variant consumes.
#[derive(Debug, Clone, Copy)]
pub struct LayoutInput<'a> {
    pub total_slots: usize,
    pub selected: &'a [CardSlot],
    pub revealed: &'a RevealMap,
    pub label_prefix: &'a str,
}

impl<'a> LayoutInput<'a> {
    fn label(&self, index: CardSlot) -> (String, bool) {
        match self.revealed.get(index) {
            Some(text) => (text.to_string(), true),
            None => (format!("{} {}", self.label_prefix, index + 1), false),
        }
    }
}

pub trait LayoutStrategy: Send + Sync {
    fn kind(&self) -> LayoutKind;

    fn arrange(&self, input: &LayoutInput<'_>) -> Vec<CardVisual>;

    /// Forwards a click on `index` to the selection callback.
    ///
    /// Clicks outside the layout are dropped.
    fn click(&self, total_slots: usize, index: CardSlot, on_select: &mut dyn FnMut(CardSlot)) -> bool {
        if index < total_slots {
            on_select(index);
            true
        } else {
            tracing::warn!("Click on slot {} outside a {}-slot layout", index, total_slots);
            false
        }
    }
}

/// Fan geometry: rotation and offsets grow linearly with distance from the center card.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    pub max_rotate: f64,
    pub max_translate_x: f64,
    pub max_translate_y: f64,
    pub selected_scale: f64,
}

impl ArcGeometry {
    fn place(&self, index: CardSlot, total: usize) -> (f64, f64, f64) {
        let center = (total / 2) as f64;
        if center == 0.0 {
            return (0.0, 0.0, FAN_BASE_DROP);
        }
        let offset = index as f64 - center;
        let rotate = offset / center * self.max_rotate;
        let translate_x = offset * (self.max_translate_x / center);
        let translate_y = offset.abs() * (self.max_translate_y / center) + FAN_BASE_DROP;
        (rotate, translate_x, translate_y)
    }

    fn arrange(&self, input: &LayoutInput<'_>, texture: Option<&'static str>) -> Vec<CardVisual> {
        (0..input.total_slots)
            .map(|index| {
                let (rotate_deg, translate_x, translate_y) = self.place(index, input.total_slots);
                let (label, revealed) = input.label(index);
                let selected = input.selected.contains(&index);
                CardVisual {
                    index,
                    label,
                    revealed,
                    selected,
                    rotate_deg,
                    translate_x,
                    translate_y,
                    scale: if selected { self.selected_scale } else { 1.0 },
                    grid_cell: None,
                    texture,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanLayout {
    pub geometry: ArcGeometry,
}

impl Default for FanLayout {
    fn default() -> Self {
        Self {
            geometry: ArcGeometry {
                max_rotate: 32.0,
                max_translate_x: 80.0,
                max_translate_y: 32.0,
                selected_scale: 1.05,
            },
        }
    }
}

impl LayoutStrategy for FanLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Fan
    }

    fn arrange(&self, input: &LayoutInput<'_>) -> Vec<CardVisual> {
        self.geometry.arrange(input, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuneLayout {
    pub geometry: ArcGeometry,
    pub texture: &'static str,
}

impl Default for RuneLayout {
    fn default() -> Self {
        Self {
            geometry: ArcGeometry {
                max_rotate: 25.0,
                max_translate_x: 60.0,
                max_translate_y: 20.0,
                selected_scale: 1.10,
            },
            texture: "runic-blue",
        }
    }
}

impl LayoutStrategy for RuneLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Rune
    }

    fn arrange(&self, input: &LayoutInput<'_>) -> Vec<CardVisual> {
        self.geometry.arrange(input, Some(self.texture))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareLayout {
    pub columns: usize,
    pub card_size: f64,
}

impl Default for SquareLayout {
    fn default() -> Self {
        Self {
            columns: 3,
            card_size: 120.0,
        }
    }
}

impl LayoutStrategy for SquareLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Square {
            columns: self.columns,
        }
    }

    fn arrange(&self, input: &LayoutInput<'_>) -> Vec<CardVisual> {
        let columns = self.columns.max(1);
        let pitch = self.card_size + SQUARE_GAP;
        (0..input.total_slots)
            .map(|index| {
                let (row, column) = (index / columns, index % columns);
                let (label, revealed) = input.label(index);
                let selected = input.selected.contains(&index);
                CardVisual {
                    index,
                    label,
                    revealed,
                    selected,
                    rotate_deg: 0.0,
                    translate_x: column as f64 * pitch,
                    translate_y: row as f64 * pitch,
                    scale: if selected { 1.05 } else { 1.0 },
                    grid_cell: Some((row, column)),
                    texture: None,
                }
            })
            .collect()
    }
}

/// Closed set of layout variants, chosen by configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum LayoutKind {
    Fan,
    Square { columns: usize },
    Rune,
}

impl LayoutKind {
    pub fn strategy(&self) -> Box<dyn LayoutStrategy> {
        match *self {
            LayoutKind::Fan => Box::new(FanLayout::default()),
            LayoutKind::Square { columns } => Box::new(SquareLayout {
                columns,
                ..SquareLayout::default()
            }),
            LayoutKind::Rune => Box::new(RuneLayout::default()),
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutKind::Fan => write!(f, "fan"),
            LayoutKind::Square { .. } => write!(f, "square"),
            LayoutKind::Rune => write!(f, "rune"),
        }
    }
}

impl FromStr for LayoutKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fan" => Ok(LayoutKind::Fan),
            "square" => Ok(LayoutKind::Square { columns: 3 }),
            "rune" => Ok(LayoutKind::Rune),
            other => Err(format!("unknown layout '{}', expected fan, square or rune", other)),
        }
    }
}
