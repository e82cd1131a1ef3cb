use crate::domain::model::CardSlot;

/// Ordered set of selected slots bounded by `max_selectable`.
///
/// Insertion order is kept because screens map positions to meaning
/// (past / present / future and so on).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionModel {
    max_selectable: usize,
    allow_multi_select: bool,
    selected: Vec<CardSlot>,
}

impl SelectionModel {
    pub fn new(max_selectable: usize, allow_multi_select: bool) -> Self {
        Self {
            max_selectable,
            allow_multi_select,
            selected: Vec::with_capacity(max_selectable),
        }
    }

    pub fn single() -> Self {
        Self::new(1, false)
    }

    /// Deselects a held slot, otherwise tries to add it.
    ///
    /// Returns whether the selection changed. A rejected add is silent.
    pub fn toggle(&mut self, index: CardSlot) -> bool {
        if let Some(pos) = self.selected.iter().position(|&i| i == index) {
            self.selected.remove(pos);
            tracing::debug!("Slot {} deselected", index);
            return true;
        }

        if self.max_selectable == 0 {
            return false;
        }

        if !self.allow_multi_select {
            self.selected.clear();
            self.selected.push(index);
            tracing::debug!("Slot {} replaces previous single selection", index);
            return true;
        }

        if self.selected.len() < self.max_selectable {
            self.selected.push(index);
            tracing::debug!(
                "Slot {} selected ({}/{})",
                index,
                self.selected.len(),
                self.max_selectable
            );
            true
        } else {
            tracing::debug!(
                "Slot {} ignored, already {} of {} selected",
                index,
                self.selected.len(),
                self.max_selectable
            );
            false
        }
    }

    pub fn selected(&self) -> &[CardSlot] {
        &self.selected
    }

    pub fn contains(&self, index: CardSlot) -> bool {
        self.selected.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn max_selectable(&self) -> usize {
        self.max_selectable
    }

    pub fn allow_multi_select(&self) -> bool {
        self.allow_multi_select
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}

/// One single-slot selection per named partition (e.g. time periods).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionedSelection {
    partitions: Vec<(String, SelectionModel)>,
    active: usize,
}

impl PartitionedSelection {
    pub fn new<I, S>(names: I, active: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let partitions: Vec<(String, SelectionModel)> = names
            .into_iter()
            .map(|name| (name.into(), SelectionModel::new(1, true)))
            .collect();
        let active = partitions
            .iter()
            .position(|(name, _)| name == active)
            .unwrap_or(0);
        Self { partitions, active }
    }

    /// 切換目前作用中的分區；名稱不存在時不變
    pub fn set_active(&mut self, name: &str) -> bool {
        match self.partitions.iter().position(|(n, _)| n == name) {
            Some(pos) => {
                self.active = pos;
                true
            }
            None => false,
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.partitions.get(self.active).map(|(name, _)| name.as_str())
    }

    pub fn toggle(&mut self, index: CardSlot) -> bool {
        let active = self.active;
        let held_elsewhere = self
            .partitions
            .iter()
            .enumerate()
            .any(|(pos, (_, model))| pos != active && model.contains(index));
        if held_elsewhere {
            tracing::debug!("Slot {} already assigned to another partition", index);
            return false;
        }

        match self.partitions.get_mut(active) {
            Some((_, model)) => model.toggle(index),
            None => false,
        }
    }

    pub fn partition(&self, name: &str) -> &[CardSlot] {
        self.partitions
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, model)| model.selected())
            .unwrap_or(&[])
    }

    pub fn partitions(&self) -> impl Iterator<Item = (&str, &[CardSlot])> {
        self.partitions
            .iter()
            .map(|(name, model)| (name.as_str(), model.selected()))
    }

    pub fn non_empty_partitions(&self) -> Vec<String> {
        self.partitions
            .iter()
            .filter(|(_, model)| !model.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Concatenation of all partitions in declaration order.
    pub fn flattened(&self) -> Vec<CardSlot> {
        self.partitions
            .iter()
            .flat_map(|(_, model)| model.selected().iter().copied())
            .collect()
    }

    pub fn clear(&mut self) {
        for (_, model) in &mut self.partitions {
            model.clear();
        }
    }
}

/// The selection state a reading screen owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Flat(SelectionModel),
    Partitioned(PartitionedSelection),
}

impl Selection {
    pub fn toggle(&mut self, index: CardSlot) -> bool {
        match self {
            Selection::Flat(model) => model.toggle(index),
            Selection::Partitioned(parts) => parts.toggle(index),
        }
    }

    pub fn selected(&self) -> Vec<CardSlot> {
        match self {
            Selection::Flat(model) => model.selected().to_vec(),
            Selection::Partitioned(parts) => parts.flattened(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::Flat(model) => model.len(),
            Selection::Partitioned(parts) => parts.partitions().map(|(_, s)| s.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, index: CardSlot) -> bool {
        match self {
            Selection::Flat(model) => model.contains(index),
            Selection::Partitioned(parts) => parts.partitions().any(|(_, s)| s.contains(&index)),
        }
    }

    pub fn clear(&mut self) {
        match self {
            Selection::Flat(model) => model.clear(),
            Selection::Partitioned(parts) => parts.clear(),
        }
    }

    pub fn as_partitioned(&self) -> Option<&PartitionedSelection> {
        match self {
            Selection::Partitioned(parts) => Some(parts),
            Selection::Flat(_) => None,
        }
    }

    pub fn as_partitioned_mut(&mut self) -> Option<&mut PartitionedSelection> {
        match self {
            Selection::Partitioned(parts) => Some(parts),
            Selection::Flat(_) => None,
        }
    }
}
