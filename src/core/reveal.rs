use crate::domain::model::CardSlot;
use std::collections::BTreeMap;

/// Sparse slot → revealed text mapping.
///
/// Entries are only ever overwritten; `reset` is the single way to drop them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealMap {
    entries: BTreeMap<CardSlot, String>,
}

impl RevealMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zips slots with texts positionally and merges them in.
    ///
    /// # Panics
    ///
    /// Panics when the two sequences differ in length.
    pub fn apply_reveal<S: AsRef<str>>(&mut self, ordered_indices: &[CardSlot], ordered_texts: &[S]) {
        assert_eq!(
            ordered_indices.len(),
            ordered_texts.len(),
            "apply_reveal requires one text per slot"
        );
        for (&index, text) in ordered_indices.iter().zip(ordered_texts) {
            self.entries.insert(index, text.as_ref().to_string());
        }
    }

    pub fn get(&self, index: CardSlot) -> Option<&str> {
        self.entries.get(&index).map(String::as_str)
    }

    pub fn is_revealed(&self, index: CardSlot) -> bool {
        self.entries.contains_key(&index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CardSlot, &str)> {
        self.entries.iter().map(|(&k, v)| (k, v.as_str()))
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

impl<S: Into<String>> FromIterator<(CardSlot, S)> for RevealMap {
    fn from_iter<T: IntoIterator<Item = (CardSlot, S)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_reveal_zips_positionally() {
        let mut map = RevealMap::new();
        map.apply_reveal(&[0, 4, 8], &["A", "B", "C"]);
        assert_eq!(map, RevealMap::from_iter([(0, "A"), (4, "B"), (8, "C")]));
    }

    #[test]
    fn test_apply_reveal_is_idempotent() {
        let mut map = RevealMap::new();
        map.apply_reveal(&[2, 3], &["X", "Y"]);
        let first = map.clone();
        map.apply_reveal(&[2, 3], &["X", "Y"]);
        assert_eq!(map, first);
    }

    #[test]
    fn test_later_reveal_overwrites_and_keeps_others() {
        let mut map = RevealMap::new();
        map.apply_reveal(&[1, 2], &["old", "keep"]);
        map.apply_reveal(&[1], &["new"]);
        assert_eq!(map.get(1), Some("new"));
        assert_eq!(map.get(2), Some("keep"));
        assert!(!map.is_revealed(3));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut map = RevealMap::from_iter([(0, "A")]);
        map.reset();
        assert!(map.is_empty());
    }

    #[test]
    #[should_panic(expected = "one text per slot")]
    fn test_mismatched_lengths_panic() {
        let mut map = RevealMap::new();
        map.apply_reveal(&[0, 1], &["only one"]);
    }
}
