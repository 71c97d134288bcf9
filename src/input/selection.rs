//! Single-selection bookkeeping shared by day cells, year entries, dial ticks
//! and the meridiem toggle.

use std::collections::HashMap;
use std::hash::Hash;

/// Applies or removes selection emphasis on whatever renders an item.
/// `revert` must leave any today/now tint in place.
pub trait Highlighter<K> {
    fn emphasize(&mut self, item: &K);
    fn revert(&mut self, item: &K);
}

/// Tracks the selected item of a group and the one selected before it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionTracker<K> {
    current: Option<K>,
    previous: Option<K>,
}

impl<K> Default for SelectionTracker<K> {
    fn default() -> Self {
        SelectionTracker {
            current: None,
            previous: None,
        }
    }
}

impl<K: Clone + PartialEq> SelectionTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reverts the current item and emphasizes `item`. Selecting the item
    /// that is already current only re-applies its emphasis.
    pub fn select<H: Highlighter<K> + ?Sized>(&mut self, item: K, highlighter: &mut H) {
        if self.current.as_ref() == Some(&item) {
            highlighter.emphasize(&item);
            return;
        }
        if let Some(current) = &self.current {
            highlighter.revert(current);
        }
        highlighter.emphasize(&item);
        self.previous = self.current.replace(item);
    }

    /// Reverts the current item and leaves nothing selected.
    pub fn clear<H: Highlighter<K> + ?Sized>(&mut self, highlighter: &mut H) {
        if let Some(current) = self.current.take() {
            highlighter.revert(&current);
            self.previous = Some(current);
        }
    }

    /// Forgets both items without touching their styling.
    pub fn reset(&mut self) {
        self.current = None;
        self.previous = None;
    }

    pub fn current(&self) -> Option<&K> {
        self.current.as_ref()
    }

    pub fn previous(&self) -> Option<&K> {
        self.previous.as_ref()
    }

    pub fn is_selected(&self, item: &K) -> bool {
        self.current.as_ref() == Some(item)
    }
}

/// How an item should be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    Plain,
    Today,
    Selected,
}

/// Visual flags for one item. `today` marks the today cell or the live-time
/// tick and survives selection changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemState {
    pub selected: bool,
    pub today: bool,
}

impl ItemState {
    pub fn emphasis(&self) -> Emphasis {
        if self.selected {
            Emphasis::Selected
        } else if self.today {
            Emphasis::Today
        } else {
            Emphasis::Plain
        }
    }
}

/// Per-item visual flags keyed by item identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemMarks<K: Eq + Hash> {
    states: HashMap<K, ItemState>,
}

impl<K: Eq + Hash> Default for ItemMarks<K> {
    fn default() -> Self {
        ItemMarks {
            states: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> ItemMarks<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_today(&mut self, item: K) {
        self.states.entry(item).or_default().today = true;
    }

    pub fn state(&self, item: &K) -> ItemState {
        self.states.get(item).copied().unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}

impl<K: Eq + Hash + Clone> Highlighter<K> for ItemMarks<K> {
    fn emphasize(&mut self, item: &K) {
        self.states.entry(item.clone()).or_default().selected = true;
    }

    fn revert(&mut self, item: &K) {
        if let Some(state) = self.states.get_mut(item) {
            state.selected = false;
        }
    }
}
