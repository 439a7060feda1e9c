//! FocusRing — manages keyboard focus cycling between components.

use crate::action::ComponentId;

pub struct FocusRing {
    items: Vec<ComponentId>,
    current: usize,
}

impl FocusRing {
    pub fn new(items: Vec<ComponentId>) -> Self {
        Self { items, current: 0 }
    }

    pub fn current(&self) -> Option<ComponentId> {
        self.items.get(self.current).copied()
    }

    pub fn next(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.items.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = if self.current == 0 {
            self.items.len() - 1
        } else {
            self.current - 1
        };
        self.current()
    }

    pub fn set(&mut self, id: ComponentId) {
        if let Some(pos) = self.items.iter().position(|&x| x == id) {
            self.current = pos;
        }
    }

    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.current().map_or(false, |c| c == id)
    }

    /// Replace the ring contents (e.g. when the log panel opens or closes).
    /// Keeps the same focused ID if it is still present.
    pub fn set_items(&mut self, items: Vec<ComponentId>) {
        let old = self.current();
        self.items = items;
        if let Some(id) = old {
            if let Some(pos) = self.items.iter().position(|&x| x == id) {
                self.current = pos;
                return;
            }
        }
        self.current = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps() {
        let mut ring = FocusRing::new(vec![ComponentId::EpisodeList, ComponentId::ConfigForm]);
        assert_eq!(ring.current(), Some(ComponentId::EpisodeList));
        assert_eq!(ring.next(), Some(ComponentId::ConfigForm));
        assert_eq!(ring.next(), Some(ComponentId::EpisodeList));
        assert_eq!(ring.prev(), Some(ComponentId::ConfigForm));
    }

    #[test]
    fn test_set_items_keeps_focus() {
        let mut ring = FocusRing::new(vec![ComponentId::EpisodeList, ComponentId::LogPanel]);
        ring.set(ComponentId::LogPanel);
        ring.set_items(vec![ComponentId::EpisodeList, ComponentId::EventList, ComponentId::LogPanel]);
        assert!(ring.is_focused(ComponentId::LogPanel));
        ring.set_items(vec![ComponentId::EpisodeList]);
        assert!(ring.is_focused(ComponentId::EpisodeList));
    }
}
