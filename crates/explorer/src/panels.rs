//! Side-panel state: the paper info view and the saved-papers list

use citemap_graph::FocusState;

/// Paper shown in the info panel.
///
/// Follows the active focus, but keeps the last paper on display when the
/// focus is lost so the panel never goes blank.
#[derive(Debug, Default)]
pub struct InfoView {
    persisted: Option<String>,
}

impl InfoView {
    /// Observe a focus state; returns the id to display when it changed
    pub fn observe(&mut self, state: &FocusState) -> Option<&str> {
        let active = state.active_id()?;
        if self.persisted.as_deref() == Some(active) {
            return None;
        }
        self.persisted = Some(active.to_string());
        self.persisted.as_deref()
    }

    pub fn current(&self) -> Option<&str> {
        self.persisted.as_deref()
    }
}

/// Ordered list of saved paper ids without duplicates
#[derive(Debug, Default)]
pub struct SavedPapers {
    ids: Vec<String>,
}

impl SavedPapers {
    /// Add `id`; false when it was already saved
    pub fn add(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|saved| saved == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citemap_graph::FocusEvent;

    #[test]
    fn test_info_view_persists_last_paper() {
        let mut view = InfoView::default();
        let mut state = FocusState::default();

        state.apply(FocusEvent::EnterNode("A".into()));
        assert_eq!(view.observe(&state), Some("A"));
        assert_eq!(view.observe(&state), None);

        state.apply(FocusEvent::LeaveNode);
        assert_eq!(view.observe(&state), None);
        assert_eq!(view.current(), Some("A"));

        state.apply(FocusEvent::ClickNode("B".into()));
        assert_eq!(view.observe(&state), Some("B"));
    }

    #[test]
    fn test_saved_papers_keep_order_without_duplicates() {
        let mut saved = SavedPapers::default();
        assert!(saved.is_empty());
        assert!(saved.add("B"));
        assert!(saved.add("A"));
        assert!(!saved.add("B"));
        assert_eq!(saved.ids(), ["B".to_string(), "A".to_string()]);
    }
}
