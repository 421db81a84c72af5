//! Focus state shared between the input side and the highlight loop

use tokio::sync::watch;
use tracing::debug;

/// How the current focus was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusSource {
    Hover,
    Click,
}

/// Input events that move the focus
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusEvent {
    /// Pointer entered a node
    EnterNode(String),
    /// Pointer left the hovered node
    LeaveNode,
    /// Node clicked; stays focused until the stage is clicked
    ClickNode(String),
    /// Click on empty stage clears the clicked node
    ClickStage,
    /// Programmatic selection, e.g. from title search
    Select(String),
}

/// Hovered or clicked paper; at most one slot is filled at a time.
///
/// While a click holds the focus, hover and selection events are ignored,
/// so clearing the click leaves nothing focused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusState {
    hovered: Option<String>,
    clicked: Option<String>,
}

impl FocusState {
    /// Focused paper id and how it was focused
    pub fn active(&self) -> Option<(&str, FocusSource)> {
        if let Some(id) = &self.clicked {
            return Some((id.as_str(), FocusSource::Click));
        }
        self.hovered.as_deref().map(|id| (id, FocusSource::Hover))
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active().map(|(id, _)| id)
    }

    /// Apply one event
    pub fn apply(&mut self, event: FocusEvent) {
        match event {
            FocusEvent::EnterNode(id) | FocusEvent::Select(id) => {
                if self.clicked.is_none() {
                    self.hovered = Some(id);
                }
            }
            FocusEvent::LeaveNode => {
                if self.clicked.is_none() {
                    self.hovered = None;
                }
            }
            FocusEvent::ClickNode(id) => {
                self.hovered = None;
                self.clicked = Some(id);
            }
            FocusEvent::ClickStage => self.clicked = None,
        }
    }
}

/// Single writer of the focus state.
///
/// Readers hold a `watch::Receiver` and always see the latest state; the
/// highlight loop reads a snapshot once per frame.
#[derive(Debug)]
pub struct FocusStore {
    tx: watch::Sender<FocusState>,
}

impl FocusStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(FocusState::default());
        Self { tx }
    }

    /// Apply an event; returns true when the focused paper changed
    pub fn dispatch(&self, event: FocusEvent) -> bool {
        debug!(?event, "Focus event");
        let mut focus_changed = false;
        self.tx.send_if_modified(|state| {
            let before = state.clone();
            state.apply(event);
            focus_changed = state.active() != before.active();
            *state != before
        });
        focus_changed
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> FocusState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FocusState> {
        self.tx.subscribe()
    }
}

impl Default for FocusStore {
    fn default() -> Self {
        Self::new()
    }
}
