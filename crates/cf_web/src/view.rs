use std::sync::{Mutex, MutexGuard};

use crate::render::SelectionTable;

/// What a result container currently holds. Every write replaces it whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PanelContent {
    #[default]
    Cleared,
    Html(String),
    /// A company table whose rows can be clicked.
    Selection(SelectionTable),
}

impl PanelContent {
    pub fn html(&self) -> &str {
        match self {
            PanelContent::Cleared => "",
            PanelContent::Html(html) => html,
            PanelContent::Selection(table) => table.html(),
        }
    }

    pub fn is_cleared(&self) -> bool {
        matches!(self, PanelContent::Cleared)
    }
}

/// The page elements one pipeline writes to: a loading indicator, an error
/// text element, a result container and (profile only) a success indicator.
pub trait PanelView: Send + Sync {
    fn set_loading(&self, visible: bool);
    fn set_error(&self, message: &str);
    fn set_success(&self, visible: bool);
    fn replace_content(&self, content: PanelContent);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
    pub loading: bool,
    pub error: String,
    pub success: bool,
    pub content: PanelContent,
}

/// Writes to a panel in the order they happened.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    Loading(bool),
    Error(String),
    Success(bool),
    Content(String),
}

#[derive(Debug, Default)]
struct PanelInner {
    state: PanelState,
    events: Vec<PanelEvent>,
}

/// In-memory panel backing both the page adapter and the tests.
#[derive(Debug, Default)]
pub struct MemoryPanel {
    inner: Mutex<PanelInner>,
}

impl MemoryPanel {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PanelInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> PanelState {
        self.lock().state.clone()
    }

    pub fn events(&self) -> Vec<PanelEvent> {
        self.lock().events.clone()
    }

    /// The click key captured for `row` when the current table was rendered.
    pub fn row_key(&self, row: usize) -> Option<String> {
        match &self.lock().state.content {
            PanelContent::Selection(table) => table.key(row).map(str::to_string),
            _ => None,
        }
    }
}

impl PanelView for MemoryPanel {
    fn set_loading(&self, visible: bool) {
        let mut inner = self.lock();
        inner.state.loading = visible;
        inner.events.push(PanelEvent::Loading(visible));
    }

    fn set_error(&self, message: &str) {
        let mut inner = self.lock();
        inner.state.error = message.to_string();
        inner.events.push(PanelEvent::Error(message.to_string()));
    }

    fn set_success(&self, visible: bool) {
        let mut inner = self.lock();
        inner.state.success = visible;
        inner.events.push(PanelEvent::Success(visible));
    }

    fn replace_content(&self, content: PanelContent) {
        let mut inner = self.lock();
        inner.events.push(PanelEvent::Content(content.html().to_string()));
        inner.state.content = content;
    }
}

/// Both panels of the company finder page.
#[derive(Debug, Default)]
pub struct Page {
    pub search: MemoryPanel,
    pub profile: MemoryPanel,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }
}
