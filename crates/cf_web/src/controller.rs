use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use cf_core::{CompanyApi, FailureKind, SearchQuery};
use tracing::{debug, error, info, warn};

use crate::render::{render_profile, render_selection};
use crate::view::{PanelContent, PanelView};

pub const PROFILE_ERROR_PREFIX: &str = "Failed to fetch profile: ";

/// How one run of a pipeline ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    Completed,
    Failed(FailureKind),
    /// A newer request on the same panel was issued meanwhile; this response
    /// was dropped without touching the panel.
    Stale,
}

/// Monotonic request counter for one panel. Only the latest ticket may write.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}

/// Runs the search form submission against the search panel.
pub struct SearchController {
    api: Arc<dyn CompanyApi>,
    sequence: RequestSequence,
}

impl SearchController {
    pub fn new(api: Arc<dyn CompanyApi>) -> Self {
        Self {
            api,
            sequence: RequestSequence::new(),
        }
    }

    pub async fn submit(&self, query: &SearchQuery, view: &dyn PanelView) -> PipelineOutcome {
        let ticket = self.sequence.begin();
        info!("🔍 Searching companies similar to '{}' (request #{})", query.name, ticket);
        view.set_loading(true);

        let result = self.api.similar_companies(query).await;
        if !self.sequence.is_current(ticket) {
            warn!("Discarding stale search response #{}", ticket);
            return PipelineOutcome::Stale;
        }

        let outcome = match result {
            Ok(envelope) => {
                let table = render_selection(&envelope.companies);
                info!("✨ Rendered {} companies", table.row_count());
                view.replace_content(PanelContent::Selection(table));
                view.set_error("");
                PipelineOutcome::Completed
            }
            Err(e) => {
                let kind = e.kind();
                error!("Search request #{} failed: {}", ticket, e);
                view.set_error(kind.message());
                view.replace_content(PanelContent::Cleared);
                PipelineOutcome::Failed(kind)
            }
        };

        view.set_loading(false);
        outcome
    }
}

/// Loads and renders one company profile into the profile panel.
pub struct ProfileController {
    api: Arc<dyn CompanyApi>,
    sequence: RequestSequence,
}

impl ProfileController {
    pub fn new(api: Arc<dyn CompanyApi>) -> Self {
        Self {
            api,
            sequence: RequestSequence::new(),
        }
    }

    pub async fn load(&self, name: &str, view: &dyn PanelView) -> PipelineOutcome {
        let ticket = self.sequence.begin();
        info!("🏢 Fetching profile for '{}' (request #{})", name, ticket);
        view.set_loading(true);
        view.set_success(false);
        view.set_error("");

        let result = self.api.company_profile(name).await;
        if !self.sequence.is_current(ticket) {
            warn!("Discarding stale profile response #{} for '{}'", ticket, name);
            return PipelineOutcome::Stale;
        }

        let outcome = match result {
            Ok(envelope) => {
                debug!("Company profile data: {:?}", envelope);
                view.replace_content(PanelContent::Html(render_profile(envelope.as_ref())));
                view.set_success(true);
                PipelineOutcome::Completed
            }
            Err(e) => {
                let kind = e.kind();
                error!("Error fetching profile for '{}': {}", name, e);
                view.set_error(&format!("{}{}", PROFILE_ERROR_PREFIX, kind.message()));
                view.replace_content(PanelContent::Cleared);
                PipelineOutcome::Failed(kind)
            }
        };

        view.set_loading(false);
        outcome
    }
}
