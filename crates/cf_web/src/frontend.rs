use std::sync::Arc;

use cf_core::{CompanyApi, SearchQuery};

use crate::controller::{PipelineOutcome, ProfileController, SearchController};
use crate::view::Page;

/// Binds both controllers to one page: form submission drives the search
/// panel, a row click drives the profile panel.
pub struct Frontend {
    page: Page,
    search: SearchController,
    profile: ProfileController,
}

impl Frontend {
    pub fn new(api: Arc<dyn CompanyApi>) -> Self {
        Self {
            page: Page::new(),
            search: SearchController::new(api.clone()),
            profile: ProfileController::new(api),
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub async fn submit_search(&self, form: &SearchQuery) -> PipelineOutcome {
        self.search.submit(form, &self.page.search).await
    }

    /// Clicks `row` of the current company table. Returns `None` when there is
    /// no such row or it was rendered without a name.
    pub async fn click_row(&self, row: usize) -> Option<PipelineOutcome> {
        let name = self.page.search.row_key(row)?;
        Some(self.show_profile(&name).await)
    }

    pub async fn show_profile(&self, name: &str) -> PipelineOutcome {
        self.profile.load(name, &self.page.profile).await
    }
}
