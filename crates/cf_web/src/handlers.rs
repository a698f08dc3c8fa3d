use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use cf_core::SearchQuery;
use serde::Deserialize;
use std::sync::Arc;

use crate::frontend::Frontend;
use crate::page::{render_page, render_profile_panel};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub name: Option<String>,
    pub location: Option<String>,
    pub industry: Option<String>,
}

impl PageParams {
    fn form(&self) -> SearchQuery {
        SearchQuery {
            name: self.name.clone().unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
            industry: self.industry.clone().unwrap_or_default(),
        }
    }
}

/// Serves the page. A `name` parameter submits the search form.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    let frontend = Frontend::new(state.api.clone());
    let form = params.form();

    if params.name.is_some() {
        frontend.submit_search(&form).await;
    }

    Html(render_page(frontend.page(), &form))
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfilePanelParams {
    /// Name captured on the clicked row.
    pub name: Option<String>,
}

/// Profile panel fragment for one clicked row. Never searches again: the name
/// comes straight from the row's `data-name`.
pub async fn profile_panel(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProfilePanelParams>,
) -> impl IntoResponse {
    let frontend = Frontend::new(state.api.clone());

    match params.name.as_deref().filter(|name| !name.is_empty()) {
        Some(name) => {
            frontend.show_profile(name).await;
        }
        None => tracing::warn!("Ignoring profile request without a company name"),
    }

    Html(render_profile_panel(&frontend.page().profile.state()))
}

pub async fn health() -> impl IntoResponse {
    StatusCode::OK
}
