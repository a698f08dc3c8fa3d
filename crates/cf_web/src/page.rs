use cf_core::SearchQuery;
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::view::{Page, PanelState};

const ROW_CLICK_SCRIPT: &str = r#"<script>
var profileTicket = 0;
document.querySelectorAll('#similarResult .clickable-row').forEach(function (row) {
  row.addEventListener('click', function () {
    var name = row.dataset.name;
    if (name === undefined) {
      return;
    }
    var ticket = ++profileTicket;
    document.getElementById('profileLoadingIndicator').style.display = 'block';
    fetch('/profile_panel?name=' + encodeURIComponent(name))
      .then(function (response) { return response.text(); })
      .then(function (html) {
        if (ticket === profileTicket) {
          document.getElementById('profilePanel').innerHTML = html;
        }
      })
      .catch(function () {
        if (ticket === profileTicket) {
          document.getElementById('profileLoadingIndicator').style.display = 'none';
          document.getElementById('profileError').textContent = 'Failed to fetch profile: Could not reach the page server.';
        }
      });
  });
});
</script>"#;

fn display(visible: bool) -> &'static str {
    if visible {
        "block"
    } else {
        "none"
    }
}

fn input(id: &str, name: &str, label: &str, value: &str) -> String {
    format!(
        r#"<div class="mb-3"><label for="{id}" class="form-label">{label}</label><input type="text" class="form-control" id="{id}" name="{name}" value="{}"></div>"#,
        encode_double_quoted_attribute(value)
    )
}

fn panel(prefix: &str, error_id: &str, result_id: &str, state: &PanelState) -> String {
    format!(
        r#"<div id="{prefix}LoadingIndicator" class="spinner-border" style="display: {}"></div><div id="{error_id}" class="text-danger">{}</div><div id="{result_id}">{}</div>"#,
        display(state.loading),
        encode_text(&state.error),
        state.content.html()
    )
}

/// Inner markup of the profile panel: success indicator plus the panel
/// itself. Row clicks swap this in without reloading the page.
pub fn render_profile_panel(state: &PanelState) -> String {
    format!(
        r#"<div id="profileSuccess" class="text-success" style="display: {}">Profile loaded.</div>{}"#,
        display(state.success),
        panel("profile", "profileError", "profileResult", state)
    )
}

/// Full page shell with the form pre-filled from `form` and both panels in
/// their current state.
pub fn render_page(page: &Page, form: &SearchQuery) -> String {
    let search = page.search.state();
    let profile = page.profile.state();

    let mut html = String::from(
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><title>Company Finder</title></head><body><main class="container">"#,
    );
    html.push_str(r#"<h1>Company Finder</h1><form id="searchForm" method="get" action="/">"#);
    html.push_str(&input("similarName", "name", "Company name", &form.name));
    html.push_str(&input("similarLocation", "location", "Location", &form.location));
    html.push_str(&input("similarIndustry", "industry", "Industry", &form.industry));
    html.push_str(r#"<button type="submit" class="btn btn-primary">Search</button></form>"#);

    html.push_str(r#"<section id="searchPanel">"#);
    html.push_str(&panel("search", "similarError", "similarResult", &search));
    html.push_str("</section>");

    html.push_str(r#"<section id="profilePanel">"#);
    html.push_str(&render_profile_panel(&profile));
    html.push_str("</section>");

    html.push_str(ROW_CLICK_SCRIPT);
    html.push_str("</main></body></html>");
    html
}
