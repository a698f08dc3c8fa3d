use std::sync::Arc;

use cf_core::CompanyApi;

pub struct AppState {
    pub api: Arc<dyn CompanyApi>,
}
