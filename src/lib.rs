use std::sync::Arc;

use auth::Authenticator;
use cache::ResponseCache;
use config::Config;
use marvel::CatalogApi;

pub mod auth;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod marvel;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub auth: Authenticator,
    pub cache: Arc<dyn ResponseCache>,
    pub catalog: Arc<dyn CatalogApi>,
}
