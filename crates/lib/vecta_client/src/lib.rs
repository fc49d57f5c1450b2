//! # vecta_client
//!
//! Client-side state for the Vecta API: HTTP gateway, session store,
//! entity services, URL submission pipeline, route guards and headless
//! view models.
//!
//! Everything is wired explicitly through [`AppContext`]; there is no
//! process-wide state.

pub mod config;
pub mod error;
pub mod gateway;
pub mod guards;
pub mod oauth;
pub mod projects;
pub mod session;
pub mod state;
pub mod storage;
pub mod submission;
pub mod urls;
pub mod views;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::GatewayResult;
use crate::gateway::Gateway;
use crate::guards::Navigator;
use crate::oauth::OAuthClient;
use crate::projects::ProjectService;
use crate::session::SessionStore;
use crate::storage::KeyValueStore;
use crate::urls::UrlService;

/// Every long-lived client component, built once at start-up.
#[derive(Clone)]
pub struct AppContext {
    pub config: ClientConfig,
    pub gateway: Arc<Gateway>,
    pub session: Arc<SessionStore>,
    pub projects: Arc<ProjectService>,
    pub urls: Arc<UrlService>,
    pub oauth: Arc<OAuthClient>,
    pub navigator: Arc<Navigator>,
}

impl AppContext {
    /// Build the component graph and restore the persisted session.
    pub fn init(config: ClientConfig, store: Arc<dyn KeyValueStore>) -> GatewayResult<Self> {
        let gateway = Arc::new(Gateway::new(&config.api_url, Arc::clone(&store))?);
        let session = Arc::new(SessionStore::init(Arc::clone(&gateway), store));
        let projects = Arc::new(ProjectService::new(Arc::clone(&gateway)));
        let urls = Arc::new(UrlService::new(Arc::clone(&gateway)));
        let oauth = Arc::new(OAuthClient::new(&config.oauth, Arc::clone(&session)));
        let navigator = Arc::new(Navigator::new(Arc::clone(&session)));
        Ok(Self {
            config,
            gateway,
            session,
            projects,
            urls,
            oauth,
            navigator,
        })
    }
}
