use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, post},
};
use portfolio_notification::Mailer;
use portfolio_shared::CONTACT_PATH;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub mod contact;
pub mod health;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub contact_command: portfolio_contact::Command<Arc<dyn Mailer>>,
}

pub fn router(app_state: AppState) -> Router {
    let cors = cors_layer(&app_state.config.server.allowed_origins);

    Router::new()
        .route("/health", get(health::health))
        .route(CONTACT_PATH, post(contact::action))
        .with_state(app_state)
        .layer(cors)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    // Config::validate rejects origins that are not valid header values.
    let origins = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    cors.allow_origin(AllowOrigin::list(origins))
}
