pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod processor;
pub mod services;
pub mod store;
pub mod validation;
pub mod webhook;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::processor::ProcessorClient;
use crate::services::{CheckoutService, OrderStatusReconciler};
use crate::store::OrderStore;
use crate::webhook::WebhookDispatcher;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn OrderStore>,
    pub checkout: Arc<CheckoutService>,
    pub dispatcher: Arc<WebhookDispatcher>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn OrderStore>) -> Self {
        let processor = ProcessorClient::new(config.processor_base_url.clone());
        let checkout = Arc::new(CheckoutService::new(processor, &config));
        let reconciler = Arc::new(OrderStatusReconciler::new(store.clone()));
        let dispatcher = Arc::new(WebhookDispatcher::new(
            config.webhook_hmac_secret.clone(),
            reconciler,
        ));

        Self {
            config,
            store,
            checkout,
            dispatcher,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/checkout", post(handlers::checkout::create_checkout))
        .route(
            "/webhooks/processor",
            post(handlers::webhook::processor_webhook),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
