pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

use services::Classifier;
use std::sync::Arc;

/// Shared application state holding the loaded model handle.
///
/// The classifier is constructed once at startup and never replaced; request
/// handlers only read through the `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn Classifier>,
}
