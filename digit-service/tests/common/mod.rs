use digit_service::config::{DigitConfig, ModelConfig};
use digit_service::models::{IMAGE_SIDE, ImageGrid};
use digit_service::services::Classifier;
use digit_service::startup::Application;
use std::sync::Arc;

/// Deterministic classifier standing in for the ONNX artifact.
pub struct StubClassifier {
    scores: Vec<f32>,
}

impl StubClassifier {
    /// A classifier whose arg-max is always `class`.
    pub fn with_top_class(class: usize) -> Self {
        let mut scores = vec![0.01_f32; 10];
        scores[class] = 0.9;
        Self { scores }
    }
}

impl Classifier for StubClassifier {
    fn scores(&self, _image: &ImageGrid) -> anyhow::Result<Vec<f32>> {
        Ok(self.scores.clone())
    }
}

/// Classifier that fails every invocation.
pub struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn scores(&self, _image: &ImageGrid) -> anyhow::Result<Vec<f32>> {
        Err(anyhow::anyhow!("tensor backend exploded"))
    }
}

pub struct TestApp {
    pub address: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_classifier(Arc::new(StubClassifier::with_top_class(7))).await
    }

    pub async fn spawn_with_classifier(classifier: Arc<dyn Classifier>) -> Self {
        let config = DigitConfig {
            common: service_core::config::Config {
                port: 0, // Random port
            },
            model: ModelConfig {
                path: "unused-in-tests.onnx".to_string(),
            },
        };

        let app = Application::build_with_classifier(config, classifier)
            .await
            .expect("Failed to build test application");

        let port = app.port();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("http://127.0.0.1:{}/health", port);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
        }
    }
}

/// A full 28×28 payload with every pixel set to `value`.
pub fn grid_of(value: f64) -> serde_json::Value {
    serde_json::json!(vec![vec![value; IMAGE_SIDE]; IMAGE_SIDE])
}
