use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::config::AppConfig;
use crate::upload::UploadedImage;

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Car recognition service unavailable: {0}")]
    Unavailable(String),
    #[error("Car recognition service returned an empty model name")]
    EmptyModel,
}

/// Model name and confidence exactly as the recognizer reported them.
/// Confidence is never recomputed here; clamping and rounding happen at the
/// wire boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub model_name: String,
    pub confidence: f64,
}

#[derive(Deserialize)]
struct RecognizerPayload {
    car_model: String,
    confidence: f64,
}

#[async_trait]
pub trait CarClassifier: Send + Sync {
    async fn classify(&self, image: &UploadedImage) -> Result<Classification, ClassifierError>;
}

/// Client for the externally hosted recognition service. One request per
/// classification, bounded by the configured timeout, no retries.
pub struct RecognizerClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl RecognizerClient {
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.classifier_timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: config.classifier_url.clone(),
        })
    }
}

#[async_trait]
impl CarClassifier for RecognizerClient {
    async fn classify(&self, image: &UploadedImage) -> Result<Classification, ClassifierError> {
        let part = reqwest::multipart::Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(|e| ClassifierError::Unavailable(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClassifierError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Unavailable(format!(
                "{}: {}",
                status, body
            )));
        }

        let payload: RecognizerPayload = response
            .json()
            .await
            .map_err(|e| ClassifierError::Unavailable(e.to_string()))?;

        if payload.car_model.trim().is_empty() {
            return Err(ClassifierError::EmptyModel);
        }

        Ok(Classification {
            model_name: payload.car_model,
            confidence: payload.confidence,
        })
    }
}
