use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse};
use log::{info, warn};
use serde_json::json;
use shared::{CanonicalSpecification, PredictionResponse};

use crate::classifier::ClassifierError;
use crate::orchestrator::{OrchestrationOutcome, Orchestrator, StageFailure};
use crate::upload::{self, UploadError};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/predict").route(web::post().to(handle_predict)))
        .service(web::resource("/api/health").route(web::get().to(health)));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Presentation-only adjustment: clamp to the 0-100 percentage range and
/// round to one decimal. The value stays untouched everywhere upstream.
fn present_confidence(raw: f64) -> f64 {
    (raw.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

fn upload_status(err: &UploadError) -> StatusCode {
    match err {
        UploadError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn failure_body(error: String, details: Option<String>) -> PredictionResponse {
    PredictionResponse {
        success: false,
        car_model: None,
        confidence: None,
        features: None,
        error: Some(error),
        details,
    }
}

fn respond(outcome: OrchestrationOutcome) -> HttpResponse {
    match outcome {
        OrchestrationOutcome::Complete {
            model_name,
            confidence,
            specification,
        } => {
            info!("Prediction complete: {}", model_name);
            HttpResponse::Ok().json(PredictionResponse {
                success: true,
                car_model: Some(model_name),
                confidence: Some(present_confidence(confidence)),
                features: Some(specification),
                error: None,
                details: None,
            })
        }
        OrchestrationOutcome::Degraded {
            model_name,
            confidence,
            failure,
        } => {
            warn!(
                "Specification synthesis failed for {}: {}",
                model_name, failure.detail
            );
            HttpResponse::Ok().json(PredictionResponse {
                success: true,
                features: Some(CanonicalSpecification::unspecified(&model_name)),
                car_model: Some(model_name),
                confidence: Some(present_confidence(confidence)),
                error: Some("Could not retrieve specifications".to_string()),
                details: Some(failure.detail),
            })
        }
        OrchestrationOutcome::Failed { stage, failure } => {
            warn!("Request failed at {} stage", stage.as_str());
            match failure {
                StageFailure::Upload(e) => HttpResponse::build(upload_status(&e))
                    .json(failure_body(e.to_string(), None)),
                StageFailure::Classifier(ClassifierError::Unavailable(detail)) => {
                    HttpResponse::BadGateway().json(failure_body(
                        "Car recognition service unavailable".to_string(),
                        Some(detail),
                    ))
                }
                StageFailure::Classifier(e) => {
                    HttpResponse::BadGateway().json(failure_body(e.to_string(), None))
                }
            }
        }
    }
}

async fn handle_predict(
    orchestrator: web::Data<Orchestrator>,
    payload: Multipart,
) -> HttpResponse {
    // Stream errors surface before the validate stage runs but map to the
    // same rejection contract.
    let image = match upload::read_first_image(payload).await {
        Ok(image) => image,
        Err(e) => {
            warn!("Upload rejected: {}", e);
            return HttpResponse::build(upload_status(&e)).json(failure_body(e.to_string(), None));
        }
    };

    respond(orchestrator.handle_request(image).await)
}
