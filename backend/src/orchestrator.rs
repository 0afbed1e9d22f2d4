use std::sync::Arc;

use shared::CanonicalSpecification;

use crate::classifier::{CarClassifier, ClassifierError};
use crate::normalize;
use crate::synthesis::{SynthesisFailure, Synthesizer};
use crate::upload::{self, UploadError, UploadedImage};

/// The four ordered steps of the pipeline. Each is a terminal-failure gate:
/// once one fails, no later stage runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Validate,
    Classify,
    Synthesize,
    Normalize,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Validate => "validate",
            Stage::Classify => "classify",
            Stage::Synthesize => "synthesize",
            Stage::Normalize => "normalize",
        }
    }
}

#[derive(Debug)]
pub enum StageFailure {
    Upload(UploadError),
    Classifier(ClassifierError),
}

/// Result of one request through the pipeline. `Degraded` records the
/// chosen partial-success semantics: a valid classification is never thrown
/// away just because specification enrichment failed.
#[derive(Debug)]
pub enum OrchestrationOutcome {
    Complete {
        model_name: String,
        confidence: f64,
        specification: CanonicalSpecification,
    },
    Degraded {
        model_name: String,
        confidence: f64,
        failure: SynthesisFailure,
    },
    Failed {
        stage: Stage,
        failure: StageFailure,
    },
}

/// Sequences Validate -> Classify -> Synthesize -> Normalize. No business
/// logic of its own beyond sequencing and failure tagging.
pub struct Orchestrator {
    classifier: Arc<dyn CarClassifier>,
    synthesizer: Synthesizer,
}

impl Orchestrator {
    pub fn new(classifier: Arc<dyn CarClassifier>, synthesizer: Synthesizer) -> Self {
        Self {
            classifier,
            synthesizer,
        }
    }

    pub async fn handle_request(&self, image: UploadedImage) -> OrchestrationOutcome {
        let image = match upload::validate(image) {
            Ok(image) => image,
            Err(e) => {
                return OrchestrationOutcome::Failed {
                    stage: Stage::Validate,
                    failure: StageFailure::Upload(e),
                };
            }
        };

        let classification = match self.classifier.classify(&image).await {
            Ok(c) => c,
            Err(e) => {
                return OrchestrationOutcome::Failed {
                    stage: Stage::Classify,
                    failure: StageFailure::Classifier(e),
                };
            }
        };
        // The image is done once classification returns; nothing downstream
        // touches the bytes.
        drop(image);

        let raw = match self.synthesizer.synthesize(&classification.model_name).await {
            Ok(raw) => raw,
            Err(failure) => {
                return OrchestrationOutcome::Degraded {
                    model_name: classification.model_name,
                    confidence: classification.confidence,
                    failure,
                };
            }
        };

        // Normalization is total; this stage cannot fail.
        let specification = normalize::normalize(&classification.model_name, &raw);
        OrchestrationOutcome::Complete {
            model_name: classification.model_name,
            confidence: classification.confidence,
            specification,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classification;
    use crate::synthesis::{ChatCompletion, ChatError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockClassifier {
        response: Result<Classification, String>,
        calls: AtomicUsize,
    }

    impl MockClassifier {
        fn recognizing(model: &str, confidence: f64) -> Self {
            Self {
                response: Ok(Classification {
                    model_name: model.to_string(),
                    confidence,
                }),
                calls: AtomicUsize::new(0),
            }
        }

        fn unavailable(detail: &str) -> Self {
            Self {
                response: Err(detail.to_string()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CarClassifier for MockClassifier {
        async fn classify(
            &self,
            _image: &UploadedImage,
        ) -> Result<Classification, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response
                .clone()
                .map_err(ClassifierError::Unavailable)
        }
    }

    struct MockChat {
        response: Result<String, String>,
        calls: AtomicUsize,
    }

    impl MockChat {
        fn replying(text: &str) -> Self {
            Self {
                response: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(detail: &str) -> Self {
            Self {
                response: Err(detail.to_string()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ChatCompletion for MockChat {
        async fn complete(&self, _prompt: &str) -> Result<String, ChatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone().map_err(ChatError)
        }
    }

    fn png(len: usize) -> UploadedImage {
        UploadedImage {
            bytes: vec![0x89; len],
            mime_type: "image/png".to_string(),
            file_name: "car.png".to_string(),
        }
    }

    fn orchestrator(
        classifier: Arc<MockClassifier>,
        chat: Arc<MockChat>,
    ) -> Orchestrator {
        Orchestrator::new(classifier, Synthesizer::new(chat))
    }

    #[actix_web::test]
    async fn round_trip_produces_complete_outcome() {
        let classifier = Arc::new(MockClassifier::recognizing("Tesla Model 3", 92.0));
        let chat = Arc::new(MockChat::replying(
            "```json\n{\"engine\":{\"horsepower\":\"283 HP\"}}\n```",
        ));
        let outcome = orchestrator(classifier.clone(), chat.clone())
            .handle_request(png(1024))
            .await;

        match outcome {
            OrchestrationOutcome::Complete {
                model_name,
                confidence,
                specification,
            } => {
                assert_eq!(model_name, "Tesla Model 3");
                assert_eq!(confidence, 92.0);
                assert_eq!(specification.engine.horsepower, "283 HP");
                assert!(specification.safety.is_empty());
            }
            other => panic!("expected Complete, got {:?}", other),
        }
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn rejected_upload_makes_no_external_calls() {
        let classifier = Arc::new(MockClassifier::recognizing("Tesla Model 3", 92.0));
        let chat = Arc::new(MockChat::replying("{}"));
        let image = UploadedImage {
            bytes: vec![0; 64],
            mime_type: "image/gif".to_string(),
            file_name: "car.gif".to_string(),
        };
        let outcome = orchestrator(classifier.clone(), chat.clone())
            .handle_request(image)
            .await;

        match outcome {
            OrchestrationOutcome::Failed { stage, .. } => assert_eq!(stage, Stage::Validate),
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn classifier_failure_skips_synthesis() {
        let classifier = Arc::new(MockClassifier::unavailable("timed out after 20s"));
        let chat = Arc::new(MockChat::replying("{}"));
        let outcome = orchestrator(classifier, chat.clone())
            .handle_request(png(1024))
            .await;

        match outcome {
            OrchestrationOutcome::Failed { stage, failure } => {
                assert_eq!(stage, Stage::Classify);
                assert!(matches!(failure, StageFailure::Classifier(_)));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(chat.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn synthesis_failure_degrades_but_keeps_classification() {
        let classifier = Arc::new(MockClassifier::recognizing("Kia EV6", 87.5));
        let chat = Arc::new(MockChat::failing("model overloaded"));
        let outcome = orchestrator(classifier, chat).handle_request(png(1024)).await;

        match outcome {
            OrchestrationOutcome::Degraded {
                model_name,
                confidence,
                failure,
            } => {
                assert_eq!(model_name, "Kia EV6");
                assert_eq!(confidence, 87.5);
                assert_eq!(failure.model, "Kia EV6");
                assert!(failure.detail.contains("overloaded"));
            }
            other => panic!("expected Degraded, got {:?}", other),
        }
    }

    #[actix_web::test]
    async fn prose_reply_degrades_instead_of_failing_hard() {
        let classifier = Arc::new(MockClassifier::recognizing("Mazda MX-5", 78.0));
        let chat = Arc::new(MockChat::replying("Sorry, I can't help with that."));
        let outcome = orchestrator(classifier, chat).handle_request(png(1024)).await;
        assert!(matches!(outcome, OrchestrationOutcome::Degraded { .. }));
    }
}
