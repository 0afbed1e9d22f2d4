use serde::{Deserialize, Serialize};

/// Placeholder used for any scalar field the generative model did not fill in.
pub const NOT_SPECIFIED: &str = "Not specified";

fn not_specified() -> String {
    NOT_SPECIFIED.to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EngineSpec {
    #[serde(rename = "type", default = "not_specified")]
    pub engine_type: String,
    #[serde(default = "not_specified")]
    pub horsepower: String,
    #[serde(default = "not_specified")]
    pub torque: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSpec {
    #[serde(default = "not_specified")]
    pub acceleration: String,
    #[serde(default = "not_specified")]
    pub top_speed: String,
    #[serde(default = "not_specified")]
    pub drivetrain: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DimensionSpec {
    #[serde(default = "not_specified")]
    pub length: String,
    #[serde(default = "not_specified")]
    pub width: String,
    #[serde(default = "not_specified")]
    pub height: String,
    #[serde(default = "not_specified")]
    pub weight: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FuelEconomySpec {
    #[serde(default = "not_specified")]
    pub city: String,
    #[serde(default = "not_specified")]
    pub highway: String,
    #[serde(default = "not_specified")]
    pub combined: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeSpec {
    #[serde(default = "not_specified")]
    pub base: String,
    #[serde(default = "not_specified")]
    pub high_end: String,
}

/// The normalized, schema-stable specification record. This is the only
/// shape the presentation layer ever sees; the normalizer guarantees every
/// field is populated.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalSpecification {
    pub model: String,
    pub engine: EngineSpec,
    pub performance: PerformanceSpec,
    pub dimensions: DimensionSpec,
    pub safety: Vec<String>,
    pub technology: Vec<String>,
    pub interior: Vec<String>,
    pub exterior: Vec<String>,
    pub fuel_economy: FuelEconomySpec,
    pub price_range: PriceRangeSpec,
    pub colors: Vec<String>,
    pub year_introduced: String,
    pub vehicle_type: String,
}

impl CanonicalSpecification {
    /// A specification with every scalar set to the sentinel and every list
    /// empty, used when the synthesizer produced nothing usable.
    pub fn unspecified(model: &str) -> Self {
        Self {
            model: model.to_string(),
            engine: EngineSpec {
                engine_type: not_specified(),
                horsepower: not_specified(),
                torque: not_specified(),
            },
            performance: PerformanceSpec {
                acceleration: not_specified(),
                top_speed: not_specified(),
                drivetrain: not_specified(),
            },
            dimensions: DimensionSpec {
                length: not_specified(),
                width: not_specified(),
                height: not_specified(),
                weight: not_specified(),
            },
            safety: Vec::new(),
            technology: Vec::new(),
            interior: Vec::new(),
            exterior: Vec::new(),
            fuel_economy: FuelEconomySpec {
                city: not_specified(),
                highway: not_specified(),
                combined: not_specified(),
            },
            price_range: PriceRangeSpec {
                base: not_specified(),
                high_end: not_specified(),
            },
            colors: Vec::new(),
            year_introduced: not_specified(),
            vehicle_type: not_specified(),
        }
    }
}

/// Wire envelope returned by `/api/predict`. `confidence` is a percentage
/// already clamped to 0-100 and rounded to one decimal. On failure only
/// `success`, `error` and `details` are present; on a degraded success
/// (classification ok, synthesis failed) `features` is the all-sentinel
/// specification and `error`/`details` describe the synthesis failure.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<CanonicalSpecification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
