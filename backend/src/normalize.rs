use serde_json::Value;
use shared::{
    CanonicalSpecification, DimensionSpec, EngineSpec, FuelEconomySpec, NOT_SPECIFIED,
    PerformanceSpec, PriceRangeSpec,
};

// Compatibility table. Each field lists its canonical source path first,
// then the alternate spellings/nestings observed in generative output, in
// priority order. Adding an alternate shape is a deliberate schema change;
// edit this table, never deep-merge.
const MODEL: &[&str] = &["model", "carModel", "car_model"];
const ENGINE_TYPE: &[&str] = &["engine.type", "engine.engineType", "engine_type", "engineType"];
const ENGINE_HORSEPOWER: &[&str] = &["engine.horsepower", "engine_specifications", "horsepower"];
const ENGINE_TORQUE: &[&str] = &["engine.torque", "torque"];
const ACCELERATION: &[&str] = &["performance.acceleration", "acceleration"];
const TOP_SPEED: &[&str] = &["performance.topSpeed", "performance.top_speed", "topSpeed", "top_speed"];
const DRIVETRAIN: &[&str] = &["performance.drivetrain", "drivetrain"];
const LENGTH: &[&str] = &["dimensions.length", "length"];
const WIDTH: &[&str] = &["dimensions.width", "width"];
const HEIGHT: &[&str] = &["dimensions.height", "height"];
const WEIGHT: &[&str] = &["dimensions.weight", "weight"];
const FUEL_CITY: &[&str] = &["fuelEconomy.city", "fuel_economy.city", "fuelEconomy.cityMpg"];
const FUEL_HIGHWAY: &[&str] = &["fuelEconomy.highway", "fuel_economy.highway", "fuelEconomy.highwayMpg"];
const FUEL_COMBINED: &[&str] = &["fuelEconomy.combined", "fuel_economy.combined"];
const PRICE_BASE: &[&str] = &["priceRange.base", "price_range.base", "price", "msrp"];
const PRICE_HIGH_END: &[&str] = &["priceRange.highEnd", "price_range.high_end", "priceRange.high"];
const YEAR_INTRODUCED: &[&str] = &["yearIntroduced", "year_introduced", "year"];
const VEHICLE_TYPE: &[&str] = &["vehicleType", "vehicle_type", "bodyStyle", "body_style"];

const SAFETY: &[&str] = &["safety", "safetyFeatures", "safety_features"];
const TECHNOLOGY: &[&str] = &["technology", "techFeatures", "tech_features"];
const INTERIOR: &[&str] = &["interior", "interiorFeatures", "interior_features"];
const EXTERIOR: &[&str] = &["exterior", "exteriorFeatures", "exterior_features"];
const COLORS: &[&str] = &["colors", "availableColors", "available_colors", "color_options"];

fn resolve<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = raw;
    for key in path.split('.') {
        current = current.get(key)?;
    }
    Some(current)
}

fn scalar(raw: &Value, paths: &[&str]) -> String {
    for path in paths {
        match resolve(raw, path) {
            Some(Value::String(s)) if !s.trim().is_empty() => return s.clone(),
            Some(Value::Number(n)) => return n.to_string(),
            _ => {}
        }
    }
    NOT_SPECIFIED.to_string()
}

fn list(raw: &Value, paths: &[&str]) -> Vec<String> {
    for path in paths {
        if let Some(Value::Array(items)) = resolve(raw, path) {
            return items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect();
        }
    }
    Vec::new()
}

/// Reconciles whatever the synthesizer produced into the canonical record.
/// Total over arbitrary JSON: every scalar resolves through the table or
/// defaults to the sentinel, every list defaults to empty.
pub fn normalize(model_name: &str, raw: &Value) -> CanonicalSpecification {
    let model = match scalar(raw, MODEL) {
        s if s == NOT_SPECIFIED => model_name.to_string(),
        s => s,
    };

    CanonicalSpecification {
        model,
        engine: EngineSpec {
            engine_type: scalar(raw, ENGINE_TYPE),
            horsepower: scalar(raw, ENGINE_HORSEPOWER),
            torque: scalar(raw, ENGINE_TORQUE),
        },
        performance: PerformanceSpec {
            acceleration: scalar(raw, ACCELERATION),
            top_speed: scalar(raw, TOP_SPEED),
            drivetrain: scalar(raw, DRIVETRAIN),
        },
        dimensions: DimensionSpec {
            length: scalar(raw, LENGTH),
            width: scalar(raw, WIDTH),
            height: scalar(raw, HEIGHT),
            weight: scalar(raw, WEIGHT),
        },
        safety: list(raw, SAFETY),
        technology: list(raw, TECHNOLOGY),
        interior: list(raw, INTERIOR),
        exterior: list(raw, EXTERIOR),
        fuel_economy: FuelEconomySpec {
            city: scalar(raw, FUEL_CITY),
            highway: scalar(raw, FUEL_HIGHWAY),
            combined: scalar(raw, FUEL_COMBINED),
        },
        price_range: PriceRangeSpec {
            base: scalar(raw, PRICE_BASE),
            high_end: scalar(raw, PRICE_HIGH_END),
        },
        colors: list(raw, COLORS),
        year_introduced: scalar(raw, YEAR_INTRODUCED),
        vehicle_type: scalar(raw, VEHICLE_TYPE),
    }
}
