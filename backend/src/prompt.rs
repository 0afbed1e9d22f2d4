/// Renders the specification-request prompt for one car model. Pure
/// function of its input; the embedded JSON shape and formatting rules are
/// the contract the synthesizer relies on when parsing the response.
pub fn build_prompt(model_name: &str) -> String {
    format!(
        r#"You are an expert automotive assistant. Your task is to provide detailed specifications for car models in a consistent JSON format.

For the car model "{model}", return a JSON object with the following structure:

{{
  "model": "{model}",
  "engine": {{
    "type": "e.g., 2.0L Inline-4 Turbo",
    "horsepower": "e.g., 250 HP",
    "torque": "e.g., 273 lb-ft"
  }},
  "performance": {{
    "acceleration": "e.g., 0-60 mph in 5.8 seconds",
    "topSpeed": "e.g., 155 mph",
    "drivetrain": "e.g., All-Wheel Drive"
  }},
  "dimensions": {{
    "length": "e.g., 182.7 inches",
    "width": "e.g., 70.9 inches",
    "height": "e.g., 56.3 inches",
    "weight": "e.g., 3,450 lbs"
  }},
  "safety": [
    "ABS",
    "Airbags",
    "Lane Assist",
    "Collision Detection"
  ],
  "technology": [
    "Touchscreen Infotainment",
    "Apple CarPlay",
    "Android Auto",
    "Heads-Up Display"
  ],
  "interior": [
    "Leather Seats",
    "Dual-Zone Climate Control",
    "Heated Front Seats"
  ],
  "exterior": [
    "LED Headlights",
    "18-inch Alloy Wheels",
    "Panoramic Sunroof"
  ],
  "fuelEconomy": {{
    "city": "e.g., 22 MPG",
    "highway": "e.g., 30 MPG",
    "combined": "e.g., 25 MPG"
  }},
  "priceRange": {{
    "base": "e.g., $32,000",
    "highEnd": "e.g., $42,000"
  }},
  "colors": [
    "Black",
    "White",
    "Silver",
    "Blue",
    "Red"
  ],
  "yearIntroduced": "e.g., 2020",
  "vehicleType": "e.g., SUV/Sedan/Coupe etc."
}}

Important rules:
1. Only return valid JSON format - no extra text or markdown
2. If a field is unknown, use "Not specified"
3. Keep arrays to 3-5 items max for readability
4. Use realistic values based on the actual car model
5. Maintain this exact structure for consistency"#,
        model = model_name
    )
}
