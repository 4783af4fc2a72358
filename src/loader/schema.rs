use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::Value;

// Embed the record file schema at compile time
const RECORDS_SCHEMA: &str = include_str!("../../schemas/records-schema.json");

/// Draft-07 validator for the top-level shape of a record file
pub static RECORDS_VALIDATOR: Lazy<Validator> = Lazy::new(|| {
    let schema: Value = serde_json::from_str(RECORDS_SCHEMA)
        .expect("Failed to parse record schema - this is a bug");
    jsonschema::draft7::options()
        .build(&schema)
        .expect("Failed to compile record schema - this is a bug")
});

/// First schema violation in `value`, as (instance path, message).
pub fn check_shape(value: &Value) -> Result<(), (String, String)> {
    RECORDS_VALIDATOR
        .validate(value)
        .map_err(|error| (error.instance_path.to_string(), error.to_string()))
}
