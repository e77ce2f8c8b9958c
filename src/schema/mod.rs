//! Response schemas and the trait that lets the engine target them.

pub mod entity;
pub mod general;
pub mod normalize;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use entity::{
    AllEntityResults, Entity, EntityExtractionResult, EntityLabel, StorageRecord,
    extraction_instruction,
};
pub use general::GeneralResponse;

/// A type the structured response engine can request and validate.
///
/// Validation is deserialization: every normalization and range check lives
/// in the type's `Deserialize` implementation, so a value either comes out
/// whole or not at all.
pub trait StructuredOutput: DeserializeOwned + JsonSchema {
    /// Name used for the schema hint and tool name.
    fn schema_title() -> String {
        <Self as JsonSchema>::schema_name().into_owned()
    }

    /// Machine-readable description of the schema (JSON Schema).
    fn schema_description() -> Value {
        let mut schema = schemars::schema_for!(Self).to_value();
        if let Value::Object(map) = &mut schema {
            map.remove("$schema");
        }
        schema
    }
}

impl<T: DeserializeOwned + JsonSchema> StructuredOutput for T {}
