//! General-purpose response schemas.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use super::normalize::strip;

/// A single free-text reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GeneralResponse {
    /// The reply text
    #[serde(deserialize_with = "trimmed_string")]
    #[schemars(with = "String")]
    pub content: String,
}

fn trimmed_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| strip(&s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_is_trimmed() {
        let response: GeneralResponse =
            serde_json::from_value(json!({"content": "  hello \n"})).unwrap();
        assert_eq!(response.content, "hello");
    }

    #[test]
    fn test_content_required_and_strict() {
        assert!(serde_json::from_value::<GeneralResponse>(json!({})).is_err());
        assert!(serde_json::from_value::<GeneralResponse>(json!({"content": 5})).is_err());
    }
}
