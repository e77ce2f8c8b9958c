//! System instruction for structured extraction.

use serde_json::Value;

/// Build the system instruction embedding the target schema.
///
/// The leading `/no_think` asks reasoning models that honor it to skip their
/// reasoning block; replies that include one anyway are cleaned later.
pub fn build_system_prompt(schema: &Value) -> String {
    let schema_json = serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string());

    format!(
        r#"/no_think
You extract structured data from text. Reply with exactly one JSON object that
conforms to this JSON Schema:

{schema_json}

## Rules
1. Output JSON only: no explanations, no markdown, no code fences.
2. Copy values exactly as they appear in the source text. Do not infer values that are not there.
3. Do not add fields the schema does not define.
4. When a required field has no value in the text, use the default for its type:
   - number: 0
   - string: null
   - boolean: false
   - array: []
   - object: {{}}
5. When the text is ambiguous, choose the single most likely interpretation. Never list alternatives."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_embeds_schema() {
        let schema = json!({"type": "object", "properties": {"content": {"type": "string"}}});
        let prompt = build_system_prompt(&schema);
        assert!(prompt.contains("\"content\""));
        assert!(prompt.contains("JSON only"));
        assert!(prompt.contains("object: {}"));
    }

    #[test]
    fn test_prompt_lists_type_defaults() {
        let prompt = build_system_prompt(&json!({}));
        for default in ["number: 0", "string: null", "boolean: false", "array: []"] {
            assert!(prompt.contains(default), "missing default {}", default);
        }
    }
}
