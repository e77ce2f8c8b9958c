//! OpenAI-compatible chat completion envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::TransportError;

use super::CoercionMode;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Schema-shaped output request attached to a completion.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaHint {
    pub name: String,
    pub schema: Value,
}

/// One completion request, independent of destination.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub seed: Option<u64>,
    pub schema: Option<SchemaHint>,
}

impl CompletionRequest {
    /// Plain text completion.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: 0.0,
            seed: None,
            schema: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_schema(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.schema = Some(SchemaHint {
            name: tool_safe_name(&name.into()),
            schema,
        });
        self
    }

    /// Build the JSON body for the given coercion mode.
    pub fn to_body(&self, mode: CoercionMode) -> Value {
        let mut body = Map::new();
        body.insert("model".into(), json!(self.model));
        body.insert("messages".into(), json!(self.messages));
        body.insert("temperature".into(), json!(self.temperature));
        if let Some(seed) = self.seed {
            body.insert("seed".into(), json!(seed));
        }

        if let Some(hint) = &self.schema {
            match mode {
                CoercionMode::Json => {
                    body.insert(
                        "response_format".into(),
                        json!({
                            "type": "json_schema",
                            "json_schema": {
                                "name": hint.name,
                                "schema": strict_schema(&hint.schema),
                                "strict": true,
                            }
                        }),
                    );
                }
                CoercionMode::Tool => {
                    body.insert(
                        "tools".into(),
                        json!([{
                            "type": "function",
                            "function": {
                                "name": hint.name,
                                "description": format!("Return the extracted {} object", hint.name),
                                "parameters": hint.schema,
                            }
                        }]),
                    );
                    body.insert(
                        "tool_choice".into(),
                        json!({"type": "function", "function": {"name": hint.name}}),
                    );
                }
            }
        }

        Value::Object(body)
    }
}

/// Reply text plus the untouched provider envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionResponse {
    pub text: String,
    pub raw: Value,
    pub latency_ms: u64,
}

/// Pull the reply text out of a provider envelope.
///
/// In tool mode the first tool call's arguments are the reply; providers that
/// ignore the forced tool choice fall back to the message content.
pub fn extract_reply(raw: &Value, mode: CoercionMode) -> Result<String, TransportError> {
    let message = &raw["choices"][0]["message"];

    if mode == CoercionMode::Tool
        && let Some(arguments) = message["tool_calls"][0]["function"]["arguments"].as_str()
    {
        return Ok(arguments.to_string());
    }

    message["content"]
        .as_str()
        .map(str::to_string)
        .ok_or(TransportError::EmptyReply)
}

/// Keywords strict structured-output validators refuse. Deserialization
/// still enforces the bounds they describe.
const STRICT_UNSUPPORTED: [&str; 7] = [
    "default",
    "format",
    "minLength",
    "maxLength",
    "minimum",
    "maximum",
    "pattern",
];

/// Rewrite a JSON Schema into the subset accepted with `strict: true`.
///
/// Every object lists all of its properties as required and forbids extra
/// ones; optional fields stay optional through their nullable types.
pub fn strict_schema(schema: &Value) -> Value {
    let mut schema = schema.clone();
    make_strict(&mut schema);
    schema
}

fn make_strict(node: &mut Value) {
    let Value::Object(map) = node else {
        return;
    };

    for keyword in STRICT_UNSUPPORTED {
        map.remove(keyword);
    }

    if let Some(Value::Object(props)) = map.get("properties") {
        let required: Vec<Value> = props.keys().map(|k| json!(k)).collect();
        map.insert("required".into(), Value::Array(required));
        map.insert("additionalProperties".into(), json!(false));
    }

    for (key, child) in map.iter_mut() {
        match key.as_str() {
            // Maps of name -> schema; the names themselves are not keywords.
            "properties" | "$defs" | "definitions" => {
                if let Value::Object(schemas) = child {
                    schemas.values_mut().for_each(make_strict);
                }
            }
            "items" | "additionalProperties" | "not" => make_strict(child),
            "anyOf" | "oneOf" | "allOf" | "prefixItems" => {
                if let Value::Array(schemas) = child {
                    schemas.iter_mut().for_each(make_strict);
                }
            }
            _ => {}
        }
    }
}

/// Function names must match `[a-zA-Z0-9_-]+`.
fn tool_safe_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "response".to_string()
    } else {
        cleaned
    }
}
