//! Registry of known model identifiers.
//!
//! Local entries are Ollama tags; remote entries are OpenRouter
//! provider-qualified names. Costs are approximate USD per million tokens and
//! are informational only.
//!
//! Only models reachable through the two configured destinations are listed.
//! Identifiers routed to a provider's own API (`mistral/...`) are not.

use std::fmt;
use std::str::FromStr;

use crate::client::Destination;

/// Model used by the memory chat when none is given.
pub const DEFAULT_CHAT_MODEL: ModelId = ModelId::Llama3p2_3bInstruct;

/// Model used for entity extraction when none is given.
pub const DEFAULT_EXTRACTION_MODEL: ModelId = ModelId::Gemini2p0Flash;

/// Known models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelId {
    DeepseekR1_1p5bLocal,
    DeepseekChatFree,
    DeepseekR1Distill70bFree,
    Gemma3_1bLocal,
    Gemma3_27b,
    Gemini2p0Flash,
    Gemini2p5FlashPreview,
    Gpt4p1Nano,
    Gpt4oMini,
    Qwen2p5_3bLocal,
    Qwen3_4bLocal,
    Qwen3_8b,
    Qwen3_30bA3b,
    Qwen2p5Vl72bInstruct,
    Llama3p2_3bInstruct,
    Llama3p1_8bInstruct,
    Llama3p2_11bVisionFree,
    Llama3p3_70bInstruct,
    LlamaGuard4_12b,
    Gemma3_12b,
    Gemma3_12bFree,
    Qwen3_8bFree,
    Qwen2p5Vl72bInstructFree,
    Llama4MaverickFree,
    Phi4ReasoningPlus,
    Phi4ReasoningPlusFree,
    Phi4MultimodalInstruct,
    Phi3p5Mini128kInstruct,
    Mistral7bInstruct,
    Mistral7bInstructFree,
    MistralNemo,
    MistralNemoFree,
    Ministral8b,
    Dolphin3Mistral24bFree,
}

impl ModelId {
    pub const ALL: [ModelId; 34] = [
        ModelId::DeepseekR1_1p5bLocal,
        ModelId::DeepseekChatFree,
        ModelId::DeepseekR1Distill70bFree,
        ModelId::Gemma3_1bLocal,
        ModelId::Gemma3_27b,
        ModelId::Gemini2p0Flash,
        ModelId::Gemini2p5FlashPreview,
        ModelId::Gpt4p1Nano,
        ModelId::Gpt4oMini,
        ModelId::Qwen2p5_3bLocal,
        ModelId::Qwen3_4bLocal,
        ModelId::Qwen3_8b,
        ModelId::Qwen3_30bA3b,
        ModelId::Qwen2p5Vl72bInstruct,
        ModelId::Llama3p2_3bInstruct,
        ModelId::Llama3p1_8bInstruct,
        ModelId::Llama3p2_11bVisionFree,
        ModelId::Llama3p3_70bInstruct,
        ModelId::LlamaGuard4_12b,
        ModelId::Gemma3_12b,
        ModelId::Gemma3_12bFree,
        ModelId::Qwen3_8bFree,
        ModelId::Qwen2p5Vl72bInstructFree,
        ModelId::Llama4MaverickFree,
        ModelId::Phi4ReasoningPlus,
        ModelId::Phi4ReasoningPlusFree,
        ModelId::Phi4MultimodalInstruct,
        ModelId::Phi3p5Mini128kInstruct,
        ModelId::Mistral7bInstruct,
        ModelId::Mistral7bInstructFree,
        ModelId::MistralNemo,
        ModelId::MistralNemoFree,
        ModelId::Ministral8b,
        ModelId::Dolphin3Mistral24bFree,
    ];

    /// The identifier sent to the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeepseekR1_1p5bLocal => "deepseek-r1:1.5b",
            Self::DeepseekChatFree => "deepseek/deepseek-chat-v3-0324:free",
            Self::DeepseekR1Distill70bFree => "deepseek/deepseek-r1-distill-llama-70b:free",
            Self::Gemma3_1bLocal => "gemma3:1b",
            Self::Gemma3_27b => "google/gemma-3-27b-it",
            Self::Gemini2p0Flash => "google/gemini-2.0-flash-001",
            Self::Gemini2p5FlashPreview => "google/gemini-2.5-flash-preview-05-20",
            Self::Gpt4p1Nano => "openai/gpt-4.1-nano",
            Self::Gpt4oMini => "openai/gpt-4o-mini",
            Self::Qwen2p5_3bLocal => "qwen2.5:3b",
            Self::Qwen3_4bLocal => "qwen3:4b-q4_K_M",
            Self::Qwen3_8b => "qwen/qwen3-8b",
            Self::Qwen3_30bA3b => "qwen/qwen3-30b-a3b",
            Self::Qwen2p5Vl72bInstruct => "qwen/qwen2.5-vl-72b-instruct",
            Self::Llama3p2_3bInstruct => "meta-llama/llama-3.2-3b-instruct",
            Self::Llama3p1_8bInstruct => "meta-llama/llama-3.1-8b-instruct",
            Self::Llama3p2_11bVisionFree => "meta-llama/llama-3.2-11b-vision-instruct:free",
            Self::Llama3p3_70bInstruct => "meta-llama/llama-3.3-70b-instruct",
            Self::LlamaGuard4_12b => "meta-llama/llama-guard-4-12b",
            Self::Gemma3_12b => "google/gemma-3-12b-it",
            Self::Gemma3_12bFree => "google/gemma-3-12b-it:free",
            Self::Qwen3_8bFree => "qwen/qwen3-8b:free",
            Self::Qwen2p5Vl72bInstructFree => "qwen/qwen2.5-vl-72b-instruct:free",
            Self::Llama4MaverickFree => "meta-llama/llama-4-maverick:free",
            Self::Phi4ReasoningPlus => "microsoft/phi-4-reasoning-plus",
            Self::Phi4ReasoningPlusFree => "microsoft/phi-4-reasoning-plus:free",
            Self::Phi4MultimodalInstruct => "microsoft/phi-4-multimodal-instruct",
            Self::Phi3p5Mini128kInstruct => "microsoft/phi-3.5-mini-128k-instruct",
            Self::Mistral7bInstruct => "mistralai/mistral-7b-instruct",
            Self::Mistral7bInstructFree => "mistralai/mistral-7b-instruct:free",
            Self::MistralNemo => "mistralai/mistral-nemo",
            Self::MistralNemoFree => "mistralai/mistral-nemo:free",
            Self::Ministral8b => "mistralai/ministral-8b",
            Self::Dolphin3Mistral24bFree => "cognitivecomputations/dolphin3.0-mistral-24b:free",
        }
    }

    /// Whether the model is served by the local inference server.
    ///
    /// Remote names are always provider-qualified (`provider/model`).
    pub fn is_local(&self) -> bool {
        !self.as_str().contains('/')
    }

    /// Free-tier remote models carry a `:free` suffix.
    pub fn is_free(&self) -> bool {
        self.as_str().ends_with(":free")
    }

    pub fn default_destination(&self) -> Destination {
        if self.is_local() {
            Destination::Local
        } else {
            Destination::Remote
        }
    }

    /// Approximate USD cost per million tokens, where known.
    pub fn cost_per_million_tokens(&self) -> Option<f64> {
        if self.is_local() || self.is_free() {
            return Some(0.0);
        }
        match self {
            Self::Gemma3_27b => Some(0.10),
            Self::Gemini2p0Flash => Some(0.10),
            Self::Gemini2p5FlashPreview => Some(0.15),
            Self::Gpt4p1Nano => Some(0.10),
            Self::Gpt4oMini => Some(0.15),
            Self::Qwen3_8b => Some(0.035),
            Self::Qwen3_30bA3b => Some(0.08),
            Self::Qwen2p5Vl72bInstruct => Some(0.25),
            Self::Llama3p2_3bInstruct => Some(0.01),
            Self::Llama3p1_8bInstruct => Some(0.02),
            Self::Llama3p3_70bInstruct => Some(0.07),
            Self::LlamaGuard4_12b => Some(0.05),
            Self::Gemma3_12b => Some(0.05),
            Self::Phi4ReasoningPlus => Some(0.07),
            Self::Phi4MultimodalInstruct => Some(0.05),
            Self::Phi3p5Mini128kInstruct => Some(0.10),
            Self::Mistral7bInstruct => Some(0.028),
            Self::MistralNemo => Some(0.03),
            Self::Ministral8b => Some(0.10),
            _ => None,
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("Unknown model: {}", s))
    }
}
