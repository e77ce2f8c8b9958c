//! Named-entity extraction schemas.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

use super::normalize::{is_probability, round_probability, strip};

/// Minimum entity text length in characters, after trimming.
pub const MIN_TEXT_LEN: usize = 2;
/// Maximum entity text length in characters, after trimming.
pub const MAX_TEXT_LEN: usize = 50;

/// Closed label taxonomy for transaction narration entities.
///
/// Labels match exactly; no case folding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum EntityLabel {
    TelecomServices,
    LeviesAndCharges,
    CableTvOrStreamingOrSubscriptions,
    Utilities,
    EnergyAndFuel,
    LeisureLifestyleAndRecreation,
    HealthActivity,
    LoanLender,
    SavingsAndInvestments,
    BettingAndGambling,
    Location,
    Person,
    TransactionReason,
    ReligiousActivity,
    #[serde(rename = "miscellaneous")]
    Misc,
}

impl EntityLabel {
    pub const ALL: [EntityLabel; 15] = [
        Self::TelecomServices,
        Self::LeviesAndCharges,
        Self::CableTvOrStreamingOrSubscriptions,
        Self::Utilities,
        Self::EnergyAndFuel,
        Self::LeisureLifestyleAndRecreation,
        Self::HealthActivity,
        Self::LoanLender,
        Self::SavingsAndInvestments,
        Self::BettingAndGambling,
        Self::Location,
        Self::Person,
        Self::TransactionReason,
        Self::ReligiousActivity,
        Self::Misc,
    ];

    /// Wire name of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TelecomServices => "telecomServices",
            Self::LeviesAndCharges => "leviesAndCharges",
            Self::CableTvOrStreamingOrSubscriptions => "cableTvOrStreamingOrSubscriptions",
            Self::Utilities => "utilities",
            Self::EnergyAndFuel => "energyAndFuel",
            Self::LeisureLifestyleAndRecreation => "leisureLifestyleAndRecreation",
            Self::HealthActivity => "healthActivity",
            Self::LoanLender => "loanLender",
            Self::SavingsAndInvestments => "savingsAndInvestments",
            Self::BettingAndGambling => "bettingAndGambling",
            Self::Location => "location",
            Self::Person => "person",
            Self::TransactionReason => "transactionReason",
            Self::ReligiousActivity => "religiousActivity",
            Self::Misc => "miscellaneous",
        }
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityLabel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownLabel(s.to_string()))
    }
}

/// One recognized span of text.
///
/// Construction normalizes then validates: text is trimmed and must be 2-50
/// characters, score is rounded to two decimals and must be in `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Entity {
    /// Text of the entity
    #[schemars(length(min = 2, max = 50))]
    text: String,
    /// Label of the entity
    label: EntityLabel,
    /// Confidence score of the entity. Range: 0.0 (least confident) to 1.0 (most confident)
    #[schemars(range(min = 0.0, max = 1.0))]
    score: f64,
}

impl Entity {
    pub fn new(text: &str, label: EntityLabel, score: f64) -> Result<Self, ValidationError> {
        let text = strip(text);
        let length = text.chars().count();
        if !(MIN_TEXT_LEN..=MAX_TEXT_LEN).contains(&length) {
            return Err(ValidationError::TextLength { text, length });
        }

        if !score.is_finite() {
            return Err(ValidationError::ScoreNotFinite);
        }
        let score = round_probability(score);
        if !is_probability(score) {
            return Err(ValidationError::ScoreOutOfRange(score));
        }

        Ok(Self { text, label, score })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn label(&self) -> EntityLabel {
        self.label
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Unvalidated wire form of [`Entity`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawEntity {
    text: String,
    label: EntityLabel,
    score: f64,
}

impl<'de> Deserialize<'de> for Entity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawEntity::deserialize(deserializer)?;
        Entity::new(&raw.text, raw.label, raw.score).map_err(serde::de::Error::custom)
    }
}

/// Entity extraction result for one input record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EntityExtractionResult {
    /// ID of the input data
    #[serde(rename = "txnId", alias = "id")]
    pub id: String,
    /// The original input data
    #[serde(default)]
    pub text: Option<String>,
    /// A list of entities
    #[serde(default)]
    pub entities: Vec<Entity>,
    /// The reasoning behind the entity extraction
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl EntityExtractionResult {
    /// Map to storage-layer field names.
    pub fn to_storage_record(&self) -> StorageRecord {
        StorageRecord {
            txn_id: self.id.clone(),
            text: self.text.clone(),
            entities: self.entities.clone(),
        }
    }
}

/// Row shape handed to the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageRecord {
    pub txn_id: String,
    pub text: Option<String>,
    pub entities: Vec<Entity>,
}

/// A batch of extraction results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AllEntityResults {
    pub data: Vec<EntityExtractionResult>,
}

/// Instruction asking for the entities of one transaction narration.
pub fn extraction_instruction(id: &str, text: &str) -> String {
    let labels: Vec<&str> = EntityLabel::ALL.iter().map(|l| l.as_str()).collect();
    format!(
        "Extract the named entities from the transaction narration below.\n\
         Use txnId \"{id}\" and copy the narration into text unchanged.\n\
         Allowed labels: {}.\n\
         Give each entity a confidence score between 0.0 and 1.0.\n\n\
         Narration: {text}",
        labels.join(", ")
    )
}
