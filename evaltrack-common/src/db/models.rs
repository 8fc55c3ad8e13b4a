//! Database models
//!
//! Field names are English; the serialized names match the JSON the
//! front-end consumes.

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Candidate being scored ("avaliado")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One score given by one evaluator to one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawScore {
    pub id: Uuid,
    #[serde(rename = "avaliador")]
    pub evaluator: String,
    #[serde(rename = "avaliado")]
    pub candidate_name: String,
    #[serde(rename = "nota")]
    pub score: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RawScore {
    pub fn new(evaluator: String, candidate_name: String, score: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            evaluator,
            candidate_name,
            score,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Admin-editable rubric
///
/// Parsed from the wire name through `FromStr`; English names are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RubricKind {
    /// Interview average (derived from raw scores, but editable)
    Interview,
    /// Letter of intent
    Letter,
    /// Historical average
    Historical,
}

impl RubricKind {
    pub const ALL: [RubricKind; 3] = [
        RubricKind::Interview,
        RubricKind::Letter,
        RubricKind::Historical,
    ];

    /// Wire name used by the HTTP API
    pub fn as_str(&self) -> &'static str {
        match self {
            RubricKind::Interview => "entrevista",
            RubricKind::Letter => "carta",
            RubricKind::Historical => "historico",
        }
    }

    pub fn table(&self) -> ScoreTable {
        match self {
            RubricKind::Interview => ScoreTable::Interview,
            RubricKind::Letter => ScoreTable::Letter,
            RubricKind::Historical => ScoreTable::Historical,
        }
    }
}

impl fmt::Display for RubricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RubricKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "entrevista" | "interview" => Ok(RubricKind::Interview),
            "carta" | "letter" => Ok(RubricKind::Letter),
            "historico" | "historical" => Ok(RubricKind::Historical),
            other => Err(Error::InvalidKind(other.to_string())),
        }
    }
}

/// The four per-candidate score tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTable {
    Interview,
    Letter,
    Historical,
    Final,
}

impl ScoreTable {
    pub const ALL: [ScoreTable; 4] = [
        ScoreTable::Interview,
        ScoreTable::Letter,
        ScoreTable::Historical,
        ScoreTable::Final,
    ];

    /// SQL table name; the only source of table names interpolated into queries
    pub fn table_name(&self) -> &'static str {
        match self {
            ScoreTable::Interview => "media_entrevista",
            ScoreTable::Letter => "carta_intencao",
            ScoreTable::Historical => "media_historico",
            ScoreTable::Final => "media_final",
        }
    }
}

/// A derived score row joined with its candidate's name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Candidate id
    pub id: Uuid,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "nota")]
    pub score: f64,
}

/// Everything the evaluator and admin pages display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overview {
    #[serde(rename = "avaliados")]
    pub candidates: Vec<Candidate>,
    #[serde(rename = "avaliacoes")]
    pub raw_scores: Vec<RawScore>,
    #[serde(rename = "mediaEntrevista")]
    pub interview: Vec<ScoreEntry>,
    #[serde(rename = "cartaIntencao")]
    pub letter: Vec<ScoreEntry>,
    #[serde(rename = "mediaHistorico")]
    pub historical: Vec<ScoreEntry>,
    #[serde(rename = "mediaFinal")]
    pub final_scores: Vec<ScoreEntry>,
}

/// Parse a UUID read back from a TEXT column
pub(crate) fn parse_stored_id(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| Error::Internal(format!("Malformed id '{}' in database: {}", value, e)))
}
