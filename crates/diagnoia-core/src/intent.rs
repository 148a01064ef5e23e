//! Intent classification
//!
//! [`classify`] maps a question to an [`Intent`] using ordered keyword
//! families; the first family that matches wins. It never touches a
//! collaborator. When the question names a patient instead of giving an
//! identifier, the intent carries a [`PatientRef::Name`] that [`resolve`]
//! settles against the roster.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::catalog::Patient;
use crate::directory::match_candidates;

/// Tokens that together ask for the full roster with names
pub const ROSTER_DETAIL_TOKENS: [&str; 4] = ["nombre", "apellido", "paciente", "pacientes"];

pub const RECENT_KEYWORDS: [&str; 6] = [
    "pacientes nuevos",
    "nuevos pacientes",
    "últimos pacientes",
    "ultimos pacientes",
    "más recientes",
    "mas recientes",
];

pub const LIST_KEYWORDS: [&str; 4] = [
    "listar pacientes",
    "listame",
    "lista de pacientes",
    "todos los pacientes",
];

pub const ATTENTION_KEYWORDS: [&str; 6] = [
    "necesitan atención",
    "necesitan atencion",
    "atención médica",
    "atencion medica",
    "prioridad urgente",
    "riesgo alto",
];

pub const DIAGNOSIS_KEYWORDS: [&str; 8] = [
    "diagn",
    "riesgo",
    "prioridad",
    "acción",
    "accion",
    "enfermedad",
    "patologia",
    "patología",
];

pub const SYMPTOM_KEYWORDS: [&str; 5] = ["sintoma", "síntoma", "sintomas", "síntomas", "contexto"];

// "PAC" must start a word and be followed by a separator or a digit, so
// "paciente" never reads as an identifier.
static PATIENT_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bPAC(?:[_-]\w+|\d\w*)").expect("patient identifier pattern is valid")
});

/// Wording requested for a roster listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RosterVariant {
    /// The question mentions nombre, apellido, paciente and pacientes
    Detailed,
    Plain,
}

/// How the question points at a patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PatientRef {
    /// Literal identifier as written by the user
    Identifier(String),
    /// No identifier; the text must be matched against the roster
    Name(String),
    /// Exactly one roster entry matched by name
    Matched(Patient),
}

impl PatientRef {
    /// Identifier to query with, once known
    pub fn id(&self) -> Option<&str> {
        match self {
            PatientRef::Identifier(id) => Some(id),
            PatientRef::Matched(patient) => Some(&patient.id),
            PatientRef::Name(_) => None,
        }
    }

    pub fn needs_lookup(&self) -> bool {
        matches!(self, PatientRef::Name(_))
    }
}

/// Why no query could be chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UnresolvedReason {
    /// No keyword family, identifier or roster name matched
    NoMatch,
    /// Several roster entries matched by name
    Ambiguous(Vec<Patient>),
}

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Intent {
    Roster(RosterVariant),
    Recent,
    NeedsAttention,
    PatientContext(PatientRef),
    PatientDiagnosis(PatientRef),
    Unresolvable(UnresolvedReason),
}

impl Intent {
    pub fn patient(&self) -> Option<&PatientRef> {
        match self {
            Intent::PatientContext(patient) | Intent::PatientDiagnosis(patient) => Some(patient),
            _ => None,
        }
    }

    /// True while a name reference is still waiting for [`resolve`]
    pub fn needs_roster(&self) -> bool {
        self.patient().is_some_and(PatientRef::needs_lookup)
    }

    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Roster(_) => "roster",
            Intent::Recent => "recent",
            Intent::NeedsAttention => "needs_attention",
            Intent::PatientContext(_) => "patient_context",
            Intent::PatientDiagnosis(_) => "patient_diagnosis",
            Intent::Unresolvable(UnresolvedReason::NoMatch) => "unresolvable",
            Intent::Unresolvable(UnresolvedReason::Ambiguous(_)) => "ambiguous",
        }
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// First patient identifier in `text`, case preserved
pub fn extract_patient_id(text: &str) -> Option<&str> {
    PATIENT_ID.find(text).map(|m| m.as_str())
}

/// Classify a trimmed, non-empty question
pub fn classify(text: &str) -> Intent {
    let lower = text.to_lowercase();

    if ROSTER_DETAIL_TOKENS.iter().all(|token| lower.contains(token)) {
        return Intent::Roster(RosterVariant::Detailed);
    }
    if contains_any(&lower, &RECENT_KEYWORDS) {
        return Intent::Recent;
    }
    if contains_any(&lower, &LIST_KEYWORDS) {
        return Intent::Roster(RosterVariant::Plain);
    }
    if contains_any(&lower, &ATTENTION_KEYWORDS) {
        return Intent::NeedsAttention;
    }

    let patient = match extract_patient_id(text) {
        Some(id) => PatientRef::Identifier(id.to_string()),
        None => PatientRef::Name(text.to_string()),
    };

    if contains_any(&lower, &DIAGNOSIS_KEYWORDS) && !contains_any(&lower, &SYMPTOM_KEYWORDS) {
        Intent::PatientDiagnosis(patient)
    } else {
        Intent::PatientContext(patient)
    }
}

/// Settle a name reference against the roster. Other intents pass through.
pub fn resolve(intent: Intent, roster: &[Patient]) -> Intent {
    let matched = |text: &str| -> Result<PatientRef, UnresolvedReason> {
        let mut candidates = match_candidates(roster, text);
        match candidates.len() {
            0 => Err(UnresolvedReason::NoMatch),
            1 => Ok(PatientRef::Matched(candidates.remove(0))),
            _ => Err(UnresolvedReason::Ambiguous(candidates)),
        }
    };

    match intent {
        Intent::PatientContext(PatientRef::Name(text)) => match matched(&text) {
            Ok(patient) => Intent::PatientContext(patient),
            Err(reason) => Intent::Unresolvable(reason),
        },
        Intent::PatientDiagnosis(PatientRef::Name(text)) => match matched(&text) {
            Ok(patient) => Intent::PatientDiagnosis(patient),
            Err(reason) => Intent::Unresolvable(reason),
        },
        other => other,
    }
}
