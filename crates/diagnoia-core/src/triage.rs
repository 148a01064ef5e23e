//! Triage vocabulary
//!
//! The diagnosis node of a patient points (`DETERMINA`) to flag nodes such as
//! `RiesgoAlto` or `PrioridadUrgente`. Every priority decision in the crate,
//! the needs-attention listing and the dashboard ranking alike, reads those
//! labels through this module.

use std::fmt;

use serde::Serialize;

/// Flags that put a patient on the needs-attention list
pub const ATTENTION_FLAGS: [&str; 2] = ["PrioridadUrgente", "RiesgoAlto"];

/// Rank given to patients without any priority flag
pub const UNRANKED: u8 = 99;

/// Care priority derived from diagnosis flags, most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Priority {
    Urgente,
    Moderada,
    Baja,
    SinDiagnostico,
}

impl Priority {
    /// Ordered priority vocabulary
    pub const LEVELS: [Priority; 3] = [Priority::Urgente, Priority::Moderada, Priority::Baja];

    /// Flag label as stored in the graph
    pub fn flag(&self) -> Option<&'static str> {
        match self {
            Priority::Urgente => Some("PrioridadUrgente"),
            Priority::Moderada => Some("PrioridadModerada"),
            Priority::Baja => Some("PrioridadBaja"),
            Priority::SinDiagnostico => None,
        }
    }

    /// Numeric rank used for sorting (1 = most urgent)
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Urgente => 1,
            Priority::Moderada => 2,
            Priority::Baja => 3,
            Priority::SinDiagnostico => UNRANKED,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Priority::SinDiagnostico => "Sin diagnóstico",
            other => other.flag().unwrap_or_default(),
        }
    }

    pub fn from_flag(flag: &str) -> Option<Self> {
        Self::LEVELS
            .into_iter()
            .find(|level| level.flag() == Some(flag))
    }

    /// Most urgent priority present in a details list
    pub fn from_details<S: AsRef<str>>(details: &[S]) -> Self {
        details
            .iter()
            .filter_map(|d| Self::from_flag(d.as_ref()))
            .min()
            .unwrap_or(Priority::SinDiagnostico)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Subset of `details` that calls for attention, in the order given
pub fn attention_reasons<S: AsRef<str>>(details: &[S]) -> Vec<String> {
    details
        .iter()
        .map(AsRef::as_ref)
        .filter(|d| ATTENTION_FLAGS.contains(d))
        .map(str::to_string)
        .collect()
}
