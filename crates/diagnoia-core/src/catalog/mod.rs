//! Query catalog
//!
//! The fixed set of read-only graph queries the assistant can run, each with
//! a typed row shape. Missing data never fails a query: optional
//! relationships come back as empty lists or `None`.

mod queries;

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::graph::{GraphStore, Params, Row};
use crate::triage::{ATTENTION_FLAGS, Priority, attention_reasons};

pub use queries::{
    NEEDS_ATTENTION, PATIENT_CONTEXT, PATIENT_DIAGNOSIS, PRIORITY_RANKING, RECENT_PATIENTS, ROSTER,
};

/// How many patients the "recent" listing returns
pub const RECENT_LIMIT: i64 = 5;

/// A roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patient {
    pub id: String,
    pub given_name: String,
    pub family_name: String,
}

impl Patient {
    pub fn new(
        id: impl Into<String>,
        given_name: impl Into<String>,
        family_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            given_name: given_name.into(),
            family_name: family_name.into(),
        }
    }

    /// "given family", trimmed
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
            .trim()
            .to_string()
    }

    fn from_row(row: &Row) -> Option<Self> {
        Some(Self {
            id: row.text("Paciente")?.to_string(),
            given_name: row.text("Nombre").unwrap_or_default().to_string(),
            family_name: row.text("Apellido").unwrap_or_default().to_string(),
        })
    }
}

/// A patient flagged for attention and the flags that triggered it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttentionEntry {
    pub id: String,
    pub reasons: Vec<String>,
}

/// Symptoms, measurements and personal factors of one patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClinicalContext {
    pub id: String,
    pub symptoms: Vec<String>,
    /// "label=value"
    pub measurements: Vec<String>,
    /// "label=value"
    pub personal_factors: Vec<String>,
}

/// Preliminary diagnosis of one patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnosis {
    pub id: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub condition: Option<String>,
    pub details: Vec<String>,
    pub suggested_actions: Vec<String>,
    /// First explanation found, empty when there is none
    pub explanation: String,
}

impl Diagnosis {
    /// Patient name when known, otherwise the identifier
    pub fn patient_label(&self) -> String {
        let name = format!(
            "{} {}",
            self.given_name.as_deref().unwrap_or_default(),
            self.family_name.as_deref().unwrap_or_default()
        );
        let name = name.trim();
        if name.is_empty() {
            self.id.clone()
        } else {
            name.to_string()
        }
    }
}

/// One line of the dashboard priority table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityEntry {
    /// 1-based display position, assigned after sorting
    pub rank: usize,
    pub patient: Patient,
    pub condition: Option<String>,
    pub details: Vec<String>,
    pub actions: Vec<String>,
    pub priority: Priority,
}

impl PriorityEntry {
    fn from_row(row: &Row) -> Option<Self> {
        let details = row.list("Detalles");
        Some(Self {
            rank: 0,
            patient: Patient::from_row(row)?,
            condition: row.text("Enfermedad").map(str::to_string),
            priority: Priority::from_details(&details),
            details,
            actions: row.list("Acciones"),
        })
    }
}

/// Sort by priority rank (stable for ties) and assign display ranks 1..n
pub fn rank_by_priority(mut entries: Vec<PriorityEntry>) -> Vec<PriorityEntry> {
    entries.sort_by_key(|entry| entry.priority.rank());
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i + 1;
    }
    entries
}

/// Typed access to the catalog queries over an injected graph store
#[derive(Clone)]
pub struct QueryCatalog {
    graph: Arc<dyn GraphStore>,
}

impl std::fmt::Debug for QueryCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCatalog").finish_non_exhaustive()
    }
}

impl QueryCatalog {
    pub fn new(graph: Arc<dyn GraphStore>) -> Self {
        Self { graph }
    }

    async fn run(&self, name: &str, statement: &str, params: Params) -> Result<Vec<Row>> {
        let rows = self.graph.query(statement, params).await?;
        debug!(query = name, rows = rows.len(), "Catalog query finished");
        Ok(rows)
    }

    /// All patients, by identifier ascending
    pub async fn roster(&self) -> Result<Vec<Patient>> {
        let rows = self.run("roster", ROSTER, Params::new()).await?;
        Ok(rows.iter().filter_map(Patient::from_row).collect())
    }

    /// The five highest identifiers, descending
    pub async fn recent_patients(&self) -> Result<Vec<Patient>> {
        let rows = self
            .run("recent_patients", RECENT_PATIENTS, params([("limit", RECENT_LIMIT.into())]))
            .await?;
        Ok(rows.iter().filter_map(Patient::from_row).collect())
    }

    /// Patients whose diagnosis carries an attention flag
    pub async fn needs_attention(&self) -> Result<Vec<AttentionEntry>> {
        let rows = self
            .run(
                "needs_attention",
                NEEDS_ATTENTION,
                params([("flags", serde_json::json!(ATTENTION_FLAGS))]),
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| AttentionEntry {
                id: row.text("Paciente").unwrap_or("Paciente sin ID").to_string(),
                reasons: attention_reasons(&row.list("Motivos")),
            })
            .collect())
    }

    /// Clinical context rows; empty when the patient does not exist
    pub async fn patient_context(&self, patient_id: &str) -> Result<Vec<ClinicalContext>> {
        let rows = self
            .run("patient_context", PATIENT_CONTEXT, patient_param(patient_id))
            .await?;

        Ok(rows
            .iter()
            .map(|row| ClinicalContext {
                id: row.text("Paciente").unwrap_or(patient_id).to_string(),
                symptoms: row.list("Sintomas"),
                measurements: row.list("Mediciones"),
                personal_factors: row.list("Factores"),
            })
            .collect())
    }

    /// Diagnosis rows; empty when the patient has no diagnosis node
    pub async fn patient_diagnosis(&self, patient_id: &str) -> Result<Vec<Diagnosis>> {
        let rows = self
            .run("patient_diagnosis", PATIENT_DIAGNOSIS, patient_param(patient_id))
            .await?;

        Ok(rows
            .iter()
            .map(|row| Diagnosis {
                id: row.text("Paciente").unwrap_or(patient_id).to_string(),
                given_name: row.text("Nombre").map(str::to_string),
                family_name: row.text("Apellido").map(str::to_string),
                condition: row.text("Enfermedad").map(str::to_string),
                details: row.list("Detalles"),
                suggested_actions: row.list("Accion"),
                explanation: row.text("Explicacion").unwrap_or_default().to_string(),
            })
            .collect())
    }

    /// Every patient with its diagnosis details, most urgent first
    pub async fn priority_ranking(&self) -> Result<Vec<PriorityEntry>> {
        let rows = self
            .run("priority_ranking", PRIORITY_RANKING, Params::new())
            .await?;
        Ok(rank_by_priority(
            rows.iter().filter_map(PriorityEntry::from_row).collect(),
        ))
    }

    /// Roster entry for an exact identifier
    pub async fn find_patient(&self, patient_id: &str) -> Result<Option<Patient>> {
        Ok(self
            .roster()
            .await?
            .into_iter()
            .find(|patient| patient.id == patient_id))
    }
}

fn params<const N: usize>(entries: [(&str, serde_json::Value); N]) -> Params {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn patient_param(patient_id: &str) -> Params {
    params([("pacId", patient_id.into())])
}
