//! Context formatting
//!
//! Turns catalog rows into a [`ContextBlock`]: a one-line summary that goes
//! into a model prompt and a multi-line listing that is shown as is when the
//! model is not involved. Empty fields are replaced by fixed phrases so the
//! model never sees a blank.
//!
//! Every formatter returns `None` for an empty row set; the caller decides
//! which fixed message applies.

use crate::catalog::{AttentionEntry, ClinicalContext, Diagnosis, Patient};
use crate::intent::RosterVariant;

pub const NO_REASON: &str = "motivo no especificado";
pub const NO_CONDITION: &str = "enfermedad no especificada";
pub const NO_DETAILS: &str = "sin detalles adicionales";
pub const NO_ACTIONS: &str = "sin acciones recomendadas";
pub const NO_EXPLANATION: &str = "sin explicación disponible";
pub const NO_SYMPTOMS: &str = "sin síntomas registrados";
pub const NO_MEASUREMENTS: &str = "sin mediciones registradas";
pub const NO_FACTORS: &str = "sin factores personales registrados";

const SEPARATOR: &str = "; ";

/// Formatted data for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextBlock {
    summary: String,
    display: String,
}

impl ContextBlock {
    fn new(summary: String, heading: &str, lines: &[String]) -> Self {
        let mut display = heading.to_string();
        for line in lines {
            display.push('\n');
            display.push_str(line);
        }
        Self { summary, display }
    }

    /// Single-line form for prompts
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Heading plus one line per entry
    pub fn display(&self) -> &str {
        &self.display
    }
}

fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

fn or_fallback<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => fallback,
    }
}

fn display_lines(patients: &[Patient]) -> Vec<String> {
    patients
        .iter()
        .map(|p| format!("{}: {} {}", p.id, p.given_name, p.family_name))
        .collect()
}

/// Roster listing. The detailed variant writes `id: name`, the plain one
/// `id - name`.
pub fn format_roster(patients: &[Patient], variant: RosterVariant) -> Option<ContextBlock> {
    if patients.is_empty() {
        return None;
    }

    let summary = patients
        .iter()
        .map(|p| match variant {
            RosterVariant::Detailed => format!("{}: {} {}", p.id, p.given_name, p.family_name),
            RosterVariant::Plain => format!("{} - {} {}", p.id, p.given_name, p.family_name),
        })
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    Some(ContextBlock::new(
        summary,
        "Pacientes registrados:",
        &display_lines(patients),
    ))
}

pub fn format_recent(patients: &[Patient]) -> Option<ContextBlock> {
    if patients.is_empty() {
        return None;
    }

    let summary = patients
        .iter()
        .map(|p| format!("{} - {} {}", p.id, p.given_name, p.family_name))
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    Some(ContextBlock::new(
        summary,
        "Pacientes más recientes:",
        &display_lines(patients),
    ))
}

pub fn format_attention(entries: &[AttentionEntry]) -> Option<ContextBlock> {
    if entries.is_empty() {
        return None;
    }

    let lines: Vec<String> = entries
        .iter()
        .map(|entry| format!("{} ({})", entry.id, join_or(&entry.reasons, NO_REASON)))
        .collect();

    Some(ContextBlock::new(
        lines.join(SEPARATOR),
        "Pacientes que requieren atención prioritaria:",
        &lines,
    ))
}

/// Symptoms, measurements and personal factors of `patient_id`
pub fn format_clinical_context(patient_id: &str, rows: &[ClinicalContext]) -> Option<ContextBlock> {
    if rows.is_empty() {
        return None;
    }

    let summary = rows
        .iter()
        .map(|row| {
            format!(
                "Paciente {}: síntomas = {}; mediciones = {}; factores personales = {}.",
                row.id,
                join_or(&row.symptoms, NO_SYMPTOMS),
                join_or(&row.measurements, NO_MEASUREMENTS),
                join_or(&row.personal_factors, NO_FACTORS),
            )
        })
        .collect::<Vec<_>>()
        .join(" ");

    let lines: Vec<String> = rows
        .iter()
        .flat_map(|row| {
            [
                format!("- Síntomas: {}", join_or(&row.symptoms, NO_SYMPTOMS)),
                format!("- Mediciones: {}", join_or(&row.measurements, NO_MEASUREMENTS)),
                format!(
                    "- Factores personales: {}",
                    join_or(&row.personal_factors, NO_FACTORS)
                ),
            ]
        })
        .collect();

    Some(ContextBlock::new(
        summary,
        &format!("Contexto clínico para {}:", patient_id),
        &lines,
    ))
}

/// Preliminary diagnosis of `patient_id`
pub fn format_diagnosis(patient_id: &str, rows: &[Diagnosis]) -> Option<ContextBlock> {
    if rows.is_empty() {
        return None;
    }

    let summary = rows
        .iter()
        .map(|row| {
            format!(
                "Paciente {} (ID {}): enfermedad = {}; detalles = {}; acciones sugeridas = {}; explicación del sistema = {}.",
                row.patient_label(),
                row.id,
                or_fallback(row.condition.as_deref(), NO_CONDITION),
                join_or(&row.details, NO_DETAILS),
                join_or(&row.suggested_actions, NO_ACTIONS),
                or_fallback(Some(row.explanation.as_str()), NO_EXPLANATION),
            )
        })
        .collect::<Vec<_>>()
        .join(" ");

    let lines: Vec<String> = rows
        .iter()
        .flat_map(|row| {
            [
                format!(
                    "- Enfermedad principal: {}",
                    or_fallback(row.condition.as_deref(), NO_CONDITION)
                ),
                format!("- Detalles: {}", join_or(&row.details, NO_DETAILS)),
                format!(
                    "- Acciones sugeridas: {}",
                    join_or(&row.suggested_actions, NO_ACTIONS)
                ),
                format!(
                    "- Explicación del sistema: {}",
                    or_fallback(Some(row.explanation.as_str()), NO_EXPLANATION)
                ),
            ]
        })
        .collect();

    Some(ContextBlock::new(
        summary,
        &format!("Diagnóstico para {}:", patient_id),
        &lines,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> Patient {
        Patient::new("PAC_001", "Ana", "Gil")
    }

    #[test]
    fn test_plain_roster() {
        let block = format_roster(&[ana()], RosterVariant::Plain).unwrap();
        assert_eq!(block.summary(), "PAC_001 - Ana Gil");
        assert_eq!(block.display(), "Pacientes registrados:\nPAC_001: Ana Gil");
    }

    #[test]
    fn test_detailed_roster_joins_entries() {
        let patients = vec![ana(), Patient::new("PAC_002", "Luis", "Paz")];
        let block = format_roster(&patients, RosterVariant::Detailed).unwrap();
        assert_eq!(block.summary(), "PAC_001: Ana Gil; PAC_002: Luis Paz");
    }

    #[test]
    fn test_empty_rows_yield_none() {
        assert!(format_roster(&[], RosterVariant::Plain).is_none());
        assert!(format_recent(&[]).is_none());
        assert!(format_attention(&[]).is_none());
        assert!(format_clinical_context("PAC_001", &[]).is_none());
        assert!(format_diagnosis("PAC_001", &[]).is_none());
    }

    #[test]
    fn test_attention_placeholder() {
        let entries = vec![
            AttentionEntry {
                id: "PAC_002".into(),
                reasons: vec!["PrioridadUrgente".into(), "RiesgoAlto".into()],
            },
            AttentionEntry {
                id: "PAC_003".into(),
                reasons: vec![],
            },
        ];
        let block = format_attention(&entries).unwrap();
        assert_eq!(
            block.summary(),
            "PAC_002 (PrioridadUrgente, RiesgoAlto); PAC_003 (motivo no especificado)"
        );
        assert!(block.display().starts_with("Pacientes que requieren atención prioritaria:\n"));
    }

    #[test]
    fn test_clinical_context_fallbacks() {
        let rows = vec![ClinicalContext {
            id: "PAC_004".into(),
            symptoms: vec!["Fiebre".into(), "Cefalea".into()],
            measurements: vec![],
            personal_factors: vec!["Edad=34".into()],
        }];
        let block = format_clinical_context("PAC_004", &rows).unwrap();
        assert_eq!(
            block.summary(),
            "Paciente PAC_004: síntomas = Fiebre, Cefalea; mediciones = sin mediciones registradas; factores personales = Edad=34."
        );
        assert!(block.display().contains("- Mediciones: sin mediciones registradas"));
    }

    #[test]
    fn test_diagnosis_fallbacks() {
        let rows = vec![Diagnosis {
            id: "PAC_004".into(),
            given_name: Some("Gonzalo".into()),
            family_name: Some("Van Megroot".into()),
            condition: None,
            details: vec!["RiesgoAlto".into()],
            suggested_actions: vec![],
            explanation: String::new(),
        }];
        let block = format_diagnosis("PAC_004", &rows).unwrap();
        assert_eq!(
            block.summary(),
            "Paciente Gonzalo Van Megroot (ID PAC_004): enfermedad = enfermedad no especificada; \
             detalles = RiesgoAlto; acciones sugeridas = sin acciones recomendadas; \
             explicación del sistema = sin explicación disponible."
        );
        assert!(block.display().starts_with("Diagnóstico para PAC_004:\n- Enfermedad principal"));
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let patients = vec![ana()];
        assert_eq!(
            format_recent(&patients),
            format_recent(&patients)
        );
    }
}
