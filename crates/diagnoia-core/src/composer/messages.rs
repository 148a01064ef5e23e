//! Fixed replies that never go through the language model

use crate::catalog::Patient;

pub const NO_PATIENTS: &str = "No hay pacientes registrados.";
pub const NO_RECENT_PATIENTS: &str = "No hay pacientes en la base.";
pub const NO_ATTENTION_NEEDED: &str = "No hay pacientes con prioridad urgente o riesgo alto.";
pub const UNKNOWN_PATIENT: &str = "No hay datos en Neo4j para ese paciente.";

pub const GUIDANCE: &str = "No reconocí un ID de paciente ni encontré coincidencias por nombre o apellido.\n\n\
Podés probar con:\n\
- \"Listar pacientes\"\n\
- \"Pacientes nuevos\"\n\
- \"Qué pacientes necesitan atención\"\n\
- \"Qué síntomas tiene el paciente PAC_004\" o usando el nombre tal como figura en la lista.";

/// Kind of patient data a request was after
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Context,
    Diagnosis,
}

pub fn ambiguous(candidates: &[Patient]) -> String {
    let list = candidates
        .iter()
        .map(|c| format!("{} - {} {}", c.id, c.given_name, c.family_name))
        .collect::<Vec<_>>()
        .join("; ");

    format!(
        "Encontré más de un paciente que coincide con lo que escribiste: {}. \
         Por favor indicá el ID del paciente (por ejemplo: PAC_004).",
        list
    )
}

/// The patient exists but has no data of `kind` yet
pub fn registered_without_data(patient: &Patient, kind: DataKind) -> String {
    let missing = match kind {
        DataKind::Diagnosis => "aún no hay diagnóstico preliminar cargado en Neo4j.",
        DataKind::Context => "no hay síntomas, mediciones ni factores personales cargados en Neo4j.",
    };
    format!(
        "El paciente {} ({} {}) está registrado, pero {}",
        patient.id, patient.given_name, patient.family_name, missing
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_lists_every_candidate() {
        let message = ambiguous(&[
            Patient::new("PAC_001", "Ana", "Gil"),
            Patient::new("PAC_003", "Ana", "Pérez"),
        ]);
        assert_eq!(
            message,
            "Encontré más de un paciente que coincide con lo que escribiste: \
             PAC_001 - Ana Gil; PAC_003 - Ana Pérez. \
             Por favor indicá el ID del paciente (por ejemplo: PAC_004)."
        );
    }

    #[test]
    fn test_registered_without_data() {
        let patient = Patient::new("PAC_005", "Luis", "Paz");
        assert_eq!(
            registered_without_data(&patient, DataKind::Diagnosis),
            "El paciente PAC_005 (Luis Paz) está registrado, pero aún no hay diagnóstico preliminar cargado en Neo4j."
        );
        assert!(registered_without_data(&patient, DataKind::Context).ends_with("factores personales cargados en Neo4j."));
    }

    #[test]
    fn test_guidance_lists_examples() {
        assert!(GUIDANCE.contains("\"Listar pacientes\""));
        assert!(GUIDANCE.contains("PAC_004"));
    }
}
