//! Instruction templates handed to the language model

use crate::intent::RosterVariant;

pub fn roster(variant: RosterVariant, list: &str) -> String {
    match variant {
        RosterVariant::Detailed => format!(
            "Te doy una lista de pacientes con su identificador y nombre completo.\n\
             Lista: {list}\n\n\
             Redactá en una o dos oraciones, en español, los nombres y apellidos de todos los pacientes, \
             mencionando su identificador entre paréntesis. No agregues código ni ejemplos técnicos."
        ),
        RosterVariant::Plain => format!(
            "Te doy una lista de pacientes con su identificador y nombre completo.\n\
             Lista: {list}\n\n\
             Redactá en una o dos oraciones, en español, un resumen breve indicando cuántos pacientes hay \
             y listando sus nombres completos. No escribas código ni ejemplos técnicos."
        ),
    }
}

pub fn recent(list: &str) -> String {
    format!(
        "Te doy una lista de pacientes más recientes, con su identificador y nombre completo.\n\
         Lista: {list}\n\n\
         Redactá en una o dos oraciones, en español, un resumen breve indicando cuántos pacientes hay \
         y nombrándolos. No agregues código ni nada técnico."
    )
}

pub fn needs_attention(list: &str) -> String {
    format!(
        "Te doy una lista de pacientes que requieren atención y los motivos (PrioridadUrgente, RiesgoAlto).\n\
         Lista: {list}\n\n\
         Redactá en una o dos oraciones, en español, qué pacientes requieren atención y por qué. \
         No agregues código ni explicaciones técnicas, solo texto clínico sencillo."
    )
}

pub fn diagnosis(context: &str, question: &str) -> String {
    format!(
        "Sos un asistente clínico. A partir de la siguiente información sobre el diagnóstico preliminar \
         de un paciente, respondé de forma breve en español.\n\
         Mencioná claramente:\n\
         - la enfermedad principal,\n\
         - el nivel de riesgo y la prioridad de atención (si aparecen en los detalles),\n\
         - y la(s) acción(es) recomendadas.\n\
         Podés usar la explicación generada por el sistema como apoyo, pero no repitas literalmente todo. \
         No expliques formatos de datos ni temas técnicos, solo la situación clínica.\n\n\
         Datos del diagnóstico:\n{context}\n\n\
         Pregunta del usuario: '{question}'\n\
         Respuesta breve en español:"
    )
}

pub fn clinical_context(context: &str, question: &str) -> String {
    format!(
        "Sos un asistente clínico. A partir de la siguiente información sobre un paciente, \
         resumí en una o dos oraciones, en español, cuáles son sus síntomas, mediciones relevantes \
         y factores personales. No expliques formatos de datos ni temas técnicos, solo la situación clínica.\n\n\
         Datos del paciente:\n{context}\n\n\
         Pregunta del usuario: '{question}'\n\
         Respuesta breve en español:"
    )
}
