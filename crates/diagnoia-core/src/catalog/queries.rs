//! Cypher statements of the query catalog
//!
//! Patients are `FrameInstance` nodes linked by `INSTANCE_OF` to the
//! `Paciente` frame class; `name` holds the identifier (`PAC_…`).

pub const ROSTER: &str = "\
MATCH (p:FrameInstance)-[:INSTANCE_OF]->(:FrameClass {name:'Paciente'})
RETURN p.name AS Paciente, p.nombre AS Nombre, p.apellido AS Apellido
ORDER BY p.name";

pub const RECENT_PATIENTS: &str = "\
MATCH (p:FrameInstance)-[:INSTANCE_OF]->(:FrameClass {name:'Paciente'})
RETURN p.name AS Paciente, p.nombre AS Nombre, p.apellido AS Apellido
ORDER BY p.name DESC
LIMIT $limit";

/// `$flags` carries [`crate::triage::ATTENTION_FLAGS`]
pub const NEEDS_ATTENTION: &str = "\
MATCH (p:FrameInstance)-[:TIENE_DIAGNOSTICO]->(dx:FrameInstance)
OPTIONAL MATCH (dx)-[:DETERMINA]->(det:FrameInstance)
WITH p, collect(DISTINCT det.name) AS dets
WITH p, [x IN dets WHERE x IN $flags] AS flags
WHERE size(flags) > 0
RETURN p.name AS Paciente, flags AS Motivos
ORDER BY p.name";

pub const PATIENT_CONTEXT: &str = "\
MATCH (p:FrameInstance {name:$pacId})
OPTIONAL MATCH (p)-[:PRESENTA]->(sym:FrameInstance)
OPTIONAL MATCH (p)-[:HAS_MEASUREMENT]->(m:Measurement)-[:OF_SLOT]->(slot:Slot)
OPTIONAL MATCH (p)-[:TIENE]->(fp:FrameInstance)-[:INSTANCE_OF]->(:FrameClass {name:'FactoresPersonales'})
OPTIONAL MATCH (fp)-[sv:SLOT_VALUE]->(s:Slot)
RETURN p.name AS Paciente,
       collect(DISTINCT sym.name) AS Sintomas,
       collect(DISTINCT slot.name + '=' + toString(m.value)) AS Mediciones,
       collect(DISTINCT s.name + '=' + toString(sv.value)) AS Factores";

pub const PATIENT_DIAGNOSIS: &str = "\
MATCH (p:FrameInstance {name:$pacId})-[:TIENE_DIAGNOSTICO]->(dx:FrameInstance)
OPTIONAL MATCH (dx)-[:ASOCIA]->(e:FrameInstance)
OPTIONAL MATCH (dx)-[:DETERMINA]->(det:FrameInstance)
OPTIONAL MATCH (dx)-[:SUGIERE]->(a:FrameInstance)
OPTIONAL MATCH (dx)-[:ES_EXPLICADO_POR]->(ex:FrameInstance)
RETURN p.name AS Paciente,
       p.nombre AS Nombre,
       p.apellido AS Apellido,
       e.name AS Enfermedad,
       collect(DISTINCT det.name) AS Detalles,
       collect(DISTINCT a.name) AS Accion,
       head(collect(DISTINCT ex.Texto)) AS Explicacion";

pub const PRIORITY_RANKING: &str = "\
MATCH (p:FrameInstance)-[:INSTANCE_OF]->(:FrameClass {name:'Paciente'})
OPTIONAL MATCH (p)-[:TIENE_DIAGNOSTICO]->(dx:FrameInstance)
OPTIONAL MATCH (dx)-[:ASOCIA]->(enf:FrameInstance)
OPTIONAL MATCH (dx)-[:DETERMINA]->(det:FrameInstance)
OPTIONAL MATCH (dx)-[:SUGIERE]->(acc:FrameInstance)
RETURN p.name AS Paciente,
       p.nombre AS Nombre,
       p.apellido AS Apellido,
       head(collect(DISTINCT enf.name)) AS Enfermedad,
       collect(DISTINCT det.name) AS Detalles,
       collect(DISTINCT acc.name) AS Acciones
ORDER BY p.name";
