//! Response composition
//!
//! [`Assistant`] runs one question through the whole pipeline: classify,
//! resolve names against the roster, query the catalog, format, and either
//! narrate through the language model or return the formatted data.
//! Fixed messages (empty listings, unknown or ambiguous patients, guidance)
//! never reach the model.
//!
//! ```rust,ignore
//! let assistant = Assistant::new(graph, model).with_mode(ResponseMode::Direct);
//! let reply = assistant.respond("Listar pacientes").await?;
//! println!("{}", reply.text);
//! ```

pub mod messages;
pub mod prompts;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{Patient, QueryCatalog};
use crate::context::{self, ContextBlock};
use crate::error::{Error, Result};
use crate::graph::GraphStore;
use crate::intent::{self, Intent, PatientRef, UnresolvedReason};
use crate::llm::LanguageModel;

use messages::DataKind;

/// How data-bearing answers are produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ResponseMode {
    /// The language model writes the answer from the formatted context
    #[default]
    Narrated,
    /// The formatted context is the answer
    Direct,
}

impl ResponseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseMode::Narrated => "narrated",
            ResponseMode::Direct => "direct",
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "narrated" => Ok(ResponseMode::Narrated),
            "direct" => Ok(ResponseMode::Direct),
            other => Err(anyhow::anyhow!(
                "Unknown response mode '{}'. Valid modes: narrated, direct",
                other
            )),
        }
    }
}

/// Where a reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReplyKind {
    /// Written by the language model
    Generated,
    /// Formatted data returned without the model
    Direct,
    /// The listing query returned nothing
    EmptyResult,
    /// The identifier is not in the roster
    UnknownPatient,
    /// The patient exists but has no data of the requested kind
    NoDataForKind,
    /// Several patients matched by name
    AmbiguousPatient,
    /// Nothing in the question could be routed
    Unresolvable,
}

/// Answer to one question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub kind: ReplyKind,
    pub text: String,
}

impl Reply {
    fn new(kind: ReplyKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn used_model(&self) -> bool {
        self.kind == ReplyKind::Generated
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// The clinical assistant
#[derive(Clone)]
pub struct Assistant {
    catalog: QueryCatalog,
    model: Arc<dyn LanguageModel>,
    mode: ResponseMode,
}

impl fmt::Debug for Assistant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assistant")
            .field("model", &self.model.model_name())
            .field("mode", &self.mode)
            .finish()
    }
}

impl Assistant {
    pub fn new(graph: Arc<dyn GraphStore>, model: Arc<dyn LanguageModel>) -> Self {
        Self {
            catalog: QueryCatalog::new(graph),
            model,
            mode: ResponseMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: ResponseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ResponseMode {
        self.mode
    }

    pub fn catalog(&self) -> &QueryCatalog {
        &self.catalog
    }

    /// Answer a single question.
    ///
    /// Collaborator failures are returned as errors without retry; every
    /// other outcome is a [`Reply`].
    pub async fn respond(&self, question: &str) -> Result<Reply> {
        let text = question.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("La pregunta está vacía".to_string()));
        }

        let mut intent = intent::classify(text);
        if intent.needs_roster() {
            let roster = self.catalog.roster().await?;
            intent = intent::resolve(intent, &roster);
        }
        info!(intent = intent.name(), mode = %self.mode, "Question classified");
        debug!(question = text, "Classified question");

        match intent {
            Intent::Roster(variant) => {
                let patients = self.catalog.roster().await?;
                self.answer(context::format_roster(&patients, variant), messages::NO_PATIENTS, |list| {
                    prompts::roster(variant, list)
                })
                .await
            }
            Intent::Recent => {
                let patients = self.catalog.recent_patients().await?;
                self.answer(
                    context::format_recent(&patients),
                    messages::NO_RECENT_PATIENTS,
                    prompts::recent,
                )
                .await
            }
            Intent::NeedsAttention => {
                let entries = self.catalog.needs_attention().await?;
                self.answer(
                    context::format_attention(&entries),
                    messages::NO_ATTENTION_NEEDED,
                    prompts::needs_attention,
                )
                .await
            }
            Intent::PatientContext(patient) => {
                let Some(id) = patient.id() else {
                    return Ok(Reply::new(ReplyKind::Unresolvable, messages::GUIDANCE));
                };
                let rows = self.catalog.patient_context(id).await?;
                match context::format_clinical_context(id, &rows) {
                    Some(block) => {
                        self.narrate(block, |summary| prompts::clinical_context(summary, text))
                            .await
                    }
                    None => self.missing_data(&patient, id, DataKind::Context).await,
                }
            }
            Intent::PatientDiagnosis(patient) => {
                let Some(id) = patient.id() else {
                    return Ok(Reply::new(ReplyKind::Unresolvable, messages::GUIDANCE));
                };
                let rows = self.catalog.patient_diagnosis(id).await?;
                match context::format_diagnosis(id, &rows) {
                    Some(block) => {
                        self.narrate(block, |summary| prompts::diagnosis(summary, text))
                            .await
                    }
                    None => self.missing_data(&patient, id, DataKind::Diagnosis).await,
                }
            }
            Intent::Unresolvable(UnresolvedReason::Ambiguous(candidates)) => {
                warn!(candidates = candidates.len(), "Patient name is ambiguous");
                Ok(Reply::new(
                    ReplyKind::AmbiguousPatient,
                    messages::ambiguous(&candidates),
                ))
            }
            Intent::Unresolvable(UnresolvedReason::NoMatch) => {
                Ok(Reply::new(ReplyKind::Unresolvable, messages::GUIDANCE))
            }
        }
    }

    async fn answer(
        &self,
        block: Option<ContextBlock>,
        empty_message: &str,
        prompt: impl FnOnce(&str) -> String,
    ) -> Result<Reply> {
        match block {
            Some(block) => self.narrate(block, prompt).await,
            None => Ok(Reply::new(ReplyKind::EmptyResult, empty_message)),
        }
    }

    async fn narrate(
        &self,
        block: ContextBlock,
        prompt: impl FnOnce(&str) -> String,
    ) -> Result<Reply> {
        match self.mode {
            ResponseMode::Direct => Ok(Reply::new(ReplyKind::Direct, block.display())),
            ResponseMode::Narrated => {
                let prompt = prompt(block.summary());
                debug!(model = self.model.model_name(), "Requesting narration");
                let text = self.model.complete(&prompt).await?;
                Ok(Reply::new(ReplyKind::Generated, text))
            }
        }
    }

    async fn missing_data(&self, patient: &PatientRef, id: &str, kind: DataKind) -> Result<Reply> {
        let known: Option<Patient> = match patient {
            PatientRef::Matched(found) => Some(found.clone()),
            _ => self.catalog.find_patient(id).await?,
        };

        match known {
            Some(found) => Ok(Reply::new(
                ReplyKind::NoDataForKind,
                messages::registered_without_data(&found, kind),
            )),
            None => {
                warn!(patient = id, "Unknown patient identifier");
                Ok(Reply::new(ReplyKind::UnknownPatient, messages::UNKNOWN_PATIENT))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Params, Row};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct EmptyGraph;

    #[async_trait]
    impl GraphStore for EmptyGraph {
        async fn query(&self, _statement: &str, _params: Params) -> Result<Vec<Row>> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct EchoModel {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LanguageModel for EchoModel {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("ok".to_string())
        }

        fn model_name(&self) -> &str {
            "echo"
        }
    }

    fn assistant() -> (Assistant, Arc<EchoModel>) {
        let model = Arc::new(EchoModel::default());
        (Assistant::new(Arc::new(EmptyGraph), model.clone()), model)
    }

    #[test]
    fn test_response_mode_parse() {
        assert_eq!("direct".parse::<ResponseMode>().unwrap(), ResponseMode::Direct);
        assert_eq!(" Narrated ".parse::<ResponseMode>().unwrap(), ResponseMode::Narrated);
        assert!("loud".parse::<ResponseMode>().is_err());
        assert_eq!(ResponseMode::Direct.to_string(), "direct");
    }

    #[tokio::test]
    async fn test_empty_question_is_rejected() {
        let (assistant, _) = assistant();
        let err = assistant.respond("   ").await.unwrap_err();
        assert_eq!(err.code(), "E800");
    }

    #[tokio::test]
    async fn test_empty_listings_skip_model() {
        let (assistant, model) = assistant();

        let reply = assistant.respond("Listar pacientes").await.unwrap();
        assert_eq!(reply, Reply::new(ReplyKind::EmptyResult, messages::NO_PATIENTS));

        let reply = assistant.respond("pacientes nuevos").await.unwrap();
        assert_eq!(reply.text, messages::NO_RECENT_PATIENTS);

        let reply = assistant.respond("quiénes necesitan atención?").await.unwrap();
        assert_eq!(reply.text, messages::NO_ATTENTION_NEEDED);

        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unresolvable_gets_guidance() {
        let (assistant, model) = assistant();
        let reply = assistant.respond("hola").await.unwrap();
        assert_eq!(reply.kind, ReplyKind::Unresolvable);
        assert!(!reply.used_model());
        assert!(model.prompts.lock().unwrap().is_empty());
    }
}
