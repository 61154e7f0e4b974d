// ABOUTME: Collaborator contracts for turn generation and SRS generation
// ABOUTME: Defines the request/reply shapes and the Claude-backed implementation of both traits

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use specloom_core::{CoverageMap, Language, Summary, SummaryDelta};

use crate::error::AgentResult;
use crate::prompts;
use crate::service::AgentService;

/// Input to one turn-generation call.
#[derive(Debug, Clone, Serialize)]
pub struct TurnRequest {
    pub prior_summary: Summary,
    pub prior_coverage: CoverageMap,
    pub new_answer: String,
    pub language: Language,
}

/// Reply from the turn-generation collaborator.
///
/// `suggested_answers` is kept free-shape on purpose: models return a JSON
/// array, a JSON-encoded string, or a delimited text block, and the
/// suggestion selector downstream tolerates all of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnReply {
    pub question_text: String,
    #[serde(default)]
    pub summary_delta: SummaryDelta,
    #[serde(default)]
    pub coverage: CoverageMap,
    #[serde(default)]
    pub suggested_answers: Option<serde_json::Value>,
    #[serde(default)]
    pub done: bool,
}

impl TurnReply {
    /// A reply that carries only a question: empty delta and coverage, so
    /// applying it leaves summary and coverage untouched.
    pub fn question_only(question_text: impl Into<String>) -> Self {
        Self {
            question_text: question_text.into(),
            summary_delta: SummaryDelta::new(),
            coverage: CoverageMap::new(),
            suggested_answers: None,
            done: false,
        }
    }
}

/// One section of a generated SRS document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SrsSection {
    pub heading: String,
    pub body: String,
}

/// Structured SRS document produced at finalize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SrsDocument {
    pub title: String,
    pub sections: Vec<SrsSection>,
}

/// Turn-generation collaborator: proposes the next question, summary delta,
/// coverage estimates, and answer suggestions for one interview turn.
#[async_trait]
pub trait TurnAgent: Send + Sync {
    async fn next_turn(&self, request: TurnRequest) -> AgentResult<TurnReply>;
}

/// SRS-generation collaborator, called once at finalize.
#[async_trait]
pub trait SrsAgent: Send + Sync {
    async fn generate_srs(
        &self,
        summary: &Summary,
        language: Language,
    ) -> AgentResult<SrsDocument>;
}

/// Claude-backed implementation of both collaborator contracts.
pub struct ClaudeAgent {
    service: AgentService,
}

impl ClaudeAgent {
    pub fn new() -> Self {
        Self {
            service: AgentService::new(),
        }
    }

    pub fn with_service(service: AgentService) -> Self {
        Self { service }
    }
}

impl Default for ClaudeAgent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TurnAgent for ClaudeAgent {
    async fn next_turn(&self, request: TurnRequest) -> AgentResult<TurnReply> {
        let prompt = prompts::turn_prompt(&request)?;
        let system = prompts::turn_system_prompt(request.language);
        self.service
            .generate_structured::<TurnReply>(prompt, Some(system))
            .await
    }
}

#[async_trait]
impl SrsAgent for ClaudeAgent {
    async fn generate_srs(
        &self,
        summary: &Summary,
        language: Language,
    ) -> AgentResult<SrsDocument> {
        let prompt = prompts::srs_prompt(summary, language)?;
        let system = prompts::srs_system_prompt(language);
        self.service
            .generate_structured::<SrsDocument>(prompt, Some(system))
            .await
    }
}
