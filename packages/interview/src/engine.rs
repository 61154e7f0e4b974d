// ABOUTME: Interview engine boundary surface and per-turn pipeline
// ABOUTME: Orchestrates guard, turn processor, merge, coverage, suggestions, transcript, and persistence

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use specloom_agent::{SrsAgent, SrsDocument, TurnAgent};
use specloom_core::{normalize_answer, AreaId, InterviewState, Language, SummaryItem};
use specloom_storage::{DraftManager, MessageRole, TranscriptSink};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::coverage::{self, CoverageReport};
use crate::error::{InterviewError, Result};
use crate::guard;
use crate::merge;
use crate::suggest;
use crate::turn;
use crate::types::{EditedSummary, ReviewSheet, TurnOutcome};

/// The requirements interview orchestration engine.
///
/// Holds one live state per project, runs the per-turn pipeline, and owns
/// draft persistence. Turn mutations are all-or-nothing: every turn works
/// on a scratch copy that is committed only after the local draft write
/// succeeds, so an interrupted or failed turn leaves the session exactly
/// where it was.
pub struct InterviewEngine {
    turn_agent: Arc<dyn TurnAgent>,
    srs_agent: Arc<dyn SrsAgent>,
    drafts: DraftManager,
    transcript: Option<Arc<dyn TranscriptSink>>,
    sessions: Mutex<HashMap<String, InterviewState>>,
}

impl InterviewEngine {
    pub fn new(
        turn_agent: Arc<dyn TurnAgent>,
        srs_agent: Arc<dyn SrsAgent>,
        drafts: DraftManager,
    ) -> Self {
        Self {
            turn_agent,
            srs_agent,
            drafts,
            transcript: None,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Attach a transcript sink for audit history.
    pub fn with_transcript(mut self, transcript: Arc<dyn TranscriptSink>) -> Self {
        self.transcript = Some(transcript);
        self
    }

    /// Begin a fresh interview for a project, discarding any prior state,
    /// and return the opening question.
    pub async fn start_interview(
        &self,
        project_id: &str,
        language_tag: &str,
    ) -> Result<TurnOutcome> {
        let language = Language::from_tag(language_tag);
        info!("Starting interview for project: {}", project_id);

        let mut state = InterviewState::new(project_id);
        let question = turn::opening_question(language);
        state.last_question = Some(question.to_string());

        let record = self.drafts.save(&state).await?;
        state.saved_at = Some(record.saved_at);

        let report = coverage::evaluate(&state.coverage);
        self.append_transcript(project_id, MessageRole::Assistant, question, &report)
            .await;

        self.sessions
            .lock()
            .await
            .insert(project_id.to_string(), state);

        let suggested_answers =
            suggest::select_options(None, question, report.active_area, language);

        Ok(TurnOutcome {
            question_text: question.to_string(),
            coverage: report,
            done: false,
            suggested_answers,
            new_items: Default::default(),
        })
    }

    /// Process one user answer: validate it, consult the collaborator,
    /// merge the delta, re-evaluate coverage, pick suggestions, and
    /// persist. Collaborator failures soft-fail the turn with state
    /// untouched; only a failed local write surfaces as an error.
    pub async fn process_turn(
        &self,
        project_id: &str,
        answer: &str,
        language_tag: &str,
    ) -> Result<TurnOutcome> {
        let language = Language::from_tag(language_tag);
        let mut scratch = self.current_state(project_id).await?;

        let prior_report = coverage::evaluate(&scratch.coverage);
        guard::check_answer(&scratch, answer, prior_report.active_area)?;

        let processed = turn::process(&*self.turn_agent, &scratch, answer, language).await;
        let reply = processed.reply;

        if processed.soft_failed {
            // Nothing is mutated or persisted; the same answer can be
            // resubmitted once the collaborator recovers.
            let suggested_answers = suggest::select_options(
                None,
                &reply.question_text,
                prior_report.active_area,
                language,
            );
            return Ok(TurnOutcome {
                question_text: reply.question_text,
                coverage: prior_report,
                done: false,
                suggested_answers,
                new_items: Default::default(),
            });
        }

        let new_items = merge::apply_delta(&mut scratch.summary, &reply.summary_delta);
        scratch.coverage = coverage::fold_coverage(&scratch.coverage, &reply.coverage);
        scratch.last_answer = Some(answer.to_string());
        scratch.last_question = Some(reply.question_text.clone());

        let report = coverage::evaluate(&scratch.coverage);
        let suggested_answers = suggest::select_options(
            reply.suggested_answers.as_ref(),
            &reply.question_text,
            report.active_area,
            language,
        );

        self.append_transcript(project_id, MessageRole::User, answer, &report)
            .await;
        self.append_transcript(
            project_id,
            MessageRole::Assistant,
            &reply.question_text,
            &report,
        )
        .await;

        // The turn commits only once at least one durable copy exists.
        let record = self.drafts.save(&scratch).await?;
        scratch.saved_at = Some(record.saved_at);
        self.sessions
            .lock()
            .await
            .insert(project_id.to_string(), scratch);

        Ok(TurnOutcome {
            question_text: reply.question_text,
            coverage: report,
            done: reply.done,
            suggested_answers,
            new_items,
        })
    }

    /// Explicitly persist the current state ("save for later").
    pub async fn save_draft(&self, project_id: &str) -> Result<DateTime<Utc>> {
        let mut sessions = self.sessions.lock().await;
        let state = sessions
            .get_mut(project_id)
            .ok_or_else(|| InterviewError::NotActive(project_id.to_string()))?;

        let record = self.drafts.save(state).await?;
        state.saved_at = Some(record.saved_at);
        Ok(record.saved_at)
    }

    /// Load (and resume) the persisted draft for a project, reconciling
    /// local and remote copies by recency.
    pub async fn load_draft(&self, project_id: &str) -> Option<InterviewState> {
        let record = self.drafts.load(project_id).await?;
        self.sessions
            .lock()
            .await
            .insert(project_id.to_string(), record.state.clone());
        Some(record.state)
    }

    /// Drop the draft from both stores and forget the live session.
    pub async fn clear_draft(&self, project_id: &str) -> Result<()> {
        self.drafts.clear(project_id).await?;
        self.sessions.lock().await.remove(project_id);
        Ok(())
    }

    /// Seed the per-area editable view for Review/Finalize.
    pub async fn review_sheet(&self, project_id: &str) -> Result<ReviewSheet> {
        let state = self.current_state(project_id).await?;
        let areas = AreaId::ALL
            .into_iter()
            .map(|area| {
                let items = state
                    .items(area)
                    .iter()
                    .map(|item| item.text.clone())
                    .collect();
                (area, items)
            })
            .collect();
        Ok(ReviewSheet { areas })
    }

    /// Apply human edits, generate the SRS, and clear the draft.
    ///
    /// The edited content replaces each listed area's items wholesale; this
    /// is the one place overwrite is allowed. The draft is cleared only
    /// after the SRS collaborator succeeds, so a failed generation leaves
    /// everything in place for a retry.
    pub async fn finalize(
        &self,
        project_id: &str,
        edited: EditedSummary,
        language_tag: &str,
    ) -> Result<SrsDocument> {
        let language = Language::from_tag(language_tag);
        let mut state = self.current_state(project_id).await?;

        for (area, texts) in edited {
            let items = dedup_items(texts);
            state.summary.insert(area, items);
        }

        let record = self.drafts.save(&state).await?;
        state.saved_at = Some(record.saved_at);
        self.sessions
            .lock()
            .await
            .insert(project_id.to_string(), state.clone());

        let document = self.srs_agent.generate_srs(&state.summary, language).await?;

        info!(
            "SRS generated for project {}, clearing interview draft",
            project_id
        );
        self.clear_draft(project_id).await?;

        Ok(document)
    }

    /// Current state for a project: the live session if one exists, else
    /// the reconciled persisted draft.
    async fn current_state(&self, project_id: &str) -> Result<InterviewState> {
        let cached = self.sessions.lock().await.get(project_id).cloned();
        let state = match cached {
            Some(state) => Some(state),
            None => self.load_draft(project_id).await,
        };
        match state {
            Some(state) if state.active => Ok(state),
            _ => Err(InterviewError::NotActive(project_id.to_string())),
        }
    }

    async fn append_transcript(
        &self,
        project_id: &str,
        role: MessageRole,
        content: &str,
        report: &CoverageReport,
    ) {
        let Some(transcript) = &self.transcript else {
            return;
        };
        let metadata = json!({
            "stage": report.active_area.map(|area| area.as_str()),
            "average": report.average,
        });
        if let Err(e) = transcript
            .append(project_id, role, content, Some(metadata))
            .await
        {
            warn!(
                "Transcript append failed for project {}: {}",
                project_id, e
            );
        }
    }
}

/// Drop blanks and normalized duplicates from an edited area list,
/// preserving first-seen order.
fn dedup_items(texts: Vec<String>) -> Vec<SummaryItem> {
    let mut seen = Vec::new();
    let mut items = Vec::new();
    for text in texts {
        let trimmed = text.trim();
        let normalized = normalize_answer(trimmed);
        if normalized.is_empty() || seen.contains(&normalized) {
            continue;
        }
        seen.push(normalized);
        items.push(SummaryItem::new(trimmed));
    }
    items
}
