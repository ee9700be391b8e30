//! Submission intake and background document enrichment
//!
//! A submission is stored immediately with a placeholder summary. The
//! document is then summarized on a spawned task whose outcome is written
//! back onto the submission (`enrichment.state` = `done` or `failed`).

use crate::meeting::{
    update_meeting, Enrichment, EnrichmentState, MeetingStore, StoreError, Submission,
    SubmissionInfo,
};
use crate::summarizer::DocumentSummarizer;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("Missing required fields")]
    MissingFields,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// An uploaded document held in memory
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Raw submission form; every field is optional until validated
#[derive(Debug, Default)]
pub struct SubmissionForm {
    pub team_name: Option<String>,
    pub meeting_id: Option<String>,
    pub file: Option<UploadedFile>,
}

impl SubmissionForm {
    fn validate(self) -> Result<(String, String, UploadedFile), IntakeError> {
        let team_name = self
            .team_name
            .filter(|t| !t.trim().is_empty())
            .ok_or(IntakeError::MissingFields)?;
        let meeting_id = self
            .meeting_id
            .filter(|m| !m.trim().is_empty())
            .ok_or(IntakeError::MissingFields)?;
        let file = self
            .file
            .filter(|f| !f.bytes.is_empty())
            .ok_or(IntakeError::MissingFields)?;
        Ok((team_name, meeting_id, file))
    }
}

pub struct SubmissionIntake {
    store: Arc<dyn MeetingStore>,
    summarizer: Arc<DocumentSummarizer>,
}

impl SubmissionIntake {
    pub fn new(store: Arc<dyn MeetingStore>, summarizer: Arc<DocumentSummarizer>) -> Self {
        Self { store, summarizer }
    }

    /// Append a placeholder submission and start summarizing its document.
    ///
    /// Returns the stored submission and the handle of the enrichment job.
    pub async fn submit(
        &self,
        form: SubmissionForm,
    ) -> Result<(Submission, JoinHandle<()>), IntakeError> {
        let (team_name, meeting_id, file) = form.validate()?;

        let submission = Submission::placeholder(team_name, &file.file_name);
        let appended = submission.clone();
        update_meeting(self.store.as_ref(), &meeting_id, move |meeting| {
            meeting.submissions.push(appended.clone());
        })
        .await?;

        info!(
            "Accepted submission {} from {} for meeting {}",
            submission.id, submission.team_name, meeting_id
        );

        let job = self.spawn_enrichment(meeting_id, submission.id.clone(), file);
        Ok((submission, job))
    }

    fn spawn_enrichment(
        &self,
        meeting_id: String,
        submission_id: String,
        file: UploadedFile,
    ) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let summarizer = Arc::clone(&self.summarizer);

        tokio::spawn(async move {
            let (info, enrichment) = match summarizer.summarize(&file.file_name, file.bytes).await {
                Ok(summary) => {
                    let info = SubmissionInfo {
                        idea_name: summary.display_title().to_string(),
                        doc_summary: summary.into_value(),
                    };
                    let enrichment = Enrichment {
                        state: EnrichmentState::Done,
                        error: None,
                    };
                    (Some(info), enrichment)
                }
                Err(e) => {
                    error!("Error parsing document for submission {}: {}", submission_id, e);
                    let enrichment = Enrichment {
                        state: EnrichmentState::Failed,
                        error: Some(e.to_string()),
                    };
                    (None, enrichment)
                }
            };

            let result = update_meeting(store.as_ref(), &meeting_id, |meeting| {
                match meeting.submission_mut(&submission_id) {
                    Some(submission) => {
                        if let Some(info) = &info {
                            submission.submission_info = info.clone();
                        }
                        submission.enrichment = enrichment.clone();
                    }
                    None => warn!("Submission {} vanished before enrichment", submission_id),
                }
            })
            .await;

            match result {
                Ok(_) => info!(
                    "Enrichment of submission {} finished: {:?}",
                    submission_id, enrichment.state
                ),
                Err(e) => error!(
                    "Failed to store enrichment for submission {}: {}",
                    submission_id, e
                ),
            }
        })
    }
}
