//! Final scoring pass over all submissions

use crate::llm::json::parse_fenced;
use crate::llm::{prompts, LanguageModel, LlmError};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

pub const MAX_SCORE: u32 = 100;
pub const EVALUATION_FAILED_FEEDBACK: &str = "Error evaluating submission";

/// A submission as sent by the judging client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRef {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    pub team_name: String,
    #[serde(default)]
    pub submission_info: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub team_name: String,
    pub score: u32,
    pub feedback: String,
}

impl Evaluation {
    fn failed(team_name: &str) -> Self {
        Self {
            team_name: team_name.to_string(),
            score: 0,
            feedback: EVALUATION_FAILED_FEEDBACK.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScoreReply {
    score: f64,
    feedback: String,
}

/// Sort by score, highest first; equal scores keep submission order
pub fn leaderboard(evaluations: &[Evaluation]) -> Vec<Evaluation> {
    let mut ranked = evaluations.to_vec();
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}

pub struct Evaluator {
    model: Arc<dyn LanguageModel>,
}

impl Evaluator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Score every submission concurrently. The result has one entry per
    /// submission, in input order; failures become zero scores.
    pub async fn evaluate(
        &self,
        submissions: &[SubmissionRef],
        analysis: &HashMap<String, serde_json::Value>,
    ) -> Vec<Evaluation> {
        info!("Evaluating {} submissions", submissions.len());

        let evaluations = join_all(submissions.iter().map(|submission| {
            let judge_analysis = submission
                .id
                .as_ref()
                .and_then(|id| analysis.get(id))
                .cloned()
                .unwrap_or_else(|| serde_json::json!({}));
            self.evaluate_one(submission, judge_analysis)
        }))
        .await;

        let failed = evaluations
            .iter()
            .filter(|e| e.feedback == EVALUATION_FAILED_FEEDBACK)
            .count();
        info!("Evaluation complete ({} failed)", failed);

        evaluations
    }

    async fn evaluate_one(
        &self,
        submission: &SubmissionRef,
        judge_analysis: serde_json::Value,
    ) -> Evaluation {
        match self.score(submission, &judge_analysis).await {
            Ok(reply) => Evaluation {
                team_name: submission.team_name.clone(),
                score: clamp_score(reply.score),
                feedback: reply.feedback,
            },
            Err(e) => {
                error!("Error evaluating submission of {}: {}", submission.team_name, e);
                Evaluation::failed(&submission.team_name)
            }
        }
    }

    async fn score(
        &self,
        submission: &SubmissionRef,
        judge_analysis: &serde_json::Value,
    ) -> Result<ScoreReply, LlmError> {
        let info = serde_json::to_string_pretty(&submission.submission_info)
            .map_err(|e| LlmError::InvalidJson(e.to_string()))?;
        let judged = serde_json::to_string_pretty(judge_analysis)
            .map_err(|e| LlmError::InvalidJson(e.to_string()))?;

        let text = self
            .model
            .generate(&prompts::submission_evaluation(&info, &judged))
            .await?;
        parse_fenced(&text)
    }
}

fn clamp_score(score: f64) -> u32 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, MAX_SCORE as f64) as u32
}
