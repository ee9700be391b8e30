use super::super::error::{ApiError, ApiResult};
use super::super::extract::ApiJson;
use super::super::state::AppState;
use crate::evaluator::{leaderboard, SubmissionRef};
use crate::meeting::{update_meeting, MeetingStatus};
use axum::{extract::State, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub transcript: Option<String>,
    pub meeting_id: Option<String>,
    pub submission_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub meeting_id: Option<String>,
    pub submissions: Option<Vec<SubmissionRef>>,
    pub analysis: Option<HashMap<String, Value>>,
}

fn missing_fields() -> ApiError {
    ApiError::BadRequest("Missing required fields".to_string())
}

/// POST /analyze
/// Analyze a presentation transcript and store it under the submission id
pub async fn analyze_presentation(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AnalyzeRequest>,
) -> ApiResult<Json<Value>> {
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
    let (Some(transcript), Some(meeting_id), Some(submission_id)) = (
        non_empty(req.transcript),
        non_empty(req.meeting_id),
        non_empty(req.submission_id),
    ) else {
        return Err(missing_fields());
    };

    if state.store.get(&meeting_id).await?.is_none() {
        return Err(ApiError::meeting_not_found());
    }

    let analysis = state.analyzer.analyze(&transcript).await?;

    let updated = update_meeting(state.store.as_ref(), &meeting_id, |meeting| {
        meeting
            .analysis
            .insert(submission_id.clone(), analysis.clone());
    })
    .await?;

    info!(
        "Stored analysis for submission {} in meeting {}",
        submission_id, meeting_id
    );

    Ok(Json(json!({
        "success": true,
        "analysis": analysis,
        "updatedMeeting": updated,
    })))
}

/// POST /evaluate
/// Score every submission and mark the meeting analyzed
pub async fn evaluate_submissions(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EvaluateRequest>,
) -> ApiResult<Json<Value>> {
    let (Some(meeting_id), Some(submissions), Some(analysis)) =
        (req.meeting_id, req.submissions, req.analysis)
    else {
        return Err(missing_fields());
    };
    if meeting_id.trim().is_empty() || submissions.is_empty() {
        return Err(missing_fields());
    }

    if state.store.get(&meeting_id).await?.is_none() {
        return Err(ApiError::meeting_not_found());
    }

    let evaluations = state.evaluator.evaluate(&submissions, &analysis).await;

    update_meeting(state.store.as_ref(), &meeting_id, |meeting| {
        meeting.status = MeetingStatus::Analyzed;
    })
    .await?;

    info!(
        "Evaluated {} submissions for meeting {}",
        evaluations.len(),
        meeting_id
    );

    let ranked = leaderboard(&evaluations);
    Ok(Json(json!({
        "success": true,
        "evaluations": evaluations,
        "leaderboard": ranked,
    })))
}
