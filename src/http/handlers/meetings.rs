use super::super::error::{ApiError, ApiResult};
use super::super::extract::ApiJson;
use super::super::identity::UserIdentity;
use super::super::state::AppState;
use crate::meeting::{update_meeting, Meeting, MeetingStatus, Submission};
use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetingRequest {
    pub title: Option<String>,
    pub agenda: Option<String>,
    /// Number or numeric string
    pub participant_count: Option<Value>,
    /// Fallback identity when no `x-user-id` header is sent
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeetingsQuery {
    pub user_id: Option<String>,
}

/// Partial update; absent or null fields are left untouched
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeetingRequest {
    pub title: Option<String>,
    pub agenda: Option<String>,
    /// Same forms as on create
    pub participant_count: Option<Value>,
    pub status: Option<String>,
    pub submissions: Option<Vec<Submission>>,
    /// When set, the update only applies if the stored version matches
    pub version: Option<u64>,
}

/// A meeting plus the link teams use to submit
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingView {
    #[serde(flatten)]
    pub meeting: Meeting,
    pub submission_link: String,
}

impl MeetingView {
    fn new(state: &AppState, meeting: Meeting) -> Self {
        let submission_link = state.submission_link(&meeting.id);
        Self {
            meeting,
            submission_link,
        }
    }
}

/// Participant count as sent by the form: a number or a numeric string.
/// Anything absent, unparseable or zero counts as one participant.
pub fn participant_count(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64)),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n > 0 => u32::try_from(n).unwrap_or(u32::MAX),
        _ => 1,
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /meetings
pub async fn create_meeting(
    State(state): State<AppState>,
    identity: Option<UserIdentity>,
    ApiJson(req): ApiJson<CreateMeetingRequest>,
) -> ApiResult<Json<Value>> {
    let (title, agenda) = match (required(req.title), required(req.agenda)) {
        (Some(title), Some(agenda)) => (title, agenda),
        _ => {
            return Err(ApiError::BadRequest(
                "Title and agenda are required".to_string(),
            ))
        }
    };

    let user_id = identity
        .map(|UserIdentity(id)| id)
        .or_else(|| required(req.user_id))
        .ok_or_else(|| ApiError::BadRequest("User identity is required".to_string()))?;

    let meeting = Meeting::new(
        title,
        agenda,
        Some(participant_count(req.participant_count.as_ref())),
        user_id,
    );
    let meeting = state.store.insert(meeting).await?;

    info!("Created meeting {} for user {}", meeting.id, meeting.user_id);

    Ok(Json(json!({
        "success": true,
        "meeting": MeetingView::new(&state, meeting),
    })))
}

/// GET /meetings?userId=
pub async fn list_meetings(
    State(state): State<AppState>,
    identity: Option<UserIdentity>,
    Query(query): Query<ListMeetingsQuery>,
) -> ApiResult<Json<Value>> {
    let user_id = identity
        .map(|UserIdentity(id)| id)
        .or_else(|| required(query.user_id));

    let meetings: Vec<MeetingView> = state
        .store
        .list(user_id.as_deref())
        .await?
        .into_iter()
        .map(|m| MeetingView::new(&state, m))
        .collect();

    Ok(Json(json!({ "success": true, "meetings": meetings })))
}

/// GET /meetings/:id
pub async fn get_meeting(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let meeting = state
        .store
        .get(&id)
        .await?
        .ok_or_else(ApiError::meeting_not_found)?;

    Ok(Json(json!({ "success": true, "meeting": meeting })))
}

/// PUT /meetings/:id
pub async fn update_meeting_fields(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateMeetingRequest>,
) -> ApiResult<Json<Value>> {
    if req.title.as_deref().is_some_and(|t| t.trim().is_empty())
        || req.agenda.as_deref().is_some_and(|a| a.trim().is_empty())
    {
        return Err(ApiError::BadRequest(
            "Title and agenda cannot be empty".to_string(),
        ));
    }
    let status = req
        .status
        .as_deref()
        .map(str::parse::<MeetingStatus>)
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let apply = |meeting: &mut Meeting| {
        if let Some(title) = &req.title {
            meeting.title = title.clone();
        }
        if let Some(agenda) = &req.agenda {
            meeting.agenda = agenda.clone();
        }
        if let Some(count) = &req.participant_count {
            meeting.participant_count = Some(participant_count(Some(count)));
        }
        if let Some(status) = status {
            meeting.status = status;
        }
        if let Some(submissions) = &req.submissions {
            meeting.submissions = submissions.clone();
        }
    };

    let meeting = match req.version {
        Some(version) => {
            let mut meeting = state
                .store
                .get(&id)
                .await?
                .ok_or_else(ApiError::meeting_not_found)?;
            meeting.version = version;
            apply(&mut meeting);
            state.store.replace(meeting).await?
        }
        None => update_meeting(state.store.as_ref(), &id, apply).await?,
    };

    info!("Updated meeting {} (version {})", meeting.id, meeting.version);

    Ok(Json(json!({ "success": true, "meeting": meeting })))
}

/// DELETE /meetings/:id
pub async fn delete_meeting(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if !state.store.delete(&id).await? {
        return Err(ApiError::meeting_not_found());
    }

    info!("Deleted meeting {}", id);

    Ok(Json(json!({
        "success": true,
        "message": "Meeting deleted successfully",
    })))
}
