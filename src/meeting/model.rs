use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Idea name shown until the document summary arrives
pub const PLACEHOLDER_IDEA_NAME: &str = "Processing...";

/// Lifecycle of a judging meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    #[default]
    Pending,
    Presented,
    Analyzed,
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MeetingStatus::Pending => "pending",
            MeetingStatus::Presented => "presented",
            MeetingStatus::Analyzed => "analyzed",
        };
        f.write_str(s)
    }
}

impl FromStr for MeetingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MeetingStatus::Pending),
            "presented" => Ok(MeetingStatus::Presented),
            "analyzed" => Ok(MeetingStatus::Analyzed),
            other => Err(format!("Unknown meeting status: {}", other)),
        }
    }
}

/// One judging session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub agenda: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant_count: Option<u32>,
    pub user_id: String,
    pub status: MeetingStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub submissions: Vec<Submission>,
    /// submission id → presentation analysis
    #[serde(default)]
    pub analysis: BTreeMap<String, PresentationAnalysis>,
    /// Revision counter bumped on every successful write
    #[serde(default)]
    pub version: u64,
}

impl Meeting {
    pub fn new(
        title: String,
        agenda: String,
        participant_count: Option<u32>,
        user_id: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            agenda,
            participant_count,
            user_id,
            status: MeetingStatus::Pending,
            created_at: Utc::now(),
            submissions: Vec::new(),
            analysis: BTreeMap::new(),
            version: 0,
        }
    }

    pub fn submission(&self, submission_id: &str) -> Option<&Submission> {
        self.submissions.iter().find(|s| s.id == submission_id)
    }

    pub fn submission_mut(&mut self, submission_id: &str) -> Option<&mut Submission> {
        self.submissions.iter_mut().find(|s| s.id == submission_id)
    }
}

/// One team's uploaded proposal plus its derived summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub team_name: String,
    pub pdf_url: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub submission_info: SubmissionInfo,
    #[serde(default)]
    pub enrichment: Enrichment,
}

impl Submission {
    /// Create a submission carrying the placeholder summary and a pending job
    pub fn placeholder(team_name: String, file_name: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            team_name,
            pdf_url: format!("/uploads/{}-{}", uuid::Uuid::new_v4(), file_name),
            submitted_at: Utc::now(),
            submission_info: SubmissionInfo::placeholder(),
            enrichment: Enrichment::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInfo {
    pub idea_name: String,
    /// Free-form summary object; `{}` while processing
    pub doc_summary: serde_json::Value,
}

impl SubmissionInfo {
    pub fn placeholder() -> Self {
        Self {
            idea_name: PLACEHOLDER_IDEA_NAME.to_string(),
            doc_summary: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.idea_name == PLACEHOLDER_IDEA_NAME
    }
}

impl Default for SubmissionInfo {
    fn default() -> Self {
        Self::placeholder()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentState {
    #[default]
    Pending,
    Done,
    Failed,
}

/// Visible state of the background summarization job
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Enrichment {
    pub state: EnrichmentState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Pros/cons/questions derived from a presentation transcript
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PresentationAnalysis {
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default)]
    pub suggested_questions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meeting_serializes_camel_case() {
        let meeting = Meeting::new("Demo day".into(), "Pitches".into(), Some(4), "u1".into());
        let json = serde_json::to_value(&meeting).unwrap();

        assert_eq!(json["title"], "Demo day");
        assert_eq!(json["participantCount"], 4);
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["status"], "pending");
        assert!(json["submissions"].as_array().unwrap().is_empty());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_placeholder_submission() {
        let submission = Submission::placeholder("Team Rocket".into(), "deck.pdf");

        assert!(submission.submission_info.is_placeholder());
        assert_eq!(submission.submission_info.doc_summary, serde_json::json!({}));
        assert!(submission.pdf_url.starts_with("/uploads/"));
        assert!(submission.pdf_url.ends_with("-deck.pdf"));
        assert_eq!(submission.enrichment.state, EnrichmentState::Pending);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("presented".parse::<MeetingStatus>(), Ok(MeetingStatus::Presented));
        assert!("completed".parse::<MeetingStatus>().is_err());
        assert_eq!(MeetingStatus::Analyzed.to_string(), "analyzed");
    }

    #[test]
    fn test_analysis_keys_are_camel_case() {
        let json = r#"{"pros":["a"],"cons":["b"],"suggestedQuestions":["c?"]}"#;
        let analysis: PresentationAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.suggested_questions, vec!["c?".to_string()]);
    }
}
