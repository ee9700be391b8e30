// Shared fakes and request helpers for the HTTP integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use hackathon_judge::{
    create_router, AppState, LanguageModel, LlmError, MemoryStore, OcrError, OcrProvider,
    OcrResponse,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const BOUNDARY: &str = "----judge-test-boundary";

/// OCR that "reads" the uploaded bytes as text; `FAIL` makes it error
pub struct EchoOcr;

#[async_trait]
impl OcrProvider for EchoOcr {
    async fn extract(&self, _file_name: &str, bytes: Vec<u8>) -> Result<OcrResponse, OcrError> {
        let text = String::from_utf8_lossy(&bytes).to_string();
        if text == "FAIL" {
            return Err(OcrError::MissingApiKey);
        }
        Ok(OcrResponse {
            text: Some(text),
            ..Default::default()
        })
    }
}

/// Language model that recognises which prompt template it was given
pub struct ScriptedModel;

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        if prompt.contains("hackathon project proposals") {
            let title = prompt
                .lines()
                .rev()
                .find(|l| l.starts_with("TITLE:"))
                .map(|l| l.trim_start_matches("TITLE:").trim().to_string())
                .unwrap_or_else(|| "Untitled".to_string());
            return Ok(format!(
                "{{\"projectTitle\":\"{}\",\"projectSummary\":\"A summary\",\"technicalStack\":[\"Rust\"]}}",
                title
            ));
        }

        if prompt.contains("Transcript:") {
            if prompt.contains("MUMBLE") {
                return Ok("I could not follow that presentation.".to_string());
            }
            let flavour = if prompt.contains("second take") { "Revised" } else { "Clear" };
            return Ok(format!(
                "```json\n{{\"pros\":[\"{} demo\",\"Good pacing\",\"Strong team\"],\"cons\":[\"No tests\",\"Vague roadmap\",\"Thin market data\"],\"suggestedQuestions\":[\"How will it scale?\",\"Who pays?\"]}}\n```",
                flavour
            ));
        }

        if prompt.contains("expert judge") {
            if prompt.contains("Broken Idea") {
                return Err(LlmError::EmptyResponse);
            }
            let score = if prompt.contains("Great Idea") { 91 } else { 64 };
            return Ok(format!(
                "{{\"score\": {}, \"feedback\": \"Scored {}\"}}",
                score, score
            ));
        }

        Err(LlmError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

pub fn test_app() -> Router {
    let model: Arc<dyn LanguageModel> = Arc::new(ScriptedModel);
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(EchoOcr),
        Arc::clone(&model),
        model,
        "http://judge.test/",
    );
    create_router(state)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).to_string())
        })
    };
    (status, body)
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// One multipart field; `file_name` marks it as a file upload
pub struct FormField<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content: &'a [u8],
}

pub fn text_field<'a>(name: &'a str, value: &'a str) -> FormField<'a> {
    FormField {
        name,
        file_name: None,
        content: value.as_bytes(),
    }
}

pub fn file_field<'a>(name: &'a str, file_name: &'a str, content: &'a [u8]) -> FormField<'a> {
    FormField {
        name,
        file_name: Some(file_name),
        content,
    }
}

pub fn multipart_request(uri: &str, fields: &[FormField<'_>]) -> Request<Body> {
    let mut body = Vec::new();
    for field in fields {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match field.file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/pdf\r\n\r\n",
                        field.name, file_name
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", field.name)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(field.content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Create a meeting owned by `user` and return its id
pub async fn create_meeting(app: &Router, user: &str, title: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/meetings",
            serde_json::json!({ "title": title, "agenda": "Final pitches", "participantCount": 4, "userId": user }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {body}");
    body["meeting"]["id"].as_str().unwrap().to_string()
}

/// Submit a document and return the new submission id
pub async fn submit(app: &Router, meeting_id: &str, team: &str, content: &[u8]) -> String {
    let (status, body) = send(
        app,
        multipart_request(
            "/submissions",
            &[
                text_field("teamName", team),
                text_field("meetingId", meeting_id),
                file_field("pdf", "proposal.pdf", content),
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "submit failed: {body}");
    body["submissionId"].as_str().unwrap().to_string()
}

/// Poll the meeting until no submission is still pending enrichment
pub async fn wait_for_enrichment(app: &Router, meeting_id: &str) -> Value {
    for _ in 0..100 {
        let (_, body) = send(app, get(&format!("/meetings/{}", meeting_id))).await;
        let pending = body["meeting"]["submissions"]
            .as_array()
            .map(|subs| subs.iter().any(|s| s["enrichment"]["state"] == "pending"))
            .unwrap_or(false);
        if !pending {
            return body["meeting"].clone();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("enrichment did not finish for meeting {}", meeting_id);
}
