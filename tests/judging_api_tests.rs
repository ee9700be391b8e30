// Integration tests for presentation analysis and final evaluation

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::{json, Value};

async fn analyze(
    app: &axum::Router,
    meeting_id: &str,
    submission_id: &str,
    transcript: &str,
) -> (StatusCode, Value) {
    send(
        app,
        json_request(
            "POST",
            "/analyze",
            json!({ "transcript": transcript, "meetingId": meeting_id, "submissionId": submission_id }),
        ),
    )
    .await
}

#[tokio::test]
async fn test_analysis_is_stored_under_submission() {
    let app = test_app();
    let meeting_id = create_meeting(&app, "u1", "Finals").await;
    let submission_id = submit(&app, &meeting_id, "Team A", b"TITLE: Great Idea").await;

    let (status, body) = analyze(&app, &meeting_id, &submission_id, "We built a thing.").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["analysis"]["pros"][0], "Clear demo");
    assert_eq!(body["analysis"]["cons"].as_array().unwrap().len(), 3);
    assert_eq!(
        body["updatedMeeting"]["analysis"][&submission_id]["suggestedQuestions"][0],
        "How will it scale?"
    );

    let (_, fetched) = send(&app, get(&format!("/meetings/{}", meeting_id))).await;
    assert_eq!(
        fetched["meeting"]["analysis"][&submission_id]["pros"][0],
        "Clear demo"
    );
}

#[tokio::test]
async fn test_reanalysis_replaces_previous_entry() {
    let app = test_app();
    let meeting_id = create_meeting(&app, "u1", "Finals").await;
    let submission_id = submit(&app, &meeting_id, "Team A", b"TITLE: Great Idea").await;

    analyze(&app, &meeting_id, &submission_id, "first attempt").await;
    let (status, _) = analyze(&app, &meeting_id, &submission_id, "second take").await;
    assert_eq!(status, StatusCode::OK);

    let (_, fetched) = send(&app, get(&format!("/meetings/{}", meeting_id))).await;
    let analysis = fetched["meeting"]["analysis"].as_object().unwrap();
    assert_eq!(analysis.len(), 1);
    assert_eq!(analysis[&submission_id]["pros"][0], "Revised demo");
}

#[tokio::test]
async fn test_unparseable_analysis_is_not_stored() {
    let app = test_app();
    let meeting_id = create_meeting(&app, "u1", "Finals").await;
    let submission_id = submit(&app, &meeting_id, "Team A", b"TITLE: Great Idea").await;

    let (status, body) = analyze(&app, &meeting_id, &submission_id, "MUMBLE MUMBLE").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);

    let (_, fetched) = send(&app, get(&format!("/meetings/{}", meeting_id))).await;
    assert!(fetched["meeting"]["analysis"]
        .as_object()
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_analyze_validation_and_missing_meeting() {
    let app = test_app();

    let (status, body) = send(
        &app,
        json_request("POST", "/analyze", json!({ "transcript": "hello", "meetingId": "m" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");

    let (status, body) = analyze(&app, "no-such-meeting", "s1", "hello").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Meeting not found");
}

#[tokio::test]
async fn test_evaluate_scores_every_submission() {
    let app = test_app();
    let meeting_id = create_meeting(&app, "u1", "Finals").await;
    let great = submit(&app, &meeting_id, "Team Great", b"TITLE: Great Idea").await;
    submit(&app, &meeting_id, "Team Fine", b"TITLE: Fine Idea").await;
    submit(&app, &meeting_id, "Team Broken", b"TITLE: Broken Idea").await;

    let meeting = wait_for_enrichment(&app, &meeting_id).await;
    analyze(&app, &meeting_id, &great, "A polished pitch").await;

    let (_, fetched) = send(&app, get(&format!("/meetings/{}", meeting_id))).await;
    let analysis = fetched["meeting"]["analysis"].clone();

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/evaluate",
            json!({
                "meetingId": meeting_id,
                "submissions": meeting["submissions"],
                "analysis": analysis,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let evaluations = body["evaluations"].as_array().unwrap();
    assert_eq!(evaluations.len(), 3);
    for evaluation in evaluations {
        let score = evaluation["score"].as_u64().unwrap();
        assert!(score <= 100);
    }

    let score_of = |team: &str| {
        evaluations
            .iter()
            .find(|e| e["teamName"] == team)
            .map(|e| e["score"].as_u64().unwrap())
            .unwrap()
    };
    assert_eq!(score_of("Team Great"), 91);
    assert_eq!(score_of("Team Fine"), 64);
    assert_eq!(score_of("Team Broken"), 0);

    let broken = evaluations
        .iter()
        .find(|e| e["teamName"] == "Team Broken")
        .unwrap();
    assert_eq!(broken["feedback"], "Error evaluating submission");

    let ranked: Vec<&str> = body["leaderboard"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["teamName"].as_str().unwrap())
        .collect();
    assert_eq!(ranked, vec!["Team Great", "Team Fine", "Team Broken"]);

    let (_, fetched) = send(&app, get(&format!("/meetings/{}", meeting_id))).await;
    assert_eq!(fetched["meeting"]["status"], "analyzed");
}

#[tokio::test]
async fn test_evaluate_rejects_incomplete_requests() {
    let app = test_app();
    let meeting_id = create_meeting(&app, "u1", "Finals").await;

    for body in [
        json!({ "submissions": [{ "teamName": "A" }], "analysis": {} }),
        json!({ "meetingId": meeting_id, "analysis": {} }),
        json!({ "meetingId": meeting_id, "submissions": [{ "teamName": "A" }] }),
        json!({ "meetingId": meeting_id, "submissions": [], "analysis": {} }),
    ] {
        let (status, response) = send(&app, json_request("POST", "/evaluate", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["error"], "Missing required fields");
    }

    let (_, fetched) = send(&app, get(&format!("/meetings/{}", meeting_id))).await;
    assert_eq!(fetched["meeting"]["status"], "pending");
}

#[tokio::test]
async fn test_evaluate_unknown_meeting_is_404() {
    let app = test_app();
    let (status, _) = send(
        &app,
        json_request(
            "POST",
            "/evaluate",
            json!({ "meetingId": "ghost", "submissions": [{ "teamName": "A" }], "analysis": {} }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
