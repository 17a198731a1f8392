use axum::Router;
use tower_http::cors::CorsLayer;

use crate::features::{health, leaderboard, submissions, teams, webhook};
use crate::middleware::auth::ApiKeys;
use crate::state::AppState;

pub fn router(state: AppState, api_keys: ApiKeys) -> Router {
    Router::new()
        .nest("/webhook", webhook::routes::routes())
        .nest("/verify", submissions::routes::routes(api_keys))
        .nest("/leaderboard", leaderboard::routes::routes())
        .nest("/team", teams::routes::routes())
        .nest("/health", health::routes::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use storage::{
        FileStore,
        models::{BugDescription, FileChange, Hunk, VerificationMethod},
        services::accounting::Accountant,
    };
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;
    use crate::clients::{DiffSource, GatewayVerdict, IssueTracker, VerificationBackend};
    use crate::config::PointsPolicy;

    struct FixedDiff(Option<Vec<FileChange>>);

    #[async_trait]
    impl DiffSource for FixedDiff {
        async fn code_changes(&self, _: &str, _: &str) -> Option<Vec<FileChange>> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct RecordingIssues {
        reopened: Mutex<Vec<(String, u32, String)>>,
    }

    #[async_trait]
    impl IssueTracker for RecordingIssues {
        async fn label_points(&self, _: &str, _: u32) -> u32 {
            15
        }

        async fn reopen_bug(&self, repo: &str, bug_id: u32, reason: &str) -> bool {
            self.reopened
                .lock()
                .unwrap()
                .push((repo.to_string(), bug_id, reason.to_string()));
            true
        }
    }

    struct FixedVerdict(bool);

    #[async_trait]
    impl VerificationBackend for FixedVerdict {
        async fn verify(&self, _: &[FileChange], bug: &BugDescription) -> GatewayVerdict {
            GatewayVerdict {
                response: format!(r#"{{"BUG{}": "{}"}}"#, bug.id, self.0),
                method: VerificationMethod::Deterministic,
            }
        }
    }

    struct Harness {
        _dir: TempDir,
        issues: Arc<RecordingIssues>,
        store: FileStore,
        app: Router,
    }

    fn changes() -> Vec<FileChange> {
        vec![FileChange {
            filename: "app/sentiment.py".to_string(),
            changes: vec![Hunk {
                added: vec!["if compound >= 0.05:".to_string()],
                removed: vec!["if compound > 0.5:".to_string()],
            }],
        }]
    }

    async fn write_catalog(domains_dir: &Path) {
        let nlp = domains_dir.join("nlp");
        tokio::fs::create_dir_all(&nlp).await.unwrap();
        let catalog = json!([
            {"id": 3, "description": "VADER threshold", "files": ["app/sentiment.py"], "solution": "if compound >= 0.05:"}
        ]);
        tokio::fs::write(nlp.join("bugs.json"), catalog.to_string())
            .await
            .unwrap();
    }

    async fn harness(diff: Option<Vec<FileChange>>, verified: bool, policy: PointsPolicy, keys: &str) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("data"));
        store.init().await.unwrap();

        let domains_dir = dir.path().join("domains");
        write_catalog(&domains_dir).await;

        let issues = Arc::new(RecordingIssues::default());
        let state = AppState {
            accountant: Accountant::new(store.clone(), None),
            diffs: Arc::new(FixedDiff(diff)),
            issues: issues.clone(),
            verifier: Arc::new(FixedVerdict(verified)),
            domains_dir,
            points_policy: policy,
            reopen_on_failure: true,
        };

        Harness {
            _dir: dir,
            issues,
            store,
            app: router(state, ApiKeys::from_comma_separated(keys)),
        }
    }

    fn push(repo: &str, messages: &[&str]) -> Value {
        let commits: Vec<Value> = messages
            .iter()
            .enumerate()
            .map(|(i, message)| json!({"id": format!("abc{}", i), "message": message}))
            .collect();

        json!({
            "repository": {"name": repo, "full_name": format!("hackathon/{}", repo)},
            "commits": commits
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn webhook(event: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/webhook/github")
            .header("X-GitHub-Event", event)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_push_records_one_verified_submission() {
        let h = harness(Some(changes()), true, PointsPolicy::Fixed(10), "").await;

        let (status, body) = send(&h.app, webhook("push", push("team-7-nlp", &["fix bug#3", "tidy imports"]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "processed", "team_id": "7", "commits_processed": 1}));

        let (status, progress) = send(&h.app, get("/team/7")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(progress["total_submissions"], 1);
        assert_eq!(progress["total_points"], 10);
        assert_eq!(progress["domain"], "nlp");
        assert_eq!(progress["submissions"][0]["bug_id"], 3);
        assert_eq!(progress["submissions"][0]["repository"], "hackathon/team-7-nlp");

        let (_, leaderboard) = send(&h.app, get("/leaderboard")).await;
        assert_eq!(leaderboard[0]["team_id"], "7");
        assert_eq!(leaderboard[0]["rank"], 1);

        assert!(h.issues.reopened.lock().unwrap().is_empty());
        assert!(h.store.submission_path("7", 3).unwrap().exists());
    }

    #[tokio::test]
    async fn test_rejected_fix_scores_zero_and_reopens_issue() {
        let h = harness(Some(changes()), false, PointsPolicy::Fixed(10), "").await;

        send(&h.app, webhook("push", push("team-7-nlp", &["fix bug#3"]))).await;

        let (_, progress) = send(&h.app, get("/team/7")).await;
        assert_eq!(progress["total_points"], 0);
        assert_eq!(progress["submissions"][0]["verified"], false);

        let reopened = h.issues.reopened.lock().unwrap();
        assert_eq!(
            reopened.as_slice(),
            [("hackathon/team-7-nlp".to_string(), 3, "deterministic".to_string())]
        );
    }

    #[tokio::test]
    async fn test_missing_diff_is_recorded_unverified() {
        let h = harness(None, true, PointsPolicy::Fixed(10), "").await;

        send(&h.app, webhook("push", push("team-7-nlp", &["bug 3"]))).await;

        let (_, progress) = send(&h.app, get("/team/7")).await;
        let submission = &progress["submissions"][0];
        assert_eq!(submission["code_changes"], Value::Null);
        assert_eq!(submission["llm_verification"], "pending");
        assert_eq!(submission["verification_method"], "none");

        let reopened = h.issues.reopened.lock().unwrap();
        assert_eq!(reopened[0].2, "no code changes");
    }

    #[tokio::test]
    async fn test_ignored_and_rejected_payloads() {
        let h = harness(Some(changes()), true, PointsPolicy::Fixed(10), "").await;

        let (status, body) = send(&h.app, webhook("pull_request", push("team-7-nlp", &["fix bug#3"]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reason"], "not a push event");

        let (status, body) = send(&h.app, webhook("push", push("random-repo", &["fix bug#3"]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ignored", "reason": "not a team repo"}));

        let (status, body) = send(&h.app, webhook("push", push("team-7", &[]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid team repo name format");

        let (status, body) = send(&h.app, webhook("push", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Empty payload");

        let (status, body) = send(&h.app, webhook("push", json!({"commits": []}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No repository name");

        assert!(!h.store.teams_dir().join("7").exists());
    }

    #[tokio::test]
    async fn test_form_encoded_push() {
        let h = harness(Some(changes()), true, PointsPolicy::Fixed(10), "").await;
        let form = serde_urlencoded::to_string([("payload", push("team-9-nlp", &["Fix #3"]).to_string())]).unwrap();

        let request = Request::builder()
            .method("POST")
            .uri("/webhook/github")
            .header("X-GitHub-Event", "push")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();

        let (status, body) = send(&h.app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["commits_processed"], 1);
    }

    #[tokio::test]
    async fn test_team_lookup() {
        let h = harness(Some(changes()), true, PointsPolicy::Fixed(10), "").await;

        let (status, body) = send(&h.app, get("/team/ghost")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Team not found");

        let (status, _) = send(&h.app, get("/team/..")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_leaderboard_and_health() {
        let h = harness(None, false, PointsPolicy::Fixed(10), "").await;

        let (status, body) = send(&h.app, get("/leaderboard")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (_, body) = send(&h.app, get("/health")).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["mongodb"], "disconnected");
    }

    #[tokio::test]
    async fn test_reverify_recomputes_points_and_requires_key() {
        let h = harness(Some(changes()), true, PointsPolicy::Labels, "secret").await;
        send(&h.app, webhook("push", push("team-7-nlp", &["fix bug#3"]))).await;

        let unauthenticated = Request::builder()
            .method("POST")
            .uri("/verify/7/3")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&h.app, unauthenticated).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let authed = |uri: &str| {
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Authorization", "Bearer secret")
                .body(Body::empty())
                .unwrap()
        };

        let (status, body) = send(&h.app, authed("/verify/7/3")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["verified"], true);
        assert_eq!(body["method"], "deterministic");
        assert_eq!(body["message"], "Bug #3 re-verified successfully");

        let (_, progress) = send(&h.app, get("/team/7")).await;
        assert_eq!(progress["total_points"], 15);

        let (status, body) = send(&h.app, authed("/verify/7/4")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Bug submission not found");
    }

    #[tokio::test]
    async fn test_reverify_without_changes_is_bad_request() {
        let h = harness(None, true, PointsPolicy::Fixed(10), "").await;
        send(&h.app, webhook("push", push("team-7-nlp", &["fix bug#3"]))).await;

        let request = Request::builder()
            .method("POST")
            .uri("/verify/7/3")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&h.app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No code changes or bug description available");
    }
}
