pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::career::handlers as career;
use crate::experts::handlers as experts;
use crate::interview::handlers as interview;
use crate::job_market::handlers as job_market;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Career suggestions
        .route(
            "/api/v1/career/suggestions",
            post(career::handle_create_suggestion),
        )
        .route(
            "/api/v1/career/suggestions/:id",
            get(career::handle_get_suggestion)
                .put(career::handle_resubmit_suggestion)
                .delete(career::handle_delete_suggestion),
        )
        .route(
            "/api/v1/career/suggestions/:id/retry",
            post(career::handle_retry_suggestion),
        )
        // Resume analysis
        .route(
            "/api/v1/resume/analyses",
            post(resume::handle_create_analysis)
                .layer(DefaultBodyLimit::max(resume::UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/v1/resume/analyses/:id",
            get(resume::handle_get_analysis).delete(resume::handle_delete_analysis),
        )
        .route(
            "/api/v1/resume/analyses/:id/retry",
            post(resume::handle_retry_analysis),
        )
        // Interview bot
        .route("/api/v1/interview/start", post(interview::handle_start))
        .route("/api/v1/interview/reply", post(interview::handle_reply))
        .route(
            "/api/v1/interview/sessions",
            post(interview::handle_save_session),
        )
        // Job market
        .route(
            "/api/v1/job-market/trends",
            get(job_market::handle_job_trends),
        )
        .route(
            "/api/v1/job-market/skills",
            get(job_market::handle_top_skills),
        )
        .route(
            "/api/v1/job-market/insights",
            get(job_market::handle_industry_insights),
        )
        // Experts and referrals
        .route("/api/v1/experts", post(experts::handle_create_expert))
        .route(
            "/api/v1/experts/search",
            get(experts::handle_search_experts),
        )
        .route(
            "/api/v1/experts/by-user/:user_id",
            get(experts::handle_get_expert_by_user),
        )
        .route(
            "/api/v1/experts/:id",
            get(experts::handle_get_expert).put(experts::handle_update_expert),
        )
        .route(
            "/api/v1/experts/:id/referrals",
            get(experts::handle_expert_referrals),
        )
        .route("/api/v1/referrals", post(experts::handle_create_referral))
        .route(
            "/api/v1/referrals/:id",
            patch(experts::handle_update_referral_status),
        )
        .route(
            "/api/v1/users/:user_id/referrals",
            get(experts::handle_user_referrals),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::config::{Config, FeaturePolicies};
    use crate::llm_client::{ChatBackend, ChatRequest, LlmError};

    /// Answers like the model would, keyed on the system prompt.
    struct FakeModel;

    #[async_trait]
    impl ChatBackend for FakeModel {
        async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
            let system = &request.messages[0].content;
            if system.contains("career advisor") {
                Ok(r#"```json
{"suggestedJobRole": "Data Engineer", "careerPath": "Analyst, then engineer, then lead",
 "certificationsRequired": ["GCP Data Engineer"], "expectedSalary": "$80,000 - $110,000"}
```"#
                    .to_string())
            } else if system.contains("resume expert") {
                Ok(r#"{"strengths": ["Concise"]}"#.to_string())
            } else {
                Ok("Tell me about a project you are proud of.".to_string())
            }
        }
    }

    fn app() -> Router {
        let config = Config {
            database_url: "postgres://localhost/careerpath_test".to_string(),
            groq_api_key: "test-key".to_string(),
            llm_api_url: "http://localhost:1/unused".to_string(),
            llm_model: "test-model".to_string(),
            port: 0,
            rust_log: "info".to_string(),
            policies: FeaturePolicies::default(),
            operation_ttl: Duration::from_secs(900),
        };
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        build_router(AppState::new(db, Arc::new(FakeModel), config))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn career_form() -> Value {
        json!({
            "name": "Alice",
            "age": "25",
            "qualification": "BSc Mathematics",
            "interestedSubjects": "Statistics",
            "industryPreference": "Technology",
            "preferredRole": "technical"
        })
    }

    fn multipart(file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let boundary = "careerpath-test-boundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/resume/analyses")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["operations"]["career"], 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_career_suggestion_is_polled_until_ready() {
        let app = app();
        let (status, body) = send(
            &app,
            json_request(Method::POST, "/api/v1/career/suggestions", career_form()),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["status"], "loading");
        let id = body["id"].as_str().unwrap().to_string();

        tokio::time::sleep(Duration::from_millis(10)).await;

        let (status, body) = send(&app, get_request(&format!("/api/v1/career/suggestions/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["result"]["suggestedJobRole"], "Data Engineer");
        assert_eq!(body["result"]["certificationsRequired"], "GCP Data Engineer");
        assert_eq!(
            body["result"]["expectedSalaryInr"],
            "₹60,00,000 - ₹82,50,000 per annum"
        );

        let delete = Request::builder()
            .method(Method::DELETE)
            .uri(format!("/api/v1/career/suggestions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, delete).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, get_request(&format!("/api/v1/career/suggestions/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_invalid_career_form_never_starts_an_operation() {
        let app = app();
        let mut form = career_form();
        form["age"] = json!("120");

        let (status, body) = send(
            &app,
            json_request(Method::POST, "/api/v1/career/suggestions", form),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(
            body["error"]["message"],
            "Please enter a valid age between 1-99."
        );

        let (_, health) = send(&app, get_request("/health")).await;
        assert_eq!(health["operations"]["career"], 0);
    }

    #[tokio::test]
    async fn test_oversized_resume_gets_size_message() {
        let data = vec![b'a'; 6 * 1024 * 1024];
        let (status, body) = send(&app(), multipart("resume.txt", "text/plain", &data)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "File size should not exceed 5MB");
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_upload_is_analyzed() {
        let app = app();
        let (status, body) = send(
            &app,
            multipart(
                "notes.txt",
                "text/plain",
                b"Education: BSc Physics\nSkills: Python, SQL",
            ),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);
        let id = body["id"].as_str().unwrap().to_string();

        tokio::time::sleep(Duration::from_millis(10)).await;

        let (_, body) = send(&app, get_request(&format!("/api/v1/resume/analyses/{id}"))).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["result"]["strengths"], json!(["Concise"]));
        assert_eq!(body["result"]["recommendedSkills"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_interview_start_appends_first_question() {
        let (status, body) = send(
            &app(),
            json_request(
                Method::POST,
                "/api/v1/interview/start",
                json!({"job_role": "Backend Engineer"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "bot");
        assert_eq!(
            messages[1]["content"],
            "Tell me about a project you are proud of."
        );
    }

    #[tokio::test]
    async fn test_interview_reply_replaces_repeated_question() {
        let (status, body) = send(
            &app(),
            json_request(
                Method::POST,
                "/api/v1/interview/reply",
                json!({
                    "job_role": "Backend Engineer",
                    "messages": [
                        {"role": "bot", "content": "Tell me about a project you are proud of."}
                    ],
                    "answer": "I built a billing service in Rust."
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 3);
        assert_eq!(
            messages[2]["content"],
            "Let's explore another aspect. Can you describe a technical challenge you overcame recently?"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_market_widget_returns_ready_view() {
        let (status, body) = send(&app(), get_request("/api/v1/job-market/insights")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["result"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_referral_status_cannot_go_back_to_pending() {
        let (status, body) = send(
            &app(),
            json_request(
                Method::PATCH,
                &format!("/api/v1/referrals/{}", uuid::Uuid::new_v4()),
                json!({"status": "pending"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "status must be accepted or rejected"
        );
    }
}
