use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use super::upload::ResumeUpload;
use crate::lifecycle::{CallError, ExternalCall};
use crate::llm_client::{ChatBackend, ChatMessage, ChatRequest};
use crate::normalize::{list_or, normalize, text_or, FromPayload};

pub const RESUME_SYSTEM: &str = "You are a career counselor and resume expert. Analyze the resume \
content and provide structured feedback in JSON format. Do not include any extra text before or \
after the JSON output.";

pub const RESUME_TEMPERATURE: f32 = 0.7;
pub const RESUME_MAX_TOKENS: u32 = 1000;

/// Characters of resume content sent to the model.
pub const MAX_PROMPT_CHARS: usize = 5000;

const RESUME_PROMPT_TEMPLATE: &str = r#"Analyze this resume:
{content}

Return a valid JSON with the following fields:
{
  "strengths": ["strength1", "strength2", "strength3"],
  "weaknesses": ["weakness1", "weakness2", "weakness3"],
  "improvementSuggestions": ["suggestion1", "suggestion2", "suggestion3"],
  "recommendedSkills": ["skill1", "skill2", "skill3"],
  "careerPathRecommendation": "A detailed career path recommendation."
}"#;

const DEFAULT_STRENGTHS: &[&str] = &[
    "Strong educational background",
    "Relevant experience",
    "Technical skills",
];
const DEFAULT_WEAKNESSES: &[&str] = &[
    "Resume formatting could be improved",
    "Lack of quantifiable achievements",
];
const DEFAULT_SUGGESTIONS: &[&str] = &["Add measurable achievements", "Improve formatting"];
const DEFAULT_SKILLS: &[&str] = &["Project Management", "Data Analysis", "Communication"];
const DEFAULT_CAREER_PATH: &str =
    "Consider focusing on roles that leverage your strengths while developing complementary skills.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeFeedback {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvement_suggestions: Vec<String>,
    pub recommended_skills: Vec<String>,
    pub career_path_recommendation: String,
}

impl FromPayload for ResumeFeedback {
    fn from_payload(payload: &Map<String, Value>) -> Self {
        Self {
            strengths: list_or(payload, "strengths", DEFAULT_STRENGTHS),
            weaknesses: list_or(payload, "weaknesses", DEFAULT_WEAKNESSES),
            improvement_suggestions: list_or(
                payload,
                "improvementSuggestions",
                DEFAULT_SUGGESTIONS,
            ),
            recommended_skills: list_or(payload, "recommendedSkills", DEFAULT_SKILLS),
            career_path_recommendation: text_or(
                payload,
                "careerPathRecommendation",
                DEFAULT_CAREER_PATH,
            ),
        }
    }
}

/// What an analysis keeps of an upload: its name and the excerpt that goes
/// into the prompt.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub file_name: String,
    pub excerpt: String,
    /// When set, a successful analysis is saved for this user.
    pub user_id: Option<Uuid>,
}

impl AnalysisRequest {
    pub fn new(upload: ResumeUpload, user_id: Option<Uuid>) -> Self {
        Self {
            excerpt: excerpt(upload.content.as_str()),
            file_name: upload.file_name,
            user_id,
        }
    }
}

fn excerpt(content: &str) -> String {
    content.chars().take(MAX_PROMPT_CHARS).collect()
}

pub fn resume_prompt(content: &str) -> String {
    RESUME_PROMPT_TEMPLATE.replace("{content}", &excerpt(content))
}

/// Analyzes one uploaded resume and records the analysis for signed-in users.
#[derive(Clone)]
pub struct ResumeAnalysisCall {
    llm: Arc<dyn ChatBackend>,
    db: Option<PgPool>,
}

impl ResumeAnalysisCall {
    pub fn new(llm: Arc<dyn ChatBackend>, db: Option<PgPool>) -> Self {
        Self { llm, db }
    }

    async fn save(&self, user_id: Uuid, file_name: &str, feedback: &ResumeFeedback) {
        let Some(pool) = &self.db else {
            return;
        };

        let result = match serde_json::to_value(feedback) {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not encode resume analysis for storage: {e}");
                return;
            }
        };

        let saved = sqlx::query(
            "INSERT INTO resume_analyses (user_id, file_name, result) VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(file_name)
        .bind(&result)
        .execute(pool)
        .await;

        match saved {
            Ok(_) => info!(%user_id, "resume analysis saved"),
            Err(e) => warn!(%user_id, "Failed to save resume analysis: {e}"),
        }
    }
}

#[async_trait]
impl ExternalCall for ResumeAnalysisCall {
    type Input = AnalysisRequest;
    type Output = ResumeFeedback;

    async fn call(&self, request: &AnalysisRequest) -> Result<ResumeFeedback, CallError> {
        let chat = ChatRequest::new(
            vec![
                ChatMessage::system(RESUME_SYSTEM),
                ChatMessage::user(resume_prompt(&request.excerpt)),
            ],
            RESUME_TEMPERATURE,
            RESUME_MAX_TOKENS,
        );

        let text = self.llm.complete(chat).await?;
        Ok(normalize(&text)?)
    }

    async fn committed(&self, request: &AnalysisRequest, feedback: &ResumeFeedback) {
        if let Some(user_id) = request.user_id {
            self.save(user_id, &request.file_name, feedback).await;
        }
    }
}
