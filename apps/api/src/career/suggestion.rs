use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::form::CareerForm;
use super::prompts::{career_prompt, CAREER_MAX_TOKENS, CAREER_SYSTEM, CAREER_TEMPERATURE};
use super::salary::salary_in_rupees;
use crate::lifecycle::{CallError, ExternalCall};
use crate::llm_client::{ChatBackend, ChatMessage, ChatRequest};
use crate::normalize::{normalize, text_or, FromPayload};

pub const DEFAULT_JOB_ROLE: &str = "Career Specialist";
pub const DEFAULT_CAREER_PATH: &str = "Career path not available";
pub const DEFAULT_CERTIFICATIONS: &str = "Certifications not available";
pub const DEFAULT_SALARY: &str = "Salary information not available";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerSuggestion {
    pub suggested_job_role: String,
    pub career_path: String,
    pub certifications_required: String,
    pub expected_salary: String,
}

impl FromPayload for CareerSuggestion {
    fn from_payload(payload: &Map<String, Value>) -> Self {
        Self {
            suggested_job_role: text_or(payload, "suggestedJobRole", DEFAULT_JOB_ROLE),
            career_path: text_or(payload, "careerPath", DEFAULT_CAREER_PATH),
            certifications_required: text_or(
                payload,
                "certificationsRequired",
                DEFAULT_CERTIFICATIONS,
            ),
            expected_salary: text_or(payload, "expectedSalary", DEFAULT_SALARY),
        }
    }
}

/// A suggestion as displayed, with the salary also shown in rupees.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerSuggestionDisplay {
    #[serde(flatten)]
    pub suggestion: CareerSuggestion,
    pub expected_salary_inr: String,
}

impl From<CareerSuggestion> for CareerSuggestionDisplay {
    fn from(suggestion: CareerSuggestion) -> Self {
        let expected_salary_inr = salary_in_rupees(&suggestion.expected_salary);
        Self {
            suggestion,
            expected_salary_inr,
        }
    }
}

/// Asks the model for a career suggestion for one questionnaire.
#[derive(Clone)]
pub struct CareerSuggestionCall {
    llm: Arc<dyn ChatBackend>,
}

impl CareerSuggestionCall {
    pub fn new(llm: Arc<dyn ChatBackend>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ExternalCall for CareerSuggestionCall {
    type Input = CareerForm;
    type Output = CareerSuggestion;

    async fn call(&self, form: &CareerForm) -> Result<CareerSuggestion, CallError> {
        let request = ChatRequest::new(
            vec![
                ChatMessage::system(CAREER_SYSTEM),
                ChatMessage::user(career_prompt(form)),
            ],
            CAREER_TEMPERATURE,
            CAREER_MAX_TOKENS,
        );

        let text = self.llm.complete(request).await?;
        Ok(normalize::<CareerSuggestion>(&text)?)
    }
}
