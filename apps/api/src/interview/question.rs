use std::sync::Arc;

use async_trait::async_trait;

use super::transcript::{context_window, TranscriptMessage};
use crate::lifecycle::{CallError, ExternalCall};
use crate::llm_client::{ChatBackend, ChatMessage, ChatRequest, LlmError};

pub const INTERVIEW_SYSTEM: &str = "You are an AI-powered interview bot conducting a structured \
interview. Use previous responses to create progressively deeper questions. Do not repeat the \
same question. If the user expresses uncertainty, simplify the next question.";

pub const INTERVIEW_TEMPERATURE: f32 = 0.5;
pub const INTERVIEW_MAX_TOKENS: u32 = 300;

pub const NO_QUESTION: &str = "I'm sorry, I couldn't generate a question.";

/// Asks the model for the next interview question given the transcript.
#[derive(Clone)]
pub struct InterviewCall {
    llm: Arc<dyn ChatBackend>,
}

impl InterviewCall {
    pub fn new(llm: Arc<dyn ChatBackend>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ExternalCall for InterviewCall {
    type Input = Vec<TranscriptMessage>;
    type Output = String;

    async fn call(&self, transcript: &Vec<TranscriptMessage>) -> Result<String, CallError> {
        let mut messages = vec![ChatMessage::system(INTERVIEW_SYSTEM)];
        messages.extend(context_window(transcript));
        let request = ChatRequest::new(messages, INTERVIEW_TEMPERATURE, INTERVIEW_MAX_TOKENS);

        match self.llm.complete(request).await {
            Ok(text) => Ok(text.trim().to_string()),
            Err(LlmError::EmptyContent) => Ok(NO_QUESTION.to_string()),
            Err(e) => Err(e.into()),
        }
    }
}
