//! Interview transcripts and the window of them sent to the model.

use serde::{Deserialize, Serialize};

use crate::llm_client::ChatMessage;

/// Messages of the transcript sent with each question request.
pub const CONTEXT_WINDOW: usize = 5;
/// Characters kept from each message in the window.
pub const MAX_MESSAGE_CHARS: usize = 500;
/// Bot messages a new question must not repeat.
pub const REPEAT_LOOKBACK: usize = 3;

pub const REPEAT_REPLACEMENT: &str =
    "Let's explore another aspect. Can you describe a technical challenge you overcame recently?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub role: Speaker,
    pub content: String,
}

impl TranscriptMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Speaker::User,
            content: content.into(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: Speaker::Bot,
            content: content.into(),
        }
    }
}

pub fn opening_message(job_role: &str) -> TranscriptMessage {
    TranscriptMessage::bot(format!(
        "I'll be interviewing you for the {job_role} position. Let's begin..."
    ))
}

/// The request that asks for the first question.
pub fn kickoff_message(job_role: &str) -> TranscriptMessage {
    TranscriptMessage::user(format!(
        "The user wants to be interviewed for the {job_role} role."
    ))
}

fn clip(content: &str) -> String {
    if content.chars().count() > MAX_MESSAGE_CHARS {
        let head: String = content.chars().take(MAX_MESSAGE_CHARS).collect();
        format!("{head}...")
    } else {
        content.to_string()
    }
}

/// The last `CONTEXT_WINDOW` messages as chat messages, bot turns sent as
/// the assistant and long turns clipped.
pub fn context_window(transcript: &[TranscriptMessage]) -> Vec<ChatMessage> {
    let start = transcript.len().saturating_sub(CONTEXT_WINDOW);
    transcript[start..]
        .iter()
        .map(|message| match message.role {
            Speaker::User => ChatMessage::user(clip(&message.content)),
            Speaker::Bot => ChatMessage::assistant(clip(&message.content)),
        })
        .collect()
}

/// Replaces `question` when it repeats one of the recent bot messages.
pub fn avoid_repeat(question: String, transcript: &[TranscriptMessage]) -> String {
    let repeated = transcript
        .iter()
        .rev()
        .filter(|message| message.role == Speaker::Bot)
        .take(REPEAT_LOOKBACK)
        .any(|message| message.content == question);

    if repeated {
        REPEAT_REPLACEMENT.to_string()
    } else {
        question
    }
}
