//! Upload validation and content decoding for resume files.

use base64::{engine::general_purpose::STANDARD, Engine as _};

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub const PDF: &str = "application/pdf";
pub const TEXT: &str = "text/plain";
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub const ACCEPTED_TYPES: [&str; 3] = [PDF, TEXT, DOCX];

const RESUME_KEYWORDS: [&str; 25] = [
    "experience",
    "education",
    "skills",
    "resume",
    "cv",
    "curriculum vitae",
    "work history",
    "job",
    "qualification",
    "employment",
    "projects",
    "professional",
    "certification",
    "objective",
    "summary",
    "career",
    "degree",
    "university",
    "bachelor",
    "master",
    "phd",
    "references",
    "contact",
    "profile",
    "accomplishments",
];

pub const UNSUPPORTED_TYPE: &str = "Please upload a PDF, TXT, or DOCX file";
pub const TOO_LARGE: &str = "File size should not exceed 5MB";
pub const NOT_A_RESUME: &str =
    "The uploaded file does not appear to be a resume. Please upload a valid resume.";
pub const UNREADABLE_TEXT: &str = "The file could not be read as text.";
pub const NEEDS_CONFIRMATION: &str = "This file doesn't appear to be a resume. \
     Resubmit with confirm=true to analyze it as a resume anyway.";

/// What the analysis is sent: readable text, or binary content carried as
/// a data URL without being parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeContent {
    Text(String),
    DataUrl(String),
}

impl ResumeContent {
    pub fn as_str(&self) -> &str {
        match self {
            ResumeContent::Text(text) | ResumeContent::DataUrl(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: String,
    pub content: ResumeContent,
}

pub fn is_resume_content(text: &str) -> bool {
    let lower = text.to_lowercase();
    RESUME_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

fn looks_like_resume_name(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    lower.contains("resume") || lower.contains("cv")
}

/// Checks an uploaded file and decodes it for analysis. The error is the
/// message shown to the user.
///
/// Binary files whose name mentions neither "resume" nor "cv" are only
/// accepted when `confirmed` is set.
pub fn validate_upload(
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
    confirmed: bool,
) -> Result<ResumeUpload, &'static str> {
    if !ACCEPTED_TYPES.contains(&content_type) {
        return Err(UNSUPPORTED_TYPE);
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(TOO_LARGE);
    }

    let content = if content_type == TEXT {
        let text = std::str::from_utf8(bytes).map_err(|_| UNREADABLE_TEXT)?;
        if !is_resume_content(text) {
            return Err(NOT_A_RESUME);
        }
        ResumeContent::Text(text.to_string())
    } else {
        if !confirmed && !looks_like_resume_name(file_name) {
            return Err(NEEDS_CONFIRMATION);
        }
        ResumeContent::DataUrl(format!("data:{content_type};base64,{}", STANDARD.encode(bytes)))
    };

    Ok(ResumeUpload {
        file_name: file_name.to_string(),
        content_type: content_type.to_string(),
        content,
    })
}
