use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const ANONYMOUS_REQUESTER: &str = "Anonymous User";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IndustryExpert {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub organization: String,
    pub role: String,
    pub bio: Option<String>,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferralStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ReferralStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReferralStatus::Pending => "pending",
            ReferralStatus::Accepted => "accepted",
            ReferralStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ReferralStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReferralRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expert_id: Uuid,
    pub resume_url: String,
    pub request_message: String,
    pub target_role: String,
    pub status: String,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Requester's display name; only filled in on an expert's inbox.
    #[sqlx(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Inputs
// ────────────────────────────────────────────────────────────────────────────

fn available() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewExpert {
    pub user_id: Uuid,
    pub name: String,
    pub organization: String,
    pub role: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default = "available")]
    pub is_available: bool,
}

/// Partial profile update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpertUpdate {
    pub name: Option<String>,
    pub organization: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpertSearchParams {
    pub organization: Option<String>,
    pub role: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewReferral {
    pub user_id: Uuid,
    pub expert_id: Uuid,
    pub resume_url: String,
    pub request_message: String,
    pub target_role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: ReferralStatus,
    #[serde(default)]
    pub feedback: Option<String>,
}

fn blank_fields<'a>(fields: &[(&'a str, &str)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect()
}

fn require(fields: &[(&str, &str)]) -> Result<(), String> {
    let missing = blank_fields(fields);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!("{} cannot be empty", missing.join(", ")))
    }
}

impl NewExpert {
    pub fn validate(&self) -> Result<(), String> {
        require(&[
            ("name", self.name.as_str()),
            ("organization", self.organization.as_str()),
            ("role", self.role.as_str()),
        ])
    }
}

impl ExpertUpdate {
    pub fn validate(&self) -> Result<(), String> {
        require(&[
            ("name", self.name.as_deref().unwrap_or("-")),
            ("organization", self.organization.as_deref().unwrap_or("-")),
            ("role", self.role.as_deref().unwrap_or("-")),
        ])
    }
}

impl NewReferral {
    pub fn validate(&self) -> Result<(), String> {
        require(&[
            ("resume_url", self.resume_url.as_str()),
            ("request_message", self.request_message.as_str()),
            ("target_role", self.target_role.as_str()),
        ])
    }
}

impl StatusUpdate {
    /// Experts answer a request; they cannot put it back to pending.
    pub fn validate(&self) -> Result<(), String> {
        if self.status == ReferralStatus::Pending {
            return Err("status must be accepted or rejected".to_string());
        }
        Ok(())
    }

    /// Feedback to store, if any. Blank feedback leaves the stored value.
    pub fn feedback(&self) -> Option<&str> {
        self.feedback
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }
}

/// `%term%` for a case-insensitive substring match, with LIKE wildcards in
/// the term escaped. Blank terms give `None` (no filter).
pub fn like_pattern(term: Option<&str>) -> Option<String> {
    let term = term?.trim();
    if term.is_empty() {
        return None;
    }

    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}

/// Fills in requester names, falling back to "Anonymous User" for users
/// without a named profile.
pub fn attach_requester_names(
    requests: Vec<ReferralRequest>,
    names: &HashMap<Uuid, String>,
) -> Vec<ReferralRequest> {
    requests
        .into_iter()
        .map(|mut request| {
            let name = names
                .get(&request.user_id)
                .map(String::as_str)
                .filter(|n| !n.trim().is_empty())
                .unwrap_or(ANONYMOUS_REQUESTER);
            request.user_name = Some(name.to_string());
            request
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn referral(user_id: Uuid) -> ReferralRequest {
        ReferralRequest {
            id: Uuid::new_v4(),
            user_id,
            expert_id: Uuid::new_v4(),
            resume_url: "https://example.com/cv.pdf".to_string(),
            request_message: "Would you refer me?".to_string(),
            target_role: "Backend Engineer".to_string(),
            status: ReferralStatus::Pending.to_string(),
            feedback: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            user_name: None,
        }
    }

    #[test]
    fn test_like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern(Some("Acme")), Some("%Acme%".to_string()));
        assert_eq!(like_pattern(Some("  rust  ")), Some("%rust%".to_string()));
        assert_eq!(
            like_pattern(Some("100%_off\\")),
            Some("%100\\%\\_off\\\\%".to_string())
        );
        assert_eq!(like_pattern(Some("   ")), None);
        assert_eq!(like_pattern(None), None);
    }

    #[test]
    fn test_requester_names_default_to_anonymous() {
        let known = Uuid::new_v4();
        let unnamed = Uuid::new_v4();
        let unknown = Uuid::new_v4();
        let names = HashMap::from([(known, "Priya".to_string()), (unnamed, String::new())]);

        let annotated = attach_requester_names(
            vec![referral(known), referral(unnamed), referral(unknown)],
            &names,
        );
        let names: Vec<_> = annotated
            .iter()
            .map(|r| r.user_name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["Priya", "Anonymous User", "Anonymous User"]);
    }

    #[test]
    fn test_status_update_rules() {
        let update = StatusUpdate {
            status: ReferralStatus::Pending,
            feedback: None,
        };
        assert!(update.validate().is_err());

        let update: StatusUpdate =
            serde_json::from_str(r#"{"status": "accepted", "feedback": "  "}"#).unwrap();
        assert!(update.validate().is_ok());
        assert_eq!(update.feedback(), None);
    }

    #[test]
    fn test_stored_status_text_matches_wire_format() {
        for status in [
            ReferralStatus::Pending,
            ReferralStatus::Accepted,
            ReferralStatus::Rejected,
        ] {
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                serde_json::json!(status.as_str())
            );
        }
    }

    #[test]
    fn test_new_expert_requires_core_fields() {
        let expert: NewExpert = serde_json::from_value(serde_json::json!({
            "user_id": Uuid::new_v4(),
            "name": "Dana",
            "organization": " ",
            "role": ""
        }))
        .unwrap();
        assert!(expert.is_available);
        assert_eq!(
            expert.validate(),
            Err("organization, role cannot be empty".to_string())
        );
    }

    #[test]
    fn test_update_only_checks_present_fields() {
        assert!(ExpertUpdate::default().validate().is_ok());
        let update = ExpertUpdate {
            name: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(update.validate(), Err("name cannot be empty".to_string()));
    }
}
