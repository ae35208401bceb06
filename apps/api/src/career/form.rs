use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredRole {
    Management,
    Technical,
}

impl PreferredRole {
    pub fn as_str(self) -> &'static str {
        match self {
            PreferredRole::Management => "management",
            PreferredRole::Technical => "technical",
        }
    }
}

/// The career questionnaire as submitted by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerForm {
    pub name: String,
    pub age: String,
    pub qualification: String,
    pub interested_subjects: String,
    #[serde(default)]
    pub hackathons_attended: String,
    #[serde(default)]
    pub extra_courses_completed: String,
    #[serde(default)]
    pub certifications: String,
    #[serde(default)]
    pub workshops: String,
    pub industry_preference: String,
    pub preferred_role: PreferredRole,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c.is_whitespace() || matches!(c, '.' | '-' | '\'')
}

fn is_qualification_char(c: char) -> bool {
    is_name_char(c) || c == ','
}

impl CareerForm {
    /// Checks the form the way the questionnaire does before submitting.
    /// Returns every problem found, in field order.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.name.chars().count() < 2 {
            problems.push("Name must be at least 2 characters.".to_string());
        } else if !self.name.chars().all(is_name_char) {
            problems.push(
                "Name can only contain letters, spaces, and basic punctuation.".to_string(),
            );
        }

        match self.age.trim().parse::<i64>() {
            Ok(age) if (1..100).contains(&age) => {}
            _ => problems.push("Please enter a valid age between 1-99.".to_string()),
        }

        if self.qualification.chars().count() < 2 {
            problems.push("Please enter your qualification.".to_string());
        } else if !self.qualification.chars().all(is_qualification_char) {
            problems.push(
                "Qualification can only contain letters, spaces, and basic punctuation."
                    .to_string(),
            );
        }

        if self.interested_subjects.chars().count() < 3 {
            problems.push("Please enter at least one subject.".to_string());
        }

        if self.industry_preference.is_empty() {
            problems.push("Please select an industry preference.".to_string());
        }

        problems
    }
}
