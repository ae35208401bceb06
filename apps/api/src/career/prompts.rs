// Career suggestion prompt templates.

use super::form::CareerForm;
use crate::llm_client::prompts::{field_lines, JSON_ONLY_INSTRUCTION};

pub const CAREER_SYSTEM: &str = "You are a career advisor. Always respond with valid JSON.";

pub const CAREER_TEMPERATURE: f32 = 0.7;
pub const CAREER_MAX_TOKENS: u32 = 2048;

const CAREER_PROMPT_TEMPLATE: &str = r#"Based on the following user profile, suggest an appropriate career path:

{profile}

Please provide a JSON response with these fields:
1. suggestedJobRole - A specific job role
2. careerPath - A detailed career progression path
3. certificationsRequired - List 3-5 certifications
4. expectedSalary - Salary range per annum

Format your response as valid JSON:
{
  "suggestedJobRole": "Software Developer",
  "careerPath": "Detailed career path description...",
  "certificationsRequired": "Certification 1, Certification 2",
  "expectedSalary": "$70,000 - $120,000"
}

{json_only}"#;

pub fn career_prompt(form: &CareerForm) -> String {
    let profile = field_lines(&[
        ("Name", form.name.as_str()),
        ("Age", form.age.as_str()),
        ("Qualification", form.qualification.as_str()),
        ("Interested Subjects", form.interested_subjects.as_str()),
        ("Hackathons Attended", form.hackathons_attended.as_str()),
        ("Extra Courses Completed", form.extra_courses_completed.as_str()),
        ("Certifications", form.certifications.as_str()),
        ("Workshops", form.workshops.as_str()),
        ("Industry Preference", form.industry_preference.as_str()),
        ("Preferred Role", form.preferred_role.as_str()),
    ]);

    CAREER_PROMPT_TEMPLATE
        .replace("{profile}", &profile)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::career::form::tests::alice;

    #[test]
    fn test_prompt_lists_every_field() {
        let prompt = career_prompt(&alice());
        assert!(prompt.contains("Name: Alice"));
        assert!(prompt.contains("Age: 25"));
        assert!(prompt.contains("Workshops: Kubernetes 101"));
        assert!(prompt.contains("Preferred Role: technical"));
        assert!(!prompt.contains("{profile}"));
        assert!(!prompt.contains("{json_only}"));
    }
}
