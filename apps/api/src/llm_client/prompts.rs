// Shared prompt fragments.
// Each feature that calls the LLM keeps its own prompts.rs alongside it;
// this file only holds cross-cutting pieces.

/// Appended to prompts that expect a structured answer.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Return a valid JSON object only. \
    Do not include any extra text before or after the JSON output.";

/// Renders `key: value` lines for a prompt, one per field.
pub fn field_lines(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lines_keeps_order() {
        let rendered = field_lines(&[("Name", "Alice"), ("Age", "25")]);
        assert_eq!(rendered, "Name: Alice\nAge: 25");
    }
}
