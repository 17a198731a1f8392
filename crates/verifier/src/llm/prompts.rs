pub struct PromptBuilder;

impl PromptBuilder {
    pub fn system_instruction(bug_to_check: &str) -> String {
        format!(
            r#"
You are a JSON-only code verification bot. Respond ONLY with valid JSON.

Task: Check if code changes fix bug `{bug}`.

Steps:
1. Find the bug in Bug Documentation
2. Compare the SOLUTION with Code Changes
3. Ignore whitespace/formatting differences
4. Focus on functional correctness

Response format (JSON ONLY):
- If fixed: {{ "{bug}": "true" }}
- If not fixed: {{ "{bug}": "false" }}

Be lenient on style, strict on logic.
"#,
            bug = bug_to_check
        )
    }

    pub fn user_prompt(bugs_doc: &str, pretty_diff: &str, bug_to_check: &str) -> String {
        format!(
            "Bug Documentation:\n{}\n\nCode Changes:\n{}\n\nCheck bug: {bug}\nResponse (JSON only): {{ \"{bug}\": \"true/false\" }}",
            bugs_doc,
            pretty_diff,
            bug = bug_to_check
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_name_the_bug() {
        let system = PromptBuilder::system_instruction("BUG3");
        assert!(system.contains("{ \"BUG3\": \"true\" }"));

        let user = PromptBuilder::user_prompt("doc", "{}", "BUG3");
        assert!(user.starts_with("Bug Documentation:\ndoc"));
        assert!(user.ends_with("{ \"BUG3\": \"true/false\" }"));
    }
}
