use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Tried in order; the first non-empty capture is the canonical solution.
    static ref SOLUTION_PATTERNS: Vec<Regex> = [
        r"(?is)SOLUTION:\s*```(?:python)?\s*(.*?)\s*```",
        r"(?is)## Solution\s*```(?:python)?\s*(.*?)\s*```",
        r"(?is)Solution:?\s*```(?:python)?\s*(.*?)\s*```",
        r"(?is)Fix:?\s*```(?:python)?\s*(.*?)\s*```",
        r"(?is)SOLUTION:\s*([^\n]+)",
        r"(?is)Solution:?\s*`([^`]+)`",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect();
}

/// Locate the documentation block of `bug_id`.
///
/// `START "<id>": ... END "<id>"` wins, even when empty; otherwise a
/// `#`..`###` heading naming the bug, whose body runs until the next `#`.
pub fn extract_bug_block(bugs_doc: &str, bug_id: &str) -> Option<String> {
    let id = regex::escape(bug_id);

    let delimited = Regex::new(&format!(r#"(?is)START\s+"{id}":\s*(.*?)\s*END\s+"{id}""#)).ok()?;
    if let Some(captures) = delimited.captures(bugs_doc) {
        let block = captures[1].trim();
        return (!block.is_empty()).then(|| block.to_string());
    }

    let heading = Regex::new(&format!(r"(?i)#{{1,3}}\s*{id}[:\s]+")).ok()?;
    let found = heading.find(bugs_doc)?;
    let body = bugs_doc[found.end()..]
        .split('#')
        .next()
        .unwrap_or_default()
        .trim();

    (!body.is_empty()).then(|| body.to_string())
}

/// Pull the canonical solution snippet out of a bug block.
pub fn extract_solution(bug_block: &str) -> Option<String> {
    SOLUTION_PATTERNS.iter().find_map(|pattern| {
        let captures = pattern.captures(bug_block)?;
        let solution = captures[1].trim();
        (!solution.is_empty()).then(|| solution.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
START "bug1":
Bug 1 - Incorrect VADER Threshold
SOLUTION:
```python
if compound >= 0.05:
```
END "bug1"

START "BUG2":
DESCRIPTION: off by one
SOLUTION: for i in range(n + 1):
END "BUG2"
"#;

    #[test]
    fn test_delimited_block_is_found_case_insensitively() {
        let block = extract_bug_block(DOC, "BUG1").unwrap();
        assert!(block.starts_with("Bug 1 - Incorrect VADER Threshold"));
        assert!(!block.contains("BUG2"));
    }

    #[test]
    fn test_markdown_heading_fallback() {
        let doc = "## bug7: Wrong default\nSolution: `retries = 3`\n## bug8: other";
        let block = extract_bug_block(doc, "bug7").unwrap();
        assert_eq!(block, "Wrong default\nSolution: `retries = 3`");
    }

    #[test]
    fn test_missing_block() {
        assert!(extract_bug_block(DOC, "bug3").is_none());
        assert!(extract_bug_block("nothing to see", "bug1").is_none());
    }

    #[test]
    fn test_empty_delimited_block_does_not_fall_back_to_heading() {
        let doc = "START \"BUG1\":\nEND \"BUG1\"\n## BUG1: stale notes\nSOLUTION: x = 1";
        assert!(extract_bug_block(doc, "BUG1").is_none());
    }

    #[test]
    fn test_fenced_solution_wins_over_line() {
        let block = extract_bug_block(DOC, "bug1").unwrap();
        assert_eq!(extract_solution(&block).unwrap(), "if compound >= 0.05:");
    }

    #[test]
    fn test_single_line_solution() {
        let block = extract_bug_block(DOC, "BUG2").unwrap();
        assert_eq!(extract_solution(&block).unwrap(), "for i in range(n + 1):");
    }

    #[test]
    fn test_inline_code_solution() {
        assert_eq!(
            extract_solution("Solution `max_len = 512`").unwrap(),
            "max_len = 512"
        );
    }

    #[test]
    fn test_no_solution() {
        assert!(extract_solution("DESCRIPTION: something is wrong").is_none());
    }
}
