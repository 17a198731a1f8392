use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LINE_COMMENT: Regex = Regex::new(r"(?m)#.*$").unwrap();
    static ref DOUBLE_QUOTED_BLOCK: Regex = Regex::new(r##"(?s)""".*?""""##).unwrap();
    static ref SINGLE_QUOTED_BLOCK: Regex = Regex::new(r"(?s)'''.*?'''").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref QUOTES: Regex = Regex::new(r#"["']"#).unwrap();
    static ref TOKEN: Regex = Regex::new(r"[a-zA-Z_][a-zA-Z0-9_]*|[><=!]+|[+\-*/]").unwrap();
    static ref COMPARISON: Regex = Regex::new(r"([><=!]+)\s*([0-9.]+)").unwrap();
}

/// Share of solution tokens (in fifths) that must appear in the diff.
const OVERLAP_NUMERATOR: usize = 4;
const OVERLAP_DENOMINATOR: usize = 5;

pub fn strip_comments(code: &str) -> String {
    let code = LINE_COMMENT.replace_all(code, "");
    let code = DOUBLE_QUOTED_BLOCK.replace_all(&code, "");
    SINGLE_QUOTED_BLOCK.replace_all(&code, "").into_owned()
}

/// Comment-free, whitespace-free, lowercase, quote-free rendering of `code`.
pub fn normalize(code: &str) -> String {
    let code = strip_comments(code);
    let code = WHITESPACE.replace_all(&code, "").to_lowercase();
    QUOTES.replace_all(&code, "").into_owned()
}

/// Identifier and operator tokens longer than one character, taken from the
/// normalized text. Whitespace is already gone, so `if x` is one token.
fn tokens(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    TOKEN
        .find_iter(&normalized)
        .map(|token| token.as_str())
        .filter(|token| token.len() > 1)
        .map(str::to_string)
        .collect()
}

/// At least 80% of the solution's tokens occur among the code's tokens.
pub fn token_overlap(solution: &str, code: &str) -> bool {
    let solution_tokens = tokens(solution);
    if solution_tokens.is_empty() {
        return false;
    }

    let code_tokens: HashSet<String> = tokens(code).into_iter().collect();
    let matches = solution_tokens
        .iter()
        .filter(|token| code_tokens.contains(*token))
        .count();

    matches * OVERLAP_DENOMINATOR >= solution_tokens.len() * OVERLAP_NUMERATOR
}

/// Every `<op><number>` comparison in the solution appears in the code.
/// False when the solution has no such comparison.
pub fn comparisons_present(solution: &str, code: &str) -> bool {
    let mut found_any = false;

    for captures in COMPARISON.captures_iter(solution) {
        found_any = true;
        let pattern = format!(
            r"{}\s*{}",
            regex::escape(&captures[1]),
            regex::escape(&captures[2])
        );
        let present = Regex::new(&pattern)
            .map(|re| re.is_match(code))
            .unwrap_or(false);
        if !present {
            return false;
        }
    }

    found_any
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_comments_whitespace_case_and_quotes() {
        let code = "if Label == 'POS':  # keep\n    return \"yes\"\n\"\"\"doc\"\"\"";
        assert_eq!(normalize(code), "iflabel==pos:returnyes");
    }

    #[test]
    fn test_token_overlap_ignores_formatting() {
        let solution = "result = normalize_scores(raw_scores, axis)";
        let code = "# patched\nresult   =   NORMALIZE_SCORES( raw_scores,\n    axis )";
        assert!(token_overlap(solution, code));
    }

    #[test]
    fn test_token_overlap_threshold() {
        // 4 of 5 tokens present: exactly 80%
        assert!(token_overlap(
            "alpha(beta, gamma, delta, epsilon)",
            "alpha(beta, gamma, delta)"
        ));
        // 3 of 5 tokens present
        assert!(!token_overlap(
            "alpha(beta, gamma, delta, epsilon)",
            "alpha(beta, gamma)"
        ));
    }

    #[test]
    fn test_shared_keywords_do_not_overlap() {
        assert!(!token_overlap("if x >= 5:", "if y >= 10:"));
        assert!(!token_overlap(
            "return score_total / count",
            "return count / score_total"
        ));
    }

    #[test]
    fn test_token_overlap_needs_tokens() {
        assert!(!token_overlap("x = 1", "x = 1"));
    }

    #[test]
    fn test_comparisons_present() {
        assert!(comparisons_present("if ratio >= 0.75 and n < 3:", "if (r >=0.75) or (m < 3)"));
        assert!(!comparisons_present("if ratio >= 0.75:", "if ratio > 0.75:"));
        assert!(!comparisons_present("call()", "call()"));
    }
}
