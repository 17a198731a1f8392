//! Pattern-matching verifier that runs before any LLM call.
//!
//! It has no notion of program semantics. Whenever the textual evidence is
//! not conclusive it answers [`Outcome::Inconclusive`] and the caller defers
//! to the semantic judge.

mod bug_doc;
mod diff_text;
mod heuristics;

use serde_json::Value;

pub use bug_doc::{extract_bug_block, extract_solution};
pub use diff_text::flatten_diff;
pub use heuristics::{comparisons_present, normalize, token_overlap};

/// Which heuristic produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Normalized solution is a substring of the normalized diff
    Exact,
    TokenOverlap,
    /// Every comparison/literal pair of the solution appears in the diff
    Comparisons,
}

/// Why no verdict could be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inconclusive {
    NoBugBlock,
    NoSolution,
    NoCode,
    NoHeuristicMatched,
}

/// Three-valued verdict of the deterministic pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Matched(MatchKind),
    /// A definite rejection. The current heuristics never produce it.
    NotMatched,
    Inconclusive(Inconclusive),
}

impl Outcome {
    pub fn is_conclusive(&self) -> bool {
        !matches!(self, Outcome::Inconclusive(_))
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Matched(kind) => write!(f, "matched ({:?})", kind),
            Outcome::NotMatched => write!(f, "not matched"),
            Outcome::Inconclusive(reason) => write!(f, "inconclusive ({:?})", reason),
        }
    }
}

/// Check whether `diff` contains the documented solution of `bug_id`.
pub fn verify(bugs_doc: &str, diff: &Value, bug_id: &str) -> Outcome {
    let Some(bug_block) = extract_bug_block(bugs_doc, bug_id) else {
        return Outcome::Inconclusive(Inconclusive::NoBugBlock);
    };

    let Some(solution) = extract_solution(&bug_block) else {
        return Outcome::Inconclusive(Inconclusive::NoSolution);
    };

    let code = flatten_diff(diff);
    if code.is_empty() {
        return Outcome::Inconclusive(Inconclusive::NoCode);
    }

    let normalized_solution = normalize(&solution);
    let normalized_code = normalize(&code);

    if !normalized_solution.is_empty() && normalized_code.contains(&normalized_solution) {
        return Outcome::Matched(MatchKind::Exact);
    }

    if token_overlap(&solution, &code) {
        return Outcome::Matched(MatchKind::TokenOverlap);
    }

    if comparisons_present(&solution, &code) {
        return Outcome::Matched(MatchKind::Comparisons);
    }

    Outcome::Inconclusive(Inconclusive::NoHeuristicMatched)
}
