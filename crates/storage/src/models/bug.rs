use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

const DEFAULT_SOLUTION: &str = "Fix the code as described";

/// Files touched by a bug, written either as one string or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum BugFiles {
    List(Vec<String>),
    Text(String),
}

impl Default for BugFiles {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl std::fmt::Display for BugFiles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List(files) => write!(f, "{}", files.join(", ")),
            Self::Text(files) => write!(f, "{}", files),
        }
    }
}

/// Bug definition from a domain's `bugs.json` catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BugDescription {
    pub id: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub expected: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: BugFiles,
    #[serde(default)]
    pub solution: Option<String>,
}

/// Catalog files are hand-written; `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Key under which the verification gateway reports a bug's verdict.
pub fn bug_key(bug_id: u32) -> String {
    format!("BUG{}", bug_id)
}

impl BugDescription {
    /// Render the delimited documentation block the verifier searches for.
    pub fn to_bugs_doc(&self) -> String {
        let key = bug_key(self.id);
        let solution = self
            .solution
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_SOLUTION);

        format!(
            "\nSTART \"{key}\":\nDESCRIPTION: {}\nEXPECTED: {}\nCURRENT: {}\nFILES: {}\nSOLUTION: {}\nEND \"{key}\"\n",
            self.description, self.expected, self.current, self.files, solution
        )
    }
}
