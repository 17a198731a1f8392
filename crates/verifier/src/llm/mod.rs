pub mod gemini_client;
pub mod prompts;
pub mod response;

pub use gemini_client::GeminiClient;
pub use response::{clean_llm_response, is_fixed, verdict_json};
