pub mod api;
pub mod deterministic;
pub mod error;
pub mod gateway;
pub mod llm;
pub mod server;

pub use api::{Method, VerifyRequest, VerifyResponse};
pub use error::{Result, VerifierError};
pub use gateway::{Gateway, SemanticJudge};
pub use llm::{GeminiClient, is_fixed};
