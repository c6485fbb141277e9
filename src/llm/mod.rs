pub mod provider;
pub mod gemini;
pub mod prompts;
pub mod parser;

pub use provider::LLMProvider;
pub use gemini::GeminiProvider;
pub use prompts::BattleNarrativeRequest;
pub use parser::{parse_battle_insights, parse_profile_analysis};
