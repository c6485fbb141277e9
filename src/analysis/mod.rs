pub mod analyzer;

pub use analyzer::{AnalyzedProfile, ProfileAnalyzer};
