use serde::{Deserialize, Serialize};

/// Single-profile career analysis produced by the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub skill_gaps: Vec<String>,
    pub recommendations: Vec<String>,
    pub salary_range: SalaryRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
}

impl ProfileAnalysis {
    pub fn sections(&self) -> [(&'static str, &[String]); 4] {
        [
            ("strengths", &self.strengths),
            ("weaknesses", &self.weaknesses),
            ("skillGaps", &self.skill_gaps),
            ("recommendations", &self.recommendations),
        ]
    }
}
