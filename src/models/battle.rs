use serde::{Deserialize, Serialize};

use super::profile::DevProfile;

/// Per-profile score breakdown. Recomputed every battle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleStats {
    pub repo_score: f64,
    pub followers_score: f64,
    /// Can reach 30: recency (20) plus account age bonus (10).
    pub activity_score: f64,
    /// Unclamped; exceeds 15 when more than five languages are given.
    pub language_score: f64,
    pub contribution_score: f64,
    pub organization_score: f64,
    pub total_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleInsights {
    pub winning_factors: Vec<String>,
    pub improvement_areas: Vec<String>,
}

/// Informational banner attached when the AI narrative could not be produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleError {
    pub gemini_error: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumorousComments {
    pub winner: String,
    pub loser: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleResult {
    pub winner: DevProfile,
    pub loser: DevProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<BattleInsights>,
    /// `[winner, loser]`
    pub battle_stats: [BattleStats; 2],
    pub humorous_comments: HumorousComments,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<BattleError>,
}

impl BattleResult {
    pub fn winner_stats(&self) -> &BattleStats {
        &self.battle_stats[0]
    }

    pub fn loser_stats(&self) -> &BattleStats {
        &self.battle_stats[1]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub wins: u32,
    pub losses: u32,
    pub score: f64,
    pub title: String,
}
