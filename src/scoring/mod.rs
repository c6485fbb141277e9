pub mod engine;
pub mod comments;

pub use engine::{calculate_battle_stats, ScoreWeights, ScoringEngine};
pub use comments::{generate_humorous_comments, loser_comment, winner_comment, LoserTitle, WinnerTitle};
