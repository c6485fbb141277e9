use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{BattleStats, DevProfile, HumorousComments};
use crate::scoring::engine::{days_between, ScoreWeights};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinnerTitle {
    CodeArchitect,
    TechInfluencer,
    ConsistencyKing,
    PolyglotWizard,
    CommunityChampion,
    AllStar,
}

impl std::fmt::Display for WinnerTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WinnerTitle::CodeArchitect => write!(
                f,
                "🏗️ The Code Architect - Building digital empires with every commit!"
            ),
            WinnerTitle::TechInfluencer => write!(
                f,
                "🌟 The Tech Influencer - Your code has more fans than a K-pop star!"
            ),
            WinnerTitle::ConsistencyKing => write!(
                f,
                "⚡ The Consistency King - Keeping that GitHub graph greener than a rainforest!"
            ),
            WinnerTitle::PolyglotWizard => write!(
                f,
                "🔮 The Polyglot Wizard - Masters every programming language known to mankind!"
            ),
            WinnerTitle::CommunityChampion => write!(
                f,
                "🌐 The Community Champion - Spreading code love across the open-source universe!"
            ),
            WinnerTitle::AllStar => write!(
                f,
                "🚀 The All-Star Dev - Crushing it in every dimension of the coding game!"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoserTitle {
    MysteryCoder,
    CodeZombie,
    OccasionalCoder,
    RisingPhoenix,
}

impl std::fmt::Display for LoserTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoserTitle::MysteryCoder => write!(
                f,
                "👻 The Mystery Coder - Your potential is as mysterious as your commit history!"
            ),
            LoserTitle::CodeZombie => write!(
                f,
                "🧟\u{200d}♂\u{fe0f} The Code Zombie - Time to resurrect that GitHub activity!"
            ),
            LoserTitle::OccasionalCoder => write!(
                f,
                "🦥 The Occasional Coder - Remember: consistency beats intensity!"
            ),
            LoserTitle::RisingPhoenix => write!(
                f,
                "🔄 The Rising Phoenix - Keep pushing, your time to shine is coming!"
            ),
        }
    }
}

/// Title for the winner's strongest attribute, relative to each nominal maximum.
///
/// Activity is measured against its nominal 20 even though it can score 30.
/// Contribution takes part in finding the top ratio but has no title of its own,
/// so a contribution-led winner falls through to `AllStar`.
pub fn winner_comment(stats: &BattleStats, weights: &ScoreWeights) -> WinnerTitle {
    let repo = stats.repo_score / weights.repo_max;
    let followers = stats.followers_score / weights.followers_max;
    let activity = stats.activity_score / weights.activity_max;
    let language = stats.language_score / weights.language_max;
    let contribution = stats.contribution_score / weights.contribution_max;
    let organization = stats.organization_score / weights.organization_max;

    let top = [repo, followers, activity, language, contribution, organization]
        .into_iter()
        .fold(f64::NEG_INFINITY, f64::max);

    // First match wins, so ties resolve in this order.
    [
        (repo, WinnerTitle::CodeArchitect),
        (followers, WinnerTitle::TechInfluencer),
        (activity, WinnerTitle::ConsistencyKing),
        (language, WinnerTitle::PolyglotWizard),
        (organization, WinnerTitle::CommunityChampion),
    ]
    .into_iter()
    .find(|(ratio, _)| *ratio == top)
    .map(|(_, title)| title)
    .unwrap_or(WinnerTitle::AllStar)
}

pub fn loser_comment(loser: &DevProfile, now: DateTime<Utc>) -> LoserTitle {
    let Some(last_commit) = loser.last_commit_date else {
        return LoserTitle::MysteryCoder;
    };

    let months_inactive = (days_between(last_commit, now) / 30.0).floor();

    if months_inactive > 6.0 {
        LoserTitle::CodeZombie
    } else if months_inactive > 3.0 {
        LoserTitle::OccasionalCoder
    } else {
        LoserTitle::RisingPhoenix
    }
}

pub fn generate_humorous_comments(
    winner_stats: &BattleStats,
    loser: &DevProfile,
    weights: &ScoreWeights,
    now: DateTime<Utc>,
) -> HumorousComments {
    HumorousComments {
        winner: winner_comment(winner_stats, weights).to_string(),
        loser: loser_comment(loser, now).to_string(),
    }
}
