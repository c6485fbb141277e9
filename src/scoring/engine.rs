use chrono::{DateTime, Utc};

use crate::models::{BattleStats, DevProfile};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Nominal maxima for each sub-score plus the targets at which each ramp saturates.
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    pub repo_max: f64,
    pub followers_max: f64,
    /// Nominal only: the age bonus sits on top of this (see `activity_score`).
    pub activity_max: f64,
    pub language_max: f64,
    pub contribution_max: f64,
    pub organization_max: f64,

    pub repo_target: f64,
    pub follower_target: f64,
    pub inactivity_window_days: f64,
    pub age_bonus_year_cap: f64,
    pub age_bonus_per_year: f64,
    pub language_target: f64,
    pub organization_target: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            repo_max: 20.0,
            followers_max: 15.0,
            activity_max: 20.0,
            language_max: 15.0,
            contribution_max: 15.0,
            organization_max: 15.0,

            repo_target: 40.0,
            follower_target: 1000.0,
            inactivity_window_days: 365.0,
            age_bonus_year_cap: 5.0,
            age_bonus_per_year: 2.0,
            language_target: 5.0,
            organization_target: 3.0,
        }
    }
}

// Points per filled-in profile field.
const COMPANY_POINTS: f64 = 3.0;
const BLOG_POINTS: f64 = 2.0;
const TWITTER_POINTS: f64 = 2.0;
const LOCATION_POINTS: f64 = 2.0;
const BIO_POINTS: f64 = 3.0;

pub struct ScoringEngine {
    weights: ScoreWeights,
}

impl ScoringEngine {
    pub fn new() -> Self {
        Self {
            weights: ScoreWeights::default(),
        }
    }

    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Scores a profile as of `now`. Pure: same inputs, same output.
    pub fn score(&self, profile: &DevProfile, now: DateTime<Utc>) -> BattleStats {
        let repo_score = self.repo_score(profile.repositories);
        let followers_score = self.followers_score(profile.followers);
        let activity_score = self.activity_score(profile, now);
        let language_score = self.language_score(profile.top_languages.len());
        let contribution_score = self.contribution_score(profile);
        let organization_score = self.organization_score(profile.organizations.len());

        let total_score = repo_score
            + followers_score
            + activity_score
            + language_score
            + contribution_score
            + organization_score;

        BattleStats {
            repo_score,
            followers_score,
            activity_score,
            language_score,
            contribution_score,
            organization_score,
            total_score,
        }
    }

    fn repo_score(&self, repositories: u32) -> f64 {
        (repositories as f64 / self.weights.repo_target).min(1.0) * self.weights.repo_max
    }

    // Log scale so mega-followed accounts don't dominate.
    fn followers_score(&self, followers: u32) -> f64 {
        ((followers as f64 + 1.0).log10() / self.weights.follower_target.log10()).min(1.0)
            * self.weights.followers_max
    }

    /// Recency term plus account-age bonus, floored at zero after the sum.
    ///
    /// Not clamped to `activity_max`: a fresh commit on an account older than the
    /// bonus cap scores `activity_max + age_bonus_year_cap * age_bonus_per_year` (30).
    fn activity_score(&self, profile: &DevProfile, now: DateTime<Utc>) -> f64 {
        let window = self.weights.inactivity_window_days;
        let days_inactive = profile
            .last_commit_date
            .map(|last| days_between(last, now))
            .unwrap_or(window);
        let account_age_days = days_between(profile.created_at, now);

        let recency = self.weights.activity_max * (1.0 - days_inactive / window);
        let age_bonus = (account_age_days / 365.0).min(self.weights.age_bonus_year_cap)
            * self.weights.age_bonus_per_year;

        (recency + age_bonus).max(0.0)
    }

    // No clamp: the fetcher caps languages at five, the formula does not.
    fn language_score(&self, language_count: usize) -> f64 {
        (language_count as f64 / self.weights.language_target) * self.weights.language_max
    }

    fn contribution_score(&self, profile: &DevProfile) -> f64 {
        let points = [
            (profile.has_company(), COMPANY_POINTS),
            (profile.has_blog(), BLOG_POINTS),
            (profile.has_twitter(), TWITTER_POINTS),
            (profile.has_location(), LOCATION_POINTS),
            (profile.has_bio(), BIO_POINTS),
        ]
        .iter()
        .filter(|(present, _)| *present)
        .fold(0.0, |acc, (_, points)| acc + points);

        points.min(self.weights.contribution_max)
    }

    fn organization_score(&self, org_count: usize) -> f64 {
        ((org_count as f64 / self.weights.organization_target) * self.weights.organization_max)
            .min(self.weights.organization_max)
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Scores with the default weights.
pub fn calculate_battle_stats(profile: &DevProfile, now: DateTime<Utc>) -> BattleStats {
    ScoringEngine::new().score(profile, now)
}

/// Fractional days from `from` to `to`. Negative if `from` is in the future.
pub(crate) fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MS_PER_DAY
}
