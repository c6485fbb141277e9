use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::github::ProfileFetcher;
use crate::llm::{BattleNarrativeRequest, LLMProvider};
use crate::models::{BattleError, BattleInsights, BattleResult, BattleStats, DevProfile};
use crate::scoring::{generate_humorous_comments, ScoringEngine};
use crate::storage::Storage;

pub const NARRATIVE_FALLBACK_MESSAGE: &str =
    "AI analysis unavailable. Showing GitHub stats comparison.";

/// What the narrative step produced. Either way the scores stand.
#[derive(Debug, Clone, PartialEq)]
pub enum NarrativeOutcome {
    Insights(BattleInsights),
    Unavailable(BattleError),
}

impl NarrativeOutcome {
    /// The single place a narrative failure is converted; it never propagates further.
    pub fn from_result(result: Result<BattleInsights>) -> Self {
        match result {
            Ok(insights) => NarrativeOutcome::Insights(insights),
            Err(e) => {
                if e.is_narrative() {
                    tracing::warn!("AI battle analysis failed: {}", e);
                } else {
                    tracing::error!("AI battle analysis failed with an unexpected error: {}", e);
                }
                NarrativeOutcome::Unavailable(BattleError {
                    gemini_error: true,
                    message: NARRATIVE_FALLBACK_MESSAGE.to_string(),
                })
            }
        }
    }

    pub fn into_parts(self) -> (Option<BattleInsights>, Option<BattleError>) {
        match self {
            NarrativeOutcome::Insights(insights) => (Some(insights), None),
            NarrativeOutcome::Unavailable(error) => (None, Some(error)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBattle {
    pub winner: DevProfile,
    pub loser: DevProfile,
    pub winner_stats: BattleStats,
    pub loser_stats: BattleStats,
}

/// Higher total wins; a tie goes to the first profile.
pub fn resolve_battle(
    profile1: DevProfile,
    stats1: BattleStats,
    profile2: DevProfile,
    stats2: BattleStats,
) -> ResolvedBattle {
    if stats1.total_score >= stats2.total_score {
        ResolvedBattle {
            winner: profile1,
            loser: profile2,
            winner_stats: stats1,
            loser_stats: stats2,
        }
    } else {
        ResolvedBattle {
            winner: profile2,
            loser: profile1,
            winner_stats: stats2,
            loser_stats: stats1,
        }
    }
}

pub struct BattleArena {
    fetcher: Arc<dyn ProfileFetcher>,
    llm: Arc<dyn LLMProvider>,
    scoring: ScoringEngine,
    session: Option<Mutex<Storage>>,
}

impl BattleArena {
    pub fn new(fetcher: impl ProfileFetcher + 'static, llm: impl LLMProvider + 'static) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            llm: Arc::new(llm),
            scoring: ScoringEngine::new(),
            session: None,
        }
    }

    /// Mirrors every finished battle into `storage` as the last result.
    pub fn with_session(mut self, storage: Storage) -> Self {
        self.session = Some(Mutex::new(storage));
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringEngine) -> Self {
        self.scoring = scoring;
        self
    }

    pub async fn run_battle(&self, username1: &str, username2: &str) -> Result<BattleResult> {
        self.run_battle_at(username1, username2, Utc::now()).await
    }

    /// Both profiles are judged against the same `now`.
    pub async fn run_battle_at(
        &self,
        username1: &str,
        username2: &str,
        now: DateTime<Utc>,
    ) -> Result<BattleResult> {
        let username1 = validate_username(username1)?;
        let username2 = validate_username(username2)?;

        tracing::info!("Battle: {} vs {}", username1, username2);
        let (profile1, profile2) = tokio::try_join!(
            self.fetch(username1),
            self.fetch(username2),
        )?;

        let stats1 = self.scoring.score(&profile1, now);
        let stats2 = self.scoring.score(&profile2, now);
        tracing::debug!(
            "{} scored {:.2}, {} scored {:.2}",
            profile1.username,
            stats1.total_score,
            profile2.username,
            stats2.total_score
        );

        let battle = resolve_battle(profile1.clone(), stats1, profile2.clone(), stats2);
        tracing::info!("{} wins over {}", battle.winner.username, battle.loser.username);

        // The narrative sees the profiles in the order they were named.
        let request = BattleNarrativeRequest::new(
            profile1,
            profile2,
            &battle.winner.username,
            &battle.loser.username,
        );
        let narrative =
            NarrativeOutcome::from_result(self.llm.generate_battle_insights(&request).await);
        let (insights, error) = narrative.into_parts();

        let humorous_comments = generate_humorous_comments(
            &battle.winner_stats,
            &battle.loser,
            self.scoring.weights(),
            now,
        );

        let result = BattleResult {
            winner: battle.winner,
            loser: battle.loser,
            insights,
            battle_stats: [battle.winner_stats, battle.loser_stats],
            humorous_comments,
            error,
        };

        self.persist(&result);

        Ok(result)
    }

    /// The cached result of the previous battle in this session, if it can be read.
    pub fn last_result(&self) -> Option<BattleResult> {
        let session = self.session.as_ref()?;
        let loaded = match session.lock() {
            Ok(storage) => storage.load_battle_result(),
            Err(_) => {
                tracing::warn!("Session cache lock poisoned, ignoring cached result");
                return None;
            }
        };

        loaded.unwrap_or_else(|e| {
            tracing::warn!("Failed to load battle result from session cache: {}", e);
            None
        })
    }

    /// Ends the session by dropping the cached result.
    pub fn clear_session(&self) -> Result<bool> {
        match &self.session {
            Some(session) => match session.lock() {
                Ok(storage) => storage.clear_battle_result(),
                Err(_) => Err(Error::Config("Session cache lock poisoned".to_string())),
            },
            None => Ok(false),
        }
    }

    async fn fetch(&self, username: &str) -> Result<DevProfile> {
        self.fetcher
            .fetch_profile(username)
            .await
            .map_err(|e| Error::fetch_failed(username, e))
    }

    fn persist(&self, result: &BattleResult) {
        let Some(session) = &self.session else {
            return;
        };

        let saved = match session.lock() {
            Ok(storage) => storage.save_battle_result(result),
            Err(_) => {
                tracing::warn!("Session cache lock poisoned, battle result not stored");
                return;
            }
        };

        if let Err(e) = saved {
            tracing::warn!("Failed to store battle result in session cache: {}", e);
        }
    }
}

fn validate_username(username: &str) -> Result<&str> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(
            "Both GitHub usernames are required".to_string(),
        ));
    }
    Ok(trimmed)
}
