pub mod arena;

pub use arena::{resolve_battle, BattleArena, NarrativeOutcome, ResolvedBattle, NARRATIVE_FALLBACK_MESSAGE};
