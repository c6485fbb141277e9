pub mod sqlite;

pub use sqlite::{read_last_battle, Storage, LAST_BATTLE_RESULT_KEY};
