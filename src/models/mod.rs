pub mod github;
pub mod profile;
pub mod battle;
pub mod analysis;

pub use github::*;
pub use profile::*;
pub use battle::*;
pub use analysis::*;
