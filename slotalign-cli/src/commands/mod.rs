//! Command implementations for the slotalign CLI

pub mod align;
pub mod score;

pub use align::AlignArgs;
pub use score::ScoreArgs;
