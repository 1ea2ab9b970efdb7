pub mod classification;
pub mod engine;
pub mod outcome;

pub use classification::Classification;
pub use engine::score;
pub use outcome::{HmpiScore, MetalContribution, ScoreOutcome};
