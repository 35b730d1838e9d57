/// Grouping, rule dispatch and aggregation.
pub mod engine;
/// Advisory notes attached to results.
pub mod notes;
pub mod types;

pub use engine::calculate_diversity;
pub use types::{DiversityResult, TypeBreakdown};
