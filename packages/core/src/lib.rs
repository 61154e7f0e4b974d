// ABOUTME: Specloom core library - shared interview domain types
// ABOUTME: Provides area identifiers, interview state, draft records, and answer normalization

pub mod normalize;
pub mod types;

pub use normalize::normalize_answer;
pub use types::*;
