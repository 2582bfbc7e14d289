//! The analysis core: deterministic keyword extraction and coverage scoring,
//! orchestrated with the optional advisory ranking step.

pub mod handlers;
pub mod keywords;
pub mod pipeline;
pub mod scoring;
