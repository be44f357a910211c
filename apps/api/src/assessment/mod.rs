// Assessment sessions: signal collection, composite scoring, final results.
// Inference runs out of process through crate::analyzer; handlers never spawn scripts.

pub mod emotion;
pub mod handlers;
pub mod repo;
pub mod scoring;
pub mod service;
pub mod solutions;
pub mod uploads;
