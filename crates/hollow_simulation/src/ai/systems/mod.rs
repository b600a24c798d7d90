//! AI systems (strategic layer logic)

pub mod agent;

// Re-export all systems
pub use agent::*;
