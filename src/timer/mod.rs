//! Countdown timer engine
//! 
//! This module contains the engine owning the countdown and its decrement loop.

pub mod engine;

// Re-export main types
pub use engine::TimerEngine;
