//! Background tasks module
//! 
//! This module contains the decrement loop that drives a running countdown.

pub mod countdown;

// Re-export main functions
pub(crate) use countdown::countdown_task;
