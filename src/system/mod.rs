//! Cross-thread infrastructure.

pub mod bus;
