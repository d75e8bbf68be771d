//! Command handlers.

pub mod drafting;
