//! PannyPal - Chat-driven cashflow tracking
//!
//! This crate turns chat messages (free text or receipt photos) into drafted
//! income/expense entries, sends the draft back to the user, and commits,
//! revises, or discards it based on the user's quoted reply.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
