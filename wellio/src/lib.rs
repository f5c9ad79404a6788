//! Wellio: client progress tracking for fitness and nutrition coaches.
//!
//! Heterogeneous client input (explicit logs, free-text smart logs,
//! wearable syncs) is normalized into one typed event stream, from which a
//! composite progress score and engagement triggers are derived.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod intelligence;
pub mod llm;
pub mod models;
pub mod normalization;
pub mod services;
