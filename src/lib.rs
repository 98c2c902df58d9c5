//! # rowgate
//!
//! Admission-gated concurrent batch writer for Postgres.
//!
//! Spawns one task per row, throttles store access through an advisory
//! capacity gate tied to the connection pool, and waits on a completion
//! barrier until every task reaches a terminal state. Any store error
//! aborts the whole batch.

pub mod barrier;
pub mod config;
pub mod engine;
pub mod error;
pub mod gate;
pub mod model;
pub mod store;
pub mod telemetry;
