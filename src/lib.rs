//! Evaluation engine for the simulated medical appointment booking exercise.
//!
//! The [`evaluation`] module owns the action log and scoring; [`booking`] hosts the
//! form-side collaborators that feed it; [`exercise`] wires both behind an HTTP router.

pub mod booking;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod exercise;
pub mod telemetry;
