//! Scenario tests for the firing core.
//!
//! - **Integration tests**: a weapon in a firing range, end to end through
//!   detection, timing, resolution and collaborators
//! - **Determinism tests**: seeded scenarios replayed twice must produce
//!   identical shot logs
//!
//! # Test Structure
//!
//! - `helpers.rs`: the `FiringRange` scene and recording collaborators
//! - `integration.rs`: end-to-end weapon behaviour
//! - `determinism.rs`: replay checks

mod helpers;
