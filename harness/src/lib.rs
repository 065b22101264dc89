//! TAMP Harness: world fixtures for exercising the planner.
//!
//! Worlds provide domain data only — types, predicates, operator
//! libraries, samplers, and a simulated option model. The harness does NOT
//! implement search; it delegates to `tamp-search` through a thin runner.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod contract;
pub mod runner;
pub mod worlds;
