//! TAMP Search: bilevel search-and-sample planning over the kernel's model.
//!
//! This crate fuses two search regimes. A best-first symbolic search lazily
//! yields candidate operator sequences (skeletons); a bounded randomized
//! backtracking search tries to realize each skeleton through an external
//! continuous option model; and when the continuous layer discovers an
//! infeasibility the symbolic layer did not predict, a recovery pass
//! rewrites the ground-operator set and the whole pipeline restarts.
//!
//! # Crate dependency graph
//!
//! ```text
//! tamp_kernel  ←  tamp_search  ←  tamp_harness
//! (model)         (planner)       (worlds, runner)
//! ```
//!
//! # Key types
//!
//! - [`planner::plan`] — the bilevel entry point; returns a plan + metrics
//! - [`skeleton::SkeletonGenerator`] — restartable best-first skeleton stream
//! - [`backtrack::run_low_level_search`] — continuous refinement of one skeleton
//! - [`config::PlannerConfig`] — explicit immutable configuration
//! - [`contract::OptionModel`] / [`heuristic::HeuristicFactory`] — the two
//!   external collaborator contracts
//! - [`error::PlanningError`] — the typed failure taxonomy

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod backtrack;
pub mod config;
pub mod contract;
pub mod error;
pub mod frontier;
pub mod grounding;
pub mod heuristic;
pub mod planner;
pub mod recovery;
pub mod skeleton;
