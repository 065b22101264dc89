//! TAMP Kernel: the symbolic + continuous data model for bilevel planning.
//!
//! # API Surface
//!
//! The kernel owns the value types the planner searches over:
//!
//! - [`types::Type`] / [`types::Object`] -- the typed object universe
//! - [`state::State`] / [`task::Task`] -- continuous states and planning tasks
//! - [`atoms::Predicate`] / [`atoms::GroundAtom`] -- the symbolic vocabulary,
//!   plus [`atoms::abstract_state`] for state abstraction
//! - [`operators::Operator`] / [`operators::GroundOperator`] -- parameterized
//!   actions, grounding, and symbolic application
//! - [`options::ParameterizedOption`] / [`options::OptionValue`] -- the
//!   continuous primitives a plan is made of
//!
//! # Module Dependency Direction
//!
//! `types` ← `state` ← `atoms` ← `options` ← `operators`, with `task`
//! sitting on top of `state` + `atoms`.
//!
//! One-way only. No cycles. The kernel performs no search and holds no
//! mutable global state; everything here is an immutable value.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod atoms;
pub mod operators;
pub mod options;
pub mod state;
pub mod task;
pub mod types;
