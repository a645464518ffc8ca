//! Constrained-random value generation.
//!
//! This module implements the declarative randomization layer of the
//! testbench. It provides:
//! 1. **Transactions:** immutable named-field records passed between pipeline
//!    stages ([`Transaction`]).
//! 2. **Constraints:** predicates over declared field names, evaluable once
//!    all referenced fields are bound ([`Constraint`]).
//! 3. **Schemas:** a transaction's fields, each with a finite domain and a
//!    solve stage ([`Schema`]).
//! 4. **The solver:** staged bounded-retry resolution of a schema into a
//!    transaction ([`solve`]).
//!
//! A schema is an explicit immutable value, not shared mutable state: build
//! it once with [`Schema::builder`], then hand `&Schema` to the solver for
//! every resolution.

/// Constraint predicates over named fields.
pub mod constraint;
/// Field declarations and the schema builder.
pub mod schema;
/// The staged bounded-retry solver.
pub mod solver;
/// Immutable named-field transaction records.
pub mod transaction;

pub use constraint::{Bindings, Constraint};
pub use schema::{FieldSpec, Schema, SchemaBuilder};
pub use solver::{solve, solve_with};
pub use transaction::{Transaction, TransactionBuilder};
