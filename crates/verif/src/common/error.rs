//! Testbench error definitions.
//!
//! This module defines the error handling for the verification library. It provides:
//! 1. **Solver errors:** staged randomization giving up after its retry budget.
//! 2. **Schema errors:** structural problems caught when a schema is built.
//! 3. **Protocol errors:** missing transaction fields and bounded-wait expiry.
//!
//! Scoreboard mismatches are deliberately *not* errors: an expected-vs-observed
//! difference is a recorded comparison outcome (see
//! [`Verdict`](crate::tb::scoreboard::Verdict)), and the pipeline keeps running.

use thiserror::Error;

/// Errors raised by the testbench library.
///
/// Solver and schema errors are fatal to the current generation run and
/// propagate synchronously; they must never be swallowed. Everything observed
/// on the device side is data, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TbError {
    /// The solver exhausted its retry budget for one solve stage.
    ///
    /// Once a stage fails, the whole resolution fails; earlier stages are
    /// never revisited.
    #[error("randomization unsatisfiable: stage {stage} exhausted {attempts} attempts")]
    Unsatisfiable {
        /// The solve stage that could not be satisfied.
        stage: usize,
        /// The retry budget that was exhausted.
        attempts: u32,
    },

    /// A schema declared the same field name twice.
    #[error("schema declares field `{0}` more than once")]
    DuplicateField(String),

    /// A schema field has no candidate values to sample from.
    #[error("field `{0}` has an empty domain")]
    EmptyDomain(String),

    /// A constraint references a field the schema never declared.
    #[error("constraint references unknown field `{0}`")]
    UnknownField(String),

    /// A transaction was asked for a field it does not carry.
    ///
    /// Raised by drivers and reference models when the schema and the
    /// protocol disagree about field names.
    #[error("transaction has no field `{0}`")]
    MissingField(String),

    /// A bounded wait on a device signal expired.
    ///
    /// Unbounded edge waits can deadlock until the run deadline abandons the
    /// task; protocols that wait on a device-asserted signal should use
    /// [`timeout`](crate::exec::time::timeout) and surface this instead.
    #[error("gave up on `{signal}` after {waited_ns} ns of simulated time")]
    EdgeTimeout {
        /// The signal whose edge never arrived.
        signal: String,
        /// How long the protocol waited before giving up.
        waited_ns: u64,
    },
}
