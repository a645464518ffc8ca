//! Staged bounded-retry constraint solver.
//!
//! Resolution walks the schema's stages in ascending order. Within a stage,
//! every stage field is sampled uniformly from its domain, then every
//! constraint whose referenced fields are all available (already committed or
//! sampled this round) is evaluated. A passing round commits the stage; a
//! failing round is retried up to the attempt budget. There is no search or
//! backtracking across stages: once a stage commits, it is final, and a later
//! stage left unsatisfiable by earlier commitments fails the whole
//! resolution.

use rand::Rng;

use crate::common::TbError;
use crate::crv::constraint::{Bindings, Constraint};
use crate::crv::schema::Schema;
use crate::crv::transaction::Transaction;

/// Default per-stage retry budget (see `SolverConfig`).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

/// Resolves one transaction with the default retry budget.
///
/// # Errors
///
/// [`TbError::Unsatisfiable`] if any stage exhausts its attempts.
pub fn solve<R: Rng>(schema: &Schema, rng: &mut R) -> Result<Transaction, TbError> {
    solve_with(schema, rng, DEFAULT_MAX_ATTEMPTS)
}

/// Resolves one transaction, retrying each stage up to `max_attempts` times.
///
/// Sampling draws only from `rng`, so a run is reproducible given its seed.
///
/// # Errors
///
/// [`TbError::Unsatisfiable`] if any stage exhausts its attempts. The error
/// carries the failing stage so an over-constrained schema is easy to place.
pub fn solve_with<R: Rng>(
    schema: &Schema,
    rng: &mut R,
    max_attempts: u32,
) -> Result<Transaction, TbError> {
    let mut bound = Bindings::new();

    for &stage in schema.stages() {
        let stage_fields: Vec<_> = schema.fields_in_stage(stage).collect();
        if stage_fields.is_empty() {
            continue;
        }

        // Constraints whose full field set is available once this stage's
        // fields are sampled. Earlier-stage constraints re-evaluate to true;
        // later-stage constraints are not yet evaluable.
        let applicable: Vec<&Constraint> = schema
            .constraints()
            .iter()
            .filter(|c| {
                c.fields().iter().all(|name| {
                    bound.contains_key(name) || stage_fields.iter().any(|f| f.name() == name)
                })
            })
            .collect();

        let mut committed = false;
        for _ in 0..max_attempts {
            let mut trial = bound.clone();
            for field in &stage_fields {
                let index = rng.gen_range(0..field.domain().len());
                let _ = trial.insert(field.name().to_string(), field.domain()[index]);
            }
            if applicable.iter().all(|c| c.evaluate(&trial)) {
                bound = trial;
                committed = true;
                break;
            }
        }
        if !committed {
            return Err(TbError::Unsatisfiable {
                stage,
                attempts: max_attempts,
            });
        }
    }

    Ok(Transaction::from_bindings(bound))
}
