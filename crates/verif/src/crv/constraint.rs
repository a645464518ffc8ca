//! Constraint predicates.
//!
//! A constraint names the fields it reads and provides a predicate over a
//! bound-value map. Binding is strictly by declared name; there is no scope
//! capture. The solver evaluates a constraint only once every referenced
//! field is bound.

use std::collections::BTreeMap;
use std::fmt;

/// A partial or complete assignment of field names to values.
pub type Bindings = BTreeMap<String, u64>;

/// A predicate over a declared set of field names.
pub struct Constraint {
    fields: Vec<String>,
    predicate: Box<dyn Fn(&Bindings) -> bool>,
}

impl Constraint {
    /// Builds a constraint from its referenced field names and a predicate.
    ///
    /// The predicate is only invoked with bindings that contain every
    /// declared field.
    pub fn new<I, S, F>(fields: I, predicate: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Bindings) -> bool + 'static,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            predicate: Box::new(predicate),
        }
    }

    /// Convenience constructor for a single-field predicate.
    pub fn unary<F>(field: &str, predicate: F) -> Self
    where
        F: Fn(u64) -> bool + 'static,
    {
        let name = field.to_string();
        Self {
            fields: vec![field.to_string()],
            predicate: Box::new(move |bindings| predicate(bindings[name.as_str()])),
        }
    }

    /// Convenience constructor for a two-field predicate.
    pub fn binary<F>(a: &str, b: &str, predicate: F) -> Self
    where
        F: Fn(u64, u64) -> bool + 'static,
    {
        let (na, nb) = (a.to_string(), b.to_string());
        Self {
            fields: vec![a.to_string(), b.to_string()],
            predicate: Box::new(move |bindings| {
                predicate(bindings[na.as_str()], bindings[nb.as_str()])
            }),
        }
    }

    /// The field names this constraint reads.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Evaluates the predicate.
    ///
    /// Callers must have bound every field in [`fields`](Self::fields);
    /// the solver guarantees this before evaluating.
    pub fn evaluate(&self, bindings: &Bindings) -> bool {
        (self.predicate)(bindings)
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
