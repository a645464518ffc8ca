//! Transaction records.
//!
//! A transaction is one discrete unit of stimulus or observed-response data.
//! After construction it is immutable: pipeline components build fresh
//! transactions rather than mutating published ones.

use std::collections::BTreeMap;
use std::fmt;

use crate::common::TbError;

/// An immutable mapping from field name to integer value.
///
/// Produced by the solver (stimulus) or by a monitor via
/// [`Transaction::builder`] (observed response). Field order is stable
/// (name-sorted), so log lines are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    fields: BTreeMap<String, u64>,
}

impl Transaction {
    /// Starts building a transaction field by field.
    pub fn builder() -> TransactionBuilder {
        TransactionBuilder {
            fields: BTreeMap::new(),
        }
    }

    /// Wraps an already-resolved binding map. Solver internal.
    pub(crate) fn from_bindings(fields: BTreeMap<String, u64>) -> Self {
        Self { fields }
    }

    /// Returns the value of `name`, or `None` if the field is absent.
    pub fn get(&self, name: &str) -> Option<u64> {
        self.fields.get(name).copied()
    }

    /// Returns the value of `name`, or [`TbError::MissingField`].
    ///
    /// Drivers and reference models use this form so a schema/protocol
    /// mismatch surfaces as an error instead of a silent zero.
    pub fn field(&self, name: &str) -> Result<u64, TbError> {
        self.fields
            .get(name)
            .copied()
            .ok_or_else(|| TbError::MissingField(name.to_string()))
    }

    /// Iterates over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of fields carried.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// `true` if the transaction carries no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.fields {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        Ok(())
    }
}

/// Incremental builder for observed transactions.
#[derive(Debug, Default)]
pub struct TransactionBuilder {
    fields: BTreeMap<String, u64>,
}

impl TransactionBuilder {
    /// Adds (or overwrites) one field.
    #[must_use]
    pub fn field(mut self, name: &str, value: u64) -> Self {
        let _ = self.fields.insert(name.to_string(), value);
        self
    }

    /// Finishes the transaction.
    pub fn build(self) -> Transaction {
        Transaction {
            fields: self.fields,
        }
    }
}
