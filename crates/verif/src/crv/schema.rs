//! Transaction schemas.
//!
//! A schema declares a transaction's randomized fields (name, finite domain,
//! solve stage) and its constraints. It is validated once at build time and
//! then shared immutably with the solver.

use crate::common::TbError;
use crate::crv::constraint::Constraint;

/// One randomized field: name, candidate values, and solve stage.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    domain: Vec<u64>,
    stage: usize,
}

impl FieldSpec {
    /// The field's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The explicit set of candidate values.
    pub fn domain(&self) -> &[u64] {
        &self.domain
    }

    /// The solve stage this field is resolved in.
    pub fn stage(&self) -> usize {
        self.stage
    }
}

/// A validated transaction schema: fields plus constraints.
///
/// Stage-`k` constraints can only ever reference fields of stage `<= k`,
/// because a constraint becomes evaluable at the highest stage among its
/// referenced fields; the solver checks it exactly there.
#[derive(Debug)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    constraints: Vec<Constraint>,
    stages: Vec<usize>,
}

impl Schema {
    /// Starts declaring a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder {
            fields: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// All declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// All declared constraints.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The distinct stage indices, ascending.
    pub fn stages(&self) -> &[usize] {
        &self.stages
    }

    /// Iterates over the fields resolved in `stage`.
    pub fn fields_in_stage(&self, stage: usize) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(move |f| f.stage == stage)
    }
}

/// Builder mirroring the declaration order of a transaction class:
/// randomized fields first, then constraints, then an optional staging.
#[derive(Debug)]
pub struct SchemaBuilder {
    fields: Vec<FieldSpec>,
    constraints: Vec<Constraint>,
}

impl SchemaBuilder {
    /// Declares a randomized field in the default stage (0).
    #[must_use]
    pub fn rand<I>(self, name: &str, domain: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        self.rand_staged(name, domain, 0)
    }

    /// Declares a randomized field resolved in the given stage.
    #[must_use]
    pub fn rand_staged<I>(mut self, name: &str, domain: I, stage: usize) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        self.fields.push(FieldSpec {
            name: name.to_string(),
            domain: domain.into_iter().collect(),
            stage,
        });
        self
    }

    /// Adds a constraint.
    #[must_use]
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Validates and finishes the schema.
    ///
    /// # Errors
    ///
    /// [`TbError::DuplicateField`] if a name is declared twice,
    /// [`TbError::EmptyDomain`] if a field has no candidate values, and
    /// [`TbError::UnknownField`] if a constraint references an undeclared
    /// field.
    pub fn build(self) -> Result<Schema, TbError> {
        for (i, field) in self.fields.iter().enumerate() {
            if field.domain.is_empty() {
                return Err(TbError::EmptyDomain(field.name.clone()));
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(TbError::DuplicateField(field.name.clone()));
            }
        }
        for constraint in &self.constraints {
            for name in constraint.fields() {
                if !self.fields.iter().any(|f| &f.name == name) {
                    return Err(TbError::UnknownField(name.clone()));
                }
            }
        }

        let mut stages: Vec<usize> = self.fields.iter().map(|f| f.stage).collect();
        stages.sort_unstable();
        stages.dedup();

        Ok(Schema {
            fields: self.fields,
            constraints: self.constraints,
            stages,
        })
    }
}
