//! Runtime invariant checks for emitted proofs
//!
//! The audit replays every statement before it reaches the sink and rejects
//! anything an external checker would refuse because of a dangling reference:
//! constraint ids that were never issued or were deleted, and auxiliary
//! variables used before the `red` step that introduces them.

use crate::constraint::{ConstraintId, ConstraintRef};
use crate::error::{ProofError, ProofResult};
use crate::literal::VarLike;
use crate::statement::Statement;
use rustc_hash::FxHashSet;

/// Reference and definition tracker for a proof under construction.
#[derive(Debug, Clone)]
pub struct ProofAudit<V> {
    /// Auxiliary variables introduced so far.
    defined: FxHashSet<V>,
    /// Deleted ids as sorted, disjoint, inclusive ranges.
    deleted: Vec<(u64, u64)>,
    /// Witness variable of the immediately preceding `red`, if any.
    last_red: Option<V>,
    concluded: bool,
}

impl<V: VarLike> Default for ProofAudit<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: VarLike> ProofAudit<V> {
    /// Create an audit with no auxiliary variables and nothing deleted.
    pub fn new() -> Self {
        Self {
            defined: FxHashSet::default(),
            deleted: Vec::new(),
            last_red: None,
            concluded: false,
        }
    }

    /// Check `stmt` against the proof so far, where `last` is the last issued
    /// id, and record its effects. Nothing is recorded when the check fails.
    pub fn check(&mut self, stmt: &Statement<V>, last: ConstraintId) -> ProofResult<()> {
        if self.concluded {
            return Err(ProofError::Concluded);
        }

        match stmt {
            Statement::Red {
                constraint, var, ..
            } => {
                if self.defined.contains(var) && self.last_red != Some(*var) {
                    return Err(ProofError::Redefinition(var.to_string()));
                }
                for used in constraint.vars().filter(|v| v != var) {
                    self.check_var(used)?;
                }
                self.defined.insert(*var);
                self.last_red = Some(*var);
                return Ok(());
            }
            Statement::Rup(constraint) => {
                for used in constraint.vars() {
                    self.check_var(used)?;
                }
            }
            Statement::Pol(expr) => {
                for r in expr.references() {
                    self.check_ref(r, last)?;
                }
            }
            Statement::DeleteRange { from, to } => {
                let (from, to) = (from.get(), to.get());
                if from == 0 || from > to || to > last.get() {
                    return Err(ProofError::InvalidRange {
                        from,
                        to,
                        last: last.get(),
                    });
                }
                self.mark_deleted(from, to);
            }
            Statement::Solution(lits) => {
                if let Some(lit) = lits.iter().find(|l| !l.var().is_input()) {
                    return Err(ProofError::NotAnInputVariable(lit.var().to_string()));
                }
            }
        }

        self.last_red = None;
        Ok(())
    }

    /// Mark the proof as concluded; any later statement is rejected.
    pub fn conclude(&mut self) -> ProofResult<()> {
        if self.concluded {
            return Err(ProofError::Concluded);
        }
        self.concluded = true;
        Ok(())
    }

    /// Whether the proof has been concluded.
    pub fn is_concluded(&self) -> bool {
        self.concluded
    }

    /// Whether the constraint with id `id` was deleted.
    pub fn is_deleted(&self, id: u64) -> bool {
        let idx = self.deleted.partition_point(|&(_, to)| to < id);
        self.deleted
            .get(idx)
            .is_some_and(|&(from, to)| from <= id && id <= to)
    }

    fn check_var(&self, var: V) -> ProofResult<()> {
        if var.is_input() || self.defined.contains(&var) {
            Ok(())
        } else {
            Err(ProofError::UndefinedVariable(var.to_string()))
        }
    }

    fn check_ref(&self, r: ConstraintRef, last: ConstraintId) -> ProofResult<()> {
        let last = last.get();
        let id = match r {
            ConstraintRef::Abs(id) => id.get(),
            ConstraintRef::Last(offset) if offset >= 1 && offset <= last => last - offset + 1,
            ConstraintRef::Last(_) => 0,
        };
        if id == 0 || id > last {
            return Err(ProofError::ForwardReference {
                id: r.to_string(),
                last,
            });
        }
        if self.is_deleted(id) {
            return Err(ProofError::DeletedReference(id));
        }
        Ok(())
    }

    fn mark_deleted(&mut self, from: u64, to: u64) {
        self.deleted.push((from, to));
        self.deleted.sort_unstable();

        let mut merged: Vec<(u64, u64)> = Vec::with_capacity(self.deleted.len());
        for &(from, to) in &self.deleted {
            match merged.last_mut() {
                Some(prev) if from <= prev.1.saturating_add(1) => prev.1 = prev.1.max(to),
                _ => merged.push((from, to)),
            }
        }
        self.deleted = merged;
    }
}
