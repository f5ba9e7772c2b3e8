//! The proof writer: the only component that appends to a proof.

use crate::audit::ProofAudit;
use crate::constraint::{Constraint, ConstraintId, PolExpr};
use crate::counter::ConstraintCounter;
use crate::error::ProofResult;
use crate::literal::{Lit, VarLike};
use crate::statement::{Conclusion, PROOF_HEADER, Statement, StatementKind};
use std::io::Write;
use tracing::trace;

/// Statistics about an emitted proof.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProofStats {
    /// Number of `red` statements.
    pub red: u64,
    /// Number of `rup` statements.
    pub rup: u64,
    /// Number of `pol` statements.
    pub pol: u64,
    /// Number of `del range` statements.
    pub deletions: u64,
    /// Number of `soli` statements.
    pub solutions: u64,
}

impl ProofStats {
    /// Total number of statements, not counting the conclusion section.
    pub fn total(&self) -> u64 {
        self.red + self.rup + self.pol + self.deletions + self.solutions
    }

    fn record(&mut self, kind: StatementKind) {
        match kind {
            StatementKind::Red => self.red += 1,
            StatementKind::Rup => self.rup += 1,
            StatementKind::Pol => self.pol += 1,
            StatementKind::Delete => self.deletions += 1,
            StatementKind::Solution => self.solutions += 1,
        }
    }
}

/// Append-only proof writer with constraint numbering and self-audit.
///
/// Every statement is audited before it is written, so a sink never
/// receives a line that references an unknown constraint or variable.
pub struct ProofWriter<W: Write, V> {
    out: W,
    counter: ConstraintCounter,
    audit: ProofAudit<V>,
    stats: ProofStats,
}

impl<W: Write, V: VarLike> ProofWriter<W, V> {
    /// Start a proof for an instance that has `input_constraints` constraints.
    pub fn new(mut out: W, input_constraints: u64) -> ProofResult<Self> {
        writeln!(out, "{PROOF_HEADER}")?;
        Ok(Self {
            out,
            counter: ConstraintCounter::new(input_constraints),
            audit: ProofAudit::new(),
            stats: ProofStats::default(),
        })
    }

    /// Add `constraint` by redundance with the witness `var -> value`.
    pub fn redundant(
        &mut self,
        constraint: Constraint<V>,
        var: V,
        value: bool,
    ) -> ProofResult<ConstraintId> {
        self.write_statement(&Statement::Red {
            constraint,
            var,
            value,
        })
    }

    /// Add `constraint` by reverse unit propagation.
    pub fn rup(&mut self, constraint: Constraint<V>) -> ProofResult<ConstraintId> {
        self.write_statement(&Statement::Rup(constraint))
    }

    /// Derive a linear combination of existing constraints.
    pub fn pol(&mut self, expr: PolExpr) -> ProofResult<ConstraintId> {
        self.write_statement(&Statement::Pol(expr))
    }

    /// Log a solution; the checker adds an objective-improving constraint.
    pub fn solution(&mut self, lits: Vec<Lit<V>>) -> ProofResult<ConstraintId> {
        self.write_statement(&Statement::Solution(lits))
    }

    /// Delete every constraint with an id in `from..=to`.
    pub fn delete_range(&mut self, from: ConstraintId, to: ConstraintId) -> ProofResult<()> {
        self.write_statement(&Statement::DeleteRange { from, to })?;
        Ok(())
    }

    /// Write the output and conclusion section and the end marker.
    pub fn conclude(&mut self, conclusion: Conclusion) -> ProofResult<()> {
        self.audit.conclude()?;
        writeln!(self.out, "output NONE")?;
        writeln!(self.out, "{conclusion}")?;
        writeln!(self.out, "end pseudo-Boolean proof")?;
        self.out.flush()?;
        trace!(%conclusion, last_id = self.counter.last().get(), "proof concluded");
        Ok(())
    }

    /// The most recently issued constraint id.
    pub fn last_id(&self) -> ConstraintId {
        self.counter.last()
    }

    /// The id the next constraint-introducing statement will get.
    pub fn next_id(&self) -> ConstraintId {
        self.counter.peek()
    }

    /// Statement statistics so far.
    pub fn stats(&self) -> &ProofStats {
        &self.stats
    }

    /// Whether [`ProofWriter::conclude`] has been called.
    pub fn is_concluded(&self) -> bool {
        self.audit.is_concluded()
    }

    /// Flush and return the underlying sink.
    pub fn finish(mut self) -> ProofResult<W> {
        self.out.flush()?;
        Ok(self.out)
    }

    fn write_statement(&mut self, stmt: &Statement<V>) -> ProofResult<ConstraintId> {
        self.audit.check(stmt, self.counter.last())?;
        writeln!(self.out, "{stmt}")?;
        self.stats.record(stmt.kind());
        let id = self.counter.reserve(stmt.fresh_ids());
        trace!(kind = ?stmt.kind(), id = id.get(), "proof statement");
        Ok(id)
    }
}
