//! Knapsack instances and their OPB encoding.

use crate::error::{InstanceError, InstanceResult};
use crate::var::Var;
use knapcert_proof::{Constraint, ConstraintId, Lit, Term};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// A single item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Weight (positive).
    pub weight: i64,
    /// Profit (positive).
    pub profit: i64,
}

/// A 0/1 knapsack instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnapsackInstance {
    items: Vec<Item>,
    capacity: i64,
    big_m: i64,
}

impl KnapsackInstance {
    /// Number of constraints the OPB encoding contributes to the proof.
    pub const INPUT_CONSTRAINTS: u64 = 1;

    /// Id of the capacity constraint in the proof.
    pub const CAPACITY_CONSTRAINT: ConstraintId = ConstraintId::new(1);

    /// Build an instance from parallel weight and profit vectors.
    pub fn new(weights: &[i64], profits: &[i64], capacity: i64) -> InstanceResult<Self> {
        if weights.len() != profits.len() {
            return Err(InstanceError::LengthMismatch {
                weights: weights.len(),
                profits: profits.len(),
            });
        }
        let items = weights
            .iter()
            .zip(profits)
            .map(|(&weight, &profit)| Item { weight, profit })
            .collect();
        Self::from_items(items, capacity)
    }

    /// Build an instance from items.
    pub fn from_items(items: Vec<Item>, capacity: i64) -> InstanceResult<Self> {
        if capacity <= 0 {
            return Err(InstanceError::NonPositiveCapacity(capacity));
        }
        for (item, it) in items.iter().enumerate() {
            if it.weight <= 0 {
                return Err(InstanceError::NonPositiveWeight {
                    item,
                    value: it.weight,
                });
            }
            if it.profit <= 0 {
                return Err(InstanceError::NonPositiveProfit {
                    item,
                    value: it.profit,
                });
            }
        }

        let total_weight = checked_sum(items.iter().map(|it| it.weight))?;
        let total_profit = checked_sum(items.iter().map(|it| it.profit))?;
        let big_m = total_weight
            .checked_add(total_profit)
            .ok_or(InstanceError::Overflow)?
            .max(1);
        // Outside its intended range every definition must be satisfiable
        // whatever the item literals are.
        if big_m <= total_weight.max(total_profit) {
            return Err(InstanceError::Overflow);
        }

        Ok(Self {
            items,
            capacity,
            big_m,
        })
    }

    /// The items in order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the instance has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The capacity.
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    /// Coefficient used to switch off a definition constraint.
    ///
    /// Strictly larger than both the total weight and the total profit.
    pub fn big_m(&self) -> i64 {
        self.big_m
    }

    /// The item literal `x<i>`.
    pub fn item_lit(&self, item: usize) -> Lit<Var> {
        Lit::positive(Var::item(item))
    }

    /// The objective `min: -p0 x0 -p1 x1 ...` as terms.
    pub fn objective_terms(&self) -> impl Iterator<Item = Term<Var>> + '_ {
        self.items.iter().enumerate().map(|(i, it)| Term {
            coeff: -it.profit,
            lit: self.item_lit(i),
        })
    }

    /// The capacity constraint `-w0 x0 -w1 x1 ... >= -C`.
    pub fn capacity_constraint(&self) -> Constraint<Var> {
        let mut c = Constraint::new(-self.capacity);
        for (i, it) in self.items.iter().enumerate() {
            c.push(-it.weight, self.item_lit(i));
        }
        c
    }

    /// Write the instance in OPB format.
    pub fn write_opb<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "min:")?;
        for term in self.objective_terms() {
            write!(out, " {term}")?;
        }
        writeln!(out, " ;")?;
        writeln!(out, "{}", self.capacity_constraint())?;
        out.flush()
    }

    /// Total profit of the selected items.
    pub fn profit_of(&self, choices: &[bool]) -> i64 {
        self.items
            .iter()
            .zip(choices)
            .filter(|&(_, &take)| take)
            .map(|(it, _)| it.profit)
            .sum()
    }

    /// Total weight of the selected items.
    pub fn weight_of(&self, choices: &[bool]) -> i64 {
        self.items
            .iter()
            .zip(choices)
            .filter(|&(_, &take)| take)
            .map(|(it, _)| it.weight)
            .sum()
    }

    /// Optimal profit by a plain sparse DP over reachable weights.
    ///
    /// Shares no code with the certifier; used to cross-check its result.
    pub fn reference_optimum(&self) -> i64 {
        let mut best: BTreeMap<i64, i64> = BTreeMap::new();
        best.insert(0, 0);
        for it in &self.items {
            let mut next = best.clone();
            for (&w, &p) in &best {
                let w2 = w + it.weight;
                if w2 <= self.capacity {
                    let slot = next.entry(w2).or_insert(0);
                    *slot = (*slot).max(p + it.profit);
                }
            }
            best = next;
        }
        best.values().copied().max().unwrap_or(0)
    }
}

fn checked_sum(mut values: impl Iterator<Item = i64>) -> InstanceResult<i64> {
    values.try_fold(0i64, |acc, v| acc.checked_add(v).ok_or(InstanceError::Overflow))
}
