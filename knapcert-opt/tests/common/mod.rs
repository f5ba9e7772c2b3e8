//! Shared helpers for knapcert-opt integration tests
//!
//! - `replay`: a text-level pass over a proof checking numbering,
//!   defined-before-use and deleted references
//! - `check_semantics`: every `red`/`rup` constraint must hold under every
//!   feasible assignment extended with the intended meaning of the
//!   extension variables
//! - `check_derivations`: every `pol` followed by a clause `rup` must
//!   imply that clause on its own

#![allow(dead_code)]

use knapcert_opt::{CertifyConfig, Certificate, Certifier, KnapsackInstance};
use std::collections::{HashMap, HashSet};

/// One parsed `coeff lit` term.
#[derive(Debug, Clone)]
pub struct ParsedTerm {
    pub coeff: i64,
    pub negated: bool,
    pub var: String,
}

/// A parsed `red` or `rup` constraint.
#[derive(Debug, Clone)]
pub struct ParsedConstraint {
    pub id: u64,
    pub terms: Vec<ParsedTerm>,
    pub bound: i64,
    pub line: String,
}

/// A parsed `pol` statement.
#[derive(Debug, Clone)]
pub struct ParsedPol {
    pub id: u64,
    pub tokens: Vec<String>,
    pub line: String,
}

/// What a replay learned about a proof.
#[derive(Debug, Default)]
pub struct Replay {
    pub statements: u64,
    pub last_id: u64,
    pub constraints: Vec<ParsedConstraint>,
    pub pols: Vec<ParsedPol>,
    pub deletions: Vec<(u64, u64)>,
    pub solution: Option<Vec<bool>>,
    pub conclusion: Option<String>,
    pub defined: HashSet<String>,
}

pub fn certify_text(instance: &KnapsackInstance, config: CertifyConfig) -> (Certificate, String) {
    let (cert, out) = Certifier::with_config(config)
        .certify_to(instance, Vec::new())
        .unwrap();
    (cert, String::from_utf8(out).unwrap())
}

fn parse_lit(token: &str) -> (bool, String) {
    match token.strip_prefix('~') {
        Some(var) => (true, var.to_string()),
        None => (false, token.to_string()),
    }
}

fn is_item(var: &str) -> bool {
    var.strip_prefix('x')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

/// Parse `c l c l ... >= b ;` (the trailing `;` may already be stripped).
fn parse_constraint(text: &str) -> Result<(Vec<ParsedTerm>, i64), String> {
    let (lhs, rhs) = text
        .split_once(">=")
        .ok_or_else(|| format!("no '>=' in '{text}'"))?;
    let bound = rhs
        .trim()
        .trim_end_matches(';')
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("bad bound in '{text}': {e}"))?;
    let tokens: Vec<&str> = lhs.split_whitespace().collect();
    if tokens.len() % 2 != 0 {
        return Err(format!("odd term list in '{text}'"));
    }
    let mut terms = Vec::new();
    for pair in tokens.chunks(2) {
        let coeff = pair[0]
            .parse::<i64>()
            .map_err(|e| format!("bad coefficient '{}': {e}", pair[0]))?;
        let (negated, var) = parse_lit(pair[1]);
        terms.push(ParsedTerm {
            coeff,
            negated,
            var,
        });
    }
    Ok((terms, bound))
}

fn check_defined(terms: &[ParsedTerm], defined: &HashSet<String>, line: &str) -> Result<(), String> {
    for t in terms {
        if !is_item(&t.var) && !defined.contains(&t.var) {
            return Err(format!("'{}' used before definition in '{line}'", t.var));
        }
    }
    Ok(())
}

fn is_deleted(deletions: &[(u64, u64)], id: u64) -> bool {
    deletions.iter().any(|&(a, b)| a <= id && id <= b)
}

/// Replay a proof written against an instance with one input constraint.
pub fn replay(text: &str) -> Result<Replay, String> {
    let mut lines = text.lines();
    if lines.next() != Some("pseudo-Boolean proof version 2.0") {
        return Err("missing header".to_string());
    }

    let mut r = Replay {
        last_id: 1,
        ..Replay::default()
    };
    let mut ended = false;

    for line in lines {
        if ended {
            return Err(format!("'{line}' after end of proof"));
        }
        if r.conclusion.is_some() && line != "end pseudo-Boolean proof" {
            return Err(format!("'{line}' after conclusion"));
        }
        let (head, rest) = line.split_once(' ').unwrap_or((line, ""));
        match head {
            "red" => {
                let (constraint, witness) = rest
                    .split_once(';')
                    .ok_or_else(|| format!("no witness in '{line}'"))?;
                let (terms, bound) = parse_constraint(constraint)?;
                let var = witness
                    .split_whitespace()
                    .next()
                    .ok_or_else(|| format!("empty witness in '{line}'"))?
                    .to_string();
                let mut scope = r.defined.clone();
                scope.insert(var.clone());
                check_defined(&terms, &scope, line)?;
                r.defined.insert(var);
                r.last_id += 1;
                r.constraints.push(ParsedConstraint {
                    id: r.last_id,
                    terms,
                    bound,
                    line: line.to_string(),
                });
            }
            "rup" => {
                let (terms, bound) = parse_constraint(rest)?;
                check_defined(&terms, &r.defined, line)?;
                r.last_id += 1;
                r.constraints.push(ParsedConstraint {
                    id: r.last_id,
                    terms,
                    bound,
                    line: line.to_string(),
                });
            }
            "pol" => {
                let tokens: Vec<&str> = rest.split_whitespace().collect();
                for (i, tok) in tokens.iter().enumerate() {
                    if matches!(*tok, "+" | "s" | "*") || tokens.get(i + 1) == Some(&"*") {
                        continue;
                    }
                    let raw: i64 = tok
                        .parse()
                        .map_err(|e| format!("bad reference '{tok}' in '{line}': {e}"))?;
                    let id = if raw < 0 {
                        r.last_id as i64 + 1 + raw
                    } else {
                        raw
                    };
                    if id < 1 || id as u64 > r.last_id {
                        return Err(format!("reference {raw} out of range in '{line}'"));
                    }
                    if is_deleted(&r.deletions, id as u64) {
                        return Err(format!("reference to deleted {id} in '{line}'"));
                    }
                }
                r.last_id += 1;
                r.pols.push(ParsedPol {
                    id: r.last_id,
                    tokens: tokens.iter().map(|t| t.to_string()).collect(),
                    line: line.to_string(),
                });
            }
            "del" => {
                let tokens: Vec<&str> = rest.split_whitespace().collect();
                let (a, b) = match tokens.as_slice() {
                    ["range", a, b] => (
                        a.parse::<u64>().map_err(|e| e.to_string())?,
                        b.parse::<u64>().map_err(|e| e.to_string())?,
                    ),
                    _ => return Err(format!("bad deletion '{line}'")),
                };
                if a < 1 || a > b || b > r.last_id {
                    return Err(format!("bad range in '{line}' (last {})", r.last_id));
                }
                r.deletions.push((a, b));
            }
            "soli" => {
                let mut assignment = Vec::new();
                for (i, tok) in rest.split_whitespace().enumerate() {
                    let (negated, var) = parse_lit(tok);
                    if var != format!("x{i}") {
                        return Err(format!("unexpected '{tok}' in '{line}'"));
                    }
                    assignment.push(!negated);
                }
                r.solution = Some(assignment);
                r.last_id += 1;
            }
            "output" => {
                if rest != "NONE" {
                    return Err(format!("unexpected '{line}'"));
                }
                continue;
            }
            "conclusion" => {
                r.conclusion = Some(rest.to_string());
                continue;
            }
            "end" => {
                if rest != "pseudo-Boolean proof" {
                    return Err(format!("unexpected '{line}'"));
                }
                ended = true;
                continue;
            }
            _ => return Err(format!("unknown statement '{line}'")),
        }
        r.statements += 1;
    }

    if !ended {
        return Err("proof is not terminated".to_string());
    }
    Ok(r)
}

fn prefix_sum(values: impl Iterator<Item = i64>, x: &[bool], layer: usize) -> i64 {
    values
        .zip(x)
        .take(layer)
        .filter(|&(_, &take)| take)
        .map(|(v, _)| v)
        .sum()
}

/// Intended truth value of a proof variable under item assignment `x`.
pub fn eval_var(instance: &KnapsackInstance, var: &str, x: &[bool]) -> Result<bool, String> {
    let weights = || instance.items().iter().map(|it| it.weight);
    let profits = || instance.items().iter().map(|it| it.profit);
    let nums = |rest: &str| -> Result<Vec<i64>, String> {
        rest.split('_')
            .map(|n| n.parse::<i64>().map_err(|e| format!("bad name '{var}': {e}")))
            .collect()
    };
    let (kind, rest) = var.split_at(1);
    match (kind, nums(rest)?.as_slice()) {
        ("x", [i]) => Ok(x[*i as usize]),
        ("w", [l, v]) => Ok(prefix_sum(weights(), x, *l as usize) >= *v),
        ("p", [l, v]) => Ok(prefix_sum(profits(), x, *l as usize) <= *v),
        ("c", [l, w, p]) => Ok(prefix_sum(weights(), x, *l as usize) >= *w
            && prefix_sum(profits(), x, *l as usize) <= *p),
        _ => Err(format!("unknown variable '{var}'")),
    }
}

/// Every recorded constraint must hold for every feasible assignment.
pub fn check_semantics(instance: &KnapsackInstance, replay: &Replay) -> Result<(), String> {
    let n = instance.len();
    assert!(n <= 12, "semantic check enumerates all assignments");
    for mask in 0u32..(1 << n) {
        let x: Vec<bool> = (0..n).map(|i| mask & (1 << i) != 0).collect();
        if instance.weight_of(&x) > instance.capacity() {
            continue;
        }
        for c in &replay.constraints {
            let mut lhs = 0;
            for t in &c.terms {
                if eval_var(instance, &t.var, &x)? != t.negated {
                    lhs += t.coeff;
                }
            }
            if lhs < c.bound {
                return Err(format!(
                    "constraint {} '{}' fails under {x:?}",
                    c.id, c.line
                ));
            }
        }
    }
    Ok(())
}

/// A constraint `sum coeff * var >= bound` over positive literals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearForm {
    pub coeffs: HashMap<String, i64>,
    pub bound: i64,
}

impl LinearForm {
    fn from_terms(terms: &[ParsedTerm], bound: i64) -> Self {
        let mut form = Self {
            bound,
            ..Self::default()
        };
        for t in terms {
            if t.negated {
                // c * ~v = c - c * v
                form.bound -= t.coeff;
                form.add_term(&t.var, -t.coeff);
            } else {
                form.add_term(&t.var, t.coeff);
            }
        }
        form
    }

    fn add_term(&mut self, var: &str, coeff: i64) {
        let entry = self.coeffs.entry(var.to_string()).or_insert(0);
        *entry += coeff;
        if *entry == 0 {
            self.coeffs.remove(var);
        }
    }

    fn add(mut self, other: &Self) -> Self {
        for (var, &coeff) in &other.coeffs {
            self.add_term(var, coeff);
        }
        self.bound += other.bound;
        self
    }

    fn multiply(mut self, factor: i64) -> Self {
        for coeff in self.coeffs.values_mut() {
            *coeff *= factor;
        }
        self.bound *= factor;
        self
    }

    /// Clamp every coefficient to the bound of the normalized form.
    fn saturate(mut self) -> Self {
        let normalized: i64 =
            self.bound + self.coeffs.values().filter(|&&c| c < 0).map(|c| -c).sum::<i64>();
        if normalized <= 0 {
            return self;
        }
        let mut bound = normalized;
        for coeff in self.coeffs.values_mut() {
            let clamped = coeff.abs().min(normalized);
            if *coeff < 0 {
                *coeff = -clamped;
                bound -= clamped;
            } else {
                *coeff = clamped;
            }
        }
        self.bound = bound;
        self
    }

    /// Whether no completion of the partial assignment `fixed` satisfies it.
    fn refuted_by(&self, fixed: &HashMap<String, bool>) -> bool {
        let best: i64 = self
            .coeffs
            .iter()
            .map(|(var, &coeff)| match fixed.get(var) {
                Some(&true) => coeff,
                Some(&false) => 0,
                None => coeff.max(0),
            })
            .sum();
        best < self.bound
    }
}

/// The sums a conjunction `c<l>_<w>_<p>` stands for.
fn conjunction_parts(var: &str) -> Option<(String, String)> {
    let rest = var.strip_prefix('c')?;
    let mut parts = rest.split('_');
    let (l, w, p) = (parts.next()?, parts.next()?, parts.next()?);
    Some((format!("w{l}_{w}"), format!("p{l}_{p}")))
}

/// Assign `var := value`; false on a clash with an earlier assignment.
fn fix(fixed: &mut HashMap<String, bool>, var: String, value: bool) -> bool {
    *fixed.entry(var).or_insert(value) == value
}

/// Evaluate a `pol` against the forms known so far; `None` when it reads
/// a constraint without a form.
fn eval_pol(
    pol: &ParsedPol,
    forms: &HashMap<u64, LinearForm>,
) -> Result<Option<LinearForm>, String> {
    let mut stack: Vec<LinearForm> = Vec::new();
    let mut scalar = None;
    for (i, tok) in pol.tokens.iter().enumerate() {
        match tok.as_str() {
            "+" => {
                let (b, a) = (stack.pop(), stack.pop());
                match (a, b) {
                    (Some(a), Some(b)) => stack.push(a.add(&b)),
                    _ => return Err(format!("stack underflow in '{}'", pol.line)),
                }
            }
            "s" => {
                let top = stack.pop().ok_or_else(|| format!("empty stack in '{}'", pol.line))?;
                stack.push(top.saturate());
            }
            "*" => {
                let (Some(top), Some(k)) = (stack.pop(), scalar.take()) else {
                    return Err(format!("bad multiplication in '{}'", pol.line));
                };
                stack.push(top.multiply(k));
            }
            _ if pol.tokens.get(i + 1).map(String::as_str) == Some("*") => {
                scalar = Some(tok.parse::<i64>().map_err(|e| e.to_string())?);
            }
            _ => {
                let raw: i64 = tok.parse().map_err(|e| format!("bad reference '{tok}': {e}"))?;
                let id = (if raw < 0 { pol.id as i64 + raw } else { raw }) as u64;
                match forms.get(&id) {
                    Some(form) => stack.push(form.clone()),
                    None => return Ok(None),
                }
            }
        }
    }
    match (stack.pop(), stack.is_empty()) {
        (Some(result), true) => Ok(Some(result)),
        _ => Err(format!("unbalanced '{}'", pol.line)),
    }
}

/// Every `pol` immediately followed by a clause `rup` must refute the
/// negation of that clause, with conjunctions unfolded into their sums.
///
/// Returns the number of checked derivations.
pub fn check_derivations(instance: &KnapsackInstance, replay: &Replay) -> Result<usize, String> {
    let mut forms: HashMap<u64, LinearForm> = HashMap::new();
    let mut capacity = LinearForm {
        bound: -instance.capacity(),
        ..LinearForm::default()
    };
    for (i, item) in instance.items().iter().enumerate() {
        capacity.add_term(&format!("x{i}"), -item.weight);
    }
    forms.insert(1, capacity);
    for c in &replay.constraints {
        forms.insert(c.id, LinearForm::from_terms(&c.terms, c.bound));
    }
    let rups: HashMap<u64, &ParsedConstraint> = replay
        .constraints
        .iter()
        .filter(|c| c.line.starts_with("rup "))
        .map(|c| (c.id, c))
        .collect();

    let mut checked = 0;
    for pol in &replay.pols {
        // soli constraints have no form
        let Some(result) = eval_pol(pol, &forms)? else {
            continue;
        };
        forms.insert(pol.id, result.clone());

        let Some(rup) = rups.get(&(pol.id + 1)) else {
            continue;
        };
        if rup.bound != 1 || rup.terms.iter().any(|t| t.coeff != 1) {
            continue;
        }

        let mut fixed = HashMap::new();
        let mut consistent = true;
        for t in &rup.terms {
            consistent &= fix(&mut fixed, t.var.clone(), t.negated);
            if t.negated
                && let Some((w, p)) = conjunction_parts(&t.var)
            {
                consistent &= fix(&mut fixed, w, true);
                consistent &= fix(&mut fixed, p, true);
            }
        }
        if consistent && !result.refuted_by(&fixed) {
            return Err(format!(
                "'{}' does not imply '{}' (result {result:?})",
                pol.line, rup.line
            ));
        }
        checked += 1;
    }
    Ok(checked)
}

/// Optimum by enumerating all assignments.
pub fn brute_force(weights: &[i64], profits: &[i64], capacity: i64) -> i64 {
    let n = weights.len();
    (0u32..(1 << n))
        .filter_map(|mask| {
            let picked = (0..n).filter(|i| mask & (1 << i) != 0);
            let w: i64 = picked.clone().map(|i| weights[i]).sum();
            let p: i64 = picked.map(|i| profits[i]).sum();
            (w <= capacity).then_some(p)
        })
        .max()
        .unwrap_or(0)
}
