//! knapcert Opt - Certified 0/1 Knapsack Optimization
//!
//! This crate solves 0/1 knapsack instances with a layered dynamic program
//! over `(weight sum, profit sum)` states and writes a VeriPB proof of the
//! optimum along the way:
//! - Extension variables name partial-sum thresholds and their conjunctions
//! - Every transition and every dominance pruning is justified in the proof
//! - The final layer yields the optimal profit, a witness and the bound
//!
//! # Examples
//!
//! ```
//! use knapcert_opt::{Certifier, KnapsackInstance};
//!
//! let instance = KnapsackInstance::new(&[2, 3], &[3, 4], 4).unwrap();
//!
//! let mut opb = Vec::new();
//! instance.write_opb(&mut opb).unwrap();
//! assert_eq!(String::from_utf8(opb).unwrap(), "min: -3 x0 -4 x1 ;\n-2 x0 -3 x1 >= -4 ;\n");
//!
//! let (certificate, proof) = Certifier::new().certify_to(&instance, Vec::new()).unwrap();
//! assert_eq!(certificate.optimum(), Some(4));
//! assert_eq!(certificate.stats.summary_line(), "3 5 6");
//! assert!(String::from_utf8(proof).unwrap().contains("conclusion BOUNDS -4 -4"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod certify;
pub mod dominance;
pub mod error;
pub mod finalize;
pub mod instance;
pub mod layer;
pub mod symbols;
pub mod transition;
pub mod var;

pub use certify::{CertifyConfig, Certificate, Certifier, SearchStats};
pub use dominance::{DominanceReducer, DominanceStats, dominated_states, is_antichain};
pub use error::{CertifyError, CertifyResult, InstanceError, InstanceResult};
pub use finalize::{Finalizer, Outcome};
pub use instance::{Item, KnapsackInstance};
pub use layer::{Layer, State, StateStore};
pub use symbols::{ExtVar, StateVars, Symbol, SymbolTable};
pub use transition::{TransitionBuilder, TransitionOutcome};
pub use var::{ExtKey, SumKind, Var};
