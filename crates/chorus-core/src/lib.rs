pub mod action;
pub mod agent;
pub mod compare;
pub mod crit;
pub mod lookahead;
pub mod select;

// Contract surface
pub use action::{Action, ActionSet};
pub use agent::Agent;

// Criticality types
pub use compare::compare_vectors;
pub use crit::Crit;

// Decision procedures
pub use lookahead::{decide_to_depth, Lookahead};
pub use select::{best_action, decide};
