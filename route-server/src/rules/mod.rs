//! Operational rules: per-line, time-windowed hop pricing.
//!
//! Each line has a list of windows (peak hours, night closures) and an
//! optional `default` rule. Lines without an entry use the global `default`
//! rule set. Windows are evaluated in declaration order and the first match
//! wins.

mod config;
mod engine;
mod error;

pub use config::{DEFAULT_KEY, LineRuleSet, OperationalRules, Rule, WindowRule};
pub use engine::HopCost;
pub use error::RulesError;
