//! Hop pricing against the rule table.

use tracing::trace;

use crate::domain::{LineId, QueryTime};
use crate::network::HopKind;

use super::config::{OperationalRules, Rule};
use super::error::RulesError;

/// Cost of one hop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HopCost {
    /// Estimated minutes for the hop.
    pub minutes: u32,

    /// Same-line travel is suspended; the route may not continue this way.
    pub closed: bool,
}

impl Rule {
    /// Price a hop under this rule.
    ///
    /// Closure only blocks same-line rides. A transfer is always priced at
    /// the rule's transfer minutes, even on a closed line.
    pub fn cost(&self, hop: HopKind) -> HopCost {
        match hop {
            HopKind::SameLine if self.closed => HopCost {
                minutes: 0,
                closed: true,
            },
            HopKind::SameLine => HopCost {
                minutes: self.same_line_minutes,
                closed: false,
            },
            HopKind::Transfer => HopCost {
                minutes: self.transfer_minutes,
                closed: false,
            },
        }
    }
}

impl OperationalRules {
    /// Price a hop leaving a station on `line`.
    ///
    /// Without a query time routing is distance-only: every hop costs zero
    /// minutes and nothing is closed.
    pub fn estimate(
        &self,
        line: LineId,
        hop: HopKind,
        at: Option<&QueryTime>,
    ) -> Result<HopCost, RulesError> {
        let Some(at) = at else {
            return Ok(HopCost::default());
        };

        let cost = self.select(line, at)?.cost(hop);
        trace!(
            line = %line,
            ?hop,
            minutes = cost.minutes,
            closed = cost.closed,
            "priced hop"
        );
        Ok(cost)
    }

    /// Select the rule in force on `line` at `at`.
    ///
    /// The line's rule set (or the global fallback set when the line has
    /// none) is searched for the first matching window. Failing that, the
    /// line's own `default` rule applies, then the global `default` rule.
    pub fn select(&self, line: LineId, at: &QueryTime) -> Result<&Rule, RulesError> {
        let missing = || RulesError::MissingLineConfig {
            line: line.to_string(),
        };

        let set = self
            .lines
            .get(line.as_str())
            .or(self.fallback.as_ref())
            .ok_or_else(missing)?;

        set.matching(at)
            .or(set.default.as_ref())
            .or_else(|| self.fallback.as_ref().and_then(|f| f.default.as_ref()))
            .ok_or_else(missing)
    }
}
