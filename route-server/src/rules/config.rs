//! Rule table types and loading.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::{QueryTime, TimeWindow, is_weekday_name};

use super::error::RulesError;

/// Key of a line's fallback rule, and of the global fallback rule set.
pub const DEFAULT_KEY: &str = "default";

/// The rule table the service ships with.
const BUILTIN_RULES: &str = include_str!("../../data/operational_rules.json");

/// Pricing for one line during one window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rule {
    /// Minutes to ride to the neighbouring station on the same line.
    pub same_line_minutes: u32,

    /// Minutes to change to another line at an interchange.
    pub transfer_minutes: u32,

    /// Same-line travel is suspended while this rule applies.
    pub closed: bool,

    /// Weekdays the rule applies on, as full English names.
    /// Empty means every day. Matching is exact, so a misspelt
    /// day never matches.
    pub weekdays: Vec<String>,
}

impl Rule {
    /// Returns true if the rule applies on the query's weekday.
    pub fn applies_on(&self, at: &QueryTime) -> bool {
        self.weekdays.is_empty() || self.weekdays.iter().any(|d| d == at.weekday_name())
    }

    fn shares_a_day_with(&self, other: &Rule) -> bool {
        self.weekdays.is_empty()
            || other.weekdays.is_empty()
            || self.weekdays.iter().any(|d| other.weekdays.contains(d))
    }
}

/// A rule bound to a time window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRule {
    /// Window as written in the table, e.g. `"6:00AM - 9:00AM"`.
    pub label: String,
    pub window: TimeWindow,
    pub rule: Rule,
}

impl WindowRule {
    /// Returns true if the rule applies at the given time.
    pub fn matches(&self, at: &QueryTime) -> bool {
        self.window.contains(at) && self.rule.applies_on(at)
    }
}

/// All rules of one line, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineRuleSet {
    pub(super) windows: Vec<WindowRule>,
    pub(super) default: Option<Rule>,
}

impl LineRuleSet {
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a window rule after the existing ones.
    pub fn with_window(mut self, label: &str, rule: Rule) -> Result<Self, RulesError> {
        self.windows.push(WindowRule {
            label: label.to_string(),
            window: TimeWindow::parse(label)?,
            rule,
        });
        Ok(self)
    }

    /// Set the line's fallback rule.
    pub fn with_default(mut self, rule: Rule) -> Self {
        self.default = Some(rule);
        self
    }

    /// Window rules in evaluation order.
    pub fn windows(&self) -> &[WindowRule] {
        &self.windows
    }

    /// The line's own fallback rule.
    pub fn default_rule(&self) -> Option<&Rule> {
        self.default.as_ref()
    }

    /// First window rule matching the given time.
    pub fn matching(&self, at: &QueryTime) -> Option<&Rule> {
        self.windows
            .iter()
            .find(|w| w.matches(at))
            .map(|w| &w.rule)
    }

    /// Pairs of window labels that can match the same minute of the same day.
    ///
    /// Only the first declared of such a pair is ever selected where they
    /// overlap.
    pub fn overlapping_windows(&self) -> Vec<(&str, &str)> {
        let mut overlaps = Vec::new();
        for (i, a) in self.windows.iter().enumerate() {
            for b in &self.windows[i + 1..] {
                if a.window.overlaps(&b.window) && a.rule.shares_a_day_with(&b.rule) {
                    overlaps.push((a.label.as_str(), b.label.as_str()));
                }
            }
        }
        overlaps
    }

    fn unknown_weekdays(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.windows.iter().flat_map(|w| {
            w.rule
                .weekdays
                .iter()
                .filter(|d| !is_weekday_name(d))
                .map(move |d| (w.label.as_str(), d.as_str()))
        })
    }
}

/// The complete rule table.
///
/// Loaded once at startup and shared read-only by every query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationalRules {
    pub(super) lines: HashMap<String, LineRuleSet>,
    pub(super) fallback: Option<LineRuleSet>,
}

impl OperationalRules {
    /// Create an empty table. Every timed lookup against it fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// The rule table the service ships with.
    pub fn builtin() -> Result<Self, RulesError> {
        Self::from_json(BUILTIN_RULES)
    }

    /// Parse a rule table from JSON.
    ///
    /// Object key order is kept: it defines window evaluation order.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        let raw: Ordered<Ordered<Rule>> = serde_json::from_str(json)?;

        let mut rules = Self::new();
        for (line, entries) in raw.0 {
            let mut set = LineRuleSet::new();
            for (label, rule) in entries.0 {
                if label == DEFAULT_KEY {
                    set = set.with_default(rule);
                } else {
                    set = set.with_window(&label, rule)?;
                }
            }
            rules = rules.with_line(&line, set);
        }

        rules.validate();
        Ok(rules)
    }

    /// Read and parse a rule table file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RulesError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Set the rules of a line. The line `default` sets the global fallback.
    pub fn with_line(mut self, line: &str, set: LineRuleSet) -> Self {
        if line == DEFAULT_KEY {
            self.fallback = Some(set);
        } else {
            self.lines.insert(line.to_string(), set);
        }
        self
    }

    /// Rules of a specific line, without fallback.
    pub fn line(&self, line: &str) -> Option<&LineRuleSet> {
        self.lines.get(line)
    }

    /// The global fallback rule set.
    pub fn fallback(&self) -> Option<&LineRuleSet> {
        self.fallback.as_ref()
    }

    /// Log configuration defects. None of them stop the service.
    fn validate(&self) {
        let named = self
            .lines
            .iter()
            .map(|(line, set)| (line.as_str(), set))
            .chain(self.fallback.as_ref().map(|set| (DEFAULT_KEY, set)));

        for (line, set) in named {
            for (first, second) in set.overlapping_windows() {
                warn!(
                    line,
                    first, second, "overlapping rule windows, first declared wins"
                );
            }
            for (window, day) in set.unknown_weekdays() {
                warn!(line, window, day, "unknown weekday name in rule, it will never match");
            }
        }

        info!(
            lines = self.lines.len(),
            fallback = self.fallback.is_some(),
            "operational rules loaded"
        );
    }
}

/// A JSON object read as an ordered list of entries.
struct Ordered<V>(Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Ordered<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedVisitor<V> {
            type Value = Ordered<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(entry) = access.next_entry::<String, V>()? {
                    entries.push(entry);
                }
                Ok(Ordered(entries))
            }
        }

        deserializer.deserialize_map(OrderedVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_table_loads() {
        let rules = OperationalRules::builtin().unwrap();

        for line in ["NS", "NE", "DT", "CG", "CE", "TE"] {
            assert!(rules.line(line).is_some(), "missing {line}");
        }
        assert!(rules.line("EW").is_none());

        let fallback = rules.fallback().unwrap();
        assert_eq!(fallback.windows().len(), 4);
        assert_eq!(
            fallback.default_rule(),
            Some(&Rule {
                same_line_minutes: 10,
                transfer_minutes: 10,
                closed: false,
                weekdays: vec![],
            })
        );
    }

    #[test]
    fn windows_keep_declaration_order() {
        let rules = OperationalRules::from_json(
            r#"{
                "DT": {
                    "6:00PM - 9:00PM": { "sameLineMinutes": 10 },
                    "default": { "sameLineMinutes": 8 },
                    "6:00AM - 9:00AM": { "sameLineMinutes": 10 },
                    "10:00PM - 11:59PM": { "closed": true }
                }
            }"#,
        )
        .unwrap();

        let labels: Vec<_> = rules
            .line("DT")
            .unwrap()
            .windows()
            .iter()
            .map(|w| w.label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec!["6:00PM - 9:00PM", "6:00AM - 9:00AM", "10:00PM - 11:59PM"]
        );
        assert_eq!(
            rules.line("DT").unwrap().default_rule().unwrap().same_line_minutes,
            8
        );
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let rules = OperationalRules::from_json(r#"{ "CG": { "default": {} } }"#).unwrap();
        assert_eq!(
            rules.line("CG").unwrap().default_rule(),
            Some(&Rule::default())
        );
    }

    #[test]
    fn malformed_window_is_rejected() {
        let err = OperationalRules::from_json(r#"{ "NS": { "mornings": {} } }"#).unwrap_err();
        assert!(matches!(err, RulesError::InvalidTimeWindow(_)));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = OperationalRules::from_json(r#"{ "NS": [] }"#).unwrap_err();
        assert!(matches!(err, RulesError::Json(_)));
    }

    #[test]
    fn detects_overlapping_windows() {
        let set = LineRuleSet::new()
            .with_window(
                "6:00AM - 9:00AM",
                Rule {
                    weekdays: vec!["Monday".into()],
                    ..Rule::default()
                },
            )
            .unwrap()
            .with_window(
                "8:00AM - 10:00AM",
                Rule {
                    weekdays: vec!["Monday".into(), "Tuesday".into()],
                    ..Rule::default()
                },
            )
            .unwrap()
            .with_window(
                "8:30AM - 9:30AM",
                Rule {
                    weekdays: vec!["Sunday".into()],
                    ..Rule::default()
                },
            )
            .unwrap();

        assert_eq!(
            set.overlapping_windows(),
            vec![("6:00AM - 9:00AM", "8:00AM - 10:00AM")]
        );
    }

    #[test]
    fn empty_weekdays_overlap_every_day() {
        let set = LineRuleSet::new()
            .with_window("6:00AM - 9:00AM", Rule::default())
            .unwrap()
            .with_window(
                "7:00AM - 8:00AM",
                Rule {
                    weekdays: vec!["Saturday".into()],
                    ..Rule::default()
                },
            )
            .unwrap();
        assert_eq!(set.overlapping_windows().len(), 1);
    }

    #[test]
    fn builtin_table_overlaps_only_at_six_am() {
        let rules = OperationalRules::builtin().unwrap();
        let mut found = 0;
        for set in rules.lines.values().chain(rules.fallback.iter()) {
            for (a, b) in set.overlapping_windows() {
                found += 1;
                let touching = (a.ends_with("- 6:00AM") && b.starts_with("6:00AM"))
                    || (b.ends_with("- 6:00AM") && a.starts_with("6:00AM"));
                assert!(touching, "unexpected overlap {a} / {b}");
            }
        }
        // DT, TE and the fallback set each pair the night window with the morning peak
        assert_eq!(found, 3);
    }

    #[test]
    fn misspelt_weekday_is_kept_verbatim() {
        let rules = OperationalRules::builtin().unwrap();
        let night = rules
            .fallback()
            .unwrap()
            .windows()
            .iter()
            .find(|w| w.label == "12:00AM - 6:00AM")
            .unwrap();

        assert!(night.rule.weekdays.iter().any(|d| d == "Fri"));
        let unknown: Vec<_> = rules.fallback().unwrap().unknown_weekdays().collect();
        assert_eq!(unknown, vec![("12:00AM - 6:00AM", "Fri")]);
    }

    #[test]
    fn weekday_matching() {
        let rule = Rule {
            weekdays: vec!["Saturday".into(), "Sunday".into()],
            ..Rule::default()
        };
        // 2019-02-02 is a Saturday, 2019-02-04 a Monday
        assert!(rule.applies_on(&QueryTime::parse("2019-02-02T10:00").unwrap()));
        assert!(!rule.applies_on(&QueryTime::parse("2019-02-04T10:00").unwrap()));
        assert!(Rule::default().applies_on(&QueryTime::parse("2019-02-04T10:00").unwrap()));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "default": { "default": { "sameLineMinutes": 3 } } }"#)
            .unwrap();

        let rules = OperationalRules::from_path(file.path()).unwrap();
        assert!(rules.lines.is_empty());
        assert_eq!(
            rules.fallback().unwrap().default_rule().unwrap().same_line_minutes,
            3
        );
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = OperationalRules::from_path(dir.path().join("rules.json")).unwrap_err();
        assert!(matches!(err, RulesError::Io { .. }));
    }
}
