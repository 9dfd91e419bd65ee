//! Declarative scenarios for replaying action sequencing, and the trace a
//! replay produces.
//!
//! A scenario is a timeline of actions enqueued by "outside" code. Each action
//! may enqueue children during its turn, wait on a timer (optionally inside a
//! suspension bracket), enqueue more children once the wait resolves, and then
//! complete. The replay engine lives in `actionq-runtime`.

use crate::config::RunnerConfig;
use crate::error::{ActionqError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    /// Seed the `at_ms: 0` actions from inside a root action, so they queue
    /// behind it instead of the first one running immediately.
    #[serde(default)]
    pub batch_initial: bool,
    /// Close the sequencer at this time, after that instant's actions are enqueued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_at_ms: Option<u64>,
    #[serde(default)]
    pub schedule: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(default)]
    pub at_ms: u64,
    pub actions: Vec<ActionSpec>,
}

/// One action and everything it does when it runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSpec {
    pub label: String,
    /// Enqueued synchronously during the action's own turn.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ActionSpec>,
    /// Wait on a timer before completing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait: Option<Wait>,
    /// Enqueued once the wait resolves, just before completing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub then: Vec<ActionSpec>,
    /// `false` models an action that never signals completion.
    #[serde(default = "default_complete")]
    pub complete: bool,
}

fn default_complete() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wait {
    pub ms: u64,
    /// Bracket the wait with a suspension. Without it, anything enqueued by
    /// outside code during the wait nests under this action.
    #[serde(default = "default_suspend")]
    pub suspend: bool,
}

fn default_suspend() -> bool {
    true
}

impl ActionSpec {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
            wait: None,
            then: Vec::new(),
            complete: true,
        }
    }

    /// Visit this action and every nested child depth-first.
    pub fn walk<'a>(&'a self, out: &mut Vec<&'a ActionSpec>) {
        out.push(self);
        for child in self.children.iter().chain(self.then.iter()) {
            child.walk(out);
        }
    }
}

impl Scenario {
    pub fn from_yaml(data: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(data)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml(&data)
    }

    /// Every action in the scenario, in declaration order.
    pub fn actions(&self) -> Vec<&ActionSpec> {
        let mut out = Vec::new();
        for entry in &self.schedule {
            for action in &entry.actions {
                action.walk(&mut out);
            }
        }
        out
    }

    /// Schedule entries sorted by time. Entries sharing a time keep file order.
    pub fn timeline(&self) -> Vec<&ScheduleEntry> {
        let mut entries: Vec<&ScheduleEntry> = self.schedule.iter().collect();
        entries.sort_by_key(|e| e.at_ms);
        entries
    }

    pub fn validate(&self, cfg: &RunnerConfig) -> Result<()> {
        if self.schedule.iter().all(|e| e.actions.is_empty()) {
            return Err(ActionqError::InvalidScenario(
                "schedule contains no actions".to_string(),
            ));
        }

        for entry in &self.schedule {
            if entry.at_ms > cfg.max_delay_ms {
                return Err(ActionqError::DelayTooLarge {
                    label: entry
                        .actions
                        .first()
                        .map(|a| a.label.clone())
                        .unwrap_or_default(),
                    what: "at_ms",
                    ms: entry.at_ms,
                    max: cfg.max_delay_ms,
                });
            }
        }
        if let Some(ms) = self.close_at_ms {
            if ms > cfg.max_delay_ms {
                return Err(ActionqError::DelayTooLarge {
                    label: "close".to_string(),
                    what: "close_at_ms",
                    ms,
                    max: cfg.max_delay_ms,
                });
            }
        }

        let mut seen = HashSet::new();
        for action in self.actions() {
            if action.label.trim().is_empty() {
                return Err(ActionqError::InvalidScenario(
                    "action label must not be empty".to_string(),
                ));
            }
            if !seen.insert(action.label.as_str()) {
                return Err(ActionqError::DuplicateLabel(action.label.clone()));
            }
            match &action.wait {
                Some(wait) if wait.ms > cfg.max_delay_ms => {
                    return Err(ActionqError::DelayTooLarge {
                        label: action.label.clone(),
                        what: "wait",
                        ms: wait.ms,
                        max: cfg.max_delay_ms,
                    });
                }
                None if !action.then.is_empty() => {
                    return Err(ActionqError::InvalidScenario(format!(
                        "'{}' has `then` actions but no `wait`",
                        action.label
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Trace
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Started,
    Completed,
    Suspended,
    Resumed,
    /// Enqueued after close; the sequencer discarded it.
    Dropped,
    Closed,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Completed => "completed",
            Self::Suspended => "suspended",
            Self::Resumed => "resumed",
            Self::Dropped => "dropped",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub at_ms: u64,
    pub label: String,
    pub kind: EventKind,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario: Option<String>,
    pub events: Vec<TraceEvent>,
    /// The sequencer was still active once every timer had fired.
    pub stalled: bool,
    /// Records left queued at the end of the replay.
    pub pending: usize,
}

impl Trace {
    /// Labels in the order their actions started.
    pub fn start_order(&self) -> Vec<&str> {
        self.events_of(EventKind::Started)
    }

    pub fn events_of(&self, kind: EventKind) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.label.as_str())
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED: &str = r#"
name: nested
batch_initial: true
schedule:
  - actions:
      - label: a
        children:
          - label: a1
            wait: { ms: 10, suspend: false }
      - label: b
        wait: { ms: 5 }
        then:
          - label: b1
"#;

    #[test]
    fn parse_applies_defaults() {
        let s = Scenario::from_yaml(NESTED).unwrap();
        assert_eq!(s.name.as_deref(), Some("nested"));
        assert!(s.batch_initial);
        assert_eq!(s.schedule[0].at_ms, 0);

        let b = &s.schedule[0].actions[1];
        assert!(b.complete);
        assert_eq!(b.wait, Some(Wait { ms: 5, suspend: true }));
        assert_eq!(b.then[0].label, "b1");

        let a1 = &s.schedule[0].actions[0].children[0];
        assert!(!a1.wait.as_ref().unwrap().suspend);
    }

    #[test]
    fn actions_walks_children_and_then() {
        let s = Scenario::from_yaml(NESTED).unwrap();
        let labels: Vec<&str> = s.actions().iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "a1", "b", "b1"]);
    }

    #[test]
    fn timeline_is_stable_by_time() {
        let s = Scenario::from_yaml(
            r#"
schedule:
  - at_ms: 200
    actions: [{ label: late }]
  - actions: [{ label: first }]
  - actions: [{ label: second }]
"#,
        )
        .unwrap();
        let order: Vec<&str> = s
            .timeline()
            .iter()
            .map(|e| e.actions[0].label.as_str())
            .collect();
        assert_eq!(order, vec!["first", "second", "late"]);
    }

    #[test]
    fn validate_accepts_well_formed() {
        let s = Scenario::from_yaml(NESTED).unwrap();
        assert!(s.validate(&RunnerConfig::default()).is_ok());
    }

    #[test]
    fn validate_rejects_duplicate_labels() {
        let s = Scenario::from_yaml(
            "schedule:\n  - actions:\n      - label: a\n        children: [{ label: a }]\n",
        )
        .unwrap();
        let err = s.validate(&RunnerConfig::default()).unwrap_err();
        assert!(matches!(err, ActionqError::DuplicateLabel(l) if l == "a"));
    }

    #[test]
    fn validate_rejects_then_without_wait() {
        let s = Scenario::from_yaml(
            "schedule:\n  - actions:\n      - label: a\n        then: [{ label: b }]\n",
        )
        .unwrap();
        let err = s.validate(&RunnerConfig::default()).unwrap_err();
        assert!(err.to_string().contains("no `wait`"));
    }

    #[test]
    fn validate_rejects_long_delays() {
        let cfg = RunnerConfig {
            max_delay_ms: 100,
            ..RunnerConfig::default()
        };
        let s = Scenario::from_yaml(
            "schedule:\n  - actions:\n      - label: slow\n        wait: { ms: 101 }\n",
        )
        .unwrap();
        let err = s.validate(&cfg).unwrap_err();
        assert!(err.to_string().contains("exceeds max_delay_ms=100"));

        let s = Scenario::from_yaml("schedule:\n  - at_ms: 500\n    actions: [{ label: x }]\n")
            .unwrap();
        assert!(matches!(
            s.validate(&cfg),
            Err(ActionqError::DelayTooLarge { what: "at_ms", .. })
        ));
    }

    #[test]
    fn validate_rejects_empty_schedule_and_labels() {
        let empty = Scenario::from_yaml("schedule: []").unwrap();
        assert!(empty.validate(&RunnerConfig::default()).is_err());

        let blank = Scenario::from_yaml("schedule:\n  - actions: [{ label: ' ' }]\n").unwrap();
        assert!(matches!(
            blank.validate(&RunnerConfig::default()),
            Err(ActionqError::InvalidScenario(_))
        ));
    }

    #[test]
    fn trace_json_uses_snake_case_kinds() {
        let trace = Trace {
            scenario: Some("t".to_string()),
            events: vec![TraceEvent {
                at_ms: 3,
                label: "a".to_string(),
                kind: EventKind::Started,
            }],
            stalled: false,
            pending: 0,
        };
        let json = trace.to_json().unwrap();
        assert!(json.contains("\"kind\": \"started\""));
        assert_eq!(trace.start_order(), vec!["a"]);
    }
}
