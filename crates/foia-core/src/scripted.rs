//! Scripted engine for tests and the demo binary.
//!
//! A configurable in-memory [`QueryEngine`] that records all calls and
//! replays pre-configured responses. The corpus seed is stored verbatim,
//! never parsed.

use serde::{Deserialize, Serialize};

use crate::engine::{CorpusSeed, EngineError, EngineEvent, QueryEngine, QueryResult};

/// A recorded call to the scripted engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedCall {
    Drain,
    Submit { input: String, year: i32 },
}

/// A replayable engine script: the startup backlog plus a FIFO of query
/// results, one per expected submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub startup_events: Vec<EngineEvent>,
    #[serde(default)]
    pub query_results: Vec<QueryResult>,
}

impl Scenario {
    /// Parse a scenario document from JSON.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }
}

/// Scripted implementation of [`QueryEngine`].
pub struct ScriptedEngine {
    seed: CorpusSeed,
    startup_events: Vec<EngineEvent>,
    query_results: std::collections::VecDeque<QueryResult>,
    calls: Vec<ScriptedCall>,
    drain_error: Option<EngineError>,
    query_error: Option<EngineError>,
}

impl ScriptedEngine {
    #[must_use]
    pub fn new(seed: CorpusSeed, scenario: Scenario) -> Self {
        Self {
            seed,
            startup_events: scenario.startup_events,
            query_results: scenario.query_results.into(),
            calls: Vec::new(),
            drain_error: None,
            query_error: None,
        }
    }

    /// Configure `drain_events` to fail.
    #[must_use]
    pub fn with_drain_error(mut self, err: EngineError) -> Self {
        self.drain_error = Some(err);
        self
    }

    /// Configure `submit_query` to fail.
    #[must_use]
    pub fn with_query_error(mut self, err: EngineError) -> Self {
        self.query_error = Some(err);
        self
    }

    /// The seed handed over at construction, byte for byte.
    #[must_use]
    pub fn seed(&self) -> &CorpusSeed {
        &self.seed
    }

    /// All recorded calls, in order.
    #[must_use]
    pub fn calls(&self) -> &[ScriptedCall] {
        &self.calls
    }
}

impl QueryEngine for ScriptedEngine {
    fn drain_events(&mut self) -> Result<Vec<EngineEvent>, EngineError> {
        self.calls.push(ScriptedCall::Drain);
        if let Some(err) = &self.drain_error {
            return Err(err.clone());
        }
        Ok(std::mem::take(&mut self.startup_events))
    }

    fn submit_query(&mut self, input: &str, year: i32) -> Result<QueryResult, EngineError> {
        self.calls.push(ScriptedCall::Submit {
            input: input.to_owned(),
            year,
        });
        if let Some(err) = &self.query_error {
            return Err(err.clone());
        }
        self.query_results
            .pop_front()
            .ok_or_else(|| EngineError::Query(format!("no scripted result for {input:?} ({year})")))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::record::{Document, Email};

    fn scenario_with_one_result() -> Scenario {
        Scenario {
            startup_events: vec![EngineEvent {
                emails: vec![Email::new("welcome", "start digging")],
            }],
            query_results: vec![QueryResult {
                email: Email::new("1 result", "one hit"),
                docs: vec![Document::new("memo ███", "1983-02-01", "body")],
            }],
        }
    }

    #[test]
    fn drain_returns_backlog_once() {
        let mut engine = ScriptedEngine::new(CorpusSeed::default(), scenario_with_one_result());
        let first = engine.drain_events().unwrap();
        assert_eq!(first.len(), 1);
        let second = engine.drain_events().unwrap();
        assert!(second.is_empty());
        assert_eq!(engine.calls(), &[ScriptedCall::Drain, ScriptedCall::Drain]);
    }

    #[test]
    fn submit_replays_results_in_fifo_order_then_fails() {
        let mut engine = ScriptedEngine::new(CorpusSeed::default(), scenario_with_one_result());
        let result = engine.submit_query("memo", 1983).unwrap();
        assert_eq!(result.docs.len(), 1);
        let err = engine.submit_query("memo", 1983).unwrap_err();
        assert!(matches!(err, EngineError::Query(_)));
        assert_eq!(
            engine.calls(),
            &[
                ScriptedCall::Submit {
                    input: "memo".to_owned(),
                    year: 1983
                },
                ScriptedCall::Submit {
                    input: "memo".to_owned(),
                    year: 1983
                },
            ]
        );
    }

    #[test]
    fn configured_errors_win_over_script() {
        let mut engine = ScriptedEngine::new(CorpusSeed::default(), scenario_with_one_result())
            .with_drain_error(EngineError::Drain("backlog unavailable".to_owned()));
        assert!(engine.drain_events().is_err());
    }

    #[test]
    fn seed_is_held_verbatim() {
        let seed = CorpusSeed::new(vec![
            "doc A\n1990-01-01\n\nbody A".to_owned(),
            "doc B\n1991-02-02\n\nbody B".to_owned(),
        ]);
        let engine = ScriptedEngine::new(seed.clone(), Scenario::default());
        assert_eq!(engine.seed(), &seed);
    }

    #[test]
    fn scenario_round_trips_through_json() {
        let scenario = scenario_with_one_result();
        let json = serde_json::to_string(&scenario).unwrap();
        assert_eq!(Scenario::from_json(&json).unwrap(), scenario);
    }
}
