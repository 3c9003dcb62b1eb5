//! # Follower event script interpreter module
//!
//! This module provides an interpreter for event replay scripts, allowing a
//! recorded (or hand written) sequence of tracker and bumper events to be
//! fed to the follower without any network.
//!
//! Scripts contain one event per entry, in the form
//!
//! ```text
//! <time_s>: <FollowerEvent as JSON>;
//! ```
//!
//! for example
//!
//! ```text
//! 0.0: {"Tracking": {"x": 100, "y": 100, "width": 50, "height": 50}};
//! 0.5: {"Bumper": {"zone": "Left", "state": "Pressed"}};
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::RegexBuilder;
use thiserror::Error;

// Internal
use comms_if::event::{FollowerEvent, EventParseError};
use crate::session::get_elapsed_seconds;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An event which is scripted to occur at a specific time.
struct ScriptedEvent {
    /// The time the event is supposed to be delivered at
    exec_time_s: f64,

    /// The event to deliver
    event: FollowerEvent
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use
/// `.get_pending_events` to acquire a list of events that need delivering.
pub struct ScriptInterpreter {
    _script_path: PathBuf,
    events: VecDeque<ScriptedEvent>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0:?}")]
    ScriptNotFound(PathBuf),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid event at {0} s: {1}")]
    InvalidEvent(f64, EventParseError),

    #[error("Could not build the script parser: {0}")]
    RegexError(regex::Error)
}

pub enum PendingEvents {
    None,
    Some(Vec<FollowerEvent>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        let path = PathBuf::from(script_path.as_ref());

        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path));
        }

        let script = fs::read_to_string(&path)
            .map_err(ScriptError::ScriptLoadError)?;

        let mut interp = Self::from_script_str(&script)?;
        interp._script_path = path;

        Ok(interp)
    }

    /// Create a new interpreter from the contents of a script.
    pub fn from_script_str(script: &str) -> Result<Self, ScriptError> {

        let mut event_queue: VecDeque<ScriptedEvent> = VecDeque::new();

        // Go through the script executing __the magic regex__.
        let re = RegexBuilder::
            new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .map_err(ScriptError::RegexError)?;

        for cap in re.captures_iter(script) {
            // Groups 1 and 3 are not optional so are present in every match
            let exec_time_s: f64 = cap[1].parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            let event = FollowerEvent::from_json(&cap[3])
                .map_err(|e| ScriptError::InvalidEvent(exec_time_s, e))?;

            event_queue.push_back(ScriptedEvent {
                exec_time_s,
                event
            });
        }

        if event_queue.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        Ok(ScriptInterpreter {
            _script_path: PathBuf::new(),
            events: event_queue
        })
    }

    /// Return the events which are due at the current session time.
    ///
    /// # Panics
    /// - If the session has not been initialised.
    pub fn get_pending_events(&mut self) -> PendingEvents {
        self.get_pending_events_at(get_elapsed_seconds())
    }

    /// Return a vector of events whose time is before `current_time_s`, or
    /// `None` if nothing needs delivering now.
    pub fn get_pending_events_at(&mut self, current_time_s: f64) -> PendingEvents {

        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.events.is_empty() {
            return PendingEvents::EndOfScript
        }

        let mut event_vec: Vec<FollowerEvent> = vec![];

        // Pop items from the queue while the head's exec time is lower than
        // the current time
        while let Some(head) = self.events.front() {
            if head.exec_time_s >= current_time_s {
                break;
            }

            if let Some(s) = self.events.pop_front() {
                event_vec.push(s.event);
            }
        }

        if event_vec.is_empty() {
            PendingEvents::None
        }
        else {
            PendingEvents::Some(event_vec)
        }
    }

    /// Get the number of events remaining in the script
    pub fn get_num_events(&self) -> usize {
        self.events.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.events.back() {
            Some(c) => c.exec_time_s,
            None => 0f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comms_if::eqpt::{
        bumper::{BumperEvent, BumperZone},
        vision::BoundingBox
    };

    const SCRIPT: &str = r#"
        0.0: {"Tracking": {"x": 100, "y": 100, "width": 50, "height": 50}};
        0.1: {"Tracking": {"x": 100, "y": 100, "width": 80, "height": 80}};
        0.5: {"Bumper": {"zone": "Left", "state": "Pressed"}};
        2.5: "Shutdown";
    "#;

    #[test]
    fn test_parse() {
        let si = ScriptInterpreter::from_script_str(SCRIPT).unwrap();
        assert_eq!(si.get_num_events(), 4);
        assert_eq!(si.get_duration(), 2.5);
    }

    #[test]
    fn test_pending() {
        let mut si = ScriptInterpreter::from_script_str(SCRIPT).unwrap();

        match si.get_pending_events_at(0.0) {
            PendingEvents::None => (),
            _ => panic!("Expected no events before the first timestamp")
        }

        match si.get_pending_events_at(0.2) {
            PendingEvents::Some(v) => assert_eq!(v, vec![
                FollowerEvent::Tracking(BoundingBox::new(100, 100, 50, 50)),
                FollowerEvent::Tracking(BoundingBox::new(100, 100, 80, 80)),
            ]),
            _ => panic!("Expected two tracking events")
        }

        match si.get_pending_events_at(1.0) {
            PendingEvents::Some(v) => assert_eq!(v, vec![
                FollowerEvent::Bumper(BumperEvent::pressed(BumperZone::Left))
            ]),
            _ => panic!("Expected the bumper event")
        }

        match si.get_pending_events_at(3.0) {
            PendingEvents::Some(v) => assert_eq!(v, vec![FollowerEvent::Shutdown]),
            _ => panic!("Expected the shutdown event")
        }

        match si.get_pending_events_at(4.0) {
            PendingEvents::EndOfScript => (),
            _ => panic!("Expected the end of the script")
        }
    }

    #[test]
    fn test_errors() {
        match ScriptInterpreter::from_script_str("# nothing here\n") {
            Err(ScriptError::ScriptEmpty) => (),
            _ => panic!("Expected an empty script error")
        }

        match ScriptInterpreter::from_script_str("1.0: {\"Tracking\": 3};") {
            Err(ScriptError::InvalidEvent(t, _)) => assert_eq!(t, 1.0),
            _ => panic!("Expected an invalid event error")
        }
    }
}
