//! Testing utilities for revmig workspace
//!
//! Shared test helpers, fixtures, and assertions.

#![allow(missing_docs)]

use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use regex::Regex;
use revmig_changes::{Author, Change, Changes};
use revmig_transform::{
    Console, DynTransformation, NonReversibleError, TransformError, TransformWork, Transformation,
    WorkTree,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Warning,
    Error,
    Progress,
    Verbose,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub kind: MessageType,
    pub text: String,
}

/// Console that records every message for later assertions
#[derive(Debug, Default)]
pub struct TestingConsole {
    messages: Mutex<Vec<Message>>,
}

impl TestingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().clone()
    }

    pub fn texts(&self, kind: MessageType) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| m.text.clone())
            .collect()
    }

    /// Assert exactly one message of `kind` matches the whole of `pattern`
    pub fn assert_once_in_log(&self, kind: MessageType, pattern: &str) {
        let re = Regex::new(&format!("^(?s:{pattern})$")).unwrap();
        let matching = self
            .messages
            .lock()
            .iter()
            .filter(|m| m.kind == kind && re.is_match(&m.text))
            .count();
        assert_eq!(
            matching,
            1,
            "expected one {kind:?} message matching '{pattern}', got {matching} in {:?}",
            self.messages()
        );
    }

    fn push(&self, kind: MessageType, text: &str) {
        self.messages.lock().push(Message {
            kind,
            text: text.to_string(),
        });
    }
}

impl Console for TestingConsole {
    fn info(&self, message: &str) {
        self.push(MessageType::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(MessageType::Warning, message);
    }

    fn error(&self, message: &str) {
        self.push(MessageType::Error, message);
    }

    fn progress(&self, message: &str) {
        self.push(MessageType::Progress, message);
    }

    fn verbose(&self, message: &str) {
        self.push(MessageType::Verbose, message);
    }
}

/// Leaf whose inverse is `"reverse <field>"` (itself not reversible)
///
/// Applying logs `field` to the console at info level, so execution order
/// shows up in [`TestingConsole::texts`].
#[derive(Debug, Clone)]
pub struct MockTransform {
    field: String,
    reversible: bool,
    fails: bool,
    reverse_calls: Arc<AtomicUsize>,
}

impl MockTransform {
    pub fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
            reversible: true,
            fails: false,
            reverse_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn non_reversible(field: &str) -> Self {
        Self {
            reversible: false,
            ..Self::new(field)
        }
    }

    pub fn failing(field: &str) -> Self {
        Self {
            fails: true,
            ..Self::new(field)
        }
    }

    pub fn reverse_calls(&self) -> usize {
        self.reverse_calls.load(Ordering::SeqCst)
    }

    pub fn into_dyn(self) -> DynTransformation {
        Arc::new(self)
    }
}

impl PartialEq for MockTransform {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.reversible == other.reversible && self.fails == other.fails
    }
}

impl Transformation for MockTransform {
    fn apply(&self, work: &mut TransformWork<'_>) -> Result<(), TransformError> {
        if self.fails {
            return Err(TransformError::Failed(format!("{} failed", self.field)));
        }
        work.console().info(&self.field);
        Ok(())
    }

    fn reverse(&self) -> Result<DynTransformation, NonReversibleError> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        if self.reversible {
            Ok(MockTransform::non_reversible(&format!("reverse {}", self.field)).into_dyn())
        } else {
            Err(NonReversibleError::new(self.describe()))
        }
    }

    fn describe(&self) -> String {
        self.field.clone()
    }
}

/// Shared, ordered log of applied step names
pub type ApplyLog = Arc<Mutex<Vec<String>>>;

/// Leaf that appends its name to a shared log when applied
///
/// Reverses to a recorder named `"undo <name>"` writing to the same log.
#[derive(Debug, Clone)]
pub struct RecordingTransform {
    name: String,
    log: ApplyLog,
}

impl RecordingTransform {
    pub fn new(name: &str, log: &ApplyLog) -> Self {
        Self {
            name: name.to_string(),
            log: Arc::clone(log),
        }
    }

    pub fn into_dyn(self) -> DynTransformation {
        Arc::new(self)
    }
}

impl PartialEq for RecordingTransform {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.log, &other.log)
    }
}

impl Transformation for RecordingTransform {
    fn apply(&self, _work: &mut TransformWork<'_>) -> Result<(), TransformError> {
        self.log.lock().push(self.name.clone());
        Ok(())
    }

    fn reverse(&self) -> Result<DynTransformation, NonReversibleError> {
        Ok(RecordingTransform::new(&format!("undo {}", self.name), &self.log).into_dyn())
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

pub fn new_log() -> ApplyLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Apply `step` to a fresh context, returning the console it logged to
pub fn apply_logged(step: &dyn Transformation, tree: &mut WorkTree) -> Result<TestingConsole, TransformError> {
    let console = TestingConsole::new();
    {
        let mut work = TransformWork::new(tree, "", Changes::empty(), &console);
        step.apply(&mut work)?;
    }
    Ok(console)
}

pub fn test_change(id: &str, message: &str) -> Change {
    Change::new(
        id,
        Author::new("Jane Doe", "jane@example.com"),
        message,
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    )
}
