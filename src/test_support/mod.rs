//! Test utilities and mocks for imgbuild unit tests.
//!
//! Provides a scripted [`BuildTool`] that records every invocation, and a
//! cloneable in-memory writer for capturing [`Shell`] output.
//!
//! [`Shell`]: crate::util::shell::Shell

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};

use crate::core::{Action, Invocation, InvocationOutcome};
use crate::tool::BuildTool;

/// Mock build tool returning scripted outcomes in order.
#[derive(Debug, Default)]
pub struct MockTool {
    outcomes: VecDeque<InvocationOutcome>,
    default_outcome: Option<InvocationOutcome>,
    calls: Vec<Invocation>,
}

impl MockTool {
    pub fn new() -> Self {
        MockTool::default()
    }

    /// A tool whose every invocation succeeds with `stdout`.
    pub fn succeeding(stdout: impl Into<String>) -> Self {
        let mut tool = MockTool::new();
        tool.set_default(InvocationOutcome::new(0, stdout, ""));
        tool
    }

    /// Queue an outcome; queued outcomes are returned in order.
    pub fn expect(&mut self, outcome: InvocationOutcome) -> &mut Self {
        self.outcomes.push_back(outcome);
        self
    }

    /// Outcome used once the queue is empty.
    pub fn set_default(&mut self, outcome: InvocationOutcome) -> &mut Self {
        self.default_outcome = Some(outcome);
        self
    }

    /// Every invocation received, in order.
    pub fn calls(&self) -> &[Invocation] {
        &self.calls
    }

    /// The actions received, in order.
    pub fn actions(&self) -> Vec<Action> {
        self.calls.iter().map(|call| call.action).collect()
    }
}

impl BuildTool for MockTool {
    fn describe(&self, invocation: &Invocation) -> String {
        match invocation.action {
            Action::Clean => "mock clean".to_string(),
            Action::Build if invocation.debug => "mock build DEBUG=1".to_string(),
            Action::Build => "mock build".to_string(),
        }
    }

    fn invoke(&mut self, invocation: &Invocation) -> Result<InvocationOutcome> {
        self.calls.push(*invocation);

        if let Some(outcome) = self.outcomes.pop_front() {
            return Ok(outcome);
        }
        if let Some(ref outcome) = self.default_outcome {
            return Ok(outcome.clone());
        }

        bail!("unexpected invocation: {}", invocation.action)
    }
}

/// Cloneable in-memory writer; every clone appends to the same buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        SharedBuffer::default()
    }

    /// Everything written so far, as text.
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().map(|b| b.clone()).unwrap_or_default();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.0.lock() {
            Ok(mut inner) => {
                inner.extend_from_slice(buf);
                Ok(buf.len())
            }
            Err(_) => Err(io::Error::other("buffer lock poisoned")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_tool_scripted_then_default() {
        let mut tool = MockTool::new();
        tool.expect(InvocationOutcome::new(2, "", "no rule"))
            .set_default(InvocationOutcome::new(0, "ok", ""));

        let first = tool.invoke(&Invocation::clean()).unwrap();
        let second = tool.invoke(&Invocation::build(true)).unwrap();

        assert_eq!(first.exit_code, 2);
        assert!(second.success());
        assert_eq!(tool.actions(), vec![Action::Clean, Action::Build]);
        assert!(tool.calls()[1].debug);
    }

    #[test]
    fn test_mock_tool_without_script_errors() {
        let mut tool = MockTool::new();
        assert!(tool.invoke(&Invocation::build(false)).is_err());
    }

    #[test]
    fn test_shared_buffer_clones_share_contents() {
        let buffer = SharedBuffer::new();
        let mut writer = buffer.clone();
        write!(writer, "hello").unwrap();
        assert_eq!(buffer.contents(), "hello");
    }
}
