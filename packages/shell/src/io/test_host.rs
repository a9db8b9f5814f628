//! Test host implementation for in-memory I/O testing.
//!
//! Input lines, signals and read failures are queued and consumed in order,
//! one per `wait_for_input()` call. Once the queue runs dry the host reports
//! Ctrl+D so a loop under test always terminates. Output, prompts and
//! terminal mode changes are recorded for later inspection.

use std::collections::VecDeque;

use super::{
    InputLine, IoError, IoHost, Output, OutputStyle, PromptConfig, Signal, TerminalState,
};

#[derive(Debug, Clone)]
enum Event {
    Line(String),
    Signal(Signal),
    Fail(String),
}

/// Test host with in-memory I/O buffers.
#[derive(Debug, Default)]
pub struct TestHost {
    events: VecDeque<Event>,
    pending_input: Option<InputLine>,
    pending_signal: Option<Signal>,
    output_buffer: Vec<Output>,
    prompts: Vec<PromptConfig>,
    /// Terminal mode as seen by the host.
    mode: TerminalState,
    /// Terminal mode each time a prompt was shown.
    modes_at_prompt: Vec<TerminalState>,
    suspend_count: usize,
    resume_count: usize,
    clear_count: usize,
    flush_count: usize,
}

impl TestHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an input line.
    pub fn queue_input(&mut self, line: impl Into<String>) {
        self.events.push_back(Event::Line(line.into()));
    }

    /// Queue multiple input lines.
    pub fn queue_inputs(&mut self, lines: impl IntoIterator<Item = impl Into<String>>) {
        for line in lines {
            self.queue_input(line);
        }
    }

    /// Queue a signal in place of a line.
    pub fn queue_signal(&mut self, signal: Signal) {
        self.events.push_back(Event::Signal(signal));
    }

    /// Queue a failure of the next `wait_for_input()`.
    pub fn queue_read_error(&mut self, message: impl Into<String>) {
        self.events.push_back(Event::Fail(message.into()));
    }

    pub fn output(&self) -> &[Output] {
        &self.output_buffer
    }

    /// All output text, concatenated.
    pub fn output_text(&self) -> String {
        self.output_buffer
            .iter()
            .map(|o| o.text.as_str())
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn output_with_style(&self, style: OutputStyle) -> Vec<&str> {
        self.output_buffer
            .iter()
            .filter(|o| o.style == style)
            .map(|o| o.text.as_str())
            .collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.output_with_style(OutputStyle::Error)
    }

    pub fn prompts(&self) -> &[PromptConfig] {
        &self.prompts
    }

    pub fn last_prompt(&self) -> Option<&PromptConfig> {
        self.prompts.last()
    }

    pub fn mode(&self) -> TerminalState {
        self.mode
    }

    pub fn modes_at_prompt(&self) -> &[TerminalState] {
        &self.modes_at_prompt
    }

    pub fn suspend_count(&self) -> usize {
        self.suspend_count
    }

    pub fn resume_count(&self) -> usize {
        self.resume_count
    }

    pub fn clear_count(&self) -> usize {
        self.clear_count
    }

    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    pub fn clear_output(&mut self) {
        self.output_buffer.clear();
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }
}

impl IoHost for TestHost {
    fn wait_for_input(&mut self) -> Result<(), IoError> {
        match self.events.pop_front() {
            Some(Event::Line(line)) => self.pending_input = Some(InputLine { line }),
            Some(Event::Signal(signal)) => self.pending_signal = Some(signal),
            Some(Event::Fail(message)) => return Err(IoError::Io(message)),
            None => self.pending_signal = Some(Signal::Eof),
        }
        Ok(())
    }

    fn read_input(&mut self) -> Result<Option<InputLine>, IoError> {
        Ok(self.pending_input.take())
    }

    fn read_signal(&mut self) -> Result<Option<Signal>, IoError> {
        Ok(self.pending_signal.take())
    }

    fn write_output(&mut self, output: Output) -> Result<(), IoError> {
        self.output_buffer.push(output);
        Ok(())
    }

    fn write_prompt(&mut self, config: PromptConfig) -> Result<(), IoError> {
        self.modes_at_prompt.push(self.mode);
        self.prompts.push(config);
        Ok(())
    }

    fn suspend_raw_mode(&mut self) -> Result<(), IoError> {
        self.suspend_count += 1;
        self.mode = TerminalState::Cooked;
        Ok(())
    }

    fn resume_raw_mode(&mut self) -> Result<(), IoError> {
        self.resume_count += 1;
        self.mode = TerminalState::Raw;
        Ok(())
    }

    fn clear_screen(&mut self) -> Result<(), IoError> {
        self.clear_count += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), IoError> {
        self.flush_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_creates_empty_host() {
        let host = TestHost::new();
        assert!(!host.has_pending_events());
        assert!(host.output().is_empty());
        assert!(host.last_prompt().is_none());
        assert_eq!(host.mode(), TerminalState::Raw);
        assert_eq!(host.flush_count(), 0);
    }

    #[test]
    fn events_are_delivered_in_order() {
        let mut host = TestHost::new();
        host.queue_input("first");
        host.queue_signal(Signal::Interrupt);
        host.queue_input("second");

        host.wait_for_input().unwrap();
        assert_eq!(host.read_signal().unwrap(), None);
        assert_eq!(host.read_input().unwrap().unwrap().line, "first");

        host.wait_for_input().unwrap();
        assert_eq!(host.read_signal().unwrap(), Some(Signal::Interrupt));
        assert!(host.read_input().unwrap().is_none());

        host.wait_for_input().unwrap();
        assert_eq!(host.read_input().unwrap().unwrap().line, "second");
    }

    #[test]
    fn drained_queue_reports_eof() {
        let mut host = TestHost::new();
        host.wait_for_input().unwrap();
        assert_eq!(host.read_signal().unwrap(), Some(Signal::Eof));
    }

    #[test]
    fn queued_read_error_fails_wait() {
        let mut host = TestHost::new();
        host.queue_read_error("tty gone");
        let err = host.wait_for_input().unwrap_err();
        assert_eq!(err.to_string(), "I/O error: tty gone");
    }

    #[test]
    fn queue_inputs_adds_multiple() {
        let mut host = TestHost::new();
        host.queue_inputs(["cmd1", "cmd2", "cmd3"]);
        assert_eq!(host.events.len(), 3);
    }

    #[test]
    fn suspend_and_resume_track_mode() {
        let mut host = TestHost::new();
        host.suspend_raw_mode().unwrap();
        assert_eq!(host.mode(), TerminalState::Cooked);
        host.resume_raw_mode().unwrap();
        assert_eq!(host.mode(), TerminalState::Raw);
        assert_eq!(host.suspend_count(), 1);
        assert_eq!(host.resume_count(), 1);
    }

    #[test]
    fn write_prompt_records_mode() {
        let mut host = TestHost::new();
        host.write_prompt(PromptConfig::default()).unwrap();
        host.suspend_raw_mode().unwrap();
        host.write_prompt(PromptConfig::default()).unwrap();
        assert_eq!(
            host.modes_at_prompt(),
            &[TerminalState::Raw, TerminalState::Cooked]
        );
    }

    #[test]
    fn output_with_style_filters() {
        let mut host = TestHost::new();
        host.write_output(Output::normal("normal")).unwrap();
        host.write_output(Output::error("error")).unwrap();
        host.write_output(Output::warning("careful")).unwrap();

        assert_eq!(host.errors(), vec!["error"]);
        assert_eq!(host.output_with_style(OutputStyle::Warning), vec!["careful"]);
        assert_eq!(host.output_text(), "normalerrorcareful");
    }

    #[test]
    fn clear_output_empties_buffer() {
        let mut host = TestHost::new();
        host.write_output(Output::normal("text")).unwrap();
        host.clear_output();
        assert!(host.output().is_empty());
    }
}
