//! Shared test helpers: a scriptable event reader and scenario builder.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use libcodex::protocol::{AgentMessageItem, ThreadError, ThreadItem};
use libcodex::{Error, EventReader, Result, ThreadEvent, Usage};

/// An event reader that replays a scripted sequence.
pub struct MockReader {
    events: VecDeque<Result<ThreadEvent>>,
    /// Delay between the last scripted event and EOF, like a subprocess
    /// that keeps stdout open after its final record.
    linger: Duration,
    shutdown_count: usize,
}

impl MockReader {
    pub fn new(events: Vec<Result<ThreadEvent>>) -> Self {
        Self::lingering(events, Duration::ZERO)
    }

    pub fn lingering(events: Vec<Result<ThreadEvent>>, linger: Duration) -> Self {
        Self {
            events: events.into_iter().collect(),
            linger,
            shutdown_count: 0,
        }
    }
}

impl EventReader for MockReader {
    async fn next_event(&mut self) -> Result<Option<ThreadEvent>> {
        match self.events.pop_front() {
            Some(Ok(event)) => Ok(Some(event)),
            Some(Err(e)) => Err(e),
            None => {
                tokio::time::sleep(self.linger).await;
                Ok(None)
            }
        }
    }

    async fn shutdown(&mut self) {
        self.shutdown_count += 1;
    }
}

/// A reader that never produces an event, for cancellation tests.
pub struct PendingReader;

impl EventReader for PendingReader {
    async fn next_event(&mut self) -> Result<Option<ThreadEvent>> {
        std::future::pending().await
    }
}

/// Builds scripted event sequences in protocol order.
#[derive(Default)]
pub struct ScenarioBuilder {
    events: Vec<Result<ThreadEvent>>,
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn thread_started(mut self, id: &str) -> Self {
        self.events.push(Ok(ThreadEvent::ThreadStarted {
            thread_id: id.to_string(),
        }));
        self
    }

    pub fn turn_started(mut self) -> Self {
        self.events.push(Ok(ThreadEvent::TurnStarted));
        self
    }

    pub fn agent_message_started(mut self, id: &str) -> Self {
        self.events.push(Ok(ThreadEvent::ItemStarted {
            item: agent_message(id, ""),
        }));
        self
    }

    pub fn agent_message_completed(mut self, id: &str, text: &str) -> Self {
        self.events.push(Ok(ThreadEvent::ItemCompleted {
            item: agent_message(id, text),
        }));
        self
    }

    pub fn turn_completed(mut self, input_tokens: u64, output_tokens: u64) -> Self {
        self.events.push(Ok(ThreadEvent::TurnCompleted {
            usage: Usage {
                input_tokens,
                cached_input_tokens: 0,
                output_tokens,
            },
        }));
        self
    }

    pub fn turn_failed(mut self, message: &str) -> Self {
        self.events.push(Ok(ThreadEvent::TurnFailed {
            error: ThreadError {
                message: message.to_string(),
            },
        }));
        self
    }

    pub fn stream_error(mut self, message: &str) -> Self {
        self.events.push(Ok(ThreadEvent::Error {
            message: message.to_string(),
        }));
        self
    }

    pub fn reader_error(mut self, error: Error) -> Self {
        self.events.push(Err(error));
        self
    }

    pub fn events(self) -> Vec<Result<ThreadEvent>> {
        self.events
    }

    pub fn build(self) -> MockReader {
        MockReader::new(self.events)
    }

    /// Build a reader that holds its stream open after the last event.
    pub fn build_lingering(self, linger: Duration) -> MockReader {
        MockReader::lingering(self.events, linger)
    }
}

pub fn agent_message(id: &str, text: &str) -> ThreadItem {
    ThreadItem::AgentMessage(AgentMessageItem {
        id: id.to_string(),
        text: text.to_string(),
    })
}
