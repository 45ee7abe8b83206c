//! Integration tests over the event-reader seam, without a subprocess.

mod common;

use std::time::Duration;

use common::{MockReader, PendingReader, ScenarioBuilder};
use futures::StreamExt;
use libcodex::{Error, StreamedTurn, ThreadEvent, ThreadItem};
use tokio_util::sync::CancellationToken;

fn happy_path() -> ScenarioBuilder {
    ScenarioBuilder::new()
        .thread_started("thread_1")
        .turn_started()
        .agent_message_started("item_0")
        .agent_message_completed("item_0", "hi")
        .turn_completed(3, 1)
}

#[tokio::test]
async fn collect_folds_items_response_and_usage() {
    let turn = StreamedTurn::from_reader(happy_path().build())
        .collect()
        .await
        .unwrap();

    assert_eq!(turn.items.len(), 1);
    assert!(matches!(turn.items[0], ThreadItem::AgentMessage(_)));
    assert_eq!(turn.final_response, "hi");

    let usage = turn.usage.unwrap();
    assert_eq!(usage.input_tokens, 3);
    assert_eq!(usage.output_tokens, 1);
}

#[tokio::test]
async fn multiple_agent_messages_join_with_newlines() {
    let reader = ScenarioBuilder::new()
        .thread_started("thread_1")
        .turn_started()
        .agent_message_completed("item_0", "first")
        .agent_message_completed("item_1", "second")
        .turn_completed(1, 1)
        .build();

    let turn = StreamedTurn::from_reader(reader).collect().await.unwrap();
    assert_eq!(turn.final_response, "first\nsecond");
    assert_eq!(turn.items.len(), 2);
}

#[tokio::test]
async fn streamed_events_arrive_in_scripted_order() {
    let expected: Vec<ThreadEvent> = happy_path()
        .events()
        .into_iter()
        .map(|e| e.unwrap())
        .collect();
    let reader = MockReader::new(expected.iter().cloned().map(Ok).collect());

    let mut stream = StreamedTurn::from_reader(reader);
    let mut seen = Vec::new();
    while let Some(event) = stream.next().await {
        seen.push(event.unwrap());
    }

    assert_eq!(seen, expected);
}

#[tokio::test]
async fn exhausted_stream_yields_none() {
    let mut stream = StreamedTurn::from_reader(happy_path().build());
    while stream.next().await.is_some() {}
    assert!(stream.next().await.is_none());
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn turn_failed_becomes_an_error_in_buffered_mode() {
    let reader = ScenarioBuilder::new()
        .thread_started("thread_1")
        .turn_started()
        .turn_failed("model refused")
        .build();

    let err = StreamedTurn::from_reader(reader)
        .collect()
        .await
        .unwrap_err();
    assert!(err.is_turn_failure());
    assert!(err.to_string().contains("model refused"));
}

#[tokio::test]
async fn stream_error_event_becomes_a_stream_error() {
    let reader = ScenarioBuilder::new()
        .turn_started()
        .stream_error("connection lost")
        .build();

    let err = StreamedTurn::from_reader(reader)
        .collect()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Stream { .. }));
    assert!(err.to_string().contains("connection lost"));
}

#[tokio::test]
async fn items_before_a_failure_still_stream() {
    let reader = ScenarioBuilder::new()
        .turn_started()
        .agent_message_completed("item_0", "partial")
        .turn_failed("out of fuel")
        .build();

    let mut stream = StreamedTurn::from_reader(reader);
    let mut completed_items = 0;
    let mut failed = false;
    while let Some(event) = stream.next().await {
        match event.unwrap() {
            ThreadEvent::ItemCompleted { .. } => completed_items += 1,
            ThreadEvent::TurnFailed { .. } => failed = true,
            _ => {}
        }
    }
    assert_eq!(completed_items, 1);
    assert!(failed);
}

#[tokio::test]
async fn reader_errors_pass_through_the_stream() {
    let reader = ScenarioBuilder::new()
        .turn_started()
        .reader_error(Error::ProcessFailed {
            code: Some(1),
            stderr: "stack trace".into(),
        })
        .build();

    let err = StreamedTurn::from_reader(reader)
        .collect()
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ProcessFailed { code: Some(1), .. }));
}

#[tokio::test]
async fn cancellation_wins_over_a_pending_reader() {
    let cancel = CancellationToken::new();
    let stream = StreamedTurn::from_reader_cancellable(PendingReader, cancel.clone());

    cancel.cancel();
    let err = stream.collect().await.unwrap_err();
    assert!(err.is_cancelled());
}

#[tokio::test]
async fn cancellation_after_completion_has_no_effect() {
    let cancel = CancellationToken::new();
    let stream = StreamedTurn::from_reader_cancellable(happy_path().build(), cancel.clone());

    let turn = stream.collect().await.unwrap();
    cancel.cancel();
    assert_eq!(turn.final_response, "hi");
}

#[tokio::test]
async fn cancel_between_terminal_event_and_eof_still_yields_the_turn() {
    // The reader delivers turn.completed immediately but holds the stream
    // open afterwards; the token fires inside that window.
    let cancel = CancellationToken::new();
    let reader = happy_path().build_lingering(Duration::from_millis(300));
    let stream = StreamedTurn::from_reader_cancellable(reader, cancel.clone());

    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let turn = stream.collect().await.unwrap();
    assert_eq!(turn.final_response, "hi");
    assert_eq!(turn.usage.unwrap().input_tokens, 3);
}

#[tokio::test]
async fn stream_ends_cleanly_when_cancelled_right_after_the_terminal_event() {
    let cancel = CancellationToken::new();
    let reader = happy_path().build_lingering(Duration::from_millis(200));
    let mut stream = StreamedTurn::from_reader_cancellable(reader, cancel.clone());

    let mut saw_terminal = false;
    while let Some(event) = stream.next().await {
        // A Cancelled error here would fail the unwrap
        if let ThreadEvent::TurnCompleted { .. } = event.unwrap() {
            saw_terminal = true;
            cancel.cancel();
        }
    }
    assert!(saw_terminal);
}

#[tokio::test]
async fn buffered_and_streamed_modes_agree_on_the_outcome() {
    // Success case
    let buffered = StreamedTurn::from_reader(happy_path().build())
        .collect()
        .await
        .unwrap();

    let mut stream = StreamedTurn::from_reader(happy_path().build());
    let mut streamed_response = String::new();
    let mut streamed_usage = None;
    while let Some(event) = stream.next().await {
        match event.unwrap() {
            ThreadEvent::ItemCompleted { item } => {
                if let Some(msg) = item.as_agent_message() {
                    streamed_response.push_str(&msg.text);
                }
            }
            ThreadEvent::TurnCompleted { usage } => streamed_usage = Some(usage),
            _ => {}
        }
    }
    assert_eq!(buffered.final_response, streamed_response);
    assert_eq!(buffered.usage, streamed_usage);

    // Failure case: streamed mode sees turn.failed as an event, buffered
    // mode reports it as an error with the same message.
    let failing = || {
        ScenarioBuilder::new()
            .turn_started()
            .turn_failed("no tokens left")
    };
    let buffered_err = StreamedTurn::from_reader(failing().build())
        .collect()
        .await
        .unwrap_err();

    let mut stream = StreamedTurn::from_reader(failing().build());
    let mut streamed_failure = None;
    while let Some(event) = stream.next().await {
        if let ThreadEvent::TurnFailed { error } = event.unwrap() {
            streamed_failure = Some(error.message);
        }
    }
    assert_eq!(streamed_failure.as_deref(), Some("no tokens left"));
    assert!(buffered_err.to_string().contains("no tokens left"));
}

#[tokio::test]
async fn orphan_item_completion_is_still_folded() {
    // item.completed without a prior item.started is reported, not dropped
    let reader = ScenarioBuilder::new()
        .turn_started()
        .agent_message_completed("item_unseen", "salvaged")
        .turn_completed(1, 1)
        .build();

    let turn = StreamedTurn::from_reader(reader).collect().await.unwrap();
    assert_eq!(turn.final_response, "salvaged");
    assert_eq!(turn.items.len(), 1);
}
