//! End-to-end conversation flow tests
//!
//! These drive a ConversationController against scripted chat backends
//! and assert on the log, the rolling context, and the requests the
//! backend saw. Calling `poll` in a loop stands in for the per-frame
//! poll the UI does.

use std::sync::Arc;
use std::time::Duration;

use banter::llm::{ChatRole, ConversationController, InferenceConfig, ScriptedClient};
use banter::messages::Sender;

/// Poll until the controller goes idle, failing the test if it never
/// does. One extra poll after idle picks up events from turns that were
/// cancelled along the way.
fn wait_until_idle(controller: &mut ConversationController) {
    for _ in 0..400 {
        controller.poll();
        if !controller.is_generating() {
            std::thread::sleep(Duration::from_millis(10));
            controller.poll();
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("controller never went idle");
}

#[test]
fn streamed_fragments_assemble_in_the_log() {
    let client = ScriptedClient::new(["Hel", "lo, ", "world"]);
    let mut controller =
        ConversationController::new(Arc::new(client), InferenceConfig::default()).unwrap();

    let id = controller.submit("Say hello").unwrap();
    assert!(controller.is_generating());
    assert_eq!(controller.streaming_message(), Some(id));

    wait_until_idle(&mut controller);

    let messages = controller.log().get_all();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender, Sender::User);
    assert_eq!(messages[0].text, "Say hello");
    assert_eq!(messages[1].sender, Sender::Assistant);
    assert_eq!(messages[1].id, id);
    assert_eq!(messages[1].text, "Hello, world");

    assert!(controller.last_error().is_none());
    let stats = controller.stats().unwrap();
    assert_eq!(stats.chars, "Hello, world".len());
    assert!(stats.first_fragment_ms <= stats.total_ms);
}

#[test]
fn request_carries_system_prompt_then_history() {
    let client = ScriptedClient::new(["Fine."]);
    let backend = client.clone();
    let config = InferenceConfig::default().with_system_prompt("Keep answers short.");
    let mut controller = ConversationController::new(Arc::new(client), config).unwrap();

    controller.submit("How are you?").unwrap();
    wait_until_idle(&mut controller);
    controller.submit("And tomorrow?").unwrap();
    wait_until_idle(&mut controller);

    let seen = backend.requests();
    assert_eq!(seen.len(), 2);

    assert_eq!(seen[0].messages.len(), 2);
    assert_eq!(seen[0].messages[0].role, ChatRole::System);
    assert_eq!(seen[0].messages[0].content, "Keep answers short.");
    assert_eq!(seen[0].messages[1].role, ChatRole::User);
    assert_eq!(seen[0].messages[1].content, "How are you?");

    // Second request replays the first exchange exactly once
    assert_eq!(seen[1].messages.len(), 4);
    assert_eq!(seen[1].messages[1].content, "How are you?");
    assert_eq!(seen[1].messages[2].role, ChatRole::Assistant);
    assert_eq!(seen[1].messages[2].content, "Fine.");
    assert_eq!(seen[1].messages[3].content, "And tomorrow?");

    assert!(seen[1].stream);
    assert_eq!(seen[1].max_tokens, 500);
    assert_eq!(seen[1].seed, 0);
}

#[test]
fn context_window_stays_bounded() {
    let client = ScriptedClient::new(["ok"]);
    let backend = client.clone();
    let config = InferenceConfig::default().with_context_entries(4);
    let mut controller = ConversationController::new(Arc::new(client), config).unwrap();

    for i in 1..=6 {
        controller.submit(&format!("question {}", i)).unwrap();
        wait_until_idle(&mut controller);
    }
    assert_eq!(controller.context_len(), 4);

    controller.submit("question 7").unwrap();
    wait_until_idle(&mut controller);

    // Last request: system + the four retained entries + the new turn
    let seen = backend.requests();
    let last = seen.last().unwrap();
    assert_eq!(last.messages.len(), 6);
    assert_eq!(last.messages[1].content, "question 5");
    assert_eq!(last.messages[2].content, "ok");
    assert_eq!(last.messages[3].content, "question 6");
    assert_eq!(last.messages[5].content, "question 7");
}

#[test]
fn submitting_mid_stream_cancels_the_previous_turn() {
    let client = ScriptedClient::new([
        "chunk-one ",
        "chunk-two ",
        "chunk-three ",
        "chunk-four ",
        "chunk-five",
    ])
    .paced(Duration::from_millis(25));
    let backend = client.clone();
    let full = "chunk-one chunk-two chunk-three chunk-four chunk-five";
    let mut controller =
        ConversationController::new(Arc::new(client), InferenceConfig::default()).unwrap();

    let first = controller.submit("first question").unwrap();
    let second = controller.submit("second question").unwrap();
    assert_ne!(first, second);
    assert_eq!(controller.streaming_message(), Some(second));

    wait_until_idle(&mut controller);

    let messages = controller.log().get_all();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].text, "first question");
    assert_eq!(messages[2].text, "second question");

    // The cancelled response keeps whatever had streamed in, and no more
    let partial = &messages[1].text;
    assert!(full.starts_with(partial.as_str()));
    assert!(partial.len() < full.len());
    assert_eq!(messages[3].text, full);

    // The cancelled turn's user text is history; its partial answer is not
    let seen = backend.requests();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1].messages.len(), 3);
    assert_eq!(seen[1].messages[1].content, "first question");
    assert_eq!(seen[1].messages[2].content, "second question");
    assert_eq!(controller.context_len(), 3);
}

#[test]
fn failed_stream_keeps_partial_and_records_error() {
    let client = ScriptedClient::new(["Almost ", "there"]).failing_after(1);
    let mut controller =
        ConversationController::new(Arc::new(client), InferenceConfig::default()).unwrap();

    controller.submit("hi").unwrap();
    wait_until_idle(&mut controller);

    let messages = controller.log().get_all();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].text, "Almost ");

    let error = controller.last_error().unwrap();
    assert!(error.contains("scripted failure"));

    // The failed turn never enters the request context
    assert_eq!(controller.context_len(), 1);
    assert!(!controller.is_generating());
}

#[test]
fn clear_resets_conversation_state() {
    let client = ScriptedClient::new(["ok"]);
    let mut controller =
        ConversationController::new(Arc::new(client), InferenceConfig::default()).unwrap();

    controller.submit("hello").unwrap();
    wait_until_idle(&mut controller);
    controller.clear();

    assert!(controller.log().is_empty());
    assert_eq!(controller.context_len(), 0);
    assert!(controller.stats().is_none());

    controller.submit("fresh start").unwrap();
    wait_until_idle(&mut controller);

    let messages = controller.log().get_all();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].text, "fresh start");
    assert_eq!(messages[1].text, "ok");
}

#[test]
fn fragments_in_flight_when_cleared_are_dropped() {
    let client =
        ScriptedClient::new(["a", "b", "c", "d"]).paced(Duration::from_millis(20));
    let mut controller =
        ConversationController::new(Arc::new(client), InferenceConfig::default()).unwrap();

    controller.submit("hello").unwrap();
    std::thread::sleep(Duration::from_millis(50));
    controller.poll();
    controller.clear();

    // Anything still queued targets a message that no longer exists
    for _ in 0..10 {
        std::thread::sleep(Duration::from_millis(10));
        controller.poll();
    }

    assert!(controller.log().is_empty());
    assert_eq!(controller.context_len(), 0);
    assert!(!controller.is_generating());
}
