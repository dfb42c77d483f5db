use codemend::session::{prompt::build_prompt, EditAction, Session, SessionPhase};
use codemend::types::ConversationMessage;

/// Drive one full lint cycle through the public session API, playing the
/// transport's part by hand: send the prompt, stream cumulative snapshots,
/// finish, validate.
#[test]
fn test_full_lint_cycle_reaches_idle_with_frozen_edit() {
    let mut session = Session::new("print(1)\n".to_string(), false);
    let mut history: Vec<ConversationMessage> = Vec::new();

    let action = EditAction::parse("lint", None).unwrap();
    assert!(session.permits(&action));
    let prompt = build_prompt(&action, session.original(), session.modified(), &history)
        .unwrap()
        .unwrap();
    assert!(prompt.contains("print(1)\n"));

    history.push(ConversationMessage::user(prompt));
    session.prompt_sent();
    assert_eq!(session.phase(), SessionPhase::Streaming);

    for snapshot in [
        "Sure",
        "Sure, here:\n```python\n",
        "Sure, here:\n```python\nprint(1)  # noqa\n",
        "Sure, here:\n```python\nprint(1)  # noqa\n```\nDone.",
    ] {
        session.observe_stream(snapshot);
    }
    assert_eq!(session.modified(), Some("print(1)  # noqa\n```\nDone."));

    history.push(ConversationMessage::assistant(
        "Sure, here:\n```python\nprint(1)  # noqa\n```\nDone.",
    ));
    session.finish_stream();
    assert_eq!(session.phase(), SessionPhase::AwaitingValidation);
    assert_eq!(session.modified(), Some("print(1)  # noqa\n"));

    session.validated();
    assert_eq!(session.phase(), SessionPhase::Idle);
    // Validation freezes the edit; it stays visible for follow-up actions.
    assert_eq!(session.modified(), Some("print(1)  # noqa\n"));
}

#[test]
fn test_followup_action_quotes_the_validated_edit() {
    let mut session = Session::new("orig()\n".to_string(), false);
    let history = vec![
        ConversationMessage::user("lint this"),
        ConversationMessage::assistant("```python\nfixed()\n```"),
    ];
    session.prompt_sent();
    session.observe_stream("```python\nfixed()\n```");
    session.finish_stream();
    session.validated();

    let prompt = build_prompt(
        &EditAction::Refactor,
        session.original(),
        session.modified(),
        &history,
    )
    .unwrap()
    .unwrap();
    assert!(prompt.contains("fixed()\n"));
    assert!(!prompt.contains("orig()"));
}

#[test]
fn test_cancel_mid_stream_returns_to_idle_and_permits_new_actions() {
    let mut session = Session::new("x".to_string(), false);
    session.prompt_sent();
    session.observe_stream("```python\npartial");
    assert!(session.permits(&EditAction::Cancel));
    assert!(!session.permits(&EditAction::Lint));

    session.cancel();
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert!(session.permits(&EditAction::Lint));
    // The partial capture was never finalized as a block.
    assert_eq!(session.modified(), Some("partial"));
}

#[test]
fn test_retry_after_validation_streams_a_replacement() {
    let mut session = Session::new("x".to_string(), false);
    session.prompt_sent();
    session.observe_stream("```python\nfirst\n```");
    session.finish_stream();
    assert!(session.permits(&EditAction::Retry));

    session.retried();
    assert_eq!(session.phase(), SessionPhase::Streaming);
    assert_eq!(session.modified(), None);

    session.observe_stream("```python\nsecond\n```");
    session.finish_stream();
    assert_eq!(session.modified(), Some("second\n"));
    assert_eq!(session.phase(), SessionPhase::AwaitingValidation);
}

#[test]
fn test_discard_drops_the_edit() {
    let mut session = Session::new("x".to_string(), false);
    session.prompt_sent();
    session.observe_stream("```python\nunwanted\n```");
    session.finish_stream();

    session.discarded();
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.modified(), None);
}

#[test]
fn test_completed_reply_without_code_goes_back_to_idle() {
    let mut session = Session::new("x".to_string(), false);
    session.prompt_sent();
    session.observe_stream("I'd recommend splitting that function in two.");
    session.finish_stream();

    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.modified(), None);
}

#[test]
fn test_custom_prompt_framing_with_empty_history() {
    let session = Session::new("x".to_string(), false);
    let action = EditAction::parse("custom", Some("fix it")).unwrap();
    let prompt = build_prompt(&action, session.original(), session.modified(), &[])
        .unwrap()
        .unwrap();
    assert_eq!(prompt, "Here is my code:\n\nx\n\nfix it");
}
