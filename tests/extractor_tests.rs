use codemend::session::CodeBlockExtractor;

/// Feed a message to the extractor in chunks of the given size, delivering
/// the cumulative text after each chunk the way the transport does.
fn stream_in_chunks(extractor: &mut CodeBlockExtractor, message: &str, chunk: usize) {
    let mut end = 0;
    while end < message.len() {
        end = (end + chunk).min(message.len());
        while !message.is_char_boundary(end) {
            end += 1;
        }
        extractor.observe(&message[..end]);
    }
}

#[test]
fn test_chunk_size_does_not_change_the_result() {
    let message = "Sure, here is the cleaned-up version:\n\
                   ```python\ndef add(a, b):\n    return a + b\n```\n\
                   I removed the unused import.";

    let mut reference = CodeBlockExtractor::new();
    reference.observe(message);
    reference.finish();
    let expected = reference.current().map(str::to_string);

    for chunk in [1, 3, 7, 64, message.len()] {
        let mut extractor = CodeBlockExtractor::new();
        stream_in_chunks(&mut extractor, message, chunk);
        extractor.finish();
        assert_eq!(
            extractor.current().map(str::to_string),
            expected,
            "chunk size {chunk}"
        );
    }
}

#[test]
fn test_fence_marker_split_across_chunks() {
    let message = "fix:\n```python\nprint(1)\n```\n";
    // Split inside the opening and closing backtick runs.
    let mut extractor = CodeBlockExtractor::new();
    extractor.observe("fix:\n`");
    extractor.observe("fix:\n```py");
    extractor.observe("fix:\n```python\nprint(1)\n`");
    extractor.observe(message);
    extractor.finish();
    assert_eq!(extractor.current(), Some("print(1)\n"));
}

#[test]
fn test_multibyte_content_streams_cleanly() {
    let message = "```python\n# комментарий\nprint(\"日本語\")\n```\n";
    let mut extractor = CodeBlockExtractor::new();
    stream_in_chunks(&mut extractor, message, 5);
    extractor.finish();
    assert_eq!(
        extractor.current(),
        Some("# комментарий\nprint(\"日本語\")\n")
    );
}

#[test]
fn test_commentary_only_reply_never_starts_capture() {
    let message = "I can't produce code for that, but here is an outline of the steps.";
    let mut extractor = CodeBlockExtractor::new();
    stream_in_chunks(&mut extractor, message, 9);
    extractor.finish();
    assert_eq!(extractor.current(), None);
    assert!(!extractor.has_captured());
}

#[test]
fn test_inline_code_span_before_the_real_fence() {
    let message = "Wrap it in ```try``` first:\n```python\ntry:\n    run()\n```\n";
    let mut extractor = CodeBlockExtractor::new();
    stream_in_chunks(&mut extractor, message, 4);
    extractor.finish();
    assert_eq!(extractor.current(), Some("try:\n    run()\n"));
}

#[test]
fn test_fence_offset_is_fixed_at_first_match() {
    let mut extractor = CodeBlockExtractor::new();
    extractor.observe("```python\nfirst line\n");
    assert_eq!(extractor.current(), Some("first line\n"));

    // Later cumulative text still appends past the original offset even
    // though it now contains a second fence-open marker.
    extractor.observe("```python\nfirst line\nx = ```\nsecond\n```js\nnot a new capture\n");
    let current = extractor.current().unwrap();
    assert!(current.starts_with("first line\n"));
    assert!(current.contains("not a new capture"));
}
