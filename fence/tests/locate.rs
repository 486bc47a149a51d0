use fence::{
    CodeBlock, Document, LocateError, TextDocument, locate_adjacent_output_block,
    locate_enclosing_block, scan_blocks,
};

fn doc(lines: &[&str]) -> TextDocument {
    TextDocument::new(&lines.join("\n"))
}

fn block(start_line: usize, end_line: usize, language: &str) -> CodeBlock {
    CodeBlock {
        start_line,
        end_line,
        language: language.to_string(),
    }
}

#[test]
fn finds_block_around_body_line() {
    let d = doc(&["intro", "```python", "x = 1", "print(x)", "```", "outro"]);
    assert_eq!(locate_enclosing_block(&d, 2), Ok(block(1, 4, "python")));
    assert_eq!(locate_enclosing_block(&d, 3), Ok(block(1, 4, "python")));
}

#[test]
fn fence_lines_count_as_inside() {
    let d = doc(&["```js", "console.log(1)", "```"]);
    assert_eq!(locate_enclosing_block(&d, 0), Ok(block(0, 2, "js")));
    assert_eq!(locate_enclosing_block(&d, 2), Ok(block(0, 2, "js")));
}

#[test]
fn body_is_lines_between_fences() {
    let d = doc(&["```python", "a = 1", "", "print(a)", "```"]);
    let b = locate_enclosing_block(&d, 1).unwrap();
    assert_eq!(b.body(&d), "a = 1\n\nprint(a)");
}

#[test]
fn empty_block_has_empty_body() {
    let d = doc(&["```python", "```"]);
    let b = locate_enclosing_block(&d, 0).unwrap();
    assert_eq!(b.body(&d), "");
}

#[test]
fn language_is_lowercased_and_optional() {
    let d = doc(&["```PyThOn", "1", "```", "```", "2", "```"]);
    assert_eq!(locate_enclosing_block(&d, 1).unwrap().language, "python");
    assert_eq!(locate_enclosing_block(&d, 4).unwrap().language, "");
}

#[test]
fn picks_tightest_block_not_previous_closing_fence() {
    let d = doc(&[
        "```python",
        "first()",
        "```",
        "",
        "```js",
        "second()",
        "```",
    ]);
    assert_eq!(locate_enclosing_block(&d, 5), Ok(block(4, 6, "js")));
    assert_eq!(locate_enclosing_block(&d, 1), Ok(block(0, 2, "python")));
}

#[test]
fn cursor_between_blocks_is_not_inside_any() {
    let d = doc(&[
        "```python",
        "first()",
        "```",
        "between",
        "```js",
        "second()",
        "```",
    ]);
    assert_eq!(
        locate_enclosing_block(&d, 3),
        Err(LocateError::NoBlockFound { anchor: 3 })
    );
}

#[test]
fn no_fence_above_cursor() {
    let d = doc(&["just prose", "more prose"]);
    assert_eq!(
        locate_enclosing_block(&d, 1),
        Err(LocateError::NoBlockFound { anchor: 1 })
    );
}

#[test]
fn anchor_past_end_is_not_found() {
    let d = doc(&["```python", "x", "```"]);
    assert_eq!(
        locate_enclosing_block(&d, 3),
        Err(LocateError::NoBlockFound { anchor: 3 })
    );
}

#[test]
fn document_ending_after_opening_fence_is_unclosed() {
    let d = doc(&["```python"]);
    assert_eq!(
        locate_enclosing_block(&d, 0),
        Err(LocateError::UnclosedBlock { start_line: 0 })
    );

    let d = doc(&["```python", "print(1)", "still going"]);
    assert_eq!(
        locate_enclosing_block(&d, 2),
        Err(LocateError::UnclosedBlock { start_line: 0 })
    );
}

#[test]
fn unclosed_block_after_closed_one() {
    let d = doc(&["```js", "a", "```", "```python", "b"]);
    assert_eq!(locate_enclosing_block(&d, 1), Ok(block(0, 2, "js")));
    assert_eq!(
        locate_enclosing_block(&d, 4),
        Err(LocateError::UnclosedBlock { start_line: 3 })
    );
}

#[test]
fn first_fence_closes_even_with_tag() {
    // No nesting: the tagged fence on line 2 closes the block.
    let d = doc(&["```markdown", "text", "```python", "code", "```"]);
    assert_eq!(locate_enclosing_block(&d, 1), Ok(block(0, 2, "markdown")));
    assert_eq!(
        locate_enclosing_block(&d, 3),
        Err(LocateError::NoBlockFound { anchor: 3 })
    );
    assert_eq!(
        locate_enclosing_block(&d, 4),
        Err(LocateError::UnclosedBlock { start_line: 4 })
    );
}

#[test]
fn indented_fences_are_recognized() {
    let d = doc(&["- item", "  ```python", "  print(1)", "  ```"]);
    let b = locate_enclosing_block(&d, 2).unwrap();
    assert_eq!(b, block(1, 3, "python"));
    assert_eq!(b.body(&d), "  print(1)");
}

#[test]
fn scan_lists_closed_blocks_in_order() {
    let d = doc(&[
        "# Notes",
        "```python",
        "1",
        "```",
        "```output",
        "1",
        "```",
        "",
        "```js",
        "2",
        "```",
        "```llm",
        "dangling",
    ]);
    assert_eq!(
        scan_blocks(&d),
        vec![block(1, 3, "python"), block(4, 6, "output"), block(8, 10, "js")]
    );
}

#[test]
fn output_block_directly_after_closing_fence() {
    let d = doc(&["```python", "print(2)", "```", "```output", "2", "```", "", "tail"]);
    let out = locate_adjacent_output_block(&d, 2).unwrap();
    assert_eq!((out.start_line, out.end_line, out.closed), (3, 6, true));
    assert_eq!(out.body(&d), "2");
    assert_eq!(out.line_len(), 3);
}

#[test]
fn output_block_separated_by_blank_line_is_not_adjacent() {
    let d = doc(&["```python", "print(2)", "```", "", "```output", "2", "```"]);
    assert_eq!(locate_adjacent_output_block(&d, 2), None);
}

#[test]
fn other_block_after_closing_fence_is_not_output() {
    let d = doc(&["```python", "a", "```", "```python", "b", "```"]);
    assert_eq!(locate_adjacent_output_block(&d, 2), None);
}

#[test]
fn nothing_after_last_line() {
    let d = doc(&["```python", "a", "```"]);
    assert_eq!(locate_adjacent_output_block(&d, 2), None);
}

#[test]
fn unclosed_output_block_runs_to_end() {
    let d = doc(&["```python", "a", "```", "```output", "partial", "more"]);
    let out = locate_adjacent_output_block(&d, 2).unwrap();
    assert_eq!((out.start_line, out.end_line, out.closed), (3, 6, false));
    assert_eq!(out.end_line, d.line_count());
    assert_eq!(out.body(&d), "partial\nmore");
}
