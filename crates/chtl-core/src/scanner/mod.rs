//! The unified scanner: fragments a mixed `.chtl` source into typed
//! `{CHTL, CSS, JS, CHTL_JS}` slices.
//!
//! The top-level pass only ever needs to recognize two things: a CHTL
//! keyword block (`[Template]`, `[Custom]`, `[Configuration]`,
//! `[Namespace]`, `[Import]`, `[Origin]`) and the two reserved element
//! bodies that switch language (`style`, `script`). Everything else stays
//! one mergeable CHTL run. `style`/`script` bodies are handed to their own
//! sub-processors ([`style`] and [`script`]) with a completely fresh local
//! [`ScannerState`] — the outer scan's depth counters never see their
//! internal braces, so the boundary invariant holds at both levels
//! independently.

mod script;
mod state;
mod style;
mod util;

use crate::fragment::{Diagnostic, Fragment, FragmentKind, line_col_at, merge_adjacent};
use state::{LexMode, ScannerState};
use util::{is_word_at, scan_matching, skip_whitespace, starts_with};

const KEYWORD_BLOCKS: &[&str] =
    &["[Template]", "[Custom]", "[Configuration]", "[Namespace]", "[Import]", "[Origin]"];

/// Fragment `source` (attributed to `file_name` in diagnostics) into typed
/// slices. Never fails outright; malformed input is reported as
/// diagnostics while the scanner keeps going.
pub fn scan(source: &str, file_name: &str) -> (Vec<Fragment>, Vec<Diagnostic>) {
    let bytes = source.as_bytes();
    let mut out = Vec::new();
    let mut diagnostics = Vec::new();
    let mut state = ScannerState::default();
    let mut run_start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        if state.is_boundary_legal() {
            if let Some(keyword) = keyword_block_at(bytes, i) {
                flush_chtl(source, run_start, i, &mut out);
                let block_end = block_extent(bytes, i + keyword.len());
                push(source, i, block_end, FragmentKind::Chtl, true, &mut out);
                i = block_end;
                run_start = i;
                continue;
            }
            if let Some((sub, len)) = reserved_element_at(bytes, i) {
                let brace_at = skip_whitespace(bytes, i + len);
                if bytes.get(brace_at) == Some(&b'{') {
                    flush_chtl(source, run_start, i, &mut out);
                    let header_end = brace_at + 1;
                    push(source, i, header_end, FragmentKind::Chtl, true, &mut out);
                    let close_at = scan_matching(bytes, brace_at, b'{', b'}');
                    let body_end = close_at.saturating_sub(1);
                    match sub {
                        Reserved::Style => style::process(source, header_end, body_end, &mut out),
                        Reserved::Script => script::process(source, header_end, body_end, &mut out),
                    }
                    if body_end < close_at {
                        push(source, body_end, close_at, FragmentKind::Chtl, true, &mut out);
                    }
                    i = close_at;
                    run_start = i;
                    continue;
                }
            }
        }
        let consumed = state.update(bytes, i);
        i += consumed;
    }
    flush_chtl(source, run_start, bytes.len(), &mut out);

    if state.mode != LexMode::Normal {
        let (line, col) = line_col_at(source, bytes.len());
        diagnostics.push(Diagnostic {
            file: file_name.to_string(),
            line,
            col,
            message: "unterminated string or comment at end of file".to_string(),
        });
    }
    if state.brace_depth != 0 || state.bracket_depth != 0 || state.paren_depth != 0 {
        let (line, col) = line_col_at(source, bytes.len());
        diagnostics.push(Diagnostic {
            file: file_name.to_string(),
            line,
            col,
            message: "unbalanced braces/brackets/parentheses at end of file".to_string(),
        });
    }

    (merge_adjacent(out), diagnostics)
}

fn keyword_block_at(bytes: &[u8], i: usize) -> Option<&'static str> {
    KEYWORD_BLOCKS.iter().find(|kw| starts_with(bytes, i, kw.as_bytes())).copied()
}

enum Reserved {
    Style,
    Script,
}

fn reserved_element_at(bytes: &[u8], i: usize) -> Option<(Reserved, usize)> {
    if is_word_at(bytes, i, b"style") {
        Some((Reserved::Style, 5))
    } else if is_word_at(bytes, i, b"script") {
        Some((Reserved::Script, 6))
    } else {
        None
    }
}

/// Find the end of a `[Keyword] …` block: through the matching `}` if a
/// `{` is reached first at zero depth, otherwise through the next `;`.
fn block_extent(bytes: &[u8], start: usize) -> usize {
    let mut state = ScannerState::default();
    let mut i = start;
    while i < bytes.len() {
        if state.is_boundary_legal() {
            match bytes[i] {
                b'{' => return scan_matching(bytes, i, b'{', b'}'),
                b';' => return i + 1,
                _ => {}
            }
        }
        let consumed = state.update(bytes, i);
        i += consumed;
    }
    bytes.len()
}

fn flush_chtl(source: &str, start: usize, end: usize, out: &mut Vec<Fragment>) {
    if start >= end {
        return;
    }
    push(source, start, end, FragmentKind::Chtl, false, out);
}

fn push(source: &str, start: usize, end: usize, kind: FragmentKind, minimal_unit: bool, out: &mut Vec<Fragment>) {
    let (line, col) = line_col_at(source, start);
    out.push(Fragment {
        kind,
        text: source[start..end].to_string(),
        span: (start, end),
        start_line: line,
        start_col: col,
        minimal_unit,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(fragments: &[Fragment]) -> String {
        fragments.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn scenario_div_text_hello() {
        let src = "div { text { Hello } }";
        let (fragments, diags) = scan(src, "t.chtl");
        assert!(diags.is_empty());
        assert_eq!(reconstruct(&fragments), src);
        assert!(fragments.iter().all(|f| f.kind == FragmentKind::Chtl));
    }

    #[test]
    fn round_trip_with_style_and_script() {
        let src = "div { style { color: red; @Style Box; } script { vir x = listen({click: () => 1}); } }";
        let (fragments, diags) = scan(src, "t.chtl");
        assert!(diags.is_empty());
        assert_eq!(reconstruct(&fragments), src);
    }

    #[test]
    fn fragment_spans_tile_the_source_with_no_gaps() {
        let src = "div { style { color: red; } script { a->b(); } }";
        let (fragments, _) = scan(src, "t.chtl");
        let mut prev_end = 0;
        for f in &fragments {
            assert_eq!(f.span.0, prev_end);
            prev_end = f.span.1;
        }
        assert_eq!(prev_end, src.len());
    }

    #[test]
    fn vir_in_script_block_is_not_split() {
        let src = "script { vir x = listen({click: () => 1}); }";
        let (fragments, _) = scan(src, "t.chtl");
        let vir = fragments.iter().find(|f| f.kind == FragmentKind::ChtlJs).unwrap();
        assert_eq!(vir.text, "vir x = listen({click: () => 1});");
    }

    #[test]
    fn import_keyword_block_is_minimal_unit() {
        let src = "[Import] @Chtl from \"a\"; div { text { Hi } }";
        let (fragments, _) = scan(src, "t.chtl");
        let import = &fragments[0];
        assert_eq!(import.kind, FragmentKind::Chtl);
        assert!(import.minimal_unit);
        assert_eq!(import.text, "[Import] @Chtl from \"a\";");
    }
}
