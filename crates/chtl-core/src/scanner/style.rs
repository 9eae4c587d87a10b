//! Local `style { … }` block body processing.
//!
//! Substrings beginning with `@`, `&`, or the keywords `delete`/`inherit`
//! split out as CHTL fragments (these are CHTL-level directives such as
//! `@Style BoxStyle;` or `delete color;` inside an otherwise plain CSS
//! rule body); everything else is CSS text.

use crate::fragment::{Fragment, FragmentKind, line_col_at};

use super::state::ScannerState;
use super::util::{is_word_at, scan_until};

fn is_chtl_trigger(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'@' || bytes[i] == b'&' || is_word_at(bytes, i, b"delete") || is_word_at(bytes, i, b"inherit")
}

pub fn process(source: &str, start: usize, end: usize, out: &mut Vec<Fragment>) {
    let bytes = source.as_bytes();
    let mut state = ScannerState::default();
    let mut run_start = start;
    let mut i = start;

    while i < end {
        if state.is_boundary_legal() && is_chtl_trigger(bytes, i) {
            flush(source, run_start, i, FragmentKind::Css, out);
            let directive_end = scan_until(bytes, i, b";", false).min(end);
            push(source, i, directive_end, FragmentKind::Chtl, true, out);
            i = directive_end;
            run_start = i;
            continue;
        }
        let consumed = state.update(bytes, i);
        i += consumed;
    }
    flush(source, run_start, end, FragmentKind::Css, out);
}

fn flush(source: &str, start: usize, end: usize, kind: FragmentKind, out: &mut Vec<Fragment>) {
    if start >= end {
        return;
    }
    push(source, start, end, kind, false, out);
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

    #[test]
    fn splits_at_directive() {
        let src = "color: red; @Style Box; width: 1px;";
        let mut out = Vec::new();
        process(src, 0, src.len(), &mut out);
        assert!(out.iter().any(|f| f.kind == FragmentKind::Chtl && f.text.contains("@Style Box;")));
        assert!(out.iter().any(|f| f.kind == FragmentKind::Css && f.text.contains("color: red;")));
    }
}
