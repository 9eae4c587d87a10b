//! Local `script { … }` block body processing.
//!
//! Three CHTL-JS constructs are recognized inside an otherwise plain
//! JavaScript body: enhanced selectors `{{ … }}`, `vir` declarations, and
//! arrow-chain calls (`obj->method(...)`). Everything else is JS text.

use crate::fragment::{Fragment, FragmentKind, line_col_at};

use super::state::ScannerState;
use super::util::{backward_to_whitespace, is_word_at, scan_matching_double_brace, scan_until, skip_whitespace, starts_with};

fn is_word_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

fn is_vir_declaration(bytes: &[u8], i: usize) -> bool {
    if !is_word_at(bytes, i, b"vir") {
        return false;
    }
    let after_keyword = i + 3;
    let ident_start = skip_whitespace(bytes, after_keyword);
    ident_start > after_keyword && bytes.get(ident_start).is_some_and(|b| is_word_start(*b))
}

pub fn process(source: &str, start: usize, end: usize, out: &mut Vec<Fragment>) {
    let bytes = source.as_bytes();
    let mut state = ScannerState::default();
    let mut run_start = start;
    let mut i = start;

    while i < end {
        if state.is_boundary_legal() {
            if starts_with(bytes, i, b"{{") {
                flush(source, run_start, i, out);
                let construct_end = scan_matching_double_brace(bytes, i).min(end);
                push(source, i, construct_end, FragmentKind::ChtlJs, true, out);
                i = construct_end;
                run_start = i;
                continue;
            }
            if is_vir_declaration(bytes, i) {
                flush(source, run_start, i, out);
                let construct_end = scan_until(bytes, i, b";", false).min(end);
                push(source, i, construct_end, FragmentKind::ChtlJs, true, out);
                i = construct_end;
                run_start = i;
                continue;
            }
            if bytes[i] == b'-' && bytes.get(i + 1) == Some(&b'>') {
                let construct_start = backward_to_whitespace(bytes, run_start, i);
                flush(source, run_start, construct_start, out);
                let construct_end = scan_until(bytes, i + 2, b";,)", true).min(end);
                push(source, construct_start, construct_end, FragmentKind::ChtlJs, true, out);
                i = construct_end;
                run_start = i;
                continue;
            }
        }
        let consumed = state.update(bytes, i);
        i += consumed;
    }
    flush(source, run_start, end, out);
}

fn flush(source: &str, start: usize, end: usize, out: &mut Vec<Fragment>) {
    if start >= end {
        return;
    }
    push(source, start, end, FragmentKind::Js, false, out);
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
    fn vir_declaration_is_one_fragment() {
        let src = "vir x = listen({click: () => 1}); console.log(x);";
        let mut out = Vec::new();
        process(src, 0, src.len(), &mut out);
        let vir = out.iter().find(|f| f.kind == FragmentKind::ChtlJs).unwrap();
        assert_eq!(vir.text, "vir x = listen({click: () => 1});");
    }

    #[test]
    fn enhanced_selector_is_one_fragment() {
        let src = "let el = {{.box}}; el.addEventListener('click', f);";
        let mut out = Vec::new();
        process(src, 0, src.len(), &mut out);
        let selector = out.iter().find(|f| f.kind == FragmentKind::ChtlJs).unwrap();
        assert_eq!(selector.text, "{{.box}}");
    }

    #[test]
    fn arrow_chain_extends_to_call_boundaries() {
        let src = "btn->listen({click: fn}); next();";
        let mut out = Vec::new();
        process(src, 0, src.len(), &mut out);
        let chain = out.iter().find(|f| f.kind == FragmentKind::ChtlJs).unwrap();
        assert_eq!(chain.text, "btn->listen({click: fn});");
    }

    #[test]
    fn round_trips_to_original_text() {
        let src = "vir x = listen({click: () => 1}); btn->show(); let y = {{.a}};";
        let mut out = Vec::new();
        process(src, 0, src.len(), &mut out);
        let rebuilt: String = out.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(rebuilt, src);
    }
}
