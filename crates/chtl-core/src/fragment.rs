//! Fragment and diagnostic types produced by the unified scanner.

use std::fmt;

/// The language a [`Fragment`]'s text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    Chtl,
    Css,
    Js,
    ChtlJs,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FragmentKind::Chtl => "CHTL",
            FragmentKind::Css => "CSS",
            FragmentKind::Js => "JS",
            FragmentKind::ChtlJs => "CHTL_JS",
        };
        write!(f, "{s}")
    }
}

/// A contiguous slice of source annotated with its language kind and
/// position. Spans are half-open byte offsets into the original source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub kind: FragmentKind,
    pub text: String,
    pub span: (usize, usize),
    pub start_line: usize,
    pub start_col: usize,
    /// A complete CHTL declaration or CHTL-JS construct. Minimal units are
    /// never merged with a neighboring fragment of the same kind.
    pub minimal_unit: bool,
}

/// A non-fatal scanner finding: file, position, and message. The scanner
/// never aborts on malformed input; it records diagnostics and continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: String,
    pub line: usize,
    pub col: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[SyntaxError {}:{}:{}] {}", self.file, self.line, self.col, self.message)
    }
}

/// Merge adjacent fragments of the same kind, skipping over minimal units.
pub fn merge_adjacent(fragments: Vec<Fragment>) -> Vec<Fragment> {
    let mut merged: Vec<Fragment> = Vec::with_capacity(fragments.len());
    for frag in fragments {
        if let Some(last) = merged.last_mut()
            && last.kind == frag.kind
            && !last.minimal_unit
            && !frag.minimal_unit
            && last.span.1 == frag.span.0
        {
            last.text.push_str(&frag.text);
            last.span.1 = frag.span.1;
            continue;
        }
        merged.push(frag);
    }
    merged
}

/// Compute the 1-based line and column for a byte offset into `source`.
pub fn line_col_at(source: &str, byte_offset: usize) -> (usize, usize) {
    let mut line = 1usize;
    let mut col = 1usize;
    for (i, b) in source.as_bytes().iter().enumerate() {
        if i >= byte_offset {
            break;
        }
        if *b == b'\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}
