//! The lexical state machine shared by the top-level scanner and its local
//! `style`/`script` sub-processors.
//!
//! Modeled as a small mode enum plus three depth counters, per the design
//! note that all mode changes should go through one update function so the
//! boundary invariant (zero depth, `Normal` mode) can never drift out of
//! sync with itself.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
    /// The CHTL generator comment `-- … \n`.
    Generator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexMode {
    Normal,
    InString(u8),
    InComment(CommentKind),
}

impl Default for LexMode {
    fn default() -> Self {
        LexMode::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScannerState {
    pub brace_depth: i32,
    pub bracket_depth: i32,
    pub paren_depth: i32,
    pub mode: LexMode,
}

impl ScannerState {
    /// A fragment boundary is only legal at a point where every counter is
    /// zero and no string/comment is open.
    pub fn is_boundary_legal(&self) -> bool {
        self.mode == LexMode::Normal
            && self.brace_depth == 0
            && self.bracket_depth == 0
            && self.paren_depth == 0
    }

    /// Advance the state machine past `bytes[i]`. Returns how many bytes
    /// this step consumed — 2 when a two-byte comment opener/closer or a
    /// backslash escape is recognized, 1 otherwise — so the caller's cursor
    /// stays in sync with the mode transition.
    pub fn update(&mut self, bytes: &[u8], i: usize) -> usize {
        let byte = bytes[i];
        match self.mode {
            LexMode::InString(delim) => {
                if byte == b'\\' && i + 1 < bytes.len() {
                    return 2;
                }
                if byte == delim {
                    self.mode = LexMode::Normal;
                }
                1
            }
            LexMode::InComment(CommentKind::Line) | LexMode::InComment(CommentKind::Generator) => {
                if byte == b'\n' {
                    self.mode = LexMode::Normal;
                }
                1
            }
            LexMode::InComment(CommentKind::Block) => {
                if byte == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    self.mode = LexMode::Normal;
                    return 2;
                }
                1
            }
            LexMode::Normal => {
                let next = bytes.get(i + 1).copied();
                match (byte, next) {
                    (b'/', Some(b'/')) => {
                        self.mode = LexMode::InComment(CommentKind::Line);
                        2
                    }
                    (b'/', Some(b'*')) => {
                        self.mode = LexMode::InComment(CommentKind::Block);
                        2
                    }
                    (b'-', Some(b'-')) => {
                        self.mode = LexMode::InComment(CommentKind::Generator);
                        2
                    }
                    (b'"', _) | (b'\'', _) => {
                        self.mode = LexMode::InString(byte);
                        1
                    }
                    (b'{', _) => {
                        self.brace_depth += 1;
                        1
                    }
                    (b'}', _) => {
                        self.brace_depth -= 1;
                        1
                    }
                    (b'[', _) => {
                        self.bracket_depth += 1;
                        1
                    }
                    (b']', _) => {
                        self.bracket_depth -= 1;
                        1
                    }
                    (b'(', _) => {
                        self.paren_depth += 1;
                        1
                    }
                    (b')', _) => {
                        self.paren_depth -= 1;
                        1
                    }
                    _ => 1,
                }
            }
        }
    }
}
