//! Scan strategies for locating a registered CJMOD pattern inside a
//! CHTL_JS fragment's text: a dual-pointer sliding window that tries
//! ever-larger candidate spans starting at each keyword occurrence, and a
//! front-extract strategy for back-anchored keywords (`**`, `arg`-style)
//! where the terminating token precedes the content it governs.

/// One located occurrence of a registered keyword inside source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// Slide a window outward from every occurrence of `keyword`, starting
/// at the keyword itself and growing to the right one token at a time,
/// stopping at the first `;`, `,`, `)` or newline that sits outside
/// nested brace/paren/bracket depth. Returns one match per keyword
/// occurrence, longest legal span first found.
pub fn sliding_window_scan(haystack: &str, keyword: &str) -> Vec<Match> {
    let bytes = haystack.as_bytes();
    let mut matches = Vec::new();
    let mut search_from = 0usize;

    while let Some(rel) = haystack[search_from..].find(keyword) {
        let start = search_from + rel;
        let end = extend_to_boundary(bytes, start + keyword.len());
        matches.push(Match { start, end, text: haystack[start..end].to_string() });
        search_from = start + keyword.len();
        if search_from > haystack.len() {
            break;
        }
    }
    matches
}

fn extend_to_boundary(bytes: &[u8], mut i: usize) -> usize {
    let mut depth = 0i32;
    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'(' | b'[' => depth += 1,
            b'}' | b')' | b']' => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            b';' if depth == 0 => {
                i += 1;
                break;
            }
            b',' | b'\n' if depth == 0 => break,
            _ => {}
        }
        i += 1;
    }
    i
}

/// Front-extract strategy: for a keyword that anchors at the *end* of
/// the construct it governs (e.g. a trailing `**` exponent operator, or
/// an `arg` marker closing a capture list), walk backward from the
/// keyword to the start of the enclosing expression instead of forward.
pub fn front_extract(haystack: &str, keyword: &str) -> Vec<Match> {
    let bytes = haystack.as_bytes();
    let mut matches = Vec::new();
    let mut search_from = 0usize;

    while let Some(rel) = haystack[search_from..].find(keyword) {
        let kw_start = search_from + rel;
        let start = extract_back_to_boundary(bytes, kw_start);
        let end = kw_start + keyword.len();
        matches.push(Match { start, end, text: haystack[start..end].to_string() });
        search_from = kw_start + keyword.len();
        if search_from > haystack.len() {
            break;
        }
    }
    matches
}

fn extract_back_to_boundary(bytes: &[u8], mut i: usize) -> usize {
    let mut depth = 0i32;
    while i > 0 {
        let b = bytes[i - 1];
        match b {
            b'}' | b')' | b']' => depth += 1,
            b'{' | b'(' | b'[' => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            b';' | b',' | b'\n' if depth == 0 => break,
            b' ' | b'\t' if depth == 0 && i > 0 && is_at_word_start(bytes, i - 1) => break,
            _ => {}
        }
        i -= 1;
    }
    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
        i += 1;
    }
    i
}

fn is_at_word_start(bytes: &[u8], i: usize) -> bool {
    i == 0 || !bytes[i - 1].is_ascii_alphanumeric()
}

/// Collect-mode extraction: given a keyword whose own characters open a
/// brace-delimited capture list (e.g. `{{` for enhanced selectors),
/// return the balanced span from the keyword through its matching close.
pub fn collect_braced(haystack: &str, keyword: &str) -> Vec<Match> {
    let bytes = haystack.as_bytes();
    let mut matches = Vec::new();
    let mut search_from = 0usize;
    let opening_depth = keyword.bytes().filter(|&b| b == b'{').count() as i32
        - keyword.bytes().filter(|&b| b == b'}').count() as i32;

    while let Some(rel) = haystack[search_from..].find(keyword) {
        let kw_start = search_from + rel;
        let mut i = kw_start + keyword.len();
        let mut depth = opening_depth;
        if depth > 0 {
            while i < bytes.len() && depth > 0 {
                match bytes[i] {
                    b'{' => depth += 1,
                    b'}' => depth -= 1,
                    _ => {}
                }
                i += 1;
            }
        }
        matches.push(Match { start: kw_start, end: i, text: haystack[kw_start..i].to_string() });
        search_from = i.max(kw_start + keyword.len());
        if search_from > haystack.len() {
            break;
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sliding_window_stops_at_top_level_semicolon() {
        let src = "listen({click: fn(e) { doThing(); }});";
        let matches = sliding_window_scan(src, "listen");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "listen({click: fn(e) { doThing(); }});");
    }

    #[test]
    fn sliding_window_finds_every_occurrence() {
        let src = "vir a = f(); vir b = g();";
        let matches = sliding_window_scan(src, "vir");
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn front_extract_walks_back_to_expression_start() {
        let src = "total = base **;";
        let matches = front_extract(src, "**");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "base **");
    }

    #[test]
    fn collect_braced_returns_balanced_body() {
        let src = "{{ .box }} .on('click');";
        let matches = collect_braced(src, "{{");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "{{ .box }}");
    }
}
