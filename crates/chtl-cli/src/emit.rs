//! Minimal HTML/CSS/JS document assembly from a scanned fragment stream.
//! The specification treats this assembly step as a thin, deliberately
//! trivial contract once fragments exist — this is not a general CHTL
//! parser, only enough structural recursion to turn element/text blocks
//! into tags and collect style/script bodies into the document.

use chtl_cjmod::{CHTLJSFunction, Syntax};
use chtl_core::{Diagnostic, FragmentKind};

/// The CJMOD syntax manager seeded with the engine's built-in vir-supported
/// function, mirroring `ChthollyJS.cpp`'s `registerINeverAway()`: a
/// passthrough marker-function group that accepts arbitrary caller-supplied
/// keys rather than a fixed parameter list.
fn builtin_syntax() -> Syntax {
    let mut syntax = Syntax::new();
    let mut i_never_away = CHTLJSFunction::new("iNeverAway");
    i_never_away.enable_vir_support(true);
    syntax.register_function(i_never_away);
    syntax
}

pub fn emit_document(source: &str, file_name: &str) -> Result<String, Vec<Diagnostic>> {
    let (fragments, diagnostics) = chtl_core::scan(source, file_name);
    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    let syntax = builtin_syntax();
    let mut css = String::new();
    let mut js = String::new();
    let mut vir_prelude = String::new();
    let mut chtl_text = String::new();

    for fragment in &fragments {
        match fragment.kind {
            FragmentKind::Css => css.push_str(&fragment.text),
            FragmentKind::Js => js.push_str(&fragment.text),
            FragmentKind::ChtlJs => {
                if let Some(helpers) = syntax.emit_vir_helpers(&fragment.text) {
                    vir_prelude.push_str(&helpers);
                }
                js.push_str(&fragment.text);
            }
            FragmentKind::Chtl => chtl_text.push_str(&fragment.text),
        }
    }

    let body = render_elements(&chtl_text);

    let mut doc = String::from("<!DOCTYPE html>\n<html>\n<head>\n");
    if !css.trim().is_empty() {
        doc.push_str("<style>\n");
        doc.push_str(css.trim());
        doc.push_str("\n</style>\n");
    }
    doc.push_str("</head>\n<body>\n");
    doc.push_str(&body);
    doc.push_str("\n</body>\n");
    if !vir_prelude.is_empty() || !js.trim().is_empty() {
        doc.push_str("<script>\n");
        doc.push_str(&vir_prelude);
        doc.push_str(js.trim());
        doc.push_str("\n</script>\n");
    }
    doc.push_str("</html>\n");
    Ok(doc)
}

/// Recursively render `name { ... }` blocks as tags, `text { ... }` as
/// literal content, and skip `style`/`script` blocks (their bodies were
/// already diverted into the document's CSS/JS sections). `key: value;`
/// lines are attribute-like statements and are not rendered as content.
fn render_elements(src: &str) -> String {
    let mut out = String::new();
    let bytes = src.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        i = skip_whitespace(bytes, i);
        if i >= bytes.len() {
            break;
        }

        if is_ident_start(bytes[i]) {
            let ident_start = i;
            while i < bytes.len() && is_ident_byte(bytes[i]) {
                i += 1;
            }
            let ident = &src[ident_start..i];

            let after_ident = skip_whitespace(bytes, i);

            if after_ident < bytes.len() && bytes[after_ident] == b'{' {
                let body_start = after_ident + 1;
                let body_end = match matching_brace(bytes, after_ident) {
                    Some(end) => end,
                    None => bytes.len(),
                };
                let body = &src[body_start..body_end.min(src.len())];

                match ident {
                    "text" => out.push_str(body.trim()),
                    "style" | "script" => {}
                    _ => {
                        out.push('<');
                        out.push_str(ident);
                        out.push('>');
                        out.push_str(&render_elements(body));
                        out.push_str("</");
                        out.push_str(ident);
                        out.push('>');
                    }
                }
                i = (body_end + 1).min(bytes.len());
                continue;
            }

            if after_ident < bytes.len() && bytes[after_ident] == b':' {
                i = skip_to_semicolon(bytes, after_ident + 1);
                continue;
            }

            i = after_ident;
            continue;
        }

        i += 1;
    }

    out
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn skip_to_semicolon(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i] != b';' {
        i += 1;
    }
    if i < bytes.len() {
        i += 1;
    }
    i
}

fn matching_brace(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0i32;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn div_text_hello_renders_as_nested_tag() {
        let doc = emit_document("div { text { Hello } }", "demo.chtl").unwrap();
        assert!(doc.contains("<div>Hello</div>"));
    }

    #[test]
    fn style_and_script_bodies_land_in_document_sections() {
        let source = "div { style { color: red; } script { vir x = 1; } }";
        let doc = emit_document(source, "demo.chtl").unwrap();
        assert!(doc.contains("<style>"));
        assert!(doc.contains("color: red;"));
        assert!(doc.contains("<script>"));
    }

    #[test]
    fn vir_declaration_emits_chtl_vir_helpers_into_the_script_prelude() {
        let source = "div { script { vir love = iNeverAway({url: \"/a.png\", mode: 2}); } }";
        let doc = emit_document(source, "demo.chtl").unwrap();
        assert!(doc.contains("function __chtl_vir_iNeverAway_url() { return \"/a.png\"; }"));
        assert!(doc.contains("function __chtl_vir_iNeverAway_mode() { return 2; }"));
        assert!(doc.contains("vir love = iNeverAway({url: \"/a.png\", mode: 2});"));
    }

    #[test]
    fn nested_elements_render_in_order() {
        let doc = emit_document("div { span { text { A } } p { text { B } } }", "demo.chtl").unwrap();
        let span_pos = doc.find("<span>").unwrap();
        let p_pos = doc.find("<p>").unwrap();
        assert!(span_pos < p_pos);
    }
}
