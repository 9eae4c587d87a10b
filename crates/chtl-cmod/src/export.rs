//! `CMODExport`: the eleven parallel symbol-name lists declared by an
//! optional `[Export] { ... }` block, or auto-generated by walking the
//! module's source tree when no explicit block (or kind) is present.

use crate::info::extract_block;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CMODExport {
    pub custom_elements: Vec<String>,
    pub custom_styles: Vec<String>,
    pub custom_vars: Vec<String>,
    pub template_elements: Vec<String>,
    pub template_styles: Vec<String>,
    pub template_vars: Vec<String>,
    pub origin_html: Vec<String>,
    pub origin_style: Vec<String>,
    pub origin_js: Vec<String>,
    pub origin_custom_types: Vec<String>,
    pub configurations: Vec<String>,
}

/// `(line prefix, field accessor)` table for every recognized export
/// line shape, e.g. `[Custom] @Style X, Y;`.
const LINE_SHAPES: &[(&str, &str)] = &[
    ("[Custom] @Element", "custom_elements"),
    ("[Custom] @Style", "custom_styles"),
    ("[Custom] @Var", "custom_vars"),
    ("[Template] @Element", "template_elements"),
    ("[Template] @Style", "template_styles"),
    ("[Template] @Var", "template_vars"),
    ("[Origin] @Html", "origin_html"),
    ("[Origin] @Style", "origin_style"),
    ("[Origin] @JavaScript", "origin_js"),
    ("[Origin] @CustomType", "origin_custom_types"),
    ("[Configuration]", "configurations"),
];

impl CMODExport {
    pub fn parse(source: &str) -> Self {
        let mut export = CMODExport::default();
        let Some(body) = extract_block(source, "[Export]") else { return export };

        for stmt in body.split(';') {
            let stmt = stmt.trim();
            if stmt.is_empty() {
                continue;
            }
            for (prefix, field) in LINE_SHAPES {
                if let Some(rest) = stmt.strip_prefix(prefix) {
                    let names: Vec<String> = rest.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect();
                    export.field_mut(field).extend(names);
                    break;
                }
            }
        }
        export
    }

    fn field_mut(&mut self, name: &str) -> &mut Vec<String> {
        match name {
            "custom_elements" => &mut self.custom_elements,
            "custom_styles" => &mut self.custom_styles,
            "custom_vars" => &mut self.custom_vars,
            "template_elements" => &mut self.template_elements,
            "template_styles" => &mut self.template_styles,
            "template_vars" => &mut self.template_vars,
            "origin_html" => &mut self.origin_html,
            "origin_style" => &mut self.origin_style,
            "origin_js" => &mut self.origin_js,
            "origin_custom_types" => &mut self.origin_custom_types,
            "configurations" => &mut self.configurations,
            _ => unreachable!("field name drawn from LINE_SHAPES"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.custom_elements.is_empty()
            && self.custom_styles.is_empty()
            && self.custom_vars.is_empty()
            && self.template_elements.is_empty()
            && self.template_styles.is_empty()
            && self.template_vars.is_empty()
            && self.origin_html.is_empty()
            && self.origin_style.is_empty()
            && self.origin_js.is_empty()
            && self.origin_custom_types.is_empty()
            && self.configurations.is_empty()
    }

    /// Fill any empty list by scanning `source_files` text for the
    /// corresponding top-level declarations. Explicit `[Export]` entries
    /// parsed above always take precedence; this only fills gaps.
    pub fn auto_generate(&mut self, sources: impl IntoIterator<Item = impl AsRef<str>>) {
        let joined: String = sources.into_iter().map(|s| s.as_ref().to_string()).collect::<Vec<_>>().join("\n");

        if self.custom_elements.is_empty() {
            self.custom_elements = find_declarations(&joined, "[Custom] @Element");
        }
        if self.custom_styles.is_empty() {
            self.custom_styles = find_declarations(&joined, "[Custom] @Style");
        }
        if self.custom_vars.is_empty() {
            self.custom_vars = find_declarations(&joined, "[Custom] @Var");
        }
        if self.template_elements.is_empty() {
            self.template_elements = find_declarations(&joined, "[Template] @Element");
        }
        if self.template_styles.is_empty() {
            self.template_styles = find_declarations(&joined, "[Template] @Style");
        }
        if self.template_vars.is_empty() {
            self.template_vars = find_declarations(&joined, "[Template] @Var");
        }
    }

    pub fn serialize(&self) -> String {
        let mut lines = Vec::new();
        push_line(&mut lines, "[Custom] @Element", &self.custom_elements);
        push_line(&mut lines, "[Custom] @Style", &self.custom_styles);
        push_line(&mut lines, "[Custom] @Var", &self.custom_vars);
        push_line(&mut lines, "[Template] @Element", &self.template_elements);
        push_line(&mut lines, "[Template] @Style", &self.template_styles);
        push_line(&mut lines, "[Template] @Var", &self.template_vars);
        push_line(&mut lines, "[Origin] @Html", &self.origin_html);
        push_line(&mut lines, "[Origin] @Style", &self.origin_style);
        push_line(&mut lines, "[Origin] @JavaScript", &self.origin_js);
        push_line(&mut lines, "[Origin] @CustomType", &self.origin_custom_types);
        push_line(&mut lines, "[Configuration]", &self.configurations);

        if lines.is_empty() {
            return String::new();
        }
        format!("[Export]\n{{\n{}\n}}\n", lines.join("\n"))
    }
}

fn push_line(lines: &mut Vec<String>, prefix: &str, names: &[String]) {
    if !names.is_empty() {
        lines.push(format!("    {} {};", prefix, names.join(", ")));
    }
}

/// A declaration is recognized as `<keyword> <Name>` at the start of a
/// top-level block, e.g. `[Custom] @Element Box { ... }`.
fn find_declarations(source: &str, keyword: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut search_from = 0usize;
    while let Some(rel) = source[search_from..].find(keyword) {
        let start = search_from + rel + keyword.len();
        let rest = source[start..].trim_start();
        let name: String = rest.chars().take_while(|c| c.is_alphanumeric() || *c == '_').collect();
        if !name.is_empty() {
            names.push(name);
        }
        search_from = start;
        if search_from >= source.len() {
            break;
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_export_block_lines() {
        let source = r#"
[Export]
{
    [Custom] @Style Box, Card;
    [Template] @Element Header;
}
"#;
        let export = CMODExport::parse(source);
        assert_eq!(export.custom_styles, vec!["Box", "Card"]);
        assert_eq!(export.template_elements, vec!["Header"]);
        assert!(export.origin_html.is_empty());
    }

    #[test]
    fn auto_generate_fills_only_empty_lists() {
        let mut export = CMODExport::default();
        export.custom_styles = vec!["Manual".to_string()];
        export.auto_generate(["[Custom] @Style Ignored { }", "[Template] @Element Header { }"]);
        assert_eq!(export.custom_styles, vec!["Manual"]);
        assert_eq!(export.template_elements, vec!["Header"]);
    }
}
