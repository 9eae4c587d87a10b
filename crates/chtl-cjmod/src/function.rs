//! `CHTLJSFunction`: the registration object a CJMOD author builds before
//! handing it to the process-wide syntax manager. Grounded on the worked
//! `printMylove`/`iNeverAway` registrations: a name, an ordered parameter
//! list with optional defaults, an optional body template, and whether
//! `vir` objects are supported for this function.

use crate::syntax::{split_top_level_commas, strip_matching_braces};

#[derive(Debug, Clone)]
pub struct CHTLJSFunction {
    name: String,
    params: Vec<(String, Option<String>)>,
    body_template: Option<String>,
    vir_supported: bool,
}

impl CHTLJSFunction {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), params: Vec::new(), body_template: None, vir_supported: false }
    }

    pub fn add_param(&mut self, name: impl Into<String>, default_value: Option<String>) -> &mut Self {
        self.params.push((name.into(), default_value));
        self
    }

    pub fn set_body_template(&mut self, template: impl Into<String>) -> &mut Self {
        self.body_template = Some(template.into());
        self
    }

    pub fn enable_vir_support(&mut self, enable: bool) -> &mut Self {
        self.vir_supported = enable;
        self
    }

    pub fn is_vir_supported(&self) -> bool {
        self.vir_supported
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[(String, Option<String>)] {
        &self.params
    }

    /// Render the function body by substituting `${name}` placeholders
    /// with the matching call-site values, falling back to each
    /// parameter's declared default.
    pub fn generate_js(&self, values: &std::collections::HashMap<String, String>) -> String {
        let Some(template) = &self.body_template else {
            return String::new();
        };
        let mut rendered = template.clone();
        for (name, default) in &self.params {
            let value = values.get(name).cloned().or_else(|| default.clone()).unwrap_or_default();
            rendered = rendered.replace(&format!("${{{name}}}"), &value);
        }
        rendered
    }

    /// Render one `__chtl_vir_<name>_<key>()` accessor per key found in a
    /// `vir` declaration's call-site object literal, per the `iNeverAway`
    /// passthrough rule: no predefined schema, walk whatever keys the
    /// literal actually contains. Empty string when this function doesn't
    /// support vir objects.
    pub fn generate_vir_helpers(&self, object_literal: &str) -> String {
        if !self.vir_supported {
            return String::new();
        }
        let body = strip_matching_braces(object_literal.trim());
        let mut out = String::new();
        for item in split_top_level_commas(body) {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let Some((key, value)) = item.split_once(':') else {
                continue;
            };
            out.push_str(&format!(
                "function __chtl_vir_{}_{}() {{ return {}; }}\n",
                self.name,
                key.trim(),
                value.trim()
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_declared_params() {
        let mut f = CHTLJSFunction::new("printMylove");
        f.add_param("url", None).add_param("mode", Some("0".to_string())).set_body_template(
            "fetch(\"${url}\", ${mode});",
        );

        let mut values = std::collections::HashMap::new();
        values.insert("url".to_string(), "/love.png".to_string());

        assert_eq!(f.generate_js(&values), "fetch(\"/love.png\", 0);");
    }

    #[test]
    fn vir_helpers_walk_the_literal_keys_not_a_param_list() {
        let mut f = CHTLJSFunction::new("iNeverAway");
        f.enable_vir_support(true);

        let js = f.generate_vir_helpers("{click: () => 1, label: \"go\"}");
        assert!(js.contains("function __chtl_vir_iNeverAway_click() { return () => 1; }"));
        assert!(js.contains("function __chtl_vir_iNeverAway_label() { return \"go\"; }"));
    }

    #[test]
    fn vir_helpers_empty_when_support_disabled() {
        let f = CHTLJSFunction::new("printMylove");
        assert_eq!(f.generate_vir_helpers("{url: \"/a.png\"}"), "");
    }
}
