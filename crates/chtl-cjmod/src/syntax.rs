//! `Syntax`: the central CJMOD manager. Parses a pattern string into an
//! ordered list of argument slots, accepts typed bind closures for
//! placeholder (`$`) and named slots, applies per-slot transform
//! templates, and renders the final call.

use std::collections::{HashMap, HashSet};

use crate::arg::{Arg, ArgValue};
use crate::error::CjmodError;
use crate::function::CHTLJSFunction;

/// A single argument slot parsed out of a registration pattern.
pub struct Slot {
    pub name: String,
    pub is_placeholder: bool,
    pub raw_value: Option<String>,
    pub transformed_value: Option<String>,
    pub template: Option<String>,
    bind_fn: Option<Box<dyn Fn(&str) -> String>>,
}

impl Slot {
    fn new(name: String, is_placeholder: bool, literal: Option<String>) -> Self {
        Self {
            name,
            is_placeholder,
            raw_value: literal.clone(),
            transformed_value: literal,
            template: None,
            bind_fn: None,
        }
    }

    fn rendered(&self) -> String {
        self.transformed_value.clone().or_else(|| self.raw_value.clone()).unwrap_or_default()
    }
}

impl std::fmt::Debug for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Slot")
            .field("name", &self.name)
            .field("is_placeholder", &self.is_placeholder)
            .field("raw_value", &self.raw_value)
            .field("transformed_value", &self.transformed_value)
            .field("template", &self.template)
            .field("bound", &self.bind_fn.is_some())
            .finish()
    }
}

type TransformRule = Box<dyn Fn(&HashMap<String, Arg>) -> String>;

#[derive(Default)]
pub struct Syntax {
    function_name: Option<String>,
    slots: Vec<Slot>,
    last_bound: Option<usize>,
    transform_rule: Option<TransformRule>,
    functions: HashMap<String, CHTLJSFunction>,
    vir_supported_functions: HashSet<String>,
}

impl Syntax {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a registration pattern such as `printMylove({url: $, mode: $})`
    /// or a bare positional form `f($, $, $)` into ordered slots.
    pub fn analyze_pattern(&mut self, pattern: &str) -> Result<(), CjmodError> {
        let trimmed = pattern.trim();
        let (name, inner) = split_call(trimmed).ok_or_else(|| CjmodError::MalformedPattern(trimmed.to_string()))?;
        self.function_name = name;

        let body = strip_matching_braces(inner.trim());
        self.slots = split_top_level_commas(body)
            .into_iter()
            .filter(|item| !item.trim().is_empty())
            .map(parse_slot_item)
            .collect();
        Ok(())
    }

    fn find_unbound_placeholder(&mut self) -> Option<usize> {
        self.slots.iter().position(|s| s.is_placeholder && s.bind_fn.is_none())
    }

    fn find_by_name(&mut self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.name == name)
    }

    fn slot_index_for_bind(&mut self, name: &str) -> Option<usize> {
        if name == "$" { self.find_unbound_placeholder() } else { self.find_by_name(name) }
    }

    /// Attach a string-typed bind closure. Multiple `bind("$", ...)` calls
    /// queue onto successive unbound placeholder slots in declaration
    /// order; they are never replaced.
    pub fn bind_str(&mut self, name: &str, f: impl Fn(&str) -> String + 'static) -> Result<(), CjmodError> {
        let idx = self.slot_index_for_bind(name).ok_or_else(|| CjmodError::UnknownSlot(name.to_string()))?;
        self.slots[idx].bind_fn = Some(Box::new(move |raw| f(raw)));
        self.last_bound = Some(idx);
        Ok(())
    }

    /// Attach an integer-typed bind. Parse failures fall back to `0`, per
    /// the engine's type-coercion contract.
    pub fn bind_int(&mut self, name: &str, f: impl Fn(i64) -> String + 'static) -> Result<(), CjmodError> {
        let idx = self.slot_index_for_bind(name).ok_or_else(|| CjmodError::UnknownSlot(name.to_string()))?;
        self.slots[idx].bind_fn = Some(Box::new(move |raw| f(raw.parse::<i64>().unwrap_or(0))));
        self.last_bound = Some(idx);
        Ok(())
    }

    /// Attach a floating-point-typed bind. Parse failures fall back to
    /// `0.0`.
    pub fn bind_float(&mut self, name: &str, f: impl Fn(f64) -> String + 'static) -> Result<(), CjmodError> {
        let idx = self.slot_index_for_bind(name).ok_or_else(|| CjmodError::UnknownSlot(name.to_string()))?;
        self.slots[idx].bind_fn = Some(Box::new(move |raw| f(raw.parse::<f64>().unwrap_or(0.0))));
        self.last_bound = Some(idx);
        Ok(())
    }

    /// Attach a `${value}`/`${name}` substitution template to the
    /// most-recently-bound slot.
    pub fn transform(&mut self, template: &str) -> Result<(), CjmodError> {
        let idx = self.last_bound.ok_or_else(|| CjmodError::MalformedPattern("transform with no bound slot".to_string()))?;
        self.slots[idx].template = Some(template.to_string());
        Ok(())
    }

    pub fn set_transform_rule(&mut self, f: impl Fn(&HashMap<String, Arg>) -> String + 'static) {
        self.transform_rule = Some(Box::new(f));
    }

    /// Feed a concrete textual match for `name` through its bind function
    /// and template, in declaration-queue order for placeholders.
    pub fn match_value(&mut self, name: &str, raw: &str) -> Result<(), CjmodError> {
        let idx = if name == "$" {
            self.slots.iter().position(|s| s.is_placeholder && s.raw_value.is_none())
        } else {
            self.find_by_name(name)
        }
        .ok_or_else(|| CjmodError::UnknownSlot(name.to_string()))?;

        let slot = &mut self.slots[idx];
        slot.raw_value = Some(raw.to_string());
        let bound = match &slot.bind_fn {
            Some(f) => f(raw),
            None => raw.to_string(),
        };
        let rendered = match &slot.template {
            Some(tpl) => tpl.replace("${value}", &bound).replace("${name}", &slot.name),
            None => bound,
        };
        slot.transformed_value = Some(rendered);
        Ok(())
    }

    pub fn register_function(&mut self, func: CHTLJSFunction) {
        let vir = func.is_vir_supported();
        let name = func.name().to_string();
        self.functions.insert(name.clone(), func);
        if vir {
            self.vir_supported_functions.insert(name);
        }
    }

    pub fn bind_vir_function(&mut self, function_name: &str) {
        self.vir_supported_functions.insert(function_name.to_string());
    }

    pub fn is_vir_supported(&self, function_name: &str) -> bool {
        self.vir_supported_functions.contains(function_name)
    }

    pub fn registered_functions(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn function(&self, name: &str) -> Option<&CHTLJSFunction> {
        self.functions.get(name)
    }

    pub fn arg_names(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.name.clone()).collect()
    }

    pub fn clear(&mut self) {
        *self = Syntax::default();
    }

    /// Match a `vir <name> = <function>({...});` statement against the
    /// registered functions and render its `__chtl_vir_*` prelude helpers.
    /// Per the `iNeverAway` passthrough rule, the keys walked are whatever
    /// the call-site object literal actually contains, not a precomputed
    /// parameter list. Returns `None` when `statement` isn't a `vir`
    /// declaration, the called function is unregistered, or it doesn't
    /// support vir objects.
    pub fn emit_vir_helpers(&self, statement: &str) -> Option<String> {
        let rest = statement.trim().strip_prefix("vir")?;
        let (_binding, call) = rest.split_once('=')?;
        let call = call.trim().trim_end_matches(';').trim();
        let open = call.find('(')?;
        let close = call.rfind(')')?;
        let function_name = call[..open].trim();
        let object_literal = &call[open + 1..close];

        if !self.is_vir_supported(function_name) {
            return None;
        }
        let function = self.functions.get(function_name)?;
        Some(function.generate_vir_helpers(object_literal))
    }

    /// Render the current slot values: a custom transform rule wins if
    /// set; otherwise a function-call template `name({k: v, ...})` if the
    /// pattern carried a name, else a plain space-joined concatenation.
    pub fn generate_code(&self) -> String {
        if let Some(rule) = &self.transform_rule {
            let args: HashMap<String, Arg> = self
                .slots
                .iter()
                .map(|s| (s.name.clone(), Arg { name: s.name.clone(), value: ArgValue::Str(s.rendered()) }))
                .collect();
            return rule(&args);
        }
        match &self.function_name {
            Some(name) => {
                let parts: Vec<String> =
                    self.slots.iter().map(|s| format!("{}: {}", s.name, s.rendered())).collect();
                format!("{name}({{ {} }})", parts.join(", "))
            }
            None => self.slots.iter().map(Slot::rendered).collect::<Vec<_>>().join(" "),
        }
    }
}

fn split_call(pattern: &str) -> Option<(Option<String>, String)> {
    let open = pattern.find('(')?;
    if !pattern.ends_with(')') {
        return None;
    }
    let name = pattern[..open].trim();
    let inner = pattern[open + 1..pattern.len() - 1].to_string();
    let name = if name.is_empty() { None } else { Some(name.to_string()) };
    Some((name, inner))
}

pub(crate) fn strip_matching_braces(s: &str) -> &str {
    let trimmed = s.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') { &trimmed[1..trimmed.len() - 1] } else { trimmed }
}

pub(crate) fn split_top_level_commas(s: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '{' | '(' | '[' => depth += 1,
            '}' | ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                items.push(s[start..i].to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(s[start..].to_string());
    items
}

fn parse_slot_item(item: String) -> Slot {
    let trimmed = item.trim();
    if let Some((key, value)) = trimmed.split_once(':') {
        let key = key.trim().to_string();
        let value = value.trim();
        if value == "$" {
            Slot::new(key, true, None)
        } else {
            Slot::new(key, false, Some(value.to_string()))
        }
    } else if trimmed == "$" {
        Slot::new("$".to_string(), true, None)
    } else {
        Slot::new(trimmed.to_string(), false, Some(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_binding_queues_in_declaration_order() {
        let mut syntax = Syntax::new();
        syntax.analyze_pattern("f($, $, $)").unwrap();

        syntax.bind_str("$", |v| format!("one:{v}")).unwrap();
        syntax.bind_str("$", |v| format!("two:{v}")).unwrap();
        syntax.bind_str("$", |v| format!("three:{v}")).unwrap();

        syntax.match_value("$", "a").unwrap();
        syntax.match_value("$", "b").unwrap();
        syntax.match_value("$", "c").unwrap();

        assert_eq!(syntax.slots[0].transformed_value.as_deref(), Some("one:a"));
        assert_eq!(syntax.slots[1].transformed_value.as_deref(), Some("two:b"));
        assert_eq!(syntax.slots[2].transformed_value.as_deref(), Some("three:c"));
    }

    #[test]
    fn named_slots_render_as_function_call() {
        let mut syntax = Syntax::new();
        syntax.analyze_pattern("printMylove({url: $, mode: $})").unwrap();
        syntax.bind_str("url", |v| v.to_string()).unwrap();
        syntax.bind_int("mode", |v| v.to_string()).unwrap();

        syntax.match_value("url", "/a.png").unwrap();
        syntax.match_value("mode", "2").unwrap();

        assert_eq!(syntax.generate_code(), "printMylove({ url: /a.png, mode: 2 })");
    }

    #[test]
    fn invalid_integer_falls_back_to_zero() {
        let mut syntax = Syntax::new();
        syntax.analyze_pattern("f($)").unwrap();
        syntax.bind_int("$", |v| v.to_string()).unwrap();
        syntax.match_value("$", "not-a-number").unwrap();
        assert_eq!(syntax.slots[0].transformed_value.as_deref(), Some("0"));
    }

    #[test]
    fn vir_declaration_emits_one_helper_per_literal_key() {
        let mut syntax = Syntax::new();
        let mut func = CHTLJSFunction::new("iNeverAway");
        func.enable_vir_support(true);
        syntax.register_function(func);

        let js = syntax.emit_vir_helpers("vir love = iNeverAway({url: \"/a.png\", mode: 2});").unwrap();
        assert!(js.contains("function __chtl_vir_iNeverAway_url"));
        assert!(js.contains("function __chtl_vir_iNeverAway_mode"));
    }

    #[test]
    fn non_vir_function_yields_no_helpers() {
        let mut syntax = Syntax::new();
        syntax.register_function(CHTLJSFunction::new("plain"));
        assert!(syntax.emit_vir_helpers("vir x = plain({a: 1});").is_none());
    }

    #[test]
    fn non_vir_statement_yields_no_helpers() {
        let syntax = Syntax::new();
        assert!(syntax.emit_vir_helpers("let x = 1;").is_none());
    }

    #[test]
    fn transform_template_substitutes_value_and_name() {
        let mut syntax = Syntax::new();
        syntax.analyze_pattern("f($)").unwrap();
        syntax.bind_str("$", |v| v.to_string()).unwrap();
        syntax.transform("__chtl_${name}(${value})").unwrap();
        syntax.match_value("$", "x").unwrap();
        assert_eq!(syntax.slots[0].transformed_value.as_deref(), Some("__chtl_$(x)"));
    }
}
