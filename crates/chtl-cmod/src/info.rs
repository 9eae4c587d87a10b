//! `CMODInfo`: the `[Info] { key = "value"; ... }` block carried by
//! every module. Grounded on `CMODSystem.cpp`'s `CMODInfo` parser.

use std::collections::HashMap;

use crate::error::StructuralError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CMODInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
    pub license: String,
    pub dependencies: Vec<String>,
    pub category: String,
    pub min_chtl_version: String,
    pub max_chtl_version: String,
}

const REQUIRED_FIELDS: &[&str] = &["name", "version", "author", "minCHTLVersion", "maxCHTLVersion"];

impl CMODInfo {
    /// Extract the `[Info] { ... }` block via a balanced-brace scan and
    /// parse its `key = "value";` pairs.
    pub fn parse(source: &str) -> Result<Self, StructuralError> {
        let body = extract_block(source, "[Info]")
            .ok_or_else(|| StructuralError::MalformedInfo("no [Info] block found".to_string()))?;
        let fields = parse_key_value_pairs(body);

        for required in REQUIRED_FIELDS {
            if !fields.contains_key(*required) {
                return Err(StructuralError::MissingRequiredField((*required).to_string()));
            }
        }

        let dependencies = fields
            .get("dependencies")
            .map(|csv| csv.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect())
            .unwrap_or_default();

        Ok(CMODInfo {
            name: fields.get("name").cloned().unwrap_or_default(),
            version: fields.get("version").cloned().unwrap_or_default(),
            description: fields.get("description").cloned().unwrap_or_default(),
            author: fields.get("author").cloned().unwrap_or_default(),
            license: fields.get("license").cloned().unwrap_or_default(),
            dependencies,
            category: fields.get("category").cloned().unwrap_or_default(),
            min_chtl_version: fields.get("minCHTLVersion").cloned().unwrap_or_default(),
            max_chtl_version: fields.get("maxCHTLVersion").cloned().unwrap_or_default(),
        })
    }

    /// Render the canonical `[Info] { ... }` block, fields in a fixed
    /// order, for `save()`.
    pub fn serialize(&self) -> String {
        let mut out = String::from("[Info]\n{\n");
        out.push_str(&format!("    name = \"{}\";\n", self.name));
        out.push_str(&format!("    version = \"{}\";\n", self.version));
        out.push_str(&format!("    description = \"{}\";\n", self.description));
        out.push_str(&format!("    author = \"{}\";\n", self.author));
        out.push_str(&format!("    license = \"{}\";\n", self.license));
        out.push_str(&format!("    dependencies = \"{}\";\n", self.dependencies.join(",")));
        out.push_str(&format!("    category = \"{}\";\n", self.category));
        out.push_str(&format!("    minCHTLVersion = \"{}\";\n", self.min_chtl_version));
        out.push_str(&format!("    maxCHTLVersion = \"{}\";\n", self.max_chtl_version));
        out.push_str("}\n");
        out
    }
}

/// Locate `[<keyword>]` then scan to its matching `}`, returning the
/// interior text (excluding the braces).
pub fn extract_block<'a>(source: &'a str, keyword: &str) -> Option<&'a str> {
    let kw_pos = source.find(keyword)?;
    let open = source[kw_pos..].find('{')? + kw_pos;
    let bytes = source.as_bytes();
    let mut depth = 0i32;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&source[open + 1..i]);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn parse_key_value_pairs(body: &str) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for stmt in body.split(';') {
        let stmt = stmt.trim();
        if stmt.is_empty() {
            continue;
        }
        let Some((key, value)) = stmt.split_once('=') else { continue };
        let key = key.trim().to_string();
        let value = value.trim().trim_matches('"').to_string();
        fields.insert(key, value);
    }
    fields
}

/// Parse `"x.y.z"` into three unsigned integers for min/max comparison.
pub fn parse_version_triple(version: &str) -> Option<(u32, u32, u32)> {
    let parts: Vec<&str> = version.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let major = parts[0].parse().ok()?;
    let minor = parts[1].parse().ok()?;
    let patch = parts[2].parse().ok()?;
    Some((major, minor, patch))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[Info]
{
    name = "Box";
    version = "1.0.0";
    description = "A box component";
    author = "Someone";
    license = "MIT";
    dependencies = "Grid,Flex";
    category = "layout";
    minCHTLVersion = "1.0.0";
    maxCHTLVersion = "2.0.0";
}
"#;

    #[test]
    fn parses_required_and_optional_fields() {
        let info = CMODInfo::parse(SAMPLE).unwrap();
        assert_eq!(info.name, "Box");
        assert_eq!(info.dependencies, vec!["Grid", "Flex"]);
        assert_eq!(info.min_chtl_version, "1.0.0");
    }

    #[test]
    fn missing_required_field_fails() {
        let source = r#"[Info] { name = "Box"; }"#;
        assert!(CMODInfo::parse(source).is_err());
    }

    #[test]
    fn version_triple_parses() {
        assert_eq!(parse_version_triple("1.2.3"), Some((1, 2, 3)));
        assert_eq!(parse_version_triple("1.2"), None);
    }
}
