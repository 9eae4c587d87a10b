//! `ImportDeclaration`: one parsed `[Import]` statement, prior to
//! resolution.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Html,
    Style,
    JavaScript,
    Chtl,
    CJmod,
    CustomElement,
    CustomStyle,
    CustomVar,
    TemplateElement,
    TemplateStyle,
    TemplateVar,
    OriginHtml,
    OriginStyle,
    OriginJavascript,
    Config,
}

impl ImportKind {
    /// `Html | Style | JavaScript` resolve with no-op success when
    /// unaliased; everything else always delegates to CHTL resolution.
    pub fn is_plain_web_asset(self) -> bool {
        matches!(self, ImportKind::Html | ImportKind::Style | ImportKind::JavaScript)
    }

    pub fn delegates_to_chtl(self) -> bool {
        matches!(
            self,
            ImportKind::CustomElement
                | ImportKind::CustomStyle
                | ImportKind::CustomVar
                | ImportKind::TemplateElement
                | ImportKind::TemplateStyle
                | ImportKind::TemplateVar
                | ImportKind::OriginHtml
                | ImportKind::OriginStyle
                | ImportKind::OriginJavascript
                | ImportKind::Config
        )
    }
}

#[derive(Debug, Clone)]
pub struct ImportDeclaration {
    pub kind: ImportKind,
    pub path: String,
    pub target_name: Option<String>,
    pub alias: Option<String>,
    pub import_all: bool,
    pub source_file: String,
    pub line: usize,
    pub col: usize,
    pub resolved_path: Option<String>,
}

impl ImportDeclaration {
    pub fn new(kind: ImportKind, path: impl Into<String>, source_file: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            kind,
            path: path.into(),
            target_name: None,
            alias: None,
            import_all: false,
            source_file: source_file.into(),
            line,
            col,
            resolved_path: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_name = Some(target.into());
        self
    }
}
