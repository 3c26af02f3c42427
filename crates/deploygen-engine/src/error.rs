//! Engine error types with source-annotated diagnostics

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::suggestions::{
    AVAILABLE_FILTERS, extract_quoted_name, suggest_undefined_variable, suggest_unknown_filter,
};

/// Main engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Template error")]
    Template(#[from] TemplateError),

    #[error("Render context error: {0}")]
    Context(#[from] deploygen_core::CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Error kind for categorizing template errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TemplateErrorKind {
    NotFound,
    UndefinedVariable,
    UnknownFilter,
    UnknownFunction,
    SyntaxError,
    TypeError,
    InvalidOperation,
    YamlParseError,
    Other,
}

impl TemplateErrorKind {
    /// Convert to a code string for diagnostics
    pub fn to_code_string(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::UndefinedVariable => "undefined_variable",
            Self::UnknownFilter => "unknown_filter",
            Self::UnknownFunction => "unknown_function",
            Self::SyntaxError => "syntax",
            Self::TypeError => "type",
            Self::InvalidOperation => "invalid_operation",
            Self::YamlParseError => "yaml_parse",
            Self::Other => "render",
        }
    }
}

/// Template-specific error with source information
#[derive(Error, Debug, Diagnostic, Clone)]
#[error("{message}")]
#[diagnostic(code(deploygen::template::render))]
pub struct TemplateError {
    /// Error message
    pub message: String,

    /// Error kind for categorization
    pub kind: TemplateErrorKind,

    /// Template (or rendered output) source
    #[source_code]
    pub src: NamedSource<String>,

    /// Error location in source
    #[label("error occurred here")]
    pub span: Option<SourceSpan>,

    /// Suggestion for fixing the error
    #[help]
    pub suggestion: Option<String>,
}

impl TemplateError {
    /// Create a template error from a MiniJinja error
    ///
    /// `context` is the object the template was rendered with; it is used to
    /// suggest names close to an undefined one.
    pub fn from_minijinja(
        err: minijinja::Error,
        template_name: &str,
        template_source: &str,
        context: Option<&serde_json::Value>,
    ) -> Self {
        let (kind, message) = categorize_minijinja_error(&err);
        let span = err
            .line()
            .and_then(|line_num| calculate_span(template_source, line_num));
        let suggestion = generate_suggestion(&err, kind, context);

        Self {
            message,
            kind,
            src: NamedSource::new(template_name, template_source.to_string()),
            span,
            suggestion,
        }
    }

    /// The template file does not exist
    pub fn not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            message: format!("template not found: {}", path),
            kind: TemplateErrorKind::NotFound,
            src: NamedSource::new(path, String::new()),
            span: None,
            suggestion: Some(
                "Pass an existing file with --template, or omit it to use the bundled template"
                    .to_string(),
            ),
        }
    }

    /// The rendered output is not valid YAML
    pub fn from_yaml(err: &serde_yaml::Error, template_name: &str, rendered: &str) -> Self {
        let span = err
            .location()
            .and_then(|loc| calculate_span(rendered, loc.line()));

        Self {
            message: format!("rendered output is not valid YAML: {}", err),
            kind: TemplateErrorKind::YamlParseError,
            src: NamedSource::new(format!("{} (rendered)", template_name), rendered.to_string()),
            span,
            suggestion: Some(
                "Check indentation around loops and conditionals; `{%-` and `-%}` strip whitespace"
                    .to_string(),
            ),
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> TemplateErrorKind {
        self.kind
    }
}

/// Categorize a MiniJinja error into our error kinds
fn categorize_minijinja_error(err: &minijinja::Error) -> (TemplateErrorKind, String) {
    let msg = err.to_string();
    let msg_lower = msg.to_lowercase();
    let detailed = format!("{:#}", err);

    let kind = match err.kind() {
        minijinja::ErrorKind::UndefinedError => TemplateErrorKind::UndefinedVariable,
        minijinja::ErrorKind::UnknownFilter => TemplateErrorKind::UnknownFilter,
        minijinja::ErrorKind::UnknownFunction => TemplateErrorKind::UnknownFunction,
        minijinja::ErrorKind::SyntaxError => TemplateErrorKind::SyntaxError,
        minijinja::ErrorKind::InvalidOperation => TemplateErrorKind::InvalidOperation,
        minijinja::ErrorKind::NonPrimitive | minijinja::ErrorKind::NonKey => {
            TemplateErrorKind::TypeError
        }
        _ => {
            if msg_lower.contains("undefined") {
                TemplateErrorKind::UndefinedVariable
            } else if msg_lower.contains("syntax") || msg_lower.contains("expected") {
                TemplateErrorKind::SyntaxError
            } else {
                TemplateErrorKind::Other
            }
        }
    };

    let enhanced_msg = match kind {
        TemplateErrorKind::UndefinedVariable => match extract_expression_from_display(&detailed) {
            Some(expr) => format!("undefined variable `{}`", expr),
            None => msg.replace("undefined value", "undefined variable"),
        },
        TemplateErrorKind::UnknownFilter => match extract_filter_from_display(&detailed) {
            Some(filter) => format!("unknown filter `{}`", filter),
            None => msg,
        },
        _ => msg
            .replace("invalid operation: ", "")
            .replace("syntax error: ", "")
            .replace("undefined value", "undefined variable"),
    };

    (kind, enhanced_msg)
}

/// Text between `{{` and `}}` on the line MiniJinja marks with `>`
fn marked_expression(display: &str) -> Option<&str> {
    // MiniJinja debug format:
    //    8 >   ca.crt: {{ caCert }}
    //      i             ^^^^^^ undefined value
    for line in display.lines() {
        let trimmed = line.trim_start();
        if trimmed.contains(" > ") || trimmed.starts_with("> ") {
            let start = line.find("{{")?;
            let end = line[start..].find("}}")?;
            return Some(&line[start + 2..start + end]);
        }
    }
    None
}

/// Extract the problematic expression from MiniJinja's detailed display
fn extract_expression_from_display(display: &str) -> Option<String> {
    let expr = marked_expression(display)?;
    let expr_part = expr.split('|').next().unwrap_or(expr).trim();
    (!expr_part.is_empty()).then(|| expr_part.to_string())
}

/// Extract the filter name from MiniJinja's detailed display
fn extract_filter_from_display(display: &str) -> Option<String> {
    let expr = marked_expression(display)?;
    let pipe_pos = expr.rfind('|')?;
    expr[pipe_pos + 1..]
        .split(|c: char| c.is_whitespace() || c == '(')
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Calculate the source span covering a 1-based line number
fn calculate_span(source: &str, line_num: usize) -> Option<SourceSpan> {
    let mut offset = 0;

    for (idx, line) in source.lines().enumerate() {
        if idx + 1 == line_num {
            return Some(SourceSpan::new(offset.into(), line.len().into()));
        }
        offset += line.len() + 1;
    }

    None
}

/// Generate context-aware suggestions based on error kind
fn generate_suggestion(
    err: &minijinja::Error,
    kind: TemplateErrorKind,
    context: Option<&serde_json::Value>,
) -> Option<String> {
    let msg = err.to_string();
    let detailed = format!("{:#}", err);

    match kind {
        TemplateErrorKind::UndefinedVariable => {
            let var_name = extract_expression_from_display(&detailed)
                .or_else(|| extract_quoted_name(&msg))?;

            suggest_undefined_variable(&var_name, context).or_else(|| {
                Some(format!(
                    "Variable `{}` is not defined. Check spelling or guard it with `is defined`.",
                    var_name
                ))
            })
        }

        TemplateErrorKind::UnknownFilter => {
            match extract_filter_from_display(&detailed).or_else(|| extract_quoted_name(&msg)) {
                Some(filter_name) => suggest_unknown_filter(&filter_name),
                None => Some(format!(
                    "Unknown filter. Available: {}",
                    AVAILABLE_FILTERS.join(", ")
                )),
            }
        }

        TemplateErrorKind::SyntaxError => Some(
            "Check bracket matching: `{{ }}` for expressions, `{% %}` for statements, `{# #}` for comments"
                .to_string(),
        ),

        _ => None,
    }
}
