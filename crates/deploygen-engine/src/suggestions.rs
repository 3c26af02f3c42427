//! Fuzzy matching suggestions for template errors
//!
//! Uses Levenshtein distance to point at the variable or filter the template
//! author most likely meant.

use serde_json::Value as JsonValue;

/// Maximum Levenshtein distance to consider for suggestions
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// All filters a template can use
pub const AVAILABLE_FILTERS: &[&str] = &[
    // Custom deploygen filters
    "quote",
    "b64encode",
    // Built-in MiniJinja filters
    "default",
    "upper",
    "lower",
    "title",
    "capitalize",
    "replace",
    "trim",
    "join",
    "first",
    "last",
    "length",
    "reverse",
    "sort",
    "dictsort",
    "items",
    "indent",
    "int",
    "string",
    "bool",
    "tojson",
    "urlencode",
];

/// Suggestion result with its distance to the input
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub text: String,
    pub distance: usize,
}

/// Calculate Levenshtein distance between two strings
pub fn levenshtein(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Find closest matches from a list of candidates, best first
pub fn find_closest_matches(input: &str, candidates: &[&str], max_results: usize) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = levenshtein(input, candidate);
            (distance <= MAX_SUGGESTION_DISTANCE && distance > 0).then(|| Suggestion {
                text: candidate.to_string(),
                distance,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| a.distance.cmp(&b.distance).then_with(|| a.text.cmp(&b.text)));
    suggestions.truncate(max_results);
    suggestions
}

/// Keys of the object found at `path` (dot separated) in the context
pub fn available_keys(context: &JsonValue, path: &str) -> Vec<String> {
    let mut current = context;
    for part in path.split('.').filter(|s| !s.is_empty()) {
        match current.get(part) {
            Some(v) => current = v,
            None => return vec![],
        }
    }

    match current {
        JsonValue::Object(map) => map.keys().cloned().collect(),
        _ => vec![],
    }
}

/// Suggest corrections for an undefined variable such as `caCert` or `certs.caCert`
pub fn suggest_undefined_variable(variable_name: &str, context: Option<&JsonValue>) -> Option<String> {
    let (parent, leaf) = match variable_name.rsplit_once('.') {
        Some((parent, leaf)) => (parent, leaf),
        None => ("", variable_name),
    };

    let available = context
        .map(|ctx| available_keys(ctx, parent))
        .unwrap_or_default();
    let candidates: Vec<&str> = available.iter().map(String::as_str).collect();

    let matches = find_closest_matches(leaf, &candidates, 3);
    let prefix = if parent.is_empty() {
        String::new()
    } else {
        format!("{}.", parent)
    };

    if !matches.is_empty() {
        let suggestions: Vec<String> = matches
            .iter()
            .map(|m| format!("`{}{}`", prefix, m.text))
            .collect();
        return Some(format!("Did you mean {}?", suggestions.join(" or ")));
    }

    if leaf.ends_with("Crt") || leaf.ends_with("Key") || leaf.ends_with("Pem") {
        return Some(format!(
            "`{}` looks like a certificate key but no matching file was loaded. \
             Guard it with `{{% if {} is defined %}}` or add the file to the certs directory.",
            leaf, variable_name
        ));
    }

    None
}

/// Suggest corrections for an unknown filter
pub fn suggest_unknown_filter(filter_name: &str) -> Option<String> {
    let matches = find_closest_matches(filter_name, AVAILABLE_FILTERS, 3);

    if !matches.is_empty() {
        let suggestions: Vec<String> = matches.iter().map(|s| format!("`{}`", s.text)).collect();
        Some(format!("Did you mean {}?", suggestions.join(" or ")))
    } else {
        Some(format!(
            "Unknown filter `{}`. Available filters: {}",
            filter_name,
            AVAILABLE_FILTERS.join(", ")
        ))
    }
}

/// Extract a quoted name from an error message
pub fn extract_quoted_name(msg: &str) -> Option<String> {
    let patterns = [("`", "`"), ("'", "'"), ("\"", "\"")];

    for (start, end) in patterns {
        if let Some(start_idx) = msg.find(start) {
            let rest = &msg[start_idx + start.len()..];
            if let Some(end_idx) = rest.find(end) {
                return Some(rest[..end_idx].to_string());
            }
        }
    }
    None
}
