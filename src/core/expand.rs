//! `$NAME` / `${NAME}` substitution against an environment mapping

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

static VAR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?:\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))")
        .expect("variable pattern is valid")
});

/// Expand variable references in `text`.
///
/// Known names are replaced by their value; the inserted value is never
/// scanned again, so self-referential values cannot loop. Unknown names are
/// left verbatim.
pub fn expand(text: &str, environment: &HashMap<String, String>) -> String {
    if !text.contains('$') {
        return text.to_string();
    }

    VAR_PATTERN
        .replace_all(text, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            match environment.get(name) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
