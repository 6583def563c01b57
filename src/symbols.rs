//! Schema name to Go identifier normalization.

use std::sync::OnceLock;

use regex::Regex;

use crate::ast::Base;
use crate::kind::Kind;

/// Substitutions applied left to right before title-casing.
///
/// At each position the first matching pattern wins and matches never overlap.
/// The acronym corrections run here, before casing, so `request.url` ends up as
/// `RequestURL` rather than `RequestUrl`.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("`", " "),
    ("\"", " "),
    (".", " "),
    ("_", " "),
    ("-", " "),
    ("\u{a0}", " "),
    ("\t", " "),
    ("(", " "),
    (")", " "),
    ("url", "URL"),
    ("Url", "URL"),
];

/// Fallback identifier for unnamed properties.
pub const UNNAMED: &str = "Obj";

/// Normalizes a raw schema name into a Go identifier fragment.
///
/// May return an empty string when `raw` holds no identifier characters.
pub fn normalize(raw: &str) -> String {
    let replaced = apply_replacements(raw);
    title_case(&replaced)
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect()
}

/// Normalized identifier that is always a valid exported Go name.
pub fn ident(raw: &str) -> String {
    let out = normalize(raw);
    if out.is_empty() {
        return UNNAMED.to_string();
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return format!("X{out}");
    }
    out
}

/// Declared name of a schema entity.
///
/// Modules get a `Module` suffix so a module never collides with a class of
/// the same name.
pub fn base_sym(base: &Base) -> String {
    let name = ident(&base.name);
    if base.kind() == Kind::Module {
        format!("{name}Module")
    } else {
        name
    }
}

/// Block name with a trailing `Module` suffix removed.
pub fn scope_sym(base: &Base) -> String {
    let name = base_sym(base);
    match name.strip_suffix("Module") {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => name,
    }
}

fn apply_replacements(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    'scan: while !rest.is_empty() {
        for (pattern, replacement) in REPLACEMENTS {
            if let Some(tail) = rest.strip_prefix(pattern) {
                out.push_str(replacement);
                rest = tail;
                continue 'scan;
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(ch);
        }
        rest = chars.as_str();
    }
    out
}

/// Upper-cases the first letter of every word, leaving the rest untouched.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_boundary = true;
    for ch in text.chars() {
        if at_boundary && ch.is_alphabetic() {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_boundary = !(ch.is_alphanumeric() || ch == '_');
    }
    out
}

/// Escapes text for a Go interpreted string literal.
pub fn escape_string(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Escapes text for a Go raw string struct tag value.
pub fn escape_tag(raw: &str) -> String {
    raw.replace('`', "").replace('"', "\\\"")
}

/// Whether an event literal deviates from the `lower-kebab-case` convention.
pub fn is_suspicious_event_literal(literal: &str) -> bool {
    !event_literal_regex().is_match(literal)
}

fn event_literal_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").expect("valid regex"))
}

/// Comment lines documenting an entity: description, platforms and process.
pub fn doc_lines(base: &Base) -> Vec<String> {
    let mut lines: Vec<String> = base
        .description
        .lines()
        .map(str::trim_end)
        .map(|line| {
            if line.is_empty() {
                "//".to_string()
            } else {
                format!("// {line}")
            }
        })
        .collect();
    while lines.last().is_some_and(|l| l == "//") {
        lines.pop();
    }

    if !base.platforms.is_empty() {
        lines.push(format!("// Platforms: {}", base.platforms.join(", ")));
    }
    let mut contexts = Vec::new();
    if base.process.main {
        contexts.push("main");
    }
    if base.process.renderer {
        contexts.push("renderer");
    }
    if !contexts.is_empty() {
        lines.push(format!("// Process: {}", contexts.join(", ")));
    }
    lines
}
