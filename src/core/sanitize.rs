// src/core/sanitize.rs

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Display form of a gloss or language name.
/// Angle-bracket entities are dropped, `&#39;` becomes an apostrophe and the
/// `ZQ` placeholder the site uses is removed. Never applied to lookup keys.
pub fn refine_gloss(gloss: &str) -> String {
    [("&lt;", ""), ("&gt;", ""), ("&#39;", "'"), ("ZQ", "")]
        .iter()
        .fold(s!(gloss), |acc, (from, to)| acc.replace(from, to))
}

/// Visible text of a table cell: entities decoded, tags stripped, one line.
pub fn cell_text(inner: &str) -> String {
    super::html::strip_tags(normalize_entities(inner))
}

/// Definitions span several source lines; tables want one.
pub fn single_line(s: &str) -> String {
    s.replace('\n', " ").trim().to_string()
}
