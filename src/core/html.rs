// src/core/html.rs
// Low-level HTML string helpers.
// Deliberately naive, tailored to the shift database markup: tag and
// attribute matching is ASCII case-insensitive, content is left untouched.

/// Fast ASCII-only lowercasing. Byte offsets are preserved, so indices found
/// in the lowered copy are valid in the original.
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// `<tr` must not match `<track`, `<th` must not match `<thead`.
fn is_tag_boundary(lc: &str, end: usize) -> bool {
    match lc.as_bytes().get(end) {
        Some(b) => !(b.is_ascii_alphanumeric() || *b == b'-' || *b == b'_'),
        None => true,
    }
}

fn find_open(lc: &str, open_lc: &str, from: usize) -> Option<usize> {
    let mut at = from;
    loop {
        let start = lc.get(at..)?.find(open_lc)? + at;
        if is_tag_boundary(lc, start + open_lc.len()) {
            return Some(start);
        }
        at = start + open_lc.len();
    }
}

fn block_in_lowered(
    s: &str,
    lc: &str,
    open_lc: &str,
    close_lc: &str,
    from: usize,
) -> Option<(usize, usize)> {
    let start = find_open(lc, open_lc, from)?;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(close_lc)?;
    Some((start, open_end + end_rel + close_lc.len()))
}

/// Iterator over successive `open … close` blocks of one document.
/// Lowercases the document once instead of once per block.
pub struct TagBlocks<'a> {
    s: &'a str,
    lc: String,
    open_lc: String,
    close_lc: String,
    pos: usize,
}

impl<'a> Iterator for TagBlocks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let (start, end) =
            block_in_lowered(self.s, &self.lc, &self.open_lc, &self.close_lc, self.pos)?;
        self.pos = end;
        Some(&self.s[start..end])
    }
}

pub fn tag_blocks<'a>(s: &'a str, open_tag: &str, close_tag: &str) -> TagBlocks<'a> {
    TagBlocks {
        s,
        lc: to_lower(s),
        open_lc: to_lower(open_tag),
        close_lc: to_lower(close_tag),
        pos: 0,
    }
}

/// Given a complete block like `<td ...>INNER</td>`, return INNER
/// (may still contain nested tags).
pub fn inner_after_open_tag(block: &str) -> &str {
    if let Some(open_end) = block.find('>') {
        if let Some(close_start) = block.rfind('<') {
            if close_start > open_end {
                return &block[open_end + 1..close_start];
            }
        }
    }
    ""
}

/// Does the opening tag of `block` carry `class` among its classes?
pub fn has_class(block: &str, class: &str) -> bool {
    let Some(open_end) = block.find('>') else { return false };
    let opener = to_lower(&block[..open_end]);
    let Some(at) = opener.find("class=") else { return false };
    let val = &opener[at + "class=".len()..];
    let (quote, rest) = match val.as_bytes().first() {
        Some(b'"') => ('"', &val[1..]),
        Some(b'\'') => ('\'', &val[1..]),
        _ => (' ', val),
    };
    let classes = rest.split(quote).next().unwrap_or("");
    let want = to_lower(class);
    classes.split_ascii_whitespace().any(|c| c == want)
}

/// Every `<tag class="… class …">…</tag>` element, in document order.
/// Steps from opening tag to opening tag, so an element nested in an
/// unrelated wrapper of the same tag is still found.
///
/// ```
/// use datsemshift::core::html::{blocks_with_class, inner_after_open_tag};
/// let doc = r#"<DIV class="shift__header">eye</div><div>x</div>"#;
/// let found = blocks_with_class(doc, "div", "shift__header");
/// assert_eq!(found.iter().map(|b| inner_after_open_tag(b)).collect::<Vec<_>>(), ["eye"]);
/// ```
pub fn blocks_with_class<'a>(s: &'a str, tag: &str, class: &str) -> Vec<&'a str> {
    let lc = to_lower(s);
    let open_lc = format!("<{}", to_lower(tag));
    let close_lc = format!("</{}>", to_lower(tag));

    let mut out = Vec::new();
    let mut at = 0usize;
    while let Some(start) = find_open(&lc, &open_lc, at) {
        let Some(open_end) = s[start..].find('>').map(|e| start + e + 1) else { break };
        if has_class(&s[start..open_end], class) {
            let Some(rel) = lc[open_end..].find(&close_lc) else { break };
            let end = open_end + rel + close_lc.len();
            out.push(&s[start..end]);
            at = end;
        } else {
            at = open_end;
        }
    }
    out
}

/// Inner HTML of every `<td>` cell of one row block.
pub fn row_cells(tr: &str) -> Vec<&str> {
    tag_blocks(tr, "<td", "</td>").map(inner_after_open_tag).collect()
}

/// Remove all tags `<...>`, then collapse whitespace.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    super::sanitize::normalize_ws(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_respect_tag_boundaries() {
        let doc = concat!(
            "<table><thead><th>Title</th></thead>",
            "<tr><td>a</td></tr><TR><TD>b</TD></TR></table>"
        );
        let th: Vec<_> = tag_blocks(doc, "<th", "</th>").collect();
        assert_eq!(th, vec!["<th>Title</th>"]);
        let rows: Vec<_> = tag_blocks(doc, "<tr", "</tr>").collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(row_cells(rows[1]), vec!["b"]);
    }

    #[test]
    fn has_class_matches_whole_class_names() {
        let open = r#"<table class="realization__table wide">x</table>"#;
        assert!(has_class(open, "realization__table"));
        assert!(has_class("<span class='realization_number'>3</span>", "realization_number"));
        assert!(!has_class(r#"<span class="realization_number_x">3</span>"#, "realization_number"));
        assert!(!has_class("<span>3</span>", "realization_number"));
    }

    #[test]
    fn blocks_with_class_finds_nested_elements() {
        let doc = r#"<div class="page"><div class="shift__header">eye</div></div>
                     <div class='shift__header'>see</div>"#;
        let found = blocks_with_class(doc, "div", "shift__header");
        assert_eq!(found.len(), 2);
        assert_eq!(inner_after_open_tag(found[0]), "eye");
        assert_eq!(inner_after_open_tag(found[1]), "see");
    }

    #[test]
    fn strip_tags_collapses_whitespace() {
        assert_eq!(strip_tags("  <b>to</b>\n  <i>see</i> "), "to see");
    }

    #[test]
    fn inner_after_open_tag_handles_empty_cells() {
        assert_eq!(inner_after_open_tag("<td class=\"x\"></td>"), "");
        assert_eq!(inner_after_open_tag("<td>v</td>"), "v");
    }
}
