//! Small HTML helpers for the body surface: escaping, field spans and
//! plain-text extraction. This is not a general HTML parser; it understands
//! the fragments this crate produces plus ordinary editor markup.

/// Attribute that tags a substituted span with its field key.
pub const FIELD_ATTR: &str = "data-field";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp..];
        let entity = after
            .find(';')
            .filter(|end| *end <= 8)
            .and_then(|end| decode_entity(&after[1..end]).map(|c| (c, end)));
        match entity {
            Some((c, end)) => {
                out.push(c);
                rest = &after[end + 1..];
            }
            None => {
                out.push('&');
                rest = &after[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" | "#39" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Opening tag of a field span.
pub fn field_open_tag(key: &str) -> String {
    format!("<span {}=\"{}\">", FIELD_ATTR, escape(key))
}

/// A complete field span around already-escaped content.
pub fn field_span(key: &str, escaped_content: &str) -> String {
    format!("{}{}</span>", field_open_tag(key), escaped_content)
}

/// Whether the position just after `preceding` is inside a tag, i.e. the
/// last `<` in it is not closed by a later `>`.
pub fn ends_inside_tag(preceding: &str, was_inside: bool) -> bool {
    match (preceding.rfind('<'), preceding.rfind('>')) {
        (Some(lt), Some(gt)) => lt > gt,
        (Some(_), None) => true,
        (None, Some(_)) => false,
        (None, None) => was_inside,
    }
}

/// Byte ranges `(content_start, content_end)` of every span tagged with `key`.
/// Nested spans inside a field span are included in its content.
pub fn field_span_ranges(html: &str, key: &str) -> Vec<(usize, usize)> {
    let open = field_open_tag(key);
    let mut ranges = Vec::new();
    let mut search_from = 0;

    while let Some(rel) = html[search_from..].find(&open) {
        let content_start = search_from + rel + open.len();
        let Some(content_end) = matching_close(html, content_start) else {
            break;
        };
        ranges.push((content_start, content_end));
        search_from = content_end + "</span>".len();
    }

    ranges
}

/// Position of the `</span>` closing a span whose content starts at `from`.
fn matching_close(html: &str, from: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = from;
    loop {
        let rest = &html[pos..];
        let next_close = rest.find("</span>")?;
        let next_open = rest.find("<span").filter(|o| *o < next_close);
        match next_open {
            Some(o) => {
                depth += 1;
                pos += o + "<span".len();
            }
            None if depth == 0 => return Some(pos + next_close),
            None => {
                depth -= 1;
                pos += next_close + "</span>".len();
            }
        }
    }
}

/// Text content of a fragment exactly as stored: tags dropped and entities
/// decoded, whitespace and newlines kept.
pub fn inner_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(lt) = rest.find('<') {
        out.push_str(&unescape(&rest[..lt]));
        let Some(gt) = rest[lt..].find('>') else {
            out.push_str(&unescape(&rest[lt..]));
            return out;
        };
        rest = &rest[lt + gt + 1..];
    }
    out.push_str(&unescape(rest));
    out
}

/// Plain text of an HTML fragment: tags dropped, block ends and `<br>`
/// turned into newlines, entities decoded.
pub fn to_plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        out.push_str(&unescape(&rest[..lt]));
        let Some(gt) = rest[lt..].find('>') else {
            out.push_str(&unescape(&rest[lt..]));
            rest = "";
            break;
        };
        let tag = rest[lt + 1..lt + gt].trim().to_ascii_lowercase();
        let name = tag
            .trim_end_matches('/')
            .split_whitespace()
            .next()
            .unwrap_or("");
        match name {
            "br" | "br/" => out.push('\n'),
            "/p" | "/div" | "/li" | "/h1" | "/h2" | "/h3" | "/tr" => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            "li" => out.push_str("- "),
            _ => {}
        }
        rest = &rest[lt + gt + 1..];
    }
    out.push_str(&unescape(rest));

    out.trim_end_matches('\n').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_unescape() {
        let raw = r#"Tom & "Jerry" <co>'s"#;
        let escaped = escape(raw);
        assert_eq!(escaped, "Tom &amp; &quot;Jerry&quot; &lt;co&gt;&#39;s");
        assert_eq!(unescape(&escaped), raw);
    }

    #[test]
    fn test_unescape_numeric_and_unknown() {
        assert_eq!(unescape("&#65;&#x42;&bogus; & done"), "AB&bogus; & done");
    }

    #[test]
    fn test_field_span_ranges() {
        let html = format!(
            "<p>{} and {}</p>{}",
            field_span("name", "Jane"),
            field_span("case", "1"),
            field_span("name", "<b>Jane</b>")
        );
        let ranges = field_span_ranges(&html, "name");
        assert_eq!(ranges.len(), 2);
        assert_eq!(&html[ranges[0].0..ranges[0].1], "Jane");
        assert_eq!(&html[ranges[1].0..ranges[1].1], "<b>Jane</b>");
    }

    #[test]
    fn test_nested_span_inside_field_span() {
        let html = "<span data-field=\"n\">a<span class=\"x\">b</span>c</span>!";
        let ranges = field_span_ranges(html, "n");
        assert_eq!(&html[ranges[0].0..ranges[0].1], "a<span class=\"x\">b</span>c");
    }

    #[test]
    fn test_ends_inside_tag() {
        assert!(ends_inside_tag("<a href=\"mailto:", false));
        assert!(!ends_inside_tag("<p>Hello ", false));
        assert!(ends_inside_tag("still in attr ", true));
        assert!(!ends_inside_tag("text", false));
    }

    #[test]
    fn test_inner_text_keeps_newlines() {
        assert_eq!(inner_text("hello\n"), "hello\n");
        assert_eq!(inner_text("<b>a &amp; b</b>\n\n"), "a & b\n\n");
    }

    #[test]
    fn test_to_plain_text() {
        let html = "<p>Hello <span data-field=\"n\">Jane &amp; co</span>,</p><p>Line<br>two</p><ul><li>a</li><li>b</li></ul>";
        assert_eq!(to_plain_text(html), "Hello Jane & co,\nLine\ntwo\n- a\n- b");
    }
}
