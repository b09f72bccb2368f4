//! Front matter extraction and decoding.
//!
//! The header is the block between an opening `---` line (the very
//! first line of the document) and the next `---` line. Everything
//! after the closing delimiter is the body.

use std::collections::BTreeMap;

/// Split a document into its front matter header and body.
///
/// The first line must be exactly `---` (a leading UTF-8 BOM is
/// tolerated, CRLF endings are handled). Header lines accumulate
/// verbatim until a line equal to `---` recurs; the remainder, with
/// leading whitespace stripped, is the body. Returns `None` when the
/// document does not open with the delimiter or the header never
/// closes.
pub fn split(input: &str) -> Option<(String, &str)> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);

    let (first, mut rest) = take_line(input)?;
    if first != "---" {
        return None;
    }

    let mut header = String::new();
    loop {
        let (line, after) = take_line(rest)?;
        if line == "---" {
            return Some((header, after.trim_start_matches(['\r', '\n', '\t', ' '])));
        }
        header.push_str(line);
        header.push('\n');
        rest = after;
    }
}

/// Split off the next line, without its terminator. Returns `None` at
/// end of input (an unterminated final line still counts as a line).
fn take_line(input: &str) -> Option<(&str, &str)> {
    if input.is_empty() {
        return None;
    }
    match input.find('\n') {
        Some(pos) => {
            let line = input[..pos].strip_suffix('\r').unwrap_or(&input[..pos]);
            Some((line, &input[pos + 1..]))
        }
        None => Some((input.strip_suffix('\r').unwrap_or(input), "")),
    }
}

/// Decode a front matter header as a flat string-to-string mapping.
///
/// Values are YAML scalars rendered to their string form (`phase: 1`
/// decodes to `"1"`). Nested values are dropped; the required-field
/// validation downstream catches anything that matters.
pub fn decode(header: &str) -> Result<BTreeMap<String, String>, serde_yaml::Error> {
    let parsed: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(header)?;

    Ok(parsed
        .into_iter()
        .filter_map(|(key, value)| scalar_to_string(value).map(|v| (key, v)))
        .collect())
}

/// Render a YAML scalar as a plain string. Non-scalars yield `None`.
fn scalar_to_string(value: serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Null => Some(String::new()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        let input = "---\nslug: my-post\ntitle: My Post\n---\nBody text\n";
        let (header, body) = split(input).unwrap();

        assert_eq!(header, "slug: my-post\ntitle: My Post\n");
        assert_eq!(body, "Body text\n");
    }

    #[test]
    fn test_split_strips_leading_body_whitespace() {
        let input = "---\nslug: a\n---\n\n\n   \tBody\n";
        let (_, body) = split(input).unwrap();
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn test_split_crlf() {
        let input = "---\r\nslug: a\r\n---\r\nBody\r\n";
        let (header, body) = split(input).unwrap();

        assert_eq!(header, "slug: a\n");
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_split_with_bom() {
        let input = "\u{feff}---\nslug: a\n---\nBody";
        assert!(split(input).is_some());
    }

    #[test]
    fn test_split_missing_opening_delimiter() {
        assert!(split("slug: a\n---\nBody").is_none());
        assert!(split("Body only").is_none());
        assert!(split("").is_none());
    }

    #[test]
    fn test_split_unterminated_header() {
        assert!(split("---\nslug: a\ntitle: b\n").is_none());
    }

    #[test]
    fn test_split_delimiter_inside_body_untouched() {
        let input = "---\nslug: a\n---\nbefore\n---\nafter\n";
        let (_, body) = split(input).unwrap();
        assert_eq!(body, "before\n---\nafter\n");
    }

    #[test]
    fn test_decode_scalars() {
        let fields = decode("slug: my-post\nphase: 1\ndraft: false\nempty:\n").unwrap();

        assert_eq!(fields["slug"], "my-post");
        assert_eq!(fields["phase"], "1");
        assert_eq!(fields["draft"], "false");
        assert_eq!(fields["empty"], "");
    }

    #[test]
    fn test_decode_drops_nested_values() {
        let fields = decode("slug: a\nlist:\n  - one\n  - two\n").unwrap();

        assert_eq!(fields["slug"], "a");
        assert!(!fields.contains_key("list"));
    }

    #[test]
    fn test_decode_rejects_non_mapping() {
        assert!(decode("- one\n- two\n").is_err());
    }

    #[test]
    fn test_decode_preserves_colon_values() {
        let fields = decode("url: \"https://example.com/a\"\n").unwrap();
        assert_eq!(fields["url"], "https://example.com/a");
    }
}
