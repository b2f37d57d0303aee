//! Recovering a JSON array from loosely formatted LLM output.
//!
//! Interpreters wrap their answer in markdown fences, prepend a sentence or
//! append an explanation. We strip the fences, then scan for the first
//! balanced `[...]` span that decodes as a JSON array.

use serde_json::Value;

/// Remove markdown code-fence markers (```` ```json ```` and ```` ``` ````) anywhere in the text.
pub fn strip_code_fences(response: &str) -> String {
    response.replace("```json", "").replace("```JSON", "").replace("```", "")
}

/// Find the end (exclusive byte offset) of the balanced bracket span starting at `start`.
///
/// Tracks `[`/`{` nesting with a stack of expected closers and ignores brackets
/// inside string literals. Returns `None` if the span is unbalanced or a closer
/// does not match its opener.
fn balanced_span_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut expected: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'[' => expected.push(b']'),
            b'{' => expected.push(b'}'),
            b']' | b'}' => {
                if expected.pop() != Some(b) {
                    return None;
                }
                if expected.is_empty() {
                    return Some(start + offset + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// Extract the first well-formed JSON array from an interpreter response.
///
/// Returns `None` when no candidate span decodes; callers treat that as
/// "no records".
pub fn extract_first_json_array(response: &str) -> Option<Vec<Value>> {
    let cleaned = strip_code_fences(response);

    cleaned
        .match_indices('[')
        .filter_map(|(start, _)| {
            let end = balanced_span_end(&cleaned, start)?;
            serde_json::from_str::<Vec<Value>>(&cleaned[start..end]).ok()
        })
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array() {
        let values = extract_first_json_array(r#"[{"a": 1}, {"a": 2}]"#).unwrap();
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_fenced_with_trailing_prose() {
        let bare = r#"[{"period": "3", "class": "7b"}]"#;
        let wrapped = format!("Here you go:\n```json\n{}\n```\nLet me know if [anything] else.", bare);

        assert_eq!(
            extract_first_json_array(&wrapped),
            extract_first_json_array(bare)
        );
    }

    #[test]
    fn test_nested_arrays_and_brackets_in_strings() {
        let text = r#"[{"notes": "see ] and [", "rooms": [1, [2, 3]]}] trailing ]"#;
        let values = extract_first_json_array(text).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0]["notes"], "see ] and [");
    }

    #[test]
    fn test_skips_non_json_bracket_prefix() {
        let text = r#"[Note] The entries are: [{"period": "1"}]"#;
        let values = extract_first_json_array(text).unwrap();
        assert_eq!(values[0]["period"], "1");
    }

    #[test]
    fn test_no_array() {
        assert!(extract_first_json_array("Sorry, I cannot help with that.").is_none());
        assert!(extract_first_json_array(r#"{"not": "an array"}"#).is_none());
        assert!(extract_first_json_array("[1, 2").is_none());
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[]\n```").trim(), "[]");
        assert_eq!(strip_code_fences("```\n[]\n```").trim(), "[]");
        assert_eq!(strip_code_fences("[]"), "[]");
    }
}
