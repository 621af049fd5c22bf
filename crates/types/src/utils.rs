/// Reduce a backend-supplied text span to plain text: decode HTML
/// entities, turn `<br>` into newlines, drop any residual tags.
pub fn plain_text(input: &str) -> Result<String, html_entities::DecodeError> {
    html_entities::decode_html_entities(input).map(|decoded| {
        let br_re = regex::Regex::new("<br\\s*/?>").unwrap();
        let decoded = br_re.replace_all(&decoded, "\n");

        let tag_re = regex::Regex::new("<[^>]*>").unwrap();
        tag_re.replace_all(&decoded, "").into_owned()
    })
}

/// Escape text for inclusion in markup produced by the allow-listed
/// rich text renderer.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

/// Count whitespace-separated words in already-plain text.
/// Empty or all-whitespace text counts as zero words, not one.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
