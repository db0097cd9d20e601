/// Make untrusted text safe to splice into HTML markup.
///
/// Maps `& < > " '` to character references in one pass, so an `&` produced
/// by an earlier substitution is never escaped again. `None` renders as "".
pub fn escape_html(text: Option<&str>) -> String {
    let text = text.unwrap_or("");
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
