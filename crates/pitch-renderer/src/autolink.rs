//! Bare URL detection for prose text (GFM autolink extension).

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::state::escape_html;

/// `http(s)://` or `www.` followed by non-space characters.
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)[^\s<]+").unwrap());

/// Escape `text` for HTML, wrapping bare URLs in anchors.
///
/// Trailing punctuation (`.`, `,`, `;`, `:`, `!`, `?`, quotes, and an
/// unbalanced `)`) is left outside the link, as GFM does.
#[must_use]
pub fn linkify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in URL_RE.find_iter(text) {
        let url = trim_trailing_punctuation(m.as_str());
        if url.ends_with("://") || url.eq_ignore_ascii_case("www.") {
            continue;
        }
        let end = m.start() + url.len();

        out.push_str(&escape_html(&text[last..m.start()]));
        let href = if url.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("www.")) {
            format!("http://{url}")
        } else {
            url.to_owned()
        };
        write!(
            out,
            r#"<a href="{}">{}</a>"#,
            escape_html(&href),
            escape_html(url)
        )
        .unwrap();
        last = end;
    }

    out.push_str(&escape_html(&text[last..]));
    out
}

fn trim_trailing_punctuation(url: &str) -> &str {
    let mut url = url;
    loop {
        let Some(last) = url.chars().last() else {
            return url;
        };
        let strip = match last {
            '.' | ',' | ';' | ':' | '!' | '?' | '"' | '\'' | '*' | '_' | '~' => true,
            ')' => url.matches(')').count() > url.matches('(').count(),
            _ => false,
        };
        if !strip {
            return url;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
}
