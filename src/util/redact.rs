use crate::Auth;

const MASK: &str = "<redacted>";

/// Longest prefix of `s` that fits in `max_bytes` without splitting a character.
pub(crate) fn truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let end = (0..=max_bytes)
        .rev()
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(0);
    &s[..end]
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Replace occurrences of `secret` that are not glued to word characters on either side.
fn mask_whole(text: &str, secret: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for (start, _) in text.match_indices(secret) {
        let end = start + secret.len();
        let glued = text[..start].chars().next_back().is_some_and(is_word_char)
            || text[end..].chars().next().is_some_and(is_word_char);
        if !glued {
            out.push_str(&text[copied..start]);
            out.push_str(MASK);
            copied = end;
        }
    }
    out.push_str(&text[copied..]);
    out
}

/// Mask every standalone occurrence of a credential of `auth` in `text`.
pub(crate) fn redact_text(text: String, auth: Option<&Auth>) -> String {
    auth.map(Auth::secrets)
        .unwrap_or_default()
        .into_iter()
        .filter(|secret| !secret.is_empty())
        .fold(text, |text, secret| mask_whole(&text, secret))
}
