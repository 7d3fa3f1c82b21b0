//! Inline `$ref:` rewriting for free-text descriptions.
//!
//! `"See $ref:Foo.bar, details"` becomes
//! `"See <a href="…">…</a>, details"`: the token ends at the first
//! whitespace, and one trailing non-alphanumeric character is handed back to
//! the surrounding text.

use std::borrow::Cow;

use crate::resolver::ReferenceResolver;

pub const REF_MARKER: &str = "$ref:";

/// Rewrite every reference token in `description` into an anchor.
///
/// Descriptions without a marker are returned borrowed, untouched.
pub fn format_description<'d>(
    namespace: &str,
    resolver: &dyn ReferenceResolver,
    description: Option<&'d str>,
) -> Option<Cow<'d, str>> {
    let description = description?;
    if !description.contains(REF_MARKER) {
        return Some(Cow::Borrowed(description));
    }

    let mut segments = description.split(REF_MARKER);
    let mut out = String::with_capacity(description.len() * 2);
    out.push_str(segments.next().unwrap_or_default());

    for segment in segments {
        let (token, rest) = split_token(segment);
        if token.is_empty() {
            // Nothing to link; keep the marker as written.
            out.push_str(REF_MARKER);
            out.push_str(segment);
            continue;
        }
        let link = resolver.resolve(namespace, token);
        out.push_str(&format!("<a href=\"{}\">{}</a>{}", link.href, link.text, rest));
    }

    Some(Cow::Owned(out))
}

/// Split a segment following the marker into (token, trailing text).
fn split_token(segment: &str) -> (&str, &str) {
    let end = segment.find(char::is_whitespace).unwrap_or(segment.len());
    let mut token = &segment[..end];
    if let Some(last) = token.chars().next_back() {
        if !last.is_alphanumeric() {
            token = &token[..token.len() - last.len_utf8()];
        }
    }
    (token, &segment[token.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Link;

    struct EchoResolver;

    impl ReferenceResolver for EchoResolver {
        fn resolve(&self, namespace: &str, token: &str) -> Link {
            Link {
                href: format!("{}#{}", namespace, token),
                text: token.to_string(),
            }
        }
    }

    fn format(text: &str) -> String {
        format_description("demo", &EchoResolver, Some(text))
            .unwrap()
            .into_owned()
    }

    #[test]
    fn absent_description() {
        assert_eq!(format_description("demo", &EchoResolver, None), None);
    }

    #[test]
    fn plain_text_is_borrowed() {
        let text = "plain text";
        let out = format_description("demo", &EchoResolver, Some(text)).unwrap();
        match out {
            Cow::Borrowed(s) => assert!(std::ptr::eq(s, text)),
            Cow::Owned(_) => panic!("plain text should not be copied"),
        }
    }

    #[test]
    fn trailing_punctuation_stays_outside() {
        assert_eq!(
            format("See $ref:Foo.bar, details"),
            "See <a href=\"demo#Foo.bar\">Foo.bar</a>, details"
        );
    }

    #[test]
    fn token_at_end_of_text() {
        assert_eq!(format("Uses $ref:Tab"), "Uses <a href=\"demo#Tab\">Tab</a>");
        assert_eq!(format("Uses $ref:Tab."), "Uses <a href=\"demo#Tab\">Tab</a>.");
    }

    #[test]
    fn several_tokens_in_order() {
        assert_eq!(
            format("$ref:A or $ref:B."),
            "<a href=\"demo#A\">A</a> or <a href=\"demo#B\">B</a>."
        );
    }

    #[test]
    fn only_one_trailing_char_is_trimmed() {
        assert_eq!(format("($ref:Tab)). x"), "(<a href=\"demo#Tab)\">Tab)</a>). x");
    }

    #[test]
    fn empty_token_kept_literally() {
        assert_eq!(format("cost in $ref: units"), "cost in $ref: units");
        assert_eq!(format("trailing $ref:"), "trailing $ref:");
    }
}
