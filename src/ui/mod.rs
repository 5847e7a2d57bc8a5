//! Server-rendered HTML.
//!
//! Pages are plain strings assembled from small rendering functions, one per
//! component, in the same spirit as a component tree:
//!
//! - [`layout`]: document shell and toast stack
//! - [`navbar`]: top navigation
//! - [`marketing`]: hero, features, how-it-works and footer sections
//! - [`message_list`]: chat transcript
//! - [`file_upload`]: drop zone and staged-file list
//! - [`chat_interface`]: transcript or upload panel plus the input bar
//! - [`pages`]: route-level composition
//!
//! All user- or backend-supplied text goes through [`html_escape`].

pub mod chat_interface;
pub mod file_upload;
pub mod icons;
pub mod layout;
pub mod marketing;
pub mod message_list;
pub mod navbar;
pub mod pages;

/// Escape text for element content and double-quoted attributes.
#[must_use]
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Join class names, skipping empty ones.
#[must_use]
pub fn classes<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<script>alert("x&y")</script>"#),
            "&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;/script&gt;"
        );
        assert_eq!(html_escape("it's"), "it&#x27;s");
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn test_classes_skip_empty() {
        assert_eq!(classes(["a", "", "b"]), "a b");
        assert_eq!(classes(Vec::<&str>::new()), "");
    }
}
