//! Document shell and toast stack.

use super::html_escape;
use crate::notice::Notice;

/// Wrap page `content` in the HTML document.
///
/// `notices` are rendered as toasts that fade out on their own.
#[must_use]
pub fn html_shell(title: &str, content: &str, notices: &[Notice]) -> String {
    let title = html_escape(title);
    let toasts = toast_stack(notices);
    format!(
        r#"<!DOCTYPE html>
<html lang="en" class="dark">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Document question answering with retrieval-augmented generation">
    <title>{title} - LangRAG</title>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body class="min-h-screen bg-background text-foreground">
{toasts}
{content}
</body>
</html>"#
    )
}

/// Render queued notices. Empty input renders nothing.
#[must_use]
pub fn toast_stack(notices: &[Notice]) -> String {
    if notices.is_empty() {
        return String::new();
    }

    let items: String = notices
        .iter()
        .map(|n| {
            format!(
                r#"<div class="toast {}">{}</div>"#,
                n.level.class(),
                html_escape(&n.text)
            )
        })
        .collect();
    format!(r#"<div class="toast-stack" role="status" aria-live="polite">{items}</div>"#)
}
