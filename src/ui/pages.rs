//! Route-level page composition.

use super::chat_interface::chat_interface;
use super::layout::html_shell;
use super::marketing::{features, footer, hero, how_it_works};
use super::navbar::{ActivePage, navbar};
use crate::chat::{ChatInterface, ChatMode};
use crate::notice::Notice;

/// Landing page.
#[must_use]
pub fn index_page() -> String {
    let content = format!(
        r#"<div class="page">
{nav}
<main class="page-main">
{hero}
{features}
{how}
{footer}
</main>
</div>"#,
        nav = navbar(ActivePage::Home),
        hero = hero(),
        features = features(),
        how = how_it_works(),
        footer = footer(),
    );
    html_shell("Home", &content, &[])
}

/// Chat page for `mode`, with the notices drained from the session.
#[must_use]
pub fn chat_page(interface: &ChatInterface, mode: ChatMode, notices: &[Notice]) -> String {
    let active = if mode.is_upload() {
        ActivePage::Upload
    } else {
        ActivePage::Chat
    };
    let content = format!(
        r#"<div class="page">
{nav}
<main class="page-main chat-main">
    <div class="container-custom chat-container">
        <div class="glass-card chat-card">{panel}</div>
    </div>
</main>
</div>"#,
        nav = navbar(active),
        panel = chat_interface(interface, mode),
    );
    html_shell("Chat", &content, notices)
}

/// 404 page.
#[must_use]
pub fn not_found_page(path: &str) -> String {
    let content = format!(
        r#"<div class="page">
{nav}
<main class="page-main not-found">
    <h1 class="heading-xl">404</h1>
    <p class="lead">Oops! Page not found: <code>{path}</code></p>
    <a href="/" class="btn-primary">Return to Home</a>
</main>
</div>"#,
        nav = navbar(ActivePage::Home),
        path = super::html_escape(path),
    );
    html_shell("Not found", &content, &[])
}
