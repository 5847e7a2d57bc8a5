//! Chat transcript.

use std::fmt::Display;

use chrono::{DateTime, Local, TimeZone, Utc};

use super::icons::Icon;
use super::{classes, html_escape};
use crate::domain::{DocumentSource, Message, MessageRole};

/// `hh:mm AM/PM` in the zone of `tz`.
pub fn format_time<Tz>(timestamp: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.with_timezone(tz).format("%I:%M %p").to_string()
}

fn author(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "You",
        MessageRole::Assistant => "LangRAG Assistant",
        MessageRole::System => "System",
    }
}

fn source_label(source: &DocumentSource) -> String {
    let name = html_escape(&source.name);
    match source.page {
        Some(page) if page != 0 => format!("{name} (Page {page})"),
        _ => name,
    }
}

fn sources_block(sources: &[DocumentSource]) -> String {
    if sources.is_empty() {
        return String::new();
    }

    let items: String = sources
        .iter()
        .map(|source| {
            format!(
                r#"<div class="source"><span class="source-icon">{icon}</span><div class="source-body"><p class="source-name">{label}</p><p class="source-excerpt">{excerpt}</p></div></div>"#,
                icon = Icon::FileText.svg(14, "text-muted"),
                label = source_label(source),
                excerpt = html_escape(&source.content),
            )
        })
        .collect();

    format!(r#"<div class="sources"><p class="sources-title">Sources:</p>{items}</div>"#)
}

fn message_entry<Tz>(message: &Message, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let is_user = message.role() == MessageRole::User;
    let (row, avatar, icon) = if is_user {
        ("message-user", "avatar-user", Icon::User.svg(16, "text-muted"))
    } else {
        ("glass-card", "avatar-bot", Icon::Bot.svg(16, "text-primary"))
    };

    let sources = match (message.role(), message.sources()) {
        (MessageRole::Assistant, Some(sources)) => sources_block(sources),
        _ => String::new(),
    };

    format!(
        r#"<div class="{row_class}" id="msg-{id}" data-role="{role}">
    <div class="avatar {avatar}">{icon}</div>
    <div class="message-body">
        <div class="message-header"><h4>{author}</h4><time datetime="{iso}">{time}</time></div>
        <div class="message-content">{content}</div>
        {sources}
    </div>
</div>"#,
        row_class = classes(["message", row]),
        id = html_escape(message.id()),
        role = message.role().as_str(),
        author = author(message.role()),
        iso = message.timestamp().to_rfc3339(),
        time = format_time(message.timestamp(), tz),
        content = html_escape(message.content()),
    )
}

const EMPTY_STATE: &str = r#"<div class="empty-state">
    <div class="empty-icon">{bot}</div>
    <h3>Start a conversation</h3>
    <p class="muted">Ask questions about your uploaded documents or start with a general question.</p>
</div>"#;

const LOADING_PLACEHOLDER: &str = r#"<div class="message glass-card loading-placeholder" aria-busy="true">
    <div class="avatar avatar-bot">{bot}</div>
    <div class="skeleton"><div class="bar bar-short"></div><div class="bar"></div><div class="bar bar-long"></div></div>
</div>"#;

/// Render the transcript in the server's local zone.
#[must_use]
pub fn message_list(messages: &[Message], loading: bool) -> String {
    message_list_in(messages, loading, &Local)
}

/// Render the transcript with times shown in `tz`.
pub fn message_list_in<Tz>(messages: &[Message], loading: bool, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if messages.is_empty() {
        return format!(
            r#"<div class="message-list">{}</div>"#,
            EMPTY_STATE.replace("{bot}", &Icon::Bot.svg(32, "text-primary"))
        );
    }

    let mut html = String::from(r#"<div class="message-list"><div class="messages">"#);
    for message in messages {
        html.push_str(&message_entry(message, tz));
    }
    if loading {
        html.push_str(&LOADING_PLACEHOLDER.replace("{bot}", &Icon::Bot.svg(16, "text-primary")));
    }
    html.push_str(r#"<div id="messages-end"></div></div></div>"#);
    html
}
