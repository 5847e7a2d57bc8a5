//! Chat panel: transcript or upload panel, then the input bar.

use super::file_upload::file_upload;
use super::html_escape;
use super::icons::Icon;
use super::message_list::message_list;
use crate::chat::{ChatInterface, ChatMode};

const SUBMIT_ON_ENTER: &str = "if(event.key==='Enter'&&!event.shiftKey){event.preventDefault();\
if(!this.form.querySelector('button[type=submit]').disabled){this.form.requestSubmit();}}";

const TOGGLE_SEND: &str = "this.form.querySelector('button[type=submit]').disabled=!this.value.trim()";

fn input_bar(interface: &ChatInterface, mode: ChatMode) -> String {
    let upload = mode.is_upload();
    let loading = interface.is_loading();

    let placeholder = if upload {
        "Ready to process your documents..."
    } else {
        "Type your message..."
    };
    let value = if upload {
        String::new()
    } else {
        html_escape(interface.input())
    };
    let textarea_disabled = if upload || loading { " disabled" } else { "" };
    let button_disabled = if interface.can_send(mode) {
        ""
    } else {
        " disabled"
    };
    let button_class = if loading {
        "send-button send-button-busy"
    } else {
        "send-button"
    };
    let toggle = if upload {
        "Back to chat"
    } else {
        "Upload documents"
    };

    format!(
        r#"<div class="input-bar">
    <form class="glass-card input-form" method="post" action="/chat/send{query}">
        <textarea name="message" rows="1" placeholder="{placeholder}" onkeydown="{SUBMIT_ON_ENTER}" oninput="{TOGGLE_SEND}"{textarea_disabled}>{value}</textarea>
        <button type="submit" class="{button_class}" aria-label="Send"{button_disabled}>{send}</button>
    </form>
    <div class="input-footer">
        <a href="{toggle_href}" class="mode-toggle">{clip}{toggle}</a>
        <p class="hint">LangChain RAG Chatbot</p>
    </div>
</div>"#,
        query = if upload { "?upload=true" } else { "" },
        send = Icon::Send.svg(20, ""),
        toggle_href = mode.toggled().page_path(),
        clip = Icon::Paperclip.svg(14, ""),
    )
}

/// Render the whole chat panel for `mode`.
#[must_use]
pub fn chat_interface(interface: &ChatInterface, mode: ChatMode) -> String {
    let body = if mode.is_upload() {
        format!(
            r#"<div class="upload-panel"><h2 class="heading-md">Upload Documents</h2>{}</div>"#,
            file_upload(interface.staged_files(), interface.upload_policy())
        )
    } else {
        message_list(interface.messages(), interface.is_loading())
    };

    format!(
        r#"<div class="chat-interface" data-mode="{mode}"><div class="chat-body">{body}</div>{bar}</div>"#,
        mode = if mode.is_upload() { "upload" } else { "chat" },
        bar = input_bar(interface, mode),
    )
}
