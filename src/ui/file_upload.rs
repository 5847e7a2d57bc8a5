//! Upload drop zone and the staged-file list.
//!
//! The drop zone is a multipart form around a `multiple` file input. Picking
//! files, or dropping them on the zone, submits the form; without scripting
//! the "Add files" button does the same. While files are dragged over the
//! zone it carries the `dragging` class and reads "Drop files here".

use super::html_escape;
use super::icons::{Icon, file_icon};
use crate::domain::StagedFile;
use crate::upload::UploadPolicy;

/// Size in megabytes with two decimals.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn format_size_mb(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

fn drop_zone(policy: &UploadPolicy) -> String {
    format!(
        r#"<form class="drop-zone" method="post" action="/chat/files" enctype="multipart/form-data">
    <label class="drop-target"
        ondragenter="event.preventDefault(); this.classList.add('dragging')"
        ondragover="event.preventDefault(); this.classList.add('dragging')"
        ondragleave="this.classList.remove('dragging')"
        ondrop="event.preventDefault(); this.classList.remove('dragging'); this.control.files = event.dataTransfer.files; this.form.requestSubmit()">
        <input type="file" name="files" multiple accept="{accept}" class="visually-hidden" onchange="this.form.requestSubmit()">
        <div class="drop-icon">{upload}</div>
        <h3><span class="when-idle">Upload your documents</span><span class="when-dragging">Drop files here</span></h3>
        <p class="muted">Drag and drop files here or click to browse</p>
        <p class="hint">Supported formats: {formats} (max {max_files} files, {max_mb}MB each)</p>
    </label>
    <noscript><button type="submit" class="btn-secondary">Add files</button></noscript>
</form>"#,
        accept = html_escape(&policy.accepted_list(",")),
        formats = html_escape(&policy.accepted_list(", ")),
        max_files = policy.max_files,
        max_mb = policy.max_file_size_mb(),
        upload = Icon::Upload.svg(28, "text-primary"),
    )
}

fn file_row(index: usize, file: &StagedFile) -> String {
    format!(
        r#"<li class="file-row">
    <div class="file-info">{icon}<span class="file-name">{name}</span><span class="file-size">{size}</span></div>
    <form method="post" action="/chat/files/{index}/remove"><button type="submit" class="icon-button" aria-label="Remove {name}">{x}</button></form>
</li>"#,
        icon = file_icon(&file.name),
        name = html_escape(&file.name),
        size = format_size_mb(file.size),
        x = Icon::X.svg(18, ""),
    )
}

/// Render the drop zone followed by the staged files, if any.
#[must_use]
pub fn file_upload(files: &[StagedFile], policy: &UploadPolicy) -> String {
    let mut html = format!(r#"<div class="file-upload">{}"#, drop_zone(policy));

    if !files.is_empty() {
        let rows: String = files
            .iter()
            .enumerate()
            .map(|(i, f)| file_row(i, f))
            .collect();
        html.push_str(&format!(
            r#"<div class="glass-card staged-files"><h4>Uploaded Files ({}/{})</h4><ul>{rows}</ul></div>"#,
            files.len(),
            policy.max_files,
        ));
    }

    html.push_str("</div>");
    html
}
