//! Staged-file list with client-side validation.
//!
//! Every batch (drop or picker selection) is validated as a whole, in order:
//! file count, extension allow-list, per-file size. A batch with a single bad
//! file is rejected entirely and the list is left untouched.

use std::fmt;

use thiserror::Error;

use crate::domain::StagedFile;

/// Default maximum number of staged files.
pub const DEFAULT_MAX_FILES: usize = 5;

/// Default per-file size cap (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default accepted extensions.
pub const DEFAULT_ACCEPTED_TYPES: &[&str] = &[".pdf", ".docx", ".txt"];

/// Limits applied when files are added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Maximum number of files held at once.
    pub max_files: usize,
    /// Accepted extensions as displayed, e.g. `.pdf`.
    pub accepted_types: Vec<String>,
    /// Maximum size of a single file in bytes.
    pub max_file_size: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            accepted_types: DEFAULT_ACCEPTED_TYPES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

impl UploadPolicy {
    /// Whether `extension` (without the dot) is on the allow-list.
    #[must_use]
    pub fn accepts_extension(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.accepted_types
            .iter()
            .any(|t| t.trim_start_matches('.').to_lowercase() == extension)
    }

    /// Accepted types joined for display and for the picker's `accept`.
    #[must_use]
    pub fn accepted_list(&self, separator: &str) -> String {
        self.accepted_types.join(separator)
    }

    /// Size cap in whole megabytes, for messages.
    #[must_use]
    pub fn max_file_size_mb(&self) -> u64 {
        self.max_file_size / (1024 * 1024)
    }

    /// Check a batch against the current count. Order: count, type, size.
    pub fn validate(&self, existing: usize, batch: &[StagedFile]) -> Result<(), UploadError> {
        if existing + batch.len() > self.max_files {
            return Err(UploadError::TooManyFiles {
                max: self.max_files,
            });
        }

        let rejected: Vec<String> = batch
            .iter()
            .filter(|f| !self.accepts_extension(&f.extension()))
            .map(|f| f.name.clone())
            .collect();
        if !rejected.is_empty() {
            return Err(UploadError::InvalidType {
                accepted: self.accepted_list(", "),
                rejected,
            });
        }

        let oversized: Vec<String> = batch
            .iter()
            .filter(|f| f.size > self.max_file_size)
            .map(|f| f.name.clone())
            .collect();
        if !oversized.is_empty() {
            return Err(UploadError::TooLarge {
                limit_mb: self.max_file_size_mb(),
                oversized,
            });
        }

        Ok(())
    }
}

/// Why a batch was rejected. The display text is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("You can only upload a maximum of {max} files.")]
    TooManyFiles { max: usize },

    #[error("Invalid file type(s). Accepted types: {accepted}")]
    InvalidType {
        accepted: String,
        rejected: Vec<String>,
    },

    #[error("Some files exceed the {limit_mb}MB size limit.")]
    TooLarge {
        limit_mb: u64,
        oversized: Vec<String>,
    },
}

type Listener = Box<dyn FnMut(&[StagedFile]) + Send>;

/// The upload widget's file list.
///
/// An optional listener is called with the full list after every successful
/// add and every removal.
pub struct FileUpload {
    policy: UploadPolicy,
    files: Vec<StagedFile>,
    listener: Option<Listener>,
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("policy", &self.policy)
            .field("files", &self.files.len())
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl FileUpload {
    #[must_use]
    pub fn new(policy: UploadPolicy) -> Self {
        Self {
            policy,
            files: Vec::new(),
            listener: None,
        }
    }

    /// Register the completion callback.
    #[must_use]
    pub fn on_change(mut self, listener: impl FnMut(&[StagedFile]) + Send + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    #[must_use]
    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    #[must_use]
    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Validate and append a batch, returning the full updated list.
    ///
    /// An empty batch changes nothing and does not notify the listener.
    pub fn add(&mut self, batch: Vec<StagedFile>) -> Result<&[StagedFile], UploadError> {
        if batch.is_empty() {
            return Ok(&self.files);
        }

        self.policy.validate(self.files.len(), &batch)?;
        self.files.extend(batch);
        self.notify();
        Ok(&self.files)
    }

    /// Remove the file at `index`, notifying the listener.
    pub fn remove(&mut self, index: usize) -> Option<StagedFile> {
        if index >= self.files.len() {
            return None;
        }
        let removed = self.files.remove(index);
        self.notify();
        Some(removed)
    }

    /// Drop every staged file without notifying.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    fn notify(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener(&self.files);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn file(name: &str) -> StagedFile {
        StagedFile::from_bytes(name, b"content".to_vec())
    }

    fn sized(name: &str, size: u64) -> StagedFile {
        StagedFile::new(name, None, axum::body::Bytes::new(), size)
    }

    fn names(files: &[StagedFile]) -> Vec<&str> {
        files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_valid_batch_appends_in_order() {
        let mut upload = FileUpload::new(UploadPolicy::default());
        upload.add(vec![file("a.pdf"), file("b.txt")]).unwrap();
        let files = upload.add(vec![file("c.DOCX")]).unwrap();
        assert_eq!(names(files), ["a.pdf", "b.txt", "c.DOCX"]);
    }

    #[test]
    fn test_count_overflow_leaves_list_unchanged() {
        let mut upload = FileUpload::new(UploadPolicy::default());
        upload
            .add(vec![file("1.pdf"), file("2.pdf"), file("3.pdf"), file("4.pdf")])
            .unwrap();

        let err = upload.add(vec![file("5.pdf"), file("6.pdf")]).unwrap_err();
        assert_eq!(err, UploadError::TooManyFiles { max: 5 });
        assert_eq!(err.to_string(), "You can only upload a maximum of 5 files.");
        assert_eq!(upload.len(), 4);

        // exactly at the limit is fine
        upload.add(vec![file("5.pdf")]).unwrap();
        assert_eq!(upload.len(), 5);
    }

    #[test]
    fn test_one_bad_extension_rejects_whole_batch() {
        let mut upload = FileUpload::new(UploadPolicy::default());
        let err = upload
            .add(vec![file("good.pdf"), file("photo.png"), file("notes.txt")])
            .unwrap_err();

        match &err {
            UploadError::InvalidType { rejected, .. } => assert_eq!(rejected, &["photo.png"]),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "Invalid file type(s). Accepted types: .pdf, .docx, .txt"
        );
        assert!(upload.is_empty());
    }

    #[test]
    fn test_file_without_extension_is_rejected() {
        let mut upload = FileUpload::new(UploadPolicy::default());
        assert!(matches!(
            upload.add(vec![file("pdf")]),
            Err(UploadError::InvalidType { .. })
        ));
    }

    #[test]
    fn test_oversized_file_rejects_batch() {
        let mut upload = FileUpload::new(UploadPolicy::default());
        let err = upload
            .add(vec![
                sized("small.pdf", 1024),
                sized("huge.pdf", DEFAULT_MAX_FILE_SIZE + 1),
            ])
            .unwrap_err();
        assert_eq!(err.to_string(), "Some files exceed the 10MB size limit.");
        assert!(upload.is_empty());

        // the cap itself is allowed
        upload
            .add(vec![sized("edge.pdf", DEFAULT_MAX_FILE_SIZE)])
            .unwrap();
        assert_eq!(upload.len(), 1);
    }

    #[test]
    fn test_count_is_checked_before_type_and_size() {
        let policy = UploadPolicy {
            max_files: 1,
            ..UploadPolicy::default()
        };
        let mut upload = FileUpload::new(policy);
        let err = upload
            .add(vec![file("a.exe"), sized("b.pdf", u64::MAX)])
            .unwrap_err();
        assert!(matches!(err, UploadError::TooManyFiles { max: 1 }));

        // type before size
        let err = upload
            .add(vec![sized("big.exe", u64::MAX)])
            .unwrap_err();
        assert!(matches!(err, UploadError::InvalidType { .. }));
    }

    #[test]
    fn test_listener_sees_full_list() {
        let seen: Arc<Mutex<Vec<Vec<String>>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let mut upload = FileUpload::new(UploadPolicy::default()).on_change(move |files| {
            sink.lock()
                .unwrap()
                .push(files.iter().map(|f| f.name.clone()).collect());
        });

        upload.add(vec![file("a.pdf")]).unwrap();
        upload.add(vec![file("b.txt"), file("c.docx")]).unwrap();
        let _ = upload.add(vec![file("bad.zip")]);
        upload.remove(1).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                vec!["a.pdf".to_string()],
                vec!["a.pdf".into(), "b.txt".into(), "c.docx".into()],
                vec!["a.pdf".into(), "c.docx".into()],
            ]
        );
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut upload = FileUpload::new(UploadPolicy::default());
        upload.add(vec![file("a.pdf")]).unwrap();
        assert!(upload.remove(3).is_none());
        assert_eq!(upload.len(), 1);
    }

    #[test]
    fn test_custom_allow_list() {
        let policy = UploadPolicy {
            accepted_types: vec!["md".into(), ".PDF".into()],
            ..UploadPolicy::default()
        };
        assert!(policy.accepts_extension("md"));
        assert!(policy.accepts_extension("pdf"));
        assert!(!policy.accepts_extension("txt"));
    }
}
