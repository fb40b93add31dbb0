//! File upload staging and validation.
//!
//! DESIGN
//! ======
//! Candidate files are validated as a batch before they are staged. Batch
//! level problems (too many files, several files in single mode) reject the
//! whole selection; per-file problems are collected so valid files in the
//! same selection are still staged.
//!
//! Image previews are object URLs held as [`PreviewUrl`] values. A preview is
//! never cloned: whoever removes a staged file receives its preview and must
//! release it, so each URL is revoked exactly once.

#[cfg(test)]
#[path = "uploads_test.rs"]
mod uploads_test;

use crate::util::format::ByteSize;

/// Default maximum number of staged files.
pub const DEFAULT_MAX_FILES: usize = 5;

/// Default maximum size of one file (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Whether the widget sends one file or a batch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UploadMode {
    Single,
    #[default]
    Multiple,
}

/// Widget configuration supplied by the embedding page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadConfig {
    /// Backend category tag, e.g. `profile-document`.
    pub upload_type: String,
    pub mode: UploadMode,
    pub max_files: usize,
    /// Largest accepted file in bytes; a file of exactly this size is accepted.
    pub max_file_size: u64,
    /// Allowed MIME types; `type/*` entries match a whole family. Empty allows all.
    pub accepted_types: Vec<String>,
}

impl UploadConfig {
    pub fn new(upload_type: &str) -> Self {
        Self {
            upload_type: upload_type.to_owned(),
            mode: UploadMode::default(),
            max_files: DEFAULT_MAX_FILES,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            accepted_types: Vec::new(),
        }
    }

    /// Maximum number of files for the configured mode.
    pub fn file_limit(&self) -> usize {
        match self.mode {
            UploadMode::Single => 1,
            UploadMode::Multiple => self.max_files,
        }
    }

    pub fn accepts_mime(&self, mime: &str) -> bool {
        if self.accepted_types.is_empty() {
            return true;
        }
        let mime = mime.to_ascii_lowercase();
        self.accepted_types.iter().any(|allowed| {
            let allowed = allowed.to_ascii_lowercase();
            match allowed.strip_suffix("/*") {
                Some(family) => mime.split('/').next() == Some(family),
                None => allowed == mime,
            }
        })
    }

    /// Value for the file input's `accept` attribute.
    pub fn accept_attr(&self) -> String {
        self.accepted_types.join(",")
    }
}

/// Local metadata of a selected file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

impl FileMeta {
    pub fn new(name: &str, mime: &str, size: u64) -> Self {
        Self { name: name.to_owned(), mime: mime.to_owned(), size }
    }

    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

/// An object URL created for a local file preview.
///
/// Not `Clone`: the holder of this value is responsible for revoking it.
#[derive(Debug, PartialEq, Eq)]
pub struct PreviewUrl(String);

impl PreviewUrl {
    pub fn new(url: String) -> Self {
        Self(url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the handle, yielding the URL to revoke.
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A file selected but not yet uploaded.
#[derive(Debug, PartialEq, Eq)]
pub struct StagedFile {
    pub id: String,
    pub meta: FileMeta,
    pub preview: Option<PreviewUrl>,
}

/// Descriptive fields sent with an upload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadMetadata {
    pub description: String,
    pub tags: Vec<String>,
    pub related_model: Option<String>,
    pub related_id: Option<String>,
    pub is_public: bool,
}

/// Split a comma-separated tag field, dropping blanks.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

// =============================================================================
// Validation
// =============================================================================

/// A selection rejected as a whole.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BatchRejection {
    #[error("Only one file can be uploaded at a time.")]
    SingleOnly,
    #[error("You can upload at most {max} files.")]
    TooMany { max: usize },
}

/// One file rejected from an otherwise valid selection.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FileRejection {
    #[error("{name} is too large ({size}); the limit is {max}.")]
    TooLarge { name: String, size: ByteSize, max: ByteSize },
    #[error("{name} has a file type that is not allowed ({mime}).")]
    TypeNotAllowed { name: String, mime: String },
}

/// Per-file outcome of a selection that passed the batch checks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchVerdict {
    /// Indices into the candidate slice that may be staged.
    pub accepted: Vec<usize>,
    pub rejected: Vec<FileRejection>,
}

impl BatchVerdict {
    /// All per-file rejections as one message, or `None` when every file passed.
    pub fn message(&self) -> Option<String> {
        if self.rejected.is_empty() {
            return None;
        }
        Some(self.rejected.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "))
    }
}

/// Validate a candidate selection against `config` and the files already staged.
///
/// # Errors
///
/// Returns a [`BatchRejection`] when the selection as a whole is not allowed.
pub fn validate_batch(config: &UploadConfig, staged: usize, candidates: &[FileMeta]) -> Result<BatchVerdict, BatchRejection> {
    if config.mode == UploadMode::Single {
        if candidates.len() > 1 {
            return Err(BatchRejection::SingleOnly);
        }
    } else if staged + candidates.len() > config.max_files {
        return Err(BatchRejection::TooMany { max: config.max_files });
    }

    let mut verdict = BatchVerdict::default();
    for (index, file) in candidates.iter().enumerate() {
        if file.size > config.max_file_size {
            verdict.rejected.push(FileRejection::TooLarge {
                name: file.name.clone(),
                size: ByteSize(file.size),
                max: ByteSize(config.max_file_size),
            });
        } else if !config.accepts_mime(&file.mime) {
            verdict.rejected.push(FileRejection::TypeNotAllowed { name: file.name.clone(), mime: file.mime.clone() });
        } else {
            verdict.accepted.push(index);
        }
    }
    Ok(verdict)
}

// =============================================================================
// Widget state
// =============================================================================

/// Staged files and status flags for one upload widget.
#[derive(Debug, Default)]
pub struct UploadState {
    files: Vec<StagedFile>,
    /// A drag is hovering over the drop zone.
    pub drag_active: bool,
    pub uploading: bool,
    pub error: Option<String>,
}

impl UploadState {
    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.files.iter().map(|f| f.id.clone()).collect()
    }

    /// Stage an accepted file. In single mode the previous file is replaced.
    ///
    /// Returns the new id and any previews that must now be released.
    pub fn stage(&mut self, mode: UploadMode, meta: FileMeta, preview: Option<PreviewUrl>) -> (String, Vec<PreviewUrl>) {
        let released = if mode == UploadMode::Single { self.clear() } else { Vec::new() };
        let id = uuid::Uuid::new_v4().to_string();
        self.files.push(StagedFile { id: id.clone(), meta, preview });
        (id, released)
    }

    /// Remove one staged file, handing back its preview for release.
    ///
    /// Returns `None` when the id is unknown, including a second removal.
    pub fn remove(&mut self, id: &str) -> Option<Option<PreviewUrl>> {
        let index = self.files.iter().position(|f| f.id == id)?;
        Some(self.files.remove(index).preview)
    }

    /// Drop the files in `ids`, handing back their previews for release.
    ///
    /// Files staged after `ids` was taken stay staged.
    pub fn remove_many(&mut self, ids: &[String]) -> Vec<PreviewUrl> {
        let (gone, kept): (Vec<StagedFile>, Vec<StagedFile>) =
            std::mem::take(&mut self.files).into_iter().partition(|f| ids.contains(&f.id));
        self.files = kept;
        gone.into_iter().filter_map(|f| f.preview).collect()
    }

    /// Drop every staged file, handing back their previews for release.
    pub fn clear(&mut self) -> Vec<PreviewUrl> {
        self.files.drain(..).filter_map(|f| f.preview).collect()
    }
}
