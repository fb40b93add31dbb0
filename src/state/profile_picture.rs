//! Profile picture selection rules and preview bookkeeping.
//!
//! The widget shows a local preview as soon as a valid image is picked and
//! uploads it immediately. If the upload fails the preview reverts to the
//! picture that was displayed before.

#[cfg(test)]
#[path = "profile_picture_test.rs"]
mod profile_picture_test;

use crate::net::types::ProfilePicture;
use crate::state::uploads::{FileMeta, PreviewUrl};
use crate::util::format::ByteSize;
use crate::util::request_seq::{RequestSeq, Ticket};

/// Largest accepted picture (5 MB).
pub const MAX_PICTURE_BYTES: u64 = 5 * 1024 * 1024;

/// Smallest accepted width and height in pixels.
pub const MIN_PICTURE_DIMENSION: u32 = 100;

/// Backend category for profile pictures.
pub const PROFILE_PICTURE_UPLOAD_TYPE: &str = "profile-picture";

/// Reasons a selected picture is refused before upload.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PictureRejection {
    #[error("Please choose an image file.")]
    NotAnImage,
    #[error("The image is too large ({size}); the limit is {max}.")]
    TooLarge { size: ByteSize, max: ByteSize },
    #[error("The image must be at least {min}x{min} pixels (got {width}x{height}).")]
    TooSmall { width: u32, height: u32, min: u32 },
    #[error("The image could not be read.")]
    Unreadable,
}

/// Checks that need only the file metadata.
///
/// # Errors
///
/// Returns a [`PictureRejection`] for non-image types or oversized files.
pub fn check_file(meta: &FileMeta) -> Result<(), PictureRejection> {
    if !meta.is_image() {
        return Err(PictureRejection::NotAnImage);
    }
    if meta.size > MAX_PICTURE_BYTES {
        return Err(PictureRejection::TooLarge { size: ByteSize(meta.size), max: ByteSize(MAX_PICTURE_BYTES) });
    }
    Ok(())
}

/// Checks on the decoded image size.
///
/// # Errors
///
/// Returns [`PictureRejection::TooSmall`] when either side is below the minimum.
pub fn check_dimensions(width: u32, height: u32) -> Result<(), PictureRejection> {
    if width < MIN_PICTURE_DIMENSION || height < MIN_PICTURE_DIMENSION {
        return Err(PictureRejection::TooSmall { width, height, min: MIN_PICTURE_DIMENSION });
    }
    Ok(())
}

const PICK_KEY: &str = "pick";

/// Displayed picture plus an optional in-flight local preview.
///
/// Every pick is stamped when it starts. Only the newest pick may show its
/// preview or apply its upload result; an older pick that finishes late is
/// ignored and keeps its hands off the newer preview.
#[derive(Debug, Default)]
pub struct PictureState {
    current: Option<ProfilePicture>,
    preview: Option<PreviewUrl>,
    /// A pick is being checked or uploaded.
    pub uploading: bool,
    pub error: Option<String>,
    picks: RequestSeq,
}

impl PictureState {
    pub fn new(current: Option<ProfilePicture>) -> Self {
        Self { current, ..Self::default() }
    }

    pub fn current(&self) -> Option<&ProfilePicture> {
        self.current.as_ref()
    }

    /// URL to render: the pending preview if any, otherwise the stored picture.
    pub fn display_url(&self) -> Option<&str> {
        self.preview
            .as_ref()
            .map(PreviewUrl::as_str)
            .or_else(|| self.current.as_ref().map(|p| p.url.as_str()))
    }

    /// Stamp a new pick, superseding any still being checked or uploaded.
    pub fn begin_pick(&mut self) -> Ticket {
        self.uploading = true;
        self.error = None;
        self.picks.begin(PICK_KEY)
    }

    /// Refuse a pick before upload. Returns `false` for a superseded pick.
    pub fn pick_rejected(&mut self, ticket: &Ticket, message: String) -> bool {
        if !self.picks.finish(ticket) {
            return false;
        }
        self.uploading = false;
        self.error = Some(message);
        true
    }

    /// Show a local preview while the upload runs.
    ///
    /// Returns a replaced preview to release, or hands `preview` straight back
    /// when the pick has been superseded.
    ///
    /// # Errors
    ///
    /// Returns `preview` unchanged when `ticket` is no longer the newest pick.
    pub fn begin_upload(&mut self, ticket: &Ticket, preview: PreviewUrl) -> Result<Option<PreviewUrl>, PreviewUrl> {
        if !self.picks.is_current(ticket) {
            return Err(preview);
        }
        Ok(self.preview.replace(preview))
    }

    /// Adopt the uploaded picture.
    ///
    /// Returns `None` for a superseded pick, otherwise the preview to release.
    pub fn upload_succeeded(&mut self, ticket: &Ticket, picture: ProfilePicture) -> Option<Option<PreviewUrl>> {
        if !self.picks.finish(ticket) {
            return None;
        }
        self.uploading = false;
        self.current = Some(picture);
        Some(self.preview.take())
    }

    /// Revert to the previous picture.
    ///
    /// Returns `None` for a superseded pick, otherwise the preview to release.
    pub fn upload_failed(&mut self, ticket: &Ticket, message: String) -> Option<Option<PreviewUrl>> {
        if !self.picks.finish(ticket) {
            return None;
        }
        self.uploading = false;
        self.error = Some(message);
        Some(self.preview.take())
    }

    /// Attachment id to delete for the displayed picture, if one is stored.
    pub fn removable_id(&self) -> Option<String> {
        if self.preview.is_some() {
            return None;
        }
        self.current.as_ref().map(|p| p.attachment_id.clone())
    }

    pub fn removed(&mut self) {
        self.current = None;
        self.error = None;
    }

    /// Release any pending preview on teardown.
    pub fn take_preview(&mut self) -> Option<PreviewUrl> {
        self.preview.take()
    }
}
