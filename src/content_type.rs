//! # Content Type Module
//!
//! The closed set of image encodings the bot accepts. Every mapping between
//! MIME strings, file extensions and sniffed formats goes through here.

use std::fmt;

use crate::errors::ResizeError;

/// Image encoding family governing decode/encode behavior and output extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Jpeg,
    Png,
}

impl ContentType {
    /// Parse a MIME type string, accepting only `image/jpeg` and `image/png`
    ///
    /// Parameters after `;` and surrounding whitespace are ignored, the
    /// essence itself is compared case-insensitively.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resize_bot::content_type::ContentType;
    ///
    /// assert_eq!(ContentType::from_mime("image/png"), Some(ContentType::Png));
    /// assert_eq!(ContentType::from_mime("image/gif"), None);
    /// ```
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case("image/jpeg") {
            Some(ContentType::Jpeg)
        } else if essence.eq_ignore_ascii_case("image/png") {
            Some(ContentType::Png)
        } else {
            None
        }
    }

    /// Like [`ContentType::from_mime`] but reports the rejected value
    pub fn parse(mime: &str) -> Result<Self, ResizeError> {
        Self::from_mime(mime).ok_or_else(|| ResizeError::UnsupportedType(mime.to_string()))
    }

    /// Map a file path's extension to a content type
    ///
    /// Telegram stores photos as `photos/file_N.jpg`, documents keep
    /// whatever extension the uploader used.
    pub fn from_path(path: &str) -> Option<Self> {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "jpe" => Some(ContentType::Jpeg),
            "png" => Some(ContentType::Png),
            _ => None,
        }
    }

    /// Detect the content type from the leading magic bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes) {
            Ok(image::ImageFormat::Jpeg) => Some(ContentType::Jpeg),
            Ok(image::ImageFormat::Png) => Some(ContentType::Png),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ContentType::Jpeg => "image/jpeg",
            ContentType::Png => "image/png",
        }
    }

    /// Extension used when the original filename has none
    pub fn extension(self) -> &'static str {
        match self {
            ContentType::Jpeg => ".jpeg",
            ContentType::Png => ".png",
        }
    }

    pub fn image_format(self) -> image::ImageFormat {
        match self {
            ContentType::Jpeg => image::ImageFormat::Jpeg,
            ContentType::Png => image::ImageFormat::Png,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}
