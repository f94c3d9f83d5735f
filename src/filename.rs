//! Output filename composition for resized images.

use crate::content_type::ContentType;
use crate::dimensions::Dimensions;

/// Build `<base>__<width>x<height><ext>` for a resized image
///
/// The extension of `original_name` is reused when present. Otherwise it is
/// derived from `content_type`; an unrecognized content type yields a name
/// with no extension.
///
/// # Examples
///
/// ```rust
/// use resize_bot::dimensions::Dimensions;
/// use resize_bot::filename::resized_file_name;
///
/// let dims = Dimensions::new(64, 64);
/// assert_eq!(resized_file_name("file.jpeg", dims, "image/jpeg"), "file__64x64.jpeg");
/// assert_eq!(resized_file_name("file", dims, "image/png"), "file__64x64.png");
/// ```
pub fn resized_file_name(original_name: &str, dimensions: Dimensions, content_type: &str) -> String {
    let (base, extension) = match original_name.rfind('.') {
        Some(pos) => (&original_name[..pos], &original_name[pos..]),
        None => (original_name, ""),
    };

    let extension = if extension.is_empty() {
        ContentType::from_mime(content_type)
            .map(ContentType::extension)
            .unwrap_or_default()
    } else {
        extension
    };

    format!("{base}__{dimensions}{extension}")
}
