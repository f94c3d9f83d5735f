//! # Dimensions Module
//!
//! Target sizes and the parser that pulls them out of free-form chat text.
//!
//! ## Features
//!
//! - Recognizes `<width>x<height>` anywhere in a message (lowercase `x` only)
//! - Several sizes per message, kept in message order
//! - Bounded number of results per message

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use tracing::{debug, trace};

/// Maximum number of dimensions taken from a single message
pub const MAX_DIMENSIONS_PER_MESSAGE: usize = 10;

pub const DIMENSIONS_PATTERN: &str = r"([0-9]+)x([0-9]+)";

lazy_static! {
    static ref DIMENSIONS_REGEX: Regex =
        Regex::new(DIMENSIONS_PATTERN).expect("Dimensions pattern should be valid");
}

/// A target resize, width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Extract every `WxH` pair from `text`, in message order
///
/// Pairs with a zero side or a value that does not fit in `u32` are skipped
/// and do not count toward [`MAX_DIMENSIONS_PER_MESSAGE`]. An empty result
/// means the message held no usable dimensions.
///
/// # Examples
///
/// ```rust
/// use resize_bot::dimensions::{parse_dimensions, Dimensions};
///
/// let parsed = parse_dimensions("64x128 128x256");
/// assert_eq!(parsed, vec![Dimensions::new(64, 128), Dimensions::new(128, 256)]);
/// assert!(parse_dimensions("make it bigger").is_empty());
/// ```
pub fn parse_dimensions(text: &str) -> Vec<Dimensions> {
    parse_dimensions_capped(text, MAX_DIMENSIONS_PER_MESSAGE)
}

/// [`parse_dimensions`] with an explicit cap
pub fn parse_dimensions_capped(text: &str, cap: usize) -> Vec<Dimensions> {
    let dimensions: Vec<Dimensions> = DIMENSIONS_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            let width = caps[1].parse::<u32>().ok()?;
            let height = caps[2].parse::<u32>().ok()?;
            if width == 0 || height == 0 {
                trace!(matched = &caps[0], "Skipping dimensions with a zero side");
                return None;
            }
            Some(Dimensions::new(width, height))
        })
        .take(cap)
        .collect();

    debug!(
        text_length = text.len(),
        dimensions_found = dimensions.len(),
        "Dimension parsing completed"
    );
    dimensions
}
