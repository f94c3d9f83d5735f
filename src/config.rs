//! # Configuration Module
//!
//! Process settings read from the environment (after loading `.env`),
//! plus the limits applied to resize requests.

use crate::errors::ConfigError;

pub const TOKEN_VAR: &str = "BOT_TOKEN";
pub const PORT_VAR: &str = "PORT";
pub const MAX_SIDE_VAR: &str = "MAX_IMAGE_SIDE";
pub const MAX_PIXELS_VAR: &str = "MAX_RESIZE_PIXELS";

pub const DEFAULT_HEALTH_PORT: u16 = 8080;
pub const DEFAULT_MAX_SIDE: u32 = 10_000;
pub const MAX_JPEG_QUALITY: u8 = 100;
/// Lanczos works on an f32 RGBA buffer, so 16M pixels is about 256 MiB
pub const DEFAULT_MAX_PIXELS: u64 = 16_000_000;
pub const DEFAULT_MAX_SOURCE_SIDE: u32 = 16_384;
pub const DEFAULT_MAX_DECODE_BYTES: u64 = 512 * 1024 * 1024;

/// Limits and encoder settings for resizing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeConfig {
    /// Largest width or height a user may request, in pixels
    pub max_side: u32,
    /// Largest working buffer of one resize, in pixels
    ///
    /// Checked against both the target area and the intermediate buffer of
    /// source width by target height.
    pub max_pixels: u64,
    /// Largest width or height of an image accepted for decoding
    pub max_source_side: u32,
    /// Allocation ceiling handed to the decoder, in bytes
    pub max_decode_bytes: u64,
    /// JPEG re-encoding quality (1-100)
    pub jpeg_quality: u8,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            max_side: DEFAULT_MAX_SIDE,
            max_pixels: DEFAULT_MAX_PIXELS,
            max_source_side: DEFAULT_MAX_SOURCE_SIDE,
            max_decode_bytes: DEFAULT_MAX_DECODE_BYTES,
            jpeg_quality: MAX_JPEG_QUALITY,
        }
    }
}

/// Everything the binary needs to start
#[derive(Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// Telegram bot token
    pub token: String,
    /// Port of the health check listener
    pub health_port: u16,
    pub resize: ResizeConfig,
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("health_port", &self.health_port)
            .field("resize", &self.resize)
            .finish()
    }
}

impl BotConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resize_bot::config::BotConfig;
    ///
    /// let config = BotConfig::from_lookup(|name| match name {
    ///     "BOT_TOKEN" => Some("123:abc".to_string()),
    ///     _ => None,
    /// })?;
    /// assert_eq!(config.health_port, 8080);
    /// # Ok::<(), resize_bot::errors::ConfigError>(())
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing(TOKEN_VAR))?;

        let health_port = parse_optional(&lookup, PORT_VAR)?.unwrap_or(DEFAULT_HEALTH_PORT);
        let max_side = parse_optional::<u32, _>(&lookup, MAX_SIDE_VAR)?.unwrap_or(DEFAULT_MAX_SIDE);
        if max_side == 0 {
            return Err(ConfigError::Invalid {
                name: MAX_SIDE_VAR,
                value: max_side.to_string(),
            });
        }
        let max_pixels = parse_optional::<u64, _>(&lookup, MAX_PIXELS_VAR)?.unwrap_or(DEFAULT_MAX_PIXELS);
        if max_pixels == 0 {
            return Err(ConfigError::Invalid {
                name: MAX_PIXELS_VAR,
                value: max_pixels.to_string(),
            });
        }

        Ok(Self {
            token,
            health_port,
            resize: ResizeConfig {
                max_side,
                max_pixels,
                ..ResizeConfig::default()
            },
        })
    }
}

fn parse_optional<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name).map(|value| value.trim().to_string()) {
        None => Ok(None),
        Some(value) if value.is_empty() => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}
