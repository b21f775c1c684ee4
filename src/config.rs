//! Configuration types for InkML-to-image conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Rendering knobs live in the nested
//! [`RenderStyle`] so the rasteriser can be driven on its own without a full
//! dataset configuration.

use crate::error::Ink2ImgError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Splits processed when none are configured, in this order.
pub const DEFAULT_SPLITS: [&str; 3] = ["train", "test", "valid"];

/// Annotation kinds consulted for the document label, highest priority first.
pub const DEFAULT_LABEL_KINDS: [&str; 2] = ["normalizedLabel", "label"];

/// Configuration for a dataset conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use ink2img::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .dpi(150)
///     .splits(["train", "valid"])
///     .build()
///     .unwrap();
/// assert_eq!(config.style.dpi, 150);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Split sub-directories to process, in order. Default: train, test, valid.
    pub splits: Vec<String>,

    /// Name of the per-split image directory. Default: `images`.
    pub images_dir: String,

    /// Name of the per-split manifest file. Default: `labels.json`.
    pub manifest_name: String,

    /// Extension (without dot, case-insensitive) of input documents. Default: `inkml`.
    pub input_extension: String,

    /// Annotation kinds tried in order when extracting a label.
    pub label_kinds: Vec<String>,

    /// Rasteriser styling and geometry.
    pub style: RenderStyle,

    /// Optional progress callback for per-document events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            splits: DEFAULT_SPLITS.iter().map(|s| s.to_string()).collect(),
            images_dir: "images".to_string(),
            manifest_name: "labels.json".to_string(),
            input_extension: "inkml".to_string(),
            label_kinds: DEFAULT_LABEL_KINDS.iter().map(|s| s.to_string()).collect(),
            style: RenderStyle::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("splits", &self.splits)
            .field("images_dir", &self.images_dir)
            .field("manifest_name", &self.manifest_name)
            .field("input_extension", &self.input_extension)
            .field("label_kinds", &self.label_kinds)
            .field("style", &self.style)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn splits<I, S>(mut self, splits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.splits = splits.into_iter().map(Into::into).collect();
        self
    }

    pub fn images_dir(mut self, name: impl Into<String>) -> Self {
        self.config.images_dir = name.into();
        self
    }

    pub fn manifest_name(mut self, name: impl Into<String>) -> Self {
        self.config.manifest_name = name.into();
        self
    }

    pub fn input_extension(mut self, ext: impl Into<String>) -> Self {
        self.config.input_extension = ext.into().trim_start_matches('.').to_string();
        self
    }

    pub fn label_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.label_kinds = kinds.into_iter().map(Into::into).collect();
        self
    }

    pub fn style(mut self, style: RenderStyle) -> Self {
        self.config.style = style;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.style.dpi = dpi;
        self
    }

    pub fn color(mut self, color: Rgba8) -> Self {
        self.config.style.color = color;
        self
    }

    pub fn background(mut self, background: Option<Rgba8>) -> Self {
        self.config.style.background = background;
        self
    }

    pub fn line_width_pt(mut self, width: f64) -> Self {
        self.config.style.line_width_pt = width;
        self
    }

    pub fn pad_inches(mut self, pad: f64) -> Self {
        self.config.style.pad_inches = pad;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Ink2ImgError> {
        let c = &self.config;
        if c.splits.is_empty() || c.splits.iter().any(|s| s.trim().is_empty()) {
            return Err(Ink2ImgError::InvalidConfig(
                "At least one non-empty split name is required".into(),
            ));
        }
        if c.label_kinds.is_empty() {
            return Err(Ink2ImgError::InvalidConfig(
                "At least one label kind is required".into(),
            ));
        }
        if c.images_dir.trim().is_empty() || c.manifest_name.trim().is_empty() {
            return Err(Ink2ImgError::InvalidConfig(
                "Image directory and manifest names must not be empty".into(),
            ));
        }
        c.style.validate()?;
        Ok(self.config)
    }
}

// ── Rendering style ──────────────────────────────────────────────────────

/// Fixed visual styling and geometry used by the rasteriser.
///
/// Sizes are expressed in print units (points, inches) and converted to
/// pixels through `dpi`, so changing the density scales the whole image
/// uniformly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    /// Raster density in dots per inch. Range: 10–1200. Default: 100.
    pub dpi: u32,

    /// Stroke colour. Default: `#284054`.
    pub color: Rgba8,

    /// Canvas fill; `None` leaves the canvas transparent. Default: white.
    pub background: Option<Rgba8>,

    /// Stroke width in points (1/72 inch). Default: 2.0.
    pub line_width_pt: f64,

    /// Uniform padding around the drawn content, in inches. Default: 0.1.
    pub pad_inches: f64,

    /// Width of the box the ink is scaled to fit, in inches. Default: 4.96.
    pub content_width_in: f64,

    /// Height of the box the ink is scaled to fit, in inches. Default: 3.70.
    pub content_height_in: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            dpi: 100,
            color: Rgba8::rgb(0x28, 0x40, 0x54),
            background: Some(Rgba8::WHITE),
            line_width_pt: 2.0,
            pad_inches: 0.1,
            content_width_in: 4.96,
            content_height_in: 3.70,
        }
    }
}

impl RenderStyle {
    /// Stroke width converted to pixels.
    pub fn line_width_px(&self) -> f64 {
        self.line_width_pt * f64::from(self.dpi) / 72.0
    }

    /// Padding converted to pixels.
    pub fn pad_px(&self) -> f64 {
        self.pad_inches * f64::from(self.dpi)
    }

    /// Check that every dimension is usable.
    pub fn validate(&self) -> Result<(), Ink2ImgError> {
        if !(10..=1200).contains(&self.dpi) {
            return Err(Ink2ImgError::InvalidConfig(format!(
                "DPI must be 10–1200, got {}",
                self.dpi
            )));
        }
        if !(self.line_width_pt.is_finite() && self.line_width_pt > 0.0) {
            return Err(Ink2ImgError::InvalidConfig(format!(
                "Line width must be > 0, got {}",
                self.line_width_pt
            )));
        }
        if !(self.pad_inches.is_finite() && self.pad_inches >= 0.0) {
            return Err(Ink2ImgError::InvalidConfig(format!(
                "Padding must be ≥ 0, got {}",
                self.pad_inches
            )));
        }
        let box_ok = |v: f64| v.is_finite() && v > 0.0;
        if !box_ok(self.content_width_in) || !box_ok(self.content_height_in) {
            return Err(Ink2ImgError::InvalidConfig(
                "Content box dimensions must be > 0".into(),
            ));
        }
        Ok(())
    }
}

// ── Colour ───────────────────────────────────────────────────────────────

/// An 8-bit RGBA colour, parsed from `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Rgba8 = Rgba8::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Rgba8 = Rgba8::rgb(0, 0, 0);

    /// Opaque colour from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }
}

impl FromStr for Rgba8 {
    type Err = Ink2ImgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        let invalid = || Ink2ImgError::InvalidConfig(format!("Invalid colour '{s}'"));
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgba8 {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { 0xff },
        })
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds() {
        let config = ConversionConfig::builder().build().unwrap();
        assert_eq!(config.splits, vec!["train", "test", "valid"]);
        assert_eq!(config.label_kinds, vec!["normalizedLabel", "label"]);
        assert_eq!(config.manifest_name, "labels.json");
        assert_eq!(config.style.dpi, 100);
    }

    #[test]
    fn rejects_bad_dpi() {
        let err = ConversionConfig::builder().dpi(0).build().unwrap_err();
        assert!(err.to_string().contains("DPI"));
    }

    #[test]
    fn rejects_empty_splits() {
        let empty: [&str; 0] = [];
        assert!(ConversionConfig::builder().splits(empty).build().is_err());
        assert!(ConversionConfig::builder().splits([" "]).build().is_err());
    }

    #[test]
    fn rejects_non_positive_line_width() {
        assert!(ConversionConfig::builder()
            .line_width_pt(0.0)
            .build()
            .is_err());
        assert!(ConversionConfig::builder()
            .pad_inches(-0.5)
            .build()
            .is_err());
    }

    #[test]
    fn input_extension_drops_leading_dot() {
        let config = ConversionConfig::builder()
            .input_extension(".xml")
            .build()
            .unwrap();
        assert_eq!(config.input_extension, "xml");
    }

    #[test]
    fn pixel_conversions() {
        let style = RenderStyle::default();
        assert!((style.pad_px() - 10.0).abs() < 1e-9);
        assert!((style.line_width_px() - 200.0 / 72.0).abs() < 1e-9);
    }

    #[test]
    fn parse_colours() {
        let c: Rgba8 = "#284054".parse().unwrap();
        assert_eq!(c, Rgba8::rgb(0x28, 0x40, 0x54));
        let c: Rgba8 = "ff000080".parse().unwrap();
        assert_eq!(c.a, 0x80);
        assert!("#12345".parse::<Rgba8>().is_err());
        assert!("#gg0000".parse::<Rgba8>().is_err());
        assert!("#ééé".parse::<Rgba8>().is_err());
    }

    #[test]
    fn colour_display_round_trips() {
        assert_eq!(RenderStyle::default().color.to_string(), "#284054");
        let c = Rgba8 { a: 0x10, ..Rgba8::BLACK };
        assert_eq!(c.to_string(), "#00000010");
    }
}
