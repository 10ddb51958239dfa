//! Timestamp overlay configuration types

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, Utc};

use crate::ser_pipeline::common::error::{Result, SerError};

/// Where the timestamp text is anchored in the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    TopLeft,
    TopMiddle,
    TopRight,
    BottomLeft,
    BottomMiddle,
    BottomRight,
}

impl TextAnchor {
    pub const ALL: [TextAnchor; 6] = [
        TextAnchor::TopLeft,
        TextAnchor::TopMiddle,
        TextAnchor::TopRight,
        TextAnchor::BottomLeft,
        TextAnchor::BottomMiddle,
        TextAnchor::BottomRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TextAnchor::TopLeft => "top-left",
            TextAnchor::TopMiddle => "top-middle",
            TextAnchor::TopRight => "top-right",
            TextAnchor::BottomLeft => "bottom-left",
            TextAnchor::BottomMiddle => "bottom-middle",
            TextAnchor::BottomRight => "bottom-right",
        }
    }

    /// Anchor point in pixel coordinates. Middle anchors ignore the x margin.
    pub fn point(self, width: usize, height: usize, margin_x: i32, margin_y: i32) -> (f32, f32) {
        let (w, h) = (width as f32, height as f32);
        let (mx, my) = (margin_x as f32, margin_y as f32);
        match self {
            TextAnchor::TopLeft => (mx, my),
            TextAnchor::TopMiddle => (w / 2.0, my),
            TextAnchor::TopRight => (w - mx, my),
            TextAnchor::BottomLeft => (mx, h - my),
            TextAnchor::BottomMiddle => (w / 2.0, h - my),
            TextAnchor::BottomRight => (w - mx, h - my),
        }
    }
}

impl FromStr for TextAnchor {
    type Err = SerError;

    fn from_str(s: &str) -> Result<Self> {
        TextAnchor::ALL
            .into_iter()
            .find(|anchor| anchor.name() == s)
            .ok_or_else(|| {
                let names: Vec<String> = TextAnchor::ALL
                    .iter()
                    .map(|anchor| format!("'{}'", anchor.name()))
                    .collect();
                SerError::InvalidConfig(format!(
                    "unknown text position '{s}', expected one of {}",
                    names.join(", ")
                ))
            })
    }
}

impl fmt::Display for TextAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Anchor plus independent x/y margins in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextPlacement {
    pub anchor: TextAnchor,
    pub margin_x: i32,
    pub margin_y: i32,
}

impl TextPlacement {
    pub fn point(&self, width: usize, height: usize) -> (f32, f32) {
        self.anchor.point(width, height, self.margin_x, self.margin_y)
    }
}

/// 8-bit RGBA text color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for OverlayColor {
    /// Semi-transparent orange, `#FF8800C0`.
    fn default() -> Self {
        Self { r: 0xFF, g: 0x88, b: 0x00, a: 0xC0 }
    }
}

impl FromStr for OverlayColor {
    type Err = SerError;

    /// Parses `#RRGGBB` or `#RRGGBBAA`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || SerError::InvalidConfig(format!("invalid color '{s}', expected #RRGGBB or #RRGGBBAA"));
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: if hex.len() == 8 { channel(6)? } else { u8::MAX },
        })
    }
}

/// Time zone the timestamp text is shown in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampZone {
    #[default]
    Utc,
    Local,
}

impl TimestampZone {
    /// Formats an instant as `YYYY-MM-DD HH:MM:SS[.ffffff]+HH:MM`; the
    /// fraction is left out when it is zero.
    pub fn format(self, instant: &DateTime<Utc>) -> String {
        match self {
            TimestampZone::Utc => format_instant(instant),
            TimestampZone::Local => format_instant(&instant.with_timezone(&Local)),
        }
    }
}

fn format_instant<Tz: chrono::TimeZone>(instant: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    if instant.timestamp_subsec_micros() == 0 {
        instant.format("%Y-%m-%d %H:%M:%S%:z").to_string()
    } else {
        instant.format("%Y-%m-%d %H:%M:%S%.6f%:z").to_string()
    }
}

/// Everything the renderer needs besides the instant itself
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub placement: TextPlacement,
    /// Font size in pixels
    pub font_size: u32,
    pub color: OverlayColor,
    pub zone: TimestampZone,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            placement: TextPlacement::default(),
            font_size: 24,
            color: OverlayColor::default(),
            zone: TimestampZone::Utc,
        }
    }
}

/// RGBA8 pixels produced by the renderer, transparent where nothing is drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayBuffer {
    pub width: usize,
    pub height: usize,
    /// Interleaved [R, G, B, A, ...]
    pub data: Vec<u8>,
}

impl OverlayBuffer {
    pub fn transparent(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width * height * 4],
        }
    }

    pub fn put_pixel(&mut self, x: usize, y: usize, color: OverlayColor) {
        let i = (y * self.width + x) * 4;
        self.data[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
    }

    pub(crate) fn check_size(&self, width: usize, height: usize) -> Result<()> {
        if self.width != width || self.height != height || self.data.len() != width * height * 4 {
            return Err(SerError::InvalidDimensions(self.width, self.height));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ser_pipeline::container::ticks_to_datetime;
    use crate::ser_pipeline::test_support::BASE_TICKS;

    #[test]
    fn test_anchor_names_round_trip() {
        for anchor in TextAnchor::ALL {
            assert_eq!(anchor.name().parse::<TextAnchor>().unwrap(), anchor);
        }
        let err = "center".parse::<TextAnchor>().unwrap_err();
        assert!(matches!(err, SerError::InvalidConfig(ref msg) if msg.contains("'bottom-right'")));
    }

    #[test]
    fn test_anchor_points() {
        let (w, h) = (640, 480);
        assert_eq!(TextAnchor::TopLeft.point(w, h, 5, 7), (5.0, 7.0));
        assert_eq!(TextAnchor::TopMiddle.point(w, h, 5, 7), (320.0, 7.0));
        assert_eq!(TextAnchor::TopRight.point(w, h, 5, 7), (635.0, 7.0));
        assert_eq!(TextAnchor::BottomLeft.point(w, h, 5, 7), (5.0, 473.0));
        assert_eq!(TextAnchor::BottomMiddle.point(w, h, 5, 7), (320.0, 473.0));
        assert_eq!(TextAnchor::BottomRight.point(w, h, 5, 7), (635.0, 473.0));
    }

    #[test]
    fn test_color_parsing() {
        assert_eq!("#FF8800C0".parse::<OverlayColor>().unwrap(), OverlayColor::default());
        assert_eq!(
            "#102030".parse::<OverlayColor>().unwrap(),
            OverlayColor { r: 0x10, g: 0x20, b: 0x30, a: 0xFF }
        );
        for bad in ["FF8800", "#FF88", "#GG8800", "#FF8800C0FF"] {
            assert!(bad.parse::<OverlayColor>().is_err(), "{bad} accepted");
        }
    }

    #[test]
    fn test_utc_formatting() {
        let instant = ticks_to_datetime(BASE_TICKS).unwrap();
        assert_eq!(TimestampZone::Utc.format(&instant), "2024-01-01 00:00:00+00:00");

        let fractional = ticks_to_datetime(BASE_TICKS + 1_234_560).unwrap();
        assert_eq!(TimestampZone::Utc.format(&fractional), "2024-01-01 00:00:00.123456+00:00");
    }

    #[test]
    fn test_transparent_buffer() {
        let mut buffer = OverlayBuffer::transparent(3, 2);
        assert_eq!(buffer.data.len(), 24);
        assert!(buffer.data.iter().all(|&v| v == 0));
        buffer.put_pixel(2, 1, OverlayColor::default());
        assert_eq!(&buffer.data[20..24], &[0xFF, 0x88, 0x00, 0xC0]);
        assert!(buffer.check_size(3, 2).is_ok());
        assert!(buffer.check_size(2, 3).is_err());
    }
}
