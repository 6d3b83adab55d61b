//! Color values exchanged between the RGB and CMYK panels.

use palette::Srgb;

use crate::Error;

/// An sRGB color with channels in `0..=255`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Return a color decoded from a hexadecimal string
    /// containing a non-linear sRGB color.
    pub fn try_from_hex(hex: &str) -> Result<Self, Error> {
        let srgb: Srgb<u8> = hex.parse().map_err(|_| Error::InvalidColor)?;
        Ok(Self {
            r: srgb.red,
            g: srgb.green,
            b: srgb.blue,
        })
    }

    /// Returns a hexadecimal string containing the
    /// non-linear sRGB encoding of this color.
    pub fn to_hex(self) -> String {
        let srgb = Srgb::new(self.r, self.g, self.b);
        format!("#{srgb:x}")
    }

    /// Returns an `[r, g, b]` array of channels
    /// with a `0.0` to `1.0` range.
    pub fn to_normalized(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }

    /// Returns a color from an `[r, g, b]` array of channels
    /// with a `0.0` to `1.0` range, clamped to the displayable
    /// range.
    pub fn from_normalized(srgb: [f32; 3]) -> Self {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            r: channel(srgb[0]),
            g: channel(srgb[1]),
            b: channel(srgb[2]),
        }
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex().to_uppercase())
    }
}

/// An ink coverage, each channel a percentage in `0.0..=100.0`.
///
/// Channels are clamped into range on construction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Cmyk {
    pub c: f32,
    pub m: f32,
    pub y: f32,
    pub k: f32,
}

impl Cmyk {
    pub fn new(c: f32, m: f32, y: f32, k: f32) -> Self {
        Self {
            c: Self::clamp(c),
            m: Self::clamp(m),
            y: Self::clamp(y),
            k: Self::clamp(k),
        }
    }

    fn clamp(v: f32) -> f32 {
        v.clamp(0.0, 100.0)
    }

    /// Returns a coverage from a `[c, m, y, k]` array of channels
    /// with a `0.0` to `1.0` range.
    pub fn from_normalized(cmyk: [f32; 4]) -> Self {
        Self::new(
            cmyk[0] * 100.0,
            cmyk[1] * 100.0,
            cmyk[2] * 100.0,
            cmyk[3] * 100.0,
        )
    }

    /// Returns the channels rescaled to `0..=255`, truncated to
    /// whole values the way an 8-bit pixel encodes them.
    pub fn to_bytes(self) -> [u8; 4] {
        let channel = |v: f32| ((v / 100.0) * 255.0) as u8;
        [
            channel(self.c),
            channel(self.m),
            channel(self.y),
            channel(self.k),
        ]
    }
}

impl std::fmt::Display for Cmyk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.1}%, {:.1}%, {:.1}%, {:.1}%",
            self.c, self.m, self.y, self.k
        )
    }
}
