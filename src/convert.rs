//! Converts colors between sRGB and press CMYK.
//!
//! The ICC path pushes a single pixel through a transform built
//! fresh for every conversion, bound to the relative-colorimetric
//! rendering intent. When no press profile resolves, the classic
//! device-ink formulas stand in so a conversion never fails.

use moxcms::{CmsError, ColorProfile, Layout, RenderingIntent, TransformOptions};

use crate::color::{Cmyk, Rgb};
use crate::profile::{PressProfile, ProfileSource};

/// Direction of a single press transform.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    RgbToCmyk,
    CmykToRgb,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::RgbToCmyk => write!(f, "RGB -> CMYK"),
            Direction::CmykToRgb => write!(f, "CMYK -> RGB"),
        }
    }
}

/// A thing that converts colors between the RGB and CMYK panels.
pub trait ColorTransformer {
    /// Converts an sRGB color to press ink coverage.
    fn rgb_to_cmyk(&self, rgb: Rgb) -> Cmyk;

    /// Converts press ink coverage to the sRGB color it prints as.
    fn cmyk_to_rgb(&self, cmyk: Cmyk) -> Rgb;
}

/// Converts colors through the resolved press profile.
///
/// Stateless between calls: the profile is re-resolved and the
/// transform rebuilt on every conversion, so a profile dropped
/// into a search directory takes effect immediately.
#[derive(Clone, Debug, Default)]
pub struct PressTransformer {
    source: ProfileSource,
}

impl PressTransformer {
    pub fn new(source: ProfileSource) -> Self {
        Self { source }
    }
}

impl ColorTransformer for PressTransformer {
    fn rgb_to_cmyk(&self, rgb: Rgb) -> Cmyk {
        match PressProfile::resolve(&self.source) {
            PressProfile::Icc(profile) => match icc_rgb_to_cmyk(&profile, rgb) {
                Ok(cmyk) => cmyk,
                Err(error) => {
                    tracing::warn!(
                        "{} press transform failed: {error:?}; using the device fallback",
                        Direction::RgbToCmyk
                    );
                    device_rgb_to_cmyk(rgb)
                }
            },
            PressProfile::Device => device_rgb_to_cmyk(rgb),
        }
    }

    fn cmyk_to_rgb(&self, cmyk: Cmyk) -> Rgb {
        match PressProfile::resolve(&self.source) {
            PressProfile::Icc(profile) => match icc_cmyk_to_rgb(&profile, cmyk) {
                Ok(rgb) => rgb,
                Err(error) => {
                    tracing::warn!(
                        "{} press transform failed: {error:?}; using the device fallback",
                        Direction::CmykToRgb
                    );
                    device_cmyk_to_rgb(cmyk)
                }
            },
            PressProfile::Device => device_cmyk_to_rgb(cmyk),
        }
    }
}

/// Converts an RGB triple to CMYK percentages, resolving the
/// press profile through the default search.
pub fn rgb_to_cmyk(r: u8, g: u8, b: u8) -> Cmyk {
    PressTransformer::default().rgb_to_cmyk(Rgb::new(r, g, b))
}

/// Converts CMYK percentages to an RGB triple, resolving the
/// press profile through the default search.
pub fn cmyk_to_rgb(c: f32, m: f32, y: f32, k: f32) -> Rgb {
    PressTransformer::default().cmyk_to_rgb(Cmyk::new(c, m, y, k))
}

/// Returns a one-line conversion report for `rgb`.
pub fn report(transformer: &dyn ColorTransformer, rgb: Rgb) -> String {
    let cmyk = transformer.rgb_to_cmyk(rgb);
    format!(
        "RGB ({}, {}, {}) -> CMYK ({cmyk})",
        rgb.r, rgb.g, rgb.b
    )
}

/// Transform options shared by both directions.
fn press_options() -> TransformOptions {
    TransformOptions {
        rendering_intent: RenderingIntent::RelativeColorimetric,
        ..TransformOptions::default()
    }
}

/// Pushes one RGB pixel through an sRGB-to-press transform.
fn icc_rgb_to_cmyk(press: &ColorProfile, rgb: Rgb) -> Result<Cmyk, CmsError> {
    let source = ColorProfile::new_srgb();
    let transform =
        source.create_transform_f32(Layout::Rgb, press, Layout::Rgba, press_options())?;

    let srgb = rgb.to_normalized();
    let mut cmyk = [0f32; 4];
    transform.transform(&srgb, &mut cmyk)?;

    Ok(Cmyk::from_normalized(cmyk))
}

/// Pushes one CMYK pixel through a press-to-sRGB transform.
fn icc_cmyk_to_rgb(press: &ColorProfile, cmyk: Cmyk) -> Result<Rgb, CmsError> {
    let target = ColorProfile::new_srgb();
    let transform =
        press.create_transform_f32(Layout::Rgba, &target, Layout::Rgb, press_options())?;

    // Coverage quantizes to 8-bit channel values first, matching
    // how the panels exchanged pixels historically.
    let input = cmyk.to_bytes().map(|v| f32::from(v) / 255.0);
    let mut srgb = [0f32; 3];
    transform.transform(&input, &mut srgb)?;

    Ok(Rgb::from_normalized(srgb))
}

/// Classic device-ink separation, used when no profile loads.
pub(crate) fn device_rgb_to_cmyk(rgb: Rgb) -> Cmyk {
    let [r, g, b] = rgb.to_normalized();

    let k = 1.0 - r.max(g.max(b));
    if k >= 1.0 {
        return Cmyk::new(0.0, 0.0, 0.0, 100.0);
    }

    let c = (1.0 - r - k) / (1.0 - k);
    let m = (1.0 - g - k) / (1.0 - k);
    let y = (1.0 - b - k) / (1.0 - k);

    Cmyk::from_normalized([c, m, y, k])
}

/// Inverse of [device_rgb_to_cmyk].
pub(crate) fn device_cmyk_to_rgb(cmyk: Cmyk) -> Rgb {
    let [c, m, y, k] = cmyk.to_bytes().map(|v| f32::from(v) / 255.0);

    Rgb::from_normalized([
        (1.0 - c) * (1.0 - k),
        (1.0 - m) * (1.0 - k),
        (1.0 - y) * (1.0 - k),
    ])
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    /// A transformer pinned to the device fallback.
    fn device_transformer() -> PressTransformer {
        PressTransformer::new(ProfileSource {
            path: Some("/nonexistent/press-profile.icc".into()),
            search: Vec::new(),
        })
    }

    #[test_log::test]
    fn conversion_succeeds_without_a_profile() {
        let transformer = device_transformer();
        let cmyk = transformer.rgb_to_cmyk(Rgb::new(40, 120, 200));

        for channel in [cmyk.c, cmyk.m, cmyk.y, cmyk.k] {
            assert!((0.0..=100.0).contains(&channel));
        }
    }

    #[test_log::test]
    fn boundary_colors_convert_in_range() {
        let transformer = device_transformer();

        for rgb in [Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)] {
            let cmyk = transformer.rgb_to_cmyk(rgb);
            for channel in [cmyk.c, cmyk.m, cmyk.y, cmyk.k] {
                assert!((0.0..=100.0).contains(&channel));
            }
        }

        assert_relative_eq!(transformer.rgb_to_cmyk(Rgb::new(0, 0, 0)).k, 100.0);
        let white = transformer.rgb_to_cmyk(Rgb::new(255, 255, 255));
        assert_relative_eq!(white.c + white.m + white.y + white.k, 0.0);
    }

    #[test_log::test]
    fn pure_red_separates_as_magenta_and_yellow() {
        let cmyk = device_transformer().rgb_to_cmyk(Rgb::new(255, 0, 0));

        // Profile-dependent in the ICC path, so the assertions are
        // ranges rather than literals.
        assert!(cmyk.c < 20.0);
        assert!(cmyk.m > 80.0);
        assert!(cmyk.k < 20.0);
    }

    #[test_log::test]
    fn device_round_trip_stays_close() {
        let transformer = device_transformer();

        for rgb in [
            Rgb::new(255, 0, 0),
            Rgb::new(16, 32, 64),
            Rgb::new(200, 200, 200),
            Rgb::new(1, 254, 128),
        ] {
            let back = transformer.cmyk_to_rgb(transformer.rgb_to_cmyk(rgb));

            // Quantizing coverage to whole 8-bit steps costs a
            // few counts per channel on the way back.
            assert!(i16::from(back.r).abs_diff(i16::from(rgb.r)) <= 3, "{rgb:?} -> {back:?}");
            assert!(i16::from(back.g).abs_diff(i16::from(rgb.g)) <= 3, "{rgb:?} -> {back:?}");
            assert!(i16::from(back.b).abs_diff(i16::from(rgb.b)) <= 3, "{rgb:?} -> {back:?}");
        }
    }

    #[test]
    fn device_separation_is_exact_for_primaries() {
        assert_eq!(
            device_rgb_to_cmyk(Rgb::new(255, 0, 0)),
            Cmyk::new(0.0, 100.0, 100.0, 0.0)
        );
        assert_eq!(
            device_rgb_to_cmyk(Rgb::new(0, 0, 0)),
            Cmyk::new(0.0, 0.0, 0.0, 100.0)
        );
        assert_eq!(
            device_cmyk_to_rgb(Cmyk::new(0.0, 100.0, 100.0, 0.0)),
            Rgb::new(255, 0, 0)
        );
    }

    #[test_log::test]
    fn reports_in_percentages() {
        let report = report(&device_transformer(), Rgb::new(255, 0, 0));
        assert_eq!(report, "RGB (255, 0, 0) -> CMYK (0.0%, 100.0%, 100.0%, 0.0%)");
    }

    #[test_log::test]
    fn repeated_conversions_are_identical() {
        let transformer = device_transformer();
        let rgb = Rgb::new(73, 90, 110);
        assert_eq!(transformer.rgb_to_cmyk(rgb), transformer.rgb_to_cmyk(rgb));
    }
}
