//! Controller state for the two-panel color editor.
//!
//! Keeps the RGB and CMYK panels consistent: the panel being
//! edited drives, the other panel is a derived view. Holds no
//! terminal state; the binary renders this struct and feeds
//! input events back into it.

use crate::color::{Cmyk, Rgb};
use crate::convert::ColorTransformer;

/// A channel in the RGB panel.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RgbChannel {
    Red,
    Green,
    Blue,
}

impl RgbChannel {
    pub const ALL: [RgbChannel; 3] = [RgbChannel::Red, RgbChannel::Green, RgbChannel::Blue];

    pub fn label(self) -> &'static str {
        match self {
            RgbChannel::Red => "R",
            RgbChannel::Green => "G",
            RgbChannel::Blue => "B",
        }
    }
}

/// A channel in the CMYK panel.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CmykChannel {
    Cyan,
    Magenta,
    Yellow,
    Key,
}

impl CmykChannel {
    pub const ALL: [CmykChannel; 4] = [
        CmykChannel::Cyan,
        CmykChannel::Magenta,
        CmykChannel::Yellow,
        CmykChannel::Key,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CmykChannel::Cyan => "C",
            CmykChannel::Magenta => "M",
            CmykChannel::Yellow => "Y",
            CmykChannel::Key => "K",
        }
    }
}

/// State behind the RGB and CMYK panels.
#[derive(Clone, Debug)]
pub struct Editor {
    /// RGB slider values.
    rgb: [u8; 3],
    /// Text-field contents paired with each RGB slider.
    rgb_text: [String; 3],
    /// CMYK slider values, in whole percent.
    cmyk: [u8; 4],
    /// Swatch behind the RGB panel.
    rgb_preview: Rgb,
    /// Swatch behind the CMYK panel.
    cmyk_preview: Rgb,
    /// Set while this controller writes the CMYK sliders itself,
    /// so those writes don't re-enter the CMYK handler.
    updating_cmyk: bool,
    /// Set once the CMYK panel has been seeded from RGB. After
    /// that, RGB edits leave the CMYK sliders alone and only the
    /// optimize action overwrites them.
    cmyk_synced: bool,
}

impl Editor {
    /// Creates the editor at black, seeding the CMYK panel from
    /// the initial RGB values.
    pub fn new(transformer: &dyn ColorTransformer) -> Self {
        let mut editor = Self {
            rgb: [0; 3],
            rgb_text: ["0".into(), "0".into(), "0".into()],
            cmyk: [0; 4],
            rgb_preview: Rgb::default(),
            cmyk_preview: Rgb::default(),
            updating_cmyk: false,
            cmyk_synced: false,
        };
        editor.rgb_changed(transformer);
        editor
    }

    pub fn rgb(&self) -> Rgb {
        Rgb::new(self.rgb[0], self.rgb[1], self.rgb[2])
    }

    pub fn rgb_slider(&self, channel: RgbChannel) -> u8 {
        self.rgb[channel as usize]
    }

    pub fn rgb_text(&self, channel: RgbChannel) -> &str {
        &self.rgb_text[channel as usize]
    }

    pub fn cmyk(&self) -> Cmyk {
        Cmyk::new(
            f32::from(self.cmyk[0]),
            f32::from(self.cmyk[1]),
            f32::from(self.cmyk[2]),
            f32::from(self.cmyk[3]),
        )
    }

    pub fn cmyk_slider(&self, channel: CmykChannel) -> u8 {
        self.cmyk[channel as usize]
    }

    pub fn rgb_preview(&self) -> Rgb {
        self.rgb_preview
    }

    pub fn cmyk_preview(&self) -> Rgb {
        self.cmyk_preview
    }

    /// Moves an RGB slider, refreshing its paired text field.
    pub fn set_rgb_slider(
        &mut self,
        transformer: &dyn ColorTransformer,
        channel: RgbChannel,
        value: u8,
    ) {
        self.rgb[channel as usize] = value;
        self.rgb_text[channel as usize] = value.to_string();
        self.rgb_changed(transformer);
    }

    /// Replaces an RGB text field, moving its paired slider.
    ///
    /// Text that doesn't parse as an integer in `0..=255` is
    /// silently ignored; the field and slider keep their values.
    /// An emptied field reads as 0.
    pub fn edit_rgb_field(
        &mut self,
        transformer: &dyn ColorTransformer,
        channel: RgbChannel,
        text: &str,
    ) {
        let value = if text.is_empty() {
            0
        } else {
            let Ok(value) = text.parse::<u8>() else {
                return;
            };
            value
        };

        self.rgb_text[channel as usize] = text.to_string();
        self.rgb[channel as usize] = value;
        self.rgb_changed(transformer);
    }

    /// Moves a CMYK slider.
    pub fn set_cmyk_slider(
        &mut self,
        transformer: &dyn ColorTransformer,
        channel: CmykChannel,
        value: u8,
    ) {
        self.cmyk[channel as usize] = value.min(100);
        self.cmyk_changed(transformer);
    }

    /// Explicitly recomputes the CMYK panel from the current RGB
    /// sliders, then refreshes the CMYK swatch.
    pub fn optimize_cmyk(&mut self, transformer: &dyn ColorTransformer) {
        let cmyk = transformer.rgb_to_cmyk(self.rgb());

        self.updating_cmyk = true;
        self.write_cmyk_sliders(transformer, cmyk);
        self.updating_cmyk = false;

        self.cmyk_changed(transformer);
    }

    /// RGB-side cascade: repaint the RGB swatch, and seed the
    /// CMYK panel the first time through.
    fn rgb_changed(&mut self, transformer: &dyn ColorTransformer) {
        self.rgb_preview = self.rgb();

        if self.cmyk_synced {
            return;
        }

        self.updating_cmyk = true;
        let cmyk = transformer.rgb_to_cmyk(self.rgb());
        self.write_cmyk_sliders(transformer, cmyk);
        // Swatch from the full-precision coverage, not the
        // quantized sliders.
        self.cmyk_preview = transformer.cmyk_to_rgb(cmyk);
        self.updating_cmyk = false;

        self.cmyk_synced = true;
    }

    /// Quantizes `cmyk` onto the sliders. Each write runs the
    /// CMYK handler, which the guard suppresses.
    fn write_cmyk_sliders(&mut self, transformer: &dyn ColorTransformer, cmyk: Cmyk) {
        let values = [cmyk.c, cmyk.m, cmyk.y, cmyk.k];
        for (slot, value) in self.cmyk.iter_mut().zip(values) {
            *slot = value as u8;
        }
        self.cmyk_changed(transformer);
    }

    /// CMYK-side cascade: repaint the CMYK swatch from the
    /// sliders. Never drives the RGB panel, and does nothing
    /// while the controller itself is writing the sliders.
    fn cmyk_changed(&mut self, transformer: &dyn ColorTransformer) {
        if self.updating_cmyk {
            return;
        }

        self.cmyk_preview = transformer.cmyk_to_rgb(self.cmyk());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{device_cmyk_to_rgb, device_rgb_to_cmyk};

    /// Deterministic transformer for controller tests.
    struct DeviceInk;

    impl ColorTransformer for DeviceInk {
        fn rgb_to_cmyk(&self, rgb: Rgb) -> Cmyk {
            device_rgb_to_cmyk(rgb)
        }

        fn cmyk_to_rgb(&self, cmyk: Cmyk) -> Rgb {
            device_cmyk_to_rgb(cmyk)
        }
    }

    #[test]
    fn seeds_cmyk_on_creation() {
        let editor = Editor::new(&DeviceInk);

        // Black seeds as pure key.
        assert_eq!(editor.cmyk_slider(CmykChannel::Key), 100);
        assert_eq!(editor.cmyk_slider(CmykChannel::Cyan), 0);
        assert_eq!(editor.rgb_preview(), Rgb::new(0, 0, 0));
    }

    #[test]
    fn rgb_slider_updates_preview_and_text() {
        let mut editor = Editor::new(&DeviceInk);
        editor.set_rgb_slider(&DeviceInk, RgbChannel::Green, 200);

        assert_eq!(editor.rgb_text(RgbChannel::Green), "200");
        assert_eq!(editor.rgb_preview(), Rgb::new(0, 200, 0));
    }

    #[test]
    fn rgb_edits_leave_cmyk_alone_after_first_sync() {
        let mut editor = Editor::new(&DeviceInk);
        let seeded = editor.cmyk();

        editor.set_rgb_slider(&DeviceInk, RgbChannel::Red, 255);

        // The RGB swatch follows, the CMYK panel doesn't.
        assert_eq!(editor.rgb_preview(), Rgb::new(255, 0, 0));
        assert_eq!(editor.cmyk(), seeded);
    }

    #[test]
    fn field_edit_moves_slider() {
        let mut editor = Editor::new(&DeviceInk);
        editor.edit_rgb_field(&DeviceInk, RgbChannel::Blue, "128");

        assert_eq!(editor.rgb_slider(RgbChannel::Blue), 128);
        assert_eq!(editor.rgb_preview(), Rgb::new(0, 0, 128));
    }

    #[test]
    fn invalid_field_edit_is_ignored() {
        let mut editor = Editor::new(&DeviceInk);
        editor.edit_rgb_field(&DeviceInk, RgbChannel::Blue, "64");

        for text in ["abc", "300", "-1", "6 4"] {
            editor.edit_rgb_field(&DeviceInk, RgbChannel::Blue, text);
            assert_eq!(editor.rgb_slider(RgbChannel::Blue), 64);
            assert_eq!(editor.rgb_text(RgbChannel::Blue), "64");
        }
    }

    #[test]
    fn emptied_field_reads_as_zero() {
        let mut editor = Editor::new(&DeviceInk);
        editor.edit_rgb_field(&DeviceInk, RgbChannel::Red, "42");
        editor.edit_rgb_field(&DeviceInk, RgbChannel::Red, "");

        assert_eq!(editor.rgb_slider(RgbChannel::Red), 0);
        assert_eq!(editor.rgb_text(RgbChannel::Red), "");
    }

    #[test]
    fn cmyk_slider_repaints_cmyk_swatch_only() {
        let mut editor = Editor::new(&DeviceInk);
        editor.set_rgb_slider(&DeviceInk, RgbChannel::Red, 120);
        let rgb_before = editor.rgb();

        editor.set_cmyk_slider(&DeviceInk, CmykChannel::Cyan, 50);

        // The CMYK swatch tracks the sliders; the RGB panel is
        // never driven from the CMYK side.
        assert_eq!(editor.cmyk_preview(), device_cmyk_to_rgb(editor.cmyk()));
        assert_eq!(editor.rgb(), rgb_before);
        assert_eq!(editor.rgb_preview(), rgb_before);
    }

    #[test]
    fn cmyk_slider_clamps_to_percent() {
        let mut editor = Editor::new(&DeviceInk);
        editor.set_cmyk_slider(&DeviceInk, CmykChannel::Yellow, 250);
        assert_eq!(editor.cmyk_slider(CmykChannel::Yellow), 100);
    }

    #[test]
    fn optimize_recomputes_cmyk_from_rgb() {
        let mut editor = Editor::new(&DeviceInk);
        editor.set_rgb_slider(&DeviceInk, RgbChannel::Red, 255);
        editor.set_cmyk_slider(&DeviceInk, CmykChannel::Cyan, 77);

        editor.optimize_cmyk(&DeviceInk);

        assert_eq!(editor.cmyk_slider(CmykChannel::Cyan), 0);
        assert_eq!(editor.cmyk_slider(CmykChannel::Magenta), 100);
        assert_eq!(editor.cmyk_slider(CmykChannel::Yellow), 100);
        assert_eq!(editor.cmyk_slider(CmykChannel::Key), 0);
        assert_eq!(editor.cmyk_preview(), device_cmyk_to_rgb(editor.cmyk()));
    }

    #[test]
    fn optimize_is_idempotent() {
        let mut editor = Editor::new(&DeviceInk);
        editor.set_rgb_slider(&DeviceInk, RgbChannel::Green, 99);

        editor.optimize_cmyk(&DeviceInk);
        let first = (editor.cmyk(), editor.cmyk_preview());

        editor.optimize_cmyk(&DeviceInk);
        assert_eq!((editor.cmyk(), editor.cmyk_preview()), first);
    }

    #[test]
    fn guard_suppresses_reentrant_cmyk_updates() {
        let mut editor = Editor::new(&DeviceInk);
        editor.set_rgb_slider(&DeviceInk, RgbChannel::Red, 200);
        editor.set_cmyk_slider(&DeviceInk, CmykChannel::Key, 0);
        editor.set_cmyk_slider(&DeviceInk, CmykChannel::Cyan, 60);
        let painted = editor.cmyk_preview();

        // The slider writes inside optimize run under the guard,
        // so the swatch is only repainted once, afterwards.
        editor.optimize_cmyk(&DeviceInk);
        assert_ne!(editor.cmyk_preview(), painted);
        assert!(!editor.updating_cmyk);
    }
}
