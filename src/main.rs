use std::path::PathBuf;
use std::time::Duration;

use arboard::Clipboard;
use clap::Parser;
use inkproof::color::Rgb;
use inkproof::config::{self, DEFAULT_CONFIG_FILE};
use inkproof::convert::{self, PressTransformer};
use inkproof::editor::{CmykChannel, Editor, RgbChannel};
use ratatui::{
    DefaultTerminal,
    buffer::Buffer,
    crossterm::event::{self, Event, KeyCode, KeyEventKind},
    layout::{Constraint, Layout, Rect},
    style::{Color, Stylize},
    text::Text,
    widgets::{Block, BorderType, Gauge, Paragraph, Widget},
};

/// An interactive RGB/CMYK press-color proofing tool.
#[derive(Debug, Parser)]
#[command(name = "inkproof", version)]
struct Args {
    /// Path to an `Inkproof.toml` configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Path to a CMYK ICC profile, overriding the configuration.
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Convert a single color (`R,G,B` or `#RRGGBB`) and exit
    /// instead of opening the editor.
    #[arg(long, value_name = "R,G,B|#RRGGBB")]
    rgb: Option<String>,
}

fn main() -> std::io::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = config::load_config(&args.config)?;
    let mut source = config.profile_source();
    if args.profile.is_some() {
        source.path = args.profile;
    }
    let transformer = PressTransformer::new(source);

    if let Some(rgb) = args.rgb {
        let rgb = parse_rgb_arg(&rgb)?;
        println!("{}", convert::report(&transformer, rgb));
        return Ok(());
    }

    let terminal = ratatui::init();
    let app_result = App::new(transformer).run(terminal);
    ratatui::restore();
    app_result
}

/// Parses an `R,G,B` argument with channels in `0..=255`, or a
/// hexadecimal color like `#ff0000`.
fn parse_rgb_arg(arg: &str) -> std::io::Result<Rgb> {
    let invalid = || {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid --rgb value: {arg}"),
        )
    };

    if !arg.contains(',') {
        return Rgb::try_from_hex(arg.trim()).map_err(|_| invalid());
    }

    let mut channels = arg.split(',').map(|part| part.trim().parse::<u8>());

    let (Some(Ok(r)), Some(Ok(g)), Some(Ok(b)), None) = (
        channels.next(),
        channels.next(),
        channels.next(),
        channels.next(),
    ) else {
        return Err(invalid());
    };

    Ok(Rgb::new(r, g, b))
}

/// Focusable controls, in Tab order.
const FOCUS_ORDER: [Control; 7] = [
    Control::Rgb(RgbChannel::Red),
    Control::Rgb(RgbChannel::Green),
    Control::Rgb(RgbChannel::Blue),
    Control::Cmyk(CmykChannel::Cyan),
    Control::Cmyk(CmykChannel::Magenta),
    Control::Cmyk(CmykChannel::Yellow),
    Control::Cmyk(CmykChannel::Key),
];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Control {
    Rgb(RgbChannel),
    Cmyk(CmykChannel),
}

struct App {
    transformer: PressTransformer,
    editor: Editor,
    /// Index into [FOCUS_ORDER].
    focus: usize,
}

impl App {
    fn new(transformer: PressTransformer) -> Self {
        let editor = Editor::new(&transformer);
        Self {
            transformer,
            editor,
            focus: 0,
        }
    }

    /// Run the app.
    ///
    /// This is the main event loop for the app.
    fn run(mut self, mut terminal: DefaultTerminal) -> std::io::Result<()> {
        loop {
            terminal.draw(|frame| frame.render_widget(&mut self, frame.area()))?;

            if !self.handle_events()? {
                break;
            }
        }

        Ok(())
    }

    /// Handle any events that have occurred since the last time the app was rendered.
    ///
    /// Returns true if the app should continue running.
    fn handle_events(&mut self) -> std::io::Result<bool> {
        // Ensure that the app only blocks for a period that allows the app to render at
        // approximately 60 FPS (this doesn't account for the time to render the frame, and will
        // also update the app immediately any time an event occurs)
        let timeout = Duration::from_secs_f32(1.0 / 60.0);
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                return Ok(true);
            }

            match key.code {
                // Exit the application.
                KeyCode::Char('q') => return Ok(false),

                // Explicitly re-sync the CMYK panel from RGB.
                KeyCode::Char('o') => self.editor.optimize_cmyk(&self.transformer),

                // Copy the current values to the clipboard.
                KeyCode::Char('w') => self.copy_values(),

                // Cycle the focused control.
                KeyCode::Tab => self.focus = (self.focus + 1) % FOCUS_ORDER.len(),

                KeyCode::Left => self.step_focused(-1),
                KeyCode::Right => self.step_focused(1),

                // Edit the focused RGB text field.
                KeyCode::Backspace => self.backspace_focused(),
                KeyCode::Char(ch) if ch.is_ascii_digit() => self.type_focused(ch),

                _ => {}
            }
        }

        Ok(true)
    }

    /// Steps the focused slider by `step`.
    fn step_focused(&mut self, step: i16) {
        match FOCUS_ORDER[self.focus] {
            Control::Rgb(channel) => {
                let value = (i16::from(self.editor.rgb_slider(channel)) + step).clamp(0, 255);
                self.editor
                    .set_rgb_slider(&self.transformer, channel, value as u8);
            }
            Control::Cmyk(channel) => {
                let value = (i16::from(self.editor.cmyk_slider(channel)) + step).clamp(0, 100);
                self.editor
                    .set_cmyk_slider(&self.transformer, channel, value as u8);
            }
        }
    }

    /// Appends a digit to the focused RGB text field.
    fn type_focused(&mut self, ch: char) {
        if let Control::Rgb(channel) = FOCUS_ORDER[self.focus] {
            let mut text = self.editor.rgb_text(channel).to_string();
            text.push(ch);
            self.editor.edit_rgb_field(&self.transformer, channel, &text);
        }
    }

    /// Deletes the last character of the focused RGB text field.
    fn backspace_focused(&mut self) {
        if let Control::Rgb(channel) = FOCUS_ORDER[self.focus] {
            let mut text = self.editor.rgb_text(channel).to_string();
            text.pop();
            self.editor.edit_rgb_field(&self.transformer, channel, &text);
        }
    }

    /// Copies the current RGB and CMYK values to the clipboard.
    fn copy_values(&self) {
        let rgb = self.editor.rgb();
        let cmyk = self.editor.cmyk();
        let values = format!(
            "RGB ({}, {}, {}) {rgb} | CMYK ({cmyk})",
            rgb.r, rgb.g, rgb.b
        );

        if let Err(error) = Clipboard::new().and_then(|mut clipboard| clipboard.set_text(values)) {
            tracing::warn!("clipboard copy failed: {error}");
        }
    }

    fn render_rgb_panel(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(" RGB ");
        let inner = block.inner(area);
        block.render(area, buf);

        use Constraint::{Length, Min};
        let [swatch, _, rows] = Layout::vertical([Min(3), Length(1), Length(3)]).areas(inner);
        render_swatch(swatch, buf, self.editor.rgb_preview());

        let [r_row, g_row, b_row] = Layout::vertical([Length(1); 3]).areas(rows);
        for (channel, row) in RgbChannel::ALL.into_iter().zip([r_row, g_row, b_row]) {
            self.render_rgb_row(row, buf, channel);
        }
    }

    fn render_rgb_row(&self, area: Rect, buf: &mut Buffer, channel: RgbChannel) {
        use Constraint::{Length, Min};
        let [label_area, gauge_area, field_area] =
            Layout::horizontal([Length(2), Min(10), Length(5)])
                .spacing(1)
                .areas(area);

        let focused = FOCUS_ORDER[self.focus] == Control::Rgb(channel);
        render_label(label_area, buf, channel.label(), focused);

        let value = self.editor.rgb_slider(channel);
        Gauge::default()
            .ratio(f64::from(value) / 255.0)
            .use_unicode(true)
            .label(value.to_string())
            .gauge_style(rgb_channel_color(channel))
            .render(gauge_area, buf);

        // The paired text field, with a cursor while focused.
        let mut field = self.editor.rgb_text(channel).to_string();
        if focused {
            field.push('_');
        }
        Text::from(field).render(field_area, buf);
    }

    fn render_cmyk_panel(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(" CMYK ");
        let inner = block.inner(area);
        block.render(area, buf);

        use Constraint::{Length, Min};
        let [swatch, _, rows] = Layout::vertical([Min(3), Length(1), Length(4)]).areas(inner);
        render_swatch(swatch, buf, self.editor.cmyk_preview());

        let [c_row, m_row, y_row, k_row] = Layout::vertical([Length(1); 4]).areas(rows);
        for (channel, row) in CmykChannel::ALL
            .into_iter()
            .zip([c_row, m_row, y_row, k_row])
        {
            self.render_cmyk_row(row, buf, channel);
        }
    }

    fn render_cmyk_row(&self, area: Rect, buf: &mut Buffer, channel: CmykChannel) {
        use Constraint::{Length, Min};
        let [label_area, gauge_area, percent_area] =
            Layout::horizontal([Length(2), Min(10), Length(5)])
                .spacing(1)
                .areas(area);

        let focused = FOCUS_ORDER[self.focus] == Control::Cmyk(channel);
        render_label(label_area, buf, channel.label(), focused);

        let value = self.editor.cmyk_slider(channel);
        Gauge::default()
            .ratio(f64::from(value) / 100.0)
            .use_unicode(true)
            .label(value.to_string())
            .gauge_style(cmyk_channel_color(channel))
            .render(gauge_area, buf);

        Text::from(format!("{value}%")).render(percent_area, buf);
    }
}

/// Implement the Widget trait for &mut App so that it can be rendered
///
/// This is implemented on a mutable reference so that the app can update its state while it is
/// being rendered.
impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        use Constraint::{Length, Min, Percentage};
        let [panels, bottom] = Layout::vertical([Min(0), Length(2)]).areas(area);
        let [instructions_area] = Layout::horizontal([Min(0)]).areas(bottom);

        Text::from(
            "\nQ: Quit | Tab: Next Control | ←→: Adjust | 0-9/Backspace: Edit RGB Field | O: Optimize CMYK | W: Copy Values",
        )
        .centered()
        .render(instructions_area, buf);

        let [left, right] = Layout::horizontal([Percentage(50), Percentage(50)])
            .spacing(1)
            .areas(panels);

        self.render_rgb_panel(left, buf);
        self.render_cmyk_panel(right, buf);
    }
}

/// Draws a channel label, highlighted while focused.
fn render_label(area: Rect, buf: &mut Buffer, label: &str, focused: bool) {
    let mut text = Text::from(label.to_string());
    if focused {
        text = text.bold().yellow();
    }
    text.render(area, buf);
}

/// Fills `area` with a block of `color`, overlaying its hex code
/// if there's enough space.
fn render_swatch(area: Rect, buf: &mut Buffer, color: Rgb) {
    // Perceived-brightness cutoff for legible overlay text.
    let luma =
        0.299 * f32::from(color.r) + 0.587 * f32::from(color.g) + 0.114 * f32::from(color.b);
    let fg_color = if luma >= 128.0 {
        Color::Black
    } else {
        Color::White
    };
    let bg_color = Color::Rgb(color.r, color.g, color.b);

    let mut paragraph = String::default();
    if area.width >= 11 && area.height >= 2 {
        paragraph.push_str(&format!("\n  {color}"));
    }

    Paragraph::new(paragraph)
        .fg(fg_color)
        .bg(bg_color)
        .render(area, buf);
}

fn rgb_channel_color(channel: RgbChannel) -> Color {
    match channel {
        RgbChannel::Red => Color::Red,
        RgbChannel::Green => Color::Green,
        RgbChannel::Blue => Color::Blue,
    }
}

fn cmyk_channel_color(channel: CmykChannel) -> Color {
    match channel {
        CmykChannel::Cyan => Color::Cyan,
        CmykChannel::Magenta => Color::Magenta,
        CmykChannel::Yellow => Color::Yellow,
        CmykChannel::Key => Color::DarkGray,
    }
}
