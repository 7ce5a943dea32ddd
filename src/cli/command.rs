use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::level_filters::LevelFilter;

use crate::error::CliConfigError;
use crate::handlers::{ClockFontSize, FontSize, UnitId, Window, WindowIndex};
use crate::hw::DEFAULT_BAUD_RATE;
use crate::protocol::{Alignment, Calendar, Colour, Effect};
use crate::utils::parse_hex;

/// Command-line options for the C-Power sign tool.
#[derive(Debug, Parser)]
#[command(name = "cpower", about = "Drive C-Power LED sign controllers over a serial link.")]
pub struct Args {
    /// Serial port the controller is attached to.
    #[arg(long, env = "CPOWER_PORT", global = true)]
    port: Option<String>,
    /// Serial line speed.
    #[arg(long, env = "CPOWER_BAUD", global = true, default_value_t = DEFAULT_BAUD_RATE)]
    baud: u32,
    /// Controller address; 255 broadcasts to every unit.
    #[arg(long, global = true, default_value = "255", value_parser = parse_unit_id)]
    unit_id: UnitId,
    /// Ask the controller to confirm each packet.
    #[arg(long, global = true)]
    confirm: bool,
    /// Send all commands of the action as one multi-packet batch.
    #[arg(long, global = true)]
    queue: bool,
    /// Record frames in memory and print them instead of opening the port.
    #[arg(long, global = true)]
    fake: bool,
    /// Log verbosity; overrides `RUST_LOG`.
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,
    /// Output format; defaults to pretty on a terminal and JSON otherwise.
    #[arg(long, global = true, value_enum)]
    output_format: Option<OutputFormat>,
    #[command(subcommand)]
    command: Command,
}

impl Args {
    /// Creates argument values directly without CLI parsing.
    ///
    /// ```
    /// use cpower::{Args, Command};
    ///
    /// let args = Args::new(Command::Exit).with_fake();
    /// let _ = args;
    /// ```
    #[must_use]
    pub fn new(command: Command) -> Self {
        Self {
            port: None,
            baud: DEFAULT_BAUD_RATE,
            unit_id: UnitId::BROADCAST,
            confirm: false,
            queue: false,
            fake: false,
            log_level: None,
            output_format: None,
            command,
        }
    }

    /// Records frames in memory instead of opening a port.
    #[must_use]
    pub fn with_fake(mut self) -> Self {
        self.fake = true;
        self
    }

    /// Sends the action's commands as one batch.
    #[must_use]
    pub fn with_queue(mut self) -> Self {
        self.queue = true;
        self
    }

    #[must_use]
    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = Some(output_format);
        self
    }

    #[must_use]
    pub fn log_level(&self) -> Option<LogLevel> {
        self.log_level
    }

    #[must_use]
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.output_format
    }

    /// Packet addressing and batching requested on the command line.
    #[must_use]
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            unit_id: self.unit_id,
            confirmation: self.confirm,
            queue: self.queue,
        }
    }

    /// Splits parsed arguments into the action and the link to drive.
    ///
    /// # Errors
    ///
    /// Returns an error when neither a port nor fake mode was selected.
    pub fn into_command_and_link(self) -> anyhow::Result<(Command, Link)> {
        let link = match (self.fake, self.port) {
            (true, _) => Link::Fake,
            (false, Some(port)) => Link::Serial {
                port,
                baud: self.baud,
            },
            (false, None) => return Err(CliConfigError::MissingPort.into()),
        };
        Ok((self.command, link))
    }
}

/// Where frames are written.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Link {
    Serial { port: String, baud: u32 },
    Fake,
}

/// Addressing applied to every packet of a run.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SessionSettings {
    pub unit_id: UnitId,
    pub confirmation: bool,
    pub queue: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            unit_id: UnitId::BROADCAST,
            confirmation: false,
            queue: false,
        }
    }
}

/// Log verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub(crate) fn as_level_filter(self) -> LevelFilter {
        match self {
            Self::Off => LevelFilter::OFF,
            Self::Error => LevelFilter::ERROR,
            Self::Warn => LevelFilter::WARN,
            Self::Info => LevelFilter::INFO,
            Self::Debug => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }
}

/// Rendering of command results.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}

/// Supported actions.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show scrolling text in a window.
    Text(TextArgs),
    /// Draw plain text at a fixed position.
    StaticText(StaticTextArgs),
    /// Define the window layout, one `x,y,width,height` per window.
    Windows(WindowsArgs),
    /// Show an image file in a window, converting it to GIF when needed.
    Image(ImageArgs),
    /// Show a clock in a window.
    Clock(ClockArgs),
    /// Send a raw set-variable body given as hexadecimal bytes.
    SetVariable(SetVariableArgs),
    /// Persist the current programme.
    Save,
    /// Reset the stored programme.
    Reset,
    /// Leave the current show.
    Exit,
    /// Two stacked windows with scrolling text and a clock, then save.
    Demo,
}

impl Command {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::StaticText(_) => "static-text",
            Self::Windows(_) => "windows",
            Self::Image(_) => "image",
            Self::Clock(_) => "clock",
            Self::SetVariable(_) => "set-variable",
            Self::Save => "save",
            Self::Reset => "reset",
            Self::Exit => "exit",
            Self::Demo => "demo",
        }
    }
}

/// Arguments for `text`.
#[derive(Debug, clap::Args)]
pub struct TextArgs {
    /// ASCII text to show.
    pub text: String,
    #[arg(long, default_value = "0", value_parser = parse_window)]
    pub window: WindowIndex,
    #[arg(long, value_enum, default_value_t = Colour::White)]
    pub colour: Colour,
    /// Font size code (0..=15).
    #[arg(long, default_value = "0", value_parser = parse_font_size)]
    pub size: FontSize,
    #[arg(long, value_enum, default_value_t = Effect::ScrollLeft)]
    pub effect: Effect,
    #[arg(long, value_enum, default_value_t = Alignment::Left)]
    pub align: Alignment,
    #[arg(long, default_value_t = 30)]
    pub speed: u8,
    /// Seconds the text stays once it has entered.
    #[arg(long, default_value_t = 2)]
    pub stay: u16,
}

impl TextArgs {
    /// Creates text arguments with the scrolling defaults.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            window: WindowIndex::default(),
            colour: Colour::White,
            size: FontSize::default(),
            effect: Effect::default(),
            align: Alignment::default(),
            speed: 30,
            stay: 2,
        }
    }
}

/// Arguments for `static-text`.
#[derive(Debug, clap::Args)]
pub struct StaticTextArgs {
    pub text: String,
    #[arg(long, default_value = "0", value_parser = parse_window)]
    pub window: WindowIndex,
    #[arg(long, default_value_t = 0)]
    pub x: u16,
    #[arg(long, default_value_t = 0)]
    pub y: u16,
    #[arg(long, default_value_t = 64)]
    pub width: u16,
    #[arg(long, default_value_t = 16)]
    pub height: u16,
    #[arg(long, value_enum, default_value_t = Alignment::Left)]
    pub align: Alignment,
    #[arg(long, default_value_t = 1)]
    pub font_size: u8,
    /// Text colour as `red,green,blue`.
    #[arg(long, default_value = "0,0,0", value_parser = parse_rgb)]
    pub rgb: (u8, u8, u8),
}

/// Arguments for `windows`.
#[derive(Debug, clap::Args)]
pub struct WindowsArgs {
    /// Window geometry as `x,y,width,height`.
    #[arg(required = true, value_parser = parse_window_geometry)]
    pub windows: Vec<Window>,
}

/// Arguments for `image`.
#[derive(Debug, clap::Args)]
pub struct ImageArgs {
    /// Image file (GIF, PNG, JPEG, ...).
    pub path: PathBuf,
    #[arg(long, default_value = "0", value_parser = parse_window)]
    pub window: WindowIndex,
    #[arg(long, default_value_t = 0)]
    pub x: u16,
    #[arg(long, default_value_t = 0)]
    pub y: u16,
    #[arg(long, default_value_t = 30)]
    pub speed: u8,
    #[arg(long, default_value_t = 2)]
    pub stay: u16,
    /// Scale non-GIF sources to fit inside `WIDTHxHEIGHT`.
    #[arg(long, value_parser = parse_fit)]
    pub fit: Option<(u32, u32)>,
}

/// Arguments for `clock`.
#[derive(Debug, clap::Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct ClockArgs {
    #[arg(long, default_value = "0", value_parser = parse_window)]
    pub window: WindowIndex,
    #[arg(long, default_value_t = 5000)]
    pub stay: u16,
    #[arg(long, value_enum, default_value_t = Calendar::Gregorian)]
    pub calendar: Calendar,
    #[arg(long)]
    pub twelve_hour: bool,
    #[arg(long)]
    pub two_digit_year: bool,
    #[arg(long)]
    pub single_line: bool,
    #[arg(long)]
    pub show_week: bool,
    #[arg(long)]
    pub show_pointer: bool,
    /// Font size code (0..=7).
    #[arg(long, default_value = "0", value_parser = parse_clock_font_size)]
    pub font_size: ClockFontSize,
    /// Clock colour as `red,green,blue`.
    #[arg(long, default_value = "255,255,255", value_parser = parse_rgb)]
    pub rgb: (u8, u8, u8),
    /// Caption shown with the clock.
    #[arg(long, default_value = "")]
    pub text: String,
}

/// Arguments for `set-variable`.
#[derive(Debug, clap::Args)]
pub struct SetVariableArgs {
    /// Variable body as hexadecimal bytes, e.g. `01 02 FF`.
    #[arg(value_parser = parse_body)]
    pub body: ::std::vec::Vec<u8>,
}

fn parse_unit_id(value: &str) -> Result<UnitId, String> {
    let parsed = value.parse::<u32>().map_err(|error| error.to_string())?;
    UnitId::try_from(parsed).map_err(|error| error.to_string())
}

fn parse_window(value: &str) -> Result<WindowIndex, String> {
    let parsed = value.parse::<u32>().map_err(|error| error.to_string())?;
    WindowIndex::try_from(parsed).map_err(|error| error.to_string())
}

fn parse_font_size(value: &str) -> Result<FontSize, String> {
    let parsed = value.parse::<u8>().map_err(|error| error.to_string())?;
    FontSize::new(parsed).map_err(|error| error.to_string())
}

fn parse_clock_font_size(value: &str) -> Result<ClockFontSize, String> {
    let parsed = value.parse::<u8>().map_err(|error| error.to_string())?;
    ClockFontSize::new(parsed).map_err(|error| error.to_string())
}

fn parse_numbers<const N: usize, T>(value: &str, separator: char) -> Result<[T; N], String>
where
    T: std::str::FromStr<Err = std::num::ParseIntError> + Copy + Default,
{
    let mut parsed = [T::default(); N];
    let mut parts = value.split(separator);
    for slot in &mut parsed {
        let part = parts
            .next()
            .ok_or_else(|| format!("expected {N} values separated by `{separator}`"))?;
        *slot = part.trim().parse().map_err(|error| format!("`{part}`: {error}"))?;
    }
    if parts.next().is_some() {
        return Err(format!("expected {N} values separated by `{separator}`"));
    }
    Ok(parsed)
}

fn parse_rgb(value: &str) -> Result<(u8, u8, u8), String> {
    let [red, green, blue] = parse_numbers(value, ',')?;
    Ok((red, green, blue))
}

fn parse_window_geometry(value: &str) -> Result<Window, String> {
    let [x, y, width, height] = parse_numbers(value, ',')?;
    Ok(Window::new(x, y, width, height))
}

fn parse_fit(value: &str) -> Result<(u32, u32), String> {
    let [width, height] = parse_numbers(&value.to_ascii_lowercase(), 'x')?;
    Ok((width, height))
}

fn parse_body(value: &str) -> Result<Vec<u8>, String> {
    parse_hex(value).map_err(|error| error.to_string())
}
