use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::instrument;
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::cli::OutputFormat;
use crate::cli::command::{
    ClockArgs, Command, ImageArgs, SessionSettings, StaticTextArgs, TextArgs,
};
use crate::cli::ui::{FrameView, Painter, ReportView};
use crate::handlers::{
    AsciiText, Clock, ClockContent, ClockFormat, Division, FontSize, FormattedText, Image,
    Rgb, ScrollingText, SetVariable, SignCommand, StaticText, Window, WindowIndex,
};
use crate::hw::{SendOutcome, SendReceipt, SignSession, Transport};
use crate::media::GifImage;
use crate::protocol::{Colour, SaveMode};

/// JSON result emitted for one action.
#[derive(Debug, Serialize)]
pub(crate) struct ActionReport {
    pub(crate) action: &'static str,
    pub(crate) commands: usize,
    pub(crate) batched: bool,
    pub(crate) frames_written: usize,
    pub(crate) bytes_written: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) frames: Vec<FrameView>,
}

/// Builds the commands an action stands for, validating every field.
///
/// # Errors
///
/// Returns an error when a field is out of range or an image cannot be read.
pub(crate) fn commands_for(command: &Command) -> Result<Vec<SignCommand>> {
    let commands = match command {
        Command::Text(args) => vec![scrolling_text(args)?.into()],
        Command::StaticText(args) => vec![static_text(args)?.into()],
        Command::Windows(args) => vec![Division::new(args.windows.clone())?.into()],
        Command::Image(args) => vec![image(args)?.into()],
        Command::Clock(args) => vec![clock(args)?.into()],
        Command::SetVariable(args) => vec![SetVariable::new(args.body.clone()).into()],
        Command::Save => vec![SaveMode::Save.into()],
        Command::Reset => vec![SaveMode::Reset.into()],
        Command::Exit => vec![SignCommand::Exit],
        Command::Demo => demo()?,
    };
    Ok(commands)
}

/// Sends `commands` over `session`, batching them when requested.
#[instrument(
    skip(session, commands),
    level = "info",
    fields(commands = commands.len(), queue = settings.queue)
)]
pub(crate) async fn send_commands<T>(
    session: &mut SignSession<T>,
    commands: &[SignCommand],
    settings: SessionSettings,
) -> Result<SendReceipt>
where
    T: Transport,
{
    tracing::Span::current().pb_set_message(&format!("Sending {} command(s)", commands.len()));

    if settings.queue {
        session.begin_queue();
    }

    let mut receipt = SendReceipt::default();
    for command in commands {
        if let SendOutcome::Transmitted(sent) = session.send(command).await? {
            receipt = SendReceipt::new(
                receipt.frames_written() + sent.frames_written(),
                receipt.bytes_written() + sent.bytes_written(),
            );
        }
    }

    if settings.queue {
        receipt = session
            .flush_queue(settings.unit_id, settings.confirmation)
            .await?;
    }
    Ok(receipt)
}

/// Writes the action report in the selected format.
pub(crate) fn write_report<W>(
    out: &mut W,
    report: &ActionReport,
    output_format: OutputFormat,
    use_colour: bool,
) -> Result<()>
where
    W: io::Write,
{
    match output_format {
        OutputFormat::Pretty => {
            let painter = Painter::new(use_colour);
            writeln!(out, "{}", ReportView::new(report, &painter))?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn scrolling_text(args: &TextArgs) -> Result<ScrollingText> {
    let text = FormattedText::styled(&args.text, args.colour, args.size)?;
    Ok(ScrollingText::new(args.window, text)
        .with_effect(args.effect)
        .with_alignment(args.align)
        .with_speed(args.speed)
        .with_stay_time(args.stay))
}

fn static_text(args: &StaticTextArgs) -> Result<StaticText> {
    let (red, green, blue) = args.rgb;
    Ok(StaticText::builder()
        .window(args.window)
        .text(AsciiText::try_from(args.text.as_str())?)
        .alignment(args.align)
        .x(args.x)
        .y(args.y)
        .width(args.width)
        .height(args.height)
        .font_size(args.font_size)
        .colour(Rgb::new(red, green, blue))
        .build())
}

fn image(args: &ImageArgs) -> Result<Image> {
    let gif = read_image(&args.path, args.fit)?;
    Ok(Image::builder()
        .window(args.window)
        .image(gif)
        .speed(args.speed)
        .stay_time(args.stay)
        .x(args.x)
        .y(args.y)
        .build())
}

fn read_image(path: &Path, fit: Option<(u32, u32)>) -> Result<GifImage> {
    let source = std::fs::read(path)
        .with_context(|| format!("failed to read image file `{}`", path.display()))?;
    GifImage::from_image_bytes(&source, fit)
        .with_context(|| format!("failed to prepare image file `{}`", path.display()))
}

fn clock(args: &ClockArgs) -> Result<Clock> {
    let (red, green, blue) = args.rgb;
    Ok(Clock::builder()
        .window(args.window)
        .stay_time(args.stay)
        .calendar(args.calendar)
        .format(ClockFormat {
            hour_24: !args.twelve_hour,
            four_digit_year: !args.two_digit_year,
            multiline: !args.single_line,
        })
        .content(ClockContent {
            week: args.show_week,
            pointer: args.show_pointer,
            ..ClockContent::default()
        })
        .font_size(args.font_size)
        .colour(Rgb::new(red, green, blue))
        .text(AsciiText::try_from(args.text.as_str())?)
        .build())
}

fn demo() -> Result<Vec<SignCommand>> {
    let top = WindowIndex::new(0)?;
    let bottom = WindowIndex::new(1)?;
    let size = FontSize::default();
    let greeting = FormattedText::styled("Hello", Colour::Red, size)?
        .then(" World!", Colour::Green, size)?;

    Ok(vec![
        Division::new(vec![Window::new(0, 0, 64, 8), Window::new(0, 8, 64, 8)])?.into(),
        ScrollingText::new(top, greeting).into(),
        Clock::builder()
            .window(bottom)
            .format(ClockFormat {
                multiline: false,
                ..ClockFormat::default()
            })
            .build()
            .into(),
        SaveMode::Save.into(),
    ])
}
