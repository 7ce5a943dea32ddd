use std::io;

use anyhow::Result;
use tracing::{debug, instrument};

use crate::cli::control::{ActionReport, commands_for, send_commands, write_report};
use crate::cli::ui::FrameView;
use crate::cli::{Args, Command, Link, LogLevel, OutputFormat, SessionSettings};
use crate::handlers::SignCommand;
use crate::hw::{RecordingTransport, SendReceipt, SerialTransport, SignSession, Transport};
use crate::telemetry;
use crate::terminal::{SystemTerminalClient, TerminalClient};

/// Runs parsed arguments against the process's own terminal.
///
/// ```
/// # async fn run() -> anyhow::Result<()> {
/// use clap::Parser;
///
/// let args = cpower::Args::try_parse_from(["cpower", "--fake", "exit"])?;
/// let mut out = Vec::new();
/// cpower::run(args, &mut out).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if tracing initialisation fails, an argument is out of
/// range, the link fails, or output writing fails.
pub async fn run<W>(args: Args, out: &mut W) -> Result<()>
where
    W: io::Write,
{
    run_with_clients(args, out, &SystemTerminalClient).await
}

/// Runs parsed arguments with an injected terminal client.
///
/// Output defaults to pretty tables when stdout is a terminal and JSON
/// otherwise.
///
/// ```
/// # async fn run() -> anyhow::Result<()> {
/// use clap::Parser;
///
/// struct FakeTerminal;
/// impl cpower::TerminalClient for FakeTerminal {
///     fn stdout_is_terminal(&self) -> bool { false }
///     fn stderr_is_terminal(&self) -> bool { false }
/// }
///
/// let args = cpower::Args::try_parse_from(["cpower", "--fake", "--queue", "demo"])?;
/// let mut out = Vec::new();
/// cpower::run_with_clients(args, &mut out, &FakeTerminal).await?;
/// assert!(String::from_utf8(out)?.contains("\"batched\": true"));
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if tracing initialisation fails, an argument is out of
/// range, the link fails, or output writing fails.
pub async fn run_with_clients<W>(
    args: Args,
    out: &mut W,
    terminal_client: &dyn TerminalClient,
) -> Result<()>
where
    W: io::Write,
{
    telemetry::initialise_tracing(
        "cpower",
        terminal_client.stderr_is_terminal(),
        args.log_level().map(LogLevel::as_level_filter),
    )?;

    let stdout_is_terminal = terminal_client.stdout_is_terminal();
    let output_format = args.output_format().unwrap_or(if stdout_is_terminal {
        OutputFormat::Pretty
    } else {
        OutputFormat::Json
    });
    let settings = args.session_settings();
    let (command, link) = args.into_command_and_link()?;

    let report = execute(&command, link, settings).await?;
    write_report(out, &report, output_format, stdout_is_terminal)
}

#[instrument(skip_all, level = "info", fields(command = command.name(), ?link))]
async fn execute(command: &Command, link: Link, settings: SessionSettings) -> Result<ActionReport> {
    let commands = commands_for(command)?;

    match link {
        Link::Serial { port, baud } => {
            let transport = SerialTransport::open(&port, baud)?;
            debug!(port = transport.port_name(), "driving serial link");
            let receipt = drive(transport, &commands, settings).await?;
            Ok(report(command, &commands, settings, receipt, Vec::new()))
        }
        Link::Fake => {
            let recording = RecordingTransport::default();
            let receipt = drive(recording.clone(), &commands, settings).await?;
            let frames = recording
                .frames()
                .iter()
                .map(|frame| FrameView::from_frame(frame))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(report(command, &commands, settings, receipt, frames))
        }
    }
}

async fn drive<T>(
    transport: T,
    commands: &[SignCommand],
    settings: SessionSettings,
) -> Result<SendReceipt>
where
    T: Transport,
{
    let mut session = SignSession::new(transport)
        .with_unit_id(settings.unit_id)
        .with_confirmation(settings.confirmation);
    send_commands(&mut session, commands, settings).await
}

fn report(
    command: &Command,
    commands: &[SignCommand],
    settings: SessionSettings,
    receipt: SendReceipt,
    frames: Vec<FrameView>,
) -> ActionReport {
    ActionReport {
        action: command.name(),
        commands: commands.len(),
        batched: settings.queue,
        frames_written: receipt.frames_written(),
        bytes_written: receipt.bytes_written(),
        frames,
    }
}
