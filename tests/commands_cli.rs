use clap::Parser;
use clap::error::ErrorKind;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use serde_json::Value;

#[derive(Debug, Default)]
struct FakeTerminalClient;

impl cpower::TerminalClient for FakeTerminalClient {
    fn stdout_is_terminal(&self) -> bool {
        false
    }

    fn stderr_is_terminal(&self) -> bool {
        false
    }
}

async fn run_with_parsed_args(args: cpower::Args) -> anyhow::Result<String> {
    let mut output = Vec::new();
    cpower::run_with_clients(args, &mut output, &FakeTerminalClient).await?;
    Ok(String::from_utf8(output)?)
}

async fn run_with_argv<const N: usize>(argv: [&str; N]) -> anyhow::Result<String> {
    let parsed_args = cpower::Args::try_parse_from(argv)?;
    run_with_parsed_args(parsed_args).await
}

async fn run_json<const N: usize>(argv: [&str; N]) -> anyhow::Result<Value> {
    let stdout = run_with_argv(argv).await?;
    Ok(serde_json::from_str(&stdout)?)
}

#[tokio::test(start_paused = true)]
async fn exit_prints_the_recorded_frame_as_json() -> anyhow::Result<()> {
    let stdout = run_with_argv(["cpower", "--fake", "exit"]).await?;
    assert_snapshot!(stdout.trim_end(), @r#"
    {
      "action": "exit",
      "commands": 1,
      "batched": false,
      "frames_written": 1,
      "bytes_written": 14,
      "frames": [
        {
          "unit_id": 255,
          "confirmation": false,
          "packet_index": 0,
          "packets_total_minus_one": 0,
          "opcode": "exit",
          "payload_len": 1,
          "frame": "A5 68 32 FF 7B 00 01 00 00 00 06 1B 02 AE"
        }
      ]
    }
    "#);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn unit_id_and_confirmation_reach_direct_frames() -> anyhow::Result<()> {
    let report = run_json(["cpower", "--fake", "--unit-id", "3", "--confirm", "save"]).await?;
    let frame = &report["frames"][0];
    assert_eq!(3, frame["unit_id"]);
    assert_eq!(true, frame["confirmation"]);
    assert_eq!("save", frame["opcode"]);
    assert_eq!(
        "A5 68 32 03 7B 01 04 00 00 00 07 00 00 00 24 01 AE",
        frame["frame"]
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn queued_demo_goes_out_as_one_numbered_group() -> anyhow::Result<()> {
    let report = run_json(["cpower", "--fake", "--queue", "demo"]).await?;
    assert_eq!(true, report["batched"]);
    assert_eq!(4, report["frames_written"]);

    let frames = report["frames"].as_array().expect("frames should be listed");
    let numbering: Vec<(u64, u64)> = frames
        .iter()
        .map(|frame| {
            (
                frame["packet_index"].as_u64().unwrap_or_default(),
                frame["packets_total_minus_one"].as_u64().unwrap_or_default(),
            )
        })
        .collect();
    assert_eq!(vec![(0, 3), (1, 3), (2, 3), (3, 3)], numbering);

    let opcodes: Vec<&str> = frames
        .iter()
        .filter_map(|frame| frame["opcode"].as_str())
        .collect();
    assert_eq!(vec!["division", "text", "clock", "save"], opcodes);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn unqueued_demo_sends_single_packets() -> anyhow::Result<()> {
    let report = run_json(["cpower", "--fake", "demo"]).await?;
    assert_eq!(false, report["batched"]);
    let frames = report["frames"].as_array().expect("frames should be listed");
    assert_eq!(4, frames.len());
    assert!(
        frames
            .iter()
            .all(|frame| frame["packets_total_minus_one"] == 0)
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn set_variable_sends_the_body_verbatim() -> anyhow::Result<()> {
    let report = run_json(["cpower", "--fake", "set-variable", "01 aa"]).await?;
    let frame = &report["frames"][0];
    assert_eq!("set_variable", frame["opcode"]);
    assert_eq!(3, frame["payload_len"]);
    let hex = frame["frame"].as_str().expect("frame should be hex");
    assert!(hex.contains("0A 01 AA 0A"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn pretty_output_lists_summary_and_frames() -> anyhow::Result<()> {
    let args = cpower::Args::try_parse_from(["cpower", "--fake", "exit"])?
        .with_output_format(cpower::OutputFormat::Pretty);
    let stdout = run_with_parsed_args(args).await?;

    assert!(stdout.starts_with("✓ Sent exit\n"));
    assert!(stdout.contains("│ frames written │ 1"));
    assert!(stdout.contains("A5 68 32 FF 7B 00 01 00 00 00 06 1B 02 AE"));
    assert!(!stdout.contains('\u{1b}'));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn non_ascii_text_fails_before_any_frame() {
    let result = run_with_argv(["cpower", "--fake", "text", "caf\u{e9}"]).await;
    let error = result.expect_err("non-ascii text should be rejected");
    assert_eq!(
        Some(&cpower::ValidationError::NonAsciiText { character: '\u{e9}' }),
        error.downcast_ref::<cpower::ValidationError>()
    );
}

#[tokio::test]
async fn missing_port_is_reported_without_fake_mode() {
    let result = run_with_argv(["cpower", "exit"]).await;
    let error = result.expect_err("a port is required");
    assert_eq!(
        "no serial port given; pass --port, set CPOWER_PORT or use --fake",
        error.to_string()
    );
}

#[test]
fn text_rejects_windows_past_seven() {
    let result = cpower::Args::try_parse_from(["cpower", "--fake", "text", "hi", "--window", "8"]);
    let error = result.expect_err("window 8 should fail command parsing");
    assert_eq!(ErrorKind::ValueValidation, error.kind());
}

#[test]
fn set_variable_rejects_odd_hex() {
    let result = cpower::Args::try_parse_from(["cpower", "--fake", "set-variable", "abc"]);
    let error = result.expect_err("odd hex should fail command parsing");
    assert_eq!(ErrorKind::ValueValidation, error.kind());
}
