use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::cli::control::ActionReport;
use crate::handlers::{FrameCodec, FrameCodecError};
use crate::protocol::CommandCode;
use crate::utils::format_hex;

use super::painter::Painter;
use super::table::Table;

/// One recorded frame, decoded back into its header fields.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub(crate) struct FrameView {
    unit_id: u8,
    confirmation: bool,
    packet_index: u8,
    packets_total_minus_one: u8,
    opcode: String,
    payload_len: u16,
    frame: String,
}

impl FrameView {
    /// Decodes a frame exactly as it went out on the wire.
    pub(crate) fn from_frame(frame: &[u8]) -> Result<Self, FrameCodecError> {
        let packet = FrameCodec::decode_frame(frame)?;
        let header = packet.header();
        let opcode = match packet.payload().first() {
            Some(&raw) => CommandCode::from_raw(raw)
                .map_or_else(|| format!("0x{raw:02X}"), |code| code.to_string()),
            None => "<none>".to_owned(),
        };
        Ok(Self {
            unit_id: header.unit_id().value(),
            confirmation: header.confirmation(),
            packet_index: header.sequence().index(),
            packets_total_minus_one: header.sequence().total_minus_one(),
            opcode,
            payload_len: header.payload_len(),
            frame: format_hex(frame),
        })
    }

    fn row(&self) -> Vec<String> {
        vec![
            format!("{}/{}", self.packet_index, self.packets_total_minus_one),
            self.unit_id.to_string(),
            self.opcode.clone(),
            self.payload_len.to_string(),
            self.frame.clone(),
        ]
    }
}

/// Human-readable summary of an action.
pub(crate) struct ReportView<'a> {
    report: &'a ActionReport,
    painter: &'a Painter,
}

impl<'a> ReportView<'a> {
    pub(crate) fn new(report: &'a ActionReport, painter: &'a Painter) -> Self {
        Self { report, painter }
    }
}

impl Display for ReportView<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let painter = self.painter;
        let report = self.report;
        writeln!(
            f,
            "{} {}",
            painter.success("✓"),
            painter.heading(format!("Sent {}", report.action))
        )?;

        let summary = Table::key_value(
            painter,
            vec![
                ("commands", painter.value(report.commands.to_string())),
                ("batched", painter.value(if report.batched { "yes" } else { "no" })),
                ("frames written", painter.value(report.frames_written.to_string())),
                ("bytes written", painter.value(report.bytes_written.to_string())),
            ],
        );
        write!(f, "{summary}")?;

        if !report.frames.is_empty() {
            let frames = Table::grid(
                ["packet", "unit", "opcode", "payload", "frame"],
                report.frames.iter().map(FrameView::row).collect(),
            );
            write!(f, "\n{frames}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;

    const EXIT_FRAME: [u8; 14] = [
        0xA5, 0x68, 0x32, 0xFF, 0x7B, 0x00, 0x01, 0x00, 0x00, 0x00, 0x06, 0x1B, 0x02, 0xAE,
    ];

    fn report(frames: Vec<FrameView>) -> ActionReport {
        ActionReport {
            action: "exit",
            commands: 1,
            batched: false,
            frames_written: 1,
            bytes_written: 14,
            frames,
        }
    }

    #[test]
    fn frame_view_names_known_opcodes() {
        let view = FrameView::from_frame(&EXIT_FRAME).expect("frame should decode");
        assert_eq!(
            FrameView {
                unit_id: 0xFF,
                confirmation: false,
                packet_index: 0,
                packets_total_minus_one: 0,
                opcode: "exit".into(),
                payload_len: 1,
                frame: "A5 68 32 FF 7B 00 01 00 00 00 06 1B 02 AE".into(),
            },
            view
        );
    }

    #[test]
    fn frame_view_rejects_frames_without_delimiters() {
        assert_matches!(FrameView::from_frame(&EXIT_FRAME[1..]), Err(_));
    }

    #[test]
    fn summary_lists_counts_without_colour() {
        let painter = Painter::new(false);
        let rendered = ReportView::new(&report(Vec::new()), &painter).to_string();
        assert!(rendered.starts_with("✓ Sent exit\n"));
        assert!(rendered.contains("│ frames written │ 1"));
        assert!(rendered.contains("│ bytes written  │ 14"));
        assert!(!rendered.contains("opcode"));
    }

    #[test]
    fn recorded_frames_get_their_own_table() {
        let painter = Painter::new(false);
        let view = FrameView::from_frame(&EXIT_FRAME).expect("frame should decode");
        let rendered = ReportView::new(&report(vec![view]), &painter).to_string();
        assert!(rendered.contains("│ packet │ unit │ opcode │"));
        assert!(rendered.contains("A5 68 32 FF 7B 00 01 00 00 00 06 1B 02 AE"));
    }
}
