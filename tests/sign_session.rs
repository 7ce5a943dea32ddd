use std::io::Cursor;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use rstest::rstest;
use tokio::time::Instant;

use cpower::{
    Clock, Colour, FontSize, FormattedText, FrameCodec, FrameCodecError, GifImage, Image,
    ProtocolError, QueueError, RecordingTransport, ScrollingText, SendOutcome, SendReceipt,
    SignCommand, SignSession, StaticText, UnitId, ValidationError, WindowIndex,
    INTER_FRAME_DELAY,
};

fn window(value: u8) -> WindowIndex {
    WindowIndex::new(value).expect("window should be in range")
}

fn tiny_gif() -> GifImage {
    let mut bytes = Vec::new();
    image::DynamicImage::new_rgb8(4, 2)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Gif)
        .expect("gif should encode");
    GifImage::try_from(bytes).expect("encoded gif should be accepted")
}

fn text(value: &str) -> SignCommand {
    let text = FormattedText::styled(value, Colour::Red, FontSize::default())
        .expect("ascii text should format");
    ScrollingText::new(window(0), text).into()
}

#[tokio::test(start_paused = true)]
async fn batch_packets_are_numbered_in_order() -> anyhow::Result<()> {
    let transport = RecordingTransport::default();
    let mut session = SignSession::new(transport.clone());
    session.begin_queue();
    for value in ["one", "two", "three"] {
        session.send(&text(value)).await?;
    }
    assert_eq!(3, session.pending_len());

    let receipt = session.flush_queue(UnitId::new(4), true).await?;
    assert_eq!(3, receipt.frames_written());
    assert_eq!(0, session.pending_len());

    let frames = transport.frames();
    let headers: Vec<_> = frames
        .iter()
        .map(|frame| FrameCodec::decode_frame(frame).map(|packet| packet.header()))
        .collect::<Result<_, _>>()?;
    let numbering: Vec<(u8, u8)> = headers
        .iter()
        .map(|header| (header.sequence().index(), header.sequence().total_minus_one()))
        .collect();
    assert_eq!(vec![(0, 2), (1, 2), (2, 2)], numbering);
    assert!(
        headers
            .iter()
            .all(|header| header.unit_id() == UnitId::new(4) && header.confirmation())
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn each_frame_is_followed_by_the_inter_frame_delay() -> anyhow::Result<()> {
    let mut session = SignSession::new(RecordingTransport::default());
    session.begin_queue();
    session.send(&SignCommand::Exit).await?;
    session.send(&SignCommand::Exit).await?;

    let started = Instant::now();
    session.flush_queue(UnitId::BROADCAST, false).await?;
    assert!(started.elapsed() >= INTER_FRAME_DELAY * 2);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn transport_failure_abandons_the_rest_of_the_batch() -> anyhow::Result<()> {
    let transport = RecordingTransport::failing_after(1);
    let mut session = SignSession::new(transport.clone());
    session.begin_queue();
    for _ in 0..3 {
        session.send(&SignCommand::Exit).await?;
    }

    let result = session.flush_queue(UnitId::BROADCAST, false).await;
    assert_matches!(result, Err(ProtocolError::Transport(_)));
    assert_eq!(1, transport.frames().len());
    assert_eq!(0, session.pending_len());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn oversized_payload_writes_nothing() {
    let transport = RecordingTransport::default();
    let mut session = SignSession::new(transport.clone());
    let result = session.send_payload(vec![0; 65_536]).await;

    assert_matches!(
        result,
        Err(ProtocolError::FrameCodec(error)) if *error == FrameCodecError::PayloadTooLarge {
            payload_len: 65_536,
            max_payload_len: 65_535,
        }
    );
    assert!(transport.frames().is_empty());
}

#[tokio::test(start_paused = true)]
async fn flush_without_begin_is_rejected() {
    let transport = RecordingTransport::default();
    let mut session = SignSession::new(transport.clone());
    assert_matches!(
        session.flush_queue(UnitId::BROADCAST, false).await,
        Err(ProtocolError::Queue(error)) if *error == QueueError::NotQueueing
    );
    assert!(transport.frames().is_empty());
}

#[tokio::test(start_paused = true)]
async fn batching_stays_on_for_the_next_group() -> anyhow::Result<()> {
    let transport = RecordingTransport::default();
    let mut session = SignSession::new(transport.clone());
    session.begin_queue();
    session.send(&SignCommand::Exit).await?;
    session.send(&SignCommand::Exit).await?;
    session.flush_queue(UnitId::BROADCAST, false).await?;

    assert!(session.is_queueing());
    let outcome = session.send(&SignCommand::Exit).await?;
    assert_eq!(SendOutcome::Queued { position: 0 }, outcome);
    let receipt = session.flush_queue(UnitId::BROADCAST, false).await?;
    assert_eq!(SendReceipt::new(1, 14), receipt);

    let last = FrameCodec::decode_frame(&transport.frames()[2])?;
    assert_eq!(
        (0, 0),
        (
            last.header().sequence().index(),
            last.header().sequence().total_minus_one()
        )
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn delimiter_bytes_in_payload_are_escaped_on_the_wire() -> anyhow::Result<()> {
    let transport = RecordingTransport::default();
    let mut session = SignSession::new(transport.clone());
    session.send_payload(vec![0x0A, 0xAE, 0xA5, 0xAA]).await?;

    let frame = &transport.frames()[0];
    let inner = &frame[1..frame.len() - 1];
    assert!(!inner.contains(&0xAE));
    assert!(!inner.contains(&0xA5));
    assert_eq!(&[0xAA_u8, 0x0E, 0xAA, 0x05, 0xAA, 0x0A], &inner[10..16]);

    let packet = FrameCodec::decode_frame(frame)?;
    assert_eq!(&[0x0A_u8, 0xAE, 0xA5, 0xAA], packet.payload());
    Ok(())
}

#[rstest]
#[case::first(0)]
#[case::last(7)]
fn window_indices_cover_eight_windows(#[case] value: u8) {
    assert_eq!(value, window(value).value());
}

#[rstest]
#[case::just_past(8)]
#[case::broadcast_like(255)]
fn window_indices_past_seven_are_rejected(#[case] value: u8) {
    assert_matches!(
        WindowIndex::new(value),
        Err(ValidationError::InvalidWindow { value: rejected }) if rejected == u32::from(value)
    );
}

#[rstest]
#[case::text(text("hi"), 2)]
#[case::image(Image::builder().window(window(3)).image(tiny_gif()).build().into(), 3)]
#[case::static_text(
    StaticText::builder()
        .window(window(3))
        .text("hi".try_into().expect("ascii text"))
        .build()
        .into(),
    4
)]
#[case::clock(Clock::builder().window(window(3)).build().into(), 5)]
fn windowed_commands_carry_the_window_after_the_opcode(
    #[case] command: SignCommand,
    #[case] opcode: u8,
) {
    let payload = command.encode();
    let expected_window = if opcode == 2 { 0 } else { 3 };
    assert_eq!(&[opcode, expected_window], &payload[..2]);
}
