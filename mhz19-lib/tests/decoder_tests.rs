//! Tests for stream decoding: framing, resynchronization and semantic decode

mod common;

use common::*;

#[test]
fn test_firmware_version_response() {
    let bytes = hex_to_bytes(FIRMWARE_0443_RESPONSE);
    let events = decode_chunks([bytes.as_slice()]);

    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.code, CommandCode::GetFirmwareVersion);
    assert_eq!(event.version(), Some("0443"));
    assert_eq!(event.parse_error, None);
    assert_eq!(event.raw, [0x30, 0x34, 0x34, 0x33, 0x00, 0x00]);
    assert_eq!(event.checksum, 0x95);
}

#[test]
fn test_abc_response() {
    let bytes = hex_to_bytes(ABC_ON_RESPONSE);
    let events = decode_chunks([bytes.as_slice()]);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].code, CommandCode::GetAbc);
    assert_eq!(events[0].reading, Some(Reading::Abc(true)));
}

#[test]
fn test_single_garbage_byte_before_frame() {
    let mut bytes = vec![0x00];
    bytes.extend(hex_to_bytes(ABC_ON_RESPONSE));

    let events = decode_chunks([bytes.as_slice()]);
    let expected = decode_chunks([hex_to_bytes(ABC_ON_RESPONSE).as_slice()]);

    assert_eq!(events.len(), 1);
    assert_eq!(events, expected);
}

#[test]
fn test_garbage_prefix_of_any_length() {
    let frame = hex_to_bytes(FIRMWARE_0443_RESPONSE);
    let expected = decode_chunks([frame.as_slice()]);

    for k in 0..32 {
        // stray header bytes and noise, none of which completes a valid window
        let mut bytes: Vec<u8> = (0..k).map(|i| if i % 3 == 0 { 0xFF } else { i as u8 }).collect();
        bytes.extend_from_slice(&frame);

        let events = decode_chunks([bytes.as_slice()]);
        assert_eq!(events, expected, "garbage prefix of {k} bytes");
    }
}

#[test]
fn test_fragmentation_invariance() {
    let mut stream = hex_to_bytes(FIRMWARE_0443_RESPONSE);
    stream.extend(hex_to_bytes(ABC_ON_RESPONSE));
    stream.push(0x42);
    stream.extend(Frame::response(CommandCode::GetAbc, [0; 6]).as_bytes());

    let whole = decode_chunks([stream.as_slice()]);
    assert_eq!(whole.len(), 3);

    // every fixed chunk size
    for size in 1..=stream.len() {
        let events = decode_chunks(stream.chunks(size));
        assert_eq!(events, whole, "chunk size {size}");
    }

    // every single split point
    for split in 1..stream.len() {
        let (head, tail) = stream.split_at(split);
        let events = decode_chunks([head, tail]);
        assert_eq!(events, whole, "split at {split}");
    }
}

#[test]
fn test_empty_chunks_are_noops() {
    let frame = hex_to_bytes(ABC_ON_RESPONSE);
    let empty: &[u8] = &[];
    let events = decode_chunks([empty, &frame[..4], empty, &frame[4..], empty]);
    assert_eq!(events.len(), 1);
}

#[test]
fn test_incomplete_frame_is_kept() {
    let frame = hex_to_bytes(ABC_ON_RESPONSE);
    let mut count = 0;
    let mut decoder = FrameDecoder::new(|_event: Event| count += 1);

    decoder.feed(&frame[..8]);
    assert_eq!(decoder.buffered(), 8);

    decoder.feed(&frame[8..]);
    assert_eq!(decoder.buffered(), 0);
    drop(decoder);
    assert_eq!(count, 1);
}

#[test]
fn test_resync_drops_bytes_until_fewer_than_a_frame_remain() {
    let mut count = 0;
    let mut decoder = FrameDecoder::new(|_event: Event| count += 1);

    decoder.feed(&[0x11; 20]);
    // 12 bytes dropped one by one, the last 8 wait for more input
    assert_eq!(decoder.buffered(), 8);

    decoder.clear();
    assert_eq!(decoder.buffered(), 0);
    drop(decoder);
    assert_eq!(count, 0);
}

#[test]
fn test_bad_checksum_is_skipped() {
    let mut corrupted = hex_to_bytes(ABC_ON_RESPONSE);
    corrupted[8] ^= 0x01;
    let good = hex_to_bytes(FIRMWARE_0443_RESPONSE);

    let mut stream = corrupted;
    stream.extend(&good);

    let events = decode_chunks([stream.as_slice()]);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].code, CommandCode::GetFirmwareVersion);
}

#[test]
fn test_checksum_acceptance_matches_decoder() {
    // flip the checksum byte through all values: exactly one is accepted
    let base = hex_to_bytes(ABC_ON_RESPONSE);
    let mut accepted = Vec::new();
    for cs in 0..=u8::MAX {
        let mut candidate = base.clone();
        candidate[8] = cs;
        if !decode_chunks([candidate.as_slice()]).is_empty() {
            accepted.push(cs);
        }
        assert_eq!(
            Frame::parse(&candidate).is_ok(),
            cs == checksum(&candidate[1..8]),
            "checksum {cs:#04x}"
        );
    }
    assert_eq!(accepted, vec![0x82]);
}

#[test]
fn test_non_ascii_version_sets_parse_error() {
    let frame = Frame::response(CommandCode::GetFirmwareVersion, [0x30, 0xC3, 0xA9, 0x33, 0, 0]);
    let events = decode_chunks([frame.as_bytes().as_slice()]);

    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.code, CommandCode::GetFirmwareVersion);
    assert_eq!(event.version(), None);
    let error = event.parse_error.as_deref().expect("parse error expected");
    assert!(error.contains("ASCII"), "unexpected error: {error}");
}

#[test]
fn test_events_are_emitted_in_arrival_order() {
    let codes = [
        CommandCode::GetAbc,
        CommandCode::Reset,
        CommandCode::SetAbc,
        CommandCode::GetFirmwareVersion,
    ];
    let mut stream = Vec::new();
    for code in codes {
        stream.extend_from_slice(Frame::response(code, *b"0000\0\0").as_bytes());
    }

    let events = decode_chunks([stream.as_slice()]);
    let decoded: Vec<CommandCode> = events.iter().map(|e| e.code).collect();
    assert_eq!(decoded, codes);
}

#[test]
fn test_sink_accessors() {
    let mut decoder = FrameDecoder::new(Collect::default());
    decoder.feed(&hex_to_bytes(ABC_ON_RESPONSE));
    assert_eq!(decoder.sink().events.len(), 1);
    decoder.sink_mut().events.clear();
    assert!(decoder.into_sink().events.is_empty());
}

/// A named sink, for tests that inspect events through the decoder
#[derive(Default)]
struct Collect {
    events: Vec<Event>,
}

impl EventSink for Collect {
    fn on_event(&mut self, event: Event) {
        self.events.push(event);
    }
}
