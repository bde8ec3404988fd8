use httpwire::{format_http_date, parse_http_date, HttpDate, Limits, Phase, RequestDecoder};
use proptest::prelude::*;

fn chunked_request(chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"POST /x HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n");
    for chunk in chunks {
        out.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        out.extend_from_slice(chunk);
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"0\r\n\r\n");
    out
}

proptest! {
    /// Feeding a request one byte at a time must end in the same finished
    /// state, with the same decoded body, as feeding it in one call.
    #[test]
    fn byte_at_a_time_matches_one_shot(chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..12), 0..6)) {
        let raw = chunked_request(&chunks);

        let mut one_shot = RequestDecoder::new(Limits::default());
        one_shot.decode(&raw).unwrap();

        let mut incremental = RequestDecoder::new(Limits::default());
        for &byte in &raw {
            incremental.decode(&[byte]).unwrap();
        }

        prop_assert_eq!(one_shot.phase(), Phase::Finished);
        prop_assert_eq!(incremental.phase(), Phase::Finished);

        let expected: Vec<u8> = chunks.into_iter().flatten().collect();
        let one_shot_body: Vec<u8> = one_shot.body_chunks().into_iter().flat_map(|c| c.to_vec()).collect();
        let incremental_body: Vec<u8> = incremental.body_chunks().into_iter().flat_map(|c| c.to_vec()).collect();
        prop_assert_eq!(&one_shot_body, &expected);
        prop_assert_eq!(&incremental_body, &expected);
    }

    /// No input, however it's sliced, should ever panic the decoder; it
    /// may only return `Ok` or a well-formed `Err`.
    #[test]
    fn decoder_never_panics_on_arbitrary_bytes(input in prop::collection::vec(any::<u8>(), 0..64)) {
        let mut d = RequestDecoder::new(Limits::default());
        let _ = d.decode(&input);
    }

    /// A valid in-range calendar instant always round-trips through
    /// `format_http_date` -> `parse_http_date`.
    #[test]
    fn http_date_round_trips(
        year in 1970u16..2100,
        month in 1u8..=12,
        day in 1u8..=28,
        hour in 0u8..24,
        minute in 0u8..60,
        second in 0u8..60,
    ) {
        let date = HttpDate::new(year, month, day, hour, minute, second).unwrap();
        let formatted = format_http_date(&date);
        prop_assert_eq!(parse_http_date(&formatted), Some(date));
    }
}
