use httpwire::{ErrorKind, Event, Limits, Phase, ResponseDecoder};

fn body_of(d: &ResponseDecoder) -> Vec<u8> {
    d.body_chunks().into_iter().flat_map(|c| c.to_vec()).collect()
}

#[test]
fn simple_response_with_content_length() {
    let mut d = ResponseDecoder::new(Limits::default(), false);
    let events = d.decode(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi").unwrap();
    assert_eq!(d.phase(), Phase::Finished);
    assert!(events.contains(&Event::MessageComplete));
    assert_eq!(d.status_line().unwrap().status_code, 200);
    assert_eq!(d.status_line().unwrap().status_text, "OK");
    assert_eq!(body_of(&d), b"hi");
}

#[test]
fn bodiless_1xx_status_skips_body_framing() {
    let mut d = ResponseDecoder::new(Limits::default(), false);
    d.decode(b"HTTP/1.1 101 Switching Protocols\r\nUpgrade: websocket\r\n\r\n").unwrap();
    assert_eq!(d.phase(), Phase::Finished);
}

#[test]
fn bodiless_204_skips_body_even_with_content_length_header() {
    let mut d = ResponseDecoder::new(Limits::default(), false);
    d.decode(b"HTTP/1.1 204 No Content\r\nContent-Length: 50\r\n\r\n").unwrap();
    assert_eq!(d.phase(), Phase::Finished);
    assert!(body_of(&d).is_empty());
}

#[test]
fn bodiless_304_skips_body_framing() {
    let mut d = ResponseDecoder::new(Limits::default(), false);
    d.decode(b"HTTP/1.1 304 Not Modified\r\n\r\n").unwrap();
    assert_eq!(d.phase(), Phase::Finished);
}

#[test]
fn head_response_hint_skips_body_even_with_content_length() {
    let mut d = ResponseDecoder::new(Limits::default(), true);
    d.decode(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n").unwrap();
    assert_eq!(d.phase(), Phase::Finished);
    assert!(body_of(&d).is_empty());
}

#[test]
fn chunked_response_with_trailers() {
    let raw: &[u8] = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n5\r\npedia\r\n0\r\nX-Checksum: abc\r\n\r\n";
    let mut d = ResponseDecoder::new(Limits::default(), false);
    let events = d.decode(raw).unwrap();
    assert_eq!(body_of(&d), b"Wikipedia");
    assert!(events.contains(&Event::TrailersComplete));
}

#[test]
fn response_without_length_or_chunking_reads_until_close() {
    let mut d = ResponseDecoder::new(Limits::default(), false);
    d.decode(b"HTTP/1.1 200 OK\r\n\r\nsome body bytes").unwrap();
    assert_eq!(d.phase(), Phase::BodyEof);
    d.decode(b" more bytes").unwrap();
    assert_eq!(d.phase(), Phase::BodyEof);
    let events = d.finish_on_close();
    assert_eq!(d.phase(), Phase::Finished);
    assert!(events.contains(&Event::MessageComplete));
    assert_eq!(body_of(&d), b"some body bytes more bytes");
}

#[test]
fn finish_on_close_is_a_no_op_outside_body_eof() {
    let mut d = ResponseDecoder::new(Limits::default(), false);
    d.decode(b"HTTP/1.1 204 No Content\r\n\r\n").unwrap();
    assert_eq!(d.phase(), Phase::Finished);
    assert!(d.finish_on_close().is_empty());
}

#[test]
fn invalid_content_length_errors_for_responses() {
    let mut d = ResponseDecoder::new(Limits::default(), false);
    let err = d.decode(b"HTTP/1.1 200 OK\r\nContent-Length: not-a-number\r\n\r\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidContentLength);
}

#[test]
fn strict_smuggling_mode_rejects_conflicting_framing() {
    let raw: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\nTransfer-Encoding: chunked\r\n\r\n";
    let mut d = ResponseDecoder::with_options(Limits::default(), false, true);
    let err = d.decode(raw).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConflictingFraming);
    assert_eq!(d.phase(), Phase::Error);
}
