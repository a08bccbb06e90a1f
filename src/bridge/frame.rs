//! SSE framing of agent chunks.

use bytes::{BufMut, Bytes, BytesMut};

/// Field prefix of every data line.
pub const DATA_PREFIX: &[u8] = b"data: ";

/// Frame one chunk as an SSE event.
///
/// Returns `None` for an empty chunk: those are dropped, never sent as an
/// empty event. A single-line chunk becomes `data: <chunk>\n\n`. Each line
/// of a multi-line chunk (split on `\n`, `\r\n` or `\r`) gets its own
/// `data: ` prefix so the event still parses back to the original text.
pub fn encode_event(chunk: &str) -> Option<Bytes> {
    if chunk.is_empty() {
        return None;
    }

    let mut frame = BytesMut::with_capacity(chunk.len() + DATA_PREFIX.len() + 2);
    for line in lines(chunk) {
        frame.put_slice(DATA_PREFIX);
        frame.put_slice(line.as_bytes());
        frame.put_u8(b'\n');
    }
    frame.put_u8(b'\n');
    Some(frame.freeze())
}

fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .flat_map(|line| line.split('\r'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn framed(chunk: &str) -> String {
        String::from_utf8(encode_event(chunk).unwrap().to_vec()).unwrap()
    }

    #[test]
    fn test_single_line() {
        assert_eq!(framed("Hello"), "data: Hello\n\n");
        assert_eq!(framed(" World"), "data:  World\n\n");
    }

    #[test]
    fn test_empty_chunk_dropped() {
        assert!(encode_event("").is_none());
    }

    #[test]
    fn test_multi_line_split() {
        assert_eq!(framed("a\nb"), "data: a\ndata: b\n\n");
        assert_eq!(framed("a\r\nb"), "data: a\ndata: b\n\n");
        assert_eq!(framed("a\rb"), "data: a\ndata: b\n\n");
    }

    #[test]
    fn test_line_breaks_only() {
        assert_eq!(framed("\n"), "data: \ndata: \n\n");
        assert_eq!(framed("end\n"), "data: end\ndata: \n\n");
    }
}
