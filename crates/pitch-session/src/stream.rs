//! Streamed reply decoding.

use std::io::Read;

use crate::error::SessionError;

const READ_CHUNK: usize = 4096;

/// Iterator over the text chunks of a streamed reply.
///
/// Each item is the text decoded from one read of the underlying body.
/// A UTF-8 sequence split across reads is held back until it is complete;
/// invalid bytes decode to U+FFFD.
pub struct TokenStream<R> {
    reader: R,
    buf: Box<[u8]>,
    /// Bytes of an incomplete UTF-8 sequence from the previous read.
    pending: Vec<u8>,
    done: bool,
}

impl<R: Read> TokenStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: vec![0; READ_CHUNK].into_boxed_slice(),
            pending: Vec::new(),
            done: false,
        }
    }

    /// Drain the stream, calling `on_chunk` for each piece, and return the
    /// full reply.
    pub fn collect_with(
        self,
        mut on_chunk: impl FnMut(&str),
    ) -> Result<String, SessionError> {
        let mut reply = String::new();
        for chunk in self {
            let chunk = chunk?;
            on_chunk(&chunk);
            reply.push_str(&chunk);
        }
        Ok(reply)
    }

    /// Decode as much of `pending` as forms complete characters.
    fn decode_pending(&mut self, at_eof: bool) -> String {
        let mut out = String::new();
        let mut bytes = self.pending.as_slice();

        loop {
            match std::str::from_utf8(bytes) {
                Ok(text) => {
                    out.push_str(text);
                    bytes = &[];
                    break;
                }
                Err(e) => {
                    let (valid, rest) = bytes.split_at(e.valid_up_to());
                    // `valid` is the prefix from_utf8 already accepted
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            bytes = &rest[len..];
                        }
                        None if at_eof => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            bytes = &[];
                            break;
                        }
                        None => {
                            bytes = rest;
                            break;
                        }
                    }
                }
            }
        }

        self.pending = bytes.to_vec();
        out
    }
}

impl<R: Read> Iterator for TokenStream<R> {
    type Item = Result<String, SessionError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let n = match self.reader.read(&mut self.buf) {
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(SessionError::Stream(e)));
                }
            };

            if n == 0 {
                self.done = true;
                let tail = self.decode_pending(true);
                return (!tail.is_empty()).then_some(Ok(tail));
            }

            self.pending.extend_from_slice(&self.buf[..n]);
            let text = self.decode_pending(false);
            if !text.is_empty() {
                return Some(Ok(text));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io;

    /// Yields the given byte slices one per read.
    struct Chunked {
        chunks: Vec<Vec<u8>>,
    }

    impl Chunked {
        fn new(chunks: &[&[u8]]) -> Self {
            Self {
                chunks: chunks.iter().rev().map(|c| c.to_vec()).collect(),
            }
        }
    }

    impl Read for Chunked {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.chunks.pop() {
                Some(chunk) => {
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
                None => Ok(0),
            }
        }
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    fn chunks(reader: Chunked) -> Vec<String> {
        TokenStream::new(reader).map(Result::unwrap).collect()
    }

    #[test]
    fn test_chunks_are_yielded_as_read() {
        let reader = Chunked::new(&[b"What is ", b"your budget?"]);
        assert_eq!(chunks(reader), ["What is ", "your budget?"]);
    }

    #[test]
    fn test_split_multibyte_character_is_reassembled() {
        // "é" is 0xC3 0xA9
        let reader = Chunked::new(&[b"caf\xC3", b"\xA9 ready"]);
        assert_eq!(chunks(reader), ["caf", "é ready"]);
    }

    #[test]
    fn test_invalid_bytes_are_replaced() {
        let reader = Chunked::new(&[b"a\xFFb"]);
        assert_eq!(chunks(reader), ["a\u{FFFD}b"]);
    }

    #[test]
    fn test_truncated_sequence_at_eof() {
        let reader = Chunked::new(&[b"ok\xE2\x82"]);
        assert_eq!(chunks(reader), ["ok", "\u{FFFD}"]);
    }

    #[test]
    fn test_collect_with_reports_each_chunk() {
        let reader = Chunked::new(&[b"[REASONING] x\n\n", b"Next?"]);
        let mut seen = Vec::new();
        let reply = TokenStream::new(reader)
            .collect_with(|c| seen.push(c.to_owned()))
            .unwrap();
        assert_eq!(reply, "[REASONING] x\n\nNext?");
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn test_read_error_ends_stream() {
        let mut stream = TokenStream::new(Failing);
        assert!(matches!(stream.next(), Some(Err(SessionError::Stream(_)))));
        assert!(stream.next().is_none());
    }
}
