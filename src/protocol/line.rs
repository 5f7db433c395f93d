//! Bounded line reading
//!
//! Sessions read client input one line at a time. The reader tolerates bare
//! LF as well as CRLF, strips surrounding whitespace (clients vary), and
//! replaces invalid UTF-8 instead of failing the session over it. A line
//! longer than the configured maximum is an error; the caller closes the
//! connection without trying to resynchronize.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

/// Reads trimmed text lines from any buffered byte stream
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    max_line: usize,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    /// Create a reader that accepts lines up to `max_line` bytes of content
    pub fn new(inner: R, max_line: usize) -> Self {
        Self { inner, max_line }
    }

    /// Read the next line.
    ///
    /// Returns `None` on end of stream. A final line without a terminator is
    /// still returned (the peer may close right after writing). The length
    /// bound is on content bytes, after the terminator is stripped, so CRLF
    /// and bare LF enforce the same maximum.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut raw = Vec::new();
        // +2 leaves room for the CRLF terminator itself
        let limit = self.max_line as u64 + 2;
        let n = (&mut self.inner)
            .take(limit)
            .read_until(b'\n', &mut raw)
            .await?;

        if n == 0 {
            return Ok(None);
        }

        let mut content: &[u8] = &raw;
        if let Some(rest) = content.strip_suffix(b"\n") {
            content = rest;
        }
        if let Some(rest) = content.strip_suffix(b"\r") {
            content = rest;
        }
        if content.len() > self.max_line {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line exceeds {} bytes", self.max_line),
            ));
        }

        Ok(Some(String::from_utf8_lossy(content).trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::BufReader;
    use tokio_test::io::Builder;

    use super::*;

    fn reader(mock: tokio_test::io::Mock, max_line: usize) -> LineReader<BufReader<tokio_test::io::Mock>> {
        LineReader::new(BufReader::new(mock), max_line)
    }

    #[tokio::test]
    async fn test_reads_crlf_line() {
        let mock = Builder::new().read(b"hello\r\n").build();
        let mut lines = reader(mock, 1024);

        assert_eq!(lines.next_line().await.unwrap(), Some("hello".to_string()));
        assert_eq!(lines.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reads_bare_lf_and_trims_whitespace() {
        let mock = Builder::new().read(b"  spaced  \n").build();
        let mut lines = reader(mock, 1024);

        assert_eq!(lines.next_line().await.unwrap(), Some("spaced".to_string()));
    }

    #[tokio::test]
    async fn test_multiple_lines_in_one_chunk() {
        let mock = Builder::new().read(b"one\r\ntwo\r\n").build();
        let mut lines = reader(mock, 1024);

        assert_eq!(lines.next_line().await.unwrap(), Some("one".to_string()));
        assert_eq!(lines.next_line().await.unwrap(), Some("two".to_string()));
        assert_eq!(lines.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_final_line_without_terminator() {
        let mock = Builder::new().read(b"partial").build();
        let mut lines = reader(mock, 1024);

        assert_eq!(lines.next_line().await.unwrap(), Some("partial".to_string()));
        assert_eq!(lines.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_oversized_line_is_an_error() {
        let mock = Builder::new().read(b"0123456789abcdef\r\n").build();
        let mut lines = reader(mock, 4);

        let err = lines.next_line().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_line_exactly_at_limit_is_accepted() {
        let mock = Builder::new().read(b"abcd\r\n").build();
        let mut lines = reader(mock, 4);

        assert_eq!(lines.next_line().await.unwrap(), Some("abcd".to_string()));
    }

    #[tokio::test]
    async fn test_oversized_lf_only_line_is_an_error() {
        // One content byte over the limit, with the shorter terminator
        let mock = Builder::new().read(b"abcde\n").build();
        let mut lines = reader(mock, 4);

        let err = lines.next_line().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_lf_only_line_at_limit_is_accepted() {
        let mock = Builder::new().read(b"abcd\n").build();
        let mut lines = reader(mock, 4);

        assert_eq!(lines.next_line().await.unwrap(), Some("abcd".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced_not_fatal() {
        let mock = Builder::new().read(b"caf\xff\r\n").build();
        let mut lines = reader(mock, 1024);

        let line = lines.next_line().await.unwrap().unwrap();
        assert!(line.starts_with("caf"));
    }
}
