use crate::protocol::frame::Frame;
use crate::Result;

/// Decode one frame from a byte buffer.
///
/// Trailing bytes after the first complete frame are ignored; the
/// connection layer hands over one command at a time.
pub fn parse(input: &[u8]) -> Result<Frame> {
    Reader::new(input).frame()
}

struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a [u8]) -> Self {
        Reader { input, pos: 0 }
    }

    fn frame(&mut self) -> Result<Frame> {
        let line = self.line()?;
        let kind = line[0];
        let rest = std::str::from_utf8(&line[1..])?;

        match kind {
            b'+' => Ok(Frame::Simple(rest.to_string())),
            b'-' => Ok(Frame::Error(rest.to_string())),
            b':' => Ok(Frame::Integer(rest.parse()?)),
            b'$' => {
                let len: i64 = rest.parse()?;
                if len < 0 {
                    return Ok(Frame::Bulk(None));
                }
                let payload = self.take(len as usize)?;
                self.expect_crlf()?;
                Ok(Frame::Bulk(Some(String::from_utf8(payload.to_vec())?)))
            }
            b'*' => {
                let len: i64 = rest.parse()?;
                if len < 0 {
                    return Ok(Frame::Array(None));
                }
                let mut items = Vec::with_capacity(len as usize);
                for _ in 0..len {
                    items.push(self.frame()?);
                }
                Ok(Frame::Array(Some(items)))
            }
            other => Err(format!("unknown RESP type prefix: {:?}", other as char).into()),
        }
    }

    /// Next line up to CRLF (bare LF tolerated), without the terminator.
    fn line(&mut self) -> Result<&'a [u8]> {
        let start = self.pos;
        while self.pos < self.input.len() && self.input[self.pos] != b'\n' {
            self.pos += 1;
        }
        if self.pos == self.input.len() {
            return Err("unexpected end of input".into());
        }

        let mut end = self.pos;
        self.pos += 1; // consume the newline
        if end > start && self.input[end - 1] == b'\r' {
            end -= 1;
        }
        if end == start {
            return Err("empty line in RESP stream".into());
        }

        Ok(&self.input[start..end])
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.input.len() {
            return Err("bulk string shorter than its declared length".into());
        }
        let slice = &self.input[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn expect_crlf(&mut self) -> Result<()> {
        if self.input[self.pos..].starts_with(b"\r\n") {
            self.pos += 2;
            Ok(())
        } else if self.input[self.pos..].starts_with(b"\n") {
            self.pos += 1;
            Ok(())
        } else {
            Err("bulk string not terminated by CRLF".into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_string() {
        assert_eq!(parse(b"+PONG\r\n").unwrap(), Frame::simple("PONG"));
    }

    #[test]
    fn test_parse_error() {
        assert_eq!(
            parse(b"-ERR count must be greater than 0\r\n").unwrap(),
            Frame::error("ERR count must be greater than 0")
        );
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse(b":420\r\n").unwrap(), Frame::Integer(420));
    }

    #[test]
    fn test_parse_bulk_string() {
        assert_eq!(parse(b"$4\r\nFIND\r\n").unwrap(), Frame::bulk("FIND"));
        assert_eq!(parse(b"$0\r\n\r\n").unwrap(), Frame::bulk(""));
        assert_eq!(parse(b"$-1\r\n").unwrap(), Frame::Bulk(None));
    }

    #[test]
    fn test_parse_command_array() {
        let parsed = parse(b"*3\r\n$4\r\nFIND\r\n$5\r\nPOINT\r\n$4\r\n34.1\r\n").unwrap();
        assert_eq!(
            parsed,
            Frame::array(vec![
                Frame::bulk("FIND"),
                Frame::bulk("POINT"),
                Frame::bulk("34.1"),
            ])
        );
    }

    #[test]
    fn test_parse_null_array() {
        assert_eq!(parse(b"*-1\r\n").unwrap(), Frame::Array(None));
    }

    #[test]
    fn test_roundtrip() {
        let frame = Frame::array(vec![
            Frame::bulk("FIND"),
            Frame::Integer(3),
            Frame::Bulk(None),
        ]);
        assert_eq!(parse(frame.encode().as_bytes()).unwrap(), frame);
    }

    #[test]
    fn test_truncated_input_rejected() {
        assert!(parse(b"$10\r\nshort\r\n").is_err());
        assert!(parse(b"*2\r\n$4\r\nFIND\r\n").is_err());
        assert!(parse(b"").is_err());
    }

    #[test]
    fn test_unknown_prefix_rejected() {
        assert!(parse(b"?what\r\n").is_err());
    }
}
