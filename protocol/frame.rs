/// A single RESP protocol frame, either side of the wire.
///
/// The server replies with encoded frames; the client encodes commands as
/// arrays of bulk strings and decodes whatever comes back.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Simple(String),
    Error(String),
    Integer(i64),
    Bulk(Option<String>),
    Array(Option<Vec<Frame>>),
}

impl Frame {
    pub fn simple(s: impl Into<String>) -> Frame {
        Frame::Simple(s.into())
    }

    pub fn error(msg: impl Into<String>) -> Frame {
        Frame::Error(msg.into())
    }

    pub fn bulk(s: impl Into<String>) -> Frame {
        Frame::Bulk(Some(s.into()))
    }

    pub fn array(items: Vec<Frame>) -> Frame {
        Frame::Array(Some(items))
    }

    /// Serialize to the RESP wire representation.
    pub fn encode(&self) -> String {
        match self {
            Frame::Simple(s) => format!("+{}\r\n", s),
            Frame::Error(msg) => format!("-{}\r\n", msg),
            Frame::Integer(n) => format!(":{}\r\n", n),
            Frame::Bulk(Some(s)) => format!("${}\r\n{}\r\n", s.len(), s),
            Frame::Bulk(None) => "$-1\r\n".to_string(),
            Frame::Array(Some(items)) => {
                let mut out = format!("*{}\r\n", items.len());
                for item in items {
                    out.push_str(&item.encode());
                }
                out
            }
            Frame::Array(None) => "*-1\r\n".to_string(),
        }
    }
}
