use std::io::{Read, Write};
use std::net::TcpStream;

use crate::protocol::{parse, Frame};
use crate::Result;

/// Blocking client-side connection to a locus server.
pub struct ClientConnection {
    stream: Option<TcpStream>,
    host: String,
    port: u16,
}

impl ClientConnection {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            stream: None,
            host: host.to_string(),
            port,
        }
    }

    pub fn connect(&mut self) -> Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let stream = TcpStream::connect(&addr)?;
        self.stream = Some(stream);
        Ok(())
    }

    /// Send one command (name plus arguments) and decode the reply.
    pub fn send_command(&mut self, cmd: &[String]) -> Result<Frame> {
        if self.stream.is_none() {
            self.connect()?;
        }

        let request = encode_command(cmd);
        let stream = self.stream.as_mut().expect("connected above");

        stream.write_all(request.as_bytes())?;

        // 读取响应，以 \r\n 结尾视为完整
        let mut buffer = Vec::new();
        let mut chunk = [0; 4096];
        loop {
            let n = stream.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..n]);

            if buffer.ends_with(b"\r\n") {
                break;
            }
        }

        parse(&buffer)
    }

    pub fn disconnect(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            stream.shutdown(std::net::Shutdown::Both)?;
        }
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

/// Commands travel as RESP arrays of bulk strings.
fn encode_command(cmd: &[String]) -> String {
    Frame::Array(Some(
        cmd.iter().map(|arg| Frame::bulk(arg.clone())).collect(),
    ))
    .encode()
}
