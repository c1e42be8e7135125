use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, error, info};

use crate::commands::CommandRegistry;
use crate::knn::{KnnEngine, Unit};
use crate::protocol::{parse, Frame};
use crate::Result;

/// One client connection: reads RESP commands, dispatches them through the
/// registry, writes the encoded replies back.
pub struct ServerConnection {
    stream: TcpStream,
    registry: CommandRegistry,
    buffer: Vec<u8>,
}

impl ServerConnection {
    pub fn new(stream: TcpStream, engine: Arc<KnnEngine>, default_unit: Unit) -> Self {
        Self {
            stream,
            registry: CommandRegistry::new(engine, default_unit),
            buffer: Vec::with_capacity(4096),
        }
    }

    pub async fn handle(&mut self) -> Result<()> {
        let peer_addr = self.stream.peer_addr()?;
        info!("New connection from {}", peer_addr);

        loop {
            self.buffer.clear();
            match self.read_command().await {
                Ok(0) => {
                    info!("Connection closed by {}", peer_addr);
                    break;
                }
                Ok(_) => {
                    if let Err(e) = self.process_command().await {
                        error!("Error processing command: {}", e);
                        let reply = Frame::error(format!("ERR {}", e)).encode();
                        if let Err(write_err) = self.stream.write_all(reply.as_bytes()).await {
                            error!("Failed to write error response: {}", write_err);
                            break;
                        }
                    }
                }
                Err(e) => {
                    error!("Failed to read from socket: {}", e);
                    break;
                }
            }
        }

        info!("Connection with {} closed", peer_addr);
        Ok(())
    }

    async fn read_command(&mut self) -> Result<usize> {
        let mut temp = [0; 1024];
        let bytes_read = self.stream.read(&mut temp).await?;

        if bytes_read > 0 {
            self.buffer.extend_from_slice(&temp[..bytes_read]);
            debug!(
                "Read {} bytes: {:?}",
                bytes_read,
                String::from_utf8_lossy(&self.buffer)
            );
        }

        Ok(bytes_read)
    }

    async fn process_command(&mut self) -> Result<()> {
        // 假设每次读取都是一个完整的命令
        if self.buffer.is_empty() {
            return Ok(());
        }

        let command = parse(&self.buffer)?;
        debug!("Parsed command: {:?}", command);

        let response = self.dispatch(command).await?;

        self.stream.write_all(response.as_bytes()).await?;
        debug!("Sent response: {}", response.trim_end());

        Ok(())
    }

    async fn dispatch(&self, command: Frame) -> Result<String> {
        match command {
            Frame::Array(Some(parts)) if !parts.is_empty() => {
                // 第一个元素是命令名
                if let Frame::Bulk(Some(name)) = &parts[0] {
                    self.registry.execute(name, &parts[1..]).await
                } else {
                    Ok(Frame::error("ERR invalid command format").encode())
                }
            }
            Frame::Bulk(Some(name)) => {
                // 简单命令（如直接输入 PING）
                self.registry.execute(&name, &[]).await
            }
            _ => Ok(Frame::error("ERR invalid command format").encode()),
        }
    }
}
