use crate::commands::Command;
use crate::protocol::Frame;
use crate::Result;

pub struct PingCommand;

impl Command for PingCommand {
    fn name(&self) -> &'static str {
        "PING"
    }

    fn execute(&self, args: &[Frame]) -> impl std::future::Future<Output = Result<String>> + Send {
        let reply = match args.len() {
            0 => Frame::simple("PONG"),
            1 => match &args[0] {
                Frame::Bulk(Some(msg)) => Frame::bulk(msg.clone()),
                _ => Frame::error("ERR wrong argument type"),
            },
            _ => Frame::error("ERR wrong number of arguments for 'ping' command"),
        };

        async move { Ok(reply.encode()) }
    }
}

pub struct QuitCommand;

impl Command for QuitCommand {
    fn name(&self) -> &'static str {
        "QUIT"
    }

    fn execute(&self, _args: &[Frame]) -> impl std::future::Future<Output = Result<String>> + Send {
        async { Ok(Frame::simple("OK").encode()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ping_no_args() {
        let result = PingCommand.execute(&[]).await.unwrap();
        assert_eq!(result, "+PONG\r\n");
    }

    #[tokio::test]
    async fn test_ping_echoes_message() {
        let args = vec![Frame::bulk("hello")];
        let result = PingCommand.execute(&args).await.unwrap();
        assert_eq!(result, "$5\r\nhello\r\n");
    }

    #[tokio::test]
    async fn test_ping_too_many_args() {
        let args = vec![Frame::bulk("a"), Frame::bulk("b")];
        let result = PingCommand.execute(&args).await.unwrap();
        assert!(result.starts_with('-'));
    }

    #[tokio::test]
    async fn test_quit() {
        let result = QuitCommand.execute(&[]).await.unwrap();
        assert_eq!(result, "+OK\r\n");
    }
}
