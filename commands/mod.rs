pub mod args;
pub mod basic;
pub mod find;
pub mod info;
pub mod registry;

use crate::protocol::Frame;
use crate::Result;

use basic::{PingCommand, QuitCommand};
use find::FindCommand;
use info::InfoCommand;

// 重新导出常用的类型
pub use args::{ArgumentParser, FindArgs};
pub use registry::CommandRegistry;

pub trait Command {
    fn name(&self) -> &'static str;
    fn execute(&self, args: &[Frame]) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub enum CommandType {
    Ping(PingCommand),
    Info(InfoCommand),
    Find(FindCommand),
    Quit(QuitCommand),
}

impl CommandType {
    fn name(&self) -> &'static str {
        match self {
            CommandType::Ping(cmd) => cmd.name(),
            CommandType::Info(cmd) => cmd.name(),
            CommandType::Find(cmd) => cmd.name(),
            CommandType::Quit(cmd) => cmd.name(),
        }
    }

    async fn execute(&self, args: &[Frame]) -> Result<String> {
        match self {
            CommandType::Ping(cmd) => cmd.execute(args).await,
            CommandType::Info(cmd) => cmd.execute(args).await,
            CommandType::Find(cmd) => cmd.execute(args).await,
            CommandType::Quit(cmd) => cmd.execute(args).await,
        }
    }
}
