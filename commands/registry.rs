use std::collections::HashMap;
use std::sync::Arc;

use crate::knn::{KnnEngine, Unit};
use crate::protocol::Frame;
use crate::Result;

use super::{
    basic::{PingCommand, QuitCommand},
    find::FindCommand,
    info::InfoCommand,
    CommandType,
};

/// 命令注册表，管理所有可用的命令
pub struct CommandRegistry {
    commands: HashMap<String, CommandType>,
}

impl CommandRegistry {
    /// 创建新的命令注册表
    pub fn new(engine: Arc<KnnEngine>, default_unit: Unit) -> Self {
        let mut registry = Self {
            commands: HashMap::new(),
        };

        // 注册基础命令
        registry.register(CommandType::Ping(PingCommand));
        registry.register(CommandType::Quit(QuitCommand));

        // 注册查询命令
        registry.register(CommandType::Info(InfoCommand::new(
            Arc::clone(&engine),
            default_unit,
        )));
        registry.register(CommandType::Find(FindCommand::new(
            Arc::clone(&engine),
            default_unit,
        )));

        registry
    }

    /// 注册一个命令
    pub fn register(&mut self, command: CommandType) {
        let name = command.name().to_uppercase();
        self.commands.insert(name, command);
    }

    /// 执行指定的命令
    pub async fn execute(&self, command_name: &str, args: &[Frame]) -> Result<String> {
        let name = command_name.to_uppercase();
        match self.commands.get(&name) {
            Some(command) => command.execute(args).await,
            None => Ok(format!("-ERR unknown command '{}'\r\n", command_name)),
        }
    }

    /// 获取所有注册的命令名称
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.keys().map(|s| s.as_str()).collect()
    }
}
