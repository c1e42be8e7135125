pub mod cli_args;
pub mod client_connection;
pub mod formatter;

// 重新导出客户端类型
pub use cli_args::CliArgs;
pub use client_connection::ClientConnection;
pub use formatter::OutputFormatter;
