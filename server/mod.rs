pub mod server_connection;
pub mod tcp_server;

// 重新导出服务端类型
pub use server_connection::ServerConnection;
pub use tcp_server::TcpServer;
