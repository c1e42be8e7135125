use std::io::{self, Write};

use locus::client::{CliArgs, ClientConnection, OutputFormatter};
use locus::Result;

fn main() -> Result<()> {
    let args = CliArgs::parse_args();

    // 验证参数
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // 创建连接
    let mut connection = ClientConnection::new(&args.host, args.port);

    if args.should_run_interactive() {
        // 交互模式
        run_interactive_mode(&mut connection, &args.host, args.port)?;
    } else {
        // 直接命令模式
        run_command_mode(&mut connection, &args.command)?;
    }

    Ok(())
}

fn run_command_mode(connection: &mut ClientConnection, command: &[String]) -> Result<()> {
    // 连接到服务器
    connection.connect()?;

    // 执行命令
    let response = connection.send_command(command)?;

    // 格式化并输出结果
    let formatted = OutputFormatter::format_response(&response);
    println!("{}", formatted);

    // 断开连接
    connection.disconnect()?;

    Ok(())
}

fn run_interactive_mode(connection: &mut ClientConnection, host: &str, port: u16) -> Result<()> {
    println!("locus-cli interactive mode");
    println!("{}", OutputFormatter::format_connecting_message(host, port));

    // 连接到服务器
    match connection.connect() {
        Ok(_) => println!("{}", OutputFormatter::format_connected_message(host, port)),
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            return Ok(());
        }
    }

    println!("Type 'HELP' for available commands, 'QUIT' to exit.");
    println!();

    let stdin = io::stdin();

    loop {
        // 显示提示符
        print!("{}", OutputFormatter::format_prompt(host, port));
        io::stdout().flush()?;

        // 读取用户输入
        let mut input = String::new();
        match stdin.read_line(&mut input) {
            Ok(0) => {
                // EOF (Ctrl+D)
                println!();
                break;
            }
            Ok(_) => {
                let input = input.trim();
                if input.is_empty() {
                    continue;
                }

                // HELP 在客户端处理
                if input.eq_ignore_ascii_case("help") {
                    println!("{}", OutputFormatter::format_help_message());
                    continue;
                }

                let parts: Vec<String> = input.split_whitespace().map(String::from).collect();
                let is_quit = parts[0].eq_ignore_ascii_case("quit");

                match connection.send_command(&parts) {
                    Ok(response) => {
                        println!("{}", OutputFormatter::format_response(&response));
                    }
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        break;
                    }
                }

                if is_quit {
                    break;
                }
            }
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                break;
            }
        }
    }

    connection.disconnect()?;
    println!("{}", OutputFormatter::format_disconnected_message());

    Ok(())
}
