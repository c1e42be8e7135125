use clap::Parser;
use locus::server::TcpServer;
use locus::store::StoreDataset;
use locus::{KnnEngine, LocusConfig, Result};
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = "locus.toml")]
    config: String,

    /// 生成默认配置文件并退出
    #[arg(long)]
    generate_config: bool,

    /// Host to bind to (overrides config file)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Dataset file to serve (overrides config file)
    #[arg(short, long)]
    dataset: Option<std::path::PathBuf>,

    /// Log level (overrides config file)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 生成默认配置文件
    if args.generate_config {
        let config = LocusConfig::default();
        config.save_to_file(&args.config)?;
        println!("✅ Generated default configuration: {}", args.config);
        println!("📝 You can edit this file and restart the server.");
        return Ok(());
    }

    // 加载配置
    let mut config = LocusConfig::from_file(&args.config)?;

    // 命令行参数覆盖配置文件
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dataset) = args.dataset {
        config.dataset.path = dataset;
    }
    if let Some(log_level) = args.log_level {
        config.logging.level = log_level;
    }

    // 验证配置
    config.validate()?;

    // 初始化日志系统
    init_logging(&config.logging);

    info!("🚀 Starting Locus server...");
    info!("📦 Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    // 打印配置摘要
    config.print_summary();

    // 加载数据集并预先构建索引，避免第一个查询承担构建延迟
    info!("📖 Loading dataset from {}...", config.dataset.path.display());
    let dataset = StoreDataset::load(&config.dataset.path)?;
    info!("✅ Loaded {} stores", dataset.len());

    let default_unit = config.default_unit()?;
    let engine = KnnEngine::with_leaf_size(dataset, config.dataset.leaf_size)?;
    info!(
        "🌲 Built spatial index: {} points, depth {}",
        engine.len(),
        engine.depth()
    );

    info!(
        "🌐 Server listening on {}:{}",
        config.server.host, config.server.port
    );
    println!();

    // 启动服务器（传入配置和已构建的引擎）
    let server = TcpServer::new(config, engine, default_unit);
    server.start().await?;

    Ok(())
}

/// 初始化日志系统
fn init_logging(config: &locus::config::LoggingConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    match config.output.as_str() {
        "file" => {
            if let Some(log_file) = &config.log_file {
                // 确保日志目录存在
                if let Some(parent) = log_file.parent() {
                    let _ = std::fs::create_dir_all(parent);
                }

                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(log_file)
                    .expect("Failed to open log file");

                tracing_subscriber::registry()
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(file)
                            .with_target(false),
                    )
                    .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                    .init();
            }
        }
        _ => {
            tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().with_target(false))
                .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                .init();
        }
    }
}
