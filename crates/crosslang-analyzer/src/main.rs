use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use clap::Parser;
use tower_lsp::{LspService, Server};
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crosslang_analyzer::CrossLangServer;

#[derive(Parser, Debug)]
#[command(name = "crosslang-analyzer", version, about)]
struct Args {
    /// Debug-level logging for both stderr and the log file.
    #[arg(long, short)]
    verbose: bool,

    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn default_log_path() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        let dir = PathBuf::from(home).join(".crosslang-analyzer");
        if std::fs::create_dir_all(&dir).is_ok() {
            return dir.join("crosslang-analyzer.log");
        }
    }
    std::env::temp_dir().join("crosslang-analyzer.log")
}

fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("crosslang_analyzer=debug,tower_lsp=info")
    } else {
        EnvFilter::new("crosslang_analyzer=info,tower_lsp=warn")
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let log_path = args.log_file.clone().unwrap_or_else(default_log_path);

    let file_appender = tracing_appender::rolling::never(
        log_path.parent().unwrap_or(Path::new(".")),
        log_path.file_name().unwrap_or(OsStr::new("crosslang-analyzer.log")),
    );

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(false)
        .with_filter(log_filter(args.verbose));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_filter(log_filter(args.verbose));

    tracing_subscriber::registry().with(file_layer).with(stderr_layer).init();

    info!("Starting crosslang-analyzer v{}", env!("CARGO_PKG_VERSION"));
    info!("Log file: {}", log_path.display());

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    let (service, socket) = LspService::new(CrossLangServer::new);
    Server::new(stdin, stdout, socket).serve(service).await;

    info!("crosslang-analyzer stopped");
}
