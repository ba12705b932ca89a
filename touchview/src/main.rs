use anyhow::{Context, Result};
use touchview::args::{Args, Command};
use touchview::config::Config;
use touchview::{event_loop, send};
use tracing::{info, warn};

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "touchview={log_level},touch_input={log_level},touch_protocol={log_level}"
                )
                .into()
            }),
        )
        .with_target(false)
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    info!("Starting touchview {}", env!("CARGO_PKG_VERSION"));

    match &args.command {
        Command::Listen(listen) => {
            let config = Config::from_args(args.config.as_deref(), listen)
                .context("failed to load configuration")?;
            event_loop::run(config, shutdown_signal()).await;
        }
        Command::Send(send_args) => {
            let sent = send::send(send_args).await?;
            info!("Sent {} datagrams", sent);
        }
    }

    Ok(())
}
