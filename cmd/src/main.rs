use clap::{arg, command};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use common::config::Config;

#[tokio::main]
async fn main() {
    let matches = command!()
        .arg(arg!(-c --config <FILE> "config file path").required(false))
        .get_matches();

    let default_path = String::from("./common/fixtures/devconnect.yml");
    let path = matches.get_one::<String>("config").unwrap_or(&default_path);
    let config = Config::load(path).expect("load config failed");

    // log to stdout and to a daily rolling file
    let file_appender = tracing_appender::rolling::daily(&config.log.dir, &config.log.prefix);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(EnvFilter::new(&config.log.level))
        .with(tracing_subscriber::fmt::layer().with_line_number(true))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .init();

    info!("start server on {}", config.server.server_url());
    api::start(config).await;
}
