#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use anyhow::Error;
use anyhow::Result;
use tracing_subscriber::EnvFilter;
use yansi::Paint;

use crate::application::cli;
use crate::application::cli::RunMode;
use crate::application::repl;
use crate::application::server;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Provider;
use crate::domain::services::Dispatcher;
use crate::domain::services::RetryPolicy;
use crate::infrastructure::providers::openai::OpenAI;

/// Text printed for a fatal error. The debug form carries the cause chain,
/// plus a backtrace when one was captured.
fn error_report(err: &Error) -> String {
    let mut res = format!(
        "Oh no! Parley has failed with the following app version and error.\n\nVersion: {}\nError: {:#}",
        env!("CARGO_PKG_VERSION"),
        err
    );

    if env::var("RUST_BACKTRACE").is_ok() {
        res = format!("{res}\n\n{err:?}");
    } else {
        let args = env::args().collect::<Vec<String>>().join(" ");
        res = format!("{res}\n\nRunning the following can help explain further what the issue is:\n\nRUST_BACKTRACE=1 {args}");
    }

    return res;
}

fn handle_error(err: Error) {
    eprintln!("{}", Paint::red(error_report(&err)));
    process::exit(1);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| return EnvFilter::new("parley=info,tower_http=info"));

    if env::var("PARLEY_LOG_JSON").is_ok() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn serve() -> Result<()> {
    let provider = OpenAI::default();
    if let Err(err) = provider.health_check().await {
        tracing::warn!(provider = provider.name(), error = %err, "Provider health check failed, requests may fail");
    }

    let request_timeout = Duration::from_millis(Config::get_u64(ConfigKey::RequestTimeout)?);
    let dispatcher = Dispatcher::new(Box::new(provider), RetryPolicy::default(), request_timeout);
    let attachment_max_bytes = Config::get_u64(ConfigKey::AttachmentMaxBytes)? as usize;

    let addr = format!(
        "{}:{}",
        Config::get(ConfigKey::Host),
        Config::get(ConfigKey::Port)
    )
    .parse::<SocketAddr>()
    .context("Host and port must form a valid socket address")?;

    let app = server::router(Arc::new(dispatcher), attachment_max_bytes);
    return server::start(addr, app).await;
}

#[tokio::main]
async fn main() {
    init_tracing();

    let mode = match cli::parse().await {
        Ok(Some(mode)) => mode,
        Ok(None) => process::exit(0),
        Err(err) => {
            handle_error(err);
            return;
        }
    };

    let res = match mode {
        RunMode::Serve => serve().await,
        RunMode::Chat => repl::start().await,
    };

    if let Err(err) = res {
        handle_error(err);
    }

    process::exit(0);
}
