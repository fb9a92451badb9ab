// SPDX-License-Identifier: MPL-2.0
use property_notifications::app::{App, AppSettings};
use property_notifications::application::clock::SystemClock;
use property_notifications::application::scheduler::Scheduler;
use property_notifications::application::store::{NotificationStore, StoreSettings};
use property_notifications::config::{self, Config};
use property_notifications::infrastructure::HttpNotificationApi;
use property_notifications::logging;
use property_notifications::ui::notifications::ToastId;
use std::collections::HashSet;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

const HELP: &str = "\
property-notifications

Polls the notification API and logs unread counts and toasts.

USAGE:
  property-notifications [OPTIONS]

OPTIONS:
  --config PATH      Read settings from PATH instead of the default location
  --api-url URL      Override the API base URL
  --interval SECS    Override the poll interval
  --once             Refresh once, print the notifications and exit
  -h, --help         Print this help
";

struct Args {
    config: Option<PathBuf>,
    api_url: Option<String>,
    interval: Option<u64>,
    once: bool,
}

fn parse_args() -> Result<Option<Args>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }
    let parsed = Args {
        config: args.opt_value_from_str("--config")?,
        api_url: args.opt_value_from_str("--api-url")?,
        interval: args.opt_value_from_str("--interval")?,
        once: args.contains("--once"),
    };
    let rest = args.finish();
    if !rest.is_empty() {
        return Err(pico_args::Error::ArgumentParsingFailed {
            cause: format!("unexpected arguments: {rest:?}"),
        });
    }
    Ok(Some(parsed))
}

fn load_config(args: &Args) -> property_notifications::error::Result<Config> {
    let config = match &args.config {
        Some(path) => config::load_from_path(path)?.with_env_overrides(),
        None => config::load()?,
    };
    let mut config = config.with_base_url_override(args.api_url.clone());
    if let Some(secs) = args.interval {
        config.poll_interval_secs = Some(secs);
    }
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(config.log_level());

    let api = match HttpNotificationApi::from_config(&config) {
        Ok(api) => Arc::new(api),
        Err(err) => {
            tracing::error!(%err, "cannot build API client");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(base_url = %api.base_url(), "using notification API");

    if args.once {
        let scheduler = Scheduler::new();
        let store = NotificationStore::new(
            api,
            Arc::new(SystemClock),
            scheduler.clone(),
            StoreSettings::default(),
        );
        store.refresh().await;
        let state = store.snapshot();
        println!("unread: {}", state.unread_count);
        for record in &state.notifications {
            let marker = if record.is_read { ' ' } else { '*' };
            println!(
                "{marker} #{} [{:?}] {} ({})",
                record.id, record.kind, record.title, record.created_at
            );
        }
        scheduler.shutdown();
        return ExitCode::SUCCESS;
    }

    let app = App::start(api, Arc::new(SystemClock), AppSettings::from_config(&config));
    let mut toasts = app.toasts().subscribe();
    let mut store = app.store().subscribe();
    let mut seen: HashSet<ToastId> = HashSet::new();
    let mut last_unread = None;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = toasts.changed() => {
                if changed.is_err() {
                    break;
                }
                let live = toasts.borrow_and_update().clone();
                for toast in &live {
                    if seen.insert(toast.id()) {
                        tracing::info!(
                            severity = %toast.severity(),
                            title = toast.title().unwrap_or_default(),
                            message = toast.message(),
                            "toast"
                        );
                    }
                }
                seen.retain(|id| live.iter().any(|t| t.id() == *id));
            }
            changed = store.changed() => {
                if changed.is_err() {
                    break;
                }
                let unread = store.borrow_and_update().unread_count;
                if last_unread != Some(unread) {
                    tracing::info!(unread, "unread count");
                    last_unread = Some(unread);
                }
            }
        }
    }

    app.shutdown();
    ExitCode::SUCCESS
}
