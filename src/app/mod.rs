//! Command flows: ad-hoc check, add, and sweep of the monitored list.

mod observer;
pub(crate) mod terminal;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use scimon_core::notify::print_status;
use scimon_core::{
    AddOutcome, AvailabilityResolver, ConsoleStyle, HttpClient, MirrorConfig, MonitorError,
    MonitoredSet, RetryPolicy, RetryingClient, WebhookNotifier,
};
use tracing::{debug, info, warn};

use crate::ProcessExit;
use crate::app_config::{self, AppConfig};
use crate::cli::Args;

use observer::{ConsoleObserver, Fetcher};

/// Everything the flows share, built once from the CLI arguments.
struct RunContext {
    resolver: AvailabilityResolver,
    style: ConsoleStyle,
    fetcher: Option<Fetcher>,
}

impl RunContext {
    fn from_args(args: &Args) -> Result<Self> {
        let policy = RetryPolicy::with_max_retries(u32::from(args.max_retries));
        let transport =
            RetryingClient::new(policy).context("Failed to build mirror HTTP client")?;
        let mirror = MirrorConfig::new(args.mirror_url.as_str(), args.fallback_url.as_str());
        let resolver = AvailabilityResolver::new(Arc::new(transport), mirror);

        let fetcher = if args.download {
            let client = HttpClient::new().context("Failed to build download client")?;
            Some(Fetcher::new(client, args.dir.clone().unwrap_or_default()))
        } else {
            None
        };

        Ok(Self {
            resolver,
            style: terminal::console_style(args.no_color),
            fetcher,
        })
    }
}

/// Runs the flow selected by `args`.
pub(crate) async fn run(args: Args) -> Result<ProcessExit> {
    let ctx = RunContext::from_args(&args)?;

    if let Some(identifier) = args.check.as_deref() {
        return Ok(run_check(&ctx, identifier).await);
    }

    let state_dir = app_config::resolve_state_dir(args.state_dir.as_deref()).ok_or_else(|| {
        anyhow!("Error creating state directory: home directory could not be determined")
    })?;
    app_config::ensure_state_dir(&state_dir)?;
    debug!(state_dir = %state_dir.display(), "state directory ready");

    let config = app_config::load_or_init(&state_dir.join(app_config::CONFIG_FILE_NAME))?;
    let monitored = MonitoredSet::new(state_dir.join(app_config::MONITORED_FILE_NAME));

    if let Some(identifier) = args.add.as_deref() {
        return run_add(&ctx, &monitored, identifier).await;
    }

    run_sweep(ctx, &monitored, &config).await
}

/// Checks one identifier without touching any state.
async fn run_check(ctx: &RunContext, identifier: &str) -> ProcessExit {
    let identifier = identifier.trim();
    let resolution = ctx.resolver.check(identifier).await;
    if let Some(cause) = &resolution.cause {
        eprintln!("Error checking DOI: {cause}");
        return ProcessExit::Failure;
    }

    print_status(identifier, &resolution, ctx.style);
    if let (Some(fetcher), Some(link)) = (&ctx.fetcher, resolution.link()) {
        fetcher.fetch(identifier, link).await;
    }
    ProcessExit::Success
}

/// Checks one identifier and monitors it when not yet available.
async fn run_add(
    ctx: &RunContext,
    monitored: &MonitoredSet,
    identifier: &str,
) -> Result<ProcessExit> {
    let identifier = identifier.trim();
    let resolution = ctx.resolver.check(identifier).await;
    if let Some(cause) = &resolution.cause {
        debug!(identifier, error = %cause, "check failed; monitoring anyway");
    }
    print_status(identifier, &resolution, ctx.style);

    if resolution.available {
        if let (Some(fetcher), Some(link)) = (&ctx.fetcher, resolution.link()) {
            fetcher.fetch(identifier, link).await;
        }
        return Ok(ProcessExit::Success);
    }

    match monitored.add(identifier).await {
        Ok(AddOutcome::Added) => {
            eprintln!("DOI added to monitored file.");
            Ok(ProcessExit::Success)
        }
        Ok(AddOutcome::AlreadyPresent) => {
            eprintln!("DOI is already monitored.");
            Ok(ProcessExit::Success)
        }
        Err(error) => {
            eprintln!("Error adding DOI to file: {error}");
            Ok(ProcessExit::Failure)
        }
    }
}

/// Checks every monitored identifier and drops the ones now available.
async fn run_sweep(
    ctx: RunContext,
    monitored: &MonitoredSet,
    config: &AppConfig,
) -> Result<ProcessExit> {
    let notifier = match config.webhook_url() {
        Some(url) => Some(WebhookNotifier::new(url).context("Failed to build webhook client")?),
        None => {
            warn!("discord_webhook not configured; notifications disabled");
            None
        }
    };
    let observer = ConsoleObserver::new(ctx.style, notifier, ctx.fetcher);

    match monitored.sweep(&ctx.resolver, &observer).await {
        Ok(report) => {
            info!(
                checked = report.checked,
                resolved = report.resolved.len(),
                pending = report.pending.len(),
                "monitored list updated"
            );
            Ok(ProcessExit::Success)
        }
        Err(MonitorError::Rewrite {
            path,
            pending,
            source,
        }) => {
            eprintln!("Error writing DOI file {}: {source}", path.display());
            if !pending.is_empty() {
                eprintln!("Still monitored (re-add manually):");
                for identifier in &pending {
                    eprintln!("  {identifier}");
                }
            }
            Ok(ProcessExit::Failure)
        }
        Err(error) => Err(error).with_context(|| {
            format!("Error opening DOI file '{}'", monitored.path().display())
        }),
    }
}
