//! Standalone driver for the notification surface.
//!
//! Reads one JSON [`Message`] per line on stdin, fires timers, runs the
//! diagnostic jobs and writes a JSON line for every workspace action and
//! every new view snapshot.

use anyhow::Context;
use editor_notifications::{
    Host, Message, Session, Settings,
    host::SystemInfo,
    rendering::Snapshot,
    shell::{LocalPackages, Offline, ShellWorkspace, WorkspaceEvent},
    views::LogState,
};
use editor_notifications_config::{NotificationsConfig, TelemetryConsent};
use serde::Serialize;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::{Duration, Instant, SystemTime},
};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::mpsc,
    task::JoinSet,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Path of the persisted log state
const STATE_ENV: &str = "EDITOR_NOTIFICATIONS_STATE";
const TELEMETRY_ENV: &str = "EDITOR_TELEMETRY_CONSENT";
const DEV_MODE_ENV: &str = "EDITOR_DEV_MODE";
const APP_VERSION_ENV: &str = "EDITOR_VERSION";
const RUNTIME_VERSION_ENV: &str = "EDITOR_RUNTIME_VERSION";

/// Sleep used when no timer is pending
const IDLE: Duration = Duration::from_secs(3600);

#[derive(Serialize)]
#[serde(tag = "output", rename_all = "kebab-case")]
enum Output<'a> {
    Snapshot(&'a Snapshot),
    Workspace(&'a WorkspaceEvent),
}

fn init_logging() -> anyhow::Result<()> {
    let trace = tracing_subscriber::registry();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    #[cfg(feature = "systemd")]
    if let Ok(journald) = tracing_journald::layer() {
        trace.with(journald).with(env_filter).try_init()?;
        return Ok(());
    }

    // stdout carries the protocol
    trace
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .try_init()?;
    Ok(())
}

fn telemetry_consent() -> TelemetryConsent {
    std::env::var(TELEMETRY_ENV)
        .ok()
        .and_then(|value| serde_json::from_value(serde_json::Value::String(value.to_lowercase())).ok())
        .unwrap_or_default()
}

fn dev_mode() -> bool {
    std::env::var(DEV_MODE_ENV).is_ok_and(|v| matches!(v.as_str(), "1" | "true"))
}

async fn load_log_state(path: &Path) -> LogState {
    match tokio::fs::read(path).await {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            tracing::warn!("Ignoring unreadable log state {}: {}", path.display(), err);
            LogState::default()
        }),
        Err(_) => LogState::default(),
    }
}

async fn save_log_state(path: &Path, state: &LogState) -> anyhow::Result<()> {
    let bytes = serde_json::to_vec_pretty(state)?;
    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}

async fn emit(out: &mut tokio::io::Stdout, output: Output<'_>) -> anyhow::Result<()> {
    let mut line = serde_json::to_vec(&output)?;
    line.push(b'\n');
    out.write_all(&line).await?;
    out.flush().await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    color_backtrace::install();
    init_logging()?;
    info!("editor-notifications ({})", editor_notifications_config::ID);

    let (_helper, config) = NotificationsConfig::load();
    let settings = Settings::new(&config, telemetry_consent(), dev_mode());

    let app_version = std::env::var(APP_VERSION_ENV).unwrap_or_else(|_| env!("CARGO_PKG_VERSION").to_string());
    let runtime_version = std::env::var(RUNTIME_VERSION_ENV).unwrap_or_default();
    let system = SystemInfo::from_env(&app_version, &runtime_version);
    let packages = match system.app_home.as_deref() {
        Some(home) => LocalPackages::scan(Path::new(home)).await,
        None => LocalPackages::default(),
    };

    let (workspace_tx, mut workspace_rx) = mpsc::unbounded_channel();
    let host = Host::new(
        Arc::new(packages),
        Arc::new(Offline),
        Arc::new(Offline),
        Arc::new(ShellWorkspace::new(workspace_tx)),
        system,
    );

    let state_path = std::env::var_os(STATE_ENV).map(PathBuf::from);
    let log_state = match &state_path {
        Some(path) => load_log_state(path).await,
        None => LogState::default(),
    };

    let mut session = Session::new(host, settings, log_state, Instant::now(), SystemTime::now());
    session.activate(Instant::now());

    let mut out = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut jobs = JoinSet::new();
    let mut last_snapshot = None;

    loop {
        for job in session.take_jobs() {
            jobs.spawn(job.run());
        }
        while let Ok(event) = workspace_rx.try_recv() {
            emit(&mut out, Output::Workspace(&event)).await?;
        }
        let snapshot = session.snapshot();
        if last_snapshot.as_ref() != Some(&snapshot) {
            emit(&mut out, Output::Snapshot(&snapshot)).await?;
            last_snapshot = Some(snapshot);
        }

        let deadline = session.next_deadline().unwrap_or_else(|| Instant::now() + IDLE);
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<Message>(&line) {
                    Ok(message) => session.update(message, Instant::now()),
                    Err(err) => tracing::warn!("Ignoring malformed message {:?}: {}", line, err),
                }
            }
            Some(done) = jobs.join_next(), if !jobs.is_empty() => {
                match done {
                    Ok(done) => tracing::debug!("Job for notification {} finished", done.notification),
                    Err(err) => tracing::error!("Diagnostic job failed: {}", err),
                }
            }
            _ = tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)) => {
                session.advance_to(Instant::now());
            }
        }
    }

    jobs.shutdown().await;
    let state = session.deactivate();
    if let Some(path) = state_path {
        save_log_state(&path, &state).await?;
    }
    info!("Log state saved, exiting");
    Ok(())
}
