//! Command handlers and the broadcast-window poll loop.

use std::future::Future;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use onair_core::timestamp::display_clock;
use onair_core::{read_schedule, AppConfig, WindowPolicy};

use crate::clients::{build_qvc_client, build_shoplive_client};
use crate::schedule::refresh_schedule;
use crate::snapshot::run_cycle;

/// `onair schedule`: refresh the schedule document.
pub(crate) async fn run_schedule(config: &AppConfig) -> anyhow::Result<()> {
    let shoplive = build_shoplive_client(config)?;
    refresh_schedule(&shoplive, config, Utc::now()).await?;
    Ok(())
}

/// `onair check`: one cycle, gated on the schedule unless told otherwise.
pub(crate) async fn run_check(config: &AppConfig, skip_schedule_check: bool) -> anyhow::Result<()> {
    let now = Utc::now();
    if !skip_schedule_check {
        let schedule = read_schedule(&config.schedule_path);
        let policy = WindowPolicy::from_config(config);
        if !policy.is_within_any_window(schedule.as_ref(), now) {
            tracing::info!("outside every broadcast window, nothing to do");
            return Ok(());
        }
    }

    let shoplive = build_shoplive_client(config)?;
    let qvc = build_qvc_client(config)?;
    run_cycle(&shoplive, &qvc, config, now)
        .await
        .ensure_snapshots_written()
}

/// `onair run`: refresh the schedule, wait for today's window and poll
/// until it closes.
pub(crate) async fn run_live(config: &AppConfig, skip_refresh: bool) -> anyhow::Result<()> {
    let shoplive = build_shoplive_client(config)?;
    let qvc = build_qvc_client(config)?;

    if !skip_refresh {
        if let Err(e) = refresh_schedule(&shoplive, config, Utc::now()).await {
            tracing::warn!(
                error = %format!("{e:#}"),
                "schedule refresh failed, falling back to the saved schedule"
            );
        }
    }

    let policy = WindowPolicy::from_config(config);
    let schedule = read_schedule(&config.schedule_path);
    let Some(window) = policy.todays_window(schedule.as_ref(), Utc::now()) else {
        tracing::info!("no broadcast scheduled today");
        return Ok(());
    };

    tracing::info!(
        start = %display_clock(window.start),
        end = %display_clock(window.end),
        "today's broadcast window (UTC+9)"
    );

    wait_until(window.start).await;

    let interval = Duration::from_secs(config.poll_interval_secs);
    let cycles = poll_until(window.end, interval, Utc::now, |now| {
        let (shoplive, qvc) = (&shoplive, &qvc);
        async move {
            run_cycle(shoplive, qvc, config, now)
                .await
                .ensure_snapshots_written()
        }
    })
    .await;

    tracing::info!(cycles, "broadcast window closed");
    Ok(())
}

async fn wait_until(start: DateTime<Utc>) {
    let Ok(wait) = (start - Utc::now()).to_std() else {
        return;
    };
    tracing::info!(minutes = wait.as_secs() / 60, "waiting for the broadcast window to open");
    tokio::time::sleep(wait).await;
}

/// Runs `cycle` every `interval` while `clock()` is at or before `end`.
///
/// The sleep after each cycle is shortened by the time the cycle took. A
/// failing cycle is logged and polling continues. Returns the number of
/// cycles run.
async fn poll_until<C, F, Fut>(
    end: DateTime<Utc>,
    interval: Duration,
    mut clock: C,
    mut cycle: F,
) -> usize
where
    C: FnMut() -> DateTime<Utc>,
    F: FnMut(DateTime<Utc>) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let mut cycles = 0usize;
    loop {
        let now = clock();
        if now > end {
            return cycles;
        }

        let started = Instant::now();
        tracing::info!("running stock check");
        if let Err(e) = cycle(now).await {
            tracing::error!(error = %format!("{e:#}"), "stock check cycle failed");
        }
        cycles += 1;

        let elapsed = started.elapsed();
        if elapsed > interval {
            tracing::warn!(
                elapsed_secs = elapsed.as_secs_f64(),
                interval_secs = interval.as_secs(),
                "stock check took longer than the poll interval"
            );
        }
        tokio::time::sleep(interval.saturating_sub(elapsed)).await;
    }
}
