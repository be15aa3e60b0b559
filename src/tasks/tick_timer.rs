//! Tick timer background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::state::{AppState, TickOutcome};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Background task that ticks the timer once per second while it is running.
///
/// The interval only exists while the timer runs in one session. A snapshot
/// that stops the timer, changes mode or starts a fresh session (elapsed back
/// to zero) drops it, so the next tick lands one full second later.
/// Returns when the snapshot channel closes.
pub async fn tick_timer_task(state: Arc<AppState>) {
    info!("Starting tick timer task");

    let mut timer_rx = state.subscribe_timer();

    loop {
        // Wait until the timer is running
        let session_mode = match timer_rx.wait_for(|timer| timer.is_running).await {
            Ok(timer) => timer.mode,
            Err(_) => {
                info!("Timer channel closed, stopping tick timer task");
                return;
            }
        };

        debug!("Timer running in {} mode, scheduling ticks", session_mode.as_str());
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match state.tick() {
                        Ok(TickOutcome::BreakComplete) => {
                            info!("Break complete, stopping ticks");
                            break;
                        }
                        Ok(TickOutcome::Skipped) => {
                            debug!("Timer no longer running, stopping ticks");
                            break;
                        }
                        Ok(TickOutcome::Advanced) => {}
                        Err(e) => {
                            error!("Failed to tick timer: {}", e);
                        }
                    }
                }

                changed = timer_rx.changed() => {
                    if changed.is_err() {
                        info!("Timer channel closed, stopping tick timer task");
                        return;
                    }
                    let timer = timer_rx.borrow_and_update();
                    if !timer.is_running {
                        debug!("Timer stopped, cancelling ticks");
                        break;
                    }
                    if timer.mode != session_mode || timer.elapsed_seconds == 0 {
                        debug!("New {} session, rescheduling ticks", timer.mode.as_str());
                        break;
                    }
                }
            }
        }
    }
}
