//! Background task that settles pending contributions after a fixed delay,
//! standing in for on-chain finality when the service runs in simulation
//! mode. A configurable share of settlements fail, and confirmed ones carry
//! a random transaction hash.

use std::sync::Arc;
use std::time::Duration;

use funding_ledger::LedgerError;
use rand::{Rng, RngCore};
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::db;
use crate::errors::{Result, ServiceError};

pub struct SettlerState {
    pub pool: SqlitePool,
    pub config: Config,
}

/// Outcome of one settlement pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SettleReport {
    pub confirmed: usize,
    pub failed: usize,
}

/// Run the settlement loop until `shutdown` is cancelled.
pub async fn run(state: Arc<SettlerState>, shutdown: CancellationToken) {
    info!(
        "Settlement simulator starting: delay {:?}, interval {:?}, failure rate {}",
        state.config.settle_delay, state.config.settle_interval, state.config.settle_failure_rate
    );

    loop {
        match settle_once(
            &state.pool,
            state.config.settle_delay,
            state.config.settle_failure_rate,
        )
        .await
        {
            Ok(SettleReport {
                confirmed: 0,
                failed: 0,
            }) => {}
            Ok(report) => info!(
                "Settled pending contributions: {} confirmed, {} failed",
                report.confirmed, report.failed
            ),
            Err(e) => error!("Settlement poll error: {e}"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(state.config.settle_interval) => {}
        }
    }

    info!("Settlement simulator stopped");
}

/// Settle every contribution that has been pending for at least `delay`.
///
/// Each one fails with probability `failure_rate` (clamped to `[0, 1]`) and
/// is otherwise confirmed under a random transaction hash. A contribution
/// settled concurrently through the API is skipped. One that would overflow
/// its campaign's raised total is failed so it is not retried.
pub async fn settle_once(pool: &SqlitePool, delay: Duration, failure_rate: f64) -> Result<SettleReport> {
    let failure_rate = if failure_rate.is_nan() {
        0.0
    } else {
        failure_rate.clamp(0.0, 1.0)
    };
    let cutoff = db::now() - delay.as_secs() as i64;
    let mut report = SettleReport::default();

    for id in db::pending_before(pool, cutoff).await? {
        let (fails, tx_hash) = roll(failure_rate);
        if fails {
            match db::fail_contribution(pool, id).await {
                Ok(_) => report.failed += 1,
                Err(ServiceError::Ledger(e)) => debug!("Skipping contribution {id}: {e}"),
                Err(e) => return Err(e),
            }
            continue;
        }

        match db::confirm_contribution(pool, id, Some(&tx_hash)).await {
            Ok(_) => report.confirmed += 1,
            Err(ServiceError::Ledger(LedgerError::AmountOverflow)) => {
                warn!("Contribution {id} would overflow its campaign total, marking failed");
                match db::fail_contribution(pool, id).await {
                    Ok(_) => report.failed += 1,
                    Err(ServiceError::Ledger(e)) => debug!("Skipping contribution {id}: {e}"),
                    Err(e) => return Err(e),
                }
            }
            Err(ServiceError::Ledger(e)) => debug!("Skipping contribution {id}: {e}"),
            Err(e) => return Err(e),
        }
    }
    Ok(report)
}

/// Decide a simulated outcome and draw a `0x`-prefixed 32-byte hash.
fn roll(failure_rate: f64) -> (bool, String) {
    let mut rng = rand::thread_rng();
    let fails = rng.gen_bool(failure_rate);
    let mut hash = [0u8; 32];
    rng.fill_bytes(&mut hash);
    (fails, format!("0x{}", hex::encode(hash)))
}
