use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use tether_core::MemoryCodeStore;
use tether_db::Database;

pub const STATS_INTERVAL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub pending_codes: usize,
    pub bindings: u64,
}

/// Background task that logs the size of the code table and the binding count.
pub async fn run_stats_loop(codes: Arc<MemoryCodeStore>, db: Arc<Database>, every: Duration) {
    let mut interval = tokio::time::interval(every);

    loop {
        interval.tick().await;

        let codes = codes.clone();
        let db = db.clone();
        match tokio::task::spawn_blocking(move || collect(&codes, &db)).await {
            Ok(Ok(stats)) => info!(
                pending_codes = stats.pending_codes,
                bindings = stats.bindings,
                "Stats"
            ),
            Ok(Err(e)) => warn!("Stats error: {:#}", e),
            Err(e) => warn!("Stats task failed: {}", e),
        }
    }
}

pub fn collect(codes: &MemoryCodeStore, db: &Database) -> anyhow::Result<Stats> {
    Ok(Stats {
        pending_codes: codes.len()?,
        bindings: db.count_bindings()?,
    })
}
