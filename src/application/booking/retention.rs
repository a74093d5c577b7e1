//! Background task that physically deletes long-cancelled reservations.
//!
//! Runs in a tokio::spawn loop. Cancelling a reservation only flips its
//! status; rows are removed here once they are older than the retention
//! period.

use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{info, warn};

use crate::domain::{DomainResult, RepositoryProvider};
use crate::shared::shutdown::ShutdownSignal;

/// Start the retention background task.
///
/// Every `check_interval_secs` it deletes reservations whose
/// `cancelled_at` is more than `cancelled_days` days in the past.
pub fn start_retention_task(
    repos: Arc<dyn RepositoryProvider>,
    shutdown: ShutdownSignal,
    cancelled_days: i64,
    check_interval_secs: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            retention_days = cancelled_days,
            check_interval = check_interval_secs,
            "Retention task started"
        );

        let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs.max(1)));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = purge_cancelled(repos.as_ref(), cancelled_days).await {
                        warn!(error = %e, "Retention purge error");
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("Retention task shutting down");
                    break;
                }
            }
        }

        info!("Retention task stopped");
    })
}

/// Delete reservations cancelled more than `cancelled_days` ago.
pub async fn purge_cancelled(repos: &dyn RepositoryProvider, cancelled_days: i64) -> DomainResult<u64> {
    let cutoff = Utc::now() - ChronoDuration::days(cancelled_days);
    let purged = repos.reservations().purge_cancelled_before(cutoff).await?;
    if purged > 0 {
        info!(count = purged, "Purged cancelled reservations");
    }
    Ok(purged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{dec, repos, seed_day, seed_user};
    use crate::domain::identity::Role;
    use crate::domain::reservation::{NewReservation, Reservation, ReservationStatus};

    async fn stored(
        repos: &Arc<dyn RepositoryProvider>,
        number: &str,
        user_id: i32,
        date_id: i32,
    ) -> Reservation {
        repos
            .reservations()
            .create(NewReservation {
                reservation_number: number.into(),
                user_id,
                date_id,
                tickets: vec![],
                total_amount: dec("10.00"),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn only_old_cancellations_are_purged() {
        let repos = repos().await;
        let user = seed_user(&repos, "visitor", Role::Client).await;
        let day = seed_day(&repos, 30, true).await;

        let mut old = stored(&repos, "PARK-1-OLD00", user.id, day.id).await;
        old.transition(ReservationStatus::Cancelled, Utc::now() - ChronoDuration::days(45));
        repos.reservations().update_status(&old).await.unwrap();

        let mut recent = stored(&repos, "PARK-2-NEW00", user.id, day.id).await;
        recent.transition(ReservationStatus::Cancelled, Utc::now());
        repos.reservations().update_status(&recent).await.unwrap();

        let active = stored(&repos, "PARK-3-ACT00", user.id, day.id).await;

        let purged = purge_cancelled(repos.as_ref(), 30).await.unwrap();
        assert_eq!(purged, 1);

        assert!(repos.reservations().find_by_id(old.id).await.unwrap().is_none());
        assert!(repos.reservations().find_by_id(recent.id).await.unwrap().is_some());
        assert!(repos.reservations().find_by_id(active.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn task_stops_on_shutdown() {
        let repos = repos().await;
        let shutdown = ShutdownSignal::new();
        let handle = start_retention_task(repos, shutdown.clone(), 30, 3600);
        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("task did not stop")
            .unwrap();
    }
}
