use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::models::User;
use crate::services::workflow::BookingWorkflow;
use crate::utils::error::AppError;

pub const DEFAULT_CHECKOUT_TTL: Duration = Duration::from_secs(30 * 60);

pub type SharedWorkflow = Arc<Mutex<BookingWorkflow>>;

struct Entry {
    workflow: SharedWorkflow,
    last_seen: Instant,
}

/// In-memory checkouts, one lock per workflow so a slow payment does not
/// block other checkouts.
///
/// Checkouts untouched for longer than the TTL are dropped on the next
/// insert or lookup. Confirmed checkouts are removed by the caller.
pub struct CheckoutRegistry {
    ttl: Duration,
    workflows: RwLock<HashMap<Uuid, Entry>>,
}

impl Default for CheckoutRegistry {
    fn default() -> Self {
        Self::with_ttl(DEFAULT_CHECKOUT_TTL)
    }
}

impl CheckoutRegistry {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            workflows: RwLock::new(HashMap::new()),
        }
    }

    fn prune(&self, workflows: &mut HashMap<Uuid, Entry>, now: Instant) {
        let before = workflows.len();
        workflows.retain(|_, entry| now.duration_since(entry.last_seen) < self.ttl);
        let expired = before - workflows.len();
        if expired > 0 {
            debug!(expired, "Expired idle checkouts");
        }
    }

    pub async fn insert(&self, workflow: BookingWorkflow) -> SharedWorkflow {
        let id = workflow.id();
        let shared = Arc::new(Mutex::new(workflow));
        let now = Instant::now();

        let mut workflows = self.workflows.write().await;
        self.prune(&mut workflows, now);
        workflows.insert(
            id,
            Entry {
                workflow: shared.clone(),
                last_seen: now,
            },
        );
        shared
    }

    /// Looks up a checkout owned by `user`. Other users' checkouts are
    /// reported as missing.
    pub async fn get_for(&self, id: Uuid, user: &User) -> Result<SharedWorkflow, AppError> {
        let not_found = || AppError::NotFound(format!("Checkout '{}' was not found", id));
        let shared = {
            let now = Instant::now();
            let mut workflows = self.workflows.write().await;
            self.prune(&mut workflows, now);
            let entry = workflows.get_mut(&id).ok_or_else(not_found)?;
            entry.last_seen = now;
            entry.workflow.clone()
        };

        // The registry lock is released first; a payment may hold this one
        if shared.lock().await.user_id() != user.id {
            return Err(not_found());
        }
        Ok(shared)
    }

    pub async fn remove(&self, id: Uuid) {
        if self.workflows.write().await.remove(&id).is_some() {
            debug!(checkout_id = %id, "Checkout closed");
        }
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.workflows.read().await.len()
    }
}
