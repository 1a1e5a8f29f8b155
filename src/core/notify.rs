//! Expiry-notification throttling.
//!
//! The sweep emits two kinds of notices: "fully expired" (always fires, once
//! per distinct expiry batch) and "expiring soon" (at most one per user every
//! five minutes). Deduplication uses a per-second batch key so the same sweep
//! batch can never fire twice, replacing the per-instance timers the engine
//! used to juggle.

use crate::core::lifecycle::ExpiredEffect;
use crate::core::state::EffectContainers;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};

/// Window in which an instance counts as "expiring soon".
pub const SOON_WINDOW_SECS: i64 = 300;
/// Minimum gap between "expiring soon" notices per user.
pub const SOON_COOLDOWN_SECS: i64 = 300;
/// Batch keys older than this are pruned.
const BATCH_RETENTION_SECS: i64 = 10;

/// A user-facing expiry notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// An effect instance was removed.
    Expired {
        /// Item id the instance lived under.
        item_id: String,
    },
    /// An effect instance has five minutes or less remaining.
    ExpiringSoon {
        /// Item id the instance lives under.
        item_id: String,
        /// Whole seconds remaining.
        remaining_secs: i64,
    },
}

/// Anti-duplicate state for expiry notices. One instance lives for the bot's
/// lifetime, shared by the sweep task.
#[derive(Debug, Default)]
pub struct NotifyThrottle {
    batches: HashSet<(String, i64)>,
    last_soon: HashMap<String, DateTime<Utc>>,
}

impl NotifyThrottle {
    /// Creates an empty throttle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the notices a sweep over one user may send, updating throttle
    /// state. Expired notices bypass the soon-cooldown but share the batch
    /// key; calling twice within the same second returns nothing the second
    /// time.
    pub fn notices_for(
        &mut self,
        user_id: &str,
        containers: &EffectContainers,
        expired: &[ExpiredEffect],
        now: DateTime<Utc>,
    ) -> Vec<Notice> {
        self.prune(now);

        let batch_key = (user_id.to_string(), now.timestamp());
        if !self.batches.insert(batch_key) {
            return Vec::new();
        }

        let mut notices: Vec<Notice> = expired
            .iter()
            .map(|e| Notice::Expired {
                item_id: e.item_id.clone(),
            })
            .collect();

        let soon = expiring_soon(containers, now);
        if !soon.is_empty() {
            let gate_open = self
                .last_soon
                .get(user_id)
                .is_none_or(|last| now - *last >= Duration::seconds(SOON_COOLDOWN_SECS));
            if gate_open {
                self.last_soon.insert(user_id.to_string(), now);
                notices.extend(soon);
            }
        }

        notices
    }

    fn prune(&mut self, now: DateTime<Utc>) {
        let cutoff = now.timestamp() - BATCH_RETENTION_SECS;
        self.batches.retain(|(_, second)| *second >= cutoff);
    }
}

fn expiring_soon(containers: &EffectContainers, now: DateTime<Utc>) -> Vec<Notice> {
    let mut soon = Vec::new();
    for (item_id, instances) in &containers.active {
        for inst in instances {
            if !inst.is_valid(now) {
                continue;
            }
            if let Some(remaining) = inst.remaining(now) {
                if remaining <= Duration::seconds(SOON_WINDOW_SECS) {
                    soon.push(Notice::ExpiringSoon {
                        item_id: item_id.clone(),
                        remaining_secs: remaining.num_seconds(),
                    });
                }
            }
        }
    }
    soon
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::catalog::effects::{EffectKind, Target};
    use crate::core::lifecycle::ExpiryReason;
    use crate::core::state::ActiveEffect;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-08-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn containers_with_timed(duration: i64) -> EffectContainers {
        let mut containers = EffectContainers::default();
        containers.active.insert(
            "coffee".to_string(),
            vec![ActiveEffect::from_effect(
                &EffectKind::Multiplier {
                    targets: vec![Target::Work],
                    multiplier: 1.25,
                    duration: Some(duration),
                },
                now(),
            )],
        );
        containers
    }

    fn one_expired() -> Vec<ExpiredEffect> {
        vec![ExpiredEffect {
            item_id: "coffee".to_string(),
            reason: ExpiryReason::TimedOut,
        }]
    }

    #[test]
    fn test_same_second_batch_fires_once() {
        let mut throttle = NotifyThrottle::new();
        let containers = EffectContainers::default();

        let first = throttle.notices_for("u1", &containers, &one_expired(), now());
        assert_eq!(first.len(), 1);

        let second = throttle.notices_for("u1", &containers, &one_expired(), now());
        assert!(second.is_empty());
    }

    #[test]
    fn test_batch_key_is_per_user() {
        let mut throttle = NotifyThrottle::new();
        let containers = EffectContainers::default();
        assert_eq!(throttle.notices_for("u1", &containers, &one_expired(), now()).len(), 1);
        assert_eq!(throttle.notices_for("u2", &containers, &one_expired(), now()).len(), 1);
    }

    #[test]
    fn test_soon_notice_respects_cooldown_but_expired_bypasses() {
        let mut throttle = NotifyThrottle::new();
        // 4 minutes remaining: inside the soon window
        let containers = containers_with_timed(240);

        let first = throttle.notices_for("u1", &containers, &[], now());
        assert!(matches!(first[0], Notice::ExpiringSoon { .. }));

        // One minute later: soon is gated, but an expiry still fires
        let later = now() + Duration::seconds(60);
        let second = throttle.notices_for("u1", &containers, &one_expired(), later);
        assert_eq!(second.len(), 1);
        assert!(matches!(second[0], Notice::Expired { .. }));

        // After the 5 minute cooldown the soon notice may fire again
        let after_cooldown = now() + Duration::seconds(SOON_COOLDOWN_SECS);
        let containers = containers_with_timed(SOON_COOLDOWN_SECS + 240);
        let third = throttle.notices_for("u1", &containers, &[], after_cooldown);
        assert!(matches!(third[0], Notice::ExpiringSoon { .. }));
    }

    #[test]
    fn test_instances_outside_window_not_reported() {
        let mut throttle = NotifyThrottle::new();
        let containers = containers_with_timed(3600);
        assert!(throttle.notices_for("u1", &containers, &[], now()).is_empty());
    }
}
