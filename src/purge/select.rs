use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::policy::PurgePolicy;
use crate::remote::VersionDescriptor;

/// Total order on version ids: integer ids first, compared numerically, then
/// all other ids compared as text.
fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Newest first; equal timestamps put the highest id first.
fn newest_first(a: &VersionDescriptor, b: &VersionDescriptor) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| compare_ids(&b.id, &a.id))
}

/// The version that is always retained.
///
/// This is the version with the latest `created_at`; when several share that
/// timestamp, the one with the highest id wins.
pub fn latest_version(versions: &[VersionDescriptor]) -> Option<&VersionDescriptor> {
    versions.iter().min_by(|a, b| newest_first(a, b))
}

/// Select versions to delete.
///
/// The latest version (see [`latest_version`]) is never selected. Every other
/// version is selected, unless the policy has an age threshold, in which case
/// only versions created strictly before `now - max_age_days` are.
///
/// The result is ordered oldest first. This function is pure: `now` is passed
/// in rather than read from the clock.
pub fn select_versions_for_removal<'a>(
    versions: &'a [VersionDescriptor],
    policy: &PurgePolicy,
    now: DateTime<Utc>,
) -> Vec<&'a VersionDescriptor> {
    if versions.len() <= 1 {
        return Vec::new();
    }

    let mut sorted: Vec<&VersionDescriptor> = versions.iter().collect();
    sorted.sort_by(|a, b| newest_first(a, b));

    let threshold = policy.age_threshold(now);
    let mut candidates: Vec<&VersionDescriptor> = sorted
        .into_iter()
        .skip(1)
        .filter(|version| threshold.is_none_or(|cutoff| version.created_at < cutoff))
        .collect();

    candidates.reverse();
    candidates
}
