//! Version/conflict resolution for saves.

use onedoc_protocol::{ts_order, ConflictRecord, DocVersion};
use std::cmp::Ordering;

/// The stored state a save is judged against.
#[derive(Debug, Clone, Copy)]
pub struct PriorState<'a> {
    /// The version currently committed.
    pub version: &'a DocVersion,
    /// The committed document's timestamp.
    pub ts: &'a str,
}

/// One save attempt, as seen by the resolver.
#[derive(Debug, Clone, Copy)]
pub struct SaveAttempt<'a> {
    /// Prior stored state; `None` on a genuinely first save.
    pub prior: Option<PriorState<'a>>,
    /// The version the caller last saw, if it sent one.
    pub claimed_prev: Option<&'a DocVersion>,
    /// The caller-supplied token for the new state.
    pub new_version: &'a DocVersion,
    /// The incoming document's timestamp.
    pub new_ts: &'a str,
}

/// Which side's raw content gets archived on conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveSource {
    /// The on-disk content loses and is archived; the save commits.
    Prior,
    /// The incoming content loses and is archived; the store is left
    /// untouched.
    Incoming,
}

/// A detected conflict and what to do about it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictOutcome {
    /// The record to append to the document being saved.
    pub record: ConflictRecord,
    /// Which content to archive under the superseded version.
    pub archive: ArchiveSource,
}

/// The resolver's verdict on one save.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Whether the incoming content is committed to the live store.
    pub commit: bool,
    /// The conflict to archive and record, when one was detected.
    pub conflict: Option<ConflictOutcome>,
}

/// Judges a save against the stored state.
///
/// With no prior state there is nothing to conflict with and the save
/// commits directly. Otherwise the save is *reverse* when the stored
/// document's timestamp is not older than the incoming one — the
/// incoming write arrived out of order and must not clobber newer data,
/// whatever version it claims. A version mismatch on top of that
/// produces a conflict: forward conflicts archive the overwritten
/// store content, reverse conflicts archive the rejected incoming
/// content, and both append a record to the document being saved.
#[must_use]
pub fn resolve(attempt: &SaveAttempt<'_>) -> Resolution {
    let Some(prior) = attempt.prior else {
        return Resolution {
            commit: true,
            conflict: None,
        };
    };

    let reverse = ts_order(prior.ts, attempt.new_ts) != Ordering::Less;
    let mismatch = attempt.claimed_prev != Some(prior.version);

    let conflict = mismatch.then(|| ConflictOutcome {
        record: ConflictRecord {
            actual_prev: prior.version.clone(),
            expected_prev: attempt.claimed_prev.cloned(),
            new: attempt.new_version.clone(),
            reverse_conflict: reverse,
        },
        archive: if reverse {
            ArchiveSource::Incoming
        } else {
            ArchiveSource::Prior
        },
    });

    Resolution {
        commit: !reverse,
        conflict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OLD_TS: &str = "2024-05-01T10:00:00.000Z";
    const NEW_TS: &str = "2024-05-01T11:00:00.000Z";

    fn versions() -> (DocVersion, DocVersion, DocVersion) {
        (
            DocVersion::new("v1"),
            DocVersion::new("v0"),
            DocVersion::new("v2"),
        )
    }

    #[test]
    fn first_save_never_conflicts() {
        let (_, claimed, new) = versions();
        let resolution = resolve(&SaveAttempt {
            prior: None,
            claimed_prev: Some(&claimed),
            new_version: &new,
            new_ts: NEW_TS,
        });
        assert!(resolution.commit);
        assert!(resolution.conflict.is_none());
    }

    #[test]
    fn matching_version_commits_without_conflict() {
        let (current, _, new) = versions();
        let resolution = resolve(&SaveAttempt {
            prior: Some(PriorState {
                version: &current,
                ts: OLD_TS,
            }),
            claimed_prev: Some(&current),
            new_version: &new,
            new_ts: NEW_TS,
        });
        assert!(resolution.commit);
        assert!(resolution.conflict.is_none());
    }

    #[test]
    fn forward_conflict_archives_prior_and_commits() {
        let (current, claimed, new) = versions();
        let resolution = resolve(&SaveAttempt {
            prior: Some(PriorState {
                version: &current,
                ts: OLD_TS,
            }),
            claimed_prev: Some(&claimed),
            new_version: &new,
            new_ts: NEW_TS,
        });

        assert!(resolution.commit);
        let outcome = resolution.conflict.unwrap();
        assert_eq!(outcome.archive, ArchiveSource::Prior);
        assert_eq!(outcome.record.actual_prev, current);
        assert_eq!(outcome.record.expected_prev, Some(claimed));
        assert_eq!(outcome.record.new, new);
        assert!(!outcome.record.reverse_conflict);
    }

    #[test]
    fn reverse_conflict_archives_incoming_and_keeps_store() {
        let (current, claimed, new) = versions();
        let resolution = resolve(&SaveAttempt {
            prior: Some(PriorState {
                version: &current,
                ts: NEW_TS,
            }),
            claimed_prev: Some(&claimed),
            new_version: &new,
            new_ts: OLD_TS,
        });

        assert!(!resolution.commit);
        let outcome = resolution.conflict.unwrap();
        assert_eq!(outcome.archive, ArchiveSource::Incoming);
        assert!(outcome.record.reverse_conflict);
    }

    #[test]
    fn equal_timestamps_count_as_reverse() {
        let (current, claimed, new) = versions();
        let resolution = resolve(&SaveAttempt {
            prior: Some(PriorState {
                version: &current,
                ts: NEW_TS,
            }),
            claimed_prev: Some(&claimed),
            new_version: &new,
            new_ts: NEW_TS,
        });
        assert!(!resolution.commit);
        assert!(resolution.conflict.unwrap().record.reverse_conflict);
    }

    #[test]
    fn missing_claimed_version_against_prior_state_conflicts() {
        let (current, _, new) = versions();
        let resolution = resolve(&SaveAttempt {
            prior: Some(PriorState {
                version: &current,
                ts: OLD_TS,
            }),
            claimed_prev: None,
            new_version: &new,
            new_ts: NEW_TS,
        });

        let outcome = resolution.conflict.unwrap();
        assert_eq!(outcome.record.expected_prev, None);
        assert!(resolution.commit);
    }

    #[test]
    fn stale_save_with_matching_version_is_not_committed() {
        // Matching version but an older timestamp: no conflict record,
        // but the store is still protected from the stale write.
        let (current, _, new) = versions();
        let resolution = resolve(&SaveAttempt {
            prior: Some(PriorState {
                version: &current,
                ts: NEW_TS,
            }),
            claimed_prev: Some(&current),
            new_version: &new,
            new_ts: OLD_TS,
        });
        assert!(!resolution.commit);
        assert!(resolution.conflict.is_none());
    }
}
