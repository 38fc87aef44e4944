//! Optimistic mutations.
//!
//! A mutation moves through three phases in a fixed order:
//!
//! 1. [`Begun`]: a [`MutationLease`] is held (polling is suspended) and the
//!    cache has been snapshotted.
//! 2. [`Applied`]: the speculative change is in the cache and the remote call
//!    is in flight.
//! 3. [`Settlement`]: the remote call finished; the change is kept
//!    (`Commit`) or the snapshot is restored (`Rollback`), and the lease is
//!    returned.
//!
//! Each phase consumes the previous one, so a phase cannot be skipped or run
//! twice. Polling stays suspended as long as any lease is outstanding and the
//! last returned lease resumes it.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use report_logging::{report_debug, report_error, report_info};

use crate::cache::{CacheSnapshot, CacheStore, CollectionError};
use crate::polling::{PollingController, RefreshId};
use crate::report::ReportId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MutationId(u64);

impl MutationId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MutationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mutation#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    Create { title: String },
    Delete { id: ReportId },
}

impl MutationKind {
    fn deletes(&self) -> Option<ReportId> {
        match self {
            MutationKind::Delete { id } => Some(*id),
            MutationKind::Create { .. } => None,
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationKind::Create { title } => write!(f, "create {title:?}"),
            MutationKind::Delete { id } => write!(f, "delete #{id}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Commit,
    Rollback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
    Begin,
    SpeculativeApply,
    Settle(Settlement),
}

impl fmt::Display for MutationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationPhase::Begin => f.write_str("begin"),
            MutationPhase::SpeculativeApply => f.write_str("speculative-apply"),
            MutationPhase::Settle(Settlement::Commit) => f.write_str("settle/commit"),
            MutationPhase::Settle(Settlement::Rollback) => f.write_str("settle/rollback"),
        }
    }
}

/// Why a mutation was refused at the entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejected {
    AlreadyDeleting(ReportId),
    CreatePending,
}

/// Capability proving that polling is held suspended for one mutation.
///
/// Only the coordinator mints leases and only settling a mutation gives one
/// back, so suspension cannot outlive the mutation that requested it.
#[derive(Debug, PartialEq, Eq)]
pub struct MutationLease {
    id: MutationId,
}

impl MutationLease {
    pub fn id(&self) -> MutationId {
        self.id
    }
}

#[derive(Debug)]
#[must_use = "a begun mutation keeps polling suspended until it is applied and settled"]
pub struct Begun {
    lease: MutationLease,
    kind: MutationKind,
    snapshot: CacheSnapshot,
}

impl Begun {
    pub fn id(&self) -> MutationId {
        self.lease.id
    }

    pub fn phase(&self) -> MutationPhase {
        MutationPhase::Begin
    }

    fn apply(self, cache: &mut CacheStore) -> Applied {
        if let Some(target) = self.kind.deletes() {
            let removal = cache.remove_where(|report| report.id == target);
            if removal.removed > 1 {
                report_error!(
                    "{}",
                    CollectionError::AmbiguousRemoval {
                        id: target,
                        removed: removal.removed,
                    }
                );
            }
        }
        Applied {
            lease: self.lease,
            kind: self.kind,
            snapshot: self.snapshot,
        }
    }
}

#[derive(Debug)]
pub struct Applied {
    lease: MutationLease,
    kind: MutationKind,
    snapshot: CacheSnapshot,
}

impl Applied {
    pub fn id(&self) -> MutationId {
        self.lease.id
    }

    pub fn kind(&self) -> &MutationKind {
        &self.kind
    }

    pub fn phase(&self) -> MutationPhase {
        MutationPhase::SpeculativeApply
    }

    /// Restores the snapshot on rollback, then removes `still_deleted` again so
    /// the rollback does not bring back reports other mutations removed.
    ///
    /// A snapshot taken after another mutation already changed the cache is
    /// missing whatever that mutation removed, so `window` (the cache as it was
    /// when polling was suspended) is restored instead.
    fn settle(
        self,
        settlement: Settlement,
        cache: &mut CacheStore,
        window: Option<&CacheSnapshot>,
        still_deleted: &BTreeSet<ReportId>,
    ) -> (MutationKind, MutationLease) {
        if settlement == Settlement::Rollback {
            let base = window
                .filter(|window| window.version() != self.snapshot.version())
                .and_then(CacheSnapshot::collection);
            match base {
                Some(collection) => cache.replace(collection.clone()),
                None => cache.restore(self.snapshot),
            }
            if !still_deleted.is_empty() {
                cache.remove_where(|report| still_deleted.contains(&report.id));
            }
        }
        (self.kind, self.lease)
    }
}

/// Outcome of settling one mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled {
    pub kind: MutationKind,
    pub settlement: Settlement,
    /// Set when this was the last outstanding mutation and polling resumed.
    pub refresh: Option<RefreshId>,
}

#[derive(Debug, Default)]
pub struct MutationCoordinator {
    minted: u64,
    in_flight: BTreeMap<MutationId, Applied>,
    /// Cache as it was when the first outstanding lease was taken.
    window: Option<CacheSnapshot>,
    /// Deletes committed while other mutations were still in flight.
    committed_deletes: BTreeSet<ReportId>,
}

impl MutationCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_deleting(&self, id: ReportId) -> bool {
        self.in_flight
            .values()
            .any(|applied| applied.kind.deletes() == Some(id))
    }

    pub fn create_pending(&self) -> bool {
        self.in_flight
            .values()
            .any(|applied| matches!(applied.kind, MutationKind::Create { .. }))
    }

    pub fn phase_of(&self, id: MutationId) -> Option<MutationPhase> {
        self.in_flight.get(&id).map(Applied::phase)
    }

    /// Begins a mutation and applies it speculatively. Returns the id the
    /// remote call's result must be settled with.
    ///
    /// Both phases run here so a lease is never minted without being recorded
    /// as in flight.
    pub fn start(
        &mut self,
        kind: MutationKind,
        polling: &mut PollingController,
        cache: &mut CacheStore,
    ) -> Result<MutationId, Rejected> {
        let begun = self.begin(kind, polling, cache)?;
        Ok(self.apply(begun, cache))
    }

    /// Checks exclusivity, takes a lease (suspending polling for the first
    /// one) and snapshots the cache.
    fn begin(
        &mut self,
        kind: MutationKind,
        polling: &mut PollingController,
        cache: &CacheStore,
    ) -> Result<Begun, Rejected> {
        match &kind {
            MutationKind::Delete { id } if self.is_deleting(*id) => {
                return Err(Rejected::AlreadyDeleting(*id));
            }
            MutationKind::Create { .. } if self.create_pending() => {
                return Err(Rejected::CreatePending);
            }
            _ => {}
        }

        if self.in_flight.is_empty() {
            polling.suspend();
            self.window = Some(cache.snapshot());
        }
        self.minted += 1;
        let lease = MutationLease {
            id: MutationId(self.minted),
        };
        report_debug!("{} {} for {}", lease.id, MutationPhase::Begin, kind);
        Ok(Begun {
            lease,
            kind,
            snapshot: cache.snapshot(),
        })
    }

    /// Applies the speculative change and records the mutation as in flight.
    fn apply(&mut self, begun: Begun, cache: &mut CacheStore) -> MutationId {
        let applied = begun.apply(cache);
        let id = applied.id();
        report_debug!("{} {} for {}", id, applied.phase(), applied.kind);
        self.in_flight.insert(id, applied);
        id
    }

    /// Settles a mutation. Returns `None` for an id that is not in flight.
    pub fn settle(
        &mut self,
        id: MutationId,
        settlement: Settlement,
        cache: &mut CacheStore,
        polling: &mut PollingController,
    ) -> Option<Settled> {
        let applied = self.in_flight.remove(&id)?;

        let mut still_deleted: BTreeSet<ReportId> = self
            .in_flight
            .values()
            .filter_map(|other| other.kind.deletes())
            .collect();
        still_deleted.extend(self.committed_deletes.iter().copied());

        let (kind, lease) = applied.settle(settlement, cache, self.window.as_ref(), &still_deleted);
        report_info!("{} {} for {}", id, MutationPhase::Settle(settlement), kind);

        if let (Settlement::Commit, Some(deleted)) = (settlement, kind.deletes()) {
            self.committed_deletes.insert(deleted);
        }
        let refresh = self.release(lease, polling);

        Some(Settled {
            kind,
            settlement,
            refresh,
        })
    }

    fn release(&mut self, lease: MutationLease, polling: &mut PollingController) -> Option<RefreshId> {
        if !self.in_flight.is_empty() {
            report_debug!(
                "{} released; {} mutation(s) still hold polling",
                lease.id,
                self.in_flight.len()
            );
            return None;
        }
        self.committed_deletes.clear();
        self.window = None;
        let refresh = polling.resume();
        report_debug!("{} released; polling resumed with {}", lease.id, refresh);
        Some(refresh)
    }
}
