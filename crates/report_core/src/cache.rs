//! Local cache of the report collection.
//!
//! Every write swaps the whole `Arc<ReportCollection>`; nothing is edited in
//! place, so a reader holding the result of [`CacheStore::read`] keeps a
//! consistent view no matter what happens to the store afterwards.
use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::report::{Report, ReportId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("duplicate report id {0} in collection")]
    DuplicateId(ReportId),
    #[error("removal of report {id} matched {removed} entries")]
    AmbiguousRemoval { id: ReportId, removed: usize },
}

/// Reports in server order, unique by id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportCollection {
    reports: Vec<Report>,
}

impl ReportCollection {
    pub fn new(reports: Vec<Report>) -> Result<Self, CollectionError> {
        let mut seen = HashSet::with_capacity(reports.len());
        for report in &reports {
            if !seen.insert(report.id) {
                return Err(CollectionError::DuplicateId(report.id));
            }
        }
        Ok(Self { reports })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn get(&self, id: ReportId) -> Option<&Report> {
        self.reports.iter().find(|report| report.id == id)
    }

    pub fn contains(&self, id: ReportId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<ReportId> {
        self.reports.iter().map(|report| report.id).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Report> {
        self.reports.iter()
    }

    pub fn as_slice(&self) -> &[Report] {
        &self.reports
    }

    fn without(&self, predicate: impl Fn(&Report) -> bool) -> (Self, usize) {
        let kept: Vec<Report> = self
            .reports
            .iter()
            .filter(|report| !predicate(report))
            .cloned()
            .collect();
        let removed = self.reports.len() - kept.len();
        (Self { reports: kept }, removed)
    }
}

impl<'a> IntoIterator for &'a ReportCollection {
    type Item = &'a Report;
    type IntoIter = std::slice::Iter<'a, Report>;

    fn into_iter(self) -> Self::IntoIter {
        self.reports.iter()
    }
}

/// Cache contents captured for a later [`CacheStore::restore`].
///
/// Deliberately not `Clone`: a snapshot belongs to exactly one mutation.
#[derive(Debug, PartialEq, Eq)]
pub struct CacheSnapshot {
    collection: Option<Arc<ReportCollection>>,
    version: u64,
}

impl CacheSnapshot {
    pub fn collection(&self) -> Option<&ReportCollection> {
        self.collection.as_deref()
    }

    /// Store version at capture time.
    pub fn version(&self) -> u64 {
        self.version
    }
}

#[derive(Debug)]
pub struct Removal {
    pub prior: CacheSnapshot,
    pub removed: usize,
}

#[derive(Debug, Default)]
pub struct CacheStore {
    current: Option<Arc<ReportCollection>>,
    version: u64,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until the first successful refresh.
    pub fn read(&self) -> Option<Arc<ReportCollection>> {
        self.current.clone()
    }

    /// Write counter, bumped by every change to the cached collection.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn replace(&mut self, collection: ReportCollection) {
        self.swap(Some(Arc::new(collection)));
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            collection: self.current.clone(),
            version: self.version,
        }
    }

    /// Drops every report matching `predicate` and hands back what was there before.
    pub fn remove_where(&mut self, predicate: impl Fn(&Report) -> bool) -> Removal {
        let prior = self.snapshot();
        let Some(current) = self.current.as_deref() else {
            return Removal { prior, removed: 0 };
        };
        let (next, removed) = current.without(predicate);
        if removed > 0 {
            self.swap(Some(Arc::new(next)));
        }
        Removal { prior, removed }
    }

    pub fn restore(&mut self, snapshot: CacheSnapshot) {
        self.swap(snapshot.collection);
    }

    fn swap(&mut self, next: Option<Arc<ReportCollection>>) {
        self.current = next;
        self.version += 1;
    }
}
