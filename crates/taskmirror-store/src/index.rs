//! Derived status-to-task-ids index.

use std::collections::BTreeMap;

use taskmirror_core::{TaskId, TaskStatus};

use crate::record::TaskRecord;

/// Mapping from each status to the ordered task ids currently holding it.
///
/// Buckets for every known status exist from construction; membership is the
/// exact inverse of `TaskRecord::status` at all times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndex {
    buckets: BTreeMap<TaskStatus, Vec<TaskId>>,
}

impl Default for StatusIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusIndex {
    /// Empty index with a bucket pre-created for every status.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: TaskStatus::ALL
                .into_iter()
                .map(|status| (status, Vec::new()))
                .collect(),
        }
    }

    /// Rebuild the index from scratch over an iterator of records.
    pub fn rebuild<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a TaskRecord>,
    {
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
        for record in records {
            self.append(record.status, record.id.clone());
        }
    }

    /// Append an id to the bucket for `status`.
    pub fn append(&mut self, status: TaskStatus, id: TaskId) {
        self.buckets.entry(status).or_default().push(id);
    }

    /// Remove an id from the bucket for `status`, if present.
    pub fn remove(&mut self, status: TaskStatus, id: &TaskId) {
        if let Some(bucket) = self.buckets.get_mut(&status) {
            bucket.retain(|member| member != id);
        }
    }

    /// Move an id between buckets. Remove and append happen back to back so
    /// no caller ever observes the id in both or in neither.
    pub fn transfer(&mut self, id: &TaskId, from: TaskStatus, to: TaskStatus) {
        if from == to {
            return;
        }
        self.remove(from, id);
        self.append(to, id.clone());
    }

    /// Ordered ids currently holding `status`.
    #[must_use]
    pub fn ids(&self, status: TaskStatus) -> &[TaskId] {
        self.buckets.get(&status).map_or(&[], Vec::as_slice)
    }

    /// Number of ids per status, covering every bucket.
    #[must_use]
    pub fn counts(&self) -> BTreeMap<TaskStatus, usize> {
        self.buckets
            .iter()
            .map(|(status, bucket)| (*status, bucket.len()))
            .collect()
    }
}
