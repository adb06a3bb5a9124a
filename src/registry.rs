use std::sync::{Arc, Mutex, PoisonError};

use chromate_cdp::cdp::browser_protocol::target::{TargetId, TargetInfo};

use crate::utils::target_info_diff;

/// Local mirror of the browser's target set.
///
/// Records are kept in creation order; a record exists iff the browser has
/// not signalled its destruction. Shared between the event loop (which
/// mutates it on target notifications) and [`crate::Browser`] handles (which
/// read it to enumerate tabs), with one mutex serializing every access.
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
    inner: Arc<Mutex<Vec<TargetInfo>>>,
}

impl TargetRegistry {
    fn targets(&self) -> std::sync::MutexGuard<'_, Vec<TargetInfo>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a new record. Returns false when the target id is already
    /// mirrored.
    pub(crate) fn insert(&self, info: TargetInfo) -> bool {
        let mut targets = self.targets();
        if targets.iter().any(|t| t.target_id == info.target_id) {
            return false;
        }
        targets.push(info);
        true
    }

    /// Merges server-reported fields over the local record. Returns false
    /// when the target is not mirrored.
    pub(crate) fn update(&self, info: TargetInfo) -> bool {
        let mut targets = self.targets();
        let Some(current) = targets.iter_mut().find(|t| t.target_id == info.target_id) else {
            return false;
        };
        if tracing::enabled!(tracing::Level::DEBUG) {
            for (field, old, new) in target_info_diff(current, &info) {
                tracing::debug!("target {} changed: {field}: {old} => {new}", info.target_id);
            }
        }
        *current = info;
        true
    }

    /// Update-or-create, used by reconciliation. Never deletes; removal is
    /// event-driven only.
    pub(crate) fn upsert(&self, info: TargetInfo) -> bool {
        if self.update(info.clone()) {
            false
        } else {
            self.insert(info)
        }
    }

    pub(crate) fn remove(&self, target_id: &TargetId) -> bool {
        let mut targets = self.targets();
        let before = targets.len();
        targets.retain(|t| &t.target_id != target_id);
        targets.len() != before
    }

    pub fn get(&self, target_id: &TargetId) -> Option<TargetInfo> {
        self.targets().iter().find(|t| &t.target_id == target_id).cloned()
    }

    pub fn contains(&self, target_id: &TargetId) -> bool {
        self.targets().iter().any(|t| &t.target_id == target_id)
    }

    /// Every mirrored target, in creation order.
    pub fn all(&self) -> Vec<TargetInfo> {
        self.targets().clone()
    }

    /// The page-type targets, in creation order.
    pub fn pages(&self) -> Vec<TargetInfo> {
        self.targets().iter().filter(|t| t.is_page()).cloned().collect()
    }

    /// The earliest surviving page target.
    pub fn main_target(&self) -> Option<TargetInfo> {
        self.targets().iter().find(|t| t.is_page()).cloned()
    }

    pub fn len(&self) -> usize {
        self.targets().len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets().is_empty()
    }
}
