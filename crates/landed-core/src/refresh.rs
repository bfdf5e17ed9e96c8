//! # Refresh Targets
//!
//! What the view must redisplay after a recalculation.
//!
//! Recalculation functions never talk to the host. They return a
//! [`RefreshSet`] naming every field and table they rewrote, and the
//! adapter hands it to whatever renders the form.
//!
//! ```text
//! recompute_cif_totals(&mut doc)
//!      │
//!      ▼
//! RefreshSet [total_cif, total_freight, total_insurance, items, total_qty, total_fob]
//!      │
//!      ▼
//! landed-form ──► RefreshSink::refresh(target) for each
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{ChildTable, DocField};

/// A single thing to redisplay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum RefreshTarget {
    /// A scalar field of the document.
    Field(DocField),
    /// A whole child table (rows and footer).
    Table(ChildTable),
}

impl RefreshTarget {
    /// The host's name for the field or table.
    pub const fn name(&self) -> &'static str {
        match self {
            RefreshTarget::Field(field) => field.name(),
            RefreshTarget::Table(table) => table.name(),
        }
    }
}

impl From<DocField> for RefreshTarget {
    fn from(field: DocField) -> Self {
        RefreshTarget::Field(field)
    }
}

impl From<ChildTable> for RefreshTarget {
    fn from(table: ChildTable) -> Self {
        RefreshTarget::Table(table)
    }
}

/// Ordered set of refresh targets. Insertion order is kept and duplicates
/// are dropped, so a cascade refreshes each target once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshSet(Vec<RefreshTarget>);

impl RefreshSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a target unless it is already present.
    pub fn push(&mut self, target: impl Into<RefreshTarget>) {
        let target = target.into();
        if !self.0.contains(&target) {
            self.0.push(target);
        }
    }

    /// Appends every target of `other`, keeping first-seen order.
    pub fn merge(&mut self, other: RefreshSet) {
        for target in other.0 {
            self.push(target);
        }
    }

    pub fn contains(&self, target: impl Into<RefreshTarget>) -> bool {
        self.0.contains(&target.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RefreshTarget> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for RefreshSet {
    type Item = RefreshTarget;
    type IntoIter = std::vec::IntoIter<RefreshTarget>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<T: Into<RefreshTarget>> FromIterator<T> for RefreshSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = RefreshSet::new();
        for target in iter {
            set.push(target);
        }
        set
    }
}
