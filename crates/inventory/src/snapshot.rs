//! In-memory copy of the catalog as of the last load.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{ItemRecord, StockStatus};

/// 1-based sheet row number of a catalog record (row 1 is the header).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u32);

impl RowId {
    pub fn get(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for RowId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub row: RowId,
    pub item: ItemRecord,
}

impl SnapshotRow {
    pub fn status(&self) -> StockStatus {
        self.item.status()
    }
}

/// Genre selector for the catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenreFilter {
    #[default]
    All,
    Genre(String),
}

impl GenreFilter {
    /// `None`, blank, and `"all"` mean no filtering.
    pub fn from_query(genre: Option<&str>) -> Self {
        match genre.map(str::trim) {
            None | Some("") => GenreFilter::All,
            Some(g) if g.eq_ignore_ascii_case("all") => GenreFilter::All,
            Some(g) => GenreFilter::Genre(g.to_string()),
        }
    }

    pub fn matches(&self, item: &ItemRecord) -> bool {
        match self {
            GenreFilter::All => true,
            GenreFilter::Genre(g) => item.genre == *g,
        }
    }
}

/// Catalog rows in sheet order plus a name index.
///
/// The index is rebuilt whenever a snapshot is built, so it always agrees
/// with the rows it was built from. Names that repeat map to every row that
/// carries them, in sheet order; lookups return the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    rows: Vec<SnapshotRow>,
    by_name: HashMap<String, Vec<usize>>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<SnapshotRow>) -> Self {
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, row) in rows.iter().enumerate() {
            by_name
                .entry(row.item.name.as_str().to_string())
                .or_default()
                .push(idx);
        }
        Self { rows, by_name }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Rows in sheet order.
    pub fn rows(&self) -> &[SnapshotRow] {
        &self.rows
    }

    /// First row carrying `name`.
    pub fn find(&self, name: &str) -> Option<&SnapshotRow> {
        self.by_name
            .get(name)
            .and_then(|idxs| idxs.first())
            .map(|&i| &self.rows[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Every row carrying `name`, in sheet order.
    pub fn rows_named(&self, name: &str) -> Vec<&SnapshotRow> {
        self.by_name
            .get(name)
            .map(|idxs| idxs.iter().map(|&i| &self.rows[i]).collect())
            .unwrap_or_default()
    }

    /// Distinct genres in first-seen order.
    pub fn genres(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for row in &self.rows {
            if !seen.iter().any(|g| *g == row.item.genre) {
                seen.push(row.item.genre.clone());
            }
        }
        seen
    }

    pub fn filter<'a>(&'a self, filter: &'a GenreFilter) -> impl Iterator<Item = &'a SnapshotRow> + 'a {
        self.rows.iter().filter(move |r| filter.matches(&r.item))
    }

    pub fn shortages(&self) -> impl Iterator<Item = &SnapshotRow> {
        self.rows
            .iter()
            .filter(|r| r.status() == StockStatus::Shortage)
    }
}
