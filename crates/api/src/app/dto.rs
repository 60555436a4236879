use serde::{Deserialize, Serialize};

use stockbook_core::InventoryError;
use stockbook_infra::{Catalog, LoadStats};
use stockbook_inventory::{GenreFilter, SnapshotRow, StockStatus};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ItemsQuery {
    pub genre: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MovementsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SetQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct AdjustRequest {
    pub amount: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct AggregateRequest {
    pub window_days: Option<u32>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ItemView {
    pub row: u32,
    pub name: String,
    pub quantity: i64,
    pub genre: String,
    pub required_quantity: i64,
    pub monthly_usage: i64,
    pub status: StockStatus,
}

impl From<&SnapshotRow> for ItemView {
    fn from(r: &SnapshotRow) -> Self {
        Self {
            row: r.row.get(),
            name: r.item.name.to_string(),
            quantity: r.item.quantity,
            genre: r.item.genre.clone(),
            required_quantity: r.item.required_quantity,
            monthly_usage: r.item.monthly_usage,
            status: r.status(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NoticeView {
    pub error: &'static str,
    pub message: String,
}

impl From<&InventoryError> for NoticeView {
    fn from(err: &InventoryError) -> Self {
        Self {
            error: err.code(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<ItemView>,
    /// Every genre in the catalog, whatever the filter.
    pub genres: Vec<String>,
    pub genre: Option<String>,
    pub shortages: usize,
    pub coerced_cells: usize,
    pub skipped_rows: usize,
    pub notice: Option<NoticeView>,
}

impl ItemsResponse {
    pub fn build(catalog: &Catalog, filter: &GenreFilter) -> Self {
        let items: Vec<ItemView> = catalog.snapshot.filter(filter).map(ItemView::from).collect();
        let LoadStats {
            coerced_cells,
            skipped_rows,
        } = catalog.stats;
        Self {
            shortages: items
                .iter()
                .filter(|i| i.status == StockStatus::Shortage)
                .count(),
            items,
            genres: catalog.snapshot.genres(),
            genre: match filter {
                GenreFilter::All => None,
                GenreFilter::Genre(g) => Some(g.clone()),
            },
            coerced_cells,
            skipped_rows,
            notice: catalog.notice.as_ref().map(NoticeView::from),
        }
    }
}
