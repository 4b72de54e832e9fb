//! Client-side composition of equipment lists: grouping by type, status
//! tallies and pagination.

use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Equipment, EquipmentStatus, EquipmentType};

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Fixed, ordered type id -> label mapping used for grouping
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    labels: IndexMap<i32, String>,
}

impl TypeCatalog {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (i32, S)>,
        S: Into<String>,
    {
        Self {
            labels: pairs.into_iter().map(|(id, label)| (id, label.into())).collect(),
        }
    }

    pub fn label(&self, type_id: i32) -> Option<&str> {
        self.labels.get(&type_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::from_pairs(EquipmentType::ALL.into_iter().map(|t| (t.id(), t.label())))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusCounts {
    pub new: usize,
    pub working: usize,
    pub needs_repair: usize,
    pub disposed: usize,
}

impl StatusCounts {
    pub fn tally<'a>(items: impl IntoIterator<Item = &'a Equipment>) -> Self {
        let mut counts = Self::default();
        for item in items {
            counts.add(item.status);
        }
        counts
    }

    pub fn add(&mut self, status: EquipmentStatus) {
        match status {
            EquipmentStatus::New => self.new += 1,
            EquipmentStatus::Working => self.working += 1,
            EquipmentStatus::NeedsRepair => self.needs_repair += 1,
            EquipmentStatus::Disposed => self.disposed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.new + self.working + self.needs_repair + self.disposed
    }
}

/// All items of one type
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TypeBucket {
    pub type_id: i32,
    pub label: String,
    pub items: Vec<Equipment>,
    pub status_counts: StatusCounts,
}

/// Partition `items` into per-type buckets in catalog order.
///
/// Types without items produce no bucket; items whose type is not in the
/// catalog are left out.
pub fn group_by_type(items: &[Equipment], catalog: &TypeCatalog) -> Vec<TypeBucket> {
    let mut buckets: IndexMap<i32, Vec<Equipment>> =
        catalog.labels.keys().map(|id| (*id, Vec::new())).collect();

    for item in items {
        match buckets.get_mut(&item.type_id) {
            Some(bucket) => bucket.push(item.clone()),
            None => tracing::debug!("Skipping equipment {} with unknown type {}", item.id, item.type_id),
        }
    }

    buckets
        .into_iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(type_id, items)| TypeBucket {
            type_id,
            label: catalog.label(type_id).unwrap_or_default().to_string(),
            status_counts: StatusCounts::tally(&items),
            items,
        })
        .collect()
}

/// One page of a client-side paginated list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page actually returned after clamping
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slice `items` into 1-based pages of `page_size`, clamping `page` into range
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(total_items);

    Page {
        items: items[start.min(end)..end].to_vec(),
        page,
        page_size,
        total_pages,
        total_items,
    }
}
