//! Domain models for checklist items and collection queries.

use time::OffsetDateTime;
use uuid::Uuid;

pub const DEFAULT_LIMIT: u64 = 30;
pub const MAX_LIMIT: u64 = 100;
pub const DEFAULT_PRIORITY: i32 = 3;

/// A checklist item owned by exactly one account.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub completed: bool,
    pub due_date: Option<OffsetDateTime>,
    pub priority: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Fields for a new item. The owner is deliberately absent; it always
/// comes from the authenticated context.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<OffsetDateTime>,
    pub priority: Option<i32>,
}

/// Partial update. Outer `None` leaves the field untouched; for nullable
/// columns the inner option distinguishes clearing from leaving alone.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<OffsetDateTime>>,
    pub priority: Option<i32>,
}

/// Raw listing parameters, straight off the query string and untrusted.
#[derive(Debug, Clone, Default)]
pub struct ItemQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<String>,
}

/// Normalized listing parameters. Constructing one cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u64,
    pub limit: u64,
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Sort,
}

impl ListQuery {
    /// Normalize untrusted parameters.
    ///
    /// Malformed paging numbers recover to defaults, `limit` is clamped
    /// to `1..=MAX_LIMIT`, empty filter strings contribute nothing, and
    /// sort parameters go through [`SortField::from_param`] and
    /// [`SortDirection::from_param`].
    #[must_use]
    pub fn from_raw(raw: &ItemQuery) -> Self {
        let page = parse_number(raw.page.as_deref()).unwrap_or(1).max(1);
        let limit = parse_number(raw.limit.as_deref())
            .unwrap_or(DEFAULT_LIMIT)
            .clamp(1, MAX_LIMIT);

        Self {
            page,
            limit,
            category: non_empty(raw.category.as_deref()),
            search: non_empty(raw.search.as_deref()),
            sort: Sort {
                field: SortField::from_param(raw.sort_field.as_deref()),
                direction: SortDirection::from_param(raw.sort_direction.as_deref()),
            },
        }
    }

    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

/// The closed set of sortable columns. Raw strings never reach the
/// query builder; anything unlisted is substituted, not passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    Category,
    Completed,
    DueDate,
    Priority,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Absent selects the default priority ordering; a present but
    /// unknown name silently substitutes `createdAt`.
    #[must_use]
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            None => Self::Priority,
            Some(name) => Self::parse(name).unwrap_or(Self::CreatedAt),
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        Some(match raw {
            "id" => Self::Id,
            "title" => Self::Title,
            "category" => Self::Category,
            "completed" => Self::Completed,
            "dueDate" => Self::DueDate,
            "priority" => Self::Priority,
            "createdAt" => Self::CreatedAt,
            "updatedAt" => Self::UpdatedAt,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Exactly `desc` descends; everything else ascends.
    #[must_use]
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }
}

/// One page of results plus collection-level counters.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub current_page: u64,
    pub total_pages: u64,
}

fn parse_number(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse().ok())
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| !s.is_empty()).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> ItemQuery {
        let mut query = ItemQuery::default();
        for (key, value) in pairs {
            let value = Some((*value).to_owned());
            match *key {
                "page" => query.page = value,
                "limit" => query.limit = value,
                "category" => query.category = value,
                "search" => query.search = value,
                "sortField" => query.sort_field = value,
                "sortDirection" => query.sort_direction = value,
                other => panic!("unknown key {other}"),
            }
        }
        query
    }

    #[test]
    fn defaults_when_everything_is_absent() {
        let q = ListQuery::from_raw(&ItemQuery::default());
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, DEFAULT_LIMIT);
        assert_eq!(q.offset(), 0);
        assert!(q.category.is_none());
        assert!(q.search.is_none());
        assert_eq!(q.sort.field, SortField::Priority);
        assert_eq!(q.sort.direction, SortDirection::Asc);
    }

    #[test]
    fn malformed_numbers_recover_to_defaults() {
        let q = ListQuery::from_raw(&raw(&[("page", "abc"), ("limit", "lots")]));
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, DEFAULT_LIMIT);

        let q = ListQuery::from_raw(&raw(&[("page", "-2"), ("limit", "-5")]));
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn page_floor_and_limit_clamp() {
        let q = ListQuery::from_raw(&raw(&[("page", "0"), ("limit", "0")]));
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 1);

        let q = ListQuery::from_raw(&raw(&[("limit", "9999")]));
        assert_eq!(q.limit, MAX_LIMIT);
    }

    #[test]
    fn offset_is_pages_before_current() {
        let q = ListQuery::from_raw(&raw(&[("page", "3"), ("limit", "10")]));
        assert_eq!(q.offset(), 20);
    }

    #[test]
    fn empty_filter_strings_contribute_nothing() {
        let q = ListQuery::from_raw(&raw(&[("category", ""), ("search", "")]));
        assert!(q.category.is_none());
        assert!(q.search.is_none());
    }

    #[test]
    fn known_sort_fields_pass_through() {
        let q = ListQuery::from_raw(&raw(&[("sortField", "dueDate"), ("sortDirection", "desc")]));
        assert_eq!(q.sort.field, SortField::DueDate);
        assert_eq!(q.sort.direction, SortDirection::Desc);
    }

    #[test]
    fn unknown_sort_field_substitutes_created_at() {
        let q = ListQuery::from_raw(&raw(&[("sortField", "owner_id; DROP TABLE items")]));
        assert_eq!(q.sort.field, SortField::CreatedAt);
    }

    #[test]
    fn empty_sort_field_counts_as_unknown() {
        // Present-but-empty is not the same as absent.
        let q = ListQuery::from_raw(&raw(&[("sortField", "")]));
        assert_eq!(q.sort.field, SortField::CreatedAt);
    }

    #[test]
    fn sort_direction_must_be_exactly_desc() {
        for odd in ["DESC", "Desc", "descending", "up", ""] {
            let q = ListQuery::from_raw(&raw(&[("sortDirection", odd)]));
            assert_eq!(q.sort.direction, SortDirection::Asc, "for {odd:?}");
        }
    }
}
