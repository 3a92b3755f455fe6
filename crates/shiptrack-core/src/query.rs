//! # List Query Normalization
//!
//! Converts raw, untrusted, all-optional string parameters into a validated,
//! bounded query descriptor. Client-supplied numeric ranges and field names
//! are never trusted: pagination values degrade to sane defaults, while
//! semantic filters (sort field, status, dates) hard-fail so a malformed
//! filter can never silently return the wrong result set.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::model::Shipment;
use crate::status::ShipmentStatus;

/// Default page when the parameter is missing or unusable.
pub const DEFAULT_PAGE: u32 = 1;
/// Default page size when the parameter is missing or unusable.
pub const DEFAULT_LIMIT: u32 = 10;
/// Hard cap on page size. Values above are clamped, not rejected.
pub const MAX_LIMIT: u32 = 100;

/// Raw query parameters as they arrive from the transport layer.
///
/// Every field is an optional string; nothing here has been validated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawListParams {
    /// Requested page number.
    pub page: Option<String>,
    /// Requested page size.
    pub limit: Option<String>,
    /// Requested sort field.
    pub sort_by: Option<String>,
    /// Requested sort direction.
    pub order: Option<String>,
    /// Status filter.
    pub status: Option<String>,
    /// Origin substring filter.
    pub origin: Option<String>,
    /// Destination substring filter.
    pub destination: Option<String>,
    /// Sender/receiver name substring filter.
    pub search: Option<String>,
    /// Lower bound on creation date (inclusive).
    pub start_date: Option<String>,
    /// Upper bound on creation date (inclusive).
    pub end_date: Option<String>,
}

/// A field shipments can be sorted by.
///
/// The allow-list is closed: anything outside it fails normalization, which
/// is what lets the Postgres store splice the column name into `ORDER BY`
/// without ever touching client input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Creation timestamp (the default).
    CreatedAt,
    /// Last-update timestamp.
    UpdatedAt,
    /// Sender name.
    SenderName,
    /// Receiver name.
    ReceiverName,
    /// Origin address.
    Origin,
    /// Destination address.
    Destination,
    /// Lifecycle status (ordered by wire string).
    Status,
    /// Tracking number.
    TrackingNumber,
}

impl SortField {
    /// All sortable fields, in wire order.
    pub const ALL: [SortField; 8] = [
        Self::CreatedAt,
        Self::UpdatedAt,
        Self::SenderName,
        Self::ReceiverName,
        Self::Origin,
        Self::Destination,
        Self::Status,
        Self::TrackingNumber,
    ];

    /// The wire-format (camelCase) name of this field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
            Self::SenderName => "senderName",
            Self::ReceiverName => "receiverName",
            Self::Origin => "origin",
            Self::Destination => "destination",
            Self::Status => "status",
            Self::TrackingNumber => "trackingNumber",
        }
    }

    /// Parse a wire-format name against the allow-list.
    pub fn parse(input: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == input)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending (the default).
    Desc,
}

impl SortOrder {
    /// The wire-format name of this direction.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Validated filters driving `count` and `list` against a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipmentFilters {
    /// Exact status match.
    pub status: Option<ShipmentStatus>,
    /// Case-insensitive substring match on origin.
    pub origin: Option<String>,
    /// Case-insensitive substring match on destination.
    pub destination: Option<String>,
    /// Case-insensitive substring match on sender OR receiver name.
    pub search: Option<String>,
    /// Creation date lower bound (inclusive).
    pub start_date: Option<DateTime<Utc>>,
    /// Creation date upper bound (inclusive).
    pub end_date: Option<DateTime<Utc>>,
}

impl ShipmentFilters {
    /// Whether a shipment satisfies every active filter.
    ///
    /// This is the reference semantics; the in-memory store evaluates it
    /// directly and the Postgres store reproduces it in SQL.
    pub fn matches(&self, shipment: &Shipment) -> bool {
        if let Some(status) = self.status {
            if shipment.status != status {
                return false;
            }
        }
        if let Some(origin) = &self.origin {
            if !contains_ci(&shipment.origin, origin) {
                return false;
            }
        }
        if let Some(destination) = &self.destination {
            if !contains_ci(&shipment.destination, destination) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !contains_ci(&shipment.sender_name, search)
                && !contains_ci(&shipment.receiver_name, search)
            {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if shipment.created_at < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if shipment.created_at > end {
                return false;
            }
        }
        true
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// A validated, bounded descriptor for listing shipments.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    /// Page number, ≥ 1.
    pub page: u32,
    /// Page size, 1–[`MAX_LIMIT`].
    pub limit: u32,
    /// Sort field from the allow-list.
    pub sort_by: SortField,
    /// Sort direction.
    pub order: SortOrder,
    /// Validated filters.
    pub filters: ShipmentFilters,
}

impl ListQuery {
    /// Normalize raw parameters into a bounded descriptor.
    ///
    /// Pagination degrades silently (missing/non-numeric/out-of-range `page`
    /// and `limit` fall back to defaults, oversized `limit` is clamped);
    /// sort field, status, and date filters hard-fail with a [`QueryError`].
    pub fn from_raw(raw: RawListParams) -> Result<Self, QueryError> {
        let page = raw
            .page
            .as_deref()
            .and_then(|p| p.trim().parse::<u32>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(DEFAULT_PAGE);

        let limit = raw
            .limit
            .as_deref()
            .and_then(|l| l.trim().parse::<u32>().ok())
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);

        let sort_by = match non_empty(raw.sort_by.as_deref()) {
            Some(value) => SortField::parse(value).ok_or_else(|| QueryError::InvalidSortField {
                value: value.to_string(),
            })?,
            None => SortField::CreatedAt,
        };

        // Anything other than a literal "asc" sorts descending.
        let order = match raw.order.as_deref() {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        };

        let status = match non_empty(raw.status.as_deref()) {
            Some(value) => Some(value.parse::<ShipmentStatus>().map_err(|_| {
                QueryError::InvalidStatusFilter {
                    value: value.to_string(),
                }
            })?),
            None => None,
        };

        let start_date = match non_empty(raw.start_date.as_deref()) {
            Some(value) => Some(parse_date_param("startDate", value)?),
            None => None,
        };
        let end_date = match non_empty(raw.end_date.as_deref()) {
            Some(value) => Some(parse_date_param("endDate", value)?),
            None => None,
        };
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(QueryError::InvalidDateRange);
            }
        }

        Ok(Self {
            page,
            limit,
            sort_by,
            order,
            filters: ShipmentFilters {
                status,
                origin: non_empty(raw.origin.as_deref()).map(str::to_string),
                destination: non_empty(raw.destination.as_deref()).map(str::to_string),
                search: non_empty(raw.search.as_deref()).map(str::to_string),
                start_date,
                end_date,
            },
        })
    }

    /// Number of records to skip: `(page - 1) * limit`.
    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Accept an RFC 3339 datetime, or a bare `YYYY-MM-DD` date interpreted as
/// UTC midnight. A bare `endDate` therefore bounds at the *start* of that
/// day, matching the behavior the API has always had.
fn parse_date_param(field: &'static str, value: &str) -> Result<DateTime<Utc>, QueryError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    Err(QueryError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// A hard query-parameter validation failure.
///
/// Display strings are client-facing; the API forwards them verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The sort field is outside the allow-list.
    #[error(
        "Invalid sortBy field: {value}. Allowed fields: {}",
        SortField::ALL.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(", ")
    )]
    InvalidSortField {
        /// The rejected input.
        value: String,
    },

    /// The status filter is not a valid lifecycle state.
    #[error(
        "Invalid status filter: {value}. Valid statuses: {}",
        ShipmentStatus::wire_values()
    )]
    InvalidStatusFilter {
        /// The rejected input.
        value: String,
    },

    /// A date filter is not ISO 8601.
    #[error("Invalid {field} format: {value}. Use ISO 8601 format (e.g., 2024-01-01)")]
    InvalidDate {
        /// Which parameter failed.
        field: &'static str,
        /// The rejected input.
        value: String,
    },

    /// `startDate` is after `endDate`.
    #[error("startDate cannot be after endDate")]
    InvalidDateRange,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn raw(pairs: &[(&str, &str)]) -> RawListParams {
        let mut params = RawListParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "page" => params.page = value,
                "limit" => params.limit = value,
                "sortBy" => params.sort_by = value,
                "order" => params.order = value,
                "status" => params.status = value,
                "origin" => params.origin = value,
                "destination" => params.destination = value,
                "search" => params.search = value,
                "startDate" => params.start_date = value,
                "endDate" => params.end_date = value,
                other => panic!("unknown param {other}"),
            }
        }
        params
    }

    #[test]
    fn empty_input_yields_defaults() {
        let query = ListQuery::from_raw(RawListParams::default()).unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 10);
        assert_eq!(query.sort_by, SortField::CreatedAt);
        assert_eq!(query.order, SortOrder::Desc);
        assert_eq!(query.filters, ShipmentFilters::default());
    }

    #[test]
    fn pagination_degrades_silently() {
        for (page, limit) in [("-1", "0"), ("abc", "xyz"), ("0", "-3"), ("", "")] {
            let query = ListQuery::from_raw(raw(&[("page", page), ("limit", limit)])).unwrap();
            assert_eq!((query.page, query.limit), (1, 10), "page={page} limit={limit}");
        }
    }

    #[test]
    fn limit_is_clamped_not_rejected() {
        let query = ListQuery::from_raw(raw(&[("limit", "200")])).unwrap();
        assert_eq!(query.limit, 100);
        let query = ListQuery::from_raw(raw(&[("limit", "100")])).unwrap();
        assert_eq!(query.limit, 100);
    }

    #[test]
    fn sort_field_allow_list_is_hard() {
        let query = ListQuery::from_raw(raw(&[("sortBy", "updatedAt")])).unwrap();
        assert_eq!(query.sort_by, SortField::UpdatedAt);

        let err = ListQuery::from_raw(raw(&[("sortBy", "price")])).unwrap_err();
        assert!(matches!(err, QueryError::InvalidSortField { .. }));
        assert!(err.to_string().contains("createdAt"));

        // Field names are case-sensitive: snake_case is not in the allow-list.
        assert!(ListQuery::from_raw(raw(&[("sortBy", "created_at")])).is_err());
    }

    #[test]
    fn order_defaults_to_desc_for_anything_but_asc() {
        for order in ["desc", "DESC", "ascending", "Asc", "1"] {
            let query = ListQuery::from_raw(raw(&[("order", order)])).unwrap();
            assert_eq!(query.order, SortOrder::Desc, "order={order}");
        }
        let query = ListQuery::from_raw(raw(&[("order", "asc")])).unwrap();
        assert_eq!(query.order, SortOrder::Asc);
    }

    #[test]
    fn status_filter_is_hard() {
        let query = ListQuery::from_raw(raw(&[("status", "in_transit")])).unwrap();
        assert_eq!(query.filters.status, Some(ShipmentStatus::InTransit));

        let err = ListQuery::from_raw(raw(&[("status", "shipped")])).unwrap_err();
        assert!(matches!(err, QueryError::InvalidStatusFilter { .. }));
    }

    #[test]
    fn text_filters_are_trimmed_and_empty_means_absent() {
        let query = ListQuery::from_raw(raw(&[
            ("origin", "  Lagos "),
            ("destination", "   "),
            ("search", "jane"),
        ]))
        .unwrap();
        assert_eq!(query.filters.origin.as_deref(), Some("Lagos"));
        assert_eq!(query.filters.destination, None);
        assert_eq!(query.filters.search.as_deref(), Some("jane"));
    }

    #[test]
    fn date_filters_accept_dates_and_datetimes() {
        let query = ListQuery::from_raw(raw(&[
            ("startDate", "2024-01-01"),
            ("endDate", "2024-12-31T23:59:59Z"),
        ]))
        .unwrap();
        assert_eq!(
            query.filters.start_date.unwrap().to_rfc3339(),
            "2024-01-01T00:00:00+00:00"
        );
        assert!(query.filters.end_date.is_some());
    }

    #[test]
    fn malformed_dates_are_hard_failures() {
        let err = ListQuery::from_raw(raw(&[("startDate", "01/02/2024")])).unwrap_err();
        assert!(matches!(err, QueryError::InvalidDate { field: "startDate", .. }));
        let err = ListQuery::from_raw(raw(&[("endDate", "not-a-date")])).unwrap_err();
        assert!(matches!(err, QueryError::InvalidDate { field: "endDate", .. }));
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let err = ListQuery::from_raw(raw(&[
            ("startDate", "2024-06-01"),
            ("endDate", "2024-01-01"),
        ]))
        .unwrap_err();
        assert_eq!(err, QueryError::InvalidDateRange);
        // Equal bounds are fine.
        assert!(ListQuery::from_raw(raw(&[
            ("startDate", "2024-06-01"),
            ("endDate", "2024-06-01"),
        ]))
        .is_ok());
    }

    #[test]
    fn skip_is_page_minus_one_times_limit() {
        let query = ListQuery::from_raw(raw(&[("page", "3"), ("limit", "25")])).unwrap();
        assert_eq!(query.skip(), 50);
    }

    proptest! {
        // Whatever the client sends for page/limit, the descriptor stays bounded.
        #[test]
        fn pagination_is_always_bounded(page in ".{0,12}", limit in ".{0,12}") {
            let query = ListQuery::from_raw(raw(&[("page", &page), ("limit", &limit)])).unwrap();
            prop_assert!(query.page >= 1);
            prop_assert!(query.limit >= 1 && query.limit <= MAX_LIMIT);
        }
    }
}
