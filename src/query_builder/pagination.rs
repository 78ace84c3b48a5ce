use serde::Serialize;

/// LIMIT/OFFSET parameters compiled from a page/page-size pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub fn from_page(page: i64, page_size: i64) -> Self {
        Self {
            limit: page_size,
            offset: offset_for(page, page_size),
        }
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        format!(" LIMIT {} OFFSET {}", self.limit, self.offset)
    }
}

/// `pageSize * (page - 1)` for positive inputs. The degenerate fallback
/// (`offset = page` otherwise) is long-standing observed behavior, kept until
/// a product decision says otherwise.
pub fn offset_for(page: i64, page_size: i64) -> i64 {
    if page > 0 && page_size > 0 {
        page_size * (page - 1)
    } else {
        page
    }
}

fn total_pages(page_size: i64, count: i64) -> i64 {
    if count > 0 && page_size > 0 {
        (count + page_size - 1) / page_size
    } else {
        0
    }
}

fn records_to(page: i64, page_size: i64) -> i64 {
    if page_size > 0 && page > 0 {
        page_size * page
    } else {
        0
    }
}

fn records_from(page: i64, page_size: i64) -> i64 {
    let to = records_to(page, page_size);
    if to > 0 && page_size > 0 {
        let from = to - page_size + 1;
        if from == 0 {
            1
        } else {
            from
        }
    } else {
        0
    }
}

/// Paging metadata envelope returned with every query result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope {
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
    pub max_count: i64,
    pub records_from: i64,
    pub records_to: i64,
}

impl PageEnvelope {
    pub fn new(page: i64, page_size: i64, count: i64) -> Self {
        Self {
            page,
            page_size,
            total_pages: total_pages(page_size, count),
            max_count: count,
            records_from: records_from(page, page_size),
            records_to: records_to(page, page_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_page_based_pagination() {
        let pagination = Pagination::from_page(2, 10);
        assert_eq!(pagination.limit, 10);
        assert_eq!(pagination.offset, 10);
        assert_eq!(pagination.to_sql(), " LIMIT 10 OFFSET 10");
    }

    #[test]
    fn test_first_page_pagination() {
        let pagination = Pagination::from_page(1, 20);
        assert_eq!(pagination.offset, 0);
        assert_eq!(pagination.to_sql(), " LIMIT 20 OFFSET 0");
    }

    #[test]
    fn test_degenerate_offset_fallback() {
        // page <= 0 or pageSize <= 0 falls back to offset = page
        assert_eq!(offset_for(0, 10), 0);
        assert_eq!(offset_for(-3, 10), -3);
        assert_eq!(offset_for(5, 0), 5);
    }

    #[test]
    fn test_envelope_for_first_page() {
        let envelope = PageEnvelope::new(1, 2, 5);
        assert_eq!(
            envelope,
            PageEnvelope {
                page: 1,
                page_size: 2,
                total_pages: 3,
                max_count: 5,
                records_from: 1,
                records_to: 2,
            }
        );
    }

    #[test]
    fn test_envelope_zero_count() {
        let envelope = PageEnvelope::new(1, 10, 0);
        assert_eq!(envelope.total_pages, 0);
        assert_eq!(envelope.max_count, 0);
        assert_eq!(envelope.records_from, 1);
        assert_eq!(envelope.records_to, 10);
    }

    #[test]
    fn test_envelope_zero_page_size() {
        let envelope = PageEnvelope::new(1, 0, 5);
        assert_eq!(envelope.total_pages, 0);
        assert_eq!(envelope.records_from, 0);
        assert_eq!(envelope.records_to, 0);
    }

    #[test]
    fn test_envelope_serializes_camel_case() {
        let json = serde_json::to_value(PageEnvelope::new(1, 2, 5)).unwrap();
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["maxCount"], 5);
        assert_eq!(json["recordsFrom"], 1);
        assert_eq!(json["recordsTo"], 2);
    }

    proptest! {
        #[test]
        fn prop_envelope_invariants(page in 1i64..10_000, page_size in 1i64..1_000, count in 0i64..1_000_000) {
            let envelope = PageEnvelope::new(page, page_size, count);
            if count > 0 {
                prop_assert_eq!(envelope.total_pages, (count + page_size - 1) / page_size);
            } else {
                prop_assert_eq!(envelope.total_pages, 0);
            }
            prop_assert_eq!(envelope.records_to, page_size * page);
            prop_assert_eq!(envelope.records_from, envelope.records_to - page_size + 1);
        }

        #[test]
        fn prop_offset_matches_page_math(page in 1i64..10_000, page_size in 1i64..1_000) {
            prop_assert_eq!(offset_for(page, page_size), page_size * (page - 1));
        }
    }
}
