//! Builds the bounded, directionally-ordered fetch descriptor for one
//! comment page.

use chrono::{DateTime, Utc};

use crate::error::PageError;
use crate::pagination::cursor::decode_cursor;

/// Ordering direction for the range fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

/// Relay-style pagination arguments for one `fetch_comment_page` call.
#[derive(Debug, Clone, Default)]
pub struct CommentPageArgs {
    pub post_id: i64,
    /// Page size for forward pagination (ascending).
    pub first: Option<i32>,
    /// Page size for backward pagination (descending).
    pub last: Option<i32>,
    /// Exclusive lower bound cursor.
    pub after: Option<String>,
    /// Exclusive upper bound cursor.
    pub before: Option<String>,
}

impl CommentPageArgs {
    pub(crate) fn validate(&self) -> Result<(), PageError> {
        for (name, value) in [("first", self.first), ("last", self.last)] {
            if let Some(n) = value {
                if n < 0 {
                    return Err(PageError::Validation(format!(
                        "{name} must be non-negative, got {n}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Effective page bound. When both `first` and `last` are supplied,
    /// `first` takes precedence and the call paginates forward.
    pub(crate) fn bound(&self) -> Option<usize> {
        self.first.or(self.last).map(|n| n as usize)
    }

    pub(crate) fn direction(&self) -> OrderDirection {
        if self.first.is_some() {
            OrderDirection::Asc
        } else if self.last.is_some() {
            OrderDirection::Desc
        } else {
            OrderDirection::Asc
        }
    }
}

/// Abstract query descriptor handed to the storage collaborator:
/// predicate bounds, ordering, and row limit. Storage executes it and
/// returns rows in the requested order.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentRangeQuery {
    pub post_id: i64,
    /// `created_at > after` when present.
    pub after: Option<DateTime<Utc>>,
    /// `created_at < before` when present.
    pub before: Option<DateTime<Utc>>,
    pub order: OrderDirection,
    /// Requested bound plus one extra row for boundary detection;
    /// absent when the call is unbounded.
    pub limit: Option<i64>,
}

impl CommentRangeQuery {
    pub fn build(args: &CommentPageArgs) -> Result<Self, PageError> {
        args.validate()?;

        let after = args.after.as_deref().map(decode_cursor).transpose()?;
        let before = args.before.as_deref().map(decode_cursor).transpose()?;

        Ok(Self {
            post_id: args.post_id,
            after,
            before,
            order: args.direction(),
            limit: args.bound().map(|b| b as i64 + 1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::cursor::encode_cursor;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn first_paginates_forward_with_overfetch() {
        let query = CommentRangeQuery::build(&CommentPageArgs {
            post_id: 1,
            first: Some(10),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(query.order, OrderDirection::Asc);
        assert_eq!(query.limit, Some(11));
        assert!(query.after.is_none() && query.before.is_none());
    }

    #[test]
    fn last_paginates_backward() {
        let query = CommentRangeQuery::build(&CommentPageArgs {
            post_id: 1,
            last: Some(5),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(query.order, OrderDirection::Desc);
        assert_eq!(query.limit, Some(6));
    }

    #[test]
    fn no_bounds_means_unlimited_ascending() {
        let query = CommentRangeQuery::build(&CommentPageArgs {
            post_id: 7,
            ..Default::default()
        })
        .unwrap();

        assert_eq!(query.order, OrderDirection::Asc);
        assert_eq!(query.limit, None);
    }

    #[test]
    fn first_wins_when_both_bounds_are_supplied() {
        let query = CommentRangeQuery::build(&CommentPageArgs {
            post_id: 1,
            first: Some(3),
            last: Some(8),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(query.order, OrderDirection::Asc);
        assert_eq!(query.limit, Some(4));
    }

    #[test]
    fn cursors_become_exclusive_timestamp_bounds() {
        let after = t0();
        let before = t0() + chrono::Duration::hours(2);
        let query = CommentRangeQuery::build(&CommentPageArgs {
            post_id: 1,
            first: Some(2),
            after: Some(encode_cursor(after)),
            before: Some(encode_cursor(before)),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(query.after, Some(after));
        assert_eq!(query.before, Some(before));
    }

    #[test]
    fn negative_bound_is_rejected_before_cursor_decoding() {
        let err = CommentRangeQuery::build(&CommentPageArgs {
            post_id: 1,
            first: Some(-1),
            after: Some("garbage".into()),
            ..Default::default()
        })
        .unwrap_err();

        assert!(matches!(err, PageError::Validation(_)));
    }

    #[test]
    fn malformed_cursor_is_rejected() {
        let err = CommentRangeQuery::build(&CommentPageArgs {
            post_id: 1,
            first: Some(2),
            after: Some("garbage".into()),
            ..Default::default()
        })
        .unwrap_err();

        assert!(matches!(err, PageError::InvalidCursor(_)));
    }
}
