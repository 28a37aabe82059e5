//! Reassembles the reply tree from one flat, ordered page of comment
//! rows.

use std::collections::HashMap;

use crate::models::{Comment, CommentEdge};
use crate::pagination::cursor::encode_cursor;

/// The trimmed page window: edges in input order, plus whether a row
/// beyond the requested bound was observed.
#[derive(Debug)]
pub struct PageWindow {
    pub edges: Vec<CommentEdge>,
    pub overflow: bool,
}

/// Single left-to-right pass over the rows returned by storage.
///
/// Rows past the requested bound are not consumed; the first such row
/// only marks that more data exists. Each kept row becomes an edge, and
/// a reply is attached to its parent's `replies` when the parent was
/// already seen in this window. Replies stay in the flat edge list even
/// when attached; a reply whose parent is outside the window remains
/// top-level only. Attachment is by id lookup in a map scoped to this
/// call, so no comment ever holds a reference back to its parent.
pub fn reassemble(rows: Vec<Comment>, bound: Option<usize>) -> PageWindow {
    let mut kept: Vec<Comment> = Vec::new();
    let mut child_slots: Vec<Vec<usize>> = Vec::new();
    let mut index_by_id: HashMap<i64, usize> = HashMap::new();
    let mut overflow = false;

    for row in rows {
        if bound.is_some_and(|b| kept.len() >= b) {
            overflow = true;
            break;
        }

        let index = kept.len();
        if let Some(parent_id) = row.parent_comment_id {
            if let Some(&parent_index) = index_by_id.get(&parent_id) {
                child_slots[parent_index].push(index);
            }
        }
        index_by_id.insert(row.id, index);
        kept.push(row);
        child_slots.push(Vec::new());
    }

    // A reply always carries a later index than its parent (it was
    // created later, and descending input never attaches), so a reverse
    // sweep sees every reply fully built before its parent copies it.
    for i in (0..kept.len()).rev() {
        let replies: Vec<Comment> = child_slots[i].iter().map(|&c| kept[c].clone()).collect();
        kept[i].replies = replies;
    }

    let edges = kept
        .into_iter()
        .map(|node| CommentEdge {
            cursor: encode_cursor(node.created_at),
            node,
        })
        .collect();

    PageWindow { edges, overflow }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn row(id: i64, parent: Option<i64>, offset_min: i64) -> Comment {
        Comment {
            id,
            post_id: 1,
            author_id: 1,
            parent_comment_id: parent,
            body: format!("comment {id}"),
            created_at: base() + Duration::minutes(offset_min),
            replies: Vec::new(),
        }
    }

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn attaches_reply_to_parent_and_keeps_it_top_level() {
        let window = reassemble(vec![row(1, None, 0), row(2, Some(1), 1)], None);

        assert!(!window.overflow);
        assert_eq!(window.edges.len(), 2);
        assert_eq!(window.edges[0].node.id, 1);
        assert_eq!(window.edges[0].node.replies.len(), 1);
        assert_eq!(window.edges[0].node.replies[0].id, 2);
        // The reply also appears as its own flat edge.
        assert_eq!(window.edges[1].node.id, 2);
    }

    #[test]
    fn nests_grandchildren_under_attached_replies() {
        let window = reassemble(
            vec![row(1, None, 0), row(2, Some(1), 1), row(3, Some(2), 2)],
            None,
        );

        let root = &window.edges[0].node;
        assert_eq!(root.replies.len(), 1);
        assert_eq!(root.replies[0].id, 2);
        assert_eq!(root.replies[0].replies.len(), 1);
        assert_eq!(root.replies[0].replies[0].id, 3);
    }

    #[test]
    fn reply_with_parent_outside_window_stays_top_level() {
        // Parent id 99 was not returned in this window.
        let window = reassemble(vec![row(1, None, 0), row(2, Some(99), 1)], None);

        assert_eq!(window.edges.len(), 2);
        assert!(window.edges[0].node.replies.is_empty());
        assert!(window.edges[1].node.replies.is_empty());
    }

    #[test]
    fn stops_at_bound_and_reports_overflow() {
        let rows = vec![row(1, None, 0), row(2, None, 1), row(3, None, 2)];
        let window = reassemble(rows, Some(2));

        assert!(window.overflow);
        assert_eq!(window.edges.len(), 2);
        assert_eq!(window.edges[0].node.id, 1);
        assert_eq!(window.edges[1].node.id, 2);
    }

    #[test]
    fn exact_fit_is_not_overflow() {
        let window = reassemble(vec![row(1, None, 0), row(2, None, 1)], Some(2));

        assert!(!window.overflow);
        assert_eq!(window.edges.len(), 2);
    }

    #[test]
    fn zero_bound_keeps_nothing() {
        let window = reassemble(vec![row(1, None, 0)], Some(0));

        assert!(window.overflow);
        assert!(window.edges.is_empty());
    }

    #[test]
    fn preserves_input_order_and_cursor_assignment() {
        let rows = vec![row(3, None, 2), row(2, None, 1), row(1, None, 0)];
        let window = reassemble(rows.clone(), None);

        for (edge, source) in window.edges.iter().zip(&rows) {
            assert_eq!(edge.node.id, source.id);
            assert_eq!(edge.cursor, encode_cursor(source.created_at));
        }
    }
}
