//! Derives page boundary metadata from the trimmed window.

use crate::models::{CommentConnection, PageInfo};
use crate::pagination::range::CommentPageArgs;
use crate::pagination::tree::PageWindow;

/// Builds the final connection. Cursors and overflow detection use the
/// pre-reversal (fetch) order; for backward pagination the edge list is
/// then reversed so output is always chronologically ascending.
pub fn connection(window: PageWindow, args: &CommentPageArgs) -> CommentConnection {
    let PageWindow { mut edges, overflow } = window;

    let start_cursor = edges.first().map(|e| e.cursor.clone());
    let end_cursor = edges.last().map(|e| e.cursor.clone());

    let forward = args.first.is_some();
    let backward = !forward && args.last.is_some();

    if backward {
        edges.reverse();
    }

    CommentConnection {
        edges,
        page_info: PageInfo {
            start_cursor,
            end_cursor,
            has_next_page: forward && overflow,
            has_prev_page: backward && overflow,
        },
    }
}
