use std::cmp::Ordering;

use crate::model::checklist::ChecklistItem;

/// Rank used for items with no priority tag
const UNRANKED: u8 = 3;

fn priority_rank(item: &ChecklistItem) -> u8 {
    item.priority.map(|p| p.rank()).unwrap_or(UNRANKED)
}

/// Display order: pending before done, then timed items by time of day,
/// then untimed items by priority (P0 first).
pub fn display_order(a: &ChecklistItem, b: &ChecklistItem) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

fn sort_key(item: &ChecklistItem) -> (bool, bool, (u32, u32), u8) {
    let time = item.time.as_deref().map(time_key);
    (
        item.done,
        time.is_none(),
        time.unwrap_or_default(),
        priority_rank(item),
    )
}

/// `9:35` and `09:35` sort the same
pub(crate) fn time_key(time: &str) -> (u32, u32) {
    let (h, m) = time.split_once(':').unwrap_or((time, "0"));
    (h.parse().unwrap_or(0), m.parse().unwrap_or(0))
}

/// Sorted copy for display (stable).
pub fn sort_for_display(items: &[ChecklistItem]) -> Vec<&ChecklistItem> {
    let mut sorted: Vec<&ChecklistItem> = items.iter().collect();
    sorted.sort_by_key(|item| sort_key(item));
    sorted
}

/// Flip an item's done flag. Returns false if no item has that id.
pub fn toggle(items: &mut [ChecklistItem], id: &str) -> bool {
    match items.iter_mut().find(|i| i.id == id) {
        Some(item) => {
            item.done = !item.done;
            true
        }
        None => false,
    }
}

/// `(done, total)`
pub fn summary(items: &[ChecklistItem]) -> (usize, usize) {
    (items.iter().filter(|i| i.done).count(), items.len())
}
