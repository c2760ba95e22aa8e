use super::model::Entity;

/// Order assigned to a newly created sibling: one past the current maximum.
pub fn next_order_number(siblings: &[Entity]) -> i64 {
    siblings
        .iter()
        .map(|e| e.order_number)
        .max()
        .map_or(1, |max| max + 1)
}

/// Dense 1..N renumbering of a staged sibling ordering, as persisted by the
/// admin "Save Order" action. The input slice is the display order after the
/// drag-drop or manual change; only ids whose order actually changes are
/// returned.
pub fn renumber(siblings: &[Entity]) -> Vec<(String, i64)> {
    siblings
        .iter()
        .enumerate()
        .filter_map(|(index, e)| {
            let order = index as i64 + 1;
            (e.order_number != order).then(|| (e.id.clone(), order))
        })
        .collect()
}
