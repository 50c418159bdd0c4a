//! Hierarchy assembly: flat `(level, item)` sequence to nested outline.

use crate::types::HeadingItem;

/// Nest `entries` by level, in document order.
///
/// A heading becomes a child of the nearest preceding heading with a
/// smaller level. With no such heading it is a top-level entry, so a
/// section that appears before any parent is promoted, never dropped.
pub fn assemble<I>(entries: I) -> Vec<HeadingItem>
where
    I: IntoIterator<Item = (u8, HeadingItem)>,
{
    let mut roots = Vec::new();
    // Open nodes, shallowest first. Each is still collecting children.
    let mut stack: Vec<(u8, HeadingItem)> = Vec::new();

    for (level, item) in entries {
        while stack.last().is_some_and(|(open, _)| *open >= level) {
            close_top(&mut stack, &mut roots);
        }
        stack.push((level, item));
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    roots
}

fn close_top(stack: &mut Vec<(u8, HeadingItem)>, roots: &mut Vec<HeadingItem>) {
    let Some((_, done)) = stack.pop() else {
        return;
    };
    match stack.last_mut() {
        Some((_, parent)) => parent.items.push(done),
        None => roots.push(done),
    }
}
