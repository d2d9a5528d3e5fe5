//! Depth-first tree walker.
//!
//! Visits every node exactly once in pre-order. `enter` fires when a node is
//! first reached and `exit` once all of its descendants have been visited
//! (for leaves, immediately after `enter`). Either callback may abort the
//! walk, in which case the node being visited at that moment is returned.
//!
//! Traversal keeps an explicit stack of `(siblings, index)` frames, so its
//! depth is bounded by heap memory rather than by the call stack.

use crate::Node;

/// Whether the walk should go on after a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkControl {
    /// Keep walking.
    Continue,
    /// Stop the walk; the current node is returned from [`walk`].
    Abort,
}

/// Callbacks for [`walk`]. The implementing type is the walk's state record.
pub trait Visitor<'a> {
    /// Called when `node` is first reached.
    fn enter(&mut self, node: &'a Node) -> WalkControl;

    /// Called after every descendant of `node` has been visited.
    fn exit(&mut self, _node: &'a Node) -> WalkControl {
        WalkControl::Continue
    }
}

/// Walk `roots` depth-first.
///
/// Returns `None` when every node was visited, or the node at which a
/// callback returned [`WalkControl::Abort`].
pub fn walk<'a, V: Visitor<'a>>(roots: &'a [Node], visitor: &mut V) -> Option<&'a Node> {
    let mut stack: Vec<(&'a [Node], usize)> = vec![(roots, 0)];

    while let Some(&(siblings, index)) = stack.last() {
        let Some(node) = siblings.get(index) else {
            // Sibling list exhausted: leave the parent element.
            let _ = stack.pop();
            if let Some(&(parent_siblings, parent_index)) = stack.last() {
                let parent = &parent_siblings[parent_index];
                if visitor.exit(parent) == WalkControl::Abort {
                    return Some(parent);
                }
                advance(&mut stack);
            }
            continue;
        };

        if visitor.enter(node) == WalkControl::Abort {
            return Some(node);
        }

        let children = node.children();
        if children.is_empty() {
            if visitor.exit(node) == WalkControl::Abort {
                return Some(node);
            }
            advance(&mut stack);
        } else {
            stack.push((children, 0));
        }
    }
    None
}

fn advance(stack: &mut [(&[Node], usize)]) {
    if let Some(frame) = stack.last_mut() {
        frame.1 += 1;
    }
}

struct FnVisitor<F>(F);

impl<'a, F: FnMut(&'a Node) -> WalkControl> Visitor<'a> for FnVisitor<F> {
    fn enter(&mut self, node: &'a Node) -> WalkControl {
        (self.0)(node)
    }
}

/// Walk with only an `enter` callback.
pub fn walk_fn<'a, F>(roots: &'a [Node], on_enter: F) -> Option<&'a Node>
where
    F: FnMut(&'a Node) -> WalkControl,
{
    walk(roots, &mut FnVisitor(on_enter))
}
