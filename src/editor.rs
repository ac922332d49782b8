//! Structural editing of an outline, as driven by an interactive (keystroke) editor.
//!
//! Operations are addressed by [BlockId] and re-resolve the id to a [BlockPath] on every call,
//! so a caller can never act on a stale position after earlier edits moved things around.
//! Each edit is applied to a fresh copy of the tree; the previous root is kept unchanged on the
//! undo stack.

use std::mem::replace;

use crate::{
    error::NotazaError,
    properties::{Block, BlockId, BlockPath},
};

/// Maximum number of undo steps retained.
pub const HISTORY_MAX_ENTRIES: usize = 100;

/// Where editing focus should go after an operation. `caret` is a byte offset into the focused
/// block's content, when the operation implies one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Focus {
    pub block: BlockId,
    pub caret: Option<usize>,
}

impl Focus {
    fn on(block: BlockId) -> Self {
        Focus { block, caret: None }
    }

    fn at(block: BlockId, caret: usize) -> Self {
        Focus {
            block,
            caret: Some(caret),
        }
    }
}

/// Why an operation left the tree untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoChange {
    /// Nothing to move into or past: first/last sibling, top level, or the root itself.
    AtBoundary,
    /// Merge target has children of its own; flattening into it is not defined.
    AmbiguousMerge,
    /// The requested content is already in place.
    Identical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Changed { focus: Option<Focus> },
    Unchanged(NoChange),
}

impl EditOutcome {
    pub fn is_changed(&self) -> bool {
        matches!(self, EditOutcome::Changed { .. })
    }

    pub fn focus(&self) -> Option<Focus> {
        match self {
            EditOutcome::Changed { focus } => *focus,
            EditOutcome::Unchanged(_) => None,
        }
    }

    fn focus_on(block: BlockId) -> Self {
        EditOutcome::Changed {
            focus: Some(Focus::on(block)),
        }
    }
}

/// Resolve a non-root block to its path and index within its parent.
fn locate(root: &Block, id: BlockId) -> Result<Option<(BlockPath, usize)>, NotazaError> {
    let path = root.path_of(id).ok_or(NotazaError::NoSuchBlock(id))?;
    Ok(path.index().map(|idx| (path, idx)))
}

fn node_mut<'a>(root: &'a mut Block, path: &BlockPath) -> Result<&'a mut Block, NotazaError> {
    let id = root.id;
    root.get_mut(path).ok_or(NotazaError::NoSuchBlock(id))
}

fn parent_of(path: &BlockPath) -> BlockPath {
    path.parent().unwrap_or_default()
}

fn split_block(
    root: &mut Block,
    id: BlockId,
    before: &str,
    after: &str,
) -> Result<EditOutcome, NotazaError> {
    let Some((path, idx)) = locate(root, id)? else {
        return Ok(EditOutcome::Unchanged(NoChange::AtBoundary));
    };
    let new_block = Block::new(after);
    let new_id = new_block.id;
    let target = node_mut(root, &path)?;
    target.content = before.to_string();
    if target.is_leaf() {
        node_mut(root, &parent_of(&path))?
            .children
            .insert(idx + 1, new_block);
    } else {
        target.children.insert(0, new_block);
    }
    Ok(EditOutcome::Changed {
        focus: Some(Focus::at(new_id, 0)),
    })
}

fn remove_block(root: &mut Block, id: BlockId) -> Result<EditOutcome, NotazaError> {
    let Some((path, idx)) = locate(root, id)? else {
        return Ok(EditOutcome::Unchanged(NoChange::AtBoundary));
    };
    let parent_path = parent_of(&path);
    let parent = node_mut(root, &parent_path)?;
    parent.children.remove(idx);
    let focus = if idx > 0 {
        parent.children.get(idx - 1).map(|b| b.id)
    } else if !parent_path.is_root() {
        Some(parent.id)
    } else {
        parent.children.first().map(|b| b.id)
    };
    Ok(EditOutcome::Changed {
        focus: focus.map(Focus::on),
    })
}

fn indent_block(root: &mut Block, id: BlockId) -> Result<EditOutcome, NotazaError> {
    let Some((path, idx)) = locate(root, id)? else {
        return Ok(EditOutcome::Unchanged(NoChange::AtBoundary));
    };
    if idx == 0 {
        return Ok(EditOutcome::Unchanged(NoChange::AtBoundary));
    }
    let parent = node_mut(root, &parent_of(&path))?;
    let block = parent.children.remove(idx);
    parent.children[idx - 1].children.push(block);
    Ok(EditOutcome::focus_on(id))
}

fn unindent_block(root: &mut Block, id: BlockId) -> Result<EditOutcome, NotazaError> {
    let Some((path, idx)) = locate(root, id)? else {
        return Ok(EditOutcome::Unchanged(NoChange::AtBoundary));
    };
    let parent_path = parent_of(&path);
    let Some(parent_idx) = parent_path.index() else {
        return Ok(EditOutcome::Unchanged(NoChange::AtBoundary));
    };
    let block = node_mut(root, &parent_path)?.children.remove(idx);
    node_mut(root, &parent_of(&parent_path))?
        .children
        .insert(parent_idx + 1, block);
    Ok(EditOutcome::focus_on(id))
}

fn move_block(root: &mut Block, id: BlockId, up: bool) -> Result<EditOutcome, NotazaError> {
    let Some((path, idx)) = locate(root, id)? else {
        return Ok(EditOutcome::Unchanged(NoChange::AtBoundary));
    };
    let parent = node_mut(root, &parent_of(&path))?;
    let other = match up {
        true if idx > 0 => idx - 1,
        false if idx + 1 < parent.children.len() => idx + 1,
        _ => return Ok(EditOutcome::Unchanged(NoChange::AtBoundary)),
    };
    parent.children.swap(idx, other);
    Ok(EditOutcome::focus_on(id))
}

fn merge_with_predecessor(
    root: &mut Block,
    id: BlockId,
    current_content: &str,
) -> Result<EditOutcome, NotazaError> {
    let Some((path, idx)) = locate(root, id)? else {
        return Ok(EditOutcome::Unchanged(NoChange::AtBoundary));
    };
    let parent_path = parent_of(&path);
    if idx == 0 && parent_path.is_root() {
        return Ok(EditOutcome::Unchanged(NoChange::AtBoundary));
    }
    let parent = node_mut(root, &parent_path)?;
    if idx > 0 && !parent.children[idx - 1].is_leaf() {
        return Ok(EditOutcome::Unchanged(NoChange::AmbiguousMerge));
    }

    let block = parent.children.remove(idx);
    let target = if idx == 0 {
        // Splice into the parent: children take the merged block's place.
        parent
            .children
            .splice(idx..idx, block.children.into_iter());
        parent
    } else {
        let sibling = &mut parent.children[idx - 1];
        sibling.children = block.children;
        sibling
    };
    let caret = target.content.len();
    target.content.push_str(current_content);
    Ok(EditOutcome::Changed {
        focus: Some(Focus::at(target.id, caret)),
    })
}

fn update_content(root: &mut Block, id: BlockId, content: &str) -> Result<EditOutcome, NotazaError> {
    let Some((path, _)) = locate(root, id)? else {
        return Ok(EditOutcome::Unchanged(NoChange::AtBoundary));
    };
    let target = node_mut(root, &path)?;
    if target.content == content {
        return Ok(EditOutcome::Unchanged(NoChange::Identical));
    }
    target.content = content.to_string();
    Ok(EditOutcome::Changed {
        focus: Some(Focus::at(id, content.len())),
    })
}

fn insert_after(root: &mut Block, id: BlockId, content: &str) -> Result<EditOutcome, NotazaError> {
    let Some((path, idx)) = locate(root, id)? else {
        return Ok(EditOutcome::Unchanged(NoChange::AtBoundary));
    };
    let block = Block::new(content);
    let new_id = block.id;
    node_mut(root, &parent_of(&path))?
        .children
        .insert(idx + 1, block);
    Ok(EditOutcome::Changed {
        focus: Some(Focus::at(new_id, content.len())),
    })
}

fn append_child(root: &mut Block, parent: BlockId, content: &str) -> Result<EditOutcome, NotazaError> {
    let path = root.path_of(parent).ok_or(NotazaError::NoSuchBlock(parent))?;
    let block = Block::new(content);
    let new_id = block.id;
    node_mut(root, &path)?.children.push(block);
    Ok(EditOutcome::Changed {
        focus: Some(Focus::at(new_id, content.len())),
    })
}

/// A checked-out outline under interactive editing.
///
/// Every operation either changes the tree and returns [EditOutcome::Changed], or leaves it
/// exactly as it was. An unknown [BlockId] is reported as [NotazaError::NoSuchBlock] and is
/// likewise a no-op.
#[derive(Debug, Clone)]
pub struct OutlineEditor {
    root: Block,
    undo_stack: Vec<Block>,
    redo_stack: Vec<Block>,
}

impl OutlineEditor {
    pub fn new(root: Block) -> Self {
        OutlineEditor {
            root,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn root(&self) -> &Block {
        &self.root
    }

    pub fn into_root(self) -> Block {
        self.root
    }

    pub fn find(&self, id: BlockId) -> Option<&Block> {
        self.root.find(id)
    }

    pub fn path_of(&self, id: BlockId) -> Option<BlockPath> {
        self.root.path_of(id)
    }

    fn apply<F>(&mut self, edit: F) -> Result<EditOutcome, NotazaError>
    where
        F: FnOnce(&mut Block) -> Result<EditOutcome, NotazaError>,
    {
        let mut next = self.root.clone();
        let outcome = edit(&mut next)?;
        if outcome.is_changed() {
            let previous = replace(&mut self.root, next);
            self.redo_stack.clear();
            self.undo_stack.push(previous);
            if self.undo_stack.len() > HISTORY_MAX_ENTRIES {
                let drop_count = self.undo_stack.len() - HISTORY_MAX_ENTRIES;
                self.undo_stack.drain(0..drop_count);
            }
        }
        tracing::debug!("edit outcome: {:?}", outcome);
        Ok(outcome)
    }

    /// Split a block at the caret: the block keeps `before`, a new block receives `after`.
    ///
    /// The new block becomes the first child when the block has children, otherwise its next
    /// sibling. Focus moves to the new block.
    pub fn split_block(
        &mut self,
        id: BlockId,
        before: &str,
        after: &str,
    ) -> Result<EditOutcome, NotazaError> {
        self.apply(|root| split_block(root, id, before, after))
    }

    /// Delete a block and its whole subtree.
    pub fn remove_block(&mut self, id: BlockId) -> Result<EditOutcome, NotazaError> {
        self.apply(|root| remove_block(root, id))
    }

    /// Make the block the last child of its preceding sibling.
    pub fn indent_block(&mut self, id: BlockId) -> Result<EditOutcome, NotazaError> {
        self.apply(|root| indent_block(root, id))
    }

    /// Move the block out of its parent, directly after it. Later siblings stay where they are.
    pub fn unindent_block(&mut self, id: BlockId) -> Result<EditOutcome, NotazaError> {
        self.apply(|root| unindent_block(root, id))
    }

    pub fn move_up(&mut self, id: BlockId) -> Result<EditOutcome, NotazaError> {
        self.apply(|root| move_block(root, id, true))
    }

    pub fn move_down(&mut self, id: BlockId) -> Result<EditOutcome, NotazaError> {
        self.apply(|root| move_block(root, id, false))
    }

    /// Join a block onto the block before it (backspace at the start of a bullet).
    ///
    /// `current_content` is the block's live text. A first child merges into its parent, with its
    /// children taking its place; otherwise it merges into a childless preceding sibling, which
    /// adopts its children. Top-level first blocks and predecessors with children are left alone,
    /// and in that case `current_content` is not applied either.
    pub fn merge_with_predecessor(
        &mut self,
        id: BlockId,
        current_content: &str,
    ) -> Result<EditOutcome, NotazaError> {
        self.apply(|root| merge_with_predecessor(root, id, current_content))
    }

    pub fn update_content(&mut self, id: BlockId, content: &str) -> Result<EditOutcome, NotazaError> {
        self.apply(|root| update_content(root, id, content))
    }

    /// Insert a new sibling directly after `id`.
    pub fn insert_after(&mut self, id: BlockId, content: &str) -> Result<EditOutcome, NotazaError> {
        self.apply(|root| insert_after(root, id, content))
    }

    /// Append a new block as the last child of `parent`; the root is a valid parent, which is
    /// how the first bullet of an empty page is created.
    pub fn append_child(&mut self, parent: BlockId, content: &str) -> Result<EditOutcome, NotazaError> {
        self.apply(|root| append_child(root, parent, content))
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                let current = replace(&mut self.root, previous);
                self.redo_stack.push(current);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                let current = replace(&mut self.root, next);
                self.undo_stack.push(current);
                true
            }
            None => false,
        }
    }
}
