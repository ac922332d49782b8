//! [crate::properties] contains the basic building blocks of an outline page: block and page
//! identifiers, the [Block] tree node, and [BlockPath] addressing.
use serde::{Deserialize, Serialize};
use std::{
    borrow::Borrow,
    fmt::{Display, Formatter},
};

pub use uuid::Uuid;

/// Block ID
///
/// An opaque, randomly generated (v4) UUID. A block keeps its id for as long as it exists in the
/// tree; new blocks always receive a fresh id, so ids are never reused.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BlockId(Uuid);

impl BlockId {
    pub fn new() -> Self {
        BlockId(Uuid::new_v4())
    }

    /// The id carried by synthetic nodes that never enter an editable tree.
    pub fn nil() -> Self {
        BlockId(Uuid::nil())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        BlockId::new()
    }
}

impl Display for BlockId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl TryFrom<&str> for BlockId {
    type Error = uuid::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(BlockId(Uuid::parse_str(value)?))
    }
}

/// Page identifier: the page's storage key, e.g. `journal/2021-03-04` for
/// `journal/2021-03-04.md`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        PageId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relative link to this page as written in page bodies, e.g. `./journal/2021-03-04.md`.
    pub fn href(&self) -> String {
        format!("./{}.md", self.0)
    }
}

impl Display for PageId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(value: &str) -> Self {
        PageId(value.to_string())
    }
}

impl From<String> for PageId {
    fn from(value: String) -> Self {
        PageId(value)
    }
}

impl AsRef<str> for PageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PageId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Ordered child indices from the root to a node.
///
/// Paths are only valid until the next sibling insertion or removal along them; anything that
/// outlives a single traversal should hold a [BlockId] instead.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockPath(pub Vec<usize>);

impl BlockPath {
    pub fn root() -> Self {
        BlockPath(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the addressed node within its parent's children.
    pub fn index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn parent(&self) -> Option<BlockPath> {
        match self.0.split_last() {
            Some((_, rest)) => Some(BlockPath(rest.to_vec())),
            None => None,
        }
    }

    pub fn child(&self, index: usize) -> BlockPath {
        let mut path = self.0.clone();
        path.push(index);
        BlockPath(path)
    }
}

/// One bullet of an outline, or the synthetic root.
///
/// `content` may span several lines (soft-wrapped text belonging to the bullet). `children` are
/// order-significant. The root of a page carries empty content and is never rendered itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub content: String,
    pub children: Vec<Block>,
}

impl Block {
    pub fn new<S: Into<String>>(content: S) -> Self {
        Block {
            id: BlockId::new(),
            content: content.into(),
            children: Vec::new(),
        }
    }

    pub fn root() -> Self {
        Block::new("")
    }

    pub fn with_children<S: Into<String>>(content: S, children: Vec<Block>) -> Self {
        Block {
            children,
            ..Block::new(content)
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn get(&self, path: &BlockPath) -> Option<&Block> {
        path.0
            .iter()
            .try_fold(self, |node, idx| node.children.get(*idx))
    }

    pub fn get_mut(&mut self, path: &BlockPath) -> Option<&mut Block> {
        path.0
            .iter()
            .try_fold(self, |node, idx| node.children.get_mut(*idx))
    }

    /// Depth-first search for `id`, returning the path to it. The root itself resolves to the
    /// empty path.
    pub fn path_of(&self, id: BlockId) -> Option<BlockPath> {
        if self.id == id {
            return Some(BlockPath::root());
        }
        let mut stack: Vec<(&Block, BlockPath)> = vec![(self, BlockPath::root())];
        while let Some((node, path)) = stack.pop() {
            for (idx, child) in node.children.iter().enumerate().rev() {
                let child_path = path.child(idx);
                if child.id == id {
                    return Some(child_path);
                }
                stack.push((child, child_path));
            }
        }
        None
    }

    pub fn find(&self, id: BlockId) -> Option<&Block> {
        self.path_of(id).and_then(|path| self.get(&path))
    }

    /// Pre-order traversal of every descendant (not including `self`), paired with its depth
    /// below `self` (top-level children are depth 1).
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().map(|c| (c, 1)).collect(),
        }
    }

    /// Number of blocks in the subtree, excluding `self`.
    pub fn len(&self) -> usize {
        self.descendants().count()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Structural equality: same contents and shape, ignoring ids.
    pub fn same_shape(&self, other: &Block) -> bool {
        self.content == other.content
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(other.children.iter())
                .all(|(a, b)| a.same_shape(b))
    }
}

pub struct Descendants<'a> {
    stack: Vec<(&'a Block, usize)>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = (&'a Block, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| (c, depth + 1)));
        Some((node, depth))
    }
}
