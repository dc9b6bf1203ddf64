use std::fmt::Write as _;
use std::io;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::token::Token;

/// Index of a node in its tree's arena. Ids grow monotonically as nodes are
/// created, which tells apart subtrees that print the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Serialize)]
pub struct Node {
    pub token: Token,
    children: Vec<NodeId>,
    #[serde(skip)]
    parent: Option<NodeId>,
}

impl Node {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A concrete syntax tree. Every node is owned by the arena; the parent
/// link is only used for lookups such as [`ParseTree::detach`].
#[derive(Debug, Serialize)]
pub struct ParseTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl ParseTree {
    pub fn new(root_token: Token) -> Self {
        Self {
            nodes: vec![Node {
                token: root_token,
                children: Vec::new(),
                parent: None,
            }],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes ever created, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Creates a node pointing back at `parent`. It is not one of the
    /// parent's children until [`ParseTree::set_children`] says so.
    pub fn add_node(&mut self, token: Token, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            token,
            children: Vec::new(),
            parent,
        });
        id
    }

    pub fn set_lexeme(&mut self, id: NodeId, lexeme: impl Into<String>) {
        self.nodes[id.0].token.lexeme = Some(lexeme.into());
    }

    /// Replaces all children of `id` at once. A child owned by another node is
    /// detached from it first. `id` itself, its ancestors and repeated ids are
    /// rejected and leave the tree untouched.
    pub fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) -> Result<()> {
        let ancestors = self.ancestors(id);
        for (i, &child) in children.iter().enumerate() {
            if ancestors.contains(&child) || children[..i].contains(&child) {
                return Err(Error::InvalidChild {
                    parent: id.0,
                    child: child.0,
                });
            }
        }

        for old in std::mem::take(&mut self.nodes[id.0].children) {
            self.nodes[old.0].parent = None;
        }
        for &child in &children {
            self.detach(child);
            self.nodes[child.0].parent = Some(id);
        }
        self.nodes[id.0].children = children;
        Ok(())
    }

    /// `id` followed by its parent, grandparent and so on up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = vec![id];
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            result.push(parent);
            current = parent;
        }
        result
    }

    /// Removes `id` from its parent's children. The root has no parent and
    /// stays put.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != id);
        }
    }

    /// Detaches the childless non-terminal nodes left behind by empty
    /// productions, bottom-up, and returns how many were removed.
    pub fn prune_empty(&mut self) -> usize {
        let mut removed = 0;
        loop {
            let empty: Vec<NodeId> = self
                .descendants(self.root)
                .into_iter()
                .filter(|&id| {
                    let node = &self.nodes[id.0];
                    id != self.root && node.is_leaf() && node.token.lexeme.is_none()
                })
                .collect();
            if empty.is_empty() {
                return removed;
            }
            for id in empty {
                self.detach(id);
                removed += 1;
            }
        }
    }

    /// `id` and every node below it, in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            result.push(current);
            stack.extend(self.nodes[current.0].children.iter().rev());
        }
        result
    }

    /// Leaves below `id`, left to right.
    pub fn leaves(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.nodes[n.0].is_leaf())
            .collect()
    }

    /// Leaf lexemes of the subtree, space separated. Leaves without a lexeme
    /// (empty productions) add neither text nor a separator.
    pub fn yield_of(&self, id: NodeId) -> String {
        self.leaves(id)
            .into_iter()
            .filter_map(|n| self.nodes[n.0].token.lexeme())
            .filter(|lexeme| !lexeme.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn yield_text(&self) -> String {
        self.yield_of(self.root)
    }

    pub fn print(&self, out: &mut impl io::Write) -> io::Result<()> {
        out.write_all(self.to_plaintext().as_bytes())
    }

    /// One line per node, indented two spaces per level:
    /// `symbol lexeme  ID=n`.
    pub fn to_plaintext(&self) -> String {
        let mut output = String::new();
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id.0];
            let _ = writeln!(
                output,
                "{:indent$}{} {}  ID={}",
                "",
                node.token.symbol,
                node.token.lexeme().unwrap_or(""),
                id.0,
                indent = depth * 2
            );
            stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        }
        output
    }
}
