//! Write-once parent links
//!
//! Children are built before their parents exist, so parent edges cannot be
//! stored at construction time. Once the arena is complete, [`ParentTable::link`]
//! walks the tree top-down and assigns every slot exactly once.

use super::{Node, NodeId, Root, TokenId};
use crate::error::TreeError;

/// State of one parent slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Unassigned,
    /// Assigned with no parent
    Root,
    Child(NodeId),
}

/// Parent of every token and node of a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentTable {
    tokens: Vec<Slot>,
    nodes: Vec<Slot>,
}

impl ParentTable {
    /// Assign parents for everything reachable from `root`
    ///
    /// # Arguments
    /// * `nodes` - Node arena
    /// * `token_count` - Number of tokens in the arena
    /// * `root` - Top of the tree
    ///
    /// # Returns
    /// * `Result<Self, TreeError>` - Linked table, or `ReadOnlyParent` if a
    ///   slot would be assigned twice
    pub(crate) fn link(nodes: &[Node], token_count: usize, root: Root) -> Result<Self, TreeError> {
        let mut table = Self {
            tokens: vec![Slot::Unassigned; token_count],
            nodes: vec![Slot::Unassigned; nodes.len()],
        };

        match root {
            Root::Chain(id) => {
                table.assign_node(id, Slot::Root)?;
                table.link_node(nodes, id)?;
            }
            Root::Empty(id) => table.assign_token(id, Slot::Root)?,
        }

        Ok(table)
    }

    pub fn token_parent(&self, id: TokenId) -> Option<NodeId> {
        match self.tokens.get(id.index()) {
            Some(Slot::Child(parent)) => Some(*parent),
            _ => None,
        }
    }

    pub fn node_parent(&self, id: NodeId) -> Option<NodeId> {
        match self.nodes.get(id.index()) {
            Some(Slot::Child(parent)) => Some(*parent),
            _ => None,
        }
    }

    fn link_node(&mut self, nodes: &[Node], id: NodeId) -> Result<(), TreeError> {
        match &nodes[id.index()] {
            Node::Chain(chain) => {
                for combo in chain.combos() {
                    self.assign_node(*combo, Slot::Child(id))?;
                    self.link_node(nodes, *combo)?;
                }
            }
            Node::Combo(combo) => {
                for key in combo.keys() {
                    self.assign_node(*key, Slot::Child(id))?;
                    self.link_node(nodes, *key)?;
                }
                for sep in combo.seps() {
                    self.assign_token(*sep, Slot::Child(id))?;
                }
            }
            Node::Key(key) => {
                for token in key.tokens() {
                    self.assign_token(token, Slot::Child(id))?;
                }
            }
        }
        Ok(())
    }

    fn assign_token(&mut self, id: TokenId, slot: Slot) -> Result<(), TreeError> {
        Self::assign(&mut self.tokens, id.index(), slot, || id.to_string())
    }

    fn assign_node(&mut self, id: NodeId, slot: Slot) -> Result<(), TreeError> {
        Self::assign(&mut self.nodes, id.index(), slot, || id.to_string())
    }

    fn assign(
        slots: &mut [Slot],
        index: usize,
        slot: Slot,
        describe: impl FnOnce() -> String,
    ) -> Result<(), TreeError> {
        match slots.get_mut(index) {
            Some(current @ Slot::Unassigned) => {
                *current = slot;
                Ok(())
            }
            _ => Err(TreeError::ReadOnlyParent(describe())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AstBuilder, NoteParts, Position, TokenKind, ValidToken};

    #[test]
    fn test_link_assigns_every_slot_once() {
        let mut builder = AstBuilder::new();
        let value = builder.valid(ValidToken::new(TokenKind::Key, "a", Position::new(0, 1)));
        let key = builder.key(Some(value), NoteParts::default()).unwrap();
        let combo = builder.combo(vec![key], Vec::new()).unwrap();
        let chain = builder.chain(vec![combo]).unwrap();
        let ast = builder.seal(Root::Chain(chain)).unwrap();

        assert_eq!(ast.parent_of_token(value), Some(key));
        assert_eq!(ast.parent_of_node(key), Some(combo));
        assert_eq!(ast.parent_of_node(combo), Some(chain));
        assert_eq!(ast.parent_of_node(chain), None);
    }

    #[test]
    fn test_shared_child_is_read_only() {
        let mut builder = AstBuilder::new();
        let value = builder.valid(ValidToken::new(TokenKind::Key, "a", Position::new(0, 1)));
        let key = builder.key(Some(value), NoteParts::default()).unwrap();
        let first = builder.combo(vec![key], Vec::new()).unwrap();
        let second = builder.combo(vec![key], Vec::new()).unwrap();
        let chain = builder.chain(vec![first, second]).unwrap();

        assert!(matches!(
            builder.seal(Root::Chain(chain)),
            Err(TreeError::ReadOnlyParent(_))
        ));
    }

    #[test]
    fn test_empty_root_has_no_parent() {
        let mut builder = AstBuilder::new();
        let error = builder.error(&[TokenKind::Key], 0);
        let ast = builder.seal(Root::Empty(error)).unwrap();

        assert_eq!(ast.parent_of_token(error), None);
        assert!(!ast.is_valid());
    }
}
