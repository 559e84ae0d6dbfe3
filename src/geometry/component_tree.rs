//! Hierarchical component tree for a detector system.
//!
//! Components are stored in a flat `Vec` indexed by `ComponentId`, with
//! parent/child/sibling links forming an intrusive tree. Parent links are
//! plain indices, never ownership edges: the tree owns every node.
//!
//! ```text
//! base                 (depth 0, attached to the head volume)
//! +-- base.crystal     (depth 1)
//!     +-- base.crystal.pixel (depth 2)
//! ```

use crate::error::{Result, SystemError};
use crate::id::ComponentId;
use std::collections::HashMap;

/// A single node in the component tree.
#[derive(Debug, Clone)]
pub struct ComponentNode {
    pub id: ComponentId,
    /// Full dotted path, e.g. `"base.crystal"`.
    pub path: String,
    /// Leaf segment only, e.g. `"crystal"`.
    pub name: String,
    /// Parent node (ComponentId::INVALID for the root).
    pub parent: ComponentId,
    /// First child (intrusive linked list).
    pub first_child: ComponentId,
    /// Next sibling (intrusive linked list).
    pub next_sibling: ComponentId,
    /// Depth in the tree (0 for the root).
    pub depth: u16,
    /// Geometry volume this component is attached to, if any.
    pub volume: Option<String>,
}

impl ComponentNode {
    pub fn is_root(&self) -> bool {
        !self.parent.is_valid()
    }
}

/// Flat-storage component tree.
///
/// - `ComponentId` is a direct index into `nodes`.
/// - Path and volume lookups are O(1) via HashMap.
#[derive(Debug)]
pub struct ComponentTree {
    nodes: Vec<ComponentNode>,
    path_index: HashMap<String, ComponentId>,
    volume_index: HashMap<String, ComponentId>,
}

impl ComponentTree {
    /// Create a tree holding only its root component.
    pub fn new(root_name: impl Into<String>) -> Self {
        let name = root_name.into();
        let root = ComponentNode {
            id: ComponentId(0),
            path: name.clone(),
            name: name.clone(),
            parent: ComponentId::INVALID,
            first_child: ComponentId::INVALID,
            next_sibling: ComponentId::INVALID,
            depth: 0,
            volume: None,
        };
        let mut path_index = HashMap::new();
        path_index.insert(name, root.id);
        Self {
            nodes: vec![root],
            path_index,
            volume_index: HashMap::new(),
        }
    }

    pub fn root(&self) -> ComponentId {
        ComponentId(0)
    }

    /// Total number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a child component under `parent`. Names are unique among siblings.
    pub fn add_child(&mut self, parent: ComponentId, name: impl Into<String>) -> Result<ComponentId> {
        let name = name.into();
        let (parent_path, parent_depth) = match self.get(parent) {
            Some(p) => (p.path.clone(), p.depth),
            None => return Err(SystemError::UnknownComponent(parent.to_string())),
        };

        if self.children(parent).any(|c| c.name == name) {
            return Err(SystemError::DuplicateComponent {
                parent: parent_path,
                name,
            });
        }

        let id = ComponentId(self.nodes.len() as u32);
        let path = format!("{}.{}", parent_path, name);
        self.path_index.insert(path.clone(), id);
        self.nodes.push(ComponentNode {
            id,
            path,
            name,
            parent,
            first_child: ComponentId::INVALID,
            next_sibling: ComponentId::INVALID,
            depth: parent_depth + 1,
            volume: None,
        });

        // Link into parent's child list
        let first = self.nodes[parent.index()].first_child;
        if !first.is_valid() {
            self.nodes[parent.index()].first_child = id;
        } else {
            let mut cur = first;
            loop {
                let next = self.nodes[cur.index()].next_sibling;
                if !next.is_valid() {
                    self.nodes[cur.index()].next_sibling = id;
                    break;
                }
                cur = next;
            }
        }

        Ok(id)
    }

    /// Get a node by ComponentId (O(1) array index).
    #[inline]
    pub fn get(&self, id: ComponentId) -> Option<&ComponentNode> {
        if id.is_valid() {
            self.nodes.get(id.index())
        } else {
            None
        }
    }

    /// Look up by full dotted path.
    pub fn find_by_path(&self, path: &str) -> Option<ComponentId> {
        self.path_index.get(path).copied()
    }

    /// Look up the component an attached volume belongs to.
    pub fn find_by_volume(&self, volume: &str) -> Option<ComponentId> {
        self.volume_index.get(volume).copied()
    }

    /// Attach a geometry volume to a component, replacing any previous one.
    pub fn attach_volume(&mut self, id: ComponentId, volume: impl Into<String>) -> Result<()> {
        let volume = volume.into();
        if self.get(id).is_none() {
            return Err(SystemError::UnknownComponent(id.to_string()));
        }
        if let Some(owner) = self.find_by_volume(&volume) {
            if owner == id {
                return Ok(());
            }
            return Err(SystemError::VolumeAlreadyAttached {
                volume,
                component: self.nodes[owner.index()].path.clone(),
            });
        }

        let node = &mut self.nodes[id.index()];
        if let Some(old) = node.volume.replace(volume.clone()) {
            self.volume_index.remove(&old);
        }
        self.volume_index.insert(volume, id);
        Ok(())
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = &ComponentNode> {
        self.nodes.iter()
    }

    /// Iterate over children of a given node.
    pub fn children(&self, parent: ComponentId) -> ChildIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(ComponentId::INVALID);
        ChildIter {
            tree: self,
            current: first,
        }
    }

    /// Walk from `id` up to the root, `id` first.
    pub fn ancestors(&self, id: ComponentId) -> AncestorIter<'_> {
        AncestorIter {
            tree: self,
            current: id,
        }
    }
}

impl std::ops::Index<ComponentId> for ComponentTree {
    type Output = ComponentNode;

    /// Panics if `id` does not belong to this tree.
    fn index(&self, id: ComponentId) -> &ComponentNode {
        &self.nodes[id.index()]
    }
}

/// Iterator over the children of a node.
pub struct ChildIter<'a> {
    tree: &'a ComponentTree,
    current: ComponentId,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = &'a ComponentNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.get(self.current)?;
        self.current = node.next_sibling;
        Some(node)
    }
}

/// Iterator over a node and its parent chain.
pub struct AncestorIter<'a> {
    tree: &'a ComponentTree,
    current: ComponentId,
}

impl<'a> Iterator for AncestorIter<'a> {
    type Item = &'a ComponentNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.get(self.current)?;
        self.current = node.parent;
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree_has_root() {
        let tree = ComponentTree::new("base");
        assert_eq!(tree.len(), 1);
        let root = tree.get(tree.root()).unwrap();
        assert_eq!(root.path, "base");
        assert!(root.is_root());
        assert_eq!(root.depth, 0);
    }

    #[test]
    fn test_add_child_links_and_paths() {
        let mut tree = ComponentTree::new("base");
        let crystal = tree.add_child(tree.root(), "crystal").unwrap();
        let pixel = tree.add_child(crystal, "pixel").unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get(pixel).unwrap().path, "base.crystal.pixel");
        assert_eq!(tree.get(pixel).unwrap().depth, 2);
        assert_eq!(tree.find_by_path("base.crystal"), Some(crystal));

        let children: Vec<_> = tree.children(tree.root()).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "crystal");
    }

    #[test]
    fn test_sibling_order_and_duplicates() {
        let mut tree = ComponentTree::new("base");
        tree.add_child(tree.root(), "a").unwrap();
        tree.add_child(tree.root(), "b").unwrap();

        let names: Vec<_> = tree.children(tree.root()).map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        let err = tree.add_child(tree.root(), "a").unwrap_err();
        assert!(matches!(err, SystemError::DuplicateComponent { .. }));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_add_child_to_unknown_parent() {
        let mut tree = ComponentTree::new("base");
        assert!(tree.add_child(ComponentId(9), "x").is_err());
        assert!(tree.add_child(ComponentId::INVALID, "x").is_err());
    }

    #[test]
    fn test_ancestors_terminate_at_root() {
        let mut tree = ComponentTree::new("base");
        let crystal = tree.add_child(tree.root(), "crystal").unwrap();
        let pixel = tree.add_child(crystal, "pixel").unwrap();

        let chain: Vec<_> = tree.ancestors(pixel).map(|n| n.name.as_str()).collect();
        assert_eq!(chain, vec!["pixel", "crystal", "base"]);
    }

    #[test]
    fn test_attach_volume() {
        let mut tree = ComponentTree::new("base");
        let crystal = tree.add_child(tree.root(), "crystal").unwrap();

        tree.attach_volume(crystal, "crystal_vol").unwrap();
        assert_eq!(tree.find_by_volume("crystal_vol"), Some(crystal));

        // Re-attaching to the same component is a no-op
        tree.attach_volume(crystal, "crystal_vol").unwrap();

        let err = tree.attach_volume(tree.root(), "crystal_vol").unwrap_err();
        assert!(matches!(err, SystemError::VolumeAlreadyAttached { .. }));

        // Replacing a volume frees the old name
        tree.attach_volume(crystal, "other_vol").unwrap();
        assert_eq!(tree.find_by_volume("crystal_vol"), None);
        assert_eq!(tree.get(crystal).unwrap().volume.as_deref(), Some("other_vol"));
    }
}
