use serde::{Deserialize, Serialize};

/// One node in the prompt library: display text plus ordered children.
/// Leaves have an empty child list. Serializes to the nested
/// `{text, children}` record stored in workflow files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptNode {
    pub text: String,
    #[serde(default)]
    pub children: Vec<PromptNode>,
}

impl PromptNode {
    pub fn leaf(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            children: Vec::new(),
        }
    }
}

/// Position-based reference to a node: the child-index path from the root
/// list. Stale after any removal earlier on the same level; mutation
/// operations treat a stale id as a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeId(Vec<usize>);

impl NodeId {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

/// Ordered forest of prompt nodes. Nodes are created in place and never
/// re-parented, so the structure is acyclic by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptTree {
    roots: Vec<PromptNode>,
}

impl PromptTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &[PromptNode] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn get(&self, id: &NodeId) -> Option<&PromptNode> {
        let (first, rest) = id.0.split_first()?;
        let mut node = self.roots.get(*first)?;
        for index in rest {
            node = node.children.get(*index)?;
        }
        Some(node)
    }

    fn node_mut(&mut self, path: &[usize]) -> Option<&mut PromptNode> {
        let (first, rest) = path.split_first()?;
        let mut node = self.roots.get_mut(*first)?;
        for index in rest {
            node = node.children.get_mut(*index)?;
        }
        Some(node)
    }

    /// Appends a new leaf as the last child of `parent`, or as a new
    /// root-level node when `parent` is absent. Returns `None` when the
    /// parent reference is stale.
    pub fn add_leaf(&mut self, parent: Option<&NodeId>, text: impl Into<String>) -> Option<NodeId> {
        match parent {
            None => {
                self.roots.push(PromptNode::leaf(text));
                Some(NodeId(vec![self.roots.len() - 1]))
            }
            Some(id) => {
                let node = self.node_mut(&id.0)?;
                node.children.push(PromptNode::leaf(text));
                let mut path = id.0.clone();
                path.push(node.children.len() - 1);
                Some(NodeId(path))
            }
        }
    }

    /// Folders always land at root level.
    pub fn add_folder(&mut self, text: impl Into<String>) -> NodeId {
        self.roots.push(PromptNode::leaf(text));
        NodeId(vec![self.roots.len() - 1])
    }

    /// Detaches the node and its whole subtree.
    pub fn remove(&mut self, id: &NodeId) -> Option<PromptNode> {
        let (last, parent) = id.0.split_last()?;
        let siblings = if parent.is_empty() {
            &mut self.roots
        } else {
            &mut self.node_mut(parent)?.children
        };
        if *last >= siblings.len() {
            return None;
        }
        Some(siblings.remove(*last))
    }

    /// Pre-order traversal: every node's text, parents before children,
    /// children in order.
    pub fn flatten(&self) -> Vec<String> {
        fn walk(node: &PromptNode, out: &mut Vec<String>) {
            out.push(node.text.clone());
            for child in &node.children {
                walk(child, out);
            }
        }
        let mut out = Vec::new();
        for root in &self.roots {
            walk(root, &mut out);
        }
        out
    }
}
