//! Scene model types.
//!
//! A [`SceneTree`] is the elaborated form of a scene description file: the
//! root node plus every descendant node declaration in file order.

/// A single node declaration inside a scene file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneNode {
    name: String,
    type_name: Option<String>,
    parent: Option<String>,
    script: Option<String>,
    line: usize,
}

impl SceneNode {
    /// Creates a node declaration with the given instance name.
    ///
    /// # Arguments
    ///
    /// * `name` - Instance name of the node.
    /// * `line` - 1-based line of the node header in the scene file.
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            parent: None,
            script: None,
            line,
        }
    }

    /// Sets the declared type name.
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Sets the parent node path (`.` for direct children of the root).
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Sets the attached script path.
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    /// Returns the instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared type name, if the node has one.
    ///
    /// Instanced scenes report the file stem of the instanced scene.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Returns the parent node path, `None` for the root.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Returns the attached script path, if any.
    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    /// Returns the 1-based line of the node header.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Returns `true` if this node is a scene root (it has no parent).
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A parsed scene: a root node and its flattened descendants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneTree {
    path: String,
    root: SceneNode,
    nodes: Vec<SceneNode>,
}

impl SceneTree {
    /// Creates a scene tree.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the scene file the tree was parsed from.
    /// * `root` - The root node declaration.
    /// * `nodes` - All descendant node declarations in file order.
    pub fn new(path: impl Into<String>, root: SceneNode, nodes: Vec<SceneNode>) -> Self {
        Self {
            path: path.into(),
            root,
            nodes,
        }
    }

    /// Returns the path of the scene file.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the root node declaration.
    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    /// Returns every descendant node declaration in file order.
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    /// Returns the script attached to the root node, if any.
    pub fn script(&self) -> Option<&str> {
        self.root.script()
    }

    /// Returns the first descendant declared with the given type name.
    pub fn first_of_type(&self, type_name: &str) -> Option<&SceneNode> {
        self.nodes
            .iter()
            .find(|node| node.type_name() == Some(type_name))
    }
}
