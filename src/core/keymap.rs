//! Keymaps: tries from key-code sequences to bindings.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::core::app::EditorApp;
use crate::core::error::{EditorError, Result};
use crate::core::key::{KeyCode, kbd};

/// Closure bound directly to a key, for structural actions that have no
/// business being a named command (e.g. reacting to a terminal resize).
pub type Action = Rc<dyn Fn(&mut EditorApp) -> Result<()>>;

/// What a key sequence is bound to.
#[derive(Clone)]
pub enum Binding {
    /// Resolved through the command registry when dispatched.
    Command(String),
    /// Invoked as-is.
    Inline(Action),
}

impl Binding {
    pub fn command(name: impl Into<String>) -> Self {
        Binding::Command(name.into())
    }

    pub fn inline(action: impl Fn(&mut EditorApp) -> Result<()> + 'static) -> Self {
        Binding::Inline(Rc::new(action))
    }

    /// Command name, if this is a named binding.
    pub fn name(&self) -> Option<&str> {
        match self {
            Binding::Command(name) => Some(name),
            Binding::Inline(_) => None,
        }
    }
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Binding::Command(a), Binding::Command(b)) => a == b,
            (Binding::Inline(a), Binding::Inline(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Command(name) => write!(f, "Command({})", name),
            Binding::Inline(action) => write!(f, "Inline({:p})", Rc::as_ptr(action)),
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Command(name) => write!(f, "{}", name),
            Binding::Inline(_) => write!(f, "<anonymous>"),
        }
    }
}

/// Result of looking a sequence up in one keymap.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Exact, terminal match.
    Leaf(Binding),
    /// Valid prefix of at least one binding; more keys needed.
    Partial,
    /// Nothing starts with this sequence.
    Undefined,
}

#[derive(Debug, Clone)]
enum Node {
    Branch(HashMap<KeyCode, Node>),
    Leaf(Binding),
}

impl Node {
    fn branch() -> Self {
        Node::Branch(HashMap::new())
    }

    /// Children of this node, turning a leaf into an empty branch first.
    fn children_mut(&mut self) -> &mut HashMap<KeyCode, Node> {
        if let Node::Leaf(_) = self {
            *self = Node::branch();
        }
        match self {
            Node::Branch(children) => children,
            Node::Leaf(_) => unreachable!("leaf replaced above"),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf(_) => 1,
            Node::Branch(children) => children.values().map(Node::leaf_count).sum(),
        }
    }
}

/// A trie of key sequences. The root is always a branch.
#[derive(Debug, Clone)]
pub struct Keymap {
    root: Node,
}

impl Keymap {
    pub fn new() -> Self {
        Self { root: Node::branch() }
    }

    /// Bind `keys` to `binding`, creating intermediate branches.
    ///
    /// A leaf found on the way becomes a branch, and a branch at the end of
    /// the path becomes the leaf.
    pub fn bind(&mut self, keys: &[KeyCode], binding: Binding) -> Result<()> {
        let (last, path) = keys.split_last().ok_or(EditorError::EmptyKeySequence)?;

        let mut children = self.root.children_mut();
        for key in path {
            children = children
                .entry(*key)
                .or_insert_with(Node::branch)
                .children_mut();
        }
        children.insert(*last, Node::Leaf(binding));
        Ok(())
    }

    /// Parse `desc` (e.g. `"C-x C-f"`) and bind it.
    pub fn bind_description(&mut self, desc: &str, binding: Binding) -> Result<()> {
        let keys = kbd(desc)?;
        self.bind(&keys, binding)
    }

    /// Shorthand for binding a named command by description.
    pub fn bind_command(&mut self, desc: &str, command: &str) -> Result<()> {
        self.bind_description(desc, Binding::command(command))
    }

    pub fn lookup(&self, keys: &[KeyCode]) -> Lookup {
        let mut node = &self.root;
        for key in keys {
            match node {
                Node::Branch(children) => match children.get(key) {
                    Some(child) => node = child,
                    None => return Lookup::Undefined,
                },
                Node::Leaf(_) => return Lookup::Undefined,
            }
        }
        match node {
            Node::Leaf(binding) => Lookup::Leaf(binding.clone()),
            Node::Branch(_) => Lookup::Partial,
        }
    }

    /// Number of leaf bindings.
    pub fn len(&self) -> usize {
        self.root.leaf_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new()
    }
}
