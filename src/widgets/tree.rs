//! Keyboard navigation over a [`PathTree`], shared by the tree pickers.

use std::path::PathBuf;

use colored::Colorize;
use log::debug;

use crate::{
    core::{Key, KeyName, move_cursor},
    path_tree::{FileSystem, NodeId, OsFileSystem, PathNode, PathTree},
    theme::Theme,
};

pub(crate) const NO_MATCHES: &str = "No paths match the search.";

/// Settings collected by the widget builders, consumed on first render.
#[derive(Default)]
pub(crate) struct TreeSource {
    pub(crate) fs: Option<Box<dyn FileSystem>>,
    pub(crate) root: Option<PathBuf>,
    pub(crate) only_directories: bool,
    pub(crate) filter: bool,
}

impl TreeSource {
    pub(crate) fn open(&mut self) -> TreeNavigator {
        let fs = self.fs.take().unwrap_or_else(|| Box::new(OsFileSystem));
        let root = self.root.clone().unwrap_or_else(|| {
            fs.current_dir().unwrap_or_else(|e| {
                debug!("unable to read working directory: {e}");
                PathBuf::from(".")
            })
        });
        TreeNavigator::new(PathTree::new(fs, root, self.only_directories), self.filter)
    }
}

pub(crate) struct TreeNavigator {
    tree: PathTree,
    current: NodeId,
    filter: bool,
    search: String,
}

impl TreeNavigator {
    /// Opens the root and focuses its first child.
    pub(crate) fn new(mut tree: PathTree, filter: bool) -> Self {
        let root = tree.root();
        tree.open(root);
        let current = tree.children(root).first().copied().unwrap_or(root);
        Self {
            tree,
            current,
            filter,
            search: String::new(),
        }
    }

    pub(crate) fn tree(&self) -> &PathTree {
        &self.tree
    }

    pub(crate) fn current_node(&self) -> Option<&PathNode> {
        self.tree.node(self.current)
    }

    pub(crate) fn current_path(&self) -> PathBuf {
        self.current_node()
            .map(|node| node.path.clone())
            .unwrap_or_default()
    }

    pub(crate) fn search(&self) -> &str {
        &self.search
    }

    /// Position of the focused node among its visible siblings.
    pub(crate) fn cursor(&self) -> usize {
        self.filtered_layer()
            .iter()
            .position(|&id| id == self.current)
            .unwrap_or_default()
    }

    fn matches(&self, id: NodeId) -> bool {
        self.search.is_empty()
            || self.tree.node(id).is_some_and(|node| {
                node.name
                    .to_lowercase()
                    .contains(&self.search.to_lowercase())
            })
    }

    /// False once the search hides every node at the focused level.
    pub(crate) fn has_matches(&self) -> bool {
        !self.filtered_layer().is_empty()
    }

    /// The search line shown under the tree, if a search is active.
    pub(crate) fn search_line(&self, theme: &Theme) -> Option<String> {
        if self.search.is_empty() {
            return None;
        }
        let line = if self.has_matches() {
            format!("Search: {}", self.search)
        } else {
            format!("Search: {} (no matches)", self.search)
        };
        Some(theme.dim(&line))
    }

    pub(crate) fn filtered_layer(&self) -> Vec<NodeId> {
        self.tree
            .layer(self.current)
            .into_iter()
            .filter(|&id| self.matches(id))
            .collect()
    }

    /// Applies a navigation or search key. Returns whether it was used.
    pub(crate) fn handle_key(&mut self, key: &Key) -> bool {
        match key.name {
            KeyName::Up | KeyName::Down | KeyName::Home | KeyName::End => {
                let layer = self.filtered_layer();
                let Some(next) = move_cursor(self.cursor(), layer.len(), key)
                    .and_then(|idx| layer.get(idx).copied())
                else {
                    return false;
                };
                self.current = next;
                true
            }
            KeyName::Right => self.descend(),
            KeyName::Left => {
                self.ascend();
                true
            }
            KeyName::Backspace if self.filter && !self.search.is_empty() => {
                self.search.pop();
                self.refocus();
                true
            }
            KeyName::Char(_) if self.filter && !key.ctrl => match key.printable() {
                Some(c) => {
                    self.search.push(c);
                    self.refocus();
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Enters the focused directory, listing it if needed.
    fn descend(&mut self) -> bool {
        if !self.current_node().is_some_and(|node| node.is_dir) {
            return false;
        }
        self.tree.open(self.current);
        let Some(&first) = self.tree.children(self.current).first() else {
            return false;
        };
        self.current = first;
        self.search.clear();
        true
    }

    /// Moves to the parent and evicts its children, or re-roots one level up.
    fn ascend(&mut self) {
        self.search.clear();

        if let Some(parent) = self.current_node().and_then(|node| node.parent) {
            self.tree.close(parent);
            self.current = parent;
            return;
        }

        let old_root = self.current_path();
        if self.tree.reroot_up() {
            let root = self.tree.root();
            self.current = self.tree.find_child(root, &old_root).unwrap_or(root);
        }
    }

    /// Keeps focus on a visible node after the search changes.
    fn refocus(&mut self) {
        if self.matches(self.current) {
            return;
        }
        if let Some(&first) = self.filtered_layer().first() {
            self.current = first;
        }
    }

    /// Sets `is_selected` on every materialized node from `selected`.
    pub(crate) fn sync_selection(&mut self, selected: &[PathBuf]) {
        for id in self.tree.visible() {
            if let Some(node) = self.tree.node_mut(id) {
                node.is_selected = selected.iter().any(|p| p == &node.path);
            }
        }
    }

    /// One line per visible node. `checkboxes` adds a selection mark.
    pub(crate) fn lines(&self, theme: &Theme, checkboxes: bool) -> Vec<String> {
        let symbols = &theme.symbols;
        let parent = self.current_node().and_then(|node| node.parent);

        self.tree
            .visible()
            .into_iter()
            .filter_map(|id| self.tree.node(id).map(|node| (id, node)))
            .filter(|(id, node)| node.parent != parent || parent.is_none() || self.matches(*id))
            .map(|(id, node)| {
                let indent = "  ".repeat(node.depth);
                let marker = match (node.is_dir, node.is_open) {
                    (true, true) => symbols.folder_open,
                    (true, false) => symbols.folder_closed,
                    (false, _) => " ",
                };
                let check = match (checkboxes, node.is_selected) {
                    (false, _) => String::new(),
                    (true, true) => format!("{} ", theme.paint(symbols.checkbox_selected, |s| s.green())),
                    (true, false) => format!("{} ", theme.dim(symbols.checkbox_inactive)),
                };
                let name = if id == self.current {
                    theme.paint(&node.name, |s| s.cyan())
                } else {
                    node.name.clone()
                };
                format!("{indent}{marker} {check}{name}")
            })
            .collect()
    }
}
