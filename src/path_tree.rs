//! Lazily expanded filesystem tree used by the path widgets.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. A directory's
//! children are read once when it is opened and evicted from the arena when
//! it is closed, so only the branches the user is looking at stay in memory.

use std::{
    collections::BTreeMap,
    env, fs, io,
    path::{Path, PathBuf},
};

use log::debug;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    #[must_use]
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

/// Directory listing and working-directory lookup.
pub trait FileSystem: Send {
    fn current_dir(&self) -> io::Result<PathBuf>;

    /// Lists `path`, sorted by name.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn current_dir(&self) -> io::Result<PathBuf> {
        env::current_dir()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                // follows symlinks so linked directories can be entered
                is_dir: entry.path().is_dir(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// An in-memory directory table for scripted sessions and tests.
///
/// Directories not registered with [`MemoryFileSystem::with_dir`] fail to
/// list with `NotFound`.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    cwd: PathBuf,
    dirs: BTreeMap<PathBuf, Vec<DirEntry>>,
}

impl MemoryFileSystem {
    #[must_use]
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            dirs: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_dir(mut self, path: impl Into<PathBuf>, entries: Vec<DirEntry>) -> Self {
        self.dirs.insert(path.into(), entries);
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(self.cwd.clone())
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = self.dirs.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )
        })?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Stable handle to a node in a [`PathTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNode {
    pub path: PathBuf,
    pub name: String,
    /// Position among its siblings.
    pub index: usize,
    pub depth: usize,
    pub is_dir: bool,
    pub is_selected: bool,
    pub is_open: bool,
    pub parent: Option<NodeId>,
    /// `None` until listed; `Some(empty)` for a listed empty directory.
    pub children: Option<Vec<NodeId>>,
}

impl PathNode {
    fn new(path: PathBuf, depth: usize, index: usize, is_dir: bool, parent: Option<NodeId>) -> Self {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self {
            path,
            name,
            index,
            depth,
            is_dir,
            is_selected: false,
            is_open: false,
            parent,
            children: None,
        }
    }
}

pub struct PathTree {
    fs: Box<dyn FileSystem>,
    nodes: Vec<Option<PathNode>>,
    free: Vec<usize>,
    root: NodeId,
    only_directories: bool,
}

impl PathTree {
    /// Creates a tree rooted at `root`. The root is not listed until opened.
    pub fn new(fs: Box<dyn FileSystem>, root: impl Into<PathBuf>, only_directories: bool) -> Self {
        let root = PathNode::new(root.into(), 0, 0, true, None);
        Self {
            fs,
            nodes: vec![Some(root)],
            free: Vec::new(),
            root: NodeId(0),
            only_directories,
        }
    }

    #[must_use]
    pub fn file_system(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&PathNode> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut PathNode> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Number of nodes currently materialized.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .and_then(|node| node.children.as_deref())
            .unwrap_or_default()
    }

    /// The siblings of `id`, or just the root when `id` has no parent.
    #[must_use]
    pub fn layer(&self, id: NodeId) -> Vec<NodeId> {
        match self.node(id).and_then(|node| node.parent) {
            Some(parent) => self.children(parent).to_vec(),
            None => vec![self.root],
        }
    }

    /// Marks a directory open, listing it on first use.
    ///
    /// A listing failure leaves the directory open and empty.
    pub fn open(&mut self, id: NodeId) {
        let Some(node) = self.node(id) else {
            return;
        };
        if !node.is_dir {
            return;
        }
        if node.children.is_some() {
            if let Some(node) = self.node_mut(id) {
                node.is_open = true;
            }
            return;
        }

        let path = node.path.clone();
        let depth = node.depth.saturating_add(1);
        let only_directories = self.only_directories;

        let entries = match self.fs.read_dir(&path) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("unable to list {}: {e}", path.display());
                Vec::new()
            }
        };

        let children: Vec<NodeId> = entries
            .into_iter()
            .filter(|entry| entry.is_dir || !only_directories)
            .enumerate()
            .map(|(index, entry)| {
                let child = PathNode::new(path.join(&entry.name), depth, index, entry.is_dir, Some(id));
                self.alloc(child)
            })
            .collect();

        if let Some(node) = self.node_mut(id) {
            node.children = Some(children);
            node.is_open = true;
        }
    }

    /// Closes a directory and evicts everything below it.
    pub fn close(&mut self, id: NodeId) {
        let children = match self.node_mut(id) {
            Some(node) => {
                node.is_open = false;
                node.children.take().unwrap_or_default()
            }
            None => return,
        };

        for child in children {
            self.evict(child);
        }
    }

    /// Replaces the tree with one rooted at the current root's parent.
    ///
    /// The new root is opened. Returns `false` when the root has no parent.
    pub fn reroot_up(&mut self) -> bool {
        let Some(parent) = self
            .node(self.root)
            .and_then(|root| root.path.parent())
            .map(Path::to_path_buf)
        else {
            return false;
        };

        debug!("re-rooting tree at {}", parent.display());
        self.nodes.clear();
        self.free.clear();
        self.nodes.push(Some(PathNode::new(parent, 0, 0, true, None)));
        self.root = NodeId(0);
        self.open(self.root);
        true
    }

    #[must_use]
    pub fn find_child(&self, parent: NodeId, path: &Path) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.node(child).is_some_and(|node| node.path == path))
    }

    /// Pre-order walk of the root and every open directory's children.
    #[must_use]
    pub fn visible(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];

        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            out.push(id);
            if node.is_open {
                stack.extend(self.children(id).iter().rev());
            }
        }

        out
    }

    fn alloc(&mut self, node: PathNode) -> NodeId {
        if let Some(slot) = self.free.pop()
            && let Some(entry) = self.nodes.get_mut(slot)
        {
            *entry = Some(node);
            return NodeId(slot);
        }
        self.nodes.push(Some(node));
        NodeId(self.nodes.len().saturating_sub(1))
    }

    fn evict(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id.0).and_then(Option::take) else {
            return;
        };
        self.free.push(id.0);
        for child in node.children.unwrap_or_default() {
            self.evict(child);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn sample_fs() -> MemoryFileSystem {
        MemoryFileSystem::new("/home")
            .with_dir(
                "/",
                vec![DirEntry::dir("home"), DirEntry::file("swapfile")],
            )
            .with_dir(
                "/home",
                vec![
                    DirEntry::file("notes.txt"),
                    DirEntry::dir("projects"),
                    DirEntry::dir("music"),
                ],
            )
            .with_dir("/home/projects", vec![DirEntry::file("main.rs")])
            .with_dir("/home/music", vec![])
    }

    fn names(tree: &PathTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| tree.node(id).unwrap().name.clone())
            .collect()
    }

    #[test]
    fn test_root_is_unlisted_until_opened() {
        let tree = PathTree::new(Box::new(sample_fs()), "/home", false);
        let root = tree.node(tree.root()).unwrap();

        assert_eq!(root.name, "home");
        assert_eq!(root.children, None);
        assert!(!root.is_open);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_open_lists_sorted_children_with_positions() {
        let mut tree = PathTree::new(Box::new(sample_fs()), "/home", false);
        let root = tree.root();
        tree.open(root);

        let children = tree.children(root).to_vec();
        assert_eq!(names(&tree, &children), ["music", "notes.txt", "projects"]);

        let projects = tree.node(children[2]).unwrap();
        assert_eq!(projects.index, 2);
        assert_eq!(projects.depth, 1);
        assert_eq!(projects.parent, Some(root));
        assert_eq!(projects.path, PathBuf::from("/home/projects"));
        assert!(projects.is_dir);
    }

    #[test]
    fn test_open_reuses_cached_children() {
        let mut tree = PathTree::new(Box::new(sample_fs()), "/home", false);
        let root = tree.root();
        tree.open(root);
        let first = tree.children(root).to_vec();

        tree.open(root);

        assert_eq!(tree.children(root), first.as_slice());
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_empty_directory_is_listed_but_empty() {
        let mut tree = PathTree::new(Box::new(sample_fs()), "/home/music", false);
        let root = tree.root();
        tree.open(root);

        assert_eq!(tree.node(root).unwrap().children, Some(vec![]));
    }

    #[test]
    fn test_unreadable_directory_degrades_to_empty() {
        let mut tree = PathTree::new(Box::new(sample_fs()), "/missing", false);
        let root = tree.root();
        tree.open(root);

        let node = tree.node(root).unwrap();
        assert!(node.is_open);
        assert_eq!(node.children, Some(vec![]));
    }

    #[test]
    fn test_only_directories_hides_files() {
        let mut tree = PathTree::new(Box::new(sample_fs()), "/home", true);
        let root = tree.root();
        tree.open(root);

        let children = tree.children(root).to_vec();
        assert_eq!(names(&tree, &children), ["music", "projects"]);
        assert_eq!(tree.node(children[1]).unwrap().index, 1);
    }

    #[test]
    fn test_close_evicts_subtree_and_reuses_slots() {
        let mut tree = PathTree::new(Box::new(sample_fs()), "/home", false);
        let root = tree.root();
        tree.open(root);
        let projects = tree.children(root)[2];
        tree.open(projects);
        assert_eq!(tree.len(), 5);

        tree.close(root);
        assert_eq!(tree.len(), 1);
        assert!(tree.node(projects).is_none());
        assert_eq!(tree.node(root).unwrap().children, None);

        tree.open(root);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.nodes.len(), 5);
    }

    #[test]
    fn test_layer_of_root_is_root() {
        let mut tree = PathTree::new(Box::new(sample_fs()), "/home", false);
        let root = tree.root();
        tree.open(root);

        assert_eq!(tree.layer(root), vec![root]);
        let child = tree.children(root)[0];
        assert_eq!(tree.layer(child), tree.children(root));
    }

    #[test]
    fn test_reroot_up_moves_to_parent() {
        let mut tree = PathTree::new(Box::new(sample_fs()), "/home", false);
        tree.open(tree.root());

        assert!(tree.reroot_up());

        let root = tree.root();
        assert_eq!(tree.node(root).unwrap().path, PathBuf::from("/"));
        let home = tree.find_child(root, Path::new("/home")).unwrap();
        assert_eq!(tree.node(home).unwrap().depth, 1);
        assert_eq!(tree.node(home).unwrap().children, None);

        assert!(!tree.reroot_up());
    }

    #[test]
    fn test_visible_is_preorder_of_open_nodes() {
        let mut tree = PathTree::new(Box::new(sample_fs()), "/home", false);
        let root = tree.root();
        tree.open(root);
        let projects = tree.children(root)[2];
        tree.open(projects);

        let visible = tree.visible();
        assert_eq!(
            names(&tree, &visible),
            ["home", "music", "notes.txt", "projects", "main.rs"]
        );
    }

    #[test]
    fn test_os_file_system_lists_real_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("b_dir")).unwrap();
        fs::write(temp_dir.path().join("a_file.txt"), "x").unwrap();

        let entries = OsFileSystem.read_dir(temp_dir.path()).unwrap();

        assert_eq!(
            entries,
            vec![DirEntry::file("a_file.txt"), DirEntry::dir("b_dir")]
        );
    }

    #[test]
    fn test_os_file_system_missing_directory_errors() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("nope");

        assert!(OsFileSystem.read_dir(&missing).is_err());
    }
}
