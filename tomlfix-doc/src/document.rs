use crate::error::{DocError, EditError, EditResult};
use crate::layout;
use crate::lines::LineIndex;
use crate::node::{ContainerMut, Node, NodeMut};
use crate::strings::{quote_basic, quote_literal, string_style};
use tomlfix_types::{DocumentId, Location, PathSegment, StringStyle, TomlPath};
use toml_edit::{DocumentMut, InlineTable, Item, Key, Table, Value};
use tracing::trace;

/// One TOML document: the original text plus an editable, format-preserving tree.
#[derive(Debug, Clone)]
pub struct Document {
    id: DocumentId,
    original: String,
    tree: DocumentMut,
    lines: LineIndex,
    dirty: bool,
    revision: u64,
    /// Key renames applied so far, oldest first.
    renames: Vec<(TomlPath, TomlPath)>,
}

/// A resolved handle to a node that existed when it was located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    path: TomlPath,
}

impl NodeRef {
    pub fn path(&self) -> &TomlPath {
        &self.path
    }

    /// The key this node is stored under, if it is not an array element.
    pub fn key(&self) -> Option<&str> {
        self.path.last().and_then(PathSegment::as_key)
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.path.parent().map(|path| NodeRef { path })
    }

    pub fn child(&self, seg: impl Into<PathSegment>) -> NodeRef {
        NodeRef {
            path: self.path.join(seg),
        }
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Table,
    ArrayOfTables,
    InlineTable,
    Array,
    String,
    Integer,
    Float,
    Boolean,
    Datetime,
}

/// Snapshot of the editable state, used to roll back a failed strategy.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    tree: DocumentMut,
    dirty: bool,
    revision: u64,
    renames: Vec<(TomlPath, TomlPath)>,
}

impl Document {
    pub fn load(id: DocumentId, raw: impl Into<String>) -> Result<Self, DocError> {
        let original = raw.into();
        let tree = original
            .parse::<DocumentMut>()
            .map_err(|e| DocError::Parse {
                document: id.clone(),
                message: e.to_string(),
            })?;
        let lines = LineIndex::build(&original);
        Ok(Self {
            id,
            original,
            tree,
            lines,
            dirty: false,
            revision: 0,
            renames: Vec::new(),
        })
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    /// True once a primitive edit changed the tree.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of edits that actually changed the tree.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current text. Exactly the original until an edit changes something; after that, lines
    /// no edit touched keep their original bytes.
    pub fn serialize(&self) -> String {
        if !self.dirty {
            return self.original.clone();
        }
        layout::splice(&self.original, &self.tree.to_string())
    }

    /// True when the serialized text differs from the original.
    pub fn is_modified(&self) -> bool {
        self.dirty && self.serialize() != self.original
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            tree: self.tree.clone(),
            dirty: self.dirty,
            revision: self.revision,
            renames: self.renames.clone(),
        }
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.tree = checkpoint.tree;
        self.dirty = checkpoint.dirty;
        self.revision = checkpoint.revision;
        self.renames = checkpoint.renames;
    }

    // Location

    /// Structural path a location points at, resolved against the original text.
    ///
    /// An explicit `toml_path` wins; otherwise the line is looked up in the line index.
    pub fn resolve(&self, location: &Location) -> Option<TomlPath> {
        if !location.toml_path.is_empty() {
            return Some(location.toml_path.clone());
        }
        location
            .line
            .and_then(|line| self.lines.path_at(line))
            .cloned()
    }

    /// Line in the original text where `path` (or its deepest declared ancestor) starts.
    pub fn line_of(&self, path: &TomlPath) -> Option<u64> {
        self.lines.line_of(path)
    }

    /// Resolve a location to a live node, following keys renamed since load. `None` when the
    /// node does not exist (any more).
    pub fn locate(&self, location: &Location) -> Option<NodeRef> {
        let path = self.follow(&self.resolve(location)?);
        self.locate_path(&path)
    }

    pub fn locate_path(&self, path: &TomlPath) -> Option<NodeRef> {
        self.node(path).map(|_| NodeRef { path: path.clone() })
    }

    /// Where a path resolved against the original text points now, after key renames.
    pub fn follow(&self, path: &TomlPath) -> TomlPath {
        let mut path = path.clone();
        for (from, to) in &self.renames {
            if path.starts_with(from) {
                path = to
                    .segments()
                    .iter()
                    .chain(&path.segments()[from.len()..])
                    .cloned()
                    .collect();
            }
        }
        path
    }

    pub fn root(&self) -> NodeRef {
        NodeRef {
            path: TomlPath::root(),
        }
    }

    // Reads

    pub fn kind(&self, node: &NodeRef) -> Option<NodeKind> {
        let kind = match self.node(&node.path)? {
            Node::Table(_) | Node::Item(Item::Table(_)) => NodeKind::Table,
            Node::Item(Item::ArrayOfTables(_)) => NodeKind::ArrayOfTables,
            Node::Item(Item::None) => return None,
            Node::Item(Item::Value(v)) | Node::Value(v) => match v {
                Value::String(_) => NodeKind::String,
                Value::Integer(_) => NodeKind::Integer,
                Value::Float(_) => NodeKind::Float,
                Value::Boolean(_) => NodeKind::Boolean,
                Value::Datetime(_) => NodeKind::Datetime,
                Value::Array(_) => NodeKind::Array,
                Value::InlineTable(_) => NodeKind::InlineTable,
            },
        };
        Some(kind)
    }

    /// The value at `node`, if it is a value rather than a table.
    pub fn value(&self, node: &NodeRef) -> Option<&Value> {
        self.node(&node.path)?.value()
    }

    /// Keys of a table or inline table, in document order.
    pub fn keys(&self, node: &NodeRef) -> Option<Vec<String>> {
        self.node(&node.path)?.keys()
    }

    /// Quoting style of a single-line string scalar.
    pub fn string_style(&self, node: &NodeRef) -> Option<StringStyle> {
        match self.value(node)? {
            Value::String(f) => string_style(&f.display_repr()),
            _ => None,
        }
    }

    fn node(&self, path: &TomlPath) -> Option<Node<'_>> {
        let mut node = Node::Table(self.tree.as_table());
        for seg in path.segments() {
            node = node.child(seg)?;
        }
        Some(node)
    }

    fn node_mut(&mut self, path: &TomlPath) -> EditResult<NodeMut<'_>> {
        let mut node = NodeMut::Table(self.tree.as_table_mut());
        for seg in path.segments() {
            node = node.child(seg).ok_or_else(|| EditError::NotFound { path: path.clone() })?;
        }
        Ok(node)
    }

    fn value_mut(&mut self, path: &TomlPath) -> EditResult<&mut Value> {
        self.node_mut(path)?
            .into_value()
            .ok_or_else(|| EditError::NotAValue { path: path.clone() })
    }

    fn container_mut(&mut self, path: &TomlPath) -> EditResult<ContainerMut<'_>> {
        self.node_mut(path)?
            .into_container()
            .ok_or_else(|| EditError::NotAContainer { path: path.clone() })
    }

    fn touch(&mut self, changed: bool, op: &'static str, path: &TomlPath) {
        if changed {
            self.dirty = true;
            self.revision += 1;
        }
        trace!(document = %self.id, op, path = %path, changed, "primitive edit");
    }

    // Primitive edits

    /// Replace a scalar, keeping the old value's surrounding whitespace and trailing comment.
    pub fn replace_scalar(&mut self, node: &NodeRef, value: Value) -> EditResult<()> {
        let path = node.path.clone();
        let slot = self.value_mut(&path)?;
        if matches!(slot, Value::Array(_) | Value::InlineTable(_)) {
            return Err(EditError::NotAValue { path });
        }
        let changed = replace_keeping_decor(slot, value);
        self.touch(changed, "replace_scalar", &path);
        Ok(())
    }

    /// Rename the key `node` is stored under. Position, comments and key spacing are kept.
    pub fn rename_key(&mut self, node: &NodeRef, new_key: &str) -> EditResult<()> {
        let parent = node.parent().ok_or(EditError::Root { action: "renamed" })?;
        let old_key = node
            .key()
            .ok_or_else(|| EditError::NotAKey {
                path: node.path.clone(),
            })?
            .to_string();
        if old_key == new_key {
            return Ok(());
        }

        let changed = match self.container_mut(&parent.path)? {
            ContainerMut::Table(t) => rename_in_table(t, &old_key, new_key),
            ContainerMut::Inline(t) => rename_in_inline(t, &old_key, new_key),
            ContainerMut::Array(_) | ContainerMut::Tables(_) => None,
        };
        match changed {
            Some(Ok(())) => {
                self.touch(true, "rename_key", &node.path);
                self.renames
                    .push((node.path.clone(), parent.path.join(new_key)));
                Ok(())
            }
            Some(Err(())) => Err(EditError::KeyExists {
                path: parent.path,
                key: new_key.to_string(),
            }),
            None => Err(EditError::NotFound {
                path: node.path.clone(),
            }),
        }
    }

    /// Insert a value under `parent`, by key for tables or by index for arrays.
    pub fn insert_child(
        &mut self,
        parent: &NodeRef,
        slot: impl Into<PathSegment>,
        value: Value,
    ) -> EditResult<()> {
        let slot = slot.into();
        let parent_path = parent.path.clone();
        match (self.container_mut(&parent_path)?, &slot) {
            (ContainerMut::Table(t), PathSegment::Key(k)) => {
                if t.contains_key(k) {
                    return Err(EditError::KeyExists {
                        path: parent_path,
                        key: k.clone(),
                    });
                }
                t.insert(k, Item::Value(value));
            }
            (ContainerMut::Inline(t), PathSegment::Key(k)) => {
                if t.contains_key(k) {
                    return Err(EditError::KeyExists {
                        path: parent_path,
                        key: k.clone(),
                    });
                }
                t.insert(k.as_str(), value);
            }
            (ContainerMut::Array(a), PathSegment::Index(i)) => {
                let index = *i;
                if index > a.len() {
                    return Err(EditError::IndexOutOfBounds {
                        path: parent_path,
                        index,
                    });
                }
                insert_into_array(a, index, value);
            }
            _ => {
                return Err(EditError::NotAContainer { path: parent_path });
            }
        }
        self.touch(true, "insert_child", &parent_path.join(slot));
        Ok(())
    }

    /// Remove the node from its parent.
    pub fn remove_child(&mut self, node: &NodeRef) -> EditResult<()> {
        let parent = node.parent().ok_or(EditError::Root { action: "removed" })?;
        let path = node.path.clone();
        let seg = path.last().cloned().ok_or(EditError::Root { action: "removed" })?;
        let not_found = || EditError::NotFound { path: path.clone() };

        match (self.container_mut(&parent.path)?, &seg) {
            (ContainerMut::Table(t), PathSegment::Key(k)) => {
                t.remove(k).ok_or_else(not_found)?;
            }
            (ContainerMut::Inline(t), PathSegment::Key(k)) => {
                t.remove(k).ok_or_else(not_found)?;
            }
            (ContainerMut::Array(a), PathSegment::Index(i)) => {
                if *i >= a.len() {
                    return Err(not_found());
                }
                let removed = a.remove(*i);
                if *i == 0 {
                    if let Some(next) = a.get_mut(0) {
                        let prefix = removed.decor().prefix().cloned().unwrap_or_default();
                        next.decor_mut().set_prefix(prefix);
                    }
                }
            }
            (ContainerMut::Tables(a), PathSegment::Index(i)) => {
                if *i >= a.len() {
                    return Err(not_found());
                }
                a.remove(*i);
            }
            _ => return Err(not_found()),
        }
        self.touch(true, "remove_child", &path);
        Ok(())
    }

    /// Sort the key/value entries of a table or inline table by key.
    ///
    /// Sub-tables declared with their own header keep their document position.
    pub fn sort_keys(&mut self, node: &NodeRef) -> EditResult<()> {
        let path = node.path.clone();
        let changed = match self.container_mut(&path)? {
            ContainerMut::Table(t) => {
                let before = table_order(t);
                t.sort_values();
                before != table_order(t)
            }
            ContainerMut::Inline(t) => {
                let before: Vec<String> = t.iter().map(|(k, _)| k.to_string()).collect();
                t.sort_values();
                before != t.iter().map(|(k, _)| k.to_string()).collect::<Vec<_>>()
            }
            ContainerMut::Array(_) | ContainerMut::Tables(_) => {
                return Err(EditError::NotAContainer { path });
            }
        };
        self.touch(changed, "sort_keys", &path);
        Ok(())
    }

    /// Change only the quoting of a single-line string.
    pub fn restyle_string(&mut self, node: &NodeRef, style: StringStyle) -> EditResult<()> {
        let path = node.path.clone();
        let slot = self.value_mut(&path)?;
        let Value::String(current) = &*slot else {
            return Err(EditError::NotAString { path });
        };
        let repr = current.display_repr().into_owned();
        let Some(current_style) = string_style(&repr) else {
            return Err(EditError::Unrepresentable {
                path,
                reason: "multi-line strings keep their style".to_string(),
            });
        };
        if current_style == style {
            self.touch(false, "restyle_string", &path);
            return Ok(());
        }

        let text = current.value().clone();
        let raw = match style {
            StringStyle::Basic => quote_basic(&text),
            StringStyle::Literal => {
                quote_literal(&text).ok_or_else(|| EditError::Unrepresentable {
                    path: path.clone(),
                    reason: "value contains a single quote or control character".to_string(),
                })?
            }
        };
        let restyled = raw
            .parse::<Value>()
            .map_err(|e| EditError::Unrepresentable {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        let changed = replace_keeping_decor(slot, restyled);
        self.touch(changed, "restyle_string", &path);
        Ok(())
    }
}

fn replace_keeping_decor(slot: &mut Value, mut value: Value) -> bool {
    *value.decor_mut() = slot.decor().clone();
    let changed = slot.to_string() != value.to_string();
    *slot = value;
    changed
}

fn renamed_key(old: &Key, new_key: &str) -> Key {
    Key::new(new_key)
        .with_leaf_decor(old.leaf_decor().clone())
        .with_dotted_decor(old.dotted_decor().clone())
}

/// `None` when `old` is absent, `Some(Err)` when `new` is taken.
fn rename_in_table(table: &mut Table, old: &str, new: &str) -> Option<Result<(), ()>> {
    if !table.contains_key(old) {
        return None;
    }
    if table.contains_key(new) {
        return Some(Err(()));
    }

    // Re-insert every entry so the renamed one keeps its slot.
    let keys: Vec<String> = table.iter().map(|(k, _)| k.to_string()).collect();
    let mut entries = Vec::with_capacity(keys.len());
    for k in &keys {
        let key = table.get_key_value(k).map(|(key, _)| key.clone());
        if let (Some(key), Some(item)) = (key, table.remove(k)) {
            entries.push((key, item));
        }
    }
    for (key, item) in entries {
        let key = if key.get() == old {
            renamed_key(&key, new)
        } else {
            key
        };
        table.insert_formatted(&key, item);
    }
    Some(Ok(()))
}

fn rename_in_inline(table: &mut InlineTable, old: &str, new: &str) -> Option<Result<(), ()>> {
    if !table.contains_key(old) {
        return None;
    }
    if table.contains_key(new) {
        return Some(Err(()));
    }

    let keys: Vec<String> = table.iter().map(|(k, _)| k.to_string()).collect();
    let mut entries = Vec::with_capacity(keys.len());
    for k in &keys {
        let key = table.get_key_value(k).map(|(key, _)| key.clone());
        if let (Some(key), Some(value)) = (key, table.remove(k)) {
            entries.push((key, value));
        }
    }
    for (key, value) in entries {
        let key = if key.get() == old {
            renamed_key(&key, new)
        } else {
            key
        };
        table.insert_formatted(&key, value);
    }
    Some(Ok(()))
}

fn insert_into_array(array: &mut toml_edit::Array, index: usize, mut value: Value) {
    let len = array.len();
    if len == 0 {
        array.insert(0, value);
        return;
    }
    // Borrow the formatting of the element the new one lands next to.
    let template = if index == 0 { 0 } else { index - 1 };
    if let Some(neighbour) = array.get(template) {
        *value.decor_mut() = neighbour.decor().clone();
    }
    array.insert_formatted(index, value);
    if index == 0 {
        let spacing = array
            .get(2)
            .and_then(|v| v.decor().prefix().cloned())
            .unwrap_or_else(|| " ".into());
        if let Some(shifted) = array.get_mut(1) {
            shifted.decor_mut().set_prefix(spacing);
        }
    }
}

fn table_order(table: &Table) -> Vec<String> {
    table.iter().map(|(k, _)| k.to_string()).collect()
}
