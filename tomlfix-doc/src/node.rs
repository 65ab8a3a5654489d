//! Uniform navigation over `toml_edit`'s split item/value tree.

use tomlfix_types::PathSegment;
use toml_edit::{Array, ArrayOfTables, InlineTable, Item, Table, Value};

#[derive(Clone, Copy)]
pub(crate) enum Node<'a> {
    Table(&'a Table),
    Item(&'a Item),
    Value(&'a Value),
}

impl<'a> Node<'a> {
    pub(crate) fn child(self, seg: &PathSegment) -> Option<Node<'a>> {
        match self {
            Node::Table(t) => t.get(seg.as_key()?).map(Node::Item),
            Node::Item(item) => match item {
                Item::None => None,
                Item::Table(t) => Node::Table(t).child(seg),
                Item::ArrayOfTables(a) => a.get(seg.as_index()?).map(Node::Table),
                Item::Value(v) => Node::Value(v).child(seg),
            },
            Node::Value(v) => match (v, seg) {
                (Value::InlineTable(t), PathSegment::Key(k)) => t.get(k).map(Node::Value),
                (Value::Array(a), PathSegment::Index(i)) => a.get(*i).map(Node::Value),
                _ => None,
            },
        }
    }

    pub(crate) fn value(self) -> Option<&'a Value> {
        match self {
            Node::Value(v) => Some(v),
            Node::Item(Item::Value(v)) => Some(v),
            _ => None,
        }
    }

    /// Keys of a table-like node, in document order.
    pub(crate) fn keys(self) -> Option<Vec<String>> {
        match self {
            Node::Table(t) | Node::Item(Item::Table(t)) => {
                Some(t.iter().map(|(k, _)| k.to_string()).collect())
            }
            Node::Value(Value::InlineTable(t)) | Node::Item(Item::Value(Value::InlineTable(t))) => {
                Some(t.iter().map(|(k, _)| k.to_string()).collect())
            }
            _ => None,
        }
    }
}

pub(crate) enum NodeMut<'a> {
    Table(&'a mut Table),
    Item(&'a mut Item),
    Value(&'a mut Value),
}

impl<'a> NodeMut<'a> {
    pub(crate) fn child(self, seg: &PathSegment) -> Option<NodeMut<'a>> {
        match self {
            NodeMut::Table(t) => t.get_mut(seg.as_key()?).map(NodeMut::Item),
            NodeMut::Item(item) => match item {
                Item::None => None,
                Item::Table(t) => NodeMut::Table(t).child(seg),
                Item::ArrayOfTables(a) => a.get_mut(seg.as_index()?).map(NodeMut::Table),
                Item::Value(v) => NodeMut::Value(v).child(seg),
            },
            NodeMut::Value(v) => match (v, seg) {
                (Value::InlineTable(t), PathSegment::Key(k)) => t.get_mut(k).map(NodeMut::Value),
                (Value::Array(a), PathSegment::Index(i)) => a.get_mut(*i).map(NodeMut::Value),
                _ => None,
            },
        }
    }

    pub(crate) fn into_value(self) -> Option<&'a mut Value> {
        match self {
            NodeMut::Value(v) => Some(v),
            NodeMut::Item(Item::Value(v)) => Some(v),
            _ => None,
        }
    }

    pub(crate) fn into_container(self) -> Option<ContainerMut<'a>> {
        match self {
            NodeMut::Table(t) => Some(ContainerMut::Table(t)),
            NodeMut::Item(item) => match item {
                Item::Table(t) => Some(ContainerMut::Table(t)),
                Item::ArrayOfTables(a) => Some(ContainerMut::Tables(a)),
                Item::Value(Value::InlineTable(t)) => Some(ContainerMut::Inline(t)),
                Item::Value(Value::Array(a)) => Some(ContainerMut::Array(a)),
                _ => None,
            },
            NodeMut::Value(v) => match v {
                Value::InlineTable(t) => Some(ContainerMut::Inline(t)),
                Value::Array(a) => Some(ContainerMut::Array(a)),
                _ => None,
            },
        }
    }
}

pub(crate) enum ContainerMut<'a> {
    Table(&'a mut Table),
    Inline(&'a mut InlineTable),
    Array(&'a mut Array),
    Tables(&'a mut ArrayOfTables),
}
