//! The intermediate node tree built from the scanner's event stream.
//!
//! A [`Node`] is the unit the converter framework operates on: converters
//! construct typed values from nodes, and represent typed values back into
//! nodes before emission. Mappings are kept as ordered key/value pair lists
//! rather than an associative structure so duplicate keys can be detected
//! and reported instead of silently overwriting.

use crate::location::Location;

/// Presentation style of a scalar in the source document (or requested for
/// the output document).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarStyle {
    /// Unquoted; subject to plain-scalar resolution (null/bool/number).
    Plain,
    /// Single-quoted; always a string.
    SingleQuoted,
    /// Double-quoted; always a string.
    DoubleQuoted,
    /// `|` block scalar; always a string.
    Literal,
    /// `>` block scalar; always a string.
    Folded,
}

impl From<saphyr_parser::ScalarStyle> for ScalarStyle {
    fn from(style: saphyr_parser::ScalarStyle) -> Self {
        use saphyr_parser::ScalarStyle as S;
        match style {
            S::SingleQuoted => ScalarStyle::SingleQuoted,
            S::DoubleQuoted => ScalarStyle::DoubleQuoted,
            S::Literal => ScalarStyle::Literal,
            S::Folded => ScalarStyle::Folded,
            _ => ScalarStyle::Plain,
        }
    }
}

/// The three structural kinds of YAML content.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// A scalar with its raw (unescaped) text and source style.
    Scalar { value: String, style: ScalarStyle },
    /// An ordered sequence of nodes.
    Sequence(Vec<Node>),
    /// An ordered list of key/value pairs.
    Mapping(Vec<(Node, Node)>),
}

/// One node of the parsed (or to-be-emitted) document tree.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    /// Explicit tag as written in the source, normalized (e.g. `!Rect`,
    /// `!!int`). `None` for untagged nodes.
    pub tag: Option<String>,
    /// Where this node starts in the source document.
    pub location: Location,
}

impl Node {
    pub(crate) fn scalar(value: String, style: ScalarStyle, location: Location) -> Self {
        Node {
            kind: NodeKind::Scalar { value, style },
            tag: None,
            location,
        }
    }

    pub(crate) fn sequence(items: Vec<Node>, location: Location) -> Self {
        Node {
            kind: NodeKind::Sequence(items),
            tag: None,
            location,
        }
    }

    pub(crate) fn mapping(pairs: Vec<(Node, Node)>, location: Location) -> Self {
        Node {
            kind: NodeKind::Mapping(pairs),
            tag: None,
            location,
        }
    }

    /// A plain scalar node with no source location, for representation.
    pub fn plain(value: impl Into<String>) -> Self {
        Node::scalar(value.into(), ScalarStyle::Plain, Location::UNKNOWN)
    }

    pub(crate) fn with_tag(mut self, tag: Option<String>) -> Self {
        self.tag = tag;
        self
    }

    /// Short human name of this node's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Scalar { .. } => "a scalar",
            NodeKind::Sequence(_) => "a sequence",
            NodeKind::Mapping(_) => "a mapping",
        }
    }

    /// The scalar text, if this node is a scalar.
    pub fn as_scalar(&self) -> Option<(&str, ScalarStyle)> {
        match &self.kind {
            NodeKind::Scalar { value, style } => Some((value.as_str(), *style)),
            _ => None,
        }
    }

    /// The item list, if this node is a sequence.
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The pair list, if this node is a mapping.
    pub fn as_mapping(&self) -> Option<&[(Node, Node)]> {
        match &self.kind {
            NodeKind::Mapping(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Total number of nodes in this subtree, counting `self`.
    ///
    /// Used by the composer to meter alias expansion.
    pub(crate) fn subtree_size(&self) -> usize {
        match &self.kind {
            NodeKind::Scalar { .. } => 1,
            NodeKind::Sequence(items) => 1 + items.iter().map(Node::subtree_size).sum::<usize>(),
            NodeKind::Mapping(pairs) => {
                1 + pairs
                    .iter()
                    .map(|(k, v)| k.subtree_size() + v.subtree_size())
                    .sum::<usize>()
            }
        }
    }
}
