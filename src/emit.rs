//! Block-style YAML emission from a node tree.
//!
//! The emitter assumes nodes produced by representation: string scalars
//! already carry the quoting style the content needs, numbers and booleans
//! are plain. Output is deterministic: block style throughout, two-space
//! indentation, flow style only for empty containers and for the rare
//! non-scalar mapping key.

use crate::node::{Node, NodeKind, ScalarStyle};

const INDENT_STEP: usize = 2;

/// Render one document, with a trailing newline.
pub(crate) fn emit_to_string(node: &Node) -> String {
    let mut out = String::new();
    let mut emitter = Emitter { out: &mut out };
    emitter.emit_document(node);
    out
}

struct Emitter<'w> {
    out: &'w mut String,
}

impl Emitter<'_> {
    fn emit_document(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::Scalar { value, style } => {
                if let Some(tag) = &node.tag {
                    self.out.push_str(tag);
                    self.out.push(' ');
                }
                self.write_scalar(value, *style);
                self.out.push('\n');
            }
            _ if is_empty_container(node) => {
                if let Some(tag) = &node.tag {
                    self.out.push_str(tag);
                    self.out.push(' ');
                }
                self.write_flow(node);
                self.out.push('\n');
            }
            _ => {
                if let Some(tag) = &node.tag {
                    self.out.push_str(tag);
                    self.out.push('\n');
                }
                self.emit_block(node, 0);
            }
        }
    }

    /// Write a non-empty container in block form, one entry per line.
    fn emit_block(&mut self, node: &Node, indent: usize) {
        match &node.kind {
            NodeKind::Sequence(items) => {
                for item in items {
                    self.write_indent(indent);
                    self.out.push('-');
                    self.emit_nested(item, indent);
                }
            }
            NodeKind::Mapping(pairs) => {
                for (key, value) in pairs {
                    self.write_indent(indent);
                    match key.as_scalar() {
                        Some((text, style)) => {
                            if let Some(tag) = &key.tag {
                                self.out.push_str(tag);
                                self.out.push(' ');
                            }
                            self.write_scalar(text, style);
                        }
                        None => {
                            // Complex key: explicit-key form with the key in
                            // flow style on one line.
                            self.out.push_str("? ");
                            self.write_flow(key);
                            self.out.push('\n');
                            self.write_indent(indent);
                        }
                    }
                    self.out.push(':');
                    self.emit_nested(value, indent);
                }
            }
            NodeKind::Scalar { .. } => {
                // Unreachable from emit_document; keep output well-formed.
                self.emit_nested(node, indent);
            }
        }
    }

    /// Write the value part after `-` or `:` at the given indent.
    fn emit_nested(&mut self, node: &Node, indent: usize) {
        match &node.kind {
            NodeKind::Scalar { value, style } => {
                self.out.push(' ');
                if let Some(tag) = &node.tag {
                    self.out.push_str(tag);
                    self.out.push(' ');
                }
                self.write_scalar(value, *style);
                self.out.push('\n');
            }
            _ if is_empty_container(node) => {
                self.out.push(' ');
                if let Some(tag) = &node.tag {
                    self.out.push_str(tag);
                    self.out.push(' ');
                }
                self.write_flow(node);
                self.out.push('\n');
            }
            _ => {
                if let Some(tag) = &node.tag {
                    self.out.push(' ');
                    self.out.push_str(tag);
                }
                self.out.push('\n');
                self.emit_block(node, indent + 1);
            }
        }
    }

    /// Single-line flow rendering, used for empty containers and complex
    /// keys.
    fn write_flow(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::Scalar { value, style } => self.write_scalar(value, *style),
            NodeKind::Sequence(items) => {
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.write_flow(item);
                }
                self.out.push(']');
            }
            NodeKind::Mapping(pairs) => {
                self.out.push('{');
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.write_flow(key);
                    self.out.push_str(": ");
                    self.write_flow(value);
                }
                self.out.push('}');
            }
        }
    }

    fn write_scalar(&mut self, value: &str, style: ScalarStyle) {
        match style {
            ScalarStyle::Plain => self.out.push_str(value),
            ScalarStyle::SingleQuoted => {
                self.out.push('\'');
                for c in value.chars() {
                    if c == '\'' {
                        self.out.push_str("''");
                    } else {
                        self.out.push(c);
                    }
                }
                self.out.push('\'');
            }
            // Block styles only occur in parsed trees; re-emission goes
            // through representation, which never produces them.
            ScalarStyle::DoubleQuoted | ScalarStyle::Literal | ScalarStyle::Folded => {
                self.write_double_quoted(value);
            }
        }
    }

    fn write_double_quoted(&mut self, value: &str) {
        self.out.push('"');
        for c in value.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                '\t' => self.out.push_str("\\t"),
                '\r' => self.out.push_str("\\r"),
                c if c.is_control() => {
                    let mut buf = [0u16; 2];
                    for unit in c.encode_utf16(&mut buf) {
                        self.out.push_str(&format!("\\u{unit:04x}"));
                    }
                }
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    fn write_indent(&mut self, indent: usize) {
        for _ in 0..indent * INDENT_STEP {
            self.out.push(' ');
        }
    }
}

fn is_empty_container(node: &Node) -> bool {
    match &node.kind {
        NodeKind::Sequence(items) => items.is_empty(),
        NodeKind::Mapping(pairs) => pairs.is_empty(),
        NodeKind::Scalar { .. } => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Location;

    fn plain(s: &str) -> Node {
        Node::plain(s)
    }

    #[test]
    fn scalar_document() {
        assert_eq!(emit_to_string(&plain("hello")), "hello\n");
    }

    #[test]
    fn quoted_scalar_document() {
        let node = Node::scalar("no".into(), ScalarStyle::SingleQuoted, Location::UNKNOWN);
        assert_eq!(emit_to_string(&node), "'no'\n");
    }

    #[test]
    fn block_mapping_with_nested_sequence() {
        let node = Node::mapping(
            vec![
                (plain("a"), plain("1")),
                (
                    plain("items"),
                    Node::sequence(vec![plain("x"), plain("y")], Location::UNKNOWN),
                ),
            ],
            Location::UNKNOWN,
        );
        assert_eq!(emit_to_string(&node), "a: 1\nitems:\n  - x\n  - y\n");
    }

    #[test]
    fn tagged_document_head() {
        let node = Node::mapping(
            vec![(plain("x"), plain("2")), (plain("y"), plain("4"))],
            Location::UNKNOWN,
        )
        .with_tag(Some("!Rect".into()));
        assert_eq!(emit_to_string(&node), "!Rect\nx: 2\ny: 4\n");
    }

    #[test]
    fn empty_containers_use_flow() {
        let node = Node::mapping(
            vec![(
                plain("empty"),
                Node::sequence(vec![], Location::UNKNOWN),
            )],
            Location::UNKNOWN,
        );
        assert_eq!(emit_to_string(&node), "empty: []\n");
        assert_eq!(
            emit_to_string(&Node::mapping(vec![], Location::UNKNOWN)),
            "{}\n"
        );
    }

    #[test]
    fn double_quoted_escapes() {
        let node = Node::scalar("a\nb\"c".into(), ScalarStyle::DoubleQuoted, Location::UNKNOWN);
        assert_eq!(emit_to_string(&node), "\"a\\nb\\\"c\"\n");
    }
}
