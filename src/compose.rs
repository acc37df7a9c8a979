//! Composer: a thin layer over the YAML event stream from
//! `saphyr_parser::Parser` that builds the node tree.
//!
//! Responsibilities
//! - Translate raw scanner events into [`Node`]s, keeping tags, styles and
//!   source locations.
//! - Detect duplicate mapping keys while pairs are assembled, comparing
//!   keys by *resolved* scalar value (so `0x1` collides with `1` and
//!   `True` with `TRUE`), and apply the configured policy.
//! - Record anchored subtrees and clone them on alias, metering the clones
//!   against the budget so alias bombs stop early.
//! - Enforce the raw-event budget and reset anchors per document.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use saphyr_parser::{Event, Parser as ScanParser};

use crate::budget::BudgetEnforcer;
use crate::error::Error;
use crate::location::{location_from_span, Location};
use crate::node::{Node, NodeKind, ScalarStyle};
use crate::options::{DuplicateKeyPolicy, Options};
use crate::scalars::{self, Resolved};
use crate::tags;

/// Canonical fingerprint of a key node for duplicate detection.
///
/// Plain untagged scalars are fingerprinted by their resolved value, not
/// their spelling; tagged scalars by tag plus raw text; collections
/// structurally.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum KeyFingerprint {
    Null,
    Bool(bool),
    Int(i64),
    /// Bit pattern, so float keys hash consistently.
    Float(u64),
    Str(String),
    Tagged { tag: String, raw: String },
    Sequence(Vec<KeyFingerprint>),
    Mapping(Vec<(KeyFingerprint, KeyFingerprint)>),
}

fn fingerprint(node: &Node, options: &Options) -> Result<KeyFingerprint, Error> {
    match &node.kind {
        NodeKind::Scalar { value, style } => {
            if let Some(tag) = &node.tag {
                return Ok(KeyFingerprint::Tagged {
                    tag: tag.clone(),
                    raw: value.clone(),
                });
            }
            if *style != ScalarStyle::Plain {
                return Ok(KeyFingerprint::Str(value.clone()));
            }
            Ok(
                match scalars::resolve_plain(value, options, node.location)? {
                    Resolved::Null => KeyFingerprint::Null,
                    Resolved::Bool(b) => KeyFingerprint::Bool(b),
                    Resolved::Int(i) => KeyFingerprint::Int(i),
                    Resolved::Float(f) => KeyFingerprint::Float(f.to_bits()),
                    Resolved::Str => KeyFingerprint::Str(value.clone()),
                },
            )
        }
        NodeKind::Sequence(items) => Ok(KeyFingerprint::Sequence(
            items
                .iter()
                .map(|n| fingerprint(n, options))
                .collect::<Result<_, _>>()?,
        )),
        NodeKind::Mapping(pairs) => Ok(KeyFingerprint::Mapping(
            pairs
                .iter()
                .map(|(k, v)| Ok((fingerprint(k, options)?, fingerprint(v, options)?)))
                .collect::<Result<_, Error>>()?,
        )),
    }
}

fn display_key(node: &Node) -> String {
    match node.as_scalar() {
        Some((text, _)) => text.to_string(),
        None => node.kind_name().to_string(),
    }
}

/// An open container being assembled from the event stream.
enum Frame {
    Sequence {
        items: Vec<Node>,
        tag: Option<String>,
        anchor: usize,
        location: Location,
    },
    Mapping {
        pairs: Vec<(Node, Node)>,
        /// fingerprint → (index in `pairs`, first key location)
        seen: HashMap<KeyFingerprint, (usize, Location)>,
        pending_key: Option<Node>,
        tag: Option<String>,
        anchor: usize,
        location: Location,
    },
}

struct Composer<'a> {
    options: &'a Options,
    budget: Option<BudgetEnforcer>,
    /// Completed anchored subtrees of the current document (id → node).
    anchors: HashMap<usize, Node>,
    stack: Vec<Frame>,
    root: Option<Node>,
    docs: Vec<Node>,
}

/// Parse `text` into one node tree per document.
///
/// This is the strict-scanner entry point: every error the policy layer can
/// raise (syntax, budget, duplicate key, unsafe boolean in a key) surfaces
/// here with its source location.
pub(crate) fn compose_documents(text: &str, options: &Options) -> Result<Vec<Node>, Error> {
    let mut parser = ScanParser::new_from_str(text);
    let mut composer = Composer {
        options,
        budget: options.budget.clone().map(BudgetEnforcer::new),
        anchors: HashMap::new(),
        stack: Vec::new(),
        root: None,
        docs: Vec::new(),
    };

    while let Some(item) = parser.next() {
        let (event, span) = item.map_err(Error::from_scan_error)?;
        let location = location_from_span(&span);
        if let Some(budget) = composer.budget.as_mut() {
            budget
                .observe(&event)
                .map_err(|breach| Error::Budget { breach, location })?;
        }
        composer.handle(event, location)?;
    }

    Ok(composer.docs)
}

impl Composer<'_> {
    fn handle(&mut self, event: Event, location: Location) -> Result<(), Error> {
        match event {
            Event::StreamStart | Event::StreamEnd | Event::Nothing => {}

            Event::DocumentStart(_) => {
                // Anchors do not cross document boundaries.
                self.anchors.clear();
            }
            Event::DocumentEnd => {
                if let Some(root) = self.root.take() {
                    self.docs.push(root);
                }
            }

            Event::Scalar(value, style, anchor_id, tag) => {
                let node = Node::scalar(value.into_owned(), style.into(), location)
                    .with_tag(tag.map(|t| tags::normalize(&t.to_string())));
                self.complete(node, anchor_id)?;
            }

            Event::SequenceStart(anchor_id, tag) => {
                self.stack.push(Frame::Sequence {
                    items: Vec::new(),
                    tag: tag.map(|t| tags::normalize(&t.to_string())),
                    anchor: anchor_id,
                    location,
                });
            }
            Event::SequenceEnd => match self.stack.pop() {
                Some(Frame::Sequence {
                    items,
                    tag,
                    anchor,
                    location,
                }) => {
                    let node = Node::sequence(items, location).with_tag(tag);
                    self.complete(node, anchor)?;
                }
                _ => return Err(Error::syntax("sequence end with no open sequence", location)),
            },

            Event::MappingStart(anchor_id, tag) => {
                self.stack.push(Frame::Mapping {
                    pairs: Vec::new(),
                    seen: HashMap::new(),
                    pending_key: None,
                    tag: tag.map(|t| tags::normalize(&t.to_string())),
                    anchor: anchor_id,
                    location,
                });
            }
            Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Mapping {
                    pairs,
                    pending_key: None,
                    tag,
                    anchor,
                    location,
                    ..
                }) => {
                    let node = Node::mapping(pairs, location).with_tag(tag);
                    self.complete(node, anchor)?;
                }
                Some(Frame::Mapping { pending_key: Some(_), .. }) => {
                    return Err(Error::syntax("mapping ended while expecting a value", location));
                }
                _ => return Err(Error::syntax("mapping end with no open mapping", location)),
            },

            Event::Alias(id) => {
                let node = self
                    .anchors
                    .get(&id)
                    .cloned()
                    .ok_or(Error::UnknownAnchor { id, location })?;
                if let Some(budget) = self.budget.as_mut() {
                    budget
                        .observe_alias_expansion(node.subtree_size())
                        .map_err(|breach| Error::Budget { breach, location })?;
                }
                self.attach(node, location)?;
            }
        }
        Ok(())
    }

    /// Register the finished node under its anchor (if any) and attach it
    /// to the enclosing container or document.
    fn complete(&mut self, node: Node, anchor_id: usize) -> Result<(), Error> {
        if anchor_id != 0 {
            self.anchors.insert(anchor_id, node.clone());
        }
        let location = node.location;
        self.attach(node, location)
    }

    fn attach(&mut self, node: Node, location: Location) -> Result<(), Error> {
        match self.stack.last_mut() {
            None => {
                if self.root.is_some() {
                    return Err(Error::syntax("more than one root node in document", location));
                }
                self.root = Some(node);
                Ok(())
            }
            Some(Frame::Sequence { items, .. }) => {
                items.push(node);
                Ok(())
            }
            Some(Frame::Mapping {
                pairs,
                seen,
                pending_key,
                ..
            }) => match pending_key.take() {
                None => {
                    *pending_key = Some(node);
                    Ok(())
                }
                Some(key) => {
                    let fp = fingerprint(&key, self.options)?;
                    match seen.entry(fp) {
                        Entry::Occupied(entry) => {
                            let (index, first) = *entry.get();
                            match self.options.duplicate_keys {
                                DuplicateKeyPolicy::Error => Err(Error::DuplicateKey {
                                    key: display_key(&key),
                                    first,
                                    location: key.location,
                                }),
                                DuplicateKeyPolicy::FirstWins => Ok(()),
                                DuplicateKeyPolicy::LastWins => {
                                    pairs[index] = (key, node);
                                    Ok(())
                                }
                            }
                        }
                        Entry::Vacant(entry) => {
                            entry.insert((pairs.len(), key.location));
                            pairs.push((key, node));
                            Ok(())
                        }
                    }
                }
            },
        }
    }
}
