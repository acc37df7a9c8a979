//! Streaming YAML budget checker over saphyr-parser events.
//!
//! This inspects the raw event stream while the composer runs and enforces
//! simple budgets to stop pathological inputs (deep nesting, node storms,
//! alias bombs) before they turn into memory or CPU amplification.

use std::collections::HashSet;

use saphyr_parser::Event;
use serde::{Deserialize, Serialize};

/// Budgets for one scan.
///
/// The defaults are intentionally permissive for typical configuration
/// files while stopping obvious resource-amplifying inputs. Tune these per
/// your application if you regularly process very large YAML streams.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Budget {
    /// Maximum total parser events (counting every event).
    ///
    /// Default: 1,000,000
    pub max_events: usize,
    /// Maximum number of *nodes* (sequence starts, mapping starts, scalars).
    ///
    /// Default: 250,000
    pub max_nodes: usize,
    /// Maximum structural nesting depth (sequences + mappings).
    ///
    /// Default: 2,000
    pub max_depth: usize,
    /// Maximum number of YAML documents in the stream.
    ///
    /// Default: 1,024
    pub max_documents: usize,
    /// Maximum number of alias (`*ref`) events.
    ///
    /// Default: 50,000
    pub max_aliases: usize,
    /// Maximum number of distinct anchors (`&anchor` definitions).
    ///
    /// Default: 50,000
    pub max_anchors: usize,
    /// Maximum total bytes of scalar contents.
    ///
    /// Default: 67,108,864 (64 MiB)
    pub max_total_scalar_bytes: usize,
    /// Maximum total number of nodes *cloned into the tree* by alias
    /// expansion across the whole parse. Nested aliases multiply, so this
    /// is the limit that stops billion-laughs style inputs.
    ///
    /// Default: 1,000,000
    pub max_alias_nodes: usize,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_events: 1_000_000,
            max_nodes: 250_000,
            max_depth: 2_000,
            max_documents: 1_024,
            max_aliases: 50_000,
            max_anchors: 50_000,
            max_total_scalar_bytes: 64 * 1024 * 1024,
            max_alias_nodes: 1_000_000,
        }
    }
}

/// What tripped the budget.
#[derive(Clone, Debug)]
pub enum BudgetBreach {
    /// Total parser events exceeded [`Budget::max_events`].
    Events { events: usize },
    /// Node count exceeded [`Budget::max_nodes`].
    Nodes { nodes: usize },
    /// Nesting depth exceeded [`Budget::max_depth`].
    Depth { depth: usize },
    /// Document count exceeded [`Budget::max_documents`].
    Documents { documents: usize },
    /// Alias events exceeded [`Budget::max_aliases`].
    Aliases { aliases: usize },
    /// Distinct anchors exceeded [`Budget::max_anchors`].
    Anchors { anchors: usize },
    /// Cumulative scalar bytes exceeded [`Budget::max_total_scalar_bytes`].
    ScalarBytes { total_scalar_bytes: usize },
    /// Nodes cloned by alias expansion exceeded [`Budget::max_alias_nodes`].
    AliasNodes { alias_nodes: usize },
}

/// Stateful helper that enforces a [`Budget`] while observing [`Event`]s.
#[derive(Debug)]
pub(crate) struct BudgetEnforcer {
    budget: Budget,
    events: usize,
    nodes: usize,
    depth: usize,
    documents: usize,
    aliases: usize,
    total_scalar_bytes: usize,
    alias_nodes: usize,
    defined_anchors: HashSet<usize>,
}

impl BudgetEnforcer {
    pub(crate) fn new(budget: Budget) -> Self {
        Self {
            budget,
            events: 0,
            nodes: 0,
            depth: 0,
            documents: 0,
            aliases: 0,
            total_scalar_bytes: 0,
            alias_nodes: 0,
            defined_anchors: HashSet::with_capacity(64),
        }
    }

    /// Observe a raw parser event, updating the counters.
    ///
    /// Returns `Err(BudgetBreach)` as soon as a limit is exceeded.
    pub(crate) fn observe(&mut self, ev: &Event) -> Result<(), BudgetBreach> {
        self.events += 1;
        if self.events > self.budget.max_events {
            return Err(BudgetBreach::Events {
                events: self.events,
            });
        }

        match ev {
            Event::StreamStart | Event::StreamEnd | Event::DocumentEnd | Event::Nothing => {}
            Event::DocumentStart(_) => {
                self.documents += 1;
                if self.documents > self.budget.max_documents {
                    return Err(BudgetBreach::Documents {
                        documents: self.documents,
                    });
                }
            }
            Event::Alias(_) => {
                self.aliases += 1;
                if self.aliases > self.budget.max_aliases {
                    return Err(BudgetBreach::Aliases {
                        aliases: self.aliases,
                    });
                }
            }
            Event::Scalar(value, _, anchor_id, _) => {
                self.bump_nodes()?;
                self.total_scalar_bytes = self.total_scalar_bytes.saturating_add(value.len());
                if self.total_scalar_bytes > self.budget.max_total_scalar_bytes {
                    return Err(BudgetBreach::ScalarBytes {
                        total_scalar_bytes: self.total_scalar_bytes,
                    });
                }
                self.record_anchor(*anchor_id)?;
            }
            Event::SequenceStart(anchor_id, _) | Event::MappingStart(anchor_id, _) => {
                self.bump_nodes()?;
                self.depth = self.depth.saturating_add(1);
                if self.depth > self.budget.max_depth {
                    return Err(BudgetBreach::Depth { depth: self.depth });
                }
                self.record_anchor(*anchor_id)?;
            }
            Event::SequenceEnd | Event::MappingEnd => {
                self.depth = self.depth.saturating_sub(1);
            }
        }

        Ok(())
    }

    /// Account for `count` nodes injected into the tree by an alias clone.
    pub(crate) fn observe_alias_expansion(&mut self, count: usize) -> Result<(), BudgetBreach> {
        self.alias_nodes = self.alias_nodes.saturating_add(count);
        if self.alias_nodes > self.budget.max_alias_nodes {
            return Err(BudgetBreach::AliasNodes {
                alias_nodes: self.alias_nodes,
            });
        }
        Ok(())
    }

    fn bump_nodes(&mut self) -> Result<(), BudgetBreach> {
        self.nodes += 1;
        if self.nodes > self.budget.max_nodes {
            return Err(BudgetBreach::Nodes { nodes: self.nodes });
        }
        Ok(())
    }

    fn record_anchor(&mut self, anchor_id: usize) -> Result<(), BudgetBreach> {
        if anchor_id != 0 && self.defined_anchors.insert(anchor_id) {
            let count = self.defined_anchors.len();
            if count > self.budget.max_anchors {
                return Err(BudgetBreach::Anchors { anchors: count });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn event_budget_trips() {
        let mut enforcer = BudgetEnforcer::new(Budget {
            max_events: 2,
            ..Budget::default()
        });
        assert!(enforcer.observe(&Event::StreamStart).is_ok());
        assert!(enforcer.observe(&Event::DocumentStart(false)).is_ok());
        assert!(matches!(
            enforcer.observe(&Event::DocumentEnd),
            Err(BudgetBreach::Events { events: 3 })
        ));
    }

    #[test]
    fn scalar_bytes_budget_trips() {
        let mut enforcer = BudgetEnforcer::new(Budget {
            max_total_scalar_bytes: 4,
            ..Budget::default()
        });
        let scalar = Event::Scalar(
            Cow::Borrowed("hello"),
            saphyr_parser::ScalarStyle::Plain,
            0,
            None,
        );
        assert!(matches!(
            enforcer.observe(&scalar),
            Err(BudgetBreach::ScalarBytes { .. })
        ));
    }

    #[test]
    fn alias_expansion_budget_trips() {
        let mut enforcer = BudgetEnforcer::new(Budget {
            max_alias_nodes: 10,
            ..Budget::default()
        });
        assert!(enforcer.observe_alias_expansion(8).is_ok());
        assert!(matches!(
            enforcer.observe_alias_expansion(8),
            Err(BudgetBreach::AliasNodes { .. })
        ));
    }
}
