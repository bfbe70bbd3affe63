//! Level-synchronous walk of the resource graph.
//!
//! One coordinator owns the resolved/pending bookkeeping, the error map and
//! the output tree. Each wave of pending identifiers is fanned out to scoped
//! worker threads which send results back over a channel; the coordinator
//! registers them in discovery order once the whole wave is in.

use crate::Result;
use crate::diagnostics;
use crate::error::{ResolveError, ResolveResult};
use crate::export::tree::{DataNode, DataTree};
use crate::modules::{Module, Registry};
use crate::resource::{Card, Identifier, Item, Resource, Screen, ScreenKind};

use anyhow::bail;
use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeMap;
use std::sync::{Mutex, mpsc};
use std::thread;
use tracing::{debug, error, info};

/// Outcome of a full pass.
#[derive(Debug)]
pub struct Resolution {
    pub tree: DataNode,
    /// Identifiers that failed; their nodes are absent from `tree`.
    pub errors: BTreeMap<Identifier, ResolveError>,
    /// Every identifier handed to a module, in resolution order.
    pub resolved: Vec<Identifier>,
}

pub struct TreeResolver<'a, M: Module> {
    registry: &'a Registry<M>,
    /// Threads per wave; 0 means one per pending identifier.
    workers: usize,
}

impl<'a, M: Module> TreeResolver<'a, M> {
    pub fn new(registry: &'a Registry<M>, workers: usize) -> Self {
        Self { registry, workers }
    }

    /// Resolve everything reachable from the root.
    pub fn resolve_tree(&self) -> Result<Resolution> {
        let mut tree = DataTree::new();
        let mut resolved: IndexSet<Identifier> = IndexSet::new();
        let mut pending: IndexSet<Identifier> = IndexSet::new();
        let mut errors = BTreeMap::new();
        pending.insert(Identifier::ROOT);

        let mut wave_no = 0usize;
        while !pending.is_empty() {
            wave_no += 1;
            let wave: Vec<Identifier> = std::mem::take(&mut pending).into_iter().collect();
            resolved.extend(wave.iter().cloned());
            debug!("wave {}: resolving {} identifiers", wave_no, wave.len());

            let results = self.resolve_wave(&wave)?;
            for (identifier, result) in wave.iter().zip(results) {
                let resource = match result {
                    Ok(resource) => resource,
                    Err(e) => {
                        diagnostics::warn(format!("failed to resolve {}: {}", identifier, e));
                        errors.insert(identifier.clone(), e);
                        continue;
                    }
                };

                if resource.identifier() != identifier {
                    bail!(
                        "{}",
                        diagnostics::error_message(format!(
                            "resolving {} returned {}",
                            identifier,
                            resource.identifier()
                        ))
                    );
                }

                let Resource::Screen(screen) = resource;
                for target in screen.links() {
                    if resolved.contains(target) {
                        debug!(
                            "circular dependency: {} links to already resolved {}, ignoring",
                            identifier, target
                        );
                    } else {
                        pending.insert(target.clone());
                    }
                }

                if let Err(e) = tree.register(identifier, shape(&screen)) {
                    bail!("{}", diagnostics::error_message(e));
                }
            }
        }

        info!(
            "resolved {} identifiers in {} waves, {} failed",
            resolved.len(),
            wave_no,
            errors.len()
        );

        Ok(Resolution {
            tree: tree.into_root(),
            errors,
            resolved: resolved.into_iter().collect(),
        })
    }

    /// Resolve one wave in parallel. Results come back indexed by position in
    /// `wave`.
    fn resolve_wave(&self, wave: &[Identifier]) -> Result<Vec<ResolveResult<Resource>>> {
        let threads = match self.workers {
            0 => wave.len(),
            n => n.min(wave.len()),
        };
        let jobs = Mutex::new(wave.iter().enumerate());
        let (tx, rx) = mpsc::channel();

        thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|_| {
                    let tx = tx.clone();
                    let jobs = &jobs;
                    scope.spawn(move || {
                        loop {
                            let next = match jobs.lock() {
                                Ok(mut jobs) => jobs.next(),
                                Err(_) => None,
                            };
                            let Some((idx, identifier)) = next else {
                                break;
                            };
                            if tx.send((idx, self.registry.resolve(identifier))).is_err() {
                                break;
                            }
                        }
                    })
                })
                .collect();

            for handle in handles {
                if handle.join().is_err() {
                    error!("a resolver thread panicked");
                }
            }
        });
        drop(tx);

        let mut slots: Vec<Option<ResolveResult<Resource>>> = wave.iter().map(|_| None).collect();
        for (idx, result) in rx {
            slots[idx] = Some(result);
        }

        slots
            .into_iter()
            .zip(wave)
            .map(|(slot, identifier)| match slot {
                Some(result) => Ok(result),
                None => bail!(
                    "{}",
                    diagnostics::error_message(format!(
                        "resolver for {} emitted nothing",
                        identifier
                    ))
                ),
            })
            .collect()
    }
}

/// Element name => data. Navigating elements are resolved on their own and
/// left out here.
fn shape(screen: &Screen) -> DataNode {
    let mut out = IndexMap::new();
    match &screen.kind {
        ScreenKind::ItemList(items) | ScreenKind::Dialog(items) => {
            for item in items.iter().filter(|i| i.navigate_to.is_none()) {
                out.insert(item.name.clone(), shape_item(item));
            }
        }
        ScreenKind::CardList(cards) => {
            for card in cards.iter().filter(|c| c.navigate_to.is_none()) {
                out.insert(card.name.clone(), shape_card(card));
            }
        }
    }
    DataNode::Map(out)
}

fn shape_item(item: &Item) -> DataNode {
    match &item.value {
        Some(value) => DataNode::Value(value.clone()),
        None => DataNode::Null,
    }
}

fn shape_card(card: &Card) -> DataNode {
    DataNode::Map(
        card.items
            .iter()
            .filter(|i| i.navigate_to.is_none())
            .map(|i| (i.name.clone(), shape_item(i)))
            .collect(),
    )
}
