//! In-memory scene model implementing [`SceneEngine`].
//!
//! A stand-in engine for tests and dry-run shells: it tracks components
//! and their representations with the same all-or-nothing transaction
//! semantics a real engine guarantees, without rendering or parsing
//! anything. Which subsets a "structure" contains is configurable so
//! tests can model, say, a crystal with no ordered water.

use super::{
    ComponentKind, ComponentRef, Representation, SceneEngine, SceneOp,
};
use crate::error::EngineError;
use crate::source::StructureData;

/// One component with its attached representations.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    /// Handle the adapter hands out.
    pub handle: ComponentRef,
    /// Which subset this component is.
    pub kind: ComponentKind,
    /// Representations bound to it, in attach order.
    pub representations: Vec<Representation>,
}

/// In-memory [`SceneEngine`] implementation.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    structure: Option<String>,
    kinds: Vec<ComponentKind>,
    components: Vec<Component>,
    next_id: u32,
    transactions: usize,
    fail_next: bool,
}

impl MemoryEngine {
    /// An engine with no structure loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An engine with a structure containing the given subsets.
    #[must_use]
    pub fn with_structure(id: &str, kinds: &[ComponentKind]) -> Self {
        Self {
            structure: Some(id.to_owned()),
            kinds: kinds.to_vec(),
            ..Self::default()
        }
    }

    /// Current scene contents, in creation order.
    #[must_use]
    pub fn scene(&self) -> &[Component] {
        &self.components
    }

    /// Components of one kind.
    #[must_use]
    pub fn components_of(&self, kind: ComponentKind) -> Vec<&Component> {
        self.components.iter().filter(|c| c.kind == kind).collect()
    }

    /// How many transactions have been submitted (including failed ones).
    #[must_use]
    pub const fn transactions(&self) -> usize {
        self.transactions
    }

    /// Make the next transaction fail without mutating the scene.
    pub fn fail_next_transaction(&mut self) {
        self.fail_next = true;
    }
}

impl SceneEngine for MemoryEngine {
    fn active_structure(&self) -> Option<String> {
        self.structure.clone()
    }

    fn components(&self) -> Vec<ComponentRef> {
        self.components.iter().map(|c| c.handle).collect()
    }

    fn run_atomic(&mut self, ops: &[SceneOp]) -> Result<(), EngineError> {
        self.transactions += 1;
        if self.fail_next {
            self.fail_next = false;
            return Err(EngineError::Transaction(
                "injected failure".to_owned(),
            ));
        }

        // Apply to a scratch copy; commit only if every op succeeds.
        let mut next = self.components.clone();
        let mut next_id = self.next_id;
        let mut current: Option<usize> = None;

        for op in ops {
            match *op {
                SceneOp::Remove(handle) => {
                    let before = next.len();
                    next.retain(|c| c.handle != handle);
                    if next.len() == before {
                        return Err(EngineError::Transaction(format!(
                            "unknown component {handle:?}"
                        )));
                    }
                    current = None;
                }
                SceneOp::CreateSubset(kind) => {
                    if self.structure.is_none() {
                        return Err(EngineError::Transaction(
                            "no active structure".to_owned(),
                        ));
                    }
                    if self.kinds.contains(&kind) {
                        next.push(Component {
                            handle: ComponentRef(next_id),
                            kind,
                            representations: Vec::new(),
                        });
                        next_id += 1;
                        current = Some(next.len() - 1);
                    } else {
                        // Structure has no atoms of this kind
                        current = None;
                    }
                }
                SceneOp::AddRepresentation(repr) => {
                    if let Some(idx) = current {
                        next[idx].representations.push(repr);
                    }
                }
            }
        }

        self.components = next;
        self.next_id = next_id;
        Ok(())
    }

    fn load_structure(
        &mut self,
        data: &StructureData,
    ) -> Result<(), EngineError> {
        // No parsing here; assume all subsets are present unless the
        // engine was constructed with an explicit kind list.
        self.structure = Some(data.label.clone());
        if self.kinds.is_empty() {
            self.kinds = vec![
                ComponentKind::Polymer,
                ComponentKind::Ligand,
                ComponentKind::Water,
            ];
        }
        self.components.clear();
        Ok(())
    }
}
