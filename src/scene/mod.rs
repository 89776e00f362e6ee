//! Façade contract over the external visualization engine.
//!
//! The engine itself (rendering, structure parsing, camera) is an opaque
//! collaborator; this module defines the narrow slice of it the
//! synchronizer drives. Scene mutations are described as [`SceneOp`]
//! values and submitted in ordered batches through
//! [`SceneEngine::run_atomic`], so a whole rebuild either lands or leaves
//! the previous scene recoverable.

pub mod memory;

pub use memory::MemoryEngine;

use crate::error::EngineError;
use crate::source::StructureData;
use crate::state::ReprStyle;

/// Opaque handle to a component attached to the active structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentRef(pub u32);

/// Named atom subsets a structure can be partitioned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Protein / nucleic acid chains.
    Polymer,
    /// Ligands, cofactors and other hetero atoms.
    Ligand,
    /// Solvent water.
    Water,
}

/// Resolved color input for one representation.
///
/// By the time a color reaches the adapter, a `uniform` mode has already
/// been turned into an explicit packed value; named schemes carry no
/// extra parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpec {
    /// Distinct color per chain.
    ChainId,
    /// CPK element colors.
    ElementSymbol,
    /// Color by residue name.
    ResidueName,
    /// Color by hydrophobicity.
    Hydrophobicity,
    /// Explicit `0xRRGGBB` value.
    Uniform(u32),
}

/// Geometry tuning forwarded to the engine alongside a representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeParams {
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Atom/bond size multiplier; `None` means engine default.
    pub size_factor: Option<f32>,
}

impl Default for TypeParams {
    fn default() -> Self {
        Self { alpha: 1.0, size_factor: None }
    }
}

/// A rendering style plus color scheme to bind to one component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Representation {
    /// Rendering style.
    pub style: ReprStyle,
    /// Resolved color input.
    pub color: ColorSpec,
    /// Geometry tuning.
    pub params: TypeParams,
}

/// One scene mutation inside an atomic transaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneOp {
    /// Detach an existing component and everything bound to it.
    Remove(ComponentRef),
    /// Create the named subset of the active structure. A structure with
    /// no atoms of that kind produces no component; that is not an error.
    CreateSubset(ComponentKind),
    /// Attach a representation to the subset created by the nearest
    /// preceding [`SceneOp::CreateSubset`]. Skipped when that subset was
    /// absent.
    AddRepresentation(Representation),
}

/// The subset of the external engine's capability the synchronizer needs.
///
/// All operations surface typed errors rather than panicking; a failed
/// transaction must leave the prior scene recoverable (the synchronizer
/// always retries from a fresh remove-everything prefix).
pub trait SceneEngine {
    /// Identifier of the structure currently resident, if any.
    fn active_structure(&self) -> Option<String>;

    /// Components currently attached to the active structure. Empty when
    /// no structure is loaded.
    fn components(&self) -> Vec<ComponentRef>;

    /// Execute `ops` in order as a single transaction. On failure the
    /// scene must not reflect a partial prefix of `ops`.
    fn run_atomic(&mut self, ops: &[SceneOp]) -> Result<(), EngineError>;

    /// Load a structure, replacing any current one. Covers the engine's
    /// clear / parse / preset sequence as one opaque step; completion is
    /// a precondition for synchronization.
    fn load_structure(
        &mut self,
        data: &StructureData,
    ) -> Result<(), EngineError>;
}
