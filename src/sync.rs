//! Rebuilds the engine scene from the authoritative view state.
//!
//! The synchronizer does not diff: every run removes everything attached
//! to the active structure and recreates it from the current
//! [`ViewState`], all inside one atomic transaction. That makes repeated
//! runs idempotent (no accumulated duplicate representations) and keeps
//! polymer, ligand and water representations independent of each other.
//! On failure the logical state is untouched; the visuals lag until the
//! next successful run rebuilds them.

use crate::error::EngineError;
use crate::scene::{
    ColorSpec, ComponentKind, Representation, SceneEngine, SceneOp,
    TypeParams,
};
use crate::state::{ColorMode, ReprStyle, ViewState};

/// Fixed tint for solvent water.
pub const WATER_TINT: u32 = 0x004f_c3f7;
/// Water opacity.
const WATER_ALPHA: f32 = 0.3;
/// Water atom/bond scale.
const WATER_SIZE_FACTOR: f32 = 0.1;
/// Ligand atom/bond scale.
const LIGAND_SIZE_FACTOR: f32 = 0.3;

/// Rebuild the scene so it visually represents `state`.
///
/// With no structure loaded this is a successful no-op; the adapter is
/// not called beyond the structure check. Errors come only from the
/// engine's transaction and leave `state` authoritative for the next
/// attempt.
pub fn synchronize(
    engine: &mut dyn SceneEngine,
    state: &ViewState,
) -> Result<(), EngineError> {
    let Some(id) = engine.active_structure() else {
        log::debug!("no structure loaded, skipping visual sync");
        return Ok(());
    };

    let mut ops = Vec::new();

    // Remove every existing component first so a prior style can never
    // leave stale representations behind.
    for handle in engine.components() {
        ops.push(SceneOp::Remove(handle));
    }

    ops.push(SceneOp::CreateSubset(ComponentKind::Polymer));
    ops.push(SceneOp::AddRepresentation(Representation {
        style: state.style,
        color: polymer_color(state),
        params: TypeParams { alpha: 1.0, size_factor: None },
    }));

    // Ligands keep a fixed ball-and-stick/element look regardless of the
    // polymer style.
    if state.show_hetero {
        ops.push(SceneOp::CreateSubset(ComponentKind::Ligand));
        ops.push(SceneOp::AddRepresentation(Representation {
            style: ReprStyle::BallAndStick,
            color: ColorSpec::ElementSymbol,
            params: TypeParams {
                alpha: 1.0,
                size_factor: Some(LIGAND_SIZE_FACTOR),
            },
        }));
    }

    // Water is faint, small and uniformly tinted.
    if state.show_water {
        ops.push(SceneOp::CreateSubset(ComponentKind::Water));
        ops.push(SceneOp::AddRepresentation(Representation {
            style: ReprStyle::BallAndStick,
            color: ColorSpec::Uniform(WATER_TINT),
            params: TypeParams {
                alpha: WATER_ALPHA,
                size_factor: Some(WATER_SIZE_FACTOR),
            },
        }));
    }

    log::debug!("syncing {id}: {} ops", ops.len());
    engine.run_atomic(&ops)
}

/// Resolve the polymer color input from the state's mode and tint.
fn polymer_color(state: &ViewState) -> ColorSpec {
    match state.color_mode {
        ColorMode::ChainId => ColorSpec::ChainId,
        ColorMode::ElementSymbol => ColorSpec::ElementSymbol,
        ColorMode::ResidueName => ColorSpec::ResidueName,
        ColorMode::Hydrophobicity => ColorSpec::Hydrophobicity,
        ColorMode::Uniform => ColorSpec::Uniform(state.tint.value()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::MemoryEngine;
    use crate::state::Tint;

    fn full_engine() -> MemoryEngine {
        MemoryEngine::with_structure(
            "4HHB",
            &[
                ComponentKind::Polymer,
                ComponentKind::Ligand,
                ComponentKind::Water,
            ],
        )
    }

    #[test]
    fn no_structure_is_a_successful_noop() {
        let mut engine = MemoryEngine::new();
        synchronize(&mut engine, &ViewState::default()).unwrap();
        assert_eq!(engine.transactions(), 0);
        assert!(engine.scene().is_empty());
    }

    #[test]
    fn default_state_builds_polymer_and_ligand_only() {
        let mut engine = full_engine();
        synchronize(&mut engine, &ViewState::default()).unwrap();

        let polymer = engine.components_of(ComponentKind::Polymer);
        assert_eq!(polymer.len(), 1);
        assert_eq!(polymer[0].representations.len(), 1);
        assert_eq!(polymer[0].representations[0].style, ReprStyle::Cartoon);
        assert_eq!(
            polymer[0].representations[0].color,
            ColorSpec::ChainId
        );

        let ligand = engine.components_of(ComponentKind::Ligand);
        assert_eq!(ligand.len(), 1);
        assert_eq!(
            ligand[0].representations[0].style,
            ReprStyle::BallAndStick
        );
        assert_eq!(
            ligand[0].representations[0].color,
            ColorSpec::ElementSymbol
        );

        assert!(engine.components_of(ComponentKind::Water).is_empty());
    }

    #[test]
    fn repeated_sync_is_idempotent() {
        let mut engine = full_engine();
        let state = ViewState { show_water: true, ..ViewState::default() };

        synchronize(&mut engine, &state).unwrap();
        synchronize(&mut engine, &state).unwrap();
        synchronize(&mut engine, &state).unwrap();

        for kind in [
            ComponentKind::Polymer,
            ComponentKind::Ligand,
            ComponentKind::Water,
        ] {
            let comps = engine.components_of(kind);
            assert_eq!(comps.len(), 1, "duplicate {kind:?} component");
            assert_eq!(
                comps[0].representations.len(),
                1,
                "duplicate {kind:?} representation"
            );
        }
    }

    #[test]
    fn water_toggle_leaves_polymer_and_ligand_unchanged() {
        let mut engine = full_engine();
        let mut state = ViewState {
            style: ReprStyle::Surface,
            ..ViewState::default()
        };
        synchronize(&mut engine, &state).unwrap();
        let polymer_before =
            engine.components_of(ComponentKind::Polymer)[0]
                .representations
                .clone();
        let ligand_before = engine.components_of(ComponentKind::Ligand)[0]
            .representations
            .clone();

        state.show_water = true;
        synchronize(&mut engine, &state).unwrap();

        assert_eq!(
            engine.components_of(ComponentKind::Polymer)[0].representations,
            polymer_before
        );
        assert_eq!(
            engine.components_of(ComponentKind::Ligand)[0].representations,
            ligand_before
        );
        assert_eq!(engine.components_of(ComponentKind::Water).len(), 1);

        state.show_water = false;
        synchronize(&mut engine, &state).unwrap();
        assert!(engine.components_of(ComponentKind::Water).is_empty());
        assert_eq!(
            engine.components_of(ComponentKind::Polymer)[0].representations,
            polymer_before
        );
    }

    #[test]
    fn uniform_mode_resolves_tint_to_packed_value() {
        let mut engine = full_engine();
        let state = ViewState {
            color_mode: ColorMode::Uniform,
            tint: "#4f46e5".parse::<Tint>().unwrap(),
            ..ViewState::default()
        };
        synchronize(&mut engine, &state).unwrap();

        let polymer = engine.components_of(ComponentKind::Polymer);
        assert_eq!(
            polymer[0].representations[0].color,
            ColorSpec::Uniform(0x004f_46e5)
        );
    }

    #[test]
    fn missing_water_subset_is_not_an_error() {
        let mut engine = MemoryEngine::with_structure(
            "1ABC",
            &[ComponentKind::Polymer],
        );
        let state = ViewState { show_water: true, ..ViewState::default() };
        synchronize(&mut engine, &state).unwrap();

        assert_eq!(engine.components_of(ComponentKind::Polymer).len(), 1);
        assert!(engine.components_of(ComponentKind::Water).is_empty());
        assert!(engine.components_of(ComponentKind::Ligand).is_empty());
    }

    #[test]
    fn failed_transaction_keeps_previous_scene() {
        let mut engine = full_engine();
        let state = ViewState::default();
        synchronize(&mut engine, &state).unwrap();
        let before = engine.scene().to_vec();

        engine.fail_next_transaction();
        let next = ViewState {
            style: ReprStyle::Spacefill,
            ..ViewState::default()
        };
        assert!(synchronize(&mut engine, &next).is_err());
        assert_eq!(engine.scene(), before.as_slice());

        // A later run recovers from a fresh remove-everything prefix
        synchronize(&mut engine, &next).unwrap();
        let polymer = engine.components_of(ComponentKind::Polymer);
        assert_eq!(polymer.len(), 1);
        assert_eq!(polymer[0].representations[0].style, ReprStyle::Spacefill);
    }
}
