// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Visualization state synchronizer and command interpreter for
//! molecular viewers.
//!
//! BioLens reconciles a small set of user-facing visual parameters —
//! representation style, color scheme, solvent/hetero visibility, a
//! custom tint — into atomic scene-rebuild transactions against an
//! external visualization engine, and maps free-text commands onto the
//! same parameters through a generative-language service whose replies
//! are strictly validated before they touch state.
//!
//! # Key entry points
//!
//! - [`session::Session`] - the orchestration context (state, busy
//!   gating, conversation log)
//! - [`sync::synchronize`] - the scene synchronizer
//! - [`interpreter::interpret`] - free-text command interpretation
//! - [`scene::SceneEngine`] - the adapter contract a real engine
//!   implements; [`scene::MemoryEngine`] is the in-memory reference
//! - [`state::ViewState`] - the authoritative visual parameters
//!
//! # Architecture
//!
//! Rendering, structure parsing and camera control belong to the
//! external engine; this crate only drives it. Every synchronizer run
//! rebuilds the whole scene from scratch inside one [`scene::SceneOp`]
//! batch, which makes runs idempotent and keeps the polymer, ligand and
//! water representations independent. Interpreter replies go through a
//! staged raw → candidate → validated pipeline so unknown fields and
//! out-of-vocabulary values are dropped, never applied.

pub mod error;
pub mod interpreter;
pub mod scene;
pub mod session;
pub mod source;
pub mod state;
pub mod sync;
