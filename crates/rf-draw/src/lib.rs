//! # rf-draw — Name-draw engine for the prize wheel
//!
//! Owns the candidate pools, picks a winner (priority pool first, uniform
//! within the active pool), lays out the reel entries that spin down onto
//! that winner, and sequences the spin lifecycle with caller-supplied hooks.
//!
//! ## Architecture
//!
//! ```text
//! NameDrawEngine<H: SpinHooks>
//!     │
//!     ├── PoolManager (names, priority names, removal policy)
//!     ├── CadenceConfig (decelerating gap timing)
//!     └── SpinState (Idle | Spinning(ActiveSpin))
//!           │
//!           v
//!     step() → SpinStep::Advance … SpinStep::Finished(SpinOutcome)
//!           │
//!           v
//!     SpinDriver (tokio sleeps between steps)
//! ```
//!
//! Rendering, audio, persistence and prize images live outside this crate.

pub mod cadence;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod names;
pub mod pool;
pub mod reel;
pub mod stage;

pub use cadence::*;
pub use config::*;
pub use driver::*;
pub use engine::*;
pub use error::*;
pub use hooks::*;
pub use names::*;
pub use pool::*;
pub use reel::*;
pub use stage::*;
