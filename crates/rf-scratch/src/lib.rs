//! # rf-scratch: Constrained-Outcome Scratch Card Simulation
//!
//! Produces scratch card outcomes that satisfy a target win criterion by
//! rejection sampling: a trial is played, checked against its distribution
//! and replayed from scratch until accepted or until the retry budget runs
//! out.
//!
//! ## Features
//!
//! - **Weighted Sampling**: Symbol draws from validated weight tables
//! - **Grid Generation**: Fixed rows × columns scratch grids
//! - **Win Evaluation**: Match-count paytable with stake and bonus multiplier
//! - **Bonus Rounds**: Fixed-length free round sub-loop with its own weights
//! - **Distributions**: Per bet mode win criteria (zero, win cap, any, exact)
//! - **Trial Books**: Ordered, indexed event records of the accepted attempt
//!
//! ## Architecture
//!
//! ```text
//! ScratchEngine (Arc<GameConfig>, Arc<dyn TrialPolicy>, Arc<dyn TrialObserver>)
//!     │
//!     ├── BetMode → Distribution (criteria, conditions)
//!     │
//!     └── attempt loop ──────────────────────────────┐
//!           │                                        │ rejected
//!           ├── Grid::generate (WeightTable)         │
//!           ├── PayTable::evaluate                   │
//!           ├── decide_trigger → BonusLoop           │
//!           └── TrialPolicy::repeat_required ────────┘
//!                 │ accepted / budget exhausted
//!                 v
//!           TrialBook → Vec<IndexedEvent>
//! ```

pub mod bonus;
pub mod book;
pub mod config;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod events;
pub mod grid;
pub mod observer;
pub mod paytable;
pub mod policy;
pub mod state;
pub mod symbols;
pub mod weights;
pub mod wins;

pub use bonus::*;
pub use book::*;
pub use config::*;
pub use distribution::*;
pub use engine::*;
pub use error::*;
pub use events::*;
pub use grid::*;
pub use observer::*;
pub use paytable::*;
pub use policy::*;
pub use state::*;
pub use symbols::*;
pub use weights::*;
pub use wins::*;
