//! Session slice: who is logged in.
//!
//! # State machine
//!
//! ```text
//! Anonymous ──Login──▶ Authenticating ──LoginSucceeded──▶ Authenticated
//!     ▲                      │                                 │  │
//!     │                 LoginFailed                 UpdateUser │  │ Logout
//!     └──────────────────────┴─────────────────────────────────┼──┘
//!                                                              ▼
//!                                                        Authenticated
//! ```
//!
//! `Init` restores a persisted session by synthesizing `LoginSucceeded`
//! without touching the network.

pub mod actions;
pub mod effects;
pub mod profile;
pub mod reducer;
pub mod registration;
pub mod selectors;
pub mod state;

pub use actions::SessionAction;
pub use reducer::SessionReducer;
pub use state::SessionState;
