//! # Core Application Logic
//!
//! The country browser's view-model. It knows nothing about any
//! specific UI technology or about HTTP.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (view-model)   │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • filter / sort        │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!                    ┌───────────┴─────────────┐
//!                    ▼                         ▼
//!             ┌────────────┐            ┌────────────┐
//!             │    TUI     │            │    API     │
//!             │  Adapter   │            │  (reqwest) │
//!             │ (ratatui)  │            │            │
//!             └────────────┘            └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all view state in one place
//! - [`action`]: The `Action` enum and `update()`
//! - [`filter`]: Search and population sorting
//! - [`config`]: Settings resolution

pub mod action;
pub mod config;
pub mod filter;
pub mod state;
