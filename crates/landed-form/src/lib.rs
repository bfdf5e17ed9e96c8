//! # landed-form: Policy Form Adapter
//!
//! Connects the pure calculations of `landed-core` to a form host: the
//! host reports edits, this crate decides what to recalculate and tells
//! the host what to redisplay.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  host edit ───► PolicyForm::set_* / add_* / remove_*  (validate, write) │
//! │                          │                                              │
//! │  edit script ──► apply(FormCommand)                                     │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                  dispatch(FormEvent)          trigger table (events)    │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                  landed_core::recalc          arithmetic                │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                  RefreshSink::refresh         host redraws              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`form`] - `PolicyForm`, setters and grid operations
//! - [`events`] - The trigger table
//! - [`command`] - Scripted edits
//! - [`sink`] - Refresh sinks
//! - [`error`] - Form error types

pub mod command;
pub mod error;
pub mod events;
pub mod form;
pub mod sink;

pub use command::{parse_script, FormCommand};
pub use error::{FormError, FormResult};
pub use events::{CostField, FormEvent, ItemField};
pub use form::{CostInput, ItemInput, PolicyForm};
pub use sink::{NoopSink, RecordingSink, RefreshSink, TracingSink};
