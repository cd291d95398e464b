//! Change tracking for fleet entities
//!
//! Every create, update and delete of a tracked entity (vehicle, note,
//! maintenance) ends up as one immutable [`ChangeRecord`] in an append-only
//! ledger.
//!
//! # Architecture
//!
//! - [`DiffEngine`]: turns a raw change argument into the stored payload,
//!   resolving bare update values against live state via an
//!   [`EntityResolver`].
//! - [`ChangeLedger`]: append, query and clear records. [`JsonlLedger`] is
//!   the on-disk implementation.
//! - [`AuditRecorder`]: runs the two for a mutation and reports an
//!   [`AuditOutcome`] instead of failing it.
//!
//! # Example
//!
//! ```rust,ignore
//! use fleet::audit::{ActionKind, EntityType};
//! use serde_json::json;
//!
//! let recorder = storage.recorder();
//! let prepared = recorder.prepare(ActionKind::Update, EntityType::Note, 4, json!({"content": "new text"}));
//! storage.notes.upsert(note)?;
//! storage.notes.save()?;
//! let outcome = recorder.commit(actor, prepared);
//! ```

mod diff;
mod entry;
mod error;
mod ledger;
mod recorder;
mod resolver;
mod view;

pub use diff::{change_pair, field_changes, is_change_pair, summarize_changes, values_equal, DiffEngine, DiffResult};
pub use entry::{ActionKind, ChangeRecord, EntityType, NewChangeRecord};
pub use error::AuditError;
pub use ledger::{sort_newest_first, ChangeLedger, ClearScope, HistoryFilter, JsonlLedger, MemoryLedger};
pub use recorder::{AuditOutcome, AuditRecorder, Audited, PreparedChange};
pub use resolver::{ActorDirectory, EntityResolver};
pub use view::HistoryEntryView;
