//! Glue between a mutation and the ledger.
//!
//! A mutating service either calls [`AuditRecorder::record`] after its
//! commit, or, when the diff depends on the state before the commit, calls
//! [`AuditRecorder::prepare`] first and [`AuditRecorder::commit`] after.
//! Neither ever fails the mutation: problems come back as
//! [`AuditOutcome::LoggedButFailed`].

use serde_json::Value;
use tracing::{debug, warn};

use crate::models::UserId;

use super::diff::{DiffEngine, DiffResult};
use super::entry::{ActionKind, ChangeRecord, EntityType, NewChangeRecord};
use super::error::AuditError;
use super::ledger::ChangeLedger;
use super::resolver::{ActorDirectory, EntityResolver};

/// What happened to the audit side of a mutation
#[derive(Debug, Clone, PartialEq)]
pub enum AuditOutcome {
    Recorded(ChangeRecord),
    /// Update with nothing to record
    Unchanged,
    /// The mutation stands but no record was written
    LoggedButFailed(AuditError),
}

impl AuditOutcome {
    pub fn record(&self) -> Option<&ChangeRecord> {
        match self {
            AuditOutcome::Recorded(record) => Some(record),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&AuditError> {
        match self {
            AuditOutcome::LoggedButFailed(error) => Some(error),
            _ => None,
        }
    }

    pub fn is_recorded(&self) -> bool {
        matches!(self, AuditOutcome::Recorded(_))
    }
}

/// Result of a mutating service call plus its audit outcome
#[derive(Debug, Clone, PartialEq)]
pub struct Audited<T> {
    pub value: T,
    pub audit: AuditOutcome,
}

impl<T> Audited<T> {
    pub fn new(value: T, audit: AuditOutcome) -> Self {
        Self { value, audit }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Audited<U> {
        Audited {
            value: f(self.value),
            audit: self.audit,
        }
    }
}

/// A normalized change waiting for the primary commit
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedChange {
    pub action: ActionKind,
    pub entity_type: EntityType,
    pub entity_id: u64,
    pub changes: Value,
    pub issues: Vec<AuditError>,
}

impl PreparedChange {
    /// An update whose normalized payload is empty
    pub fn is_noop(&self) -> bool {
        self.action == ActionKind::Update
            && self.changes.as_object().map_or(true, |fields| fields.is_empty())
    }
}

pub struct AuditRecorder<'a> {
    ledger: &'a dyn ChangeLedger,
    resolver: &'a dyn EntityResolver,
    actors: &'a dyn ActorDirectory,
}

impl<'a> AuditRecorder<'a> {
    pub fn new(
        ledger: &'a dyn ChangeLedger,
        resolver: &'a dyn EntityResolver,
        actors: &'a dyn ActorDirectory,
    ) -> Self {
        Self {
            ledger,
            resolver,
            actors,
        }
    }

    /// Normalize a change against the current state of the entity
    pub fn prepare(
        &self,
        action: ActionKind,
        entity_type: EntityType,
        entity_id: u64,
        changes: Value,
    ) -> PreparedChange {
        let DiffResult { changes, issues } =
            DiffEngine::new(self.resolver).normalize(action, entity_type, entity_id, changes);

        PreparedChange {
            action,
            entity_type,
            entity_id,
            changes,
            issues,
        }
    }

    /// Append a prepared change on behalf of `actor`
    pub fn commit(&self, actor: UserId, prepared: PreparedChange) -> AuditOutcome {
        if prepared.is_noop() {
            // Nothing to write, but a rejected payload or failed lookup still counts
            if let Some(issue) = prepared.issues.first() {
                return AuditOutcome::LoggedButFailed(issue.clone());
            }
            debug!(
                entity_type = %prepared.entity_type,
                entity_id = prepared.entity_id,
                "update changed nothing, no record written"
            );
            return AuditOutcome::Unchanged;
        }

        match self.actors.actor_exists(actor) {
            Ok(true) => {}
            Ok(false) => {
                warn!(actor = %actor, "unknown actor, change not recorded");
                return AuditOutcome::LoggedButFailed(AuditError::UnknownActor(actor));
            }
            Err(error) => {
                warn!(actor = %actor, %error, "actor lookup failed, change not recorded");
                return AuditOutcome::LoggedButFailed(AuditError::Storage(error.to_string()));
            }
        }

        let record = NewChangeRecord::new(
            actor,
            prepared.action,
            prepared.entity_type,
            prepared.entity_id,
            prepared.changes,
        );

        match self.ledger.append(record) {
            Ok(record) => AuditOutcome::Recorded(record),
            Err(error) => {
                warn!(
                    entity_type = %prepared.entity_type,
                    entity_id = prepared.entity_id,
                    %error,
                    "failed to append change record"
                );
                AuditOutcome::LoggedButFailed(AuditError::Storage(error.to_string()))
            }
        }
    }

    /// Prepare and commit in one go, for callers that have already committed
    pub fn record(
        &self,
        actor: UserId,
        action: ActionKind,
        entity_type: EntityType,
        entity_id: u64,
        changes: Value,
    ) -> AuditOutcome {
        let prepared = self.prepare(action, entity_type, entity_id, changes);
        self.commit(actor, prepared)
    }
}
