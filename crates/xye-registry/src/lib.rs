//! Entity registry for one compilation run
//!
//! The registry tracks every identifier declared by a document together with
//! its kind, and resolves references against those declarations. It lives
//! for exactly one compilation run; concurrent runs each use their own
//! instance and share nothing.
//!
//! Declarations may arrive in any order relative to references. A reference
//! is resolved in an explicit resolution pass: [`EntityRegistry::resolve`]
//! waits until the identifier is declared (possibly by another
//! configuration unit of the same run) or until the registry is sealed,
//! at which point missing identifiers become hard errors.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, trace};
use xye_core::{EntityHandle, EntityKind, Identifier, IdentifierError};

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors that can occur when declaring or resolving entities
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate identifier '{id}'")]
    DuplicateIdentifier { id: Identifier },

    #[error("unresolved reference '{id}' (no {kind} with that identifier was declared)")]
    UnresolvedReference { id: Identifier, kind: EntityKind },

    #[error("reference '{id}' expected a {expected}, found a {found}")]
    KindMismatch {
        id: Identifier,
        expected: EntityKind,
        found: EntityKind,
    },

    #[error("registry is sealed; cannot declare '{id}'")]
    RegistryClosed { id: Identifier },

    #[error("invalid identifier: {source}")]
    InvalidIdentifier {
        #[from]
        source: IdentifierError,
    },
}

/// Tracks declared identifiers and resolves references for one run
///
/// Identifiers are unique across the whole run regardless of kind: a sensor
/// and a device can never share a name. Generated identifiers use a
/// per-prefix counter, so repeated compilations of the same document produce
/// the same names.
pub struct EntityRegistry {
    entries: DashMap<Identifier, EntityKind>,
    counters: DashMap<String, u64>,
    sealed: AtomicBool,
    revision: watch::Sender<u64>,
}

impl EntityRegistry {
    /// Create an empty, unsealed registry
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            entries: DashMap::new(),
            counters: DashMap::new(),
            sealed: AtomicBool::new(false),
            revision,
        }
    }

    /// Declare an identifier with its kind
    pub fn declare(&self, id: Identifier, kind: EntityKind) -> RegistryResult<EntityHandle> {
        if self.is_sealed() {
            return Err(RegistryError::RegistryClosed { id });
        }
        match self.entries.entry(id.clone()) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateIdentifier { id }),
            Entry::Vacant(vacant) => {
                vacant.insert(kind);
                trace!(id = %id, kind = %kind, "declared entity");
                self.revision.send_modify(|n| *n += 1);
                Ok(EntityHandle::new(id, kind))
            }
        }
    }

    /// Synthesize, declare, and return a fresh identifier
    ///
    /// The name is `{prefix}_{n}` with a per-prefix counter. Counters skip
    /// over names the document declared explicitly.
    pub fn generate(&self, prefix: &str, kind: EntityKind) -> RegistryResult<Identifier> {
        loop {
            let n = {
                let mut counter = self.counters.entry(prefix.to_string()).or_insert(0);
                *counter += 1;
                *counter
            };
            let candidate = Identifier::new(format!("{}_{}", prefix, n))?;
            match self.declare(candidate.clone(), kind) {
                Ok(_) => {
                    debug!(id = %candidate, kind = %kind, "generated identifier");
                    return Ok(candidate);
                }
                Err(RegistryError::DuplicateIdentifier { .. }) => continue,
                Err(err) => return Err(err),
            }
        }
    }

    /// Resolve a reference against the current declarations, without waiting
    pub fn try_resolve(&self, id: &Identifier, kind: EntityKind) -> RegistryResult<EntityHandle> {
        match self.entries.get(id) {
            Some(entry) => {
                let found = *entry.value();
                if found == kind {
                    Ok(EntityHandle::new(id.clone(), kind))
                } else {
                    Err(RegistryError::KindMismatch {
                        id: id.clone(),
                        expected: kind,
                        found,
                    })
                }
            }
            None => Err(RegistryError::UnresolvedReference {
                id: id.clone(),
                kind,
            }),
        }
    }

    /// Resolve a reference, waiting for the declaration if necessary
    ///
    /// While the registry is unsealed a missing identifier may still be
    /// declared by another unit, so the call waits. After [`seal`] missing
    /// identifiers fail immediately. Retrying is side-effect-free.
    ///
    /// [`seal`]: EntityRegistry::seal
    pub async fn resolve(&self, id: &Identifier, kind: EntityKind) -> RegistryResult<EntityHandle> {
        let mut rx = self.revision.subscribe();
        loop {
            match self.try_resolve(id, kind) {
                Err(RegistryError::UnresolvedReference { .. }) if !self.is_sealed() => {
                    // Wakes on the next declare or seal. A closed channel
                    // means the registry is gone, so give up.
                    if rx.changed().await.is_err() {
                        return Err(RegistryError::UnresolvedReference {
                            id: id.clone(),
                            kind,
                        });
                    }
                }
                resolved => return resolved,
            }
        }
    }

    /// Mark the declaration phase finished and wake all waiting resolvers
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
        self.revision.send_modify(|n| *n += 1);
        debug!(entities = self.entries.len(), "sealed registry");
    }

    /// Whether the declaration phase has finished
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// Whether an identifier is declared, regardless of kind
    pub fn contains(&self, id: &Identifier) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of declared entities
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been declared yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
