//! Entity registry - Identity-keyed arena storage
//!
//! Entities live in a dense `Vec`; a map translates wire ids to slots.
//! The wire format never deletes, so a registry only grows for the
//! lifetime of a session.

mod records;

pub use records::*;

use std::collections::HashMap;
use tokio::io::AsyncRead;

use crate::model::EntityKind;
use crate::protocol::{CodecError, CodecResult, Slot, WireReader};

/// A value stored in a registry
pub trait Entity {
    const KIND: EntityKind;

    fn id(&self) -> i64;
}

/// Result of inserting a full record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
}

/// What a decoded entity slot did to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    Absent,
    Referenced(i64),
    Created(i64),
    Updated(i64),
}

/// Arena of entities keyed by wire id
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entities: Vec<T>,
    index: HashMap<i64, usize>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Entity> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.index.get(&id).map(|&slot| &self.entities[slot])
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        match self.index.get(&id) {
            Some(&slot) => Some(&mut self.entities[slot]),
            None => None,
        }
    }

    /// Look up an id that the stream claims already exists
    pub fn require(&self, id: i64) -> CodecResult<&T> {
        self.get(id).ok_or(CodecError::UnknownEntity { kind: T::KIND, id })
    }

    /// Entities in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entities.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.entities.iter().map(Entity::id)
    }

    /// Insert a new entity or overwrite the stored one with the same id
    pub fn upsert(&mut self, entity: T) -> Upsert {
        let id = entity.id();
        match self.index.get(&id) {
            Some(&slot) => {
                self.entities[slot] = entity;
                Upsert::Updated
            }
            None => {
                self.index.insert(id, self.entities.len());
                self.entities.push(entity);
                Upsert::Created
            }
        }
    }

    /// Mutate an existing entity. Never creates one.
    pub fn update<F>(&mut self, id: i64, apply: F) -> CodecResult<()>
    where
        F: FnOnce(&mut T),
    {
        let entity = self
            .get_mut(id)
            .ok_or(CodecError::UnknownEntity { kind: T::KIND, id })?;
        apply(entity);
        Ok(())
    }

    /// Drop everything (new session)
    pub fn clear(&mut self) {
        self.entities.clear();
        self.index.clear();
    }
}

impl<'a, T: Entity> IntoIterator for &'a Registry<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

/// Decode one discriminated slot and apply it to the registry.
///
/// Absent slots do nothing. Reference slots must name a known id and leave it
/// untouched. Full records are decoded completely before the registry is
/// touched, so a failure mid-record leaves the stored entity as it was.
pub async fn read_slot<T, R>(
    reader: &mut WireReader<R>,
    registry: &mut Registry<T>,
) -> CodecResult<SlotOutcome>
where
    T: Record,
    R: AsyncRead + Unpin + Send,
{
    match Slot::read(reader).await? {
        Slot::Absent => Ok(SlotOutcome::Absent),
        Slot::Reference(id) => {
            registry.require(id)?;
            Ok(SlotOutcome::Referenced(id))
        }
        Slot::Present(id) => {
            let record = T::read_body(id, reader).await?;
            tracing::trace!("Decoded {} {}", T::KIND, id);

            Ok(match registry.upsert(record) {
                Upsert::Created => SlotOutcome::Created(id),
                Upsert::Updated => SlotOutcome::Updated(id),
            })
        }
    }
}

/// Decode a count-prefixed batch of slots
pub async fn read_batch<T, R>(
    reader: &mut WireReader<R>,
    registry: &mut Registry<T>,
) -> CodecResult<Vec<SlotOutcome>>
where
    T: Record,
    R: AsyncRead + Unpin + Send,
{
    // Non-positive counts mean an empty batch
    let count = reader.read_i32().await?.max(0) as usize;
    let mut outcomes = Vec::with_capacity(count.min(1024));

    for _ in 0..count {
        outcomes.push(read_slot(reader, registry).await?);
    }
    Ok(outcomes)
}
