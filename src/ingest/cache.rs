use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::error::StoreError;
use crate::schema::tables::{ABILITIES, EGG_GROUPS, MOVES, TYPES};
use crate::schema::TableSchema;
use crate::store::{OnConflict, Record, Store};

/// Reference entities deduplicated by natural key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Type,
    Move,
    Ability,
    EggGroup,
}

impl EntityKind {
    pub fn table(self) -> &'static TableSchema {
        match self {
            EntityKind::Type => &TYPES,
            EntityKind::Move => &MOVES,
            EntityKind::Ability => &ABILITIES,
            EntityKind::EggGroup => &EGG_GROUPS,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table().name)
    }
}

/// Per-run resolve-or-create memo for reference rows.
///
/// For a fixed `(kind, key)` the loader runs at most once and at most one row
/// is inserted per run. Check-then-insert is only sound with a single writer.
#[derive(Debug, Default)]
pub struct EntityCache {
    ids: HashMap<(EntityKind, String), i64>,
    loads: HashMap<EntityKind, usize>,
}

impl EntityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing id from the store, then from this run's memo
    pub fn lookup(
        &self,
        store: &Store,
        kind: EntityKind,
        key: &str,
    ) -> Result<Option<i64>, StoreError> {
        if let Some(id) = store.find_id_by_key(kind.table(), key)? {
            return Ok(Some(id));
        }
        Ok(self.ids.get(&(kind, key.to_string())).copied())
    }

    /// Return the id for `key`, loading and inserting the row on first sight.
    ///
    /// The natural key column of the loaded record is overwritten with `key`
    /// so later lookups always hit.
    pub fn resolve<E, F>(
        &mut self,
        store: &Store,
        kind: EntityKind,
        key: &str,
        load: F,
    ) -> Result<i64, E>
    where
        E: From<StoreError>,
        F: FnOnce() -> Result<Record, E>,
    {
        if let Some(id) = self.lookup(store, kind, key)? {
            return Ok(id);
        }

        *self.loads.entry(kind).or_default() += 1;
        let mut record = load()?;
        if let Some(column) = kind.table().natural_key {
            record = record.with(column, key);
        }

        let id = store.insert(kind.table(), &record, OnConflict::Fail)?;
        self.ids.insert((kind, key.to_string()), id);
        debug!(kind = %kind, key, id, "created reference row");
        Ok(id)
    }

    /// How many times a loader ran for `kind` this run
    pub fn loads(&self, kind: EntityKind) -> usize {
        self.loads.get(&kind).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Forget everything; called when the store is cleared
    pub fn reset(&mut self) {
        self.ids.clear();
        self.loads.clear();
    }
}
