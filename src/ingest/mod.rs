//! Catalog-to-store ingestion.
//!
//! A [`Session`] bundles everything one run needs: the store, the fetcher,
//! the entity cache and the run report. Each ingestor is a method on it, so
//! the cache is always the one the orchestrator constructed.

pub mod abilities;
pub mod cache;
pub mod chain;
pub mod encounters;
pub mod moves;
pub mod report;
pub mod species;
pub mod text;

use serde_json::Value;

use crate::catalog::models::{AbilityPayload, MovePayload, NamedResource, TypePayload};
use crate::catalog::{Endpoints, Fetcher, Transport};
use crate::config::Limits;
use crate::error::IngestError;
use crate::schema::tables::TYPES;
use crate::store::{Record, Store};

pub use cache::{EntityCache, EntityKind};
pub use report::{Outcome, RunReport, UnitKind, UnitReport};
pub use species::GenderRatio;

pub struct Session<T> {
    pub store: Store,
    pub fetcher: Fetcher<T>,
    pub endpoints: Endpoints,
    pub limits: Limits,
    pub cache: EntityCache,
    pub report: RunReport,
}

impl<T: Transport> Session<T> {
    pub fn new(
        store: Store,
        fetcher: Fetcher<T>,
        endpoints: Endpoints,
        limits: Limits,
        cache: EntityCache,
    ) -> Self {
        Self {
            store,
            fetcher,
            endpoints,
            limits,
            cache,
            report: RunReport::new(),
        }
    }

    pub fn resolve_type(&mut self, name: &str, url: &str) -> Result<i64, IngestError> {
        let Self {
            store,
            fetcher,
            cache,
            ..
        } = self;
        cache.resolve(store, EntityKind::Type, name, || {
            let payload: TypePayload = fetcher.get_json(url)?;
            Ok(type_record(&payload))
        })
    }

    /// Resolve a move; its type is looked up among the already-seeded types
    pub fn resolve_move(&mut self, name: &str, url: &str) -> Result<i64, IngestError> {
        let Self {
            store,
            fetcher,
            cache,
            ..
        } = self;
        let store: &Store = store;
        cache.resolve(store, EntityKind::Move, name, || {
            let payload: MovePayload = fetcher.get_json(url)?;
            let type_id = match &payload.kind {
                Some(kind) => store.find_id_by_key(&TYPES, &kind.name)?,
                None => None,
            };
            Ok(move_record(&payload, type_id))
        })
    }

    pub fn resolve_ability(&mut self, name: &str, url: &str) -> Result<i64, IngestError> {
        let Self {
            store,
            fetcher,
            cache,
            ..
        } = self;
        cache.resolve(store, EntityKind::Ability, name, || {
            let payload: AbilityPayload = fetcher.get_json(url)?;
            Ok(ability_record(&payload))
        })
    }

    /// Egg groups carry nothing but their name, so no fetch is needed
    pub fn resolve_egg_group(&mut self, name: &str) -> Result<i64, IngestError> {
        self.cache
            .resolve(&self.store, EntityKind::EggGroup, name, || {
                Ok::<_, IngestError>(Record::new())
            })
    }
}

fn names(resources: &[NamedResource]) -> Value {
    Value::Array(
        resources
            .iter()
            .map(|r| Value::String(r.name.clone()))
            .collect(),
    )
}

pub fn type_record(payload: &TypePayload) -> Record {
    let relations = &payload.damage_relations;
    Record::new()
        .with("name", payload.name.as_str())
        .with("double_damage_from", names(&relations.double_damage_from))
        .with("double_damage_to", names(&relations.double_damage_to))
        .with("half_damage_from", names(&relations.half_damage_from))
        .with("half_damage_to", names(&relations.half_damage_to))
        .with("no_damage_from", names(&relations.no_damage_from))
        .with("no_damage_to", names(&relations.no_damage_to))
}

pub fn move_record(payload: &MovePayload, type_id: Option<i64>) -> Record {
    let (effect, short_effect) = text::english_effect(&payload.effect_entries);
    Record::new()
        .with("name", payload.name.as_str())
        .with("type_id", type_id)
        .with("power", payload.power)
        .with("accuracy", payload.accuracy)
        .with("pp", payload.pp)
        .with("priority", payload.priority.unwrap_or(0))
        .with("damage_class", payload.damage_class.as_ref().map(|d| d.name.as_str()))
        .with("target", payload.target.as_ref().map(|t| t.name.as_str()))
        .with("effect", effect)
        .with("short_effect", short_effect)
}

pub fn ability_record(payload: &AbilityPayload) -> Record {
    let (effect, short_effect) = text::english_effect(&payload.effect_entries);
    Record::new()
        .with("name", payload.name.as_str())
        .with("effect", effect)
        .with("short_effect", short_effect)
}
