use std::collections::HashSet;
use tracing::debug;

use super::{text, Session, UnitKind};
use crate::catalog::endpoints::id_from_url;
use crate::catalog::models::{
    NamedResource, PokemonPayload, SpeciesPayload, Sprites, StatPayload,
};
use crate::catalog::Transport;
use crate::error::IngestError;
use crate::schema::tables::{POKEDEX_ENTRIES, POKEMON, POKEMON_EGG_GROUPS, POKEMON_TYPES, STATS};
use crate::store::{OnConflict, Record};

const USUM_FRONT: &str = "/generation-vii/ultra-sun-ultra-moon/front_default";
const USUM_FRONT_SHINY: &str = "/generation-vii/ultra-sun-ultra-moon/front_shiny";

/// Gender split decoded from the catalog's raw rate.
///
/// The raw value is `-1` for genderless species, otherwise the number of
/// eighths that are female.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderRatio {
    Genderless,
    Female { eighths: u8 },
}

impl GenderRatio {
    pub fn from_raw(raw: i64) -> Self {
        if raw < 0 {
            GenderRatio::Genderless
        } else {
            GenderRatio::Female {
                eighths: raw.min(8) as u8,
            }
        }
    }

    pub fn female_percent(self) -> Option<f64> {
        match self {
            GenderRatio::Genderless => None,
            GenderRatio::Female { eighths } => Some(f64::from(eighths) / 8.0 * 100.0),
        }
    }

    pub fn male_percent(self) -> Option<f64> {
        self.female_percent().map(|female| 100.0 - female)
    }

    /// Value of the `gender_rate_female` column: `-1` or a percentage
    pub fn stored_female(self) -> f64 {
        self.female_percent().unwrap_or(-1.0)
    }
}

fn versioned_sprite(sprites: &Sprites, pointer: &str) -> Option<String> {
    sprites
        .versions
        .as_ref()?
        .pointer(pointer)?
        .as_str()
        .map(str::to_string)
}

/// Gen VII front sprite, then the default front sprite, then empty
pub fn front_sprite(sprites: &Sprites) -> String {
    versioned_sprite(sprites, USUM_FRONT)
        .or_else(|| sprites.front_default.clone())
        .unwrap_or_default()
}

fn front_shiny_sprite(sprites: &Sprites) -> Option<String> {
    versioned_sprite(sprites, USUM_FRONT_SHINY).or_else(|| sprites.front_shiny.clone())
}

/// One stat per canonical name, in payload order, capped at `limit`
pub fn select_stats(stats: &[StatPayload], limit: usize) -> Vec<&StatPayload> {
    let mut seen = HashSet::new();
    stats
        .iter()
        .filter(|s| seen.insert(s.stat.name.clone()))
        .take(limit)
        .collect()
}

fn tag(resource: &Option<NamedResource>) -> Option<&str> {
    resource.as_ref().map(|r| r.name.as_str())
}

pub fn pokemon_record(
    pokemon: &PokemonPayload,
    species: &SpeciesPayload,
    generation: u8,
    evolves_from_id: Option<i64>,
    evolution_chain_id: Option<i64>,
) -> Record {
    let sprites = &pokemon.sprites;
    let other = sprites.other.clone().unwrap_or_default();
    let artwork = other.official_artwork.unwrap_or_default();
    let home = other.home.unwrap_or_default();
    let gender = GenderRatio::from_raw(species.gender_rate);

    Record::new()
        .with("id", pokemon.id)
        .with("name", pokemon.name.as_str())
        .with("sprite", front_sprite(sprites))
        .with("sprite_shiny", front_shiny_sprite(sprites))
        .with("sprite_back", sprites.back_default.clone())
        .with("sprite_back_shiny", sprites.back_shiny.clone())
        .with("sprite_artwork", artwork.front_default)
        .with("sprite_artwork_shiny", artwork.front_shiny)
        .with("sprite_home", home.front_default)
        .with("sprite_home_shiny", home.front_shiny)
        .with("generation", i64::from(generation))
        .with("height", pokemon.height)
        .with("weight", pokemon.weight)
        .with("base_experience", pokemon.base_experience)
        .with("capture_rate", species.capture_rate)
        .with("base_happiness", species.base_happiness)
        .with("gender_rate", species.gender_rate)
        .with("gender_rate_female", gender.stored_female())
        .with("growth_rate", tag(&species.growth_rate))
        .with("hatch_counter", species.hatch_counter)
        .with("habitat", tag(&species.habitat))
        .with("color", tag(&species.color))
        .with("shape", tag(&species.shape))
        .with("genus", text::english_genus(&species.genera))
        .with("is_baby", species.is_baby)
        .with("is_legendary", species.is_legendary)
        .with("is_mythical", species.is_mythical)
        .with("evolves_from_id", evolves_from_id)
        .with("evolution_chain_id", evolution_chain_id)
}

fn reference_id(url: &str) -> Result<i64, IngestError> {
    id_from_url(url).ok_or_else(|| IngestError::InvalidReference(url.to_string()))
}

impl<T: Transport> Session<T> {
    /// Ingest one subject from a generation listing and record the outcome
    pub fn ingest_subject(&mut self, resource: &NamedResource, generation: u8) -> bool {
        let result = self.ingest_pokemon(resource, generation);
        let subject = result.as_ref().ok().copied();
        self.report
            .record(UnitKind::Subject, subject, &resource.name, result.map(|_| ()))
    }

    /// Fetch, persist and link one subject; returns its id.
    ///
    /// Reference rows are resolved before the subject's own transaction so a
    /// rollback never leaves the entity cache pointing at discarded rows.
    /// Abilities, moves and encounters run afterwards as independent units.
    pub fn ingest_pokemon(
        &mut self,
        resource: &NamedResource,
        generation: u8,
    ) -> Result<i64, IngestError> {
        let pokemon: PokemonPayload = self.fetcher.get_json(&resource.url)?;
        let species: SpeciesPayload = self.fetcher.get_json(&pokemon.species.url)?;

        let mut type_ids = Vec::with_capacity(pokemon.types.len());
        for slot in &pokemon.types {
            let id = self.resolve_type(&slot.kind.name, &slot.kind.url)?;
            type_ids.push((id, slot.slot));
        }

        let mut egg_group_ids = Vec::with_capacity(species.egg_groups.len());
        for group in &species.egg_groups {
            egg_group_ids.push(self.resolve_egg_group(&group.name)?);
        }

        let chain_id = match &species.evolution_chain {
            Some(chain) => {
                let chain_id = reference_id(&chain.url)?;
                self.ensure_chain(chain_id, &chain.url)?;
                Some(chain_id)
            }
            None => None,
        };
        let evolves_from_id = species
            .evolves_from_species
            .as_ref()
            .map(|from| reference_id(&from.url))
            .transpose()?;

        let stats = select_stats(&pokemon.stats, self.limits.stats);
        let entries = text::pokedex_entries(&species.flavor_text_entries, self.limits.pokedex_entries);
        let record = pokemon_record(&pokemon, &species, generation, evolves_from_id, chain_id);
        let pokemon_id = pokemon.id;

        self.store.unit(|store| {
            store.insert(&POKEMON, &record, OnConflict::Fail)?;

            for (type_id, slot) in &type_ids {
                let row = Record::new()
                    .with("pokemon_id", pokemon_id)
                    .with("type_id", *type_id)
                    .with("slot", *slot);
                store.insert(&POKEMON_TYPES, &row, OnConflict::Fail)?;
            }

            for egg_group_id in &egg_group_ids {
                let row = Record::new()
                    .with("pokemon_id", pokemon_id)
                    .with("egg_group_id", *egg_group_id);
                store.insert(&POKEMON_EGG_GROUPS, &row, OnConflict::Ignore)?;
            }

            for stat in &stats {
                let row = Record::new()
                    .with("pokemon_id", pokemon_id)
                    .with("name", stat.stat.name.as_str())
                    .with("value", stat.base_stat)
                    .with("effort", stat.effort);
                store.insert(&STATS, &row, OnConflict::Fail)?;
            }

            for (version, description) in &entries {
                let row = Record::new()
                    .with("pokemon_id", pokemon_id)
                    .with("version_name", version.as_str())
                    .with("description", description.as_str());
                store.insert(&POKEDEX_ENTRIES, &row, OnConflict::Fail)?;
            }
            Ok::<_, IngestError>(())
        })?;
        debug!(pokemon_id, name = %pokemon.name, generation, "stored subject");

        self.ingest_abilities(pokemon_id, &pokemon.abilities);
        self.ingest_moves(pokemon_id, &pokemon.moves);
        self.ingest_encounters(pokemon_id);
        Ok(pokemon_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqlValue;
    use serde_json::json;

    #[test]
    fn test_gender_ratio() {
        assert_eq!(GenderRatio::from_raw(-1), GenderRatio::Genderless);
        assert_eq!(GenderRatio::Genderless.stored_female(), -1.0);

        let even = GenderRatio::from_raw(4);
        assert_eq!(even.female_percent(), Some(50.0));
        assert_eq!(even.male_percent(), Some(50.0));
        assert_eq!(GenderRatio::from_raw(1).female_percent(), Some(12.5));
        assert_eq!(GenderRatio::from_raw(8).male_percent(), Some(0.0));
    }

    #[test]
    fn test_front_sprite_fallbacks() {
        let sprites: Sprites = serde_json::from_value(json!({
            "front_default": "default.png",
            "versions": {
                "generation-vii": {
                    "ultra-sun-ultra-moon": { "front_default": "usum.png", "front_shiny": null }
                }
            }
        }))
        .unwrap();
        assert_eq!(front_sprite(&sprites), "usum.png");
        assert_eq!(front_shiny_sprite(&sprites), None);

        let plain: Sprites = serde_json::from_value(json!({ "front_default": "default.png" })).unwrap();
        assert_eq!(front_sprite(&plain), "default.png");
        assert_eq!(front_sprite(&Sprites::default()), "");
    }

    #[test]
    fn test_select_stats_dedupes_and_caps() {
        let stats: Vec<StatPayload> = serde_json::from_value(json!([
            { "base_stat": 45, "effort": 0, "stat": { "name": "hp", "url": "h" } },
            { "base_stat": 99, "effort": 0, "stat": { "name": "hp", "url": "h" } },
            { "base_stat": 49, "effort": 0, "stat": { "name": "attack", "url": "a" } },
            { "base_stat": 49, "effort": 0, "stat": { "name": "defense", "url": "d" } }
        ]))
        .unwrap();

        let selected = select_stats(&stats, 2);
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].base_stat, 45);
        assert_eq!(selected[1].stat.name, "attack");
    }

    #[test]
    fn test_pokemon_record_gender_columns() {
        let pokemon: PokemonPayload = serde_json::from_value(json!({
            "id": 81,
            "name": "magnemite",
            "height": 3,
            "weight": 60,
            "base_experience": 65,
            "species": { "name": "magnemite", "url": "s" }
        }))
        .unwrap();
        let species: SpeciesPayload = serde_json::from_value(json!({
            "capture_rate": 190,
            "base_happiness": 50,
            "gender_rate": -1,
            "hatch_counter": 20
        }))
        .unwrap();

        let record = pokemon_record(&pokemon, &species, 1, None, Some(34));
        assert_eq!(record.get("gender_rate"), Some(&SqlValue::Integer(-1)));
        assert_eq!(record.get("gender_rate_female"), Some(&SqlValue::Real(-1.0)));
        assert_eq!(record.get("sprite"), Some(&SqlValue::Text(String::new())));
        assert_eq!(record.get("evolves_from_id"), Some(&SqlValue::Null));
    }
}
