//! Read operations consumed by presentation layers.

use rusqlite::{Connection, OptionalExtension, Row};
use serde::Serialize;

use super::Store;
use crate::error::StoreError;

/// Maximum number of rows returned by [`search`]
pub const SEARCH_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSlot {
    pub slot: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatValue {
    pub name: String,
    pub value: i64,
    pub effort: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PokemonSummary {
    pub id: i64,
    pub name: String,
    pub sprite: String,
    pub generation: i64,
    pub types: Vec<TypeSlot>,
    pub stats: Vec<StatValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PokedexEntryView {
    pub version_name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityView {
    pub name: String,
    pub slot: i64,
    pub is_hidden: bool,
    pub short_effect: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PokemonDetail {
    #[serde(flatten)]
    pub summary: PokemonSummary,
    pub sprite_shiny: Option<String>,
    pub sprite_artwork: Option<String>,
    pub sprite_artwork_shiny: Option<String>,
    pub sprite_home: Option<String>,
    pub sprite_home_shiny: Option<String>,
    pub height: Option<i64>,
    pub weight: Option<i64>,
    pub base_experience: Option<i64>,
    pub capture_rate: Option<i64>,
    pub base_happiness: Option<i64>,
    pub gender_rate: i64,
    pub gender_rate_female: f64,
    pub growth_rate: Option<String>,
    pub hatch_counter: Option<i64>,
    pub habitat: Option<String>,
    pub color: Option<String>,
    pub shape: Option<String>,
    pub genus: Option<String>,
    pub is_baby: bool,
    pub is_legendary: bool,
    pub is_mythical: bool,
    pub evolves_from_id: Option<i64>,
    pub evolution_chain_id: Option<i64>,
    pub pokedex_entries: Vec<PokedexEntryView>,
    pub abilities: Vec<AbilityView>,
    pub egg_groups: Vec<String>,
}

/// List every pokemon of one generation, ordered by id
pub fn list_by_generation(
    store: &Store,
    generation: i64,
) -> Result<Vec<PokemonSummary>, StoreError> {
    let conn = store.connection();
    let ids = collect_ids(
        conn,
        "SELECT id FROM pokemon WHERE generation = ?1 ORDER BY id",
        rusqlite::params![generation],
    )?;
    ids.into_iter().map(|id| load_summary(conn, id)).collect()
}

/// Fetch one pokemon with its relations, if present
pub fn get_pokemon(store: &Store, id: i64) -> Result<Option<PokemonDetail>, StoreError> {
    let conn = store.connection();
    let detail = conn
        .query_row(
            "SELECT sprite_shiny, sprite_artwork, sprite_artwork_shiny, sprite_home,
                    sprite_home_shiny, height, weight, base_experience, capture_rate,
                    base_happiness, gender_rate, gender_rate_female, growth_rate,
                    hatch_counter, habitat, color, shape, genus, is_baby, is_legendary,
                    is_mythical, evolves_from_id, evolution_chain_id
             FROM pokemon WHERE id = ?1",
            [id],
            detail_from_row,
        )
        .optional()
        .map_err(StoreError::sqlite("load pokemon"))?;

    let Some(mut detail) = detail else {
        return Ok(None);
    };

    detail.summary = load_summary(conn, id)?;
    detail.pokedex_entries = load_pokedex_entries(conn, id)?;
    detail.abilities = load_abilities(conn, id)?;
    detail.egg_groups = load_egg_groups(conn, id)?;
    Ok(Some(detail))
}

/// Search by name substring, type-name substring, or exact numeric id.
///
/// Numeric queries only match ids. Results are ordered by id and bounded
/// to [`SEARCH_LIMIT`].
pub fn search(store: &Store, query: &str) -> Result<Vec<PokemonSummary>, StoreError> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let conn = store.connection();
    let ids = match query.parse::<i64>() {
        Ok(id) => collect_ids(
            conn,
            "SELECT id FROM pokemon WHERE id = ?1",
            rusqlite::params![id],
        )?,
        Err(_) => {
            let pattern = format!("%{}%", escape_like(&query));
            collect_ids(
                conn,
                "SELECT DISTINCT p.id FROM pokemon p
                 LEFT JOIN pokemon_types pt ON pt.pokemon_id = p.id
                 LEFT JOIN types t ON t.id = pt.type_id
                 WHERE p.name LIKE ?1 ESCAPE '\\' OR t.name LIKE ?1 ESCAPE '\\'
                 ORDER BY p.id
                 LIMIT ?2",
                rusqlite::params![pattern, SEARCH_LIMIT as i64],
            )?
        }
    };

    ids.into_iter().map(|id| load_summary(conn, id)).collect()
}

/// Every stored (id, name) pair in ascending id order
pub fn all_pokemon_ids(store: &Store) -> Result<Vec<(i64, String)>, StoreError> {
    let conn = store.connection();
    let mut stmt = conn
        .prepare("SELECT id, name FROM pokemon ORDER BY id")
        .map_err(StoreError::sqlite("prepare pokemon listing"))?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
        .map_err(StoreError::sqlite("list pokemon"))?;
    Ok(rows)
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn collect_ids(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<i64>, StoreError> {
    let mut stmt = conn
        .prepare_cached(sql)
        .map_err(StoreError::sqlite("prepare id query"))?;
    let ids = stmt
        .query_map(params, |row| row.get(0))
        .and_then(|rows| rows.collect::<Result<Vec<i64>, _>>())
        .map_err(StoreError::sqlite("query ids"))?;
    Ok(ids)
}

fn load_summary(conn: &Connection, id: i64) -> Result<PokemonSummary, StoreError> {
    let (name, sprite, generation) = conn
        .query_row(
            "SELECT name, sprite, generation FROM pokemon WHERE id = ?1",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .map_err(StoreError::sqlite("load pokemon summary"))?;

    Ok(PokemonSummary {
        id,
        name,
        sprite,
        generation,
        types: load_types(conn, id)?,
        stats: load_stats(conn, id)?,
    })
}

fn load_types(conn: &Connection, id: i64) -> Result<Vec<TypeSlot>, StoreError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT pt.slot, t.name FROM pokemon_types pt
             JOIN types t ON t.id = pt.type_id
             WHERE pt.pokemon_id = ?1 ORDER BY pt.slot",
        )
        .map_err(StoreError::sqlite("prepare type query"))?;
    let rows = stmt
        .query_map([id], |row| {
            Ok(TypeSlot {
                slot: row.get(0)?,
                name: row.get(1)?,
            })
        })
        .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
        .map_err(StoreError::sqlite("load types"))?;
    Ok(rows)
}

fn load_stats(conn: &Connection, id: i64) -> Result<Vec<StatValue>, StoreError> {
    let mut stmt = conn
        .prepare_cached("SELECT name, value, effort FROM stats WHERE pokemon_id = ?1 ORDER BY id")
        .map_err(StoreError::sqlite("prepare stat query"))?;
    let rows = stmt
        .query_map([id], |row| {
            Ok(StatValue {
                name: row.get(0)?,
                value: row.get(1)?,
                effort: row.get(2)?,
            })
        })
        .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
        .map_err(StoreError::sqlite("load stats"))?;
    Ok(rows)
}

fn load_pokedex_entries(conn: &Connection, id: i64) -> Result<Vec<PokedexEntryView>, StoreError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT version_name, description FROM pokedex_entries
             WHERE pokemon_id = ?1 ORDER BY id",
        )
        .map_err(StoreError::sqlite("prepare pokedex query"))?;
    let rows = stmt
        .query_map([id], |row| {
            Ok(PokedexEntryView {
                version_name: row.get(0)?,
                description: row.get(1)?,
            })
        })
        .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
        .map_err(StoreError::sqlite("load pokedex entries"))?;
    Ok(rows)
}

fn load_abilities(conn: &Connection, id: i64) -> Result<Vec<AbilityView>, StoreError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT a.name, pa.slot, pa.is_hidden, a.short_effect FROM pokemon_abilities pa
             JOIN abilities a ON a.id = pa.ability_id
             WHERE pa.pokemon_id = ?1 ORDER BY pa.slot",
        )
        .map_err(StoreError::sqlite("prepare ability query"))?;
    let rows = stmt
        .query_map([id], |row| {
            Ok(AbilityView {
                name: row.get(0)?,
                slot: row.get(1)?,
                is_hidden: row.get(2)?,
                short_effect: row.get(3)?,
            })
        })
        .and_then(|rows| rows.collect::<Result<Vec<_>, _>>())
        .map_err(StoreError::sqlite("load abilities"))?;
    Ok(rows)
}

fn load_egg_groups(conn: &Connection, id: i64) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT e.name FROM pokemon_egg_groups pe
             JOIN egg_groups e ON e.id = pe.egg_group_id
             WHERE pe.pokemon_id = ?1 ORDER BY e.name",
        )
        .map_err(StoreError::sqlite("prepare egg group query"))?;
    let rows = stmt
        .query_map([id], |row| row.get(0))
        .and_then(|rows| rows.collect::<Result<Vec<String>, _>>())
        .map_err(StoreError::sqlite("load egg groups"))?;
    Ok(rows)
}

fn detail_from_row(row: &Row) -> rusqlite::Result<PokemonDetail> {
    Ok(PokemonDetail {
        summary: PokemonSummary {
            id: 0,
            name: String::new(),
            sprite: String::new(),
            generation: 0,
            types: Vec::new(),
            stats: Vec::new(),
        },
        sprite_shiny: row.get(0)?,
        sprite_artwork: row.get(1)?,
        sprite_artwork_shiny: row.get(2)?,
        sprite_home: row.get(3)?,
        sprite_home_shiny: row.get(4)?,
        height: row.get(5)?,
        weight: row.get(6)?,
        base_experience: row.get(7)?,
        capture_rate: row.get(8)?,
        base_happiness: row.get(9)?,
        gender_rate: row.get(10)?,
        gender_rate_female: row.get(11)?,
        growth_rate: row.get(12)?,
        hatch_counter: row.get(13)?,
        habitat: row.get(14)?,
        color: row.get(15)?,
        shape: row.get(16)?,
        genus: row.get(17)?,
        is_baby: row.get(18)?,
        is_legendary: row.get(19)?,
        is_mythical: row.get(20)?,
        evolves_from_id: row.get(21)?,
        evolution_chain_id: row.get(22)?,
        pokedex_entries: Vec::new(),
        abilities: Vec::new(),
        egg_groups: Vec::new(),
    })
}
