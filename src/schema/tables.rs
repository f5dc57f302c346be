//! Table schema definitions for the Pokédex store

use super::types::*;

// =============================================================================
// Reference Tables (global, deduplicated by natural key)
// =============================================================================

pub static TYPES: TableSchema = TableSchema {
    name: "types",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::required("double_damage_from", ColumnType::Json),
        Column::required("double_damage_to", ColumnType::Json),
        Column::required("half_damage_from", ColumnType::Json),
        Column::required("half_damage_to", ColumnType::Json),
        Column::required("no_damage_from", ColumnType::Json),
        Column::required("no_damage_to", ColumnType::Json),
    ],
    foreign_keys: &[],
    indexes: &[Index::unique(&["name"])],
    natural_key: Some("name"),
};

pub static EGG_GROUPS: TableSchema = TableSchema {
    name: "egg_groups",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
    ],
    foreign_keys: &[],
    indexes: &[Index::unique(&["name"])],
    natural_key: Some("name"),
};

/// Keyed by the catalog's chain id; the tree is stored verbatim.
pub static EVOLUTION_CHAINS: TableSchema = TableSchema {
    name: "evolution_chains",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("chain", ColumnType::Json),
    ],
    foreign_keys: &[],
    indexes: &[],
    natural_key: None,
};

pub static ABILITIES: TableSchema = TableSchema {
    name: "abilities",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::new("effect", ColumnType::Text),
        Column::new("short_effect", ColumnType::Text),
    ],
    foreign_keys: &[],
    indexes: &[Index::unique(&["name"])],
    natural_key: Some("name"),
};

pub static MOVES: TableSchema = TableSchema {
    name: "moves",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::new("type_id", ColumnType::Integer),
        Column::new("power", ColumnType::Integer),
        Column::new("accuracy", ColumnType::Integer),
        Column::new("pp", ColumnType::Integer),
        Column::required("priority", ColumnType::Integer),
        Column::new("damage_class", ColumnType::Text),
        Column::new("target", ColumnType::Text),
        Column::new("effect", ColumnType::Text),
        Column::new("short_effect", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::new("type_id", "types")],
    indexes: &[Index::unique(&["name"])],
    natural_key: Some("name"),
};

// =============================================================================
// Subject Table
// =============================================================================

pub static POKEMON: TableSchema = TableSchema {
    name: "pokemon",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::required("sprite", ColumnType::Text),
        Column::new("sprite_shiny", ColumnType::Text),
        Column::new("sprite_back", ColumnType::Text),
        Column::new("sprite_back_shiny", ColumnType::Text),
        Column::new("sprite_artwork", ColumnType::Text),
        Column::new("sprite_artwork_shiny", ColumnType::Text),
        Column::new("sprite_home", ColumnType::Text),
        Column::new("sprite_home_shiny", ColumnType::Text),
        Column::required("generation", ColumnType::Integer),
        Column::new("height", ColumnType::Integer),
        Column::new("weight", ColumnType::Integer),
        Column::new("base_experience", ColumnType::Integer),
        Column::new("capture_rate", ColumnType::Integer),
        Column::new("base_happiness", ColumnType::Integer),
        Column::required("gender_rate", ColumnType::Integer),
        Column::required("gender_rate_female", ColumnType::Real),
        Column::new("growth_rate", ColumnType::Text),
        Column::new("hatch_counter", ColumnType::Integer),
        Column::new("habitat", ColumnType::Text),
        Column::new("color", ColumnType::Text),
        Column::new("shape", ColumnType::Text),
        Column::new("genus", ColumnType::Text),
        Column::required("is_baby", ColumnType::Boolean),
        Column::required("is_legendary", ColumnType::Boolean),
        Column::required("is_mythical", ColumnType::Boolean),
        // No FK: a pre-evolution may belong to a later generation window
        Column::new("evolves_from_id", ColumnType::Integer),
        Column::new("evolution_chain_id", ColumnType::Integer),
    ],
    foreign_keys: &[ForeignKey::new("evolution_chain_id", "evolution_chains")],
    indexes: &[Index::on(&["generation"]), Index::on(&["name"])],
    natural_key: None,
};

// =============================================================================
// Join and Detail Tables (owned by a pokemon row)
// =============================================================================

pub static POKEMON_TYPES: TableSchema = TableSchema {
    name: "pokemon_types",
    columns: &[
        Column::required("pokemon_id", ColumnType::Integer),
        Column::required("type_id", ColumnType::Integer),
        Column::required("slot", ColumnType::Integer),
    ],
    foreign_keys: &[
        ForeignKey::new("pokemon_id", "pokemon"),
        ForeignKey::new("type_id", "types"),
    ],
    indexes: &[Index::unique(&["pokemon_id", "slot"])],
    natural_key: None,
};

pub static POKEMON_EGG_GROUPS: TableSchema = TableSchema {
    name: "pokemon_egg_groups",
    columns: &[
        Column::required("pokemon_id", ColumnType::Integer),
        Column::required("egg_group_id", ColumnType::Integer),
    ],
    foreign_keys: &[
        ForeignKey::new("pokemon_id", "pokemon"),
        ForeignKey::new("egg_group_id", "egg_groups"),
    ],
    indexes: &[Index::unique(&["pokemon_id", "egg_group_id"])],
    natural_key: None,
};

pub static STATS: TableSchema = TableSchema {
    name: "stats",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("pokemon_id", ColumnType::Integer),
        Column::required("name", ColumnType::Text),
        Column::required("value", ColumnType::Integer),
        Column::required("effort", ColumnType::Integer),
    ],
    foreign_keys: &[ForeignKey::new("pokemon_id", "pokemon")],
    indexes: &[Index::unique(&["pokemon_id", "name"])],
    natural_key: None,
};

pub static POKEDEX_ENTRIES: TableSchema = TableSchema {
    name: "pokedex_entries",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("pokemon_id", ColumnType::Integer),
        Column::required("version_name", ColumnType::Text),
        Column::required("description", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::new("pokemon_id", "pokemon")],
    indexes: &[Index::unique(&["pokemon_id", "version_name"])],
    natural_key: None,
};

pub static POKEMON_ABILITIES: TableSchema = TableSchema {
    name: "pokemon_abilities",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("pokemon_id", ColumnType::Integer),
        Column::required("ability_id", ColumnType::Integer),
        Column::required("is_hidden", ColumnType::Boolean),
        Column::required("slot", ColumnType::Integer),
    ],
    foreign_keys: &[
        ForeignKey::new("pokemon_id", "pokemon"),
        ForeignKey::new("ability_id", "abilities"),
    ],
    indexes: &[Index::unique(&["pokemon_id", "slot"])],
    natural_key: None,
};

pub static POKEMON_MOVES: TableSchema = TableSchema {
    name: "pokemon_moves",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("pokemon_id", ColumnType::Integer),
        Column::required("move_id", ColumnType::Integer),
        Column::required("learn_method", ColumnType::Text),
        Column::new("level_learned", ColumnType::Integer),
        Column::required("version_group", ColumnType::Text),
    ],
    foreign_keys: &[
        ForeignKey::new("pokemon_id", "pokemon"),
        ForeignKey::new("move_id", "moves"),
    ],
    indexes: &[Index::unique(&[
        "pokemon_id",
        "move_id",
        "learn_method",
        "version_group",
    ])],
    natural_key: None,
};

pub static ENCOUNTERS: TableSchema = TableSchema {
    name: "encounters",
    columns: &[
        Column::required("id", ColumnType::Integer),
        Column::required("pokemon_id", ColumnType::Integer),
        Column::required("location_name", ColumnType::Text),
        Column::required("version_name", ColumnType::Text),
        Column::required("method", ColumnType::Text),
        Column::required("min_level", ColumnType::Integer),
        Column::required("max_level", ColumnType::Integer),
        Column::required("chance", ColumnType::Integer),
    ],
    foreign_keys: &[ForeignKey::new("pokemon_id", "pokemon")],
    indexes: &[],
    natural_key: None,
};

// =============================================================================
// Table Registry
// =============================================================================

/// All tables in dependency order (parents before children)
pub static ALL_TABLES: &[&TableSchema] = &[
    // Wave 1: No dependencies
    &TYPES,
    &EGG_GROUPS,
    &EVOLUTION_CHAINS,
    &ABILITIES,
    // Wave 2: Reference tables with dependencies
    &MOVES,
    // Wave 3: Subjects
    &POKEMON,
    // Wave 4: Rows owned by a subject
    &POKEMON_TYPES,
    &POKEMON_EGG_GROUPS,
    &STATS,
    &POKEDEX_ENTRIES,
    &POKEMON_ABILITIES,
    &POKEMON_MOVES,
    &ENCOUNTERS,
];

/// Get a table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().find(|t| t.name == name).copied()
}

/// Get all table names
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}
