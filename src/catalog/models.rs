//! Payload shapes for the catalog resources the pipeline reads.
//!
//! Only the consumed fields are declared; everything else in a payload is
//! ignored by serde.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Resource {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceList {
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

// =============================================================================
// Pokemon
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonPayload {
    pub id: i64,
    pub name: String,
    pub height: Option<i64>,
    pub weight: Option<i64>,
    pub base_experience: Option<i64>,
    pub species: NamedResource,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlotPayload>,
    #[serde(default)]
    pub stats: Vec<StatPayload>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlotPayload>,
    #[serde(default)]
    pub moves: Vec<MoveEntryPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
    pub back_default: Option<String>,
    pub back_shiny: Option<String>,
    pub other: Option<OtherSprites>,
    /// Per-game sprite tree, navigated by JSON pointer
    pub versions: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork")]
    pub official_artwork: Option<SpritePair>,
    pub home: Option<SpritePair>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpritePair {
    pub front_default: Option<String>,
    pub front_shiny: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlotPayload {
    pub slot: i64,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatPayload {
    pub base_stat: i64,
    #[serde(default)]
    pub effort: i64,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbilitySlotPayload {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
    pub slot: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveEntryPayload {
    #[serde(rename = "move")]
    pub move_ref: NamedResource,
    #[serde(default)]
    pub version_group_details: Vec<VersionGroupDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionGroupDetail {
    #[serde(default)]
    pub level_learned_at: i64,
    pub move_learn_method: NamedResource,
    pub version_group: NamedResource,
}

// =============================================================================
// Species
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SpeciesPayload {
    pub capture_rate: Option<i64>,
    pub base_happiness: Option<i64>,
    pub gender_rate: i64,
    pub hatch_counter: Option<i64>,
    pub growth_rate: Option<NamedResource>,
    pub habitat: Option<NamedResource>,
    pub color: Option<NamedResource>,
    pub shape: Option<NamedResource>,
    #[serde(default)]
    pub genera: Vec<GenusPayload>,
    #[serde(default)]
    pub is_baby: bool,
    #[serde(default)]
    pub is_legendary: bool,
    #[serde(default)]
    pub is_mythical: bool,
    pub evolves_from_species: Option<NamedResource>,
    pub evolution_chain: Option<Resource>,
    #[serde(default)]
    pub egg_groups: Vec<NamedResource>,
    #[serde(default)]
    pub flavor_text_entries: Vec<FlavorTextPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenusPayload {
    pub genus: String,
    pub language: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlavorTextPayload {
    pub flavor_text: String,
    pub language: NamedResource,
    pub version: Option<NamedResource>,
}

// =============================================================================
// Reference entities
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TypePayload {
    pub name: String,
    pub damage_relations: DamageRelations,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DamageRelations {
    pub double_damage_from: Vec<NamedResource>,
    pub double_damage_to: Vec<NamedResource>,
    pub half_damage_from: Vec<NamedResource>,
    pub half_damage_to: Vec<NamedResource>,
    pub no_damage_from: Vec<NamedResource>,
    pub no_damage_to: Vec<NamedResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovePayload {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<NamedResource>,
    pub power: Option<i64>,
    pub accuracy: Option<i64>,
    pub pp: Option<i64>,
    pub priority: Option<i64>,
    pub damage_class: Option<NamedResource>,
    pub target: Option<NamedResource>,
    #[serde(default)]
    pub effect_entries: Vec<EffectEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbilityPayload {
    pub name: String,
    #[serde(default)]
    pub effect_entries: Vec<EffectEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EffectEntry {
    pub effect: Option<String>,
    pub short_effect: Option<String>,
    pub language: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvolutionChainPayload {
    pub id: i64,
    /// Nested evolution tree, persisted as-is
    pub chain: Value,
}

// =============================================================================
// Encounters
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct LocationAreaEncounter {
    pub location_area: NamedResource,
    #[serde(default)]
    pub version_details: Vec<EncounterVersionDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncounterVersionDetail {
    pub version: NamedResource,
    #[serde(default)]
    pub encounter_details: Vec<EncounterDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncounterDetail {
    pub min_level: i64,
    pub max_level: i64,
    pub chance: i64,
    pub method: NamedResource,
}
