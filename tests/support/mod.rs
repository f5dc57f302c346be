//! Scripted catalog shared by the integration tests.
//!
//! [`FakeTransport`] serves JSON bodies keyed by URL, optionally preceded by
//! queued failures, and answers 404 for anything it does not know.

#![allow(dead_code)]

use once_cell::sync::Lazy;
use serde_json::{json, Value};
use rusqlite::types::Value as SqlValue;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::time::Duration;

use pokedex_seed::catalog::{Endpoints, HttpResponse, RetryPolicy, Transport};
use pokedex_seed::config::{GenerationWindow, Settings};
use pokedex_seed::{Phase, Pipeline, Store, Ui};

pub const BASE: &str = "http://pokeapi.test/api/v2";

pub static ENDPOINTS: Lazy<Endpoints> = Lazy::new(|| Endpoints::new(BASE));

#[derive(Debug, Clone, Copy)]
pub enum Scripted {
    Status(u16),
    Network,
}

#[derive(Default)]
pub struct FakeTransport {
    bodies: RefCell<HashMap<String, Vec<u8>>>,
    queued: RefCell<HashMap<String, VecDeque<Scripted>>>,
    broken: RefCell<HashMap<String, u16>>,
    calls: RefCell<HashMap<String, usize>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(&self, url: impl Into<String>, body: Value) {
        self.raw(url, body.to_string().into_bytes());
    }

    pub fn raw(&self, url: impl Into<String>, body: Vec<u8>) {
        self.bodies.borrow_mut().insert(url.into(), body);
    }

    /// Serve these failures, in order, before the body
    pub fn fail_first(&self, url: impl Into<String>, failures: &[Scripted]) {
        self.queued
            .borrow_mut()
            .entry(url.into())
            .or_default()
            .extend(failures.iter().copied());
    }

    /// Answer every request for `url` with `status`
    pub fn fail_always(&self, url: impl Into<String>, status: u16) {
        self.broken.borrow_mut().insert(url.into(), status);
    }

    pub fn heal(&self, url: &str) {
        self.broken.borrow_mut().remove(url);
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.borrow().get(url).copied().unwrap_or(0)
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, String> {
        *self.calls.borrow_mut().entry(url.to_string()).or_default() += 1;

        if let Some(&status) = self.broken.borrow().get(url) {
            return Ok(HttpResponse { status, body: Vec::new() });
        }
        let next = self
            .queued
            .borrow_mut()
            .get_mut(url)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Scripted::Status(status)) => {
                return Ok(HttpResponse { status, body: Vec::new() })
            }
            Some(Scripted::Network) => return Err("connection reset".to_string()),
            None => {}
        }

        match self.bodies.borrow().get(url) {
            Some(body) => Ok(HttpResponse {
                status: 200,
                body: body.clone(),
            }),
            None => Ok(HttpResponse {
                status: 404,
                body: Vec::new(),
            }),
        }
    }
}

// =============================================================================
// Catalog fixtures
// =============================================================================

fn named(name: &str, url: String) -> Value {
    json!({ "name": name, "url": url })
}

fn english() -> Value {
    named("en", format!("{}/language/9/", BASE))
}

pub fn install_types(transport: &FakeTransport, names: &[&str]) {
    let results: Vec<Value> = names
        .iter()
        .map(|name| named(name, ENDPOINTS.type_detail(name)))
        .collect();
    transport.json(ENDPOINTS.type_list(50), json!({ "results": results }));

    for name in names {
        transport.json(
            ENDPOINTS.type_detail(name),
            json!({
                "name": name,
                "damage_relations": {
                    "double_damage_from": [],
                    "double_damage_to": [],
                    "half_damage_from": [],
                    "half_damage_to": [],
                    "no_damage_from": [],
                    "no_damage_to": []
                }
            }),
        );
    }
}

#[derive(Debug, Clone)]
pub struct PokemonFixture {
    pub id: i64,
    pub name: String,
    pub types: Vec<String>,
    pub egg_groups: Vec<String>,
    pub chain_id: i64,
    pub evolves_from: Option<i64>,
    pub gender_rate: i64,
    pub moves: Vec<String>,
    pub abilities: Vec<String>,
    pub encounters: bool,
    pub shared_ability_slot: bool,
    pub artwork_shiny: String,
}

impl PokemonFixture {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            types: vec!["grass".into()],
            egg_groups: vec!["monster".into()],
            chain_id: id,
            evolves_from: None,
            gender_rate: 1,
            moves: vec!["tackle".into()],
            abilities: vec!["overgrow".into()],
            encounters: false,
            shared_ability_slot: false,
            artwork_shiny: format!("https://sprites.test/artwork/shiny/{}.png", id),
        }
    }

    pub fn types(mut self, types: &[&str]) -> Self {
        self.types = types.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn chain(mut self, chain_id: i64) -> Self {
        self.chain_id = chain_id;
        self
    }

    pub fn evolves_from(mut self, id: i64) -> Self {
        self.evolves_from = Some(id);
        self
    }

    pub fn gender_rate(mut self, rate: i64) -> Self {
        self.gender_rate = rate;
        self
    }

    pub fn moves(mut self, moves: Vec<String>) -> Self {
        self.moves = moves;
        self
    }

    pub fn abilities(mut self, abilities: &[&str]) -> Self {
        self.abilities = abilities.iter().map(|a| a.to_string()).collect();
        self
    }

    /// Put every ability in slot 1
    pub fn shared_ability_slot(mut self) -> Self {
        self.shared_ability_slot = true;
        self
    }

    pub fn with_encounters(mut self) -> Self {
        self.encounters = true;
        self
    }

    pub fn resource(&self) -> Value {
        named(&self.name, ENDPOINTS.pokemon(self.id))
    }

    pub fn pokemon_payload(&self) -> Value {
        let types: Vec<Value> = self
            .types
            .iter()
            .enumerate()
            .map(|(idx, name)| json!({ "slot": idx + 1, "type": named(name, ENDPOINTS.type_detail(name)) }))
            .collect();
        let abilities: Vec<Value> = self
            .abilities
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                json!({
                    "ability": named(name, ENDPOINTS.ability(name)),
                    "is_hidden": idx > 0,
                    "slot": if self.shared_ability_slot { 1 } else { idx + 1 }
                })
            })
            .collect();
        let moves: Vec<Value> = self
            .moves
            .iter()
            .map(|name| {
                json!({
                    "move": named(name, ENDPOINTS.move_detail(name)),
                    "version_group_details": [{
                        "level_learned_at": 1,
                        "move_learn_method": named("level-up", format!("{}/move-learn-method/1/", BASE)),
                        "version_group": named("red-blue", format!("{}/version-group/1/", BASE))
                    }]
                })
            })
            .collect();
        let stats: Vec<Value> = ["hp", "attack", "defense", "special-attack", "special-defense", "speed"]
            .iter()
            .map(|stat| json!({ "base_stat": 45, "effort": 0, "stat": named(stat, format!("{}/stat/{}/", BASE, stat)) }))
            .collect();

        json!({
            "id": self.id,
            "name": self.name,
            "height": 7,
            "weight": 69,
            "base_experience": 64,
            "species": named(&self.name, ENDPOINTS.species(self.id)),
            "sprites": {
                "front_default": format!("https://sprites.test/{}.png", self.id),
                "front_shiny": format!("https://sprites.test/shiny/{}.png", self.id),
                "back_default": null,
                "back_shiny": null,
                "other": {
                    "official-artwork": {
                        "front_default": format!("https://sprites.test/artwork/{}.png", self.id),
                        "front_shiny": self.artwork_shiny
                    },
                    "home": {
                        "front_default": format!("https://sprites.test/home/{}.png", self.id),
                        "front_shiny": format!("https://sprites.test/home/shiny/{}.png", self.id)
                    }
                }
            },
            "types": types,
            "stats": stats,
            "abilities": abilities,
            "moves": moves
        })
    }

    pub fn species_payload(&self) -> Value {
        let egg_groups: Vec<Value> = self
            .egg_groups
            .iter()
            .map(|name| named(name, format!("{}/egg-group/{}/", BASE, name)))
            .collect();
        let evolves_from = self
            .evolves_from
            .map(|id| named("previous", ENDPOINTS.species(id)));

        json!({
            "capture_rate": 45,
            "base_happiness": 50,
            "gender_rate": self.gender_rate,
            "hatch_counter": 20,
            "growth_rate": named("medium-slow", format!("{}/growth-rate/4/", BASE)),
            "habitat": named("grassland", format!("{}/pokemon-habitat/3/", BASE)),
            "color": named("green", format!("{}/pokemon-color/5/", BASE)),
            "shape": named("quadruped", format!("{}/pokemon-shape/8/", BASE)),
            "genera": [{ "genus": "Seed Pokémon", "language": english() }],
            "is_baby": false,
            "is_legendary": false,
            "is_mythical": false,
            "evolves_from_species": evolves_from,
            "evolution_chain": { "url": format!("{}/", ENDPOINTS.evolution_chain(self.chain_id)) },
            "egg_groups": egg_groups,
            "flavor_text_entries": [
                {
                    "flavor_text": format!("{} entry\nfrom red.", self.name),
                    "language": english(),
                    "version": named("red", format!("{}/version/1/", BASE))
                },
                {
                    "flavor_text": format!("{} entry from blue.", self.name),
                    "language": english(),
                    "version": named("blue", format!("{}/version/2/", BASE))
                }
            ]
        })
    }
}

/// Install every resource reachable from `pokemon`
pub fn install_pokemon(transport: &FakeTransport, pokemon: &PokemonFixture) {
    transport.json(ENDPOINTS.pokemon(pokemon.id), pokemon.pokemon_payload());
    transport.json(ENDPOINTS.species(pokemon.id), pokemon.species_payload());
    transport.json(
        format!("{}/", ENDPOINTS.evolution_chain(pokemon.chain_id)),
        json!({
            "id": pokemon.chain_id,
            "chain": {
                "species": named(&pokemon.name, ENDPOINTS.species(pokemon.id)),
                "evolves_to": []
            }
        }),
    );

    for name in &pokemon.moves {
        transport.json(
            ENDPOINTS.move_detail(name),
            json!({
                "name": name,
                "type": named("normal", ENDPOINTS.type_detail("normal")),
                "power": 40,
                "accuracy": 100,
                "pp": 35,
                "priority": 0,
                "damage_class": named("physical", format!("{}/move-damage-class/2/", BASE)),
                "target": named("selected-pokemon", format!("{}/move-target/10/", BASE)),
                "effect_entries": [{
                    "effect": "Inflicts regular damage.",
                    "short_effect": "Inflicts regular damage with no additional effect.",
                    "language": english()
                }]
            }),
        );
    }

    for name in &pokemon.abilities {
        transport.json(
            ENDPOINTS.ability(name),
            json!({
                "name": name,
                "effect_entries": [{
                    "effect": "Strengthens moves when HP is low.",
                    "short_effect": "Powers up moves in a pinch.",
                    "language": english()
                }]
            }),
        );
    }

    if pokemon.encounters {
        transport.json(
            ENDPOINTS.encounters(pokemon.id),
            json!([{
                "location_area": named("viridian-forest-area", format!("{}/location-area/321/", BASE)),
                "version_details": [{
                    "version": named("red", format!("{}/version/1/", BASE)),
                    "encounter_details": [{
                        "min_level": 3,
                        "max_level": 5,
                        "chance": 15,
                        "method": named("walk", format!("{}/encounter-method/1/", BASE))
                    }]
                }]
            }]),
        );
    }
}

pub fn install_window(transport: &FakeTransport, window: GenerationWindow, subjects: &[&PokemonFixture]) {
    let results: Vec<Value> = subjects.iter().map(|p| p.resource()).collect();
    transport.json(
        ENDPOINTS.pokemon_list(window.offset, window.limit),
        json!({ "results": results }),
    );
    for pokemon in subjects {
        install_pokemon(transport, pokemon);
    }
}

/// Settings with no waiting anywhere
pub fn fast_settings(db: &Path, windows: Vec<GenerationWindow>) -> Settings {
    let mut settings = Settings::new(db.to_path_buf());
    settings.base_url = BASE.to_string();
    settings.windows = windows;
    settings.throttle = Duration::ZERO;
    settings.retry = RetryPolicy {
        attempts: 3,
        base_delay: Duration::ZERO,
    };
    settings
}

pub fn pipeline<'a>(
    transport: &'a FakeTransport,
    db: &Path,
    windows: Vec<GenerationWindow>,
) -> Pipeline<&'a FakeTransport> {
    let settings = fast_settings(db, windows);
    let store = Store::open(&settings.database).expect("open store");
    Pipeline::from_settings(&settings, store, transport)
}

pub fn count(store: &Store, sql: &str) -> i64 {
    store
        .connection()
        .query_row(sql, [], |row| row.get(0))
        .expect("count query")
}

/// Every row of a query, as raw SQLite values
pub fn snapshot(store: &Store, sql: &str) -> Vec<Vec<SqlValue>> {
    let mut stmt = store.connection().prepare(sql).expect("prepare snapshot");
    let width = stmt.column_count();
    let rows = stmt.query_map([], |row| {
        (0..width)
            .map(|idx| row.get::<_, SqlValue>(idx))
            .collect::<rusqlite::Result<Vec<_>>>()
    })
    .expect("snapshot query")
    .collect::<Result<Vec<_>, _>>()
    .expect("snapshot rows");
    rows
}

/// Keeps every log line so tests can inspect what a run reported
#[derive(Debug, Default)]
pub struct RecordingUi {
    pub phases: Vec<Phase>,
    pub lines: Vec<String>,
}

impl Ui for RecordingUi {
    fn set_phase(&mut self, phase: Phase) {
        self.phases.push(phase);
    }
    fn set_info(&mut self, _info: impl Into<String>) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, message: impl Into<String>) {
        self.lines.push(message.into());
    }
}
