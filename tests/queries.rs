mod support;

use tempfile::TempDir;

use pokedex_seed::config::GenerationWindow;
use pokedex_seed::store::query::{get_pokemon, list_by_generation, search, SEARCH_LIMIT};
use pokedex_seed::SilentUi;
use support::{install_types, install_window, pipeline, FakeTransport, PokemonFixture};

fn seed(dir: &TempDir, windows: &[(GenerationWindow, Vec<PokemonFixture>)]) -> pokedex_seed::Store {
    let transport = FakeTransport::new();
    install_types(&transport, &["normal", "grass", "poison", "fire"]);
    for (window, subjects) in windows {
        let refs: Vec<&PokemonFixture> = subjects.iter().collect();
        install_window(&transport, *window, &refs);
    }

    let db = dir.path().join("dex.db");
    let mut seeder = pipeline(
        &transport,
        &db,
        windows.iter().map(|(window, _)| *window).collect(),
    );
    seeder.run(&mut SilentUi::new()).unwrap();
    drop(seeder);
    pokedex_seed::Store::open(&db).unwrap()
}

fn two_generations(dir: &TempDir) -> pokedex_seed::Store {
    seed(
        dir,
        &[
            (
                GenerationWindow::new(1, 0, 151),
                vec![
                    PokemonFixture::new(1, "bulbasaur").types(&["grass", "poison"]),
                    PokemonFixture::new(4, "charmander").types(&["fire"]),
                ],
            ),
            (
                GenerationWindow::new(2, 151, 100),
                vec![PokemonFixture::new(155, "cyndaquil").types(&["fire"])],
            ),
        ],
    )
}

#[test]
fn test_list_by_generation() {
    let dir = TempDir::new().unwrap();
    let store = two_generations(&dir);

    let gen1 = list_by_generation(&store, 1).unwrap();
    let names: Vec<&str> = gen1.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["bulbasaur", "charmander"]);
    assert_eq!(gen1[0].types.len(), 2);
    assert_eq!(gen1[0].types[1].name, "poison");
    assert_eq!(gen1[0].stats.len(), 6);

    assert_eq!(list_by_generation(&store, 2).unwrap().len(), 1);
    assert!(list_by_generation(&store, 7).unwrap().is_empty());
}

#[test]
fn test_get_pokemon_detail() {
    let dir = TempDir::new().unwrap();
    let store = two_generations(&dir);

    let detail = get_pokemon(&store, 1).unwrap().unwrap();
    assert_eq!(detail.summary.name, "bulbasaur");
    assert_eq!(detail.summary.sprite, "https://sprites.test/1.png");
    assert_eq!(detail.genus.as_deref(), Some("Seed Pokémon"));
    assert_eq!(detail.gender_rate_female, 12.5);
    assert_eq!(detail.egg_groups, vec!["monster".to_string()]);
    assert_eq!(detail.abilities[0].name, "overgrow");
    assert_eq!(detail.pokedex_entries[0].description, "bulbasaur entry from red.");
    assert_eq!(detail.evolution_chain_id, Some(1));

    assert!(get_pokemon(&store, 999).unwrap().is_none());
}

#[test]
fn test_search_by_name_type_and_id() {
    let dir = TempDir::new().unwrap();
    let store = two_generations(&dir);

    let by_name: Vec<i64> = search(&store, "CHAR").unwrap().iter().map(|p| p.id).collect();
    assert_eq!(by_name, vec![4]);

    let by_type: Vec<i64> = search(&store, "fire").unwrap().iter().map(|p| p.id).collect();
    assert_eq!(by_type, vec![4, 155]);

    let by_id: Vec<i64> = search(&store, "155").unwrap().iter().map(|p| p.id).collect();
    assert_eq!(by_id, vec![155]);

    assert!(search(&store, "%").unwrap().is_empty());
}

#[test]
fn test_search_is_bounded() {
    let dir = TempDir::new().unwrap();
    let subjects: Vec<PokemonFixture> = (1..=12)
        .map(|id| PokemonFixture::new(id, &format!("flame-{}", id)).types(&["fire"]))
        .collect();
    let store = seed(&dir, &[(GenerationWindow::new(1, 0, 151), subjects)]);

    let results = search(&store, "fire").unwrap();
    assert_eq!(results.len(), SEARCH_LIMIT);
    assert_eq!(results.first().map(|p| p.id), Some(1));
}
