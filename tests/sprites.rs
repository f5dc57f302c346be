mod support;

use tempfile::TempDir;

use pokedex_seed::config::GenerationWindow;
use pokedex_seed::ingest::UnitKind;
use pokedex_seed::{Phase, SilentUi};
use support::{count, install_types, install_window, pipeline, FakeTransport, PokemonFixture, ENDPOINTS};

fn sprite_row(store: &pokedex_seed::Store, id: i64) -> (String, Option<String>, Option<String>) {
    store
        .connection()
        .query_row(
            "SELECT sprite_artwork, sprite_artwork_shiny, sprite_home_shiny FROM pokemon WHERE id = ?1",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap()
}

#[test]
fn test_refresh_patches_shiny_columns_only() {
    let window = GenerationWindow::new(1, 0, 151);
    let bulbasaur = PokemonFixture::new(1, "bulbasaur");
    let charmander = PokemonFixture::new(4, "charmander").types(&["fire"]);
    let transport = FakeTransport::new();
    install_types(&transport, &["normal", "grass", "fire"]);
    install_window(&transport, window, &[&bulbasaur, &charmander]);

    let dir = TempDir::new().unwrap();
    let mut seeder = pipeline(&transport, &dir.path().join("dex.db"), vec![window]);
    seeder.run(&mut SilentUi::new()).unwrap();
    let stats_before = count(seeder.store(), "SELECT COUNT(*) FROM stats");

    let mut updated = bulbasaur.clone();
    updated.artwork_shiny = "https://sprites.test/artwork/shiny/1-v2.png".into();
    transport.json(ENDPOINTS.pokemon(1), updated.pokemon_payload());
    transport.fail_always(ENDPOINTS.pokemon(4), 500);

    let report = seeder.refresh_sprites(&mut SilentUi::new()).unwrap();
    assert_eq!(report.done(UnitKind::Sprite), 1);
    assert_eq!(report.skipped_of(UnitKind::Sprite), 1);
    assert_eq!(seeder.phase(), Phase::Complete);

    let store = seeder.store();
    let (artwork, shiny, _home) = sprite_row(store, 1);
    assert_eq!(artwork, "https://sprites.test/artwork/1.png");
    assert_eq!(shiny.as_deref(), Some("https://sprites.test/artwork/shiny/1-v2.png"));

    let (_, untouched, _) = sprite_row(store, 4);
    assert_eq!(untouched.as_deref(), Some("https://sprites.test/artwork/shiny/4.png"));

    assert_eq!(count(store, "SELECT COUNT(*) FROM pokemon"), 2);
    assert_eq!(count(store, "SELECT COUNT(*) FROM stats"), stats_before);
}

#[test]
fn test_refresh_on_empty_store() {
    let transport = FakeTransport::new();
    let dir = TempDir::new().unwrap();
    let mut refresher = pipeline(&transport, &dir.path().join("dex.db"), Vec::new());

    let report = refresher.refresh_sprites(&mut SilentUi::new()).unwrap();
    assert!(report.units().is_empty());
}
