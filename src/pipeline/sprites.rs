use tracing::info;

use super::Pipeline;
use crate::catalog::models::{PokemonPayload, Sprites};
use crate::catalog::Transport;
use crate::error::{IngestError, PipelineError};
use crate::ingest::{RunReport, Session, UnitKind};
use crate::schema::tables::POKEMON;
use crate::store::query::all_pokemon_ids;
use crate::store::Record;
use crate::ui::{Phase, Ui};

/// Shiny artwork and shiny home sprites present in a payload
pub fn sprite_patch(sprites: &Sprites) -> Record {
    let mut patch = Record::new();
    let Some(other) = &sprites.other else {
        return patch;
    };
    if let Some(url) = other.official_artwork.as_ref().and_then(|a| a.front_shiny.clone()) {
        patch = patch.with("sprite_artwork_shiny", url);
    }
    if let Some(url) = other.home.as_ref().and_then(|h| h.front_shiny.clone()) {
        patch = patch.with("sprite_home_shiny", url);
    }
    patch
}

fn refresh_one<T: Transport>(session: &Session<T>, id: i64) -> Result<(), IngestError> {
    let payload: PokemonPayload = session.fetcher.get_json(&session.endpoints.pokemon(id))?;
    session
        .store
        .update_columns(&POKEMON, id, &sprite_patch(&payload.sprites))?;
    Ok(())
}

impl<T: Transport> Pipeline<T> {
    /// Re-fetch every stored subject and patch its shiny sprite columns.
    ///
    /// Never creates or deletes rows; other columns and relations are left
    /// alone. Per-subject failures are recorded and skipped.
    pub fn refresh_sprites<U: Ui>(&mut self, ui: &mut U) -> Result<&RunReport, PipelineError> {
        let phase = Phase::RefreshingSprites;
        self.enter(phase, ui);
        self.session.report.clear();

        let subjects = match all_pokemon_ids(&self.session.store) {
            Ok(subjects) => subjects,
            Err(err) => return self.fail(PipelineError::fatal(phase)(err.into()), ui),
        };

        let total = subjects.len() as u64;
        for (idx, (id, name)) in subjects.iter().enumerate() {
            ui.set_progress(idx as u64 + 1, total, name.as_str());
            let result = refresh_one(&self.session, *id);
            if self
                .session
                .report
                .record(UnitKind::Sprite, Some(*id), name, result)
            {
                ui.log(format!("✓ {} done", name));
            } else {
                ui.log(format!("✗ {} error: {}", name, self.last_skip_reason()));
            }
            self.throttle.pause();
        }

        ui.clear_progress();
        self.enter(Phase::Complete, ui);
        info!("{}", self.session.report.summary(UnitKind::Sprite));
        Ok(&self.session.report)
    }
}
