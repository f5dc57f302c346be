use super::{Session, UnitKind};
use crate::catalog::models::{MoveEntryPayload, VersionGroupDetail};
use crate::catalog::Transport;
use crate::error::IngestError;
use crate::schema::tables::POKEMON_MOVES;
use crate::store::{OnConflict, Record};

/// Learn detail kept for a move: the most recent version group listed
pub fn latest_detail(entry: &MoveEntryPayload) -> Option<&VersionGroupDetail> {
    entry.version_group_details.last()
}

pub fn pokemon_move_record(pokemon_id: i64, move_id: i64, detail: &VersionGroupDetail) -> Record {
    let level = (detail.level_learned_at > 0).then_some(detail.level_learned_at);
    Record::new()
        .with("pokemon_id", pokemon_id)
        .with("move_id", move_id)
        .with("learn_method", detail.move_learn_method.name.as_str())
        .with("level_learned", level)
        .with("version_group", detail.version_group.name.as_str())
}

impl<T: Transport> Session<T> {
    /// Link a subject to at most `limits.moves` of its moves, in payload order.
    ///
    /// Join rows are insert-or-ignore on
    /// `(pokemon_id, move_id, learn_method, version_group)`, so re-ingesting a
    /// subject never duplicates them. Returns the number of moves handled.
    pub fn ingest_moves(&mut self, pokemon_id: i64, entries: &[MoveEntryPayload]) -> usize {
        let mut linked = 0;
        for entry in entries.iter().take(self.limits.moves) {
            let result = self.link_move(pokemon_id, entry);
            if self
                .report
                .record(UnitKind::Move, Some(pokemon_id), &entry.move_ref.name, result)
            {
                linked += 1;
            }
        }
        linked
    }

    fn link_move(&mut self, pokemon_id: i64, entry: &MoveEntryPayload) -> Result<(), IngestError> {
        let move_id = self.resolve_move(&entry.move_ref.name, &entry.move_ref.url)?;
        if let Some(detail) = latest_detail(entry) {
            let record = pokemon_move_record(pokemon_id, move_id, detail);
            self.store
                .insert(&POKEMON_MOVES, &record, OnConflict::Ignore)?;
        }
        Ok(())
    }
}
