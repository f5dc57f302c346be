use super::{Session, UnitKind};
use crate::catalog::models::AbilitySlotPayload;
use crate::catalog::Transport;
use crate::error::IngestError;
use crate::schema::tables::POKEMON_ABILITIES;
use crate::store::{OnConflict, Record};

impl<T: Transport> Session<T> {
    /// Link a subject to each of its ability slots.
    ///
    /// Every slot is its own unit: a failed ability fetch or insert is
    /// recorded and the remaining slots still run. Returns the linked count.
    pub fn ingest_abilities(&mut self, pokemon_id: i64, slots: &[AbilitySlotPayload]) -> usize {
        let mut linked = 0;
        for slot in slots {
            let result = self.link_ability(pokemon_id, slot);
            if self
                .report
                .record(UnitKind::Ability, Some(pokemon_id), &slot.ability.name, result)
            {
                linked += 1;
            }
        }
        linked
    }

    fn link_ability(&mut self, pokemon_id: i64, slot: &AbilitySlotPayload) -> Result<(), IngestError> {
        let ability_id = self.resolve_ability(&slot.ability.name, &slot.ability.url)?;
        let record = Record::new()
            .with("pokemon_id", pokemon_id)
            .with("ability_id", ability_id)
            .with("is_hidden", slot.is_hidden)
            .with("slot", slot.slot);
        self.store
            .insert(&POKEMON_ABILITIES, &record, OnConflict::Fail)?;
        Ok(())
    }
}
