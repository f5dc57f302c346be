use super::{Session, UnitKind};
use crate::catalog::models::LocationAreaEncounter;
use crate::catalog::Transport;
use crate::config::Limits;
use crate::error::IngestError;
use crate::schema::tables::ENCOUNTERS;
use crate::store::{OnConflict, Record};

/// Flatten the encounter tree into rows, bounded per area, version and detail
pub fn select_encounters(areas: &[LocationAreaEncounter], limits: &Limits) -> Vec<Record> {
    let mut rows = Vec::new();
    for area in areas.iter().take(limits.encounter_areas) {
        for version in area.version_details.iter().take(limits.encounter_versions) {
            for detail in version.encounter_details.iter().take(limits.encounter_details) {
                rows.push(
                    Record::new()
                        .with("location_name", area.location_area.name.as_str())
                        .with("version_name", version.version.name.as_str())
                        .with("method", detail.method.name.as_str())
                        .with("min_level", detail.min_level)
                        .with("max_level", detail.max_level)
                        .with("chance", detail.chance),
                );
            }
        }
    }
    rows
}

impl<T: Transport> Session<T> {
    /// Store the wild-encounter rows for one subject.
    ///
    /// Best effort: a missing listing leaves the subject with zero rows and
    /// a done unit. Any other failure also leaves zero rows but is recorded
    /// as a skipped unit. The subject itself never fails here.
    pub fn ingest_encounters(&mut self, pokemon_id: i64) -> usize {
        let (stored, result) = match self.store_encounters(pokemon_id) {
            Ok(stored) => (stored, Ok(())),
            Err(IngestError::Fetch(err)) if err.is_not_found() => (0, Ok(())),
            Err(err) => (0, Err(err)),
        };
        let key = pokemon_id.to_string();
        self.report
            .record(UnitKind::Encounters, Some(pokemon_id), &key, result);
        stored
    }

    fn store_encounters(&mut self, pokemon_id: i64) -> Result<usize, IngestError> {
        let url = self.endpoints.encounters(pokemon_id);
        let areas: Vec<LocationAreaEncounter> = self.fetcher.get_json(&url)?;
        let rows = select_encounters(&areas, &self.limits);

        self.store.unit(|store| {
            for row in &rows {
                let row = row.clone().with("pokemon_id", pokemon_id);
                store.insert(&ENCOUNTERS, &row, OnConflict::Fail)?;
            }
            Ok::<_, IngestError>(rows.len())
        })
    }
}
