use tracing::debug;

use super::Session;
use crate::catalog::models::EvolutionChainPayload;
use crate::catalog::Transport;
use crate::error::IngestError;
use crate::schema::tables::EVOLUTION_CHAINS;
use crate::store::{OnConflict, Record};

impl<T: Transport> Session<T> {
    /// Persist chain `chain_id` unless it is already stored.
    ///
    /// Returns whether a row was written. An existing chain is never touched.
    pub fn ensure_chain(&mut self, chain_id: i64, url: &str) -> Result<bool, IngestError> {
        if self.store.exists(&EVOLUTION_CHAINS, chain_id)? {
            return Ok(false);
        }

        let payload: EvolutionChainPayload = self.fetcher.get_json(url)?;
        let record = Record::new()
            .with("id", chain_id)
            .with("chain", payload.chain);
        self.store
            .insert(&EVOLUTION_CHAINS, &record, OnConflict::Fail)?;
        debug!(chain_id, "stored evolution chain");
        Ok(true)
    }
}
