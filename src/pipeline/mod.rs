//! Run orchestration: clear, seed the type catalog, then walk the
//! generation windows subject by subject.

pub mod sprites;

use std::time::Duration;
use tracing::{error, info};

use crate::catalog::models::ResourceList;
use crate::catalog::{Endpoints, Fetcher, Transport};
use crate::config::{GenerationWindow, Settings};
use crate::error::{IngestError, PipelineError};
use crate::ingest::{EntityCache, Outcome, RunReport, Session, UnitKind};
use crate::store::Store;
use crate::ui::{Phase, Ui};

/// Fixed pause after each subject
pub struct Throttle {
    delay: Duration,
    sleep: Box<dyn Fn(Duration)>,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            sleep: Box::new(std::thread::sleep),
        }
    }

    pub fn with_sleep(mut self, sleep: impl Fn(Duration) + 'static) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn pause(&self) {
        if !self.delay.is_zero() {
            (self.sleep)(self.delay);
        }
    }
}

pub struct Pipeline<T> {
    session: Session<T>,
    windows: Vec<GenerationWindow>,
    throttle: Throttle,
    phase: Phase,
}

impl<T: Transport> Pipeline<T> {
    pub fn new(session: Session<T>, windows: Vec<GenerationWindow>, throttle: Throttle) -> Self {
        Self {
            session,
            windows,
            throttle,
            phase: Phase::Clearing,
        }
    }

    /// Wire a pipeline from resolved settings
    pub fn from_settings(settings: &Settings, store: Store, transport: T) -> Self {
        let session = Session::new(
            store,
            Fetcher::new(transport, settings.retry),
            Endpoints::new(settings.base_url.as_str()),
            settings.limits,
            EntityCache::new(),
        );
        Self::new(session, settings.windows.clone(), Throttle::new(settings.throttle))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    pub fn store(&self) -> &Store {
        &self.session.store
    }

    pub fn report(&self) -> &RunReport {
        &self.session.report
    }

    fn enter<U: Ui>(&mut self, phase: Phase, ui: &mut U) {
        self.phase = phase;
        ui.set_phase(phase);
    }

    /// Full reseed. Per-subject failures are recorded in the report; only a
    /// failure of a whole phase aborts the run.
    pub fn run<U: Ui>(&mut self, ui: &mut U) -> Result<&RunReport, PipelineError> {
        match self.seed(ui) {
            Ok(()) => {
                self.enter(Phase::Complete, ui);
                info!("{}", self.session.report.summary(UnitKind::Subject));
                Ok(&self.session.report)
            }
            Err(err) => self.fail(err, ui),
        }
    }

    fn fail<U: Ui>(&mut self, err: PipelineError, ui: &mut U) -> Result<&RunReport, PipelineError> {
        error!(error = %err, "run aborted");
        self.enter(Phase::Failed, ui);
        ui.log(format!("✗ {}", err));
        Err(err)
    }

    fn seed<U: Ui>(&mut self, ui: &mut U) -> Result<(), PipelineError> {
        self.enter(Phase::Clearing, ui);
        self.session
            .store
            .clear()
            .map_err(|err| PipelineError::fatal(Phase::Clearing)(err.into()))?;
        self.session.cache.reset();
        self.session.report.clear();

        self.seed_types(ui)?;

        let windows = self.windows.clone();
        for window in windows {
            self.seed_window(window, ui)?;
        }
        ui.clear_progress();
        Ok(())
    }

    /// Every move row needs its type, so the whole type catalog goes first
    fn seed_types<U: Ui>(&mut self, ui: &mut U) -> Result<(), PipelineError> {
        let phase = Phase::SeedingTypes;
        self.enter(phase, ui);

        let url = self
            .session
            .endpoints
            .type_list(self.session.limits.type_catalog);
        let list: ResourceList = self
            .session
            .fetcher
            .get_json(&url)
            .map_err(|err| PipelineError::fatal(phase)(err.into()))?;

        let total = list.results.len() as u64;
        for (idx, kind) in list.results.iter().enumerate() {
            ui.set_progress(idx as u64 + 1, total, kind.name.as_str());
            self.session
                .resolve_type(&kind.name, &kind.url)
                .map_err(PipelineError::fatal(phase))?;
            self.session
                .report
                .record(UnitKind::Type, None, &kind.name, Ok(()));
        }
        ui.set_info(format!("{} types", total));
        Ok(())
    }

    fn seed_window<U: Ui>(&mut self, window: GenerationWindow, ui: &mut U) -> Result<(), PipelineError> {
        let phase = Phase::SeedingGeneration(window.generation);
        self.enter(phase, ui);

        let url = self.session.endpoints.pokemon_list(window.offset, window.limit);
        let list: ResourceList = self
            .session
            .fetcher
            .get_json(&url)
            .map_err(|err| PipelineError::fatal(phase)(IngestError::from(err)))?;

        let total = list.results.len() as u64;
        for (idx, subject) in list.results.iter().enumerate() {
            ui.set_progress(idx as u64 + 1, total, subject.name.as_str());
            if self.session.ingest_subject(subject, window.generation) {
                ui.log(format!("✓ {} done", subject.name));
            } else {
                ui.log(format!("✗ {} error: {}", subject.name, self.last_skip_reason()));
            }
            self.throttle.pause();
        }
        ui.set_info(format!(
            "generation {}: {}",
            window.generation,
            self.session.report.summary(UnitKind::Subject)
        ));
        Ok(())
    }

    fn last_skip_reason(&self) -> String {
        self.session
            .report
            .skipped()
            .last()
            .map(|unit| match &unit.outcome {
                Outcome::Skipped { reason } => reason.clone(),
                Outcome::Done => String::new(),
            })
            .unwrap_or_default()
    }
}
