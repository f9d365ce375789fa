//! Session controller.
//!
//! Sequences the score engine, validation, the store and the codec in
//! response to form actions. It owns no scoring logic of its own. Every
//! action reports its failure through [`FormView::show_message`] and also
//! returns it, so hosts can decide on exit codes.

use uuid::Uuid;

use crate::codec::{self, ExportDocument, ImportFile, ImportedDocument, DEFAULT_EXPORT_PREFIX};
use crate::engine::{ScoreEngine, ScoreStatistics};
use crate::error::{ErrorKind, ScorecardError};
use crate::model::{CandidateInfo, CheckedItem, FieldId, FormDraft, ScoreRecord};
use crate::rubric::Rubric;
use crate::store::Store;
use crate::traits::{Clock, FormView, KeyValueMedium, Severity, SystemClock};
use crate::validation::{self, validate_form_for_save, validate_imported_shape};

/// One coherent scoring session over a store and a view.
pub struct Session<M, V> {
    engine: ScoreEngine,
    store: Store<M>,
    view: V,
    clock: Box<dyn Clock>,
    export_prefix: String,
    storage_available: bool,
}

impl<M: KeyValueMedium, V: FormView> Session<M, V> {
    pub fn new(store: Store<M>, view: V) -> Self {
        Self {
            engine: ScoreEngine::new(Rubric::reference()),
            store,
            view,
            clock: Box::new(SystemClock),
            export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
            storage_available: true,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_export_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.export_prefix = prefix.into();
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn store(&self) -> &Store<M> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store<M> {
        &mut self.store
    }

    pub fn engine(&self) -> &ScoreEngine {
        &self.engine
    }

    /// Result of the last availability probe.
    pub fn storage_available(&self) -> bool {
        self.storage_available
    }

    /// Probe storage, restore the draft and show the initial scores.
    ///
    /// An unavailable medium is reported but the form keeps working in memory.
    pub fn start(&mut self) -> ScoreStatistics {
        self.storage_available = self.store.is_available();
        if self.storage_available {
            if let Err(e) = self.restore_draft() {
                tracing::debug!(error = %e, "draft not restored");
            }
        } else {
            tracing::warn!("storage unavailable, running without persistence");
            self.view.show_message(
                "local storage is unavailable; changes will not be saved",
                Severity::Error,
            );
        }
        self.fill_today_if_empty();
        self.recompute()
    }

    /// A checkbox changed: recompute, refresh the display and save the draft.
    pub fn handle_score_change(&mut self) -> Result<ScoreStatistics, ScorecardError> {
        let stats = self.recompute();
        if self.storage_available {
            self.save_draft()?;
        }
        Ok(stats)
    }

    /// Write the current form into the draft slot.
    pub fn save_draft(&mut self) -> Result<(), ScorecardError> {
        let draft = FormDraft {
            info: self.read_info(),
            checked_items: self.view.checked_items(),
        };
        let result = self.store.save_draft(&draft).map_err(ScorecardError::from);
        if result.is_ok() {
            tracing::debug!(items = draft.checked_items.len(), "draft saved");
        }
        self.report(result)
    }

    /// Load the draft slot into the form. Returns whether a draft existed.
    pub fn restore_draft(&mut self) -> Result<bool, ScorecardError> {
        let result = self.store.load_draft().map_err(ScorecardError::from);
        let draft = match self.report(result)? {
            Some(draft) => draft,
            None => return Ok(false),
        };
        self.apply_form(&draft.info, &draft.checked_items);
        self.recompute();
        tracing::info!(items = draft.checked_items.len(), "draft restored");
        Ok(true)
    }

    /// Validate the form and append it as a new record.
    pub fn save_record(&mut self) -> Result<ScoreRecord, ScorecardError> {
        let result = self.try_save_record();
        self.report(result)
    }

    fn try_save_record(&mut self) -> Result<ScoreRecord, ScorecardError> {
        let info = self.read_info();
        let validation = validate_form_for_save(&info, self.clock.today());
        if !validation.is_valid() {
            return Err(ScorecardError::Validation(validation.errors));
        }
        if !validation.warnings.is_empty() {
            let text = validation
                .warnings
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            self.view.show_message(&text, Severity::Warning);
        }

        let record = self.snapshot_record(info);
        let outcome = self.store.save_record(record.clone())?;
        tracing::info!(
            id = %record.id,
            total = record.total_score,
            count = outcome.record_count,
            "score record saved"
        );

        if outcome.over_limit {
            self.view.show_message(
                &format!(
                    "{} saved records exceed the configured limit",
                    outcome.record_count
                ),
                Severity::Warning,
            );
        }
        if !outcome.evicted.is_empty() {
            self.view.show_message(
                &format!("removed {} oldest record(s)", outcome.evicted.len()),
                Severity::Info,
            );
        }
        self.view.show_message("score saved", Severity::Success);
        Ok(record)
    }

    /// Fetch every saved record and hand it to the view.
    pub fn list_records(&mut self) -> Result<Vec<ScoreRecord>, ScorecardError> {
        let result = self.store.list_records().map_err(ScorecardError::from);
        let records = self.report(result)?;
        self.view.render_records(&records);
        Ok(records)
    }

    /// Load a saved record into the form, adopting its stored scores.
    pub fn load_record(&mut self, id: &str) -> Result<ScoreRecord, ScorecardError> {
        let result = self.find_record(id);
        let record = self.report(result)?;
        self.apply_form(&record.info, &record.checked_items);
        self.engine.set_scores(&record.scores);
        self.view.render_scores(&self.engine.statistics());
        tracing::info!(id, "record loaded");
        self.view.show_message("record loaded", Severity::Success);
        Ok(record)
    }

    /// Delete a saved record and refresh the list.
    pub fn delete_record(&mut self, id: &str) -> Result<(), ScorecardError> {
        let result = match self.store.delete_record(id) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ScorecardError::RecordNotFound(id.to_string())),
            Err(e) => Err(e.into()),
        };
        self.report(result)?;
        tracing::info!(id, "record deleted");
        self.list_records()?;
        self.view.show_message("record deleted", Severity::Success);
        Ok(())
    }

    /// Delete every saved record. The form and the draft are kept.
    pub fn clear_records(&mut self) -> Result<usize, ScorecardError> {
        let result = self
            .store
            .list_records()
            .and_then(|records| self.store.clear_records().map(|()| records.len()))
            .map_err(ScorecardError::from);
        let removed = self.report(result)?;
        tracing::info!(removed, "all records deleted");
        self.view.render_records(&[]);
        self.view
            .show_message(&format!("deleted {removed} record(s)"), Severity::Success);
        Ok(removed)
    }

    /// Reset every field and checkbox and drop the draft slot.
    pub fn clear_form(&mut self) -> Result<(), ScorecardError> {
        for field in FieldId::ALL {
            self.view.set_field(field, "");
        }
        self.view.clear_checked();
        self.engine.reset();
        self.fill_today_if_empty();
        self.view.render_scores(&self.engine.statistics());

        let result = self.store.clear_draft().map_err(ScorecardError::from);
        self.report(result)?;
        self.view.show_message("form cleared", Severity::Success);
        Ok(())
    }

    /// Export the form as it is now, without saving it.
    pub fn export_current(&mut self) -> Result<ExportDocument, ScorecardError> {
        let result = self.try_export_current();
        self.report(result)
    }

    fn try_export_current(&mut self) -> Result<ExportDocument, ScorecardError> {
        let info = self.read_info();
        validation::validate_name(&info.candidate_name)?;
        let record = self.snapshot_record(info);
        self.export(record)
    }

    /// Export a saved record by id.
    pub fn export_record(&mut self, id: &str) -> Result<ExportDocument, ScorecardError> {
        let result = self.find_record(id).and_then(|record| self.export(record));
        self.report(result)
    }

    fn export(&mut self, record: ScoreRecord) -> Result<ExportDocument, ScorecardError> {
        let doc = codec::export_record(record, self.clock.now(), &self.export_prefix)?;
        tracing::info!(filename = %doc.filename, "score exported");
        self.view
            .show_message(&format!("exported {}", doc.filename), Severity::Success);
        Ok(doc)
    }

    /// Import an uploaded document into the form.
    ///
    /// The document is parsed, shape-checked and decoded before the form is
    /// touched; any failure leaves the form as it was.
    pub fn import_file(
        &mut self,
        file: Option<&ImportFile>,
    ) -> Result<ImportedDocument, ScorecardError> {
        let result = self.decode_import(file);
        let doc = self.report(result)?;
        self.apply_imported(&doc);
        Ok(doc)
    }

    /// Async counterpart of [`import_file`](Self::import_file) for a path on disk.
    pub async fn import_path(
        &mut self,
        path: Option<&std::path::Path>,
    ) -> Result<ImportedDocument, ScorecardError> {
        let result = match codec::import_path(path).await {
            Ok(value) => self.decode_value(value),
            Err(e) => Err(e.into()),
        };
        let doc = self.report(result)?;
        self.apply_imported(&doc);
        Ok(doc)
    }

    fn decode_import(&self, file: Option<&ImportFile>) -> Result<ImportedDocument, ScorecardError> {
        let value = codec::import_record(file)?;
        self.decode_value(value)
    }

    fn decode_value(&self, value: serde_json::Value) -> Result<ImportedDocument, ScorecardError> {
        validate_imported_shape(&value, self.engine.rubric())?;
        Ok(codec::decode_document(value)?)
    }

    fn apply_imported(&mut self, doc: &ImportedDocument) {
        self.apply_form(&doc.info, &doc.checked_items);
        self.engine.set_scores(&doc.scores);
        self.view.render_scores(&self.engine.statistics());
        tracing::info!(
            candidate = %doc.info.candidate_name,
            total = doc.total_score,
            "score imported"
        );
        self.view.show_message("score imported", Severity::Success);
    }

    // -- helpers ------------------------------------------------------------

    fn read_info(&self) -> CandidateInfo {
        let mut info = CandidateInfo::default();
        for field in FieldId::ALL {
            info.set_field(field, self.view.field(field));
        }
        info.candidate_name = info.candidate_name.trim().to_string();
        info
    }

    /// Put metadata and checked items into the view. Items that no longer
    /// match the rubric are skipped.
    fn apply_form(&mut self, info: &CandidateInfo, items: &[CheckedItem]) {
        for field in FieldId::ALL {
            self.view.set_field(field, info.field(field));
        }
        self.view.clear_checked();

        let rubric = self.engine.rubric();
        for item in items {
            match rubric.resolve(item) {
                Some(id) => self.view.set_checked(id, true),
                None => tracing::warn!(
                    category = %item.category,
                    weight = item.weight,
                    text = %item.text,
                    "checked item does not match the rubric, skipping"
                ),
            }
        }
    }

    fn fill_today_if_empty(&mut self) {
        if self.view.field(FieldId::InterviewDate).trim().is_empty() {
            let today = self.clock.today().format("%Y-%m-%d").to_string();
            self.view.set_field(FieldId::InterviewDate, &today);
        }
    }

    fn recompute(&mut self) -> ScoreStatistics {
        let items = self.view.checked_items();
        self.engine.compute(&items);
        let stats = self.engine.statistics();
        self.view.render_scores(&stats);
        stats
    }

    /// A new record from the form and the current scores.
    fn snapshot_record(&mut self, info: CandidateInfo) -> ScoreRecord {
        let checked_items = self.view.checked_items();
        let snapshot = self.engine.compute(&checked_items);
        ScoreRecord {
            id: Uuid::now_v7().to_string(),
            info,
            total_score: snapshot.total(),
            max_total_score: snapshot.max_total(),
            scores: snapshot.scores,
            max_scores: snapshot.max_scores,
            checked_items,
            timestamp: self.clock.now(),
        }
    }

    fn find_record(&self, id: &str) -> Result<ScoreRecord, ScorecardError> {
        self.store
            .get_record(id)?
            .ok_or_else(|| ScorecardError::RecordNotFound(id.to_string()))
    }

    /// Surface a failed action to the user and pass the result through.
    fn report<T>(&mut self, result: Result<T, ScorecardError>) -> Result<T, ScorecardError> {
        if let Err(e) = &result {
            match e.kind() {
                ErrorKind::Internal => tracing::error!(error = %e, "action failed"),
                _ => tracing::warn!(error = %e, "action rejected"),
            }
            self.view.show_message(&e.user_message(), Severity::Error);
        }
        result
    }
}
