//! Pairing and staging: matches same-named files across the two input sets
//! and runs the comparator as decodes complete.
//!
//! Each selected file moves through validate → decode → store → counterpart
//! lookup → compare → append, with decode completion as the only wait point.
//! The engine is the sole consumer of the completion channel, so slot writes
//! and result appends never interleave mid-handler. Across files, only
//! decode-completion order is guaranteed; the result list reflects that
//! order, not the selection order.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::compare::{compare, Tolerance};
use crate::config::Config;
use crate::error::PipelineError;
use crate::types::{DecodedImage, DiffResult, FileRecord, FileStatus, RunStats, SetId, SourceFile};

use super::channel::completion_channel;
use super::decode::ImageDecoder;
use super::validate::Validator;

/// Holding area for one normalized name, awaiting an image from each set.
#[derive(Default)]
struct Slot {
    images: [Option<DecodedImage>; 2],
    compared: bool,
}

/// Message sent by a decode task when its file finishes (or fails) decoding.
struct DecodeCompletion {
    set: SetId,
    generation: u64,
    source: SourceFile,
    outcome: Result<DecodedImage, PipelineError>,
}

/// Pairs files across the two input sets and produces diff results.
pub struct StagingEngine {
    validator: Validator,
    decoder: Arc<ImageDecoder>,
    tolerance: Tolerance,
    slots: HashMap<String, Slot>,
    results: Vec<DiffResult>,
    records: [Vec<FileRecord>; 2],
    arrival: [Vec<String>; 2],
    generations: [u64; 2],
    pending: usize,
    tx: mpsc::Sender<DecodeCompletion>,
    rx: mpsc::Receiver<DecodeCompletion>,
}

impl StagingEngine {
    /// Create a new engine from configuration.
    pub fn new(config: &Config) -> Self {
        let (tx, rx) = completion_channel(&config.processing);
        Self {
            validator: Validator::new(config.limits.clone()),
            decoder: Arc::new(ImageDecoder::new(config.limits.clone())),
            tolerance: Tolerance::from_percent(config.compare.threshold_percent),
            slots: HashMap::new(),
            results: Vec::new(),
            records: [Vec::new(), Vec::new()],
            arrival: [Vec::new(), Vec::new()],
            generations: [0, 0],
            pending: 0,
            tx,
            rx,
        }
    }

    /// The tolerance currently applied to comparisons.
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Replace a set's selection and begin decoding the new files.
    ///
    /// The set's previous slots, listing, and the whole result list are
    /// cleared; the counterpart set's decoded state persists and stays
    /// pairable. Decode completions still in flight for the replaced
    /// selection carry a stale generation and are dropped on arrival.
    pub fn select(&mut self, set: SetId, files: Vec<SourceFile>) {
        let i = set.index();
        self.generations[i] += 1;

        for slot in self.slots.values_mut() {
            slot.images[i] = None;
            slot.compared = false;
        }
        self.slots.retain(|_, slot| slot.images.iter().any(Option::is_some));
        self.arrival[i].clear();
        self.records[i].clear();
        self.results.clear();

        if files.is_empty() {
            tracing::debug!("No files currently selected for {set}");
            return;
        }
        tracing::info!("Selected {} file(s) into {set}", files.len());

        for file in files {
            self.admit(set, file);
        }
    }

    /// Validate one file; spawn its decode if it passes, record a rejection
    /// entry if not.
    fn admit(&mut self, set: SetId, file: SourceFile) {
        match self.validator.validate(&file.path) {
            Ok(media_type) => {
                tracing::debug!("Accepted {} ({media_type}) into {set}", file.name);
                self.records[set.index()].push(FileRecord {
                    set,
                    name: file.name.clone(),
                    size: file.byte_size,
                    status: FileStatus::Accepted,
                });
                self.spawn_decode(set, file);
            }
            Err(e) => {
                tracing::debug!("Rejected {} from {set}: {e}", file.name);
                self.records[set.index()].push(FileRecord {
                    set,
                    name: file.name,
                    size: file.byte_size,
                    status: FileStatus::Rejected {
                        reason: e.to_string(),
                    },
                });
            }
        }
    }

    fn spawn_decode(&mut self, set: SetId, file: SourceFile) {
        let decoder = Arc::clone(&self.decoder);
        let tx = self.tx.clone();
        let generation = self.generations[set.index()];
        self.pending += 1;

        tokio::spawn(async move {
            let outcome = decoder.decode(&file).await;
            // A closed receiver means the engine is gone; nothing to deliver.
            let _ = tx
                .send(DecodeCompletion {
                    set,
                    generation,
                    source: file,
                    outcome,
                })
                .await;
        });
    }

    /// Process a single decode completion.
    ///
    /// Returns `false` once no decodes remain in flight.
    pub async fn step(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        let Some(completion) = self.rx.recv().await else {
            self.pending = 0;
            return false;
        };
        self.pending -= 1;
        self.apply(completion);
        true
    }

    /// Drain decode completions until no decodes are in flight.
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    fn apply(&mut self, completion: DecodeCompletion) {
        let i = completion.set.index();
        if completion.generation != self.generations[i] {
            tracing::debug!(
                "Dropping stale decode completion for {} ({})",
                completion.source.name,
                completion.set
            );
            return;
        }

        match completion.outcome {
            Ok(decoded) => self.stage(completion.set, decoded),
            Err(e) => {
                tracing::warn!(
                    "Decode failed for {} ({}): {e}",
                    completion.source.name,
                    completion.set
                );
                if let Some(record) = self.records[i]
                    .iter_mut()
                    .find(|r| r.name == completion.source.name)
                {
                    record.status = FileStatus::DecodeFailed {
                        message: e.to_string(),
                    };
                }
            }
        }
    }

    /// Store a decoded image in its slot and compare if the counterpart has
    /// already arrived. A slot compares at most once per selection.
    fn stage(&mut self, set: SetId, decoded: DecodedImage) {
        let key = decoded.source.normalized_name();
        self.arrival[set.index()].push(key.clone());

        let slot = self.slots.entry(key.clone()).or_default();
        slot.images[set.index()] = Some(decoded);
        if slot.compared {
            return;
        }

        if let [Some(first), Some(second)] = &slot.images {
            let result = Self::compare_pair(first, second, self.tolerance);
            slot.compared = true;
            tracing::debug!(
                "Compared {} ({} byte diff buffer)",
                result.title,
                result.pixels.len()
            );
            self.results.push(result);
        }
    }

    fn compare_pair(first: &DecodedImage, second: &DecodedImage, tolerance: Tolerance) -> DiffResult {
        let pixels = compare(&first.pixels, &second.pixels, tolerance);
        DiffResult {
            title: first.source.name.clone(),
            width: first.width,
            height: first.height,
            pixels,
            source_size: first.source.byte_size,
        }
    }

    /// Change the tolerance and recompute set 1's pairings against the
    /// decoded set-2 state, rebuilding the result list from scratch.
    pub fn set_tolerance(&mut self, tolerance: Tolerance) {
        self.tolerance = tolerance;
        self.results.clear();
        for slot in self.slots.values_mut() {
            slot.compared = false;
        }

        let order = self.arrival[SetId::One.index()].clone();
        for key in order {
            let Some(slot) = self.slots.get_mut(&key) else {
                continue;
            };
            if slot.compared {
                continue;
            }
            if let [Some(first), Some(second)] = &slot.images {
                let result = Self::compare_pair(first, second, self.tolerance);
                slot.compared = true;
                self.results.push(result);
            }
        }
    }

    /// Results in the order their comparisons completed.
    pub fn results(&self) -> &[DiffResult] {
        &self.results
    }

    /// The listing entries for a set, in selection order.
    pub fn records(&self, set: SetId) -> &[FileRecord] {
        &self.records[set.index()]
    }

    /// Original names of files in `set` that decoded but have no counterpart.
    ///
    /// An unmatched file is a terminal, errorless state; the counterpart may
    /// simply never arrive.
    pub fn unmatched(&self, set: SetId) -> Vec<String> {
        let i = set.index();
        let other = set.other().index();
        self.slots
            .values()
            .filter(|slot| slot.images[other].is_none())
            .filter_map(|slot| slot.images[i].as_ref())
            .map(|img| img.source.name.clone())
            .collect()
    }

    /// Decodes still in flight.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Aggregate counters over both listings and the result list.
    ///
    /// `total_seconds` is left at zero for the caller to fill.
    pub fn stats(&self) -> RunStats {
        let mut stats = RunStats::default();
        for record in self.records.iter().flatten() {
            match record.status {
                FileStatus::Accepted => stats.accepted += 1,
                FileStatus::Rejected { .. } => stats.rejected += 1,
                FileStatus::DecodeFailed { .. } => stats.decode_failed += 1,
            }
        }
        stats.compared = self.results.len();
        stats.unmatched =
            self.unmatched(SetId::One).len() + self.unmatched(SetId::Two).len();
        stats
    }
}
