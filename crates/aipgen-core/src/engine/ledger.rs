use crate::core::models::aip::{AipRecord, DualCompanion};

/// Position in the ledger to which an atom's work can be rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    records: usize,
    exclusions: usize,
}

/// Append-only record list for one molecule, with per-atom counters and the
/// tight-surface exclusion mask left behind by accepted lone pairs.
#[derive(Debug, Clone)]
pub struct AipLedger {
    records: Vec<AipRecord>,
    totals: Vec<usize>,
    polar: Vec<usize>,
    excluded: Vec<bool>,
    exclusion_log: Vec<usize>,
}

impl AipLedger {
    pub fn new(atom_count: usize, tight_samples: usize) -> Self {
        Self {
            records: Vec::new(),
            totals: vec![0; atom_count],
            polar: vec![0; atom_count],
            excluded: vec![false; tight_samples],
            exclusion_log: Vec::new(),
        }
    }

    pub fn push(&mut self, record: AipRecord) {
        if let Some(total) = self.totals.get_mut(record.atom_index) {
            *total += 1;
        }
        if record.category.is_polar() {
            if let Some(polar) = self.polar.get_mut(record.atom_index) {
                *polar += 1;
            }
        }
        self.records.push(record);
    }

    /// Gives the most recent record a dual companion. Returns false on an empty ledger.
    pub fn attach_dual(&mut self, companion: DualCompanion) -> bool {
        match self.records.last_mut() {
            Some(record) => {
                record.dual = Some(companion);
                true
            }
            None => false,
        }
    }

    pub fn records(&self) -> &[AipRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn count_for(&self, atom_index: usize) -> usize {
        self.totals.get(atom_index).copied().unwrap_or(0)
    }

    pub fn polar_count_for(&self, atom_index: usize) -> usize {
        self.polar.get(atom_index).copied().unwrap_or(0)
    }

    /// Marks tight-surface samples as consumed by a lone pair.
    pub fn exclude<I: IntoIterator<Item = usize>>(&mut self, samples: I) {
        for i in samples {
            if let Some(flag) = self.excluded.get_mut(i) {
                if !*flag {
                    *flag = true;
                    self.exclusion_log.push(i);
                }
            }
        }
    }

    pub fn is_excluded(&self, sample_index: usize) -> bool {
        self.excluded.get(sample_index).copied().unwrap_or(false)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            records: self.records.len(),
            exclusions: self.exclusion_log.len(),
        }
    }

    /// Discards every record and exclusion added since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        while self.records.len() > checkpoint.records {
            if let Some(record) = self.records.pop() {
                if let Some(total) = self.totals.get_mut(record.atom_index) {
                    *total = total.saturating_sub(1);
                }
                if record.category.is_polar() {
                    if let Some(polar) = self.polar.get_mut(record.atom_index) {
                        *polar = polar.saturating_sub(1);
                    }
                }
            }
        }
        while self.exclusion_log.len() > checkpoint.exclusions {
            if let Some(i) = self.exclusion_log.pop() {
                self.excluded[i] = false;
            }
        }
    }

    /// Consumes the ledger into its records and the per-atom record totals.
    pub fn into_parts(self) -> (Vec<AipRecord>, Vec<usize>) {
        (self.records, self.totals)
    }
}
