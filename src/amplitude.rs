//! Per-lead wave amplitude records
//!
//! An [`AmplitudeRecord`] holds the calibrated P, QRS, T and U amplitudes of
//! one lead. A [`LeadAmplitudeMap`] holds one record for each of the twelve
//! standard leads and is the value handed to reporting and diagnosis code.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::leads::Lead;

/// Characteristic wave of an ECG cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pico {
    #[serde(rename = "Pico P")]
    P,
    #[serde(rename = "Pico QRS")]
    Qrs,
    #[serde(rename = "Pico T")]
    T,
    #[serde(rename = "Pico U")]
    U,
}

impl Pico {
    /// All picos in cycle order
    pub const ALL: [Pico; 4] = [Pico::P, Pico::Qrs, Pico::T, Pico::U];

    /// Label used in stored results and prompts ("Pico QRS")
    pub fn label(&self) -> &'static str {
        match self {
            Pico::P => "Pico P",
            Pico::Qrs => "Pico QRS",
            Pico::T => "Pico T",
            Pico::U => "Pico U",
        }
    }

    /// Wave name without the prefix ("QRS")
    pub fn wave_name(&self) -> &'static str {
        match self {
            Pico::P => "P",
            Pico::Qrs => "QRS",
            Pico::T => "T",
            Pico::U => "U",
        }
    }

    /// Finding associated with an out-of-range amplitude of this wave
    pub fn clinical_finding(&self) -> &'static str {
        match self {
            Pico::P => "Cardiac arrhythmia",
            Pico::Qrs => "Ventricular hypertrophy",
            Pico::T => "T-wave inversion",
            Pico::U => "Repolarization abnormality",
        }
    }
}

impl fmt::Display for Pico {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Calibrated wave amplitudes of one lead, in millivolt-like units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeRecord {
    #[serde(rename = "Pico P")]
    pub p: f64,
    #[serde(rename = "Pico QRS")]
    pub qrs: f64,
    #[serde(rename = "Pico T")]
    pub t: f64,
    #[serde(rename = "Pico U")]
    pub u: f64,
}

impl AmplitudeRecord {
    pub fn new(p: f64, qrs: f64, t: f64, u: f64) -> Self {
        Self { p, qrs, t, u }
    }

    /// Build a record by evaluating `f` once per pico
    pub fn from_fn(mut f: impl FnMut(Pico) -> f64) -> Self {
        Self {
            p: f(Pico::P),
            qrs: f(Pico::Qrs),
            t: f(Pico::T),
            u: f(Pico::U),
        }
    }

    /// Amplitude of a single pico
    pub fn get(&self, pico: Pico) -> f64 {
        match pico {
            Pico::P => self.p,
            Pico::Qrs => self.qrs,
            Pico::T => self.t,
            Pico::U => self.u,
        }
    }

    /// (pico, amplitude) pairs in cycle order
    pub fn iter(&self) -> impl Iterator<Item = (Pico, f64)> + '_ {
        Pico::ALL.into_iter().map(move |pico| (pico, self.get(pico)))
    }
}

/// Amplitude records keyed by lead, produced once per analyzed image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadAmplitudeMap {
    records: BTreeMap<Lead, AmplitudeRecord>,
}

impl LeadAmplitudeMap {
    /// Record for one lead, if present
    pub fn get(&self, lead: Lead) -> Option<&AmplitudeRecord> {
        self.records.get(&lead)
    }

    /// Number of leads in the map
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// (lead, record) pairs in reporting order
    pub fn iter(&self) -> impl Iterator<Item = (Lead, &AmplitudeRecord)> {
        self.records.iter().map(|(lead, record)| (*lead, record))
    }

    /// Patient-level record: arithmetic mean of each pico across all leads
    ///
    /// Returns `None` for an empty map. The mean is not rounded.
    pub fn mean_record(&self) -> Option<AmplitudeRecord> {
        if self.records.is_empty() {
            return None;
        }
        let count = self.records.len() as f64;
        Some(AmplitudeRecord::from_fn(|pico| {
            self.records.values().map(|record| record.get(pico)).sum::<f64>() / count
        }))
    }
}

impl FromIterator<(Lead, AmplitudeRecord)> for LeadAmplitudeMap {
    fn from_iter<I: IntoIterator<Item = (Lead, AmplitudeRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
