//! Rule-based anomaly flagging against clinical reference ranges
//!
//! The reference table is narrower than the calibration clamp:
//! a QRS of 1.4 mV is a plausible detection and still abnormal.

use serde::{Deserialize, Serialize};

use crate::amplitude::{LeadAmplitudeMap, Pico};
use crate::config::{AmplitudeBounds, PicoBounds};
use crate::constants::reference;
use crate::leads::Lead;

impl PicoBounds {
    /// Clinically normal ranges used for anomaly flagging
    pub fn clinical_reference() -> Self {
        Self {
            p: reference::P.into(),
            qrs: reference::QRS.into(),
            t: reference::T.into(),
            u: reference::U.into(),
        }
    }
}

/// Side of the normal range a value falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Above,
    Below,
}

impl Direction {
    pub fn arrow(&self) -> char {
        match self {
            Direction::Above => '↑',
            Direction::Below => '↓',
        }
    }
}

/// One lead's out-of-range amplitude
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadDeviation {
    pub lead: Lead,
    /// Calibrated amplitude (mV)
    pub value: f64,
    /// Distance to the nearest range bound (mV, positive)
    pub deviation: f64,
    pub direction: Direction,
}

/// All abnormal leads for one pico
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PicoAnomalies {
    pub pico: Pico,
    pub normal_range: AmplitudeBounds,
    pub leads: Vec<LeadDeviation>,
}

/// Abnormal (lead, pico) pairs grouped by pico
///
/// Groups appear in P, QRS, T, U order and only when non-empty; leads within
/// a group keep reporting order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub groups: Vec<PicoAnomalies>,
}

impl AnomalyReport {
    /// No lead has any pico outside its reference range
    pub fn is_normal(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group for `pico`, if any lead is abnormal for it
    pub fn group(&self, pico: Pico) -> Option<&PicoAnomalies> {
        self.groups.iter().find(|group| group.pico == pico)
    }

    /// Total number of abnormal (lead, pico) pairs
    pub fn abnormal_count(&self) -> usize {
        self.groups.iter().map(|group| group.leads.len()).sum()
    }

    /// Clinical findings suggested by the abnormal picos
    pub fn findings(&self) -> Vec<&'static str> {
        self.groups.iter().map(|group| group.pico.clinical_finding()).collect()
    }
}

/// Compares calibrated amplitudes with the reference table
#[derive(Debug, Clone)]
pub struct AnomalyClassifier {
    ranges: PicoBounds,
}

impl Default for AnomalyClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl AnomalyClassifier {
    /// Create a classifier using the clinical reference table
    pub fn new() -> Self {
        Self {
            ranges: PicoBounds::clinical_reference(),
        }
    }

    /// Create a classifier with custom reference ranges
    pub fn with_ranges(ranges: PicoBounds) -> Self {
        Self { ranges }
    }

    pub fn ranges(&self) -> &PicoBounds {
        &self.ranges
    }

    /// Deviation of `value` from the normal range of `pico`
    ///
    /// Returns `None` when the value lies within the closed range.
    pub fn check(&self, pico: Pico, value: f64) -> Option<(Direction, f64)> {
        let range = self.ranges.get(pico);
        if value > range.max {
            Some((Direction::Above, value - range.max))
        } else if value < range.min {
            Some((Direction::Below, range.min - value))
        } else {
            None
        }
    }

    /// Flag every out-of-range amplitude in `amplitudes`
    pub fn classify(&self, amplitudes: &LeadAmplitudeMap) -> AnomalyReport {
        let groups = Pico::ALL
            .into_iter()
            .filter_map(|pico| {
                let leads: Vec<LeadDeviation> = amplitudes
                    .iter()
                    .filter_map(|(lead, record)| {
                        let value = record.get(pico);
                        self.check(pico, value).map(|(direction, deviation)| LeadDeviation {
                            lead,
                            value,
                            deviation,
                            direction,
                        })
                    })
                    .collect();

                (!leads.is_empty()).then(|| PicoAnomalies {
                    pico,
                    normal_range: self.ranges.get(pico),
                    leads,
                })
            })
            .collect();

        AnomalyReport { groups }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amplitude::AmplitudeRecord;
    use approx::assert_relative_eq;

    fn normal() -> AmplitudeRecord {
        AmplitudeRecord::new(0.15, 0.9, 0.3, 0.05)
    }

    fn all_leads(record: AmplitudeRecord) -> LeadAmplitudeMap {
        Lead::ALL.into_iter().map(|lead| (lead, record)).collect()
    }

    #[test]
    fn test_normal_map_has_no_anomalies() {
        let report = AnomalyClassifier::new().classify(&all_leads(normal()));
        assert!(report.is_normal());
        assert_eq!(report.abnormal_count(), 0);
    }

    #[test]
    fn test_qrs_upper_boundary_is_strict() {
        let classifier = AnomalyClassifier::new();
        assert_eq!(classifier.check(Pico::Qrs, 1.2), None);
        let (direction, deviation) = classifier.check(Pico::Qrs, 1.2000001).unwrap();
        assert_eq!(direction, Direction::Above);
        assert_relative_eq!(deviation, 1e-7, epsilon = 1e-12);
    }

    #[test]
    fn test_qrs_lower_boundary_is_strict() {
        let classifier = AnomalyClassifier::new();
        assert_eq!(classifier.check(Pico::Qrs, 0.6), None);
        let (direction, _) = classifier.check(Pico::Qrs, 0.5999999).unwrap();
        assert_eq!(direction, Direction::Below);
    }

    #[test]
    fn test_u_zero_is_normal() {
        assert_eq!(AnomalyClassifier::new().check(Pico::U, 0.0), None);
    }

    #[test]
    fn test_grouping_by_pico() {
        let mut records: Vec<(Lead, AmplitudeRecord)> =
            Lead::ALL.into_iter().map(|lead| (lead, normal())).collect();
        records[1].1.qrs = 1.35; // II
        records[9].1.qrs = 0.55; // V4
        records[4].1.p = 0.3; // aVL

        let map: LeadAmplitudeMap = records.into_iter().collect();
        let report = AnomalyClassifier::new().classify(&map);

        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.groups[0].pico, Pico::P);
        assert_eq!(report.abnormal_count(), 3);

        let qrs = report.group(Pico::Qrs).unwrap();
        assert_eq!(qrs.normal_range, AmplitudeBounds::new(0.6, 1.2));
        assert_eq!(qrs.leads[0].lead, Lead::II);
        assert_eq!(qrs.leads[0].direction, Direction::Above);
        assert_relative_eq!(qrs.leads[0].deviation, 0.15, epsilon = 1e-9);
        assert_eq!(qrs.leads[1].lead, Lead::V4);
        assert_eq!(qrs.leads[1].direction, Direction::Below);
        assert_relative_eq!(qrs.leads[1].deviation, 0.05, epsilon = 1e-9);

        assert_eq!(report.findings(), vec!["Cardiac arrhythmia", "Ventricular hypertrophy"]);
    }

    #[test]
    fn test_valid_detection_can_be_abnormal() {
        // Inside the 0.5..1.5 clamp but above the 1.2 reference maximum
        let report = AnomalyClassifier::new().classify(&all_leads(AmplitudeRecord::new(0.15, 1.45, 0.3, 0.05)));
        assert_eq!(report.group(Pico::Qrs).unwrap().leads.len(), 12);
    }

    #[test]
    fn test_custom_ranges() {
        let mut ranges = PicoBounds::clinical_reference();
        ranges.t = AmplitudeBounds::new(0.1, 0.2);
        let report = AnomalyClassifier::with_ranges(ranges).classify(&all_leads(normal()));
        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups[0].pico, Pico::T);
    }
}
