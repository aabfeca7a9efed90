//! Text rendering of anomaly reports for display and storage

use std::fmt;

use crate::constants::reference::UNIT;

use super::classifier::{AnomalyReport, PicoAnomalies};

/// Text stored when every lead is within range
pub const NO_ANOMALIES_TEXT: &str = "No abnormal peaks detected in this ECG.";

impl fmt::Display for PicoAnomalies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} - {} abnormal lead{} (normal range: {}-{} {}) - {}",
            self.pico,
            self.leads.len(),
            if self.leads.len() == 1 { "" } else { "s" },
            self.normal_range.min,
            self.normal_range.max,
            UNIT,
            self.pico.clinical_finding()
        )?;
        for entry in &self.leads {
            writeln!(
                f,
                "  Lead {}: value {:.3} {unit}, deviation {:.3} {unit} {}",
                entry.lead,
                entry.value,
                entry.deviation,
                entry.direction.arrow(),
                unit = UNIT
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for AnomalyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_normal() {
            return f.write_str(NO_ANOMALIES_TEXT);
        }
        writeln!(f, "Abnormal peak details")?;
        for group in &self.groups {
            writeln!(f)?;
            write!(f, "{}", group)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amplitude::Pico;
    use crate::anomaly::{Direction, LeadDeviation};
    use crate::config::AmplitudeBounds;
    use crate::leads::Lead;

    #[test]
    fn test_normal_report_text() {
        assert_eq!(AnomalyReport::default().to_string(), NO_ANOMALIES_TEXT);
    }

    #[test]
    fn test_abnormal_report_text() {
        let report = AnomalyReport {
            groups: vec![PicoAnomalies {
                pico: Pico::Qrs,
                normal_range: AmplitudeBounds::new(0.6, 1.2),
                leads: vec![
                    LeadDeviation {
                        lead: Lead::II,
                        value: 1.312,
                        deviation: 0.112,
                        direction: Direction::Above,
                    },
                    LeadDeviation {
                        lead: Lead::AVL,
                        value: 0.55,
                        deviation: 0.05,
                        direction: Direction::Below,
                    },
                ],
            }],
        };

        let text = report.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Abnormal peak details");
        assert_eq!(
            lines[2],
            "Pico QRS - 2 abnormal leads (normal range: 0.6-1.2 mV) - Ventricular hypertrophy"
        );
        assert_eq!(lines[3], "  Lead II: value 1.312 mV, deviation 0.112 mV ↑");
        assert_eq!(lines[4], "  Lead aVL: value 0.550 mV, deviation 0.050 mV ↓");
    }
}
