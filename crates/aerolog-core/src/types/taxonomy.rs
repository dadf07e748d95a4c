//! Report-type taxonomy for maintenance-document classification.

use serde::{Deserialize, Serialize};

/// Supported maintenance report types.
///
/// Closed set: classification only ever suggests one of these, and the
/// pattern table is validated against it at process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportCategory {
    /// CARs/STD 625 Appendix B inspection.
    InspectionAppB,
    /// CARs/STD 625 Appendix C elementary work.
    ElementaryWorkAppC,
    /// 24-month altimeter / static system / transponder checks.
    Avionics24Month,
    /// ELT inspection (CARs 605.38 / STD 571 Appendix G).
    EltInspection,
    /// Magnetic compass calibration.
    CompassSwing,
    /// Aircraft weighing and C.G. computation.
    WeightAndBalance,
    /// STC installation.
    StcModification,
    /// Major/minor repairs.
    Repair,
    /// TSO, overhaul, life-limited parts.
    ComponentOverhaul,
    /// Fallback when no category can be suggested.
    Unknown,
}

impl ReportCategory {
    /// All categories in tie-break priority order.
    pub const ALL: [ReportCategory; 10] = [
        ReportCategory::InspectionAppB,
        ReportCategory::ElementaryWorkAppC,
        ReportCategory::Avionics24Month,
        ReportCategory::EltInspection,
        ReportCategory::CompassSwing,
        ReportCategory::WeightAndBalance,
        ReportCategory::StcModification,
        ReportCategory::Repair,
        ReportCategory::ComponentOverhaul,
        ReportCategory::Unknown,
    ];

    /// Tie-break priority when two categories score equal; lower wins.
    /// Regulatory/inspection categories outrank the generic work
    /// categories, which outrank `Unknown`.
    pub fn priority(&self) -> u8 {
        match self {
            ReportCategory::InspectionAppB => 0,
            ReportCategory::ElementaryWorkAppC => 1,
            ReportCategory::Avionics24Month => 2,
            ReportCategory::EltInspection => 3,
            ReportCategory::CompassSwing => 4,
            ReportCategory::WeightAndBalance => 5,
            ReportCategory::StcModification => 6,
            ReportCategory::Repair => 7,
            ReportCategory::ComponentOverhaul => 8,
            ReportCategory::Unknown => 9,
        }
    }

    /// Wire name of the category.
    pub fn name(&self) -> &'static str {
        match self {
            ReportCategory::InspectionAppB => "INSPECTION_APP_B",
            ReportCategory::ElementaryWorkAppC => "ELEMENTARY_WORK_APP_C",
            ReportCategory::Avionics24Month => "AVIONICS_24_MONTH",
            ReportCategory::EltInspection => "ELT_INSPECTION",
            ReportCategory::CompassSwing => "COMPASS_SWING",
            ReportCategory::WeightAndBalance => "WEIGHT_AND_BALANCE",
            ReportCategory::StcModification => "STC_MODIFICATION",
            ReportCategory::Repair => "REPAIR",
            ReportCategory::ComponentOverhaul => "COMPONENT_OVERHAUL",
            ReportCategory::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Language a pattern or match is written in. Informational only —
/// matching itself is language-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PatternLanguage {
    En,
    Fr,
}

impl std::fmt::Display for PatternLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PatternLanguage::En => "EN",
            PatternLanguage::Fr => "FR",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(ReportCategory::InspectionAppB.priority() < ReportCategory::Repair.priority());
        assert!(ReportCategory::Repair.priority() < ReportCategory::Unknown.priority());
        assert!(ReportCategory::ComponentOverhaul.priority() < ReportCategory::Unknown.priority());
    }

    #[test]
    fn test_all_priorities_unique() {
        let mut seen = std::collections::HashSet::new();
        for cat in ReportCategory::ALL {
            assert!(seen.insert(cat.priority()), "duplicate priority for {cat}");
        }
    }

    #[test]
    fn test_serde_wire_names() {
        let json = serde_json::to_string(&ReportCategory::InspectionAppB).unwrap();
        assert_eq!(json, "\"INSPECTION_APP_B\"");
        let back: ReportCategory = serde_json::from_str("\"ELT_INSPECTION\"").unwrap();
        assert_eq!(back, ReportCategory::EltInspection);
    }
}
