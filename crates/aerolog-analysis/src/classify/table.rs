//! Bilingual pattern table: category → weighted patterns.
//!
//! The table is compiled and validated once at process start. Weights
//! are 10 for high-confidence regulatory anchors and 3–5 for supporting
//! keywords. Patterns are written against [`normalize_text`] output:
//! uppercase, accent-folded, whitespace-collapsed.
//!
//! [`normalize_text`]: super::normalize::normalize_text

use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use aerolog_core::config::ClassifierConfig;
use aerolog_core::errors::ConfigError;
use aerolog_core::types::{PatternLanguage, ReportCategory};

/// One pattern row before compilation.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternSpec {
    pub category: ReportCategory,
    pub pattern: String,
    pub weight: u32,
    pub label: String,
    pub language: PatternLanguage,
}

impl PatternSpec {
    fn new(
        category: ReportCategory,
        pattern: &str,
        weight: u32,
        label: &str,
        language: PatternLanguage,
    ) -> Self {
        Self {
            category,
            pattern: pattern.to_string(),
            weight,
            label: label.to_string(),
            language,
        }
    }
}

/// A compiled pattern ready for matching.
#[derive(Debug)]
pub struct CompiledPattern {
    pub regex: Regex,
    pub weight: u32,
    pub label: String,
    pub language: PatternLanguage,
}

/// The compiled, validated pattern table. Process-wide and read-only
/// for the lifetime of the process.
#[derive(Debug)]
pub struct PatternTable {
    by_category: Vec<(ReportCategory, Vec<CompiledPattern>)>,
}

impl PatternTable {
    /// Compile and validate a pattern set.
    ///
    /// Every category except `Unknown` must carry at least one pattern
    /// and at least one anchor (weight ≥ `anchor_weight`); every regex
    /// must compile. Violations are fatal configuration errors.
    pub fn compile(specs: &[PatternSpec], config: &ClassifierConfig) -> Result<Self, ConfigError> {
        let mut by_category: Vec<(ReportCategory, Vec<CompiledPattern>)> = ReportCategory::ALL
            .iter()
            .filter(|c| **c != ReportCategory::Unknown)
            .map(|c| (*c, Vec::new()))
            .collect();

        for spec in specs {
            let regex = RegexBuilder::new(&spec.pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| ConfigError::InvalidPattern {
                    category: spec.category.to_string(),
                    pattern: spec.pattern.clone(),
                    message: e.to_string(),
                })?;

            let slot = by_category
                .iter_mut()
                .find(|(c, _)| *c == spec.category)
                .ok_or_else(|| ConfigError::InvalidPattern {
                    category: spec.category.to_string(),
                    pattern: spec.pattern.clone(),
                    message: "patterns may not target the UNKNOWN category".to_string(),
                })?;

            slot.1.push(CompiledPattern {
                regex,
                weight: spec.weight,
                label: spec.label.clone(),
                language: spec.language,
            });
        }

        for (category, patterns) in &by_category {
            if patterns.is_empty() {
                return Err(ConfigError::EmptyCategory {
                    category: category.to_string(),
                });
            }
            if !patterns.iter().any(|p| p.weight >= config.anchor_weight) {
                return Err(ConfigError::MissingAnchor {
                    category: category.to_string(),
                });
            }
        }

        Ok(Self { by_category })
    }

    /// Compile the built-in Transport Canada pattern set.
    pub fn with_defaults(config: &ClassifierConfig) -> Result<Self, ConfigError> {
        Self::compile(&default_patterns(), config)
    }

    /// Parse a pattern set from TOML (`[[pattern]]` rows) and compile it.
    pub fn from_toml(text: &str, config: &ClassifierConfig) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct TableFile {
            #[serde(rename = "pattern")]
            patterns: Vec<PatternSpec>,
        }

        let file: TableFile = toml_from_str(text)?;
        Self::compile(&file.patterns, config)
    }

    /// Iterate categories with their compiled patterns.
    pub fn categories(&self) -> impl Iterator<Item = (ReportCategory, &[CompiledPattern])> {
        self.by_category.iter().map(|(c, p)| (*c, p.as_slice()))
    }
}

fn toml_from_str<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::Parse {
        message: e.to_string(),
    })
}

/// The built-in bilingual pattern set, adapted from the Transport
/// Canada CARs/STD vocabulary. FR rows are written accent-free; the
/// normalizer folds accents before matching.
pub fn default_patterns() -> Vec<PatternSpec> {
    use PatternLanguage::{En, Fr};
    use ReportCategory::*;

    let mut specs = Vec::new();
    let mut push = |category, pattern: &str, weight, label: &str, language| {
        specs.push(PatternSpec::new(category, pattern, weight, label, language));
    };

    // CARs/STD 625 Appendix B inspections
    push(InspectionAppB, r"625\s*APPENDI[XC]E?\s*B", 10, "CAR 625 Appendix B reference", En);
    push(InspectionAppB, r"STD\s*625\s*APP(?:ENDI[XC]E?)?\s*B", 10, "STD 625 App B reference", En);
    push(InspectionAppB, r"ANNUAL\s+INSPECTION", 5, "annual inspection", En);
    push(InspectionAppB, r"PERIODIC\s+INSPECTION", 4, "periodic inspection", En);
    push(InspectionAppB, r"100[\s-]*HOUR\s+INSPECTION", 4, "100-hour inspection", En);
    push(InspectionAppB, r"AIRWORTHINESS\s+INSPECTION", 4, "airworthiness inspection", En);
    push(InspectionAppB, r"INSPECTION\s+ANNUELLE", 5, "inspection annuelle", Fr);
    push(InspectionAppB, r"INSPECTION\s+PERIODIQUE", 4, "inspection periodique", Fr);
    push(InspectionAppB, r"RAC\s*625\s*APPENDICE\s*B", 10, "RAC 625 appendice B", Fr);

    // CARs/STD 625 Appendix C elementary work
    push(ElementaryWorkAppC, r"625\s*APPENDI[XC]E?\s*C", 10, "CAR 625 Appendix C reference", En);
    push(ElementaryWorkAppC, r"STD\s*625\s*APP(?:ENDI[XC]E?)?\s*C", 10, "STD 625 App C reference", En);
    push(ElementaryWorkAppC, r"ELEMENTARY\s+WORK", 5, "elementary work", En);
    push(ElementaryWorkAppC, r"OWNER[\s-]*MAINTENANCE", 4, "owner maintenance", En);
    push(ElementaryWorkAppC, r"TRAVAUX\s+ELEMENTAIRES", 5, "travaux elementaires", Fr);
    push(ElementaryWorkAppC, r"ENTRETIEN\s+PROPRIETAIRE", 4, "entretien proprietaire", Fr);

    // 24-month avionics checks
    push(Avionics24Month, r"571\.10", 10, "CAR 571.10 reference", En);
    push(Avionics24Month, r"605\.35", 10, "CAR 605.35 reference", En);
    push(Avionics24Month, r"STD\s*571\s*APP(?:ENDI[XC]E?)?\s*F", 10, "STD 571 App F reference", En);
    push(Avionics24Month, r"24[\s-]*MONTH", 5, "24-month check", En);
    push(Avionics24Month, r"24[\s-]*MOIS", 5, "24 mois", Fr);
    push(Avionics24Month, r"BIENNIAL", 4, "biennial check", En);
    push(Avionics24Month, r"ALTIMETER\s+(?:TEST|CHECK|CALIBRATION)", 5, "altimeter test", En);
    push(Avionics24Month, r"STATIC\s+SYSTEM\s+(?:TEST|CHECK)", 5, "static system test", En);
    push(Avionics24Month, r"TRANSPONDER\s+(?:TEST|CHECK)", 5, "transponder test", En);
    push(Avionics24Month, r"PITOT[\s-]*STATIC", 4, "pitot-static system", En);
    push(Avionics24Month, r"MODE\s*[CS]\s+(?:TEST|CHECK)", 3, "Mode C/S test", En);
    push(Avionics24Month, r"ALTIMETRE", 3, "altimetre", Fr);
    push(Avionics24Month, r"SYSTEME\s+STATIQUE", 3, "systeme statique", Fr);
    push(Avionics24Month, r"TRANSPONDEUR", 3, "transpondeur", Fr);

    // ELT inspections
    push(EltInspection, r"605\.38", 10, "CAR 605.38 reference", En);
    push(EltInspection, r"STD\s*571\s*APP(?:ENDI[XC]E?)?\s*G", 10, "STD 571 App G reference", En);
    push(EltInspection, r"ELT\s+(?:INSPECTION|TEST|CHECK)", 5, "ELT inspection", En);
    push(EltInspection, r"ELT\s+OPERATIONAL\s+TEST", 5, "ELT operational test", En);
    push(EltInspection, r"EMERGENCY\s+LOCATOR\s+TRANSMITTER", 5, "ELT full name", En);
    push(EltInspection, r"ELT\s+BATTERY", 4, "ELT battery", En);
    push(EltInspection, r"BALISE\s+DE\s+DETRESSE", 5, "balise de detresse", Fr);
    push(EltInspection, r"406\s*MHZ", 3, "406 MHz frequency", En);
    push(EltInspection, r"121\.5\s*MHZ", 3, "121.5 MHz frequency", En);

    // Compass swing
    push(CompassSwing, r"COMPASS\s+SWING", 10, "compass swing", En);
    push(CompassSwing, r"COMPENSATION\s+(?:DU\s+)?COMPAS", 10, "compensation compas", Fr);
    push(CompassSwing, r"DEVIATION\s+CARD", 5, "deviation card", En);
    push(CompassSwing, r"CARTE\s+DE\s+DEVIATION", 5, "carte de deviation", Fr);
    push(CompassSwing, r"MAGNETIC\s+COMPASS\s+(?:CALIBRATION|CHECK|TEST)", 5, "magnetic compass calibration", En);
    push(CompassSwing, r"COMPAS\s+MAGNETIQUE", 3, "compas magnetique", Fr);

    // Weight and balance
    push(WeightAndBalance, r"WEIGHT\s+AND\s+BALANCE", 10, "weight and balance", En);
    push(WeightAndBalance, r"MASSE\s+ET\s+CENTRAGE", 10, "masse et centrage", Fr);
    push(WeightAndBalance, r"AIRCRAFT\s+WEIGHING", 5, "aircraft weighing", En);
    push(WeightAndBalance, r"PESEE\s+(?:DE\s+L['\s]?)?AERONEF", 5, "pesee de l'aeronef", Fr);
    push(WeightAndBalance, r"EMPTY\s+WEIGHT", 5, "empty weight", En);
    push(WeightAndBalance, r"MASSE\s+A\s+VIDE", 5, "masse a vide", Fr);
    push(WeightAndBalance, r"C\.?G\.?\s+(?:CALCULATION|POSITION|LOCATION)", 4, "C.G. reference", En);
    push(WeightAndBalance, r"CENTRE\s+DE\s+GRAVITE", 4, "centre de gravite", Fr);
    push(WeightAndBalance, r"\bDATUM\b", 3, "datum reference", En);

    // STC modifications
    push(StcModification, r"INSTALLED\s+(?:IN\s+ACCORDANCE\s+WITH|PER|IAW)\s+STC", 10, "STC installation reference", En);
    push(StcModification, r"INSTALLE\s+(?:SELON|CONFORMEMENT\s+AU?)\s+STC", 10, "installe selon STC", Fr);
    push(StcModification, r"STC\s+(?:SA|ST|SR)\d{4,}", 10, "STC number", En);
    push(StcModification, r"SUPPLEMENTAL\s+TYPE\s+CERTIFICATE", 5, "STC full name", En);
    push(StcModification, r"CERTIFICAT\s+DE\s+TYPE\s+SUPPLEMENTAIRE", 5, "certificat de type supplementaire", Fr);
    push(StcModification, r"STC\s+INSTALLATION", 4, "STC installation", En);
    push(StcModification, r"APPROVED\s+MODIFICATION", 3, "approved modification", En);
    push(StcModification, r"MODIFICATION\s+APPROUVEE", 3, "modification approuvee", Fr);

    // Repairs
    push(Repair, r"MAJOR\s+REPAIR", 10, "major repair", En);
    push(Repair, r"REPARATION\s+MAJEURE", 10, "reparation majeure", Fr);
    push(Repair, r"STRUCTURAL\s+REPAIR", 10, "structural repair", En);
    push(Repair, r"REPARATION\s+STRUCTURALE", 10, "reparation structurale", Fr);
    push(Repair, r"MINOR\s+REPAIR", 5, "minor repair", En);
    push(Repair, r"REPARATION\s+MINEURE", 5, "reparation mineure", Fr);
    push(Repair, r"IN\s+ACCORDANCE\s+WITH\s+(?:APPROVED\s+)?DATA", 4, "approved data reference", En);
    push(Repair, r"DONNEES\s+APPROUVEES", 4, "donnees approuvees", Fr);
    push(Repair, r"REPAIR\s+(?:SCHEME|PROCEDURE|METHOD)", 3, "repair procedure", En);
    push(Repair, r"DAMAGE\s+REPAIR", 3, "damage repair", En);

    // Component overhauls
    push(ComponentOverhaul, r"OVERHAUL(?:ED)?", 10, "overhaul reference", En);
    push(ComponentOverhaul, r"REVISION\s+(?:GENERALE|COMPLETE)", 10, "revision generale", Fr);
    push(ComponentOverhaul, r"TSO[\s-]*\d+", 5, "TSO reference number", En);
    push(ComponentOverhaul, r"LIFE[\s-]*LIMITED\s+PART", 5, "life-limited part", En);
    push(ComponentOverhaul, r"PIECE\s+A\s+VIE\s+LIMITEE", 5, "piece a vie limitee", Fr);
    push(ComponentOverhaul, r"SINCE\s+(?:LAST\s+)?OVERHAUL", 4, "time since overhaul", En);
    push(ComponentOverhaul, r"DEPUIS\s+(?:DERNIERE\s+)?REVISION", 4, "depuis revision", Fr);
    push(ComponentOverhaul, r"TIME\s+BETWEEN\s+OVERHAUL", 4, "time between overhaul", En);
    push(ComponentOverhaul, r"\bTBO\b", 3, "TBO reference", En);
    push(ComponentOverhaul, r"\bLLP\b", 3, "LLP abbreviation", En);

    specs
}
