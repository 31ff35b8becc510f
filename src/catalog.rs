//! Substance Reference Catalog
//!
//! Static table of the substances the journal knows about. Loaded once,
//! never mutated. Potency equivalence is carried for reference only.

use crate::storage::OTHER_SUBSTANCE_ID;
use serde::Serialize;

/// A known substance and its reference metadata
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubstanceReference {
    /// Stable identifier referenced by `TakenMedicationEntry::substance_id`
    pub id: &'static str,
    /// Label, with the brand name in parentheses
    pub display_name: &'static str,
    /// Elimination half-life range, informational only
    pub half_life_hours: &'static str,
    /// 1 unit of this substance ≈ this many mg of diazepam
    pub potency_equivalence: f64,
    pub unit: &'static str,
    /// Display color (hex)
    pub color: &'static str,
}

impl SubstanceReference {
    /// Label without the parenthetical brand name
    pub fn short_name(&self) -> &'static str {
        self.display_name
            .split('(')
            .next()
            .unwrap_or(self.display_name)
            .trim()
    }
}

/// Unit assumed for doses of uncatalogued substances
pub const DEFAULT_UNIT: &str = "mg";

/// Color used for uncatalogued substances
pub const FALLBACK_COLOR: &str = "#cbd5e1";

/// All known substances, `"other"` last
pub static CATALOG: &[SubstanceReference] = &[
    SubstanceReference {
        id: "alprazolam",
        display_name: "Alprazolam (Xanax)",
        half_life_hours: "11-12",
        potency_equivalence: 20.0,
        unit: "mg",
        color: "#ff00ff",
    },
    SubstanceReference {
        id: "clonazepam",
        display_name: "Clonazepam (Klonopin)",
        half_life_hours: "18-50",
        potency_equivalence: 20.0,
        unit: "mg",
        color: "#00ffff",
    },
    SubstanceReference {
        id: "diazepam",
        display_name: "Diazepam (Valium)",
        half_life_hours: "20-100",
        potency_equivalence: 1.0,
        unit: "mg",
        color: "#ffff00",
    },
    SubstanceReference {
        id: "lorazepam",
        display_name: "Lorazepam (Ativan)",
        half_life_hours: "10-20",
        potency_equivalence: 10.0,
        unit: "mg",
        color: "#00ff00",
    },
    SubstanceReference {
        id: "oxazepam",
        display_name: "Oxazepam (Serax)",
        half_life_hours: "4-15",
        potency_equivalence: 0.5,
        unit: "mg",
        color: "#3b82f6",
    },
    SubstanceReference {
        id: "chlordiazepoxide",
        display_name: "Chlordiazepoxide (Librium)",
        half_life_hours: "5-30",
        potency_equivalence: 0.4,
        unit: "mg",
        color: "#f97316",
    },
    SubstanceReference {
        id: "temazepam",
        display_name: "Temazepam (Restoril)",
        half_life_hours: "8-22",
        potency_equivalence: 0.5,
        unit: "mg",
        color: "#ec4899",
    },
    SubstanceReference {
        id: OTHER_SUBSTANCE_ID,
        display_name: "Other",
        half_life_hours: "N/A",
        potency_equivalence: 0.0,
        unit: "mg",
        color: "#94a3b8",
    },
];

/// Look up a substance by id
pub fn find(id: &str) -> Option<&'static SubstanceReference> {
    CATALOG.iter().find(|s| s.id == id)
}

/// Short label for a substance id, falling back to the raw id
pub fn label_for(id: &str) -> String {
    find(id)
        .map(|s| s.short_name().to_string())
        .unwrap_or_else(|| id.to_string())
}

/// Unit for a substance id, falling back to mg
pub fn unit_for(id: &str) -> &'static str {
    find(id).map(|s| s.unit).unwrap_or(DEFAULT_UNIT)
}

/// Human label for a recorded dose, showing the custom name for `"other"`
pub fn dose_label(substance_id: &str, custom_name: Option<&str>) -> String {
    match (substance_id == OTHER_SUBSTANCE_ID, custom_name) {
        (true, Some(name)) => format!("{} (Other)", name),
        _ => find(substance_id)
            .map(|s| s.display_name.to_string())
            .unwrap_or_else(|| substance_id.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_unique_with_single_other() {
        let ids: HashSet<_> = CATALOG.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), CATALOG.len());
        assert_eq!(CATALOG.iter().filter(|s| s.id == "other").count(), 1);
    }

    #[test]
    fn test_short_name() {
        assert_eq!(find("alprazolam").unwrap().short_name(), "Alprazolam");
        assert_eq!(find("other").unwrap().short_name(), "Other");
    }

    #[test]
    fn test_unknown_id_falls_back() {
        assert_eq!(label_for("phenibut"), "phenibut");
        assert_eq!(unit_for("phenibut"), "mg");
        assert_eq!(dose_label("phenibut", None), "phenibut");
    }

    #[test]
    fn test_dose_label_for_other() {
        assert_eq!(dose_label("other", Some("Gabapentin")), "Gabapentin (Other)");
        assert_eq!(dose_label("diazepam", None), "Diazepam (Valium)");
    }
}
