use maplit::hashmap;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// Label substituted when a record carries no branch name
pub const UNKNOWN_BRANCH: &str = "unknown";
/// Label substituted when a stage aggregation carries no name
pub const UNKNOWN_STAGE: &str = "unknown stage";

/// Color class for canonical stages not present in the catalog
const DEFAULT_COLOR: &str = "gray";

/// Canonical stage name: the part before the first `-`, trimmed.
///
/// The liaison service embeds a branch-disambiguating suffix after a dash
/// ("شحنات سلمت بنجاح - الفرع أ"); classification and colors key off the
/// prefix while the raw label stays visible to the user.
pub fn canonical_stage_name(raw: &str) -> String {
    match raw.split_once('-') {
        Some((prefix, _)) => prefix.trim().to_string(),
        None => raw.trim().to_string(),
    }
}

/// Stage classification catalog: display colors per canonical stage name
/// and the set of stages counted as successful delivery.
///
/// This is configuration data, not logic — the defaults below mirror the
/// current delivery pipeline and can be overridden via the `[stages]`
/// section of config.toml.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StageCatalog {
    pub colors: HashMap<String, String>,
    pub success: HashSet<String>,
}

impl Default for StageCatalog {
    fn default() -> Self {
        let colors = hashmap! {
            "شحنات سلمت بنجاح".to_string() => "darkgreen".to_string(),
            "راجع عند المندوب".to_string() => "lightcoral".to_string(),
            "رواجع الفروع في المخزن".to_string() => "darkred".to_string(),
            "مؤجل".to_string() => "purple".to_string(),
            "راجع مؤكد".to_string() => "firebrick".to_string(),
            "قيد التوصيل".to_string() => "skyblue".to_string(),
            "راجع كلي".to_string() => "maroon".to_string(),
            "تسليم جزئيا أو أستبدال".to_string() => "lightgreen".to_string(),
            "إعادة توصيل".to_string() => "lightskyblue".to_string(),
            "سلمت مع تغيير المبلغ".to_string() => "lightgreen".to_string(),
            "طباعة المنفيست لمندوبين التوصيل".to_string() => "lightskyblue".to_string(),
            "داخل المخزن".to_string() => "gold".to_string(),
            "شحنات جديدة بين فرعين".to_string() => "gold".to_string(),
        };
        let success = [
            "تسليم جزئيا أو أستبدال",
            "سلمت مع تغيير المبلغ",
            "شحنات سلمت بنجاح",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self { colors, success }
    }
}

impl StageCatalog {
    /// Display color class for a raw stage label; never fails
    pub fn color_class(&self, raw_stage: &str) -> String {
        let canonical = canonical_stage_name(raw_stage);
        self.colors
            .get(&canonical)
            .cloned()
            .unwrap_or_else(|| DEFAULT_COLOR.to_string())
    }

    /// Whether the stage (after canonicalization) counts as delivered
    pub fn is_success_stage(&self, raw_stage: &str) -> bool {
        self.success.contains(&canonical_stage_name(raw_stage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_strips_branch_suffix() {
        assert_eq!(
            canonical_stage_name("شحنات سلمت بنجاح - الفرع أ"),
            "شحنات سلمت بنجاح"
        );
    }

    #[test]
    fn test_canonical_splits_on_first_dash_only() {
        assert_eq!(canonical_stage_name("a - b - c"), "a");
    }

    #[test]
    fn test_canonical_without_dash_trims() {
        assert_eq!(canonical_stage_name("  قيد التوصيل  "), "قيد التوصيل");
    }

    #[test]
    fn test_default_catalog_contents() {
        let catalog = StageCatalog::default();
        assert_eq!(catalog.colors.len(), 13);
        assert_eq!(catalog.success.len(), 3);
        assert!(catalog.success.contains("شحنات سلمت بنجاح"));
    }

    #[test]
    fn test_color_class_for_known_stage() {
        let catalog = StageCatalog::default();
        assert_eq!(catalog.color_class("مؤجل"), "purple");
    }

    #[test]
    fn test_color_class_ignores_branch_suffix() {
        let catalog = StageCatalog::default();
        assert_eq!(catalog.color_class("قيد التوصيل - فرع بغداد"), "skyblue");
    }

    #[test]
    fn test_color_class_defaults_to_gray() {
        let catalog = StageCatalog::default();
        assert_eq!(catalog.color_class("этап которого нет"), "gray");
    }

    #[test]
    fn test_success_stage_with_suffix() {
        let catalog = StageCatalog::default();
        assert!(catalog.is_success_stage("شحنات سلمت بنجاح - الفرع أ"));
        assert!(!catalog.is_success_stage("مؤجل"));
    }
}
