use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pdfpress_engine::{
    default_variants, BrowserSettings, EngineConfig, ExportSettings, LanguageVariant,
    WatchSettings,
};
use press_logging::{press_info, press_warn};
use serde::{Deserialize, Serialize};

const PROFILE_FILENAME: &str = "pdfpress.ron";

/// Deployment profile: the variant table and timing knobs, as RON. Every
/// field has a default, so a missing or broken file never blocks a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportProfile {
    pub variants: Vec<VariantEntry>,
    pub element_timeout_ms: u64,
    pub settle_delay_ms: u64,
    pub inter_variant_delay_ms: u64,
    pub dialog_timeout_ms: u64,
    pub dialog_title_pattern: String,
    pub priming_export: bool,
    pub poll_interval_ms: u64,
    pub export_timeout_ms: u64,
    pub min_pdf_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VariantEntry {
    pub selector_label: String,
    pub tag: String,
}

impl Default for ExportProfile {
    fn default() -> Self {
        let export = ExportSettings::default();
        Self {
            variants: default_variants()
                .into_iter()
                .map(|variant| VariantEntry {
                    selector_label: variant.selector_label,
                    tag: variant.tag,
                })
                .collect(),
            element_timeout_ms: export.element_timeout.as_millis() as u64,
            settle_delay_ms: export.settle_delay.as_millis() as u64,
            inter_variant_delay_ms: export.inter_variant_delay.as_millis() as u64,
            dialog_timeout_ms: export.dialog_timeout.as_millis() as u64,
            dialog_title_pattern: export.dialog_title_pattern,
            priming_export: export.priming_export,
            poll_interval_ms: export.watch.poll_interval.as_millis() as u64,
            export_timeout_ms: export.watch.timeout.as_millis() as u64,
            min_pdf_bytes: export.watch.min_bytes,
        }
    }
}

impl ExportProfile {
    pub fn into_engine_config(self, output_root: PathBuf) -> EngineConfig {
        EngineConfig {
            variants: self
                .variants
                .into_iter()
                .map(|entry| LanguageVariant::new(entry.selector_label, entry.tag))
                .collect(),
            output_root,
            export: ExportSettings {
                element_timeout: Duration::from_millis(self.element_timeout_ms),
                settle_delay: Duration::from_millis(self.settle_delay_ms),
                inter_variant_delay: Duration::from_millis(self.inter_variant_delay_ms),
                dialog_timeout: Duration::from_millis(self.dialog_timeout_ms),
                dialog_title_pattern: self.dialog_title_pattern,
                priming_export: self.priming_export,
                watch: WatchSettings {
                    poll_interval: Duration::from_millis(self.poll_interval_ms),
                    timeout: Duration::from_millis(self.export_timeout_ms),
                    min_bytes: self.min_pdf_bytes,
                },
            },
            browser: BrowserSettings::default(),
        }
    }
}

/// Loads the profile from `path`, or `./pdfpress.ron` when none is given.
/// Missing file: defaults. Unreadable or unparsable file: warn + defaults.
pub fn load(path: Option<&Path>) -> ExportProfile {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(PROFILE_FILENAME));
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return ExportProfile::default();
        }
        Err(err) => {
            press_warn!("Failed to read export profile from {:?}: {}", path, err);
            return ExportProfile::default();
        }
    };
    match ron::from_str(&content) {
        Ok(profile) => {
            press_info!("Loaded export profile from {:?}", path);
            profile
        }
        Err(err) => {
            press_warn!("Failed to parse export profile from {:?}: {}", path, err);
            ExportProfile::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_profile_carries_the_variant_table() {
        let profile = ExportProfile::default();
        assert_eq!(profile.variants.len(), 3);
        assert_eq!(profile.variants[0].selector_label, "打印中英文");
        assert_eq!(profile.variants[0].tag, "中英文");
        assert!(profile.priming_export);
    }

    #[test]
    fn profile_round_trips_through_ron() {
        let profile = ExportProfile::default();
        let pretty = ron::ser::PrettyConfig::new();
        let text = ron::ser::to_string_pretty(&profile, pretty).unwrap();
        let restored: ExportProfile = ron::from_str(&text).unwrap();
        assert_eq!(restored, profile);
    }

    #[test]
    fn missing_profile_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.ron");
        assert_eq!(load(Some(&path)), ExportProfile::default());
    }

    #[test]
    fn broken_profile_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.ron");
        fs::write(&path, "(this is not ron").unwrap();
        assert_eq!(load(Some(&path)), ExportProfile::default());
    }

    #[test]
    fn engine_config_converts_durations() {
        let mut profile = ExportProfile::default();
        profile.element_timeout_ms = 1234;
        profile.min_pdf_bytes = 99;
        let config = profile.into_engine_config(PathBuf::from("/tmp/out"));
        assert_eq!(config.export.element_timeout, Duration::from_millis(1234));
        assert_eq!(config.export.watch.min_bytes, 99);
        assert_eq!(config.output_root, PathBuf::from("/tmp/out"));
    }
}
