use serde::{Deserialize, Serialize};

use crate::options::{Language, OptionSet, PageId, Profile, SubLegend, UnitDisplay};

pub const DEFAULT_PROJECT_NAME: &str = "Keycap Configurator";
pub const DEFAULT_ASSET_DIR: &str = "/_api/public/";
pub const DEFAULT_EXPORT_FILENAME: &str = "keycap-export.svg";

// ===== CONFIG TYPES =====

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub project: ProjectSection,
    pub canvas: CanvasSection,
    pub export: ExportSection,
    pub defaults: DefaultsSection,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Replaces values the configurator cannot use with defaults and
    /// returns one warning per replaced value.
    pub fn validate_and_fix(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.app.is_supported_version() {
            warnings.push(format!(
                "Unsupported config version '{}', using defaults",
                self.app.version
            ));
            *self = AppConfig::default();
            return warnings;
        }

        if self.project.name.trim().is_empty() {
            warnings.push("Empty project name replaced with default".to_string());
            self.project.name = DEFAULT_PROJECT_NAME.to_string();
        }

        if self.canvas.asset_dir.trim().is_empty() {
            warnings.push("Empty asset directory replaced with default".to_string());
            self.canvas.asset_dir = DEFAULT_ASSET_DIR.to_string();
        }

        for page in PageId::ALL {
            let prefix = self.canvas.prefix_slot(page);
            if !is_valid_prefix(prefix) {
                warnings.push(format!(
                    "Invalid namespace prefix '{}' for page '{}'",
                    prefix,
                    page.key()
                ));
                *prefix = page.default_namespace_prefix().to_string();
            }
        }

        if self.export.default_filename.trim().is_empty() {
            warnings.push("Empty export filename replaced with default".to_string());
            self.export.default_filename = DEFAULT_EXPORT_FILENAME.to_string();
        }

        warnings.extend(self.defaults.fix_unknown_labels());
        warnings
    }
}

// AppSection carries the config format version so old files can be detected.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppSection {
    pub version: String,
}

impl AppSection {
    /// Current configuration format version
    pub const CURRENT_VERSION: &'static str = "1.0.0";

    pub fn is_supported_version(&self) -> bool {
        matches!(self.version.as_str(), "1.0.0")
    }
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ProjectSection {
    pub name: String,
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROJECT_NAME.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CanvasSection {
    /// URL directory the page artwork is fetched from.
    pub asset_dir: String,
    pub design_prefix: String,
    pub r1_r2_prefix: String,
    pub r3_r4_prefix: String,
}

impl CanvasSection {
    pub fn asset_url(&self, page: PageId) -> String {
        format!("{}/{}", self.asset_dir.trim_end_matches('/'), page.asset_file())
    }

    pub fn namespace_prefix(&self, page: PageId) -> &str {
        match page {
            PageId::Design => &self.design_prefix,
            PageId::R1R2 => &self.r1_r2_prefix,
            PageId::R3R4 => &self.r3_r4_prefix,
        }
    }

    fn prefix_slot(&mut self, page: PageId) -> &mut String {
        match page {
            PageId::Design => &mut self.design_prefix,
            PageId::R1R2 => &mut self.r1_r2_prefix,
            PageId::R3R4 => &mut self.r3_r4_prefix,
        }
    }
}

impl Default for CanvasSection {
    fn default() -> Self {
        Self {
            asset_dir: DEFAULT_ASSET_DIR.to_string(),
            design_prefix: PageId::Design.default_namespace_prefix().to_string(),
            r1_r2_prefix: PageId::R1R2.default_namespace_prefix().to_string(),
            r3_r4_prefix: PageId::R3R4.default_namespace_prefix().to_string(),
        }
    }
}

// Prefixes end up inside CSS selectors and class attributes.
fn is_valid_prefix(prefix: &str) -> bool {
    !prefix.is_empty()
        && prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !prefix.starts_with(|c: char| c.is_ascii_digit())
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ExportSection {
    pub default_filename: String,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            default_filename: DEFAULT_EXPORT_FILENAME.to_string(),
        }
    }
}

/// Initial selector values, stored as display labels.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DefaultsSection {
    pub language: String,
    pub profile: String,
    pub sub_legend: String,
    pub unit_display: String,
    pub page: String,
}

impl DefaultsSection {
    pub fn language(&self) -> Language {
        Language::from_label(&self.language).unwrap_or_default()
    }

    pub fn profile(&self) -> Profile {
        Profile::from_label(&self.profile).unwrap_or_default()
    }

    pub fn sub_legend(&self) -> SubLegend {
        SubLegend::from_label(&self.sub_legend).unwrap_or_default()
    }

    pub fn unit_display(&self) -> UnitDisplay {
        UnitDisplay::from_label(&self.unit_display).unwrap_or_default()
    }

    pub fn page(&self) -> PageId {
        PageId::from_key(&self.page).unwrap_or_default()
    }

    fn fix_unknown_labels(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();
        fix_label::<Language>(&mut self.language, &mut warnings);
        fix_label::<Profile>(&mut self.profile, &mut warnings);
        fix_label::<SubLegend>(&mut self.sub_legend, &mut warnings);
        fix_label::<UnitDisplay>(&mut self.unit_display, &mut warnings);
        if PageId::from_key(&self.page).is_none() {
            warnings.push(format!("Unknown page '{}' replaced with default", self.page));
            self.page = PageId::default().key().to_string();
        }
        warnings
    }
}

fn fix_label<T: OptionSet>(label: &mut String, warnings: &mut Vec<String>) {
    if T::from_label(label).is_none() {
        warnings.push(format!("Unknown {} '{}' replaced with default", T::TITLE, label));
        *label = T::default().label().to_string();
    }
}

impl Default for DefaultsSection {
    fn default() -> Self {
        Self {
            language: Language::default().label().to_string(),
            profile: Profile::default().label().to_string(),
            sub_legend: SubLegend::default().label().to_string(),
            unit_display: UnitDisplay::default().label().to_string(),
            page: PageId::default().key().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.export.default_filename, "keycap-export.svg");
        assert_eq!(config.canvas.namespace_prefix(PageId::Design), "fp_");
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let config = AppConfig::from_toml_str(
            r#"
            [project]
            name = "Devanagari Set"

            [defaults]
            profile = "DSA"
            page = "r3-r4"
            "#,
        )
        .expect("valid config");
        assert_eq!(config.project.name, "Devanagari Set");
        assert_eq!(config.defaults.profile(), Profile::Dsa);
        assert_eq!(config.defaults.page(), PageId::R3R4);
        assert_eq!(config.defaults.language(), Language::English);
    }

    #[test]
    fn unknown_labels_are_fixed_with_warnings() {
        let mut config = AppConfig::from_toml_str(
            r#"
            [defaults]
            language = "Klingon"
            unit_display = "Show"
            page = "r9"
            "#,
        )
        .expect("valid config");
        let warnings = config.validate_and_fix();
        assert_eq!(warnings.len(), 2);
        assert_eq!(config.defaults.language, "English");
        assert_eq!(config.defaults.unit_display(), UnitDisplay::Show);
        assert_eq!(config.defaults.page, "design");
    }

    #[test]
    fn invalid_prefix_falls_back_to_page_default() {
        let mut config = AppConfig::default();
        config.canvas.r1_r2_prefix = "bad prefix".to_string();
        config.canvas.r3_r4_prefix = "9x_".to_string();
        let warnings = config.validate_and_fix();
        assert_eq!(warnings.len(), 2);
        assert_eq!(config.canvas.namespace_prefix(PageId::R1R2), "r12_");
        assert_eq!(config.canvas.namespace_prefix(PageId::R3R4), "r34_");
    }

    #[test]
    fn unsupported_version_resets_config() {
        let mut config = AppConfig::from_toml_str(
            r#"
            [app]
            version = "0.1.0"

            [project]
            name = "Old"
            "#,
        )
        .expect("valid config");
        let warnings = config.validate_and_fix();
        assert_eq!(warnings.len(), 1);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn asset_url_joins_directory_and_file() {
        let mut canvas = CanvasSection::default();
        assert_eq!(canvas.asset_url(PageId::Design), "/_api/public/FullPreview.svg");
        canvas.asset_dir = "/assets".to_string();
        assert_eq!(canvas.asset_url(PageId::R3R4), "/assets/R3R4.svg");
    }

    #[test]
    fn written_config_reads_back() {
        let mut config = AppConfig::default();
        config.project.name = "Hindi Legends".to_string();
        let text = config.to_toml_string().expect("serializable");
        assert_eq!(AppConfig::from_toml_str(&text).expect("parses"), config);
    }
}
