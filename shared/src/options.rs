//! Closed option sets shown in the left bar, and the canvas pages.

use serde::{Deserialize, Serialize};

/// A fixed list of labelled choices with one default.
pub trait OptionSet: Copy + PartialEq + Default + 'static {
    /// Caption shown above the selector.
    const TITLE: &'static str;
    const ALL: &'static [Self];

    fn label(self) -> &'static str;

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|option| option.label() == label)
    }

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|option| option.label()).collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
    German,
    Japanese,
    Chinese,
}

impl OptionSet for Language {
    const TITLE: &'static str = "Language";
    const ALL: &'static [Self] = &[
        Self::English,
        Self::Hindi,
        Self::German,
        Self::Japanese,
        Self::Chinese,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Hindi => "Hindi",
            Self::German => "German",
            Self::Japanese => "Japanese",
            Self::Chinese => "Chinese",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    #[default]
    Cherry,
    #[serde(rename = "OEM")]
    Oem,
    #[serde(rename = "DSA")]
    Dsa,
    #[serde(rename = "XDA")]
    Xda,
    #[serde(rename = "MDA")]
    Mda,
}

impl OptionSet for Profile {
    const TITLE: &'static str = "Profile";
    const ALL: &'static [Self] = &[Self::Cherry, Self::Oem, Self::Dsa, Self::Xda, Self::Mda];

    fn label(self) -> &'static str {
        match self {
            Self::Cherry => "Cherry",
            Self::Oem => "OEM",
            Self::Dsa => "DSA",
            Self::Xda => "XDA",
            Self::Mda => "MDA",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubLegend {
    #[default]
    None,
    Devanagari,
    Japanese,
    Roman,
}

impl OptionSet for SubLegend {
    const TITLE: &'static str = "Sub-legend";
    const ALL: &'static [Self] = &[Self::None, Self::Devanagari, Self::Japanese, Self::Roman];

    fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Devanagari => "Devanagari",
            Self::Japanese => "Japanese",
            Self::Roman => "Roman",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitDisplay {
    #[default]
    Hide,
    Show,
}

impl OptionSet for UnitDisplay {
    const TITLE: &'static str = "Keycap Units";
    const ALL: &'static [Self] = &[Self::Hide, Self::Show];

    fn label(self) -> &'static str {
        match self {
            Self::Hide => "Hide",
            Self::Show => "Show",
        }
    }
}

// ===== PAGES =====

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PageId {
    #[default]
    Design,
    #[serde(rename = "r1-r2")]
    R1R2,
    #[serde(rename = "r3-r4")]
    R3R4,
}

impl PageId {
    pub const ALL: [PageId; 3] = [PageId::Design, PageId::R1R2, PageId::R3R4];

    pub fn label(self) -> &'static str {
        match self {
            PageId::Design => "Design",
            PageId::R1R2 => "R1-R2 Template",
            PageId::R3R4 => "R3-R4 Template",
        }
    }

    /// Stable identifier used in configuration files.
    pub fn key(self) -> &'static str {
        match self {
            PageId::Design => "design",
            PageId::R1R2 => "r1-r2",
            PageId::R3R4 => "r3-r4",
        }
    }

    pub fn from_key(key: &str) -> Option<PageId> {
        PageId::ALL.into_iter().find(|page| page.key() == key)
    }

    /// File name of the artwork rendered on this page.
    pub fn asset_file(self) -> &'static str {
        match self {
            PageId::Design => "FullPreview.svg",
            PageId::R1R2 => "R1R2.svg",
            PageId::R3R4 => "R3R4.svg",
        }
    }

    /// Class prefix keeping this page's styles apart from the other pages'.
    pub fn default_namespace_prefix(self) -> &'static str {
        match self {
            PageId::Design => "fp_",
            PageId::R1R2 => "r12_",
            PageId::R3R4 => "r34_",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_choice() {
        assert_eq!(Language::default(), Language::English);
        assert_eq!(Profile::default(), Profile::Cherry);
        assert_eq!(SubLegend::default(), SubLegend::None);
        assert_eq!(UnitDisplay::default(), UnitDisplay::Hide);
        assert_eq!(PageId::default(), PageId::Design);
    }

    #[test]
    fn labels_are_closed_sets() {
        assert_eq!(Language::labels(), vec!["English", "Hindi", "German", "Japanese", "Chinese"]);
        assert_eq!(Profile::labels(), vec!["Cherry", "OEM", "DSA", "XDA", "MDA"]);
        assert_eq!(SubLegend::labels(), vec!["None", "Devanagari", "Japanese", "Roman"]);
        assert_eq!(UnitDisplay::labels(), vec!["Hide", "Show"]);
    }

    #[test]
    fn from_label_rejects_unknown_values() {
        assert_eq!(Profile::from_label("DSA"), Some(Profile::Dsa));
        assert_eq!(Profile::from_label("dsa"), None);
        assert_eq!(Language::from_label("Klingon"), None);
    }

    #[test]
    fn page_keys_round_trip() {
        for page in PageId::ALL {
            assert_eq!(PageId::from_key(page.key()), Some(page));
        }
        assert_eq!(PageId::from_key("r5-r6"), None);
    }

    #[test]
    fn page_prefixes_are_distinct() {
        let prefixes: std::collections::HashSet<_> =
            PageId::ALL.iter().map(|page| page.default_namespace_prefix()).collect();
        assert_eq!(prefixes.len(), PageId::ALL.len());
    }
}
