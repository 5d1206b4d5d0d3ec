use serde::{Deserialize, Serialize};

pub mod config;
pub mod layers;
pub mod options;
pub mod svg;

pub use config::AppConfig;
pub use layers::{LayerKind, LayerNode, LayerPanelState, LayerTree, LayerTreeError, Modifiers};
pub use options::{Language, OptionSet, PageId, Profile, SubLegend, UnitDisplay};
pub use svg::{LoadPhase, SvgHost, SvgInjector, SvgLoadError};

// ===== MESSAGE TYPES =====

#[derive(Serialize, Deserialize, Debug)]
pub enum UpMsg {
    LoadConfig,
}

#[derive(Serialize, Deserialize, Debug)]
pub enum DownMsg {
    ConfigLoaded(AppConfig),
    ConfigError(String),
}
