use crate::dataflow::{Actor, Relay, relay};
use futures::{StreamExt, select};
use shared::{
    AppConfig as SharedAppConfig, Language, PageId, Profile, SubLegend, UnitDisplay,
};
use zoon::Signal;

/// Values the left bar edits, seeded from the configuration's defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfiguratorSettings {
    pub loaded: SharedAppConfig,
    pub project_name: String,
    pub language: Language,
    pub profile: Profile,
    pub sub_legend: SubLegend,
    pub unit_display: UnitDisplay,
    pub page: PageId,
}

impl ConfiguratorSettings {
    pub fn from_config(config: SharedAppConfig) -> Self {
        Self {
            project_name: config.project.name.clone(),
            language: config.defaults.language(),
            profile: config.defaults.profile(),
            sub_legend: config.defaults.sub_legend(),
            unit_display: config.defaults.unit_display(),
            page: config.defaults.page(),
            loaded: config,
        }
    }

    pub fn asset_url(&self, page: PageId) -> String {
        self.loaded.canvas.asset_url(page)
    }

    pub fn namespace_prefix(&self, page: PageId) -> String {
        self.loaded.canvas.namespace_prefix(page).to_string()
    }

    pub fn export_filename(&self) -> String {
        self.loaded.export.default_filename.clone()
    }
}

impl Default for ConfiguratorSettings {
    fn default() -> Self {
        Self::from_config(SharedAppConfig::default())
    }
}

/// Configuration domain. Starts from defaults and is replaced once the
/// backend answers; edits live only for the session.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub settings_actor: Actor<ConfiguratorSettings>,

    pub config_loaded_relay: Relay<SharedAppConfig>,
    pub project_name_changed_relay: Relay<String>,
    pub language_selected_relay: Relay<Language>,
    pub profile_selected_relay: Relay<Profile>,
    pub sub_legend_selected_relay: Relay<SubLegend>,
    pub unit_display_selected_relay: Relay<UnitDisplay>,
    pub page_selected_relay: Relay<PageId>,
}

impl AppConfig {
    pub fn new() -> Self {
        let (config_loaded_relay, mut config_loaded_stream) = relay::<SharedAppConfig>();
        let (project_name_changed_relay, mut project_name_changed_stream) = relay::<String>();
        let (language_selected_relay, mut language_selected_stream) = relay::<Language>();
        let (profile_selected_relay, mut profile_selected_stream) = relay::<Profile>();
        let (sub_legend_selected_relay, mut sub_legend_selected_stream) = relay::<SubLegend>();
        let (unit_display_selected_relay, mut unit_display_selected_stream) =
            relay::<UnitDisplay>();
        let (page_selected_relay, mut page_selected_stream) = relay::<PageId>();

        let settings_actor = Actor::new(ConfiguratorSettings::default(), async move |state| {
            loop {
                select! {
                    config = config_loaded_stream.next() => {
                        if let Some(config) = config {
                            state.set_neq(ConfiguratorSettings::from_config(config));
                        }
                    }
                    name = project_name_changed_stream.next() => {
                        if let Some(name) = name {
                            state.update_mut(|settings| settings.project_name = name);
                        }
                    }
                    language = language_selected_stream.next() => {
                        if let Some(language) = language {
                            state.update_mut(|settings| settings.language = language);
                        }
                    }
                    profile = profile_selected_stream.next() => {
                        if let Some(profile) = profile {
                            state.update_mut(|settings| settings.profile = profile);
                        }
                    }
                    sub_legend = sub_legend_selected_stream.next() => {
                        if let Some(sub_legend) = sub_legend {
                            state.update_mut(|settings| settings.sub_legend = sub_legend);
                        }
                    }
                    unit_display = unit_display_selected_stream.next() => {
                        if let Some(unit_display) = unit_display {
                            state.update_mut(|settings| settings.unit_display = unit_display);
                        }
                    }
                    page = page_selected_stream.next() => {
                        if let Some(page) = page {
                            state.update_mut(|settings| settings.page = page);
                        }
                    }
                    complete => break,
                }
            }
        });

        Self {
            settings_actor,
            config_loaded_relay,
            project_name_changed_relay,
            language_selected_relay,
            profile_selected_relay,
            sub_legend_selected_relay,
            unit_display_selected_relay,
            page_selected_relay,
        }
    }

    pub fn page_signal(&self) -> impl Signal<Item = PageId> + use<> {
        self.settings_actor.signal_ref(|settings| settings.page)
    }

    pub fn project_name_signal(&self) -> impl Signal<Item = String> + use<> {
        self.settings_actor
            .signal_ref(|settings| settings.project_name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_configured_defaults() {
        let config = SharedAppConfig::from_toml_str(
            r#"
            [project]
            name = "Devanagari Set"

            [canvas]
            r3_r4_prefix = "row34_"

            [defaults]
            language = "Hindi"
            sub_legend = "Devanagari"
            page = "r3-r4"
            "#,
        )
        .expect("valid config");

        let settings = ConfiguratorSettings::from_config(config);
        assert_eq!(settings.project_name, "Devanagari Set");
        assert_eq!(settings.language, Language::Hindi);
        assert_eq!(settings.sub_legend, SubLegend::Devanagari);
        assert_eq!(settings.profile, Profile::Cherry);
        assert_eq!(settings.page, PageId::R3R4);
        assert_eq!(settings.namespace_prefix(PageId::R3R4), "row34_");
        assert_eq!(settings.asset_url(PageId::R1R2), "/_api/public/R1R2.svg");
    }

    #[test]
    fn default_settings_use_default_export_name() {
        let settings = ConfiguratorSettings::default();
        assert_eq!(settings.export_filename(), "keycap-export.svg");
        assert_eq!(settings.page, PageId::Design);
    }
}
