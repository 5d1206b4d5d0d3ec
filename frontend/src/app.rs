//! KeycapApp - owns every domain and the root element.

use std::rc::Rc;

use shared::{LayerPanelState, LayerTree, PageId};
use zoon::*;

use crate::config::AppConfig;
use crate::connection::{ConnectionAdapter, start_connection};
use crate::dataflow::Actor;
use crate::error_display::{ErrorDisplay, toast_notifications};
use crate::layer_panel::LayerPanel;
use crate::svg_preview::SvgPreviewHandle;

/// One preview handle per page; only the active page is mounted.
#[derive(Clone, Default)]
pub struct PagePreviews {
    design: SvgPreviewHandle,
    r1_r2: SvgPreviewHandle,
    r3_r4: SvgPreviewHandle,
}

impl PagePreviews {
    pub fn handle(&self, page: PageId) -> &SvgPreviewHandle {
        match page {
            PageId::Design => &self.design,
            PageId::R1R2 => &self.r1_r2,
            PageId::R3R4 => &self.r3_r4,
        }
    }
}

pub struct KeycapApp {
    pub config: AppConfig,
    pub layer_panel: LayerPanel,
    pub error_display: ErrorDisplay,
    pub previews: PagePreviews,

    connection: Rc<ConnectionAdapter>,
    down_msg_handler: Actor<()>,
}

impl KeycapApp {
    pub fn new() -> Self {
        let config = AppConfig::new();
        let error_display = ErrorDisplay::new();
        let initial_layers = LayerPanelState::seeded().unwrap_or_else(|error| {
            zoon::eprintln!("Layer seed rejected: {}", error);
            LayerPanelState::new(LayerTree::empty(), [])
        });
        let layer_panel = LayerPanel::new(initial_layers);
        let (connection, down_msg_handler) = start_connection(&config, &error_display);

        KeycapApp {
            config,
            layer_panel,
            error_display,
            previews: PagePreviews::default(),
            connection,
            down_msg_handler,
        }
    }

    pub fn root(self) -> impl Element {
        let KeycapApp {
            config,
            layer_panel,
            error_display,
            previews,
            connection,
            down_msg_handler,
        } = self;

        Stack::new()
            .s(Width::fill())
            .s(Height::screen())
            .s(Background::new().color("rgb(250, 250, 250)"))
            .s(Font::new().family([
                FontFamily::new("Inter"),
                FontFamily::new("system-ui"),
                FontFamily::new("Segoe UI"),
                FontFamily::new("Arial"),
                FontFamily::SansSerif,
            ]))
            .layer(
                Row::new()
                    .s(Width::fill())
                    .s(Height::fill())
                    .item(crate::views::left_bar(config.clone(), layer_panel))
                    .item(crate::views::main_area(
                        config,
                        previews,
                        error_display.clone(),
                    )),
            )
            .layer(toast_notifications(error_display))
            .after_remove(move |_| {
                // Keep the backend connection alive as long as the app is mounted
                drop(connection);
                drop(down_msg_handler);
            })
    }
}
