use shared::{
    Language, LayerNode, LoadPhase, Modifiers, OptionSet, PageId, Profile, SubLegend,
    UnitDisplay,
};
use zoon::*;

use crate::app::PagePreviews;
use crate::config::AppConfig;
use crate::dataflow::Atom;
use crate::error_display::{ErrorAlert, ErrorDisplay};
use crate::layer_panel::{LayerPanel, request_selection_clear};
use crate::svg_preview::{SvgPreviewHandle, svg_preview};

const BORDER_COLOR: &str = "rgb(209, 213, 219)";
const MUTED_TEXT: &str = "rgb(107, 114, 128)";
const SELECTED_ROW: &str = "rgb(229, 231, 235)";
const HOVERED_ROW: &str = "rgb(243, 244, 246)";
const FIELD_BACKGROUND: &str = "rgb(243, 244, 246)";

const ROW_INDENT: u32 = 16;
const ROW_BASE_PADDING: u32 = 4;

// ===== LEFT BAR =====

pub fn left_bar(config: AppConfig, layer_panel: LayerPanel) -> impl Element {
    Column::new()
        .s(Width::exact(256))
        .s(Height::fill())
        .s(Background::new().color("white"))
        .s(Borders::new().right(Border::new().color(BORDER_COLOR)))
        .item(header(config.clone()))
        .item(option_selectors(config.clone()))
        .item(layers_section(layer_panel))
        .item(pages_section(config))
}

fn section_title(title: &'static str) -> impl Element {
    El::new()
        .s(Padding::new().x(4).bottom(6))
        .s(Font::new().size(12).weight(FontWeight::SemiBold).color(MUTED_TEXT))
        .child(title)
}

fn header(config: AppConfig) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Padding::all(12))
        .s(Gap::new().y(8))
        .s(Borders::new().bottom(Border::new().color(BORDER_COLOR)))
        .item(
            El::new()
                .s(Padding::new().left(8))
                .s(Font::new().size(16).weight(FontWeight::Bold))
                .child("Keycap Configurator"),
        )
        .item(project_name_input(config))
}

fn project_name_input(config: AppConfig) -> impl Element {
    TextInput::new()
        .s(Width::fill())
        .s(Padding::new().x(8).y(6))
        .s(RoundedCorners::all(6))
        .s(Font::new().size(14))
        .label_hidden("Project name")
        .placeholder(Placeholder::new("Enter name"))
        .text_signal(config.project_name_signal())
        .on_change(move |name| config.project_name_changed_relay.send(name))
}

fn option_selectors(config: AppConfig) -> impl Element {
    let settings = config.settings_actor.clone();
    Column::new()
        .s(Width::fill())
        .s(Padding::all(12))
        .s(Gap::new().y(4))
        .s(Borders::new().bottom(Border::new().color(BORDER_COLOR)))
        .item(
            Row::new()
                .s(Gap::new().x(4))
                .item(option_selector(
                    settings.signal_ref(|settings| settings.language),
                    {
                        let relay = config.language_selected_relay.clone();
                        move |language: Language| relay.send(language)
                    },
                ))
                .item(option_selector(
                    settings.signal_ref(|settings| settings.profile),
                    {
                        let relay = config.profile_selected_relay.clone();
                        move |profile: Profile| relay.send(profile)
                    },
                )),
        )
        .item(
            Row::new()
                .s(Gap::new().x(4))
                .item(option_selector(
                    settings.signal_ref(|settings| settings.sub_legend),
                    {
                        let relay = config.sub_legend_selected_relay.clone();
                        move |sub_legend: SubLegend| relay.send(sub_legend)
                    },
                ))
                .item(option_selector(
                    settings.signal_ref(|settings| settings.unit_display),
                    {
                        let relay = config.unit_display_selected_relay.clone();
                        move |unit_display: UnitDisplay| relay.send(unit_display)
                    },
                )),
        )
}

/// Captioned dropdown over one closed option set.
fn option_selector<T>(
    value_signal: impl Signal<Item = T> + Unpin + 'static,
    on_select: impl Fn(T) + Clone + 'static,
) -> impl Element
where
    T: OptionSet,
{
    let is_open = Mutable::new(false);

    Column::new()
        .s(Width::fill())
        .s(RoundedCorners::all(6))
        .s(Background::new().color(FIELD_BACKGROUND))
        .item(
            Column::new()
                .s(Width::fill())
                .s(Padding::new().x(12).y(6))
                .s(Cursor::new(CursorIcon::Pointer))
                .item(
                    El::new()
                        .s(Font::new().size(11).color(MUTED_TEXT))
                        .child(T::TITLE),
                )
                .item(
                    El::new()
                        .s(Font::new().size(14))
                        .child_signal(value_signal.map(|value| value.label())),
                )
                .on_click({
                    let is_open = is_open.clone();
                    move || is_open.set_neq(!is_open.get())
                }),
        )
        .on_click_outside({
            let is_open = is_open.clone();
            move || is_open.set(false)
        })
        .element_below_signal(is_open.signal().map_true(move || {
            Column::new()
                .s(Width::fill())
                .s(Padding::all(4))
                .s(RoundedCorners::all(6))
                .s(Background::new().color("white"))
                .s(Borders::all(Border::new().color(BORDER_COLOR)))
                .s(Shadows::new([Shadow::new().y(2).blur(6).color("rgba(0, 0, 0, 0.12)")]))
                .items(T::ALL.iter().copied().map({
                    let is_open = is_open.clone();
                    let on_select = on_select.clone();
                    move |option| {
                        let is_open = is_open.clone();
                        let on_select = on_select.clone();
                        El::new()
                            .s(Padding::new().x(8).y(4))
                            .s(RoundedCorners::all(4))
                            .s(Font::new().size(14))
                            .s(Cursor::new(CursorIcon::Pointer))
                            .child(option.label())
                            .on_click(move || {
                                on_select(option);
                                is_open.set(false);
                            })
                    }
                }))
        }))
}

// ===== LAYERS =====

fn layers_section(layer_panel: LayerPanel) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Height::fill())
        .s(Padding::all(8))
        .s(Scrollbars::y_and_clip_x())
        .s(Borders::new().bottom(Border::new().color(BORDER_COLOR)))
        .item(section_title("Layers"))
        .items(
            layer_panel
                .layout
                .roots()
                .iter()
                .map(|node| layer_row(node.clone(), 0, layer_panel.clone()).unify()),
        )
        // Pointer-down, not click: the press must reach the panel before it
        // blurs a rename input. Rows stop their own presses.
        .update_raw_el(move |raw_el| {
            let region = raw_el.dom_element();
            raw_el
                .event_handler({
                    let layer_panel = layer_panel.clone();
                    move |_: events::MouseDown| request_selection_clear(&layer_panel)
                })
                .global_event_handler(move |event: events::MouseDown| {
                    if !is_inside(&region, &event) {
                        request_selection_clear(&layer_panel);
                    }
                })
        })
}

fn is_inside(region: &web_sys::HtmlElement, event: &events::MouseDown) -> bool {
    event
        .target()
        .and_then(|target| target.dyn_into::<web_sys::Node>().ok())
        .is_some_and(|node| region.contains(Some(&node)))
}

fn layer_row(node: LayerNode, depth: u32, layer_panel: LayerPanel) -> impl Element {
    let id = node.id.clone();
    let is_group = node.is_group();
    let hovered = Atom::new(false);

    let row = Row::new()
        .s(Width::fill())
        .s(Height::exact(28))
        .s(Padding::new().left(depth * ROW_INDENT + ROW_BASE_PADDING).right(4))
        .s(RoundedCorners::all(2))
        .s(Font::new().size(14))
        .s(Background::new().color_signal(map_ref! {
            let selected = layer_panel.is_selected_signal(id.clone()),
            let hovered = hovered.signal() =>
            if *selected {
                Some(SELECTED_ROW)
            } else if *hovered {
                Some(HOVERED_ROW)
            } else {
                None
            }
        }))
        .update_raw_el({
            let layer_panel = layer_panel.clone();
            let id = id.clone();
            move |raw_el| {
                raw_el
                    .style("user-select", "none")
                    .style_signal(
                        "opacity",
                        layer_panel.is_hidden_signal(id.clone()).map_true(|| "0.4"),
                    )
                    .event_handler({
                        let layer_panel = layer_panel.clone();
                        let id = id.clone();
                        move |event: events::Click| {
                            event.stop_propagation();
                            let modifiers = Modifiers {
                                shift: event.shift_key(),
                                ctrl: event.ctrl_key(),
                                meta: event.meta_key(),
                            };
                            layer_panel.row_clicked_relay.send((id.clone(), modifiers));
                        }
                    })
                    .event_handler(|event: events::MouseDown| event.stop_propagation())
                    .event_handler(move |event: events::DoubleClick| {
                        event.stop_propagation();
                        // Top-level groups keep their names
                        if !is_group || depth > 0 {
                            layer_panel.rename_started_relay.send(id.clone());
                        }
                    })
            }
        })
        .on_hovered_change({
            let hovered = hovered.clone();
            move |is_hovered| hovered.set_neq(is_hovered)
        })
        .item(expand_chevron(&id, is_group, &layer_panel))
        .item(layer_name(id.clone(), layer_panel.clone()))
        .item_signal(
            map_ref! {
                let hovered = hovered.signal(),
                let hidden = layer_panel.is_hidden_signal(id.clone()),
                let renaming = layer_panel.is_renaming_signal(id.clone()) =>
                (*hovered || *hidden) && !*renaming
            }
            .dedupe()
            .map_true({
                let layer_panel = layer_panel.clone();
                let id = id.clone();
                move || visibility_toggle(id.clone(), layer_panel.clone())
            }),
        );

    let children = node.children;
    Column::new()
        .s(Width::fill())
        .item(row)
        .item_signal(layer_panel.is_expanded_signal(id).map(move |expanded| {
            (expanded && is_group && !children.is_empty()).then(|| {
                Column::new().s(Width::fill()).items(
                    children
                        .iter()
                        .map(|child| layer_row(child.clone(), depth + 1, layer_panel.clone()).unify()),
                )
            })
        }))
}

fn expand_chevron(id: &str, is_group: bool, layer_panel: &LayerPanel) -> impl Element {
    if !is_group {
        return El::new().s(Width::exact(14)).unify();
    }
    El::new()
        .s(Width::exact(14))
        .s(Font::new().size(10).color(MUTED_TEXT))
        .s(Cursor::new(CursorIcon::Pointer))
        .child_signal(
            layer_panel
                .is_expanded_signal(id.to_string())
                .map_bool(|| "▾", || "▸"),
        )
        .update_raw_el({
            let layer_panel = layer_panel.clone();
            let id = id.to_string();
            move |raw_el| {
                raw_el.event_handler(move |event: events::Click| {
                    event.stop_propagation();
                    layer_panel.expand_toggled_relay.send(id.clone());
                })
            }
        })
        .unify()
}

fn layer_name(id: String, layer_panel: LayerPanel) -> impl Element {
    El::new()
        .s(Width::fill())
        .s(Font::new().no_wrap())
        .child_signal(
            map_ref! {
                let renaming = layer_panel.is_renaming_signal(id.clone()),
                let name = layer_panel.name_signal(id.clone()) =>
                (*renaming, name.clone().unwrap_or_default())
            }
            .dedupe_cloned()
            .map(move |(renaming, name)| {
                if renaming {
                    El::new()
                        .s(Width::fill())
                        .child(rename_input(id.clone(), name, layer_panel.clone()))
                        .unify()
                } else {
                    El::new()
                        .s(Font::new().no_wrap())
                        .s(Clip::x())
                        .child(name)
                        .unify()
                }
            }),
        )
}

/// Enter and blur commit; Escape cancels. Whichever comes first wins, the
/// blur caused by the input disappearing is ignored.
fn rename_input(id: String, initial_name: String, layer_panel: LayerPanel) -> impl Element {
    let text = Mutable::new(initial_name.clone());
    let finished = Mutable::new(false);

    TextInput::new()
        .s(Width::fill())
        .s(Height::fill())
        .s(Padding::new().x(4))
        .s(RoundedCorners::all(3))
        .s(Background::new().color("white"))
        .s(Borders::all(Border::new().color(BORDER_COLOR)))
        .s(Font::new().size(14))
        .label_hidden("Layer name")
        .text(initial_name)
        .focus(true)
        .update_raw_el(|raw_el| {
            raw_el.event_handler(|event: events::Click| event.stop_propagation())
        })
        .after_insert(|input| input.select())
        .on_change({
            let text = text.clone();
            move |new_text| text.set(new_text)
        })
        .on_key_down_event({
            let id = id.clone();
            let text = text.clone();
            let finished = finished.clone();
            let layer_panel = layer_panel.clone();
            move |event| match event.key() {
                Key::Enter => finish_rename(&layer_panel, &id, Some(text.get_cloned()), &finished),
                Key::Escape => finish_rename(&layer_panel, &id, None, &finished),
                _ => {}
            }
        })
        .on_blur(move || finish_rename(&layer_panel, &id, Some(text.get_cloned()), &finished))
}

fn finish_rename(
    layer_panel: &LayerPanel,
    id: &str,
    proposed_name: Option<String>,
    finished: &Mutable<bool>,
) {
    if finished.replace(true) {
        return;
    }
    match proposed_name {
        Some(name) => layer_panel
            .rename_committed_relay
            .send((id.to_string(), name)),
        None => layer_panel.rename_cancelled_relay.send(()),
    }
}

fn visibility_toggle(id: String, layer_panel: LayerPanel) -> impl Element {
    El::new()
        .s(Align::new().right())
        .s(Padding::new().x(4))
        .s(Font::new().size(12))
        .s(Cursor::new(CursorIcon::Pointer))
        .child_signal(
            layer_panel
                .is_hidden_signal(id.clone())
                .map_bool(|| "◌", || "◉"),
        )
        .update_raw_el(move |raw_el| {
            raw_el
                .attr("title", "Toggle visibility")
                .event_handler(move |event: events::Click| {
                    event.stop_propagation();
                    layer_panel.visibility_toggled_relay.send(id.clone());
                })
        })
}

// ===== PAGES =====

fn pages_section(config: AppConfig) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Padding::all(8))
        .item(section_title("Pages"))
        .items(PageId::ALL.into_iter().map(|page| page_entry(page, config.clone())))
}

fn page_entry(page: PageId, config: AppConfig) -> impl Element {
    El::new()
        .s(Width::fill())
        .s(Padding::new().x(8).y(6))
        .s(RoundedCorners::all(4))
        .s(Font::new().size(14))
        .s(Cursor::new(CursorIcon::Pointer))
        .s(Background::new().color_signal(
            config
                .page_signal()
                .map(move |active| (active == page).then_some(SELECTED_ROW)),
        ))
        .child(page.label())
        .on_click(move || config.page_selected_relay.send(page))
}

// ===== MAIN AREA =====

pub fn main_area(
    config: AppConfig,
    previews: PagePreviews,
    error_display: ErrorDisplay,
) -> impl Element {
    El::new()
        .s(Width::fill())
        .s(Height::fill())
        .child_signal(
            config
                .settings_actor
                .signal_ref(|settings| {
                    let page = settings.page;
                    (
                        page,
                        settings.asset_url(page),
                        settings.namespace_prefix(page),
                        settings.export_filename(),
                    )
                })
                .dedupe_cloned()
                .map(move |(page, url, prefix, export_filename)| {
                    let handle = previews.handle(page).clone();
                    Column::new()
                        .s(Width::fill())
                        .s(Height::fill())
                        .item(canvas_toolbar(
                            page,
                            handle.clone(),
                            export_filename,
                            error_display.clone(),
                        ))
                        .item(
                            El::new()
                                .s(Width::fill())
                                .s(Height::fill())
                                .s(Padding::all(16))
                                .child(svg_preview(handle, url, prefix)),
                        )
                }),
        )
}

fn canvas_toolbar(
    page: PageId,
    handle: SvgPreviewHandle,
    export_filename: String,
    error_display: ErrorDisplay,
) -> impl Element {
    Row::new()
        .s(Width::fill())
        .s(Padding::new().x(16).y(8))
        .s(Borders::new().bottom(Border::new().color(BORDER_COLOR)))
        .item(
            El::new()
                .s(Font::new().size(14).weight(FontWeight::SemiBold))
                .child(page.label()),
        )
        .item_signal(handle.phase_signal().map({
            let handle = handle.clone();
            move |phase| {
                let view_box = match phase {
                    LoadPhase::Ready => handle
                        .get_element()
                        .and_then(|svg| svg.get_attribute("viewBox"))?,
                    _ => return None,
                };
                Some(
                    El::new()
                        .s(Padding::new().left(12))
                        .s(Font::new().size(12).color(MUTED_TEXT))
                        .child(format!("viewBox {}", view_box)),
                )
            }
        }))
        .item(
            Button::new()
                .s(Align::new().right())
                .s(Padding::new().x(12).y(6))
                .s(RoundedCorners::all(6))
                .s(Background::new().color("rgb(24, 24, 27)"))
                .s(Font::new().size(14).color("white"))
                .label("Export")
                .on_press(move || {
                    if let Err(error) = handle.download(Some(&export_filename)) {
                        error_display.report(ErrorAlert::new_export_error(&export_filename, error));
                    }
                }),
        )
}
