//! Page artwork rendered from a static SVG asset.
//!
//! The SVG is injected into a plain `<div>` that zoon never renders
//! children into, so the injected DOM can be mutated freely (e.g. by a
//! drawing tool) and later exported exactly as it looks on screen.

use std::cell::RefCell;
use std::rc::Rc;

use shared::svg::SVG_MEDIA_TYPE;
use shared::{LoadPhase, SvgHost, SvgInjector, SvgLoadError};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobPropertyBag, DomParser, Element as DomElement, HtmlAnchorElement, Response,
    SupportedType, Url, XmlSerializer,
};
use zoon::*;

use crate::error_display::js_error_message;

/// Region owned by one mounted preview.
#[derive(Clone)]
pub struct DomHost {
    region: DomElement,
}

impl DomHost {
    pub fn new(region: DomElement) -> Self {
        Self { region }
    }
}

impl SvgHost for DomHost {
    type Element = DomElement;

    fn parse_root(&self, markup: &str) -> Option<DomElement> {
        let parser = DomParser::new().ok()?;
        let document = parser
            .parse_from_string(markup, SupportedType::ImageSvgXml)
            .ok()?;
        if document.get_elements_by_tag_name("parsererror").length() > 0 {
            return None;
        }
        document.query_selector("svg").ok().flatten()
    }

    fn rewrite_style_text(&self, root: &DomElement, rewrite: &dyn Fn(&str) -> String) {
        let Ok(styles) = root.query_selector_all("style") else {
            return;
        };
        for index in 0..styles.length() {
            let Some(style) = styles.get(index) else {
                continue;
            };
            if let Some(css) = style.text_content() {
                style.set_text_content(Some(&rewrite(&css)));
            }
        }
    }

    fn rewrite_class_attributes(&self, root: &DomElement, rewrite: &dyn Fn(&str) -> String) {
        let mut elements = vec![root.clone()];
        if let Ok(classed) = root.query_selector_all("[class]") {
            elements.extend(
                (0..classed.length())
                    .filter_map(|index| classed.get(index))
                    .filter_map(|node| node.dyn_into::<DomElement>().ok()),
            );
        }
        for element in elements {
            if let Some(classes) = element.get_attribute("class") {
                let _ = element.set_attribute("class", &rewrite(&classes));
            }
        }
    }

    fn replace_content(&self, root: &DomElement) -> Result<DomElement, SvgLoadError> {
        let document = self
            .region
            .owner_document()
            .ok_or(SvgLoadError::MalformedDocument)?;
        let imported = document
            .import_node_with_deep(root, true)
            .map_err(|_| SvgLoadError::MalformedDocument)?;
        self.region.set_inner_html("");
        self.region
            .append_child(&imported)
            .map_err(|_| SvgLoadError::MalformedDocument)?;
        imported
            .dyn_into::<DomElement>()
            .map_err(|_| SvgLoadError::MalformedDocument)
    }

    fn clear(&self) {
        self.region.set_inner_html("");
    }

    fn serialize(&self, element: &DomElement) -> Option<String> {
        XmlSerializer::new()
            .ok()?
            .serialize_to_string(element)
            .ok()
    }
}

async fn fetch_svg_markup(url: &str) -> Result<String, SvgLoadError> {
    let retrieval = |error: JsValue| SvgLoadError::Retrieval(js_error_message(&error));

    let window = web_sys::window()
        .ok_or_else(|| SvgLoadError::Retrieval("Window is not available".to_string()))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(retrieval)?
        .dyn_into()
        .map_err(retrieval)?;
    if !response.ok() {
        return Err(SvgLoadError::http_status(response.status()));
    }
    let body = JsFuture::from(response.text().map_err(retrieval)?)
        .await
        .map_err(retrieval)?;
    body.as_string()
        .ok_or_else(|| SvgLoadError::Retrieval("Response body is not text".to_string()))
}

type SharedInjector = Rc<RefCell<SvgInjector<DomHost>>>;

/// Capability object for the preview currently mounted for one page.
///
/// The owning view keeps a clone and calls [`SvgPreviewHandle::download`]
/// and friends on demand; all of them return `None` (or do nothing) until
/// the artwork is ready.
#[derive(Clone, Default)]
pub struct SvgPreviewHandle {
    mounted: Rc<RefCell<Option<SharedInjector>>>,
    phase: Mutable<LoadPhase>,
}

impl SvgPreviewHandle {
    pub fn phase_signal(&self) -> impl Signal<Item = LoadPhase> + use<> {
        self.phase.signal_cloned()
    }

    fn mount(&self, region: DomElement, url: String, prefix: String) -> SharedInjector {
        let injector = Rc::new(RefCell::new(SvgInjector::new(DomHost::new(region), prefix)));
        *self.mounted.borrow_mut() = Some(injector.clone());
        self.phase.set(LoadPhase::Loading);

        // Not droppable: teardown only marks the injector dead, the
        // request itself runs to completion.
        Task::start({
            let injector = injector.clone();
            let phase = self.phase.clone();
            async move {
                let outcome = fetch_svg_markup(&url).await;
                let mut injector = injector.borrow_mut();
                if injector.resolve(outcome) {
                    match injector.phase() {
                        LoadPhase::Failed(error) => {
                            zoon::eprintln!("Failed to load SVG '{}': {}", url, error)
                        }
                        _ => zoon::println!(
                            "Injected SVG '{}' with class prefix '{}'",
                            url,
                            injector.prefix()
                        ),
                    }
                    phase.set(injector.phase().clone());
                } else {
                    zoon::println!("Discarded SVG '{}' loaded after its preview was removed", url);
                }
            }
        });

        injector
    }

    fn unmount(&self, injector: &SharedInjector) {
        injector.borrow_mut().teardown();
        let mut mounted = self.mounted.borrow_mut();
        if mounted
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current, injector))
        {
            *mounted = None;
            self.phase.set(LoadPhase::Loading);
        }
    }

    /// Live injected `<svg>` root.
    pub fn get_element(&self) -> Option<DomElement> {
        let mounted = self.mounted.borrow();
        let injector = mounted.as_ref()?.borrow();
        injector.element().cloned()
    }

    pub fn export_string(&self) -> Option<String> {
        let mounted = self.mounted.borrow();
        let injector = mounted.as_ref()?.borrow();
        injector.export_string()
    }

    /// Saves the current artwork as a file. Does nothing before it is ready.
    pub fn download(&self, filename: Option<&str>) -> Result<(), String> {
        let Some(markup) = self.export_string() else {
            return Ok(());
        };
        let filename = filename.unwrap_or(shared::config::DEFAULT_EXPORT_FILENAME);
        save_markup_as_file(&markup, filename).map_err(|error| js_error_message(&error))?;
        zoon::println!("Exported SVG as '{}' ({} bytes)", filename, markup.len());
        Ok(())
    }
}

fn save_markup_as_file(markup: &str, filename: &str) -> Result<(), JsValue> {
    let parts = js_sys::Array::of1(&JsValue::from_str(markup));
    let options = BlobPropertyBag::new();
    options.set_type(&format!("{};charset=utf-8", SVG_MEDIA_TYPE));
    let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("Document is not available"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("Document has no body"))?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;
    Url::revoke_object_url(&url)
}

/// Preview element for one page.
///
/// Mounting starts the retrieval; removing the element discards whatever
/// arrives later and empties the injected region.
pub fn svg_preview(handle: SvgPreviewHandle, url: String, prefix: String) -> impl Element {
    let mounted_injector: Rc<RefCell<Option<SharedInjector>>> = Rc::default();

    Stack::new()
        .s(Width::fill())
        .s(Height::fill())
        .layer(
            El::new()
                .s(Width::fill())
                .s(Height::fill())
                .update_raw_el(|raw_el| raw_el.class("svg-preview-region"))
                .after_insert({
                    let handle = handle.clone();
                    let mounted_injector = mounted_injector.clone();
                    move |region| {
                        let injector = handle.mount(region.into(), url, prefix);
                        *mounted_injector.borrow_mut() = Some(injector);
                    }
                })
                .after_remove({
                    let handle = handle.clone();
                    move |_| {
                        if let Some(injector) = mounted_injector.borrow_mut().take() {
                            handle.unmount(&injector);
                        }
                    }
                }),
        )
        .layer_signal(handle.phase_signal().map(|phase| match phase {
            LoadPhase::Loading => Some(
                El::new()
                    .s(Align::center())
                    .s(Font::new().size(14).color("rgb(113, 113, 122)"))
                    .child("Loading SVG..."),
            ),
            LoadPhase::Failed(error) => Some(
                El::new()
                    .s(Align::center())
                    .s(Font::new().size(14).color("rgb(220, 38, 38)"))
                    .child(format!("Error: {}", error)),
            ),
            LoadPhase::Ready => None,
        }))
}
