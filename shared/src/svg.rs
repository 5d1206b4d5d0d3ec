//! SVG injection and export, independent of any particular DOM.
//!
//! Artwork SVGs exported from design tools all use the same generated
//! class names (`cls-1`, `cls-2`, ...). Several of them share one page, so
//! every injected document gets its class names prefixed before it is
//! inserted. The DOM side is abstracted behind [`SvgHost`]; the browser
//! implementation lives in the frontend.

use thiserror::Error;

/// Class-name token rewritten by namespacing.
pub const CLASS_PATTERN: &str = "cls-";

pub const SVG_MEDIA_TYPE: &str = "image/svg+xml";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SvgLoadError {
    /// Non-success status or transport failure, shown to the user verbatim.
    #[error("{0}")]
    Retrieval(String),
    #[error("Invalid SVG file")]
    MalformedDocument,
}

impl SvgLoadError {
    pub fn http_status(status: u16) -> Self {
        SvgLoadError::Retrieval(format!("Failed to load SVG: {}", status))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadPhase {
    #[default]
    Loading,
    Ready,
    Failed(SvgLoadError),
}

impl LoadPhase {
    pub fn error_message(&self) -> Option<String> {
        match self {
            LoadPhase::Failed(error) => Some(error.to_string()),
            _ => None,
        }
    }
}

/// Rewrites `.cls-` selectors in style sheet text, plus `class` attribute
/// selectors anchored at a token start (`~=`, `^=`, `|=`). Substring forms
/// (`*=`, `$=`) still match the prefixed names and are left as they are.
pub fn namespace_style_text(css: &str, prefix: &str) -> String {
    let mut rewritten = css.replace(
        &format!(".{}", CLASS_PATTERN),
        &format!(".{}{}", prefix, CLASS_PATTERN),
    );
    for operator in ["~=", "^=", "|="] {
        for quote in ["\"", "'", ""] {
            let selector = format!("class{}{}", operator, quote);
            rewritten = rewritten.replace(
                &format!("{}{}", selector, CLASS_PATTERN),
                &format!("{}{}{}", selector, prefix, CLASS_PATTERN),
            );
        }
    }
    rewritten
}

/// Prefixes every class token that starts with `cls-`. Tokens are split on
/// ASCII whitespace only, the way the DOM splits `class`. Tokens that merely
/// contain the pattern (`other-cls-x`) are left alone.
pub fn namespace_class_attr(classes: &str, prefix: &str) -> String {
    let mut rewritten = String::with_capacity(classes.len() + prefix.len());
    let mut at_token_start = true;
    for (index, ch) in classes.char_indices() {
        if ch.is_ascii_whitespace() {
            at_token_start = true;
            rewritten.push(ch);
            continue;
        }
        if at_token_start && classes[index..].starts_with(CLASS_PATTERN) {
            rewritten.push_str(prefix);
        }
        at_token_start = false;
        rewritten.push(ch);
    }
    rewritten
}

/// The region an [`SvgInjector`] owns, plus the document operations it needs.
pub trait SvgHost {
    type Element: Clone;

    /// Parses markup and returns its root `<svg>` element.
    fn parse_root(&self, markup: &str) -> Option<Self::Element>;

    /// Rewrites the text of every `<style>` element under `root`.
    fn rewrite_style_text(&self, root: &Self::Element, rewrite: &dyn Fn(&str) -> String);

    /// Rewrites the `class` attribute of `root` and of every descendant carrying one.
    fn rewrite_class_attributes(&self, root: &Self::Element, rewrite: &dyn Fn(&str) -> String);

    /// Empties the region, inserts a deep copy of `root` and returns the copy.
    fn replace_content(&self, root: &Self::Element) -> Result<Self::Element, SvgLoadError>;

    fn clear(&self);

    fn serialize(&self, element: &Self::Element) -> Option<String>;
}

/// Loading -> Ready | Failed, for one host region.
///
/// The retrieval itself happens outside; its outcome is handed to
/// [`SvgInjector::resolve`]. After [`SvgInjector::teardown`] every outcome
/// is dropped without touching the host.
pub struct SvgInjector<H: SvgHost> {
    host: H,
    prefix: String,
    phase: LoadPhase,
    element: Option<H::Element>,
    live: bool,
}

impl<H: SvgHost> SvgInjector<H> {
    pub fn new(host: H, prefix: impl Into<String>) -> Self {
        Self {
            host,
            prefix: prefix.into(),
            phase: LoadPhase::Loading,
            element: None,
            live: true,
        }
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Applies the retrieval outcome. Returns `false` if it was discarded.
    pub fn resolve(&mut self, outcome: Result<String, SvgLoadError>) -> bool {
        if !self.live {
            return false;
        }
        match outcome.and_then(|markup| self.inject(&markup)) {
            Ok(element) => {
                self.element = Some(element);
                self.phase = LoadPhase::Ready;
            }
            Err(error) => {
                self.element = None;
                self.phase = LoadPhase::Failed(error);
            }
        }
        true
    }

    fn inject(&self, markup: &str) -> Result<H::Element, SvgLoadError> {
        let root = self
            .host
            .parse_root(markup)
            .ok_or(SvgLoadError::MalformedDocument)?;
        let prefix = self.prefix.as_str();
        self.host
            .rewrite_style_text(&root, &|css| namespace_style_text(css, prefix));
        self.host
            .rewrite_class_attributes(&root, &|classes| namespace_class_attr(classes, prefix));
        self.host.replace_content(&root)
    }

    pub fn teardown(&mut self) {
        self.live = false;
        self.element = None;
        self.host.clear();
    }

    /// The live injected root, for callers that draw on it directly.
    pub fn element(&self) -> Option<&H::Element> {
        self.element.as_ref()
    }

    /// Serializes the current state of the live root, including any
    /// mutation made through [`SvgInjector::element`].
    pub fn export_string(&self) -> Option<String> {
        self.element
            .as_ref()
            .and_then(|element| self.host.serialize(element))
    }
}
