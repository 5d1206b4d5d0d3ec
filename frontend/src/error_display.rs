use crate::dataflow::{Actor, Relay, relay};
use futures::{StreamExt, select};
use std::sync::atomic::{AtomicUsize, Ordering};
use wasm_bindgen::{JsCast, JsValue};
use zoon::*;

static ALERT_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorAlert {
    pub id: String,
    pub title: String,
    pub message: String,
    /// Raw error, logged to the console only
    pub technical_error: String,
    pub auto_dismiss_ms: u32,
}

impl ErrorAlert {
    fn next_id(kind: &str) -> String {
        format!("{}_{}", kind, ALERT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn new_config_error(error: String) -> Self {
        Self {
            id: Self::next_id("config_error"),
            title: "Configuration Error".to_string(),
            message: format!(
                "{}. Using default settings.",
                make_error_user_friendly(&error)
            ),
            technical_error: format!("Config load failed: {}", error),
            auto_dismiss_ms: 5000,
        }
    }

    pub fn new_export_error(filename: &str, error: String) -> Self {
        Self {
            id: Self::next_id("export_error"),
            title: "Export Failed".to_string(),
            message: format!("Could not save '{}': {}", filename, make_error_user_friendly(&error)),
            technical_error: format!("Export of '{}' failed: {}", filename, error),
            auto_dismiss_ms: 5000,
        }
    }

    pub fn new_connection_error(error: String) -> Self {
        Self {
            id: Self::next_id("connection_error"),
            title: "Connection Error".to_string(),
            message: make_error_user_friendly(&error),
            technical_error: format!("Connection error: {}", error),
            auto_dismiss_ms: 5000,
        }
    }
}

/// Message of a JS exception, or its debug form for non-`Error` values.
pub fn js_error_message(error: &JsValue) -> String {
    match error.dyn_ref::<js_sys::Error>() {
        Some(error) => String::from(error.message()),
        None => error
            .as_string()
            .unwrap_or_else(|| format!("{:?}", error)),
    }
}

pub fn make_error_user_friendly(error: &str) -> String {
    let error_lower = error.to_lowercase();

    if error_lower.contains("failed to fetch") || error_lower.contains("networkerror") {
        "Connection error. Please check your network connection.".to_string()
    } else if error_lower.contains("permission denied") || error_lower.contains("access denied") {
        "Permission denied".to_string()
    } else if error_lower.contains("timeout") {
        "Operation timed out. Please try again.".to_string()
    } else if error_lower.contains("toml") || error_lower.contains("parse") {
        "The configuration file could not be read".to_string()
    } else {
        error.trim().to_string()
    }
}

/// Toast notifications for failures outside the canvas.
#[derive(Clone, Debug)]
pub struct ErrorDisplay {
    pub active_alerts: Actor<Vec<ErrorAlert>>,
    pub alert_added_relay: Relay<ErrorAlert>,
    pub alert_dismissed_relay: Relay<String>,
}

impl ErrorDisplay {
    pub fn new() -> Self {
        let (alert_added_relay, mut alert_added_stream) = relay::<ErrorAlert>();
        let (alert_dismissed_relay, mut alert_dismissed_stream) = relay::<String>();

        let active_alerts = Actor::new(Vec::new(), async move |alerts| {
            loop {
                select! {
                    alert = alert_added_stream.next() => {
                        if let Some(alert) = alert {
                            alerts.lock_mut().push(alert);
                        }
                    }
                    dismissed_id = alert_dismissed_stream.next() => {
                        if let Some(id) = dismissed_id {
                            alerts.lock_mut().retain(|alert| alert.id != id);
                        }
                    }
                    complete => break,
                }
            }
        });

        Self {
            active_alerts,
            alert_added_relay,
            alert_dismissed_relay,
        }
    }

    /// Logs the technical error and shows the alert.
    pub fn report(&self, alert: ErrorAlert) {
        zoon::eprintln!("{}", alert.technical_error);
        self.alert_added_relay.send(alert);
    }

    pub fn dismiss(&self, id: String) {
        self.alert_dismissed_relay.send(id);
    }
}

pub fn toast_notifications(error_display: ErrorDisplay) -> impl Element {
    Column::new()
        .s(Align::new().bottom().right())
        .s(Padding::all(16))
        .s(Gap::new().y(8))
        .update_raw_el(|raw_el| raw_el.style("pointer-events", "none"))
        .items_signal_vec(
            error_display
                .active_alerts
                .signal()
                .to_signal_vec()
                .map({
                    let error_display = error_display.clone();
                    move |alert| toast(alert, error_display.clone())
                }),
        )
}

fn toast(alert: ErrorAlert, error_display: ErrorDisplay) -> impl Element {
    let delay_ms = alert.auto_dismiss_ms;
    if delay_ms > 0 {
        Task::start({
            let error_display = error_display.clone();
            let id = alert.id.clone();
            async move {
                Timer::sleep(delay_ms).await;
                error_display.dismiss(id);
            }
        });
    }

    Column::new()
        .s(Width::exact(320))
        .s(Padding::all(12))
        .s(RoundedCorners::all(6))
        .s(Background::new().color("rgb(254, 242, 242)"))
        .s(Borders::all(Border::new().color("rgb(252, 165, 165)")))
        .s(Gap::new().y(4))
        .s(Cursor::new(CursorIcon::Pointer))
        .update_raw_el(|raw_el| raw_el.style("pointer-events", "auto"))
        .item(
            El::new()
                .s(Font::new().weight(FontWeight::SemiBold).size(14).color("rgb(153, 27, 27)"))
                .child(alert.title),
        )
        .item(
            El::new()
                .s(Font::new().size(13).color("rgb(127, 29, 29)"))
                .child(alert.message),
        )
        .on_click({
            let id = alert.id;
            move || error_display.dismiss(id.clone())
        })
}
