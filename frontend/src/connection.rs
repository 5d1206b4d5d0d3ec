use crate::config::AppConfig;
use crate::dataflow::Actor;
use crate::error_display::{ErrorAlert, ErrorDisplay};
use futures::StreamExt;
use futures::stream::Stream;
use shared::{DownMsg, UpMsg};
use zoon::*;

/// Backend connection whose messages are consumed as a stream.
pub struct ConnectionAdapter {
    connection: Connection<UpMsg, DownMsg>,
}

impl ConnectionAdapter {
    pub fn new() -> (Self, impl Stream<Item = DownMsg>) {
        let (message_sender, message_stream) = futures::channel::mpsc::unbounded();

        let connection = Connection::new(move |down_msg, _| {
            let _ = message_sender.unbounded_send(down_msg);
        });

        (ConnectionAdapter { connection }, message_stream)
    }

    pub async fn send_up_msg(&self, up_msg: UpMsg) -> Result<(), String> {
        self.connection
            .send_up_msg(up_msg)
            .await
            .map(|_| ())
            .map_err(|error| format!("{:?}", error))
    }
}

/// Requests the configuration and routes backend answers to the domains.
pub fn start_connection(
    app_config: &AppConfig,
    error_display: &ErrorDisplay,
) -> (std::rc::Rc<ConnectionAdapter>, Actor<()>) {
    let (connection, mut down_msg_stream) = ConnectionAdapter::new();
    let connection = std::rc::Rc::new(connection);

    let message_handler = Actor::new((), {
        let app_config = app_config.clone();
        let error_display = error_display.clone();
        async move |_state| {
            while let Some(down_msg) = down_msg_stream.next().await {
                handle_down_msg(down_msg, &app_config, &error_display);
            }
        }
    });

    Task::start({
        let connection = connection.clone();
        let error_display = error_display.clone();
        async move {
            if let Err(error) = connection.send_up_msg(UpMsg::LoadConfig).await {
                error_display.report(ErrorAlert::new_connection_error(error));
            }
        }
    });

    (connection, message_handler)
}

fn handle_down_msg(down_msg: DownMsg, app_config: &AppConfig, error_display: &ErrorDisplay) {
    match down_msg {
        DownMsg::ConfigLoaded(config) => {
            zoon::println!("Config loaded for project '{}'", config.project.name);
            app_config.config_loaded_relay.send(config);
        }
        DownMsg::ConfigError(error) => {
            error_display.report(ErrorAlert::new_config_error(error));
        }
    }
}
