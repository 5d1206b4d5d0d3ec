use moon::*;
use shared::{AppConfig, DownMsg, UpMsg};
use std::fs;
use std::io::ErrorKind;

const DEBUG_BACKEND: bool = false;
const DEBUG_CONFIG: bool = true;

macro_rules! debug_log {
    ($flag:expr, $($arg:tt)*) => {
        if $flag {
            println!($($arg)*);
        }
    };
}

/// Read-only; the configurator never writes it back.
const CONFIG_FILE_PATH: &str = "keycap_configurator.toml";

async fn frontend() -> Frontend {
    Frontend::new()
        .title("Keycap Configurator")
        .index_by_robots(false)
}

async fn up_msg_handler(req: UpMsgRequest<UpMsg>) {
    let (session_id, cor_id) = (req.session_id, req.cor_id);
    debug_log!(DEBUG_BACKEND, "BACKEND: received {:?}", req.up_msg);

    match req.up_msg {
        UpMsg::LoadConfig => load_config(session_id, cor_id).await,
    }
}

async fn send_down_msg(msg: DownMsg, session_id: SessionId, cor_id: CorId) {
    if let Some(session) = sessions::by_session_id().wait_for(session_id).await {
        session.send_down_msg(&msg, cor_id).await;
    } else {
        debug_log!(DEBUG_BACKEND, "BACKEND: session {:?} is gone, dropping reply", session_id);
    }
}

async fn load_config(session_id: SessionId, cor_id: CorId) {
    let content = match fs::read_to_string(CONFIG_FILE_PATH) {
        Ok(content) => Some(content),
        Err(error) if error.kind() == ErrorKind::NotFound => {
            debug_log!(DEBUG_CONFIG, "CONFIG: '{}' not found, using defaults", CONFIG_FILE_PATH);
            None
        }
        Err(error) => {
            let message = format!("Failed to read config: {}", error);
            send_down_msg(DownMsg::ConfigError(message), session_id, cor_id).await;
            return;
        }
    };

    let msg = match resolve_config(content.as_deref()) {
        Ok((config, warnings)) => {
            for warning in warnings {
                debug_log!(DEBUG_CONFIG, "CONFIG: {}", warning);
            }
            DownMsg::ConfigLoaded(config)
        }
        Err(error) => DownMsg::ConfigError(error),
    };
    send_down_msg(msg, session_id, cor_id).await;
}

/// Parses and repairs the config file content; `None` means no file.
fn resolve_config(content: Option<&str>) -> Result<(AppConfig, Vec<String>), String> {
    let mut config = match content {
        Some(content) => AppConfig::from_toml_str(content)
            .map_err(|error| format!("Failed to parse config: {}", error))?,
        None => AppConfig::default(),
    };
    let warnings = config.validate_and_fix();
    Ok((config, warnings))
}

#[moon::main]
async fn main() -> std::io::Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("BACKEND PANIC: {:?}", panic_info);
    }));

    start(frontend, up_msg_handler, |error| {
        eprintln!("BACKEND: {:?}", error);
    })
    .await
}
