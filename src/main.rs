mod config;
mod credentials;
mod enrichment;
mod errors;
mod media_file_discovery;
mod player;
mod player_launcher;
mod player_state;
mod reconcile;
mod retry;
mod skip_policy;
mod state_store;

use std::ffi::OsString;
use std::path::PathBuf;

use log::{error, info};

use player::vlc_http::VlcHttpPlayer;
use reconcile::{LoopTimings, ReconcileLoop};
use state_store::{ResumeStateStore, TomlStateStore};

const STATE_FILE_NAME: &str = "vlc-resume.toml";
const STATE_PATH_ENV: &str = "VLC_RESUME_STATE";
const LOG_LEVEL_ENV: &str = "VLC_RESUME_LOG";

fn parse_log_level(value: Option<&str>) -> log::LevelFilter {
    match value.map(|level| level.trim().to_ascii_lowercase()).as_deref() {
        Some("error") => log::LevelFilter::Error,
        Some("warn") => log::LevelFilter::Warn,
        Some("info") => log::LevelFilter::Info,
        Some("trace") => log::LevelFilter::Trace,
        Some("off") => log::LevelFilter::Off,
        _ => log::LevelFilter::Debug,
    }
}

/// Picks the state file: CLI argument, then environment override, then the user config dir.
fn resolve_state_path(
    cli_arg: Option<String>,
    env_override: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> PathBuf {
    if let Some(path) = cli_arg.filter(|path| !path.trim().is_empty()) {
        return PathBuf::from(path);
    }
    if let Some(path) = env_override.filter(|path| !path.is_empty()) {
        return PathBuf::from(path);
    }
    config_dir
        .map(|dir| dir.join(STATE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(STATE_FILE_NAME))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut clog = colog::default_builder();
    clog.filter(
        None,
        parse_log_level(std::env::var(LOG_LEVEL_ENV).ok().as_deref()),
    );
    clog.init();

    std::panic::set_hook(Box::new(|panic_info| {
        let current_thread = std::thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{}': {}", thread_name, panic_info);
    }));

    let state_path = resolve_state_path(
        std::env::args().nth(1),
        std::env::var_os(STATE_PATH_ENV),
        dirs::config_dir(),
    );
    let store = TomlStateStore::new(state_path);
    let state = store.load().inspect_err(|err| error!("{}", err))?;
    info!(
        "Loaded resume state. path={} playing={} position={}s begin_skip={}s end_skip={}s",
        store.path().display(),
        state.playing,
        state.position,
        state.begin_skip,
        state.end_skip
    );

    let password = credentials::resolve_control_password(&state.control);
    if let Err(err) = player_launcher::launch(&state.player_path, &state.control, &password) {
        error!(
            "Failed to start player {}: {}. Continuing with an already running player.",
            state.player_path, err
        );
    }

    let player = VlcHttpPlayer::new(&state.control, &password);
    ReconcileLoop::new(player, store, state, LoopTimings::default()).run()
}
