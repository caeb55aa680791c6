//! `userdeck watch` -- follow connection state and data changes live.
//!
//! Loads once, then stays attached until Ctrl-C. Passive reconnection in
//! the controller handles lost endpoints; `--refresh N` additionally
//! reloads the data every N seconds.

use std::time::Duration;

use chrono::Utc;
use userdeck_core::{ConnectionState, Directory, DirectoryConfig, DirectoryError};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    config: DirectoryConfig,
    args: &WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let endpoint = config.endpoint.clone();
    let directory = Directory::new(config).map_err(|e| util::directory_error(e, &endpoint))?;

    let color = output::should_color(&global.color);
    let json = matches!(
        global.output,
        OutputFormat::Json | OutputFormat::JsonCompact
    );

    // Subscribe before the first load so its transitions land in the loop.
    let mut state_rx = directory.connection_state();
    let mut users_rx = directory.store().subscribe_users();

    if !global.quiet {
        eprintln!("Watching {endpoint} (Ctrl-C to stop)");
    }

    // A failed initial load is reported but not fatal: the watch stays
    // attached and passive reconnection keeps probing the endpoint.
    if let Err(e) = directory.load().await {
        tracing::warn!(error = %e, "initial load failed");
    }

    let mut refresh = tokio::time::interval(Duration::from_secs(args.refresh.max(1)));
    refresh.tick().await; // consume the immediate first tick

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            biased;
            _ = &mut ctrl_c => break,
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *state_rx.borrow_and_update();
                emit_state(state, directory.current_error(), json, color, global.quiet);
            }
            maybe_users = users_rx.changed() => {
                match maybe_users {
                    Some(users) => emit_users(users.len(), json, global.quiet),
                    None => break,
                }
            }
            _ = refresh.tick(), if args.refresh > 0 => {
                let _ = directory.load().await;
            }
        }
    }

    directory.shutdown().await;
    Ok(())
}

fn emit_state(
    state: ConnectionState,
    error: Option<DirectoryError>,
    json: bool,
    color: bool,
    quiet: bool,
) {
    if quiet {
        return;
    }
    if json {
        let line = output::render_json_compact(&serde_json::json!({
            "ts": Utc::now().to_rfc3339(),
            "event": "state",
            "state": state.to_string(),
            "error": error.as_ref().map(ToString::to_string),
        }));
        println!("{line}");
        return;
    }
    let painted = output::paint_state(state, color);
    match error {
        Some(e) => println!("{} state {painted} ({e})", Utc::now().format("%H:%M:%S")),
        None => println!("{} state {painted}", Utc::now().format("%H:%M:%S")),
    }
}

fn emit_users(count: usize, json: bool, quiet: bool) {
    if quiet {
        return;
    }
    if json {
        let line = output::render_json_compact(&serde_json::json!({
            "ts": Utc::now().to_rfc3339(),
            "event": "users",
            "count": count,
        }));
        println!("{line}");
        return;
    }
    println!("{} users {count} records", Utc::now().format("%H:%M:%S"));
}
