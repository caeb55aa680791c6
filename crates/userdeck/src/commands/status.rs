//! `userdeck status` -- probe the endpoint and report connectivity.
//!
//! Prints the verdict on stdout, then exits non-zero when the endpoint
//! is unreachable so scripts can branch on reachability.

use std::time::Duration;

use serde::Serialize;
use userdeck_core::{Directory, DirectoryConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct StatusReport {
    endpoint: String,
    state: String,
    reachable: bool,
}

pub async fn handle(mut config: DirectoryConfig, global: &GlobalOpts) -> Result<(), CliError> {
    // One probe, one verdict. No background reconnection for a one-shot check.
    config.reconnect_interval = Duration::ZERO;
    let endpoint = config.endpoint.clone();

    let directory = Directory::new(config).map_err(|e| util::directory_error(e, &endpoint))?;
    let reachable = directory.probe().await;
    let state = directory.current_state();
    directory.shutdown().await;

    let report = StatusReport {
        endpoint: endpoint.to_string(),
        state: state.to_string(),
        reachable,
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &report,
        |r| {
            [
                format!("Endpoint:   {}", r.endpoint),
                format!("State:      {}", output::paint_state(state, color)),
            ]
            .join("\n")
        },
        |r| r.state.clone(),
    );
    output::print_output(&out, global.quiet);

    if reachable {
        Ok(())
    } else {
        Err(CliError::ConnectionFailed {
            endpoint: endpoint.to_string(),
        })
    }
}
