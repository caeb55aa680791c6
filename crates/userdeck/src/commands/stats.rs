//! `userdeck stats` -- directory summary counts.

use chrono::{DateTime, Utc};
use serde::Serialize;
use userdeck_core::{Directory, DirectoryConfig, DirectoryStats};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct StatsReport {
    endpoint: String,
    total_users: usize,
    unique_cities: usize,
    unique_companies: usize,
    fetched_at: Option<DateTime<Utc>>,
}

fn detail(report: &StatsReport) -> String {
    let fetched = report
        .fetched_at
        .map_or_else(|| "-".to_string(), |ts| ts.to_rfc3339());
    [
        format!("Endpoint:   {}", report.endpoint),
        format!("Users:      {}", report.total_users),
        format!("Cities:     {}", report.unique_cities),
        format!("Companies:  {}", report.unique_companies),
        format!("Fetched:    {fetched}"),
    ]
    .join("\n")
}

pub async fn handle(config: DirectoryConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let endpoint = config.endpoint.clone();
    let (stats, fetched_at) = Directory::oneshot(config, |directory| async move {
        let users = directory.store().users_snapshot();
        Ok((
            DirectoryStats::from_users(&users),
            directory.store().fetched_at(),
        ))
    })
    .await
    .map_err(|e| util::directory_error(e, &endpoint))?;

    let report = StatsReport {
        endpoint: endpoint.to_string(),
        total_users: stats.total_users,
        unique_cities: stats.unique_cities,
        unique_companies: stats.unique_companies,
        fetched_at,
    };

    let out = output::render_single(&global.output, &report, detail, |r| {
        r.total_users.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
