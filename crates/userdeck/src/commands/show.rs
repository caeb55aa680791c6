//! `userdeck show` -- detail view for a single user.

use std::sync::Arc;

use userdeck_core::{Directory, DirectoryConfig, User};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(user: &Arc<User>) -> String {
    let mut lines = vec![
        format!("ID:        {}", user.id),
        format!("Name:      {}", user.name),
        format!("Username:  {}", user.username),
        format!("Email:     {}", user.email),
        format!("Phone:     {}", user.phone),
        format!("Website:   {}", user.website),
        format!("City:      {}", user.address.city),
        format!("Street:    {} {}", user.address.street, user.address.suite),
        format!("Zipcode:   {}", user.address.zipcode),
        format!("Company:   {}", user.company.name),
    ];
    if !user.company.catch_phrase.is_empty() {
        lines.push(format!("Motto:     {}", user.company.catch_phrase));
    }
    lines.join("\n")
}

pub async fn handle(
    config: DirectoryConfig,
    identifier: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let endpoint = config.endpoint.clone();
    let users = Directory::oneshot(config, |directory| async move {
        Ok(directory.store().users_snapshot())
    })
    .await
    .map_err(|e| util::directory_error(e, &endpoint))?;

    let user = util::find_user(&users, identifier)?;

    let out = output::render_single(&global.output, &user, detail, |u| u.id.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}
