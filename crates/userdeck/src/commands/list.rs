//! `userdeck list` -- list directory users with search and sort.

use std::sync::Arc;

use tabled::Tabled;
use userdeck_core::{Directory, DirectoryConfig, User, UserQuery};

use crate::cli::{GlobalOpts, ListArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Company")]
    company: String,
}

impl From<&Arc<User>> for UserRow {
    fn from(user: &Arc<User>) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            city: user.address.city.clone(),
            company: user.company.name.clone(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    config: DirectoryConfig,
    args: &ListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let endpoint = config.endpoint.clone();
    let users = Directory::oneshot(config, |directory| async move {
        Ok(directory.store().users_snapshot())
    })
    .await
    .map_err(|e| util::directory_error(e, &endpoint))?;

    let mut query = UserQuery::default().with_sort(args.sort.into());
    if let Some(term) = &args.search {
        query = query.with_search(term);
    }
    let listing = query.apply(&users);

    let out = output::render_list(
        &global.output,
        &listing,
        |u| UserRow::from(u),
        |u| u.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
