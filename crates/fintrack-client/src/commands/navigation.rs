use crate::ClientResult;
use crate::commands::context::{CommandOptions, Workspace};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::NavigationData;
use crate::session::Route;

/// Resolves where a navigation to `requested` ends up for the stored session.
pub fn open(options: CommandOptions<'_>, requested: &str) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let route = Route::parse(requested);
    let navigation = workspace.navigate(route);
    let destination = navigation.destination();

    success(
        "open",
        NavigationData {
            requested: requested.to_string(),
            route,
            allowed: navigation.is_allowed(),
            destination,
            path: destination.path(),
            session: navigation.session().cloned(),
        },
    )
}
