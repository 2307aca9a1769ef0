use crate::ClientResult;
use crate::commands::context::{CommandOptions, Workspace};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::DashboardData;
use crate::session::Route;
use crate::views::Dashboard;

pub fn run(options: CommandOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let workspace = Workspace::open(&options)?;
    let session = workspace.require(Route::Dashboard)?;
    let dashboard = Dashboard::load(&workspace.store, &session)?;

    let today = options.today();
    let snapshot = dashboard.snapshot(today);
    success(
        "dashboard",
        DashboardData {
            session,
            today,
            summary: snapshot.summary,
            daily: snapshot.daily,
            monthly: snapshot.monthly,
        },
    )
}
