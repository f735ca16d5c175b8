use clap::Subcommand;

use chronos_core::{Config, Database, SyncClient, SyncPayload};

use super::CliResult;

#[derive(Subcommand)]
pub enum SyncAction {
    /// Mirror local data to the configured endpoint (best-effort)
    Push,
    /// Fetch the remote payload and print it (local data is untouched)
    Pull,
}

pub fn run(action: SyncAction) -> CliResult {
    let config = Config::load_or_default();
    let Some(client) = SyncClient::from_config(&config) else {
        // The mirror is optional; absence is not an error.
        println!("sync not configured (set sync.endpoint and sync.user_id)");
        return Ok(());
    };

    let runtime = tokio::runtime::Runtime::new()?;
    match action {
        SyncAction::Push => {
            let db = Database::open()?;
            let payload = SyncPayload {
                tasks: db.tasks_all()?,
                focus_history: db.sessions_all()?,
                app_state: config.clone(),
            };
            runtime.block_on(client.push_best_effort(&payload));
            println!("ok");
        }
        SyncAction::Pull => {
            match runtime.block_on(client.pull())? {
                Some(payload) => println!("{}", serde_json::to_string_pretty(&payload)?),
                None => println!("no remote data"),
            }
        }
    }
    Ok(())
}
