// Entrypoint for the CLI application.
// - Keeps `main` small: create an API client and hand it to the UI loop.
// - Returns `anyhow::Result` for error handling at the top level.

use tainer_cli::{api::PortainerClient, ui::main_menu};

fn main() -> anyhow::Result<()> {
    // Host comes from `PORTAINER_HOST`, defaulting to a local instance.
    let api = PortainerClient::from_env()?;

    // Start the interactive menu. This call blocks until the user exits.
    main_menu(api)?;
    Ok(())
}
