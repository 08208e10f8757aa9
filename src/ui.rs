// UI layer: a simple interactive menu using `dialoguer` that composes
// the API client calls into a stack deployment flow. The functions are
// small and synchronous; API failures are printed and the menu loop
// continues.

use crate::api::{merge_env_vars, Payload, PortainerClient};
use anyhow::Result;
use dialoguer::{Confirm, Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::path::PathBuf;

/// Main interactive menu. Receives a `PortainerClient` instance and
/// runs a select loop until the user chooses "Exit".
pub fn main_menu(mut api: PortainerClient) -> Result<()> {
    loop {
        let items = vec![
            "Login",
            "Check status",
            "List stacks",
            "Deploy stack from file",
            "Exit",
        ];
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => handle_login(&mut api)?,
            1 => handle_check_status(&api)?,
            2 => handle_list_stacks(&api)?,
            3 => {
                if !api.has_token() {
                    println!("You should login first to deploy a stack.");
                    continue;
                }
                handle_deploy(&api)?;
            }
            4 => break,
            _ => {}
        }
    }
    Ok(())
}

fn spinner(msg: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg);
    pb
}

/// Collect credentials and log in. On success the client stores the
/// token itself; subsequent calls are authenticated.
fn handle_login(api: &mut PortainerClient) -> Result<()> {
    let username: String = Input::new().with_prompt("Username").interact_text()?;
    let password: String = Password::new().with_prompt("Password").interact()?;

    let pb = spinner("Logging in...");
    let outcome = api.login(&username, &password);
    pb.finish_and_clear();

    match outcome {
        Ok(()) => println!("Logged in."),
        Err(e) => println!("Login failed: {}", e),
    }
    Ok(())
}

/// Ask for an expected version and report whether the remote matches.
fn handle_check_status(api: &PortainerClient) -> Result<()> {
    let expected: String = Input::new()
        .with_prompt("Expected Portainer version")
        .interact_text()?;
    match api.check_status(&expected) {
        Ok(true) => println!("Version matches {}.", expected),
        Ok(false) => println!("Version does not match {}.", expected),
        Err(e) => println!("Status check failed: {}", e),
    }
    Ok(())
}

/// Fetch and print the raw stacks payload.
fn handle_list_stacks(api: &PortainerClient) -> Result<()> {
    let pb = spinner("Fetching stacks...");
    let outcome = api.list_stacks();
    pb.finish_and_clear();

    match outcome {
        Ok(Payload::Json(v)) => println!("{}", serde_json::to_string_pretty(&v)?),
        Ok(Payload::Raw(bytes)) => println!("{}", String::from_utf8_lossy(&bytes)),
        Err(e) => println!("Listing stacks failed: {}", e),
    }
    Ok(())
}

/// Deployment flow: fetch the stack's current environment, merge in
/// locally entered overrides (override wins on collision), then push
/// the new stack file.
fn handle_deploy(api: &PortainerClient) -> Result<()> {
    let stack_id: String = Input::new().with_prompt("Stack id").interact_text()?;
    let file_path: String = Input::new()
        .with_prompt("Stack file path")
        .interact_text()?;
    let prune = Confirm::new()
        .with_prompt("Prune services no longer in the stack file?")
        .default(false)
        .interact()?;
    let overrides = collect_overrides()?;

    let pb = spinner("Fetching current environment...");
    let remote = api.get_env_vars(&stack_id);
    pb.finish_and_clear();

    let remote = match remote {
        Ok(vars) => vars,
        Err(e) => {
            println!("Could not fetch environment for stack {}: {}", stack_id, e);
            return Ok(());
        }
    };

    let env_vars = merge_env_vars(remote, overrides);

    let pb = spinner("Deploying stack...");
    let outcome = api.update_stack_from_file(&stack_id, &PathBuf::from(file_path), &env_vars, prune);
    pb.finish_and_clear();

    match outcome {
        Ok(_) => println!("Stack {} updated.", stack_id),
        Err(e) => println!("Deploy failed: {}", e),
    }
    Ok(())
}

/// Prompt for zero or more KEY=VALUE environment overrides.
fn collect_overrides() -> Result<HashMap<String, String>> {
    let mut overrides = HashMap::new();
    loop {
        let add = Confirm::new()
            .with_prompt("Add an environment override?")
            .default(false)
            .interact()?;
        if !add {
            break;
        }
        let entry: String = Input::new().with_prompt("KEY=VALUE").interact_text()?;
        match entry.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                overrides.insert(key.trim().to_string(), value.trim().to_string());
            }
            _ => println!("Expected KEY=VALUE, got '{}'.", entry),
        }
    }
    Ok(overrides)
}
