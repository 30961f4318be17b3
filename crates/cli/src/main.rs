//! `colorboxd` -- interactive terminal client for reordering Letterboxd
//! lists by colour.
//!
//! Reads one command per line from stdin and drives a
//! [`SortController`] against the Colorboxd backend. Errors are printed
//! and the loop keeps going.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                      | Description                         |
//! |------------------------|----------|------------------------------|-------------------------------------|
//! | `BACKEND_URL`          | yes      | --                           | Base URL of the auth/sort/write API |
//! | `LISTS_URL`            | no       | `BACKEND_URL`                | Base URL of the list-summary API    |
//! | `REQUEST_TIMEOUT_SECS` | no       | `120`                        | Per-request timeout                 |
//! | `TOKEN_STORE_PATH`     | no       | `.colorboxd/user_token.json` | Where the session token is kept     |
//! | `MIN_LIST_LENGTH`      | no       | `20`                         | Shortest list worth sorting         |
//! | `HINT_DURATION_SECS`   | no       | `3`                          | How long a hint stays up            |
//! | `LIST_TTL_SECS`        | no       | `3600`                       | Lifetime of cached and loaded lists |

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use colorboxd_cli::command::{parse_command, Command, HELP};
use colorboxd_cli::render::{render_lists, render_modes, render_preview};
use colorboxd_client::api::ColorboxdApi;
use colorboxd_client::config::ClientConfig;
use colorboxd_client::token_store::TokenStore;
use colorboxd_core::error::CoreError;
use colorboxd_session::config::SessionConfig;
use colorboxd_session::controller::SortController;
use colorboxd_session::session::{SessionState, SubmitOutcome};

enum Flow {
    Continue,
    Quit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colorboxd=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client_config = ClientConfig::from_env().context("invalid client configuration")?;
    let session_config = SessionConfig::from_env().context("invalid session configuration")?;
    let api = ColorboxdApi::new(&client_config).context("failed to build HTTP client")?;
    let store = TokenStore::new(client_config.token_store_path.clone());

    tracing::info!(
        backend_url = %client_config.backend_url,
        lists_url = %client_config.lists_url,
        min_list_length = session_config.min_list_length,
        "Starting colorboxd",
    );

    let mut controller = SortController::new(Arc::new(api), &session_config);

    match store.load(Utc::now()) {
        Some(token) => {
            println!("Welcome back, {}.", display_name(&token.user_given_name, &token.username));
            controller.set_token(Some(token));
            if controller.load_lists().await.is_ok() {
                println!("{}", render_lists(controller.menu().summaries(), controller.menu().chosen_index()));
            } else {
                print_error(&mut controller);
            }
        }
        None => println!("Sign in with 'login <code>'. Type 'help' for commands."),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(&controller);
        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("! {err}");
                continue;
            }
        };

        if let Flow::Quit = run_command(&mut controller, &store, command).await {
            break;
        }
    }

    tracing::info!("Exiting colorboxd");
    Ok(())
}

async fn run_command(controller: &mut SortController, store: &TokenStore, command: Command) -> Flow {
    match command {
        Command::Login(code) => match controller.sign_in(&code).await {
            Ok(token) => {
                if let Err(err) = store.save(&token, Utc::now()) {
                    tracing::warn!(error = %err, path = %store.path().display(), "Could not persist token");
                }
                println!("Signed in as {}.", display_name(&token.user_given_name, &token.username));
                show_lists(controller, false).await;
            }
            Err(_) => print_error(controller),
        },
        Command::Logout => {
            controller.sign_out();
            if let Err(err) = store.clear() {
                tracing::warn!(error = %err, "Could not remove stored token");
            }
            println!("Signed out.");
        }
        Command::Lists => show_lists(controller, false).await,
        Command::Refresh => show_lists(controller, true).await,
        Command::Select(index) => {
            if controller.select_list(index).is_ok() {
                println!("{}", render_lists(controller.menu().summaries(), controller.menu().chosen_index()));
            } else {
                print_error(controller);
            }
        }
        Command::Sort => match controller.sort_selected().await {
            Ok(true) => show_preview(controller),
            Ok(false) => println!("The list changed while sorting; try again."),
            Err(CoreError::MinimumLength { film_count, .. }) => {
                let menu = controller.menu();
                if let Some(hint) = menu.hint() {
                    println!("{hint}");
                }
                println!("({film_count} films; lists need at least {}.)", menu.min_list_length());
            }
            Err(_) => print_error(controller),
        },
        Command::Modes => {
            let session = controller.session();
            let active = (session.state() != SessionState::Idle).then(|| session.sort_mode().sort_key.key);
            println!("{}", render_modes(active));
        }
        Command::Mode(key) => {
            let result = controller.change_sort_mode(&key);
            after_edit(controller, result);
        }
        Command::Start(entry_id) => {
            let result = controller.choose_start(&entry_id);
            after_edit(controller, result);
        }
        Command::Where(entry_id) => match controller.session().slot_of(&entry_id) {
            Ok(slot) => println!("Entry {entry_id} will be number {}.", slot + 1),
            Err(err) => println!("! {}", err.user_message()),
        },
        Command::Reverse => {
            let result = controller.toggle_reverse();
            after_edit(controller, result);
        }
        Command::Original => {
            let result = controller.toggle_original();
            after_edit(controller, result);
        }
        Command::Show => show_preview(controller),
        Command::Save => match controller.submit().await {
            Ok(SubmitOutcome::Saved { .. }) => println!("List saved to Letterboxd."),
            Ok(SubmitOutcome::Stale) => println!("That save was superseded."),
            Err(_) => print_error(controller),
        },
        Command::Cancel => {
            if controller.cancel().is_ok() {
                println!("Put the list down.");
            } else {
                print_error(controller);
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => return Flow::Quit,
    }
    Flow::Continue
}

async fn show_lists(controller: &mut SortController, refresh: bool) {
    let result = if refresh {
        controller.refresh_lists().await.map(|_| ())
    } else {
        controller.load_lists().await.map(|_| ())
    };
    match result {
        Ok(()) => println!("{}", render_lists(controller.menu().summaries(), controller.menu().chosen_index())),
        Err(_) => print_error(controller),
    }
}

fn after_edit(controller: &mut SortController, result: Result<(), CoreError>) {
    match result {
        Ok(()) => show_preview(controller),
        Err(_) => print_error(controller),
    }
}

fn show_preview(controller: &SortController) {
    match render_preview(controller.session()) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("No list is loaded. Use 'sort' first."),
    }
}

/// Print the recorded error once, then forget it.
fn print_error(controller: &mut SortController) {
    if let Some(message) = controller.last_error() {
        println!("! {message}");
    }
    controller.clear_error();
}

fn prompt(controller: &SortController) {
    let label = match controller.session().list() {
        Some(list) => list.summary.name.as_str(),
        None if controller.token().is_some() => "colorboxd",
        None => "signed out",
    };
    print!("{label}> ");
    let _ = std::io::stdout().flush();
}

fn display_name<'a>(given_name: &'a str, username: &'a str) -> &'a str {
    if given_name.is_empty() {
        username
    } else {
        given_name
    }
}
