//! Terminal front end for the member directory.
//!
//! Lines typed on stdin are fed to the directory loop; every state change is
//! printed as a text table.

use std::sync::Arc;

use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};

use member_directory::directory::console::{ConsoleCommand, parse_line};
use member_directory::directory::controller::DirectoryError;
use member_directory::directory::text::render_snapshot;
use member_directory::directory::{DirectoryHandle, DirectoryOptions, spawn};
use member_directory::domain::member::NewMember;
use member_directory::domain::types::RecordKey;
use member_directory::forms::member::MemberForm;
use member_directory::models::config::ServerConfig;
use member_directory::repository::HttpRepository;

const HELP: &str = "Type to search. Commands: :category A|B|-, :page N, :next, :prev, :refresh, \
:add idNo;fullName;phone;category;dob[;bloodGroup[;address]], \
:edit key;fullName;phone;category;dob[;bloodGroup[;address]], :quit";

fn to_new_member(form: MemberForm) -> Option<NewMember> {
    match NewMember::try_from(form) {
        Ok(member) => Some(member),
        Err(err) => {
            println!("Invalid member: {err}");
            None
        }
    }
}

/// Runs one console command; returns `false` once the user asked to quit.
async fn execute(handle: &DirectoryHandle, command: ConsoleCommand) -> Result<bool, DirectoryError> {
    match command {
        ConsoleCommand::Search(text) => handle.edit_search(text).await?,
        ConsoleCommand::Category(category) => handle.select_category(category).await?,
        ConsoleCommand::Page(page) => handle.go_to_page(page).await?,
        ConsoleCommand::Next => handle.next_page().await?,
        ConsoleCommand::Previous => handle.previous_page().await?,
        ConsoleCommand::Refresh => handle.refresh().await?,
        ConsoleCommand::Add(form) => {
            if let Some(member) = to_new_member(form) {
                match handle.create_member(member).await {
                    Ok(_) => println!("Member added successfully!"),
                    Err(err) => println!("Failed to add member. Please try again. ({err})"),
                }
            }
        }
        ConsoleCommand::Edit { key, form } => {
            let Ok(key) = RecordKey::new(key) else {
                println!("Record key cannot be empty");
                return Ok(true);
            };
            if let Some(member) = to_new_member(form) {
                match handle.update_member(key, member).await {
                    Ok(_) => println!("Member updated successfully!"),
                    Err(err) => println!("Failed to update member. Please try again. ({err})"),
                }
            }
        }
        ConsoleCommand::Quit => return Ok(false),
    }
    Ok(true)
}

#[tokio::main]
async fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));

    let server_config = match ServerConfig::load() {
        Ok(server_config) => server_config,
        Err(err) => {
            log::error!("Error loading server config: {err}");
            std::process::exit(1);
        }
    };

    let repo = match HttpRepository::new(
        &server_config.api_base_url,
        server_config.request_timeout(),
    ) {
        Ok(repo) => repo,
        Err(err) => {
            log::error!("Failed to build API client: {err}");
            std::process::exit(1);
        }
    };

    let handle = spawn(
        Arc::new(repo),
        DirectoryOptions {
            search_debounce: server_config.search_debounce(),
            ..DirectoryOptions::default()
        },
    );

    let mut snapshots = handle.subscribe();
    let printer = tokio::spawn(async move {
        let mut last_printed = None;
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow_and_update().clone();
            // Keystrokes only move the pending search; skip reprinting for those.
            let key = (snapshot.query.clone(), snapshot.result.clone());
            if last_printed.as_ref() == Some(&key) {
                continue;
            }
            println!("{}", render_snapshot(&snapshot));
            last_printed = Some(key);
        }
    });

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                log::error!("Failed to read stdin: {err}");
                break;
            }
        };

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}\n{HELP}");
                continue;
            }
        };

        match execute(&handle, command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                log::error!("{err}");
                break;
            }
        }
    }

    drop(handle);
    let _ = printer.await;
}
