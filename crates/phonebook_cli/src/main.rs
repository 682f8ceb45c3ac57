//! Terminal front end for the phonebook client.
//!
//! # Responsibility
//! - Map one subcommand to one user intent on `PhonebookApp`.
//! - Render contacts and the single active error message.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use phonebook_core::{init_logging, ClientConfig, ContactId, PhonebookApp};

const ENV_PASSWORD: &str = "PHONEBOOK_PASSWORD";

#[derive(Debug, Parser)]
#[command(name = "phonebook", version, about = "Manage phone contacts on a remote store")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account and start a session.
    Signup {
        #[arg(long)]
        email: String,
        /// Read from `PHONEBOOK_PASSWORD` when the flag is omitted.
        #[arg(long, env = ENV_PASSWORD, hide_env_values = true)]
        password: String,
    },
    /// Start a session.
    Login {
        #[arg(long)]
        email: String,
        /// Read from `PHONEBOOK_PASSWORD` when the flag is omitted.
        #[arg(long, env = ENV_PASSWORD, hide_env_values = true)]
        password: String,
    },
    /// End the session and forget the stored token.
    Logout,
    /// Show whether a session token is stored.
    Status,
    /// List contacts, optionally filtered by name or phone.
    List {
        #[arg(long, short)]
        search: Option<String>,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
    },
    /// Change the name and/or phone of a contact.
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    Delete {
        id: String,
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    allow_missing_env_file(dotenvy::dotenv())?;
    let cli = Cli::parse();

    let config = ClientConfig::from_env().context("failed to load configuration")?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir).context("failed to start logging")?;
    }

    let mut app = PhonebookApp::from_config(&config).context("failed to start client")?;
    let command = cli.command.name();
    info!("event=cli_command module=cli status=start command={command}");
    let result = run(&mut app, cli.command).await;
    match &result {
        Ok(()) => info!("event=cli_command module=cli status=ok command={command}"),
        Err(err) => {
            warn!("event=cli_command module=cli status=error command={command} error={err:#}")
        }
    }
    result
}

/// Accepts a missing `.env` file; any other read or parse failure is reported.
fn allow_missing_env_file<T>(result: Result<T, dotenvy::Error>) -> Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err).context("failed to read .env"),
    }
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::Signup { .. } => "signup",
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Status => "status",
            Self::List { .. } => "list",
            Self::Add { .. } => "add",
            Self::Edit { .. } => "edit",
            Self::Delete { .. } => "delete",
        }
    }
}

async fn run(app: &mut PhonebookApp, command: Command) -> Result<()> {
    match command {
        Command::Signup { email, password } => {
            app.signup(&email, &password).await?;
            println!("account created, logged in as {email}");
        }
        Command::Login { email, password } => {
            app.login(&email, &password).await?;
            println!("logged in as {email}");
        }
        Command::Logout => {
            app.logout()?;
            println!("logged out");
        }
        Command::Status => {
            if app.is_authenticated()? {
                println!("logged in");
            } else {
                println!("not logged in");
            }
        }
        Command::List { search } => {
            require_session(app)?;
            app.refresh().await?;
            let view = app.contacts().filtered_view(search.as_deref().unwrap_or(""));
            let mut shown = 0;
            for contact in &view {
                println!("{:>8}  {:<32}  {}", contact.id, contact.name, contact.phone);
                shown += 1;
            }
            if shown == 0 {
                println!("no contacts");
            }
        }
        Command::Add { name, phone } => {
            require_session(app)?;
            let editor = app.editor_mut();
            editor.open_add();
            editor.set_name(name);
            editor.set_phone(phone);
            let created = app.submit_form().await?;
            println!("added {} ({})", created.name, created.id);
        }
        Command::Edit { id, name, phone } => {
            require_session(app)?;
            if name.is_none() && phone.is_none() {
                bail!("nothing to change; pass --name and/or --phone");
            }
            app.refresh().await?;
            app.open_edit(&ContactId::new(id))?;
            let editor = app.editor_mut();
            if let Some(name) = name {
                editor.set_name(name);
            }
            if let Some(phone) = phone {
                editor.set_phone(phone);
            }
            let updated = app.submit_form().await?;
            println!("updated {} ({})", updated.name, updated.id);
        }
        Command::Delete { id, yes } => {
            require_session(app)?;
            app.refresh().await?;
            app.request_delete(&ContactId::new(id))?;
            if !yes {
                app.editor_mut().dismiss_delete();
                bail!("refusing to delete without --yes");
            }
            let removed = app.confirm_delete().await?;
            println!("deleted {removed}");
        }
    }
    Ok(())
}

fn require_session(app: &PhonebookApp) -> Result<()> {
    if !app.is_authenticated()? {
        bail!("not logged in; run `phonebook login` first");
    }
    Ok(())
}
