//! User CLI commands

use clap::Subcommand;

use crate::error::FleetResult;
use crate::services::UserService;

use super::Session;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a user
    Add {
        username: String,
        email: String,
        /// Password (prompted for when omitted)
        #[arg(long, env = "FLEET_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// List users
    List,
    /// Check a user's password
    Verify {
        username: String,
        #[arg(long, env = "FLEET_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

fn password_or_prompt(password: Option<String>, prompt: &str) -> FleetResult<String> {
    match password {
        Some(password) => Ok(password),
        None => Ok(rpassword::prompt_password(prompt)?),
    }
}

/// Handle a user command
pub fn handle_user_command(session: &Session, cmd: UserCommands) -> FleetResult<()> {
    let service = UserService::new(session.storage);

    match cmd {
        UserCommands::Add {
            username,
            email,
            password,
        } => {
            let password = password_or_prompt(password, "Password: ")?;
            let user = service.register(&username, &email, &password)?;
            println!("Registered user: {} <{}>", user.username, user.email);
            println!("  ID: {}", user.id);
        }

        UserCommands::List => {
            let users = service.list()?;
            if users.is_empty() {
                println!("No users registered.");
                println!("Add one with: fleet user add <username> <email>");
                return Ok(());
            }
            for user in users {
                println!("  {:>3}  {}  <{}>", user.id, user.username, user.email);
            }
        }

        UserCommands::Verify { username, password } => {
            let password = password_or_prompt(password, "Password: ")?;
            let user = service.verify(&username, &password)?;
            println!("Credentials OK for {}", user.username);
        }
    }

    Ok(())
}
