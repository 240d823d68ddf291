use crate::configuration::get_configuration;
use crate::database::{configure_database, get_connection_pool};
use crate::routes::user::utils::promote_admin;

#[tracing::instrument(name = "Run custom command")]
pub async fn run_custom_commands(args: Vec<String>) -> Result<(), anyhow::Error> {
    if args.len() < 2 {
        eprintln!("Invalid command. Please provide a valid command.");
        return Ok(());
    }
    let command = args[1].as_str();
    let configuration = get_configuration()?;

    match command {
        "migrate" => {
            configure_database(&configuration.database).await?;
            tracing::info!("Migrations applied");
        }
        "promote_admin" => {
            let Some(email) = args.get(2) else {
                eprintln!("Usage: promote_admin <email>");
                return Ok(());
            };
            let pool = get_connection_pool(&configuration.database);
            if promote_admin(&pool, email).await? {
                tracing::info!("{} is now an admin", email);
            } else {
                eprintln!("No user registered with {}", email);
            }
        }
        _ => {
            eprintln!("Unknown command: {}. Please use a valid command.", command);
        }
    }

    Ok(())
}
