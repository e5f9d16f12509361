use clap::Parser;
use std::process;
use todo_list::cli::{Cli, Commands};
use todo_list::cli_handlers;

fn main() {
    // Logs go to stderr so list output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    let result = match cli.command {
        Commands::Add { description } => cli_handlers::handle_add(&config, &description),
        Commands::List => cli_handlers::handle_list(&config),
        Commands::Remove { index } => cli_handlers::handle_remove(&config, index),
        Commands::Edit { index, description } => {
            cli_handlers::handle_edit(&config, index, &description)
        }
        Commands::Toggle { index } => cli_handlers::handle_toggle(&config, index),
        Commands::Clear => cli_handlers::handle_clear(&config),
        Commands::Move { from, to } => cli_handlers::handle_move(&config, from, to),
        Commands::Export => cli_handlers::handle_export(&config),
        Commands::Reset => cli_handlers::handle_reset(&config),
        Commands::Shell => cli_handlers::handle_shell(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
