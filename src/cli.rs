use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pokedex-seed")]
#[command(version, about = "Seed a local SQLite Pokédex from the public PokeAPI catalog")]
pub struct Cli {
    /// SQLite database path or sqlite:// connection string
    #[arg(long, global = true, env = "DATABASE_URL")]
    pub database: Option<String>,

    /// Catalog base URL
    #[arg(long, global = true, env = "POKEAPI_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clear the database and reseed every generation
    Seed {
        /// Show a full-screen progress view
        #[arg(long)]
        tui: bool,
    },

    /// Re-fetch shiny artwork and home sprites for stored pokemon
    RefreshSprites {
        /// Show a full-screen progress view
        #[arg(long)]
        tui: bool,
    },

    /// List the stored pokemon of one generation as JSON
    List {
        /// Generation number (1-7)
        generation: i64,
    },

    /// Show one stored pokemon with its relations as JSON
    Show {
        /// Pokemon id
        id: i64,
    },

    /// Search stored pokemon by name, type or exact id
    Search {
        query: String,
    },

    /// List all table names
    Tables,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Whether this invocation draws the full-screen view
    pub fn uses_tui(&self) -> bool {
        matches!(
            self.command,
            Commands::Seed { tui: true } | Commands::RefreshSprites { tui: true }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_database_after_subcommand() {
        let cli = Cli::try_parse_from(["pokedex-seed", "seed", "--tui", "--database", "sqlite://dex.db"])
            .unwrap();
        assert!(cli.uses_tui());
        assert_eq!(cli.database.as_deref(), Some("sqlite://dex.db"));
    }

    #[test]
    fn test_parse_read_commands() {
        let cli = Cli::try_parse_from(["pokedex-seed", "list", "2"]).unwrap();
        assert!(matches!(cli.command, Commands::List { generation: 2 }));
        assert!(!cli.uses_tui());

        let cli = Cli::try_parse_from(["pokedex-seed", "search", "fire"]).unwrap();
        assert!(matches!(cli.command, Commands::Search { ref query } if query == "fire"));
    }
}
