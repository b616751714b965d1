use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::rating::EntityKind;

#[derive(Parser, Debug)]
#[command(author, version, about = "content-ratings backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create the database schema if it does not exist yet
    Init {
        /// Drop all tables first
        #[arg(long)]
        reset: bool,
    },
    /// Recompute dynamic ratings from the stored reviews
    Recalculate {
        /// Which records to recalculate
        #[arg(value_enum, default_value_t = Target::All)]
        target: Target,
    },
    /// Print shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Movies,
    People,
    All,
}

impl Target {
    pub fn kinds(&self) -> Vec<EntityKind> {
        match self {
            Target::Movies => vec![EntityKind::Movie],
            Target::People => vec![EntityKind::Person],
            Target::All => EntityKind::ALL.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recalculate_defaults_to_all() {
        let cli = Cli::try_parse_from(["content_ratings", "recalculate"]).unwrap();
        assert_eq!(cli.command, Command::Recalculate { target: Target::All });
        assert_eq!(Target::All.kinds(), vec![EntityKind::Movie, EntityKind::Person]);
    }

    #[test]
    fn test_recalculate_single_kind() {
        let cli = Cli::try_parse_from(["content_ratings", "recalculate", "people"]).unwrap();
        assert_eq!(cli.command, Command::Recalculate { target: Target::People });
    }

    #[test]
    fn test_init_reset_flag() {
        let cli = Cli::try_parse_from(["content_ratings", "init", "--reset"]).unwrap();
        assert_eq!(cli.command, Command::Init { reset: true });
    }

    #[test]
    fn test_serve_port() {
        let cli = Cli::try_parse_from(["content_ratings", "serve", "-p", "8080"]).unwrap();
        assert_eq!(cli.command, Command::Serve { port: 8080 });
    }
}
