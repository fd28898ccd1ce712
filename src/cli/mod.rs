// Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gastrobytes")]
#[command(about = "Gastrobytes - recipe store with web page import", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Run database migrations
    Migrate,

    /// Import a recipe from a web page and print it as JSON
    Import {
        /// Recipe page URL
        url: String,

        /// Also store the recipe in the database
        #[arg(long)]
        save: bool,
    },
}
