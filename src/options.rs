use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser, Debug)]
#[clap(name = "mergegate", version, about)]
pub struct Options {
    #[clap(flatten)]
    pub config: Config,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the gateway
    Start {
        /// the port to listen on, overrides the port of `--bind`
        #[clap(short, long, env = "PORT")]
        port: Option<u16>,
    },
    /// Print the merged schema and exit
    Compose,
}
