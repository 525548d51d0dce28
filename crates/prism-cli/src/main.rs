//! Prism CLI: the `prism` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            tokens,
            aliases,
            themes,
            out,
            decompose_composites,
            json,
        } => commands::build::run(commands::build::Args {
            tokens,
            aliases,
            themes,
            out,
            decompose_composites,
            json,
        }),

        Commands::Validate { css, json } => commands::validate::run(css, json),

        Commands::Order {
            tokens,
            alias,
            theme,
            json,
        } => commands::order::run(tokens, alias, theme, json),
    }
}
