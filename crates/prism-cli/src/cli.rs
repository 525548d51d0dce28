use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "prism",
    about = "Prism: compile layered design-token sets into CSS custom properties and JSON",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build resolved artifacts for every requested (alias, theme) pair
    Build {
        /// Combined tokens document, or a directory of layer files
        #[arg(long, default_value = "tokens")]
        tokens: String,

        /// Brand alias to build (repeatable)
        #[arg(long = "alias", required = true)]
        aliases: Vec<String>,

        /// Theme to build: light or dark (repeatable; defaults to both)
        #[arg(long = "theme")]
        themes: Vec<String>,

        /// Output directory for the emitted artifacts
        #[arg(long, default_value = "dist")]
        out: String,

        /// Emit typography composites member-by-member in the CSS output
        #[arg(long)]
        decompose_composites: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the validation report over an emitted CSS artifact
    Validate {
        /// Path to the CSS file to validate
        css: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the base layer order and the effective order for one target
    Order {
        /// Combined tokens document, or a directory of layer files
        #[arg(long, default_value = "tokens")]
        tokens: String,

        /// Brand alias to select
        #[arg(long)]
        alias: String,

        /// Theme to select
        #[arg(long, default_value = "light")]
        theme: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
