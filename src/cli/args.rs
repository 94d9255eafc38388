//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "tola-include.toml";

/// Tola include loader CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: tola-include.toml)
    #[arg(short = 'C', long, global = true, default_value = DEFAULT_CONFIG, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Load a page, resolve its includes and print the composed HTML
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        args: RenderArgs,
    },

    /// Proxy an upstream site, composing HTML pages on the way through
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        args: ServeArgs,
    },
}

/// Render command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Page URL; relative includes are fetched against it
    #[arg(value_hint = clap::ValueHint::Url)]
    pub page: String,

    /// Write output to file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// List placeholders and their resolved URLs without fetching them
    #[arg(short, long)]
    pub dry: bool,

    #[command(flatten)]
    pub include: IncludeArgs,
}

/// Serve command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Origin serving the static site (e.g., http://127.0.0.1:8000)
    #[arg(short, long, value_hint = clap::ValueHint::Url)]
    pub upstream: Option<String>,

    /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
    #[arg(short, long)]
    pub interface: Option<IpAddr>,

    /// Port number to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    #[command(flatten)]
    pub include: IncludeArgs,
}

/// Shared include pass arguments for Render and Serve commands
#[derive(clap::Args, Debug, Clone)]
pub struct IncludeArgs {
    /// Site root prefixed to relative include paths.
    ///
    /// Overrides `data-site-root` on the page's bootstrap script.
    /// Pass an empty string to disable prefixing.
    #[arg(short = 'r', long = "site-root")]
    pub site_root: Option<String>,

    /// Placeholder attribute (default: data-include)
    #[arg(short, long)]
    pub attribute: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    /// Include pass arguments of whichever command is running.
    pub const fn include_args(&self) -> &IncludeArgs {
        match &self.command {
            Commands::Render { args } => &args.include,
            Commands::Serve { args } => &args.include,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_args() {
        let cli = Cli::try_parse_from([
            "tola-include",
            "render",
            "http://localhost:8000/docs/a.html",
            "-o",
            "out.html",
            "--site-root",
            "..",
        ])
        .unwrap();

        let Commands::Render { args } = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.page, "http://localhost:8000/docs/a.html");
        assert_eq!(args.output, Some(PathBuf::from("out.html")));
        assert_eq!(args.include.site_root.as_deref(), Some(".."));
        assert!(!args.dry);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG));
    }

    #[test]
    fn test_empty_site_root_allowed() {
        let cli = Cli::try_parse_from(["tola-include", "s", "--site-root", ""]).unwrap();
        let Commands::Serve { args } = cli.command else {
            panic!("expected serve");
        };
        assert_eq!(args.include.site_root.as_deref(), Some(""));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tola-include", "serve", "-V", "-C", "site.toml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("site.toml"));
        assert!(cli.include_args().verbose);
    }

    #[test]
    fn test_render_requires_page() {
        assert!(Cli::try_parse_from(["tola-include", "render"]).is_err());
    }
}
