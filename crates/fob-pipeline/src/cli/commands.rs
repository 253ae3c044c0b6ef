use clap::{Args, Subcommand};

/// Available tasks
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Clean the output directory and run every step once
    ///
    /// Steps run strictly in order: clean, styles-assets, styles, scripts,
    /// assets. Exits non-zero when a stylesheet or script failed to compile.
    Build,

    /// Rerun steps whenever their sources change
    ///
    /// Watches stylesheets, style images and static assets. In development
    /// mode script modules are watched too.
    Watch,

    /// Serve the output directory with live reload
    Serve(ServeArgs),

    /// Build once, then watch and serve until Ctrl+C
    Dev(ServeArgs),

    /// Remove everything below the output directory
    Clean,

    /// Compile the stylesheet entry point
    Styles,

    /// Copy images living next to the stylesheets
    #[command(name = "styles-assets")]
    StylesAssets,

    /// Bundle every script entry point
    Scripts,

    /// Copy static assets into the output directory
    Assets,
}

/// Arguments for the serving tasks
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeArgs {
    /// First port to try (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Interface to bind (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,
}
