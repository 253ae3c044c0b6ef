#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Command, ServeArgs};
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_build() {
        let cli = Cli::try_parse_from(["fob-pipeline", "build"]).unwrap();
        assert_eq!(cli.command, Command::Build);
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_single_tasks() {
        for (arg, expected) in [
            ("clean", Command::Clean),
            ("styles", Command::Styles),
            ("styles-assets", Command::StylesAssets),
            ("scripts", Command::Scripts),
            ("assets", Command::Assets),
            ("watch", Command::Watch),
        ] {
            let cli = Cli::try_parse_from(["fob-pipeline", arg]).unwrap();
            assert_eq!(cli.command, expected, "task {}", arg);
        }
    }

    #[test]
    fn test_parse_dev_with_port() {
        let cli = Cli::try_parse_from(["fob-pipeline", "dev", "--port", "4000"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Dev(ServeArgs {
                port: Some(4000),
                host: None
            })
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fob-pipeline",
            "serve",
            "-v",
            "--no-color",
            "--config",
            "custom.json",
            "-C",
            "site",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(cli.no_color);
        assert_eq!(cli.config, Some(PathBuf::from("custom.json")));
        assert_eq!(cli.cwd, Some(PathBuf::from("site")));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["fob-pipeline", "build", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_unknown_task_is_rejected() {
        assert!(Cli::try_parse_from(["fob-pipeline", "deploy"]).is_err());
    }

    #[test]
    fn test_task_is_required() {
        assert!(Cli::try_parse_from(["fob-pipeline"]).is_err());
    }
}
