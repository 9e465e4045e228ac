use std::{fs, path::Path};

use anyhow::{Context, Result};
use cartography_catalog::StartingLayout;
use cartography_world::Config;
use clap::ValueEnum;

/// Starting maps selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LayoutArg {
    /// Empty map.
    Blank,
    /// Scattered mountains.
    A,
    /// Mountains around a central cavern.
    B,
}

impl From<LayoutArg> for StartingLayout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Blank => Self::Blank,
            LayoutArg::A => Self::A,
            LayoutArg::B => Self::B,
        }
    }
}

/// Command-line overrides applied on top of the file or default settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) layout: Option<LayoutArg>,
    pub(crate) time_budget: Option<i32>,
    pub(crate) seed: Option<u64>,
}

/// Loads session settings from an optional TOML file and applies overrides.
pub(crate) fn resolve(path: Option<&Path>, overrides: Overrides) -> Result<Config> {
    let base = match path {
        Some(path) => load(path)?,
        None => Config::default(),
    };
    Ok(apply_overrides(base, overrides))
}

fn load(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid settings in {}", path.display()))
}

fn parse(contents: &str) -> Result<Config> {
    toml::from_str(contents).context("failed to parse settings toml contents")
}

fn apply_overrides(mut config: Config, overrides: Overrides) -> Config {
    if let Some(layout) = overrides.layout {
        config.layout = layout.into();
    }
    if let Some(time_budget) = overrides.time_budget {
        config.time_budget = time_budget;
    }
    if let Some(seed) = overrides.seed {
        config.seed = seed;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = parse("layout = \"a\"\n").expect("settings parse");

        assert_eq!(config.layout, StartingLayout::A);
        assert_eq!(config.time_budget, Config::default().time_budget);
        assert_eq!(config.seed, Config::default().seed);
    }

    #[test]
    fn full_file_sets_every_field() {
        let config = parse("layout = \"blank\"\ntime_budget = 12\nseed = 5\n").expect("settings parse");

        assert_eq!(
            config,
            Config {
                layout: StartingLayout::Blank,
                time_budget: 12,
                seed: 5,
            }
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse("layuot = \"a\"\n").is_err());
        assert!(parse("layout = \"c\"\n").is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let base = Config {
            layout: StartingLayout::A,
            time_budget: 12,
            seed: 5,
        };

        let config = apply_overrides(
            base,
            Overrides {
                layout: Some(LayoutArg::B),
                seed: Some(8),
                ..Overrides::default()
            },
        );

        assert_eq!(config.layout, StartingLayout::B);
        assert_eq!(config.time_budget, 12);
        assert_eq!(config.seed, 8);
    }

    #[test]
    fn missing_file_reports_path() {
        let error = resolve(Some(Path::new("/nonexistent/cartography.toml")), Overrides::default())
            .expect_err("file is missing");

        assert!(format!("{error:#}").contains("/nonexistent/cartography.toml"));
    }
}
