//! Command-line arguments and the optional TOML settings file.

use std::{fs, path::Path, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use clap::Parser;
use radio_coverage_grid::GridConfig;
use serde::Deserialize;

/// Plans radio tower coverage for a grid city and answers path queries.
#[derive(Debug, Parser)]
#[command(name = "radio-coverage", version)]
pub(crate) struct Cli {
    /// TOML file providing grid settings; flags take precedence over it.
    #[arg(long, value_name = "FILE")]
    pub(crate) config: Option<PathBuf>,
    /// Number of rows in the city.
    #[arg(long)]
    pub(crate) rows: Option<u32>,
    /// Number of columns in the city.
    #[arg(long)]
    pub(crate) columns: Option<u32>,
    /// Probability, in percent, that a generated cell is blocked.
    #[arg(long)]
    pub(crate) block_percentage: Option<u32>,
    /// Chebyshev radius covered by every tower.
    #[arg(long)]
    pub(crate) radius: Option<u32>,
    /// Seed for the city generator; drawn from entropy when omitted.
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// JSON file holding rows of cell codes that replace the generated city.
    #[arg(long, value_name = "FILE")]
    pub(crate) layout: Option<PathBuf>,
    /// Places towers greedily until every free cell is covered.
    #[arg(long)]
    pub(crate) auto_place: bool,
    /// Places a tower manually; may be repeated.
    #[arg(long = "place", value_name = "ROW,COL")]
    pub(crate) place: Vec<Position>,
    /// Start tower of a path query.
    #[arg(long, value_name = "ROW,COL", requires = "to")]
    pub(crate) from: Option<Position>,
    /// End tower of a path query.
    #[arg(long, value_name = "ROW,COL", requires = "from")]
    pub(crate) to: Option<Position>,
    /// Enables debug logging unless `RUST_LOG` says otherwise.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

/// Signed `ROW,COL` pair as typed on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Position {
    pub(crate) row: i64,
    pub(crate) column: i64,
}

impl FromStr for Position {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (row, column) = value
            .split_once(',')
            .ok_or_else(|| format!("expected ROW,COL but found '{value}'"))?;
        let row = row
            .trim()
            .parse::<i64>()
            .map_err(|error| format!("invalid row in '{value}': {error}"))?;
        let column = column
            .trim()
            .parse::<i64>()
            .map_err(|error| format!("invalid column in '{value}': {error}"))?;
        Ok(Self { row, column })
    }
}

/// Contents of the optional TOML settings file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct FileConfig {
    #[serde(flatten)]
    pub(crate) grid: GridConfig,
    pub(crate) seed: Option<u64>,
}

impl FileConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse settings file at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("settings file is not valid TOML")
    }
}

/// Fully resolved run settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) grid: GridConfig,
    pub(crate) seed: Option<u64>,
    pub(crate) layout: Option<PathBuf>,
    pub(crate) auto_place: bool,
    pub(crate) manual_towers: Vec<Position>,
    pub(crate) path_query: Option<(Position, Position)>,
}

impl Settings {
    /// Merges command-line flags over the settings file over the defaults.
    pub(crate) fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Ok(Self::merge(cli, file))
    }

    fn merge(cli: &Cli, file: FileConfig) -> Self {
        let grid = GridConfig {
            rows: cli.rows.unwrap_or(file.grid.rows),
            columns: cli.columns.unwrap_or(file.grid.columns),
            block_percentage: cli.block_percentage.unwrap_or(file.grid.block_percentage),
            tower_radius: cli.radius.unwrap_or(file.grid.tower_radius),
        };

        Self {
            grid,
            seed: cli.seed.or(file.seed),
            layout: cli.layout.clone(),
            auto_place: cli.auto_place,
            manual_towers: cli.place.clone(),
            path_query: cli.from.zip(cli.to),
        }
    }
}
