use std::path::PathBuf;

/// Choropleth map and bar chart of per-state cost indices
#[derive(clap::Parser, Debug)]
#[command(name = "choropleth", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Render the map and chart to an SVG file
    Render(RenderArgs),

    /// Print the class breaks of one or all attributes
    Breaks(BreaksArgs),

    /// Write region shapes with joined attribute values as GeoJSON
    Join(JoinArgs),
}

/// Input files shared by commands that need region shapes.
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Attribute table (CSV with a "name" column)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub data: PathBuf,

    /// Region shapes (GeoJSON or TopoJSON)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub states: PathBuf,

    /// TopoJSON object holding the regions, defaults to the first
    #[arg(long)]
    pub states_object: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Country outlines drawn beneath the regions (GeoJSON or TopoJSON)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub countries: Option<PathBuf>,

    /// TopoJSON object holding the country outlines, defaults to the first
    #[arg(long)]
    pub countries_object: Option<String>,

    /// Attribute to show, e.g. "Housing Cost Index"
    #[arg(short, long)]
    pub attribute: Option<String>,

    /// View configuration (JSON); missing fields use defaults
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Output SVG file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Overwrite the output file if it exists
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug)]
pub struct BreaksArgs {
    /// Attribute table (CSV with a "name" column)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub data: PathBuf,

    /// Only this attribute, defaults to all
    #[arg(short, long)]
    pub attribute: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct JoinArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output GeoJSON file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// Overwrite the output file if it exists
    #[arg(long)]
    pub force: bool,
}
