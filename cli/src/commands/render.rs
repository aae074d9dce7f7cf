use std::time::Duration;

use anyhow::{Context, Result};
use choropleth::{Dataset, Session, Sources, ViewConfig};
use tracing::info;

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::RenderArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ViewConfig::from_json_file(path)?,
        None => ViewConfig::default(),
    };

    let sources = Sources {
        data: args.input.data.clone(),
        states: args.input.states.clone(),
        states_object: args.input.states_object.clone(),
        countries: args.countries.clone(),
        countries_object: args.countries_object.clone(),
    };

    info!(data = %sources.data.display(), states = %sources.states.display(), "loading");
    let dataset = Dataset::load(&sources)?;
    let mut session = Session::new(dataset, config)?;

    if let Some(name) = &args.attribute {
        session.select_name(name, Duration::ZERO)
            .with_context(|| format!("[render] cannot select {name:?}"))?;
    }
    session.settle();

    session.write_svg(&args.output, Duration::ZERO, args.force)
}
