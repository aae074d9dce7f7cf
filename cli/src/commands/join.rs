use anyhow::Result;
use choropleth::{Dataset, Session, Sources, ViewConfig};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::JoinArgs) -> Result<()> {
    let sources = Sources {
        states_object: args.input.states_object.clone(),
        ..Sources::new(&args.input.data, &args.input.states)
    };

    let session = Session::new(Dataset::load(&sources)?, ViewConfig::default())?;
    session.write_geojson(&args.output, args.force)
}
