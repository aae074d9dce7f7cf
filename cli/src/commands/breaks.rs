use anyhow::{Context, Result};
use choropleth::{Attribute, Palette, build_scale, read_records};

pub fn run(_cli: &crate::cli::Cli, args: &crate::cli::BreaksArgs) -> Result<()> {
    let records = read_records(&args.data)?;

    let attributes = match &args.attribute {
        Some(name) => vec![name.parse::<Attribute>().with_context(|| format!("[breaks] cannot select {name:?}"))?],
        None => Attribute::ALL.to_vec(),
    };

    let palette = Palette::default();
    for attribute in attributes {
        let scheme = build_scale(&records, attribute, &palette);
        let breaks = scheme.breaks().iter().map(f64::to_string).collect::<Vec<_>>();
        println!("{attribute}: {} classes, breaks [{}]", scheme.num_classes(), breaks.join(", "));
    }

    Ok(())
}
