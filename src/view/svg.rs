//! Render a [`RegionView`] as a single SVG document: map on the left, chart on
//! the right, selector caption beneath, and the hover label on top.

use std::{io::Write, time::Duration};

use anyhow::Result;

use crate::io::svg::{escape, write_svg_footer, write_svg_header, write_svg_styles};

use super::{InfoLabel, RegionView, Selector};

/// Height of the selector caption row below the map and chart.
const SELECTOR_ROW: f64 = 40.0;

/// Write the whole view, sampling every transition at `now`.
pub(crate) fn write_document<W: Write>(
    writer: &mut W,
    view: &RegionView,
    selector: &Selector,
    label: Option<&InfoLabel>,
    now: Duration,
) -> Result<()> {
    let map = view.map_config();
    let chart = view.chart_config();
    let width = map.width + chart.width;
    let body_height = map.height.max(chart.height);

    write_svg_header(writer, width, body_height + SELECTOR_ROW)?;
    write_svg_styles(writer)?;
    write_map(writer, view, now)?;
    write_chart(writer, view, now)?;

    writeln!(writer, r#"<text class="selector" x="10" y="{}">{}</text>"#,
        body_height + SELECTOR_ROW / 2.0 + 5.0, escape(selector.shown().label))?;

    let caption_x = view.chart_origin().x + chart.left_padding;
    for (i, line) in chart.caption.iter().enumerate() {
        writeln!(writer, r#"<text class="textContent" x="{caption_x}" y="{}">{}</text>"#,
            body_height + 15.0 + 18.0 * i as f64, escape(line))?;
    }

    if let Some(label) = label {
        write_label(writer, label)?;
    }

    write_svg_footer(writer)
}

fn write_map<W: Write>(writer: &mut W, view: &RegionView, now: Duration) -> Result<()> {
    let map = view.map_config();
    let context = view.context();

    writeln!(writer, r#"<g class="map" width="{}" height="{}">"#, map.width, map.height)?;
    if let Some(outline) = &context.graticule_outline {
        writeln!(writer, r#"<path class="gratBackground" d="{outline}"/>"#)?;
    }
    for line in &context.graticule_lines {
        writeln!(writer, r#"<path class="gratLines" d="{line}"/>"#)?;
    }
    if let Some(countries) = &context.countries {
        writeln!(writer, r#"<path class="countries" d="{countries}"/>"#)?;
    }
    for region in view.regions() {
        writeln!(writer, r#"<path class="statesMap {}" d="{}" fill="{}" {}/>"#,
            escape(&region.name), region.path, region.fill.sample(now), region.outline.svg_attrs())?;
    }
    writeln!(writer, "</g>")?;
    Ok(())
}

fn write_chart<W: Write>(writer: &mut W, view: &RegionView, now: Duration) -> Result<()> {
    let chart = view.chart_config();
    let origin = view.chart_origin();
    let scale = view.scale();

    writeln!(writer, r#"<g class="chart" transform="translate({},{})">"#, origin.x, origin.y)?;
    writeln!(writer, r#"<rect class="chartBackground" x="{}" y="{}" width="{}" height="{}"/>"#,
        chart.left_padding, chart.top_bottom_padding, chart.inner_width(), chart.inner_height())?;
    writeln!(writer, r#"<text class="chartTitle" x="{}" y="40">{}</text>"#,
        chart.width / 2.0 - 80.0, escape(&view.title()))?;

    for bar in view.bars() {
        let geometry = bar.geometry.sample(now);
        // Values below the domain start give negative heights; draw them downward.
        let (y, height) = if geometry.height < 0.0 {
            (geometry.y + geometry.height, -geometry.height)
        } else {
            (geometry.y, geometry.height)
        };
        writeln!(writer, r#"<rect class="bar {}" x="{:.3}" y="{:.3}" width="{:.3}" height="{:.3}" fill="{}" {}/>"#,
            escape(&bar.name), geometry.x, y, geometry.width, height, bar.fill.sample(now), bar.outline.svg_attrs())?;
    }

    let [lo, hi] = chart.domain;
    writeln!(writer, r#"<g class="axis" transform="translate({},{})">"#, chart.left_padding, chart.top_bottom_padding)?;
    writeln!(writer, r#"<path d="M0,{:.3} L0,{:.3}"/>"#, scale.y(lo), scale.y(hi))?;
    if chart.tick_step > 0.0 {
        let mut tick = lo;
        while tick <= hi + f64::EPSILON {
            let y = scale.y(tick);
            writeln!(writer, r#"<line x1="-6" y1="{y:.3}" x2="0" y2="{y:.3}"/><text x="-9" y="{:.3}" text-anchor="end">{tick}</text>"#, y + 3.0)?;
            tick += chart.tick_step;
        }
    }
    writeln!(writer, "</g>")?;

    writeln!(writer, r#"<rect class="chartFrame" x="{}" y="{}" width="{}" height="{}"/>"#,
        chart.left_padding, chart.top_bottom_padding, chart.inner_width(), chart.inner_height())?;
    writeln!(writer, "</g>")?;
    Ok(())
}

fn write_label<W: Write>(writer: &mut W, label: &InfoLabel) -> Result<()> {
    let x = label.position.x;
    let y = label.position.y;
    writeln!(writer, r#"<g class="infoLabel" id="{}">"#, escape(&label.id))?;
    writeln!(writer, r#"<rect x="{x:.3}" y="{y:.3}" width="{:.3}" height="{:.3}"/>"#, label.width, label.height)?;
    writeln!(writer, r#"<text x="{:.3}" y="{:.3}"><tspan font-weight="bold">{}</tspan><tspan x="{:.3}" dy="20">{}</tspan></text>"#,
        x + 10.0, y + 25.0, escape(&label.title), x + 10.0, escape(&label.body))?;
    writeln!(writer, "</g>")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        attr::{Attribute, Record},
        classify::build_scale,
        config::ViewConfig,
        io::svg::SvgStringWriter,
        view::{InteractionController, ViewState},
    };

    fn render(label: bool) -> String {
        let records = [
            Record::new("New_Mexico", [(Attribute::Cost, Some(-5.0))].into_iter().collect()),
            Record::new("Ohio", [(Attribute::Cost, Some(93.0))].into_iter().collect()),
        ];
        let config = ViewConfig::default();
        let scheme = build_scale(&records, Attribute::Cost, &config.palette);
        let mut view = RegionView::new(&config, Attribute::Cost);
        view.draw_chart(&records, &scheme);

        let mut controller = InteractionController::new(config.label.clone());
        if label {
            controller.on_hover_enter(&mut view, &ViewState::new(), "Ohio");
        }

        let mut writer = SvgStringWriter::new();
        write_document(&mut writer, &view, &Selector::new(), controller.label(), Duration::ZERO).unwrap();
        writer.into_string().unwrap()
    }

    #[test]
    fn document_has_chart_selector_and_bars() {
        let svg = render(false);
        assert!(svg.contains("Cost Index by State"));
        assert!(svg.contains(r#"class="selector""#));
        assert!(svg.contains("Select Attribute"));
        assert!(svg.contains(r#"class="bar Ohio""#));
        assert!(svg.contains(r#"class="bar New_Mexico""#));
        assert!(!svg.contains(r#"height="-"#));
        assert!(!svg.contains("infoLabel\" id"));
    }

    #[test]
    fn axis_sits_inside_the_padded_chart() {
        let svg = render(false);
        assert!(svg.contains(r#"<g class="axis" transform="translate(25,3)">"#));
        assert!(svg.contains(r#"<path d="M0,463.000 L0,0.000"/>"#));
        assert!(svg.contains(r#"y1="0.000" x2="0" y2="0.000"/><text x="-9" y="3.000" text-anchor="end">200</text>"#));
    }

    #[test]
    fn attribution_caption_follows_the_chart() {
        let svg = render(false);
        let config = ViewConfig::default();
        assert!(svg.contains(r#"class="textContent""#));
        assert!(svg.contains("cost-of-living-index-by-state/</text>"));
        assert!(svg.contains(&format!(r#"x="{}" y="{}""#, config.map.width + config.chart.left_padding, 500.0 + 15.0)));
    }

    #[test]
    fn hovered_region_renders_label_and_highlight() {
        let svg = render(true);
        assert!(svg.contains(r#"id="Ohio_label""#));
        assert!(svg.contains(">93<"));
        assert!(svg.contains(">Ohio<"));
        assert!(svg.contains(r##"stroke="#fed976" stroke-width="2""##));
    }
}
