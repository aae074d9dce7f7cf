use std::{fs::File, io::{BufWriter, Write}, path::Path, time::Duration};

use anyhow::{Context, Result};
use geo::Coord;
use tracing::info;

use crate::{
    attr::{Attribute, Record},
    classify::{ClassificationScheme, build_scale},
    common,
    config::ViewConfig,
    io::svg::{SvgStringWriter, SvgWriter},
    map::{Projector, RegionShape, bounds_of, join, regions_to_geojson},
    view::{InfoLabel, InteractionController, RegionView, SelectionError, Selector, ViewState, write_document},
};

use super::Dataset;

/// A loaded, joined and drawn map + chart, driven by selection and pointer events.
///
/// Every selection change reclassifies and updates the view before returning,
/// so the view is consistent with the state after each call; only the
/// visual transitions are still in flight.
pub struct Session {
    config: ViewConfig,
    records: Vec<Record>,
    regions: Vec<RegionShape>,
    state: ViewState,
    selector: Selector,
    scheme: ClassificationScheme,
    view: RegionView,
    controller: InteractionController,
}

impl Session {
    /// Join the dataset and draw the initial view for the first attribute.
    pub fn new(dataset: Dataset, config: ViewConfig) -> Result<Self> {
        let Dataset { records, regions, countries } = dataset;
        let regions = join(regions, &records);
        let state = ViewState::new();
        let scheme = build_scale(&records, state.get(), &config.palette);

        let projector = Projector::new(
            config.map.projection,
            config.map.width,
            config.map.height,
            bounds_of(regions.iter().map(|region| &region.geometry)),
        )?;

        let mut view = RegionView::new(&config, state.get());
        view.draw_context(&countries, &projector)
            .context("[session] Failed to draw context layers")?;
        view.draw_map(&regions, &projector, &scheme)
            .context("[session] Failed to draw regions")?;
        view.draw_chart(&records, &scheme);

        info!(regions = regions.len(), bars = records.len(), attribute = %state.get(), "session ready");
        Ok(Self {
            controller: InteractionController::new(config.label.clone()),
            config,
            records,
            regions,
            state,
            selector: Selector::new(),
            scheme,
            view,
        })
    }

    #[inline] pub fn config(&self) -> &ViewConfig { &self.config }

    #[inline] pub fn records(&self) -> &[Record] { &self.records }

    /// Region shapes with their joined attribute values.
    #[inline] pub fn regions(&self) -> &[RegionShape] { &self.regions }

    #[inline] pub fn state(&self) -> &ViewState { &self.state }

    #[inline] pub fn selector(&self) -> &Selector { &self.selector }

    #[inline] pub fn scheme(&self) -> &ClassificationScheme { &self.scheme }

    #[inline] pub fn view(&self) -> &RegionView { &self.view }

    #[inline] pub fn label(&self) -> Option<&InfoLabel> { self.controller.label() }

    #[inline] pub fn hovered(&self) -> Option<&str> { self.controller.hovered() }

    /// Select `attribute` at time `now`. Returns false if it was already selected.
    pub fn select(&mut self, attribute: Attribute, now: Duration) -> bool {
        self.selector.show(attribute);
        let Some(change) = self.state.set(attribute) else { return false };

        self.scheme = build_scale(&self.records, change.current, &self.config.palette);
        self.view.update(change.current, &self.scheme, change.revision, now);
        self.controller.refresh_label(&self.view, &self.state);
        true
    }

    /// Select by attribute name; unknown names leave the selection unchanged.
    pub fn select_name(&mut self, name: &str, now: Duration) -> Result<bool, SelectionError> {
        let attribute = self.selector.choose_name(name)?;
        Ok(self.select(attribute, now))
    }

    /// Select by selector option index; the placeholder is rejected.
    pub fn select_option(&mut self, index: usize, now: Duration) -> Result<bool, SelectionError> {
        let attribute = self.selector.choose(index)?;
        Ok(self.select(attribute, now))
    }

    /// Pointer entered the element(s) named `name`.
    pub fn hover_enter(&mut self, name: &str) -> usize {
        self.controller.on_hover_enter(&mut self.view, &self.state, name)
    }

    /// Pointer left the element(s) named `name`.
    pub fn hover_exit(&mut self, name: &str) {
        self.controller.on_hover_exit(&mut self.view, name)
    }

    /// Pointer moved while over a hovered element (viewport coordinates).
    pub fn on_move(&mut self, pointer: Coord<f64>) {
        self.controller.on_move(pointer)
    }

    /// Pointer moved to `point` in document coordinates; resolves the element underneath.
    pub fn pointer_moved(&mut self, point: Coord<f64>) {
        self.controller.pointer_moved(&mut self.view, &self.state, point)
    }

    /// Complete every in-flight transition.
    pub fn settle(&mut self) { self.view.settle() }

    /// True if the view was last updated for the current selection.
    pub fn is_consistent(&self) -> bool {
        self.view.revision() == self.state.revision() && self.view.attribute() == self.state.get()
    }

    /// Render the document, sampling transitions at `now`.
    pub fn render_svg(&self, now: Duration) -> Result<String> {
        let mut writer = SvgStringWriter::new();
        write_document(&mut writer, &self.view, &self.selector, self.controller.label(), now)?;
        writer.into_string()
    }

    /// Write the rendered document to `path`.
    pub fn write_svg(&self, path: &Path, now: Duration, force: bool) -> Result<()> {
        common::prepare_output(path, force)?;
        let mut writer = SvgWriter::new(path)?;
        write_document(&mut writer, &self.view, &self.selector, self.controller.label(), now)?;
        writer.finish()?;
        info!(path = %path.display(), attribute = %self.state.get(), "svg written");
        Ok(())
    }

    /// Write the joined regions as a GeoJSON FeatureCollection.
    pub fn write_geojson(&self, path: &Path, force: bool) -> Result<()> {
        common::prepare_output(path, force)?;
        let file = File::create(path)
            .with_context(|| format!("[session] Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &regions_to_geojson(&self.regions))
            .with_context(|| format!("[session] Failed to write GeoJSON to {}", path.display()))?;
        writer.flush()?;
        info!(path = %path.display(), regions = self.regions.len(), "geojson written");
        Ok(())
    }
}
