//! The narrow contract the core uses to talk to whatever draws the map.

use model::{Coordinate, LogEntry};
use utility::id::Id;

#[derive(Debug, Clone, PartialEq)]
pub struct LayerStyle {
    pub color: &'static str,
    pub weight: f64,
    pub opacity: f64,
    pub dash_array: Option<&'static str>,
    pub dash_offset: f64,
}

impl LayerStyle {
    /// Resting look of every entry.
    pub fn muted() -> Self {
        Self {
            color: "#7a8a99",
            weight: 4.0,
            opacity: 0.6,
            dash_array: None,
            dash_offset: 0.0,
        }
    }

    /// Base layer while the entry is animated.
    pub fn highlighted() -> Self {
        Self {
            color: "#00c46a",
            weight: 5.0,
            opacity: 0.35,
            ..Self::muted()
        }
    }

    /// Overlay revealing the path vertex by vertex.
    pub fn progress() -> Self {
        Self {
            color: "#00c46a",
            weight: 6.0,
            opacity: 1.0,
            dash_array: None,
            dash_offset: 0.0,
        }
    }

    /// Overlay once fully drawn; `dash_offset` moves the stripes.
    pub fn stripes(dash_offset: f64) -> Self {
        Self {
            dash_array: Some("8 8"),
            dash_offset,
            ..Self::progress()
        }
    }

    /// The polyline of a route still being drawn.
    pub fn draft() -> Self {
        Self {
            color: "#ffb545",
            weight: 4.0,
            opacity: 0.9,
            dash_array: Some("4 6"),
            dash_offset: 0.0,
        }
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self::muted()
    }
}

/// Every layer is keyed by the id of the entry it shows. An entry has at most
/// one base layer and one animation overlay.
pub trait MapView {
    fn set_view(&mut self, center: Coordinate, zoom: f64);
    fn fit_bounds(&mut self, coordinates: &[Coordinate]);

    fn render_entry(&mut self, entry: &LogEntry, style: &LayerStyle);
    fn bind_popup(&mut self, id: &Id<LogEntry>, text: &str);
    fn update_style(&mut self, id: &Id<LogEntry>, style: &LayerStyle);
    fn remove_layer(&mut self, id: &Id<LogEntry>);

    fn draw_overlay(&mut self, id: &Id<LogEntry>, coordinates: &[Coordinate], style: &LayerStyle);
    fn update_overlay_style(&mut self, id: &Id<LogEntry>, style: &LayerStyle);
    fn remove_overlay(&mut self, id: &Id<LogEntry>);

    fn show_draft(&mut self, points: &[Coordinate], style: &LayerStyle);
    fn clear_draft(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    SetView(Coordinate, f64),
    FitBounds(Vec<Coordinate>),
    RenderEntry(Id<LogEntry>),
    BindPopup(Id<LogEntry>, String),
    UpdateStyle(Id<LogEntry>, LayerStyle),
    RemoveLayer(Id<LogEntry>),
    DrawOverlay(Id<LogEntry>, usize),
    UpdateOverlayStyle(Id<LogEntry>, LayerStyle),
    RemoveOverlay(Id<LogEntry>),
    ShowDraft(usize),
    ClearDraft,
}

/// A headless map that records and logs every call it receives.
#[derive(Debug, Default)]
pub struct RecordingMap {
    calls: Vec<MapCall>,
}

impl RecordingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[MapCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<MapCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn count(&self, predicate: impl Fn(&MapCall) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    fn record(&mut self, call: MapCall) {
        log::trace!("map: {:?}", call);
        self.calls.push(call);
    }
}

impl MapView for RecordingMap {
    fn set_view(&mut self, center: Coordinate, zoom: f64) {
        self.record(MapCall::SetView(center, zoom));
    }

    fn fit_bounds(&mut self, coordinates: &[Coordinate]) {
        self.record(MapCall::FitBounds(coordinates.to_vec()));
    }

    fn render_entry(&mut self, entry: &LogEntry, _style: &LayerStyle) {
        self.record(MapCall::RenderEntry(entry.id().clone()));
    }

    fn bind_popup(&mut self, id: &Id<LogEntry>, text: &str) {
        self.record(MapCall::BindPopup(id.clone(), text.to_owned()));
    }

    fn update_style(&mut self, id: &Id<LogEntry>, style: &LayerStyle) {
        self.record(MapCall::UpdateStyle(id.clone(), style.clone()));
    }

    fn remove_layer(&mut self, id: &Id<LogEntry>) {
        self.record(MapCall::RemoveLayer(id.clone()));
    }

    fn draw_overlay(&mut self, id: &Id<LogEntry>, coordinates: &[Coordinate], _style: &LayerStyle) {
        self.record(MapCall::DrawOverlay(id.clone(), coordinates.len()));
    }

    fn update_overlay_style(&mut self, id: &Id<LogEntry>, style: &LayerStyle) {
        self.record(MapCall::UpdateOverlayStyle(id.clone(), style.clone()));
    }

    fn remove_overlay(&mut self, id: &Id<LogEntry>) {
        self.record(MapCall::RemoveOverlay(id.clone()));
    }

    fn show_draft(&mut self, points: &[Coordinate], _style: &LayerStyle) {
        self.record(MapCall::ShowDraft(points.len()));
    }

    fn clear_draft(&mut self) {
        self.record(MapCall::ClearDraft);
    }
}
