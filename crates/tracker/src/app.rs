//! Orchestrates drawing, storage and animations against UI events.

use std::{error, fmt, time::Instant};

use actors::actor::ActorError;
use model::{coordinate::CoordinateError, route::RouteError, Coordinate, EntryKind, LogEntry, Route, Spot};
use utility::{geo, id::Id};

use crate::{
    animation::AnimationController,
    config::TrackerConfig,
    drawing::{Completion, DrawingMode, DrawingSession, PointOutcome, SessionError},
    geolocation::{self, Geolocation},
    map::{LayerStyle, MapView},
    storage::KeyValueStore,
    store::{EntryStore, StoreError},
};

/// Radius of the area shown around a single spot.
const SPOT_VIEW_RADIUS_KM: f64 = 0.5;

#[derive(Debug)]
pub enum AppError {
    Coordinate(CoordinateError),
    Session(SessionError),
    Route(RouteError),
    Store(StoreError),
    UnknownEntry(Id<LogEntry>),
    NothingToSubmit,
    EventLoop(ActorError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Coordinate(why) => write!(f, "{}", why),
            Self::Session(why) => write!(f, "{}", why),
            Self::Route(why) => write!(f, "{}", why),
            Self::Store(why) => write!(f, "{}", why),
            Self::UnknownEntry(id) => write!(f, "no entry with id {}", id),
            Self::NothingToSubmit => write!(f, "there is no finished drawing to submit"),
            Self::EventLoop(why) => write!(f, "{}", why),
        }
    }
}

impl error::Error for AppError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Coordinate(why) => Some(why),
            Self::Session(why) => Some(why),
            Self::Route(why) => Some(why),
            Self::Store(why) => Some(why),
            Self::EventLoop(why) => Some(why),
            _ => None,
        }
    }
}

impl From<CoordinateError> for AppError {
    fn from(why: CoordinateError) -> Self {
        Self::Coordinate(why)
    }
}

impl From<SessionError> for AppError {
    fn from(why: SessionError) -> Self {
        Self::Session(why)
    }
}

impl From<RouteError> for AppError {
    fn from(why: RouteError) -> Self {
        Self::Route(why)
    }
}

impl From<ActorError> for AppError {
    fn from(why: ActorError) -> Self {
        Self::EventLoop(why)
    }
}

impl From<StoreError> for AppError {
    fn from(why: StoreError) -> Self {
        Self::Store(why)
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// What the UI should present after handling an event.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Idle,
    Drawing {
        points: usize,
        live_distance_km: f64,
    },
    FormRequested(EntryKind),
    EntryAdded(Id<LogEntry>),
    EntryRemoved(Id<LogEntry>),
    Selected(Option<Id<LogEntry>>),
    /// The entry under the pointer, `None` once it left.
    Hovered(Option<Id<LogEntry>>),
}

/// The details a user fills in after drawing. Spots use `notes` as their
/// description and ignore `duration_min`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryForm {
    pub title: Option<String>,
    pub duration_min: Option<u32>,
    pub notes: Option<String>,
}

pub struct AppController<M, S> {
    config: TrackerConfig,
    map: M,
    storage: S,
    store: EntryStore,
    session: DrawingSession,
    animations: AnimationController,
}

impl<M, S> AppController<M, S>
where
    M: MapView,
    S: KeyValueStore,
{
    /// Loads saved entries and renders them.
    pub fn new(config: TrackerConfig, storage: S, map: M) -> Self {
        let store = EntryStore::load(&storage, &config.storage_key);
        let mut app = Self {
            config,
            map,
            storage,
            store,
            session: DrawingSession::new(),
            animations: AnimationController::new(),
        };
        let entries = app.store.iter().cloned().collect::<Vec<_>>();
        for entry in &entries {
            app.render(entry);
        }
        app
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    pub fn animations(&self) -> &AnimationController {
        &self.animations
    }

    pub fn selected_id(&self) -> Option<&Id<LogEntry>> {
        self.animations.selected_id()
    }

    /// Centers the map on the user, or on the configured fallback.
    pub fn initialize_view(&mut self, geolocation: &dyn Geolocation) -> Coordinate {
        let center = geolocation::resolve_center(geolocation, self.config.fallback_center);
        self.map.set_view(center, self.config.zoom);
        center
    }

    pub fn start_route(&mut self) -> AppResult<AppEvent> {
        self.start(DrawingMode::Route)
    }

    pub fn start_spot(&mut self) -> AppResult<AppEvent> {
        self.start(DrawingMode::Spot)
    }

    fn start(&mut self, mode: DrawingMode) -> AppResult<AppEvent> {
        self.session.start(mode)?;
        self.animations.deselect(&mut self.map);
        Ok(self.drawing_event())
    }

    pub fn on_map_click(&mut self, coordinate: Coordinate) -> AppResult<AppEvent> {
        coordinate.validate()?;
        match self.session.mode() {
            Some(DrawingMode::Route) => {
                let outcome = self.session.add_point(coordinate)?;
                self.map.show_draft(self.session.points(), &LayerStyle::draft());
                match outcome {
                    PointOutcome::Appended { .. } => Ok(self.drawing_event()),
                    PointOutcome::LoopClosed { .. } => {
                        Ok(AppEvent::FormRequested(EntryKind::Route))
                    }
                }
            }
            Some(DrawingMode::Spot) => {
                self.session.place_spot(coordinate)?;
                Ok(AppEvent::FormRequested(EntryKind::Spot))
            }
            None => {
                // a click on empty map outside drawing clears the selection
                self.animations.deselect(&mut self.map);
                Ok(AppEvent::Selected(None))
            }
        }
    }

    pub fn on_map_double_click(&mut self) -> AppResult<AppEvent> {
        self.session.finish_route()?;
        Ok(AppEvent::FormRequested(EntryKind::Route))
    }

    /// Turns the finished drawing into an entry, stores and renders it. The
    /// drawing is only handed over once the entry is in the store, so a
    /// rejected submit can be retried.
    pub fn submit_form(&mut self, form: EntryForm) -> AppResult<AppEvent> {
        let entry = match self.session.completion().ok_or(AppError::NothingToSubmit)? {
            Completion::Route {
                coordinates,
                distance_km,
            } => LogEntry::from(Route::create(
                coordinates,
                distance_km,
                form.title,
                form.duration_min,
                form.notes,
            )?),
            Completion::Spot { coordinate } => {
                LogEntry::from(Spot::create(coordinate, form.title, form.notes))
            }
        };

        let id = entry.id().clone();
        self.store.add(entry.clone())?;
        self.session.take_completion();
        self.map.clear_draft();
        self.render(&entry);
        self.persist();
        log::info!("added {} {} ({})", entry.kind(), id, entry.title());
        Ok(AppEvent::EntryAdded(id))
    }

    pub fn cancel_drawing(&mut self) -> AppEvent {
        self.session.cancel();
        self.map.clear_draft();
        AppEvent::Idle
    }

    pub fn hover_entry(&mut self, id: &Id<LogEntry>, now: Instant) -> AppResult<()> {
        let entry = self.entry(id)?;
        let coordinates = entry.coordinates().to_vec();
        self.animations.hover(id, &coordinates, now, &mut self.map);
        Ok(())
    }

    pub fn unhover_entry(&mut self, id: &Id<LogEntry>) -> AppResult<()> {
        self.entry(id)?;
        self.animations.unhover(id, &mut self.map);
        Ok(())
    }

    /// Selects an entry and brings it into view. Selecting the selected entry
    /// again deselects it.
    pub fn select_entry(&mut self, id: &Id<LogEntry>, now: Instant) -> AppResult<AppEvent> {
        let coordinates = self.entry(id)?.coordinates().to_vec();
        if self.animations.is_selected(id) {
            self.animations.deselect(&mut self.map);
            return Ok(AppEvent::Selected(None));
        }
        self.animations.select(id, &coordinates, now, &mut self.map);
        self.focus(&coordinates);
        Ok(AppEvent::Selected(Some(id.clone())))
    }

    /// Removes an entry after the user confirmed. Its animation and selection
    /// are torn down before it leaves the store.
    pub fn delete_confirmed(&mut self, id: &Id<LogEntry>) -> AppResult<AppEvent> {
        self.entry(id)?;
        self.animations.forget(id, &mut self.map);
        self.store.remove(id);
        self.map.remove_layer(id);
        self.persist();
        log::info!("removed entry {}", id);
        Ok(AppEvent::EntryRemoved(id.clone()))
    }

    /// Advances running animations; called once per display frame.
    pub fn frame(&mut self, now: Instant) {
        self.animations.frame(now, &mut self.map);
    }

    fn entry(&self, id: &Id<LogEntry>) -> AppResult<&LogEntry> {
        self.store
            .get(id)
            .ok_or_else(|| AppError::UnknownEntry(id.clone()))
    }

    fn drawing_event(&self) -> AppEvent {
        AppEvent::Drawing {
            points: self.session.points().len(),
            live_distance_km: self.session.live_distance_km(),
        }
    }

    fn render(&mut self, entry: &LogEntry) {
        self.map.render_entry(entry, &LayerStyle::muted());
        self.map.bind_popup(entry.id(), &entry.popup_text());
    }

    fn focus(&mut self, coordinates: &[Coordinate]) {
        match coordinates {
            [spot] => {
                let ((min_lat, min_lon), (max_lat, max_lon)) = geo::calculate_bounding_box(
                    spot.latitude,
                    spot.longitude,
                    SPOT_VIEW_RADIUS_KM,
                );
                self.map.fit_bounds(&[
                    Coordinate::new_unchecked(min_lat, min_lon),
                    Coordinate::new_unchecked(max_lat, max_lon),
                ]);
            }
            _ => self.map.fit_bounds(coordinates),
        }
    }

    /// Saving is best effort; the in-memory store stays authoritative.
    fn persist(&mut self) {
        if let Err(why) = self.store.save(&mut self.storage, &self.config.storage_key) {
            log::error!("could not save entries: {}", why);
        }
    }
}
