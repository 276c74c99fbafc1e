//! Runs an `AppController` on the event loop: UI events and display frames
//! arrive as messages and are handled strictly one after another.

use std::{any::Any, time::Instant};

use actors::{
    actor::{Actor, ActorError, SupervisionStrategy},
    actor_ref::ActorRef,
    frames::FrameTicker,
    handler::{Handler, Message},
};
use async_trait::async_trait;
use model::{Coordinate, LogEntry};
use utility::id::Id;

use crate::{
    animation::AnimationPhase,
    app::{AppController, AppError, AppEvent, AppResult, EntryForm},
    map::MapView,
    storage::KeyValueStore,
};

#[derive(Debug, Clone)]
pub enum UiEvent {
    StartRoute,
    StartSpot,
    MapClick(Coordinate),
    MapDoubleClick,
    SubmitForm(EntryForm),
    Cancel,
    HoverEntry(Id<LogEntry>),
    UnhoverEntry(Id<LogEntry>),
    SelectEntry(Id<LogEntry>),
    DeleteConfirmed(Id<LogEntry>),
}

impl Message for UiEvent {
    type Response = AppResult<AppEvent>;
}

/// One display refresh.
#[derive(Debug, Clone, Copy)]
pub struct Frame(pub Instant);

impl Message for Frame {
    type Response = ();
}

#[derive(Debug, Clone, Copy)]
pub struct ListEntries;

impl Message for ListEntries {
    type Response = Vec<LogEntry>;
}

#[derive(Debug, Clone)]
pub struct PhaseOf(pub Id<LogEntry>);

impl Message for PhaseOf {
    type Response = AnimationPhase;
}

impl<M, S> Actor for AppController<M, S>
where
    M: MapView + Send + 'static,
    S: KeyValueStore + Send + 'static,
{
    fn on_fail(&mut self, _error: Box<dyn Any + Send>) -> SupervisionStrategy {
        log::warn!(
            "event handler failed, keeping {} entries and the current drawing",
            self.store().len()
        );
        SupervisionStrategy::Resume
    }
}

#[async_trait]
impl<M, S> Handler<UiEvent> for AppController<M, S>
where
    M: MapView + Send + 'static,
    S: KeyValueStore + Send + 'static,
{
    async fn handle(&mut self, message: UiEvent) -> AppResult<AppEvent> {
        log::debug!("ui event {:?}", message);
        match message {
            UiEvent::StartRoute => self.start_route(),
            UiEvent::StartSpot => self.start_spot(),
            UiEvent::MapClick(coordinate) => self.on_map_click(coordinate),
            UiEvent::MapDoubleClick => self.on_map_double_click(),
            UiEvent::SubmitForm(form) => self.submit_form(form),
            UiEvent::Cancel => Ok(self.cancel_drawing()),
            UiEvent::HoverEntry(id) => {
                self.hover_entry(&id, Instant::now())?;
                Ok(AppEvent::Hovered(Some(id)))
            }
            UiEvent::UnhoverEntry(id) => {
                self.unhover_entry(&id)?;
                Ok(AppEvent::Hovered(None))
            }
            UiEvent::SelectEntry(id) => self.select_entry(&id, Instant::now()),
            UiEvent::DeleteConfirmed(id) => self.delete_confirmed(&id),
        }
    }
}

#[async_trait]
impl<M, S> Handler<Frame> for AppController<M, S>
where
    M: MapView + Send + 'static,
    S: KeyValueStore + Send + 'static,
{
    async fn handle(&mut self, message: Frame) {
        self.frame(message.0);
    }
}

#[async_trait]
impl<M, S> Handler<ListEntries> for AppController<M, S>
where
    M: MapView + Send + 'static,
    S: KeyValueStore + Send + 'static,
{
    async fn handle(&mut self, _: ListEntries) -> Vec<LogEntry> {
        self.store().iter().cloned().collect()
    }
}

#[async_trait]
impl<M, S> Handler<PhaseOf> for AppController<M, S>
where
    M: MapView + Send + 'static,
    S: KeyValueStore + Send + 'static,
{
    async fn handle(&mut self, message: PhaseOf) -> AnimationPhase {
        self.animations().phase(&message.0)
    }
}

/// A running app together with the ticker feeding it frames.
pub struct AppHandle<M, S>
where
    M: MapView + Send + 'static,
    S: KeyValueStore + Send + 'static,
{
    actor: ActorRef<AppController<M, S>>,
    ticker: FrameTicker,
}

impl<M, S> AppHandle<M, S>
where
    M: MapView + Send + 'static,
    S: KeyValueStore + Send + 'static,
{
    /// Must be called from within a tokio runtime.
    pub fn run(controller: AppController<M, S>) -> Self {
        let interval = controller.config().frame_interval;
        let actor = actors::spawn(controller);
        let ticker = FrameTicker::spawn(actor.clone(), interval, Frame);
        Self { actor, ticker }
    }

    pub async fn send(&self, event: UiEvent) -> AppResult<AppEvent> {
        self.actor.ask(event).await.map_err(AppError::from)?
    }

    pub async fn entries(&self) -> Result<Vec<LogEntry>, ActorError> {
        self.actor.ask(ListEntries).await
    }

    pub async fn phase_of(&self, id: Id<LogEntry>) -> Result<AnimationPhase, ActorError> {
        self.actor.ask(PhaseOf(id)).await
    }

    pub fn stop_frames(&self) {
        self.ticker.stop();
    }
}
