use std::{error, fmt};

use model::{point_distance_km, Coordinate, EntryKind};

/// A click closer than this to the first vertex closes the loop.
pub const LOOP_CLOSE_DISTANCE_KM: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawingMode {
    Route,
    Spot,
}

impl From<DrawingMode> for EntryKind {
    fn from(mode: DrawingMode) -> Self {
        match mode {
            DrawingMode::Route => EntryKind::Route,
            DrawingMode::Spot => EntryKind::Spot,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    DrawingRoute,
    DrawingSpot,
    /// Drawing is complete and waits for `take_completion`.
    RouteReady,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    AlreadyActive,
    NotActive,
    WrongMode,
    InsufficientPoints,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyActive => write!(f, "a drawing session is already active"),
            Self::NotActive => write!(f, "no drawing session is active"),
            Self::WrongMode => write!(f, "operation does not apply to the current mode"),
            Self::InsufficientPoints => write!(f, "a route needs at least 2 points"),
        }
    }
}

impl error::Error for SessionError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointOutcome {
    Appended { live_distance_km: f64 },
    LoopClosed { distance_km: f64 },
}

/// What a finished session hands over for entry creation.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Route {
        coordinates: Vec<Coordinate>,
        distance_km: f64,
    },
    Spot {
        coordinate: Coordinate,
    },
}

impl Completion {
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Route { .. } => EntryKind::Route,
            Self::Spot { .. } => EntryKind::Spot,
        }
    }
}

/// The in-progress drawing. `live_distance_km` is kept equal to the length
/// of `points` by adding one segment per appended vertex.
#[derive(Debug)]
pub struct DrawingSession {
    state: SessionState,
    mode: Option<DrawingMode>,
    points: Vec<Coordinate>,
    live_distance_km: f64,
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawingSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            mode: None,
            points: Vec::new(),
            live_distance_km: 0.0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> Option<DrawingMode> {
        self.mode
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn live_distance_km(&self) -> f64 {
        self.live_distance_km
    }

    /// True while the user is placing points.
    pub fn is_drawing(&self) -> bool {
        matches!(
            self.state,
            SessionState::DrawingRoute | SessionState::DrawingSpot
        )
    }

    pub fn start(&mut self, mode: DrawingMode) -> Result<(), SessionError> {
        match self.state {
            SessionState::Idle | SessionState::Cancelled => {}
            _ => return Err(SessionError::AlreadyActive),
        }
        self.reset();
        self.mode = Some(mode);
        self.state = match mode {
            DrawingMode::Route => SessionState::DrawingRoute,
            DrawingMode::Spot => SessionState::DrawingSpot,
        };
        log::debug!("drawing session started in {:?} mode", mode);
        Ok(())
    }

    pub fn add_point(&mut self, coordinate: Coordinate) -> Result<PointOutcome, SessionError> {
        match self.state {
            SessionState::DrawingRoute => {}
            SessionState::DrawingSpot => return Err(SessionError::WrongMode),
            _ => return Err(SessionError::NotActive),
        }

        if self.points.len() >= 2 {
            let first = self.points[0];
            let last = self.points[self.points.len() - 1];
            if point_distance_km(coordinate, first) < LOOP_CLOSE_DISTANCE_KM {
                self.live_distance_km += point_distance_km(last, first);
                self.points.push(first);
                self.state = SessionState::RouteReady;
                log::debug!(
                    "loop closed after {} points, {:.3} km",
                    self.points.len(),
                    self.live_distance_km
                );
                return Ok(PointOutcome::LoopClosed {
                    distance_km: self.live_distance_km,
                });
            }
        }

        if let Some(&last) = self.points.last() {
            self.live_distance_km += point_distance_km(last, coordinate);
        }
        self.points.push(coordinate);
        Ok(PointOutcome::Appended {
            live_distance_km: self.live_distance_km,
        })
    }

    pub fn finish_route(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::DrawingRoute => {}
            SessionState::DrawingSpot => return Err(SessionError::WrongMode),
            _ => return Err(SessionError::NotActive),
        }
        if self.points.len() < 2 {
            return Err(SessionError::InsufficientPoints);
        }
        self.state = SessionState::RouteReady;
        Ok(())
    }

    pub fn place_spot(&mut self, coordinate: Coordinate) -> Result<(), SessionError> {
        match self.state {
            SessionState::DrawingSpot => {}
            SessionState::DrawingRoute => return Err(SessionError::WrongMode),
            _ => return Err(SessionError::NotActive),
        }
        self.points = vec![coordinate];
        self.state = SessionState::RouteReady;
        Ok(())
    }

    /// Drops all points. Does nothing when idle or already cancelled.
    pub fn cancel(&mut self) {
        if matches!(self.state, SessionState::Idle | SessionState::Cancelled) {
            return;
        }
        self.reset();
        self.state = SessionState::Cancelled;
        log::debug!("drawing session cancelled");
    }

    /// The finished drawing, if there is one, without consuming it.
    pub fn completion(&self) -> Option<Completion> {
        if self.state != SessionState::RouteReady {
            return None;
        }
        match self.mode {
            Some(DrawingMode::Spot) => Some(Completion::Spot {
                coordinate: *self.points.first()?,
            }),
            _ => Some(Completion::Route {
                coordinates: self.points.clone(),
                distance_km: self.live_distance_km,
            }),
        }
    }

    /// Hands over the finished drawing and returns the session to idle.
    pub fn take_completion(&mut self) -> Option<Completion> {
        let completion = self.completion()?;
        self.reset();
        self.state = SessionState::Idle;
        Some(completion)
    }

    fn reset(&mut self) {
        self.mode = None;
        self.points.clear();
        self.live_distance_km = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use model::path_length_km;

    use super::*;

    fn c(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new_unchecked(latitude, longitude)
    }

    fn route_session(points: &[Coordinate]) -> DrawingSession {
        let mut session = DrawingSession::new();
        session.start(DrawingMode::Route).unwrap();
        for point in points {
            session.add_point(*point).unwrap();
        }
        session
    }

    #[test]
    fn start_only_from_idle() {
        let mut session = DrawingSession::new();
        assert_eq!(session.start(DrawingMode::Route), Ok(()));
        assert_eq!(session.state(), SessionState::DrawingRoute);
        assert_eq!(
            session.start(DrawingMode::Spot),
            Err(SessionError::AlreadyActive)
        );
        assert_eq!(session.mode(), Some(DrawingMode::Route));
    }

    #[test]
    fn incremental_distance_matches_full_path() {
        let points = [
            c(28.6, 77.2),
            c(28.605, 77.21),
            c(28.605, 77.21),
            c(28.62, 77.215),
            c(28.63, 77.19),
        ];
        let mut session = DrawingSession::new();
        session.start(DrawingMode::Route).unwrap();
        for (i, point) in points.iter().enumerate() {
            session.add_point(*point).unwrap();
            let expected = path_length_km(&points[..=i]);
            assert!((session.live_distance_km() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn duplicate_clicks_stay_as_vertices() {
        let session = route_session(&[c(1.0, 1.0), c(1.0, 1.0), c(1.0, 1.01)]);
        assert_eq!(session.points().len(), 3);
        assert!(
            (session.live_distance_km() - point_distance_km(c(1.0, 1.0), c(1.0, 1.01))).abs()
                < 1e-12
        );
    }

    #[test]
    fn closes_loop_near_first_point() {
        let mut session = route_session(&[c(0.0, 0.0), c(0.0, 0.001)]);
        let outcome = session.add_point(c(0.00002, 0.00002)).unwrap();

        assert!(matches!(outcome, PointOutcome::LoopClosed { .. }));
        assert_eq!(session.state(), SessionState::RouteReady);
        assert_eq!(session.points(), &[c(0.0, 0.0), c(0.0, 0.001), c(0.0, 0.0)]);
        let expected = path_length_km(session.points());
        assert!((session.live_distance_km() - expected).abs() < 1e-12);
    }

    #[test]
    fn no_loop_closing_with_a_single_point() {
        let mut session = route_session(&[c(0.0, 0.0)]);
        let outcome = session.add_point(c(0.00002, 0.00002)).unwrap();
        assert!(matches!(outcome, PointOutcome::Appended { .. }));
        assert_eq!(session.state(), SessionState::DrawingRoute);
    }

    #[test]
    fn finish_with_one_point_changes_nothing() {
        let mut session = route_session(&[c(0.0, 0.0)]);
        assert_eq!(session.finish_route(), Err(SessionError::InsufficientPoints));
        assert_eq!(session.state(), SessionState::DrawingRoute);
        assert_eq!(session.points(), &[c(0.0, 0.0)]);
        assert_eq!(session.live_distance_km(), 0.0);
    }

    #[test]
    fn finished_route_is_handed_over_once() {
        let mut session = route_session(&[c(28.6, 77.2), c(28.61, 77.21)]);
        session.finish_route().unwrap();
        assert_eq!(session.state(), SessionState::RouteReady);
        assert_eq!(
            session.add_point(c(28.7, 77.3)),
            Err(SessionError::NotActive)
        );

        // peeking leaves the drawing in place
        let peeked = session.completion().unwrap();
        assert_eq!(session.state(), SessionState::RouteReady);
        assert_eq!(session.points().len(), 2);

        let completion = session.take_completion().unwrap();
        assert_eq!(completion, peeked);
        match completion {
            Completion::Route {
                coordinates,
                distance_km,
            } => {
                assert_eq!(coordinates, vec![c(28.6, 77.2), c(28.61, 77.21)]);
                assert!((distance_km - path_length_km(&coordinates)).abs() < 1e-12);
            }
            other => panic!("unexpected completion {:?}", other),
        }
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.take_completion().is_none());
        assert!(session.completion().is_none());
    }

    #[test]
    fn pending_completion_blocks_new_session() {
        let mut session = route_session(&[c(0.0, 0.0), c(0.0, 1.0)]);
        session.finish_route().unwrap();
        assert_eq!(
            session.start(DrawingMode::Spot),
            Err(SessionError::AlreadyActive)
        );
    }

    #[test]
    fn spot_completes_immediately() {
        let mut session = DrawingSession::new();
        session.start(DrawingMode::Spot).unwrap();
        assert_eq!(session.add_point(c(1.0, 2.0)), Err(SessionError::WrongMode));
        assert_eq!(session.finish_route(), Err(SessionError::WrongMode));
        session.place_spot(c(1.0, 2.0)).unwrap();
        assert_eq!(session.state(), SessionState::RouteReady);
        assert_eq!(
            session.take_completion(),
            Some(Completion::Spot {
                coordinate: c(1.0, 2.0)
            })
        );
    }

    #[test]
    fn cancel_discards_points_and_is_idempotent() {
        let mut session = route_session(&[c(0.0, 0.0), c(0.0, 1.0)]);
        session.cancel();
        assert_eq!(session.state(), SessionState::Cancelled);
        assert!(session.points().is_empty());
        assert_eq!(session.live_distance_km(), 0.0);
        session.cancel();
        assert_eq!(session.state(), SessionState::Cancelled);

        session.start(DrawingMode::Spot).unwrap();
        assert_eq!(session.state(), SessionState::DrawingSpot);
    }

    #[test]
    fn cancel_while_idle_is_a_no_op() {
        let mut session = DrawingSession::new();
        session.cancel();
        assert_eq!(session.state(), SessionState::Idle);
    }
}
