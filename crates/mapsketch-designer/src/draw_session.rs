//! Draw session state machine.
//!
//! A [`DrawController`] owns the active tool and at most one in-progress
//! [`DrawSession`]. Each session is one drawing gesture; every mutation of
//! its sketch is published as [`DrawEvent::GeometryChanged`] on the map
//! session's bus, and leaving a session always publishes
//! [`DrawEvent::SessionEnded`] before anything else happens, so overlay
//! subscribers tear down synchronously.
//!
//! ```text
//! Idle --select_tool(t != None)--> Drawing(t, [])
//! Drawing --add_vertex--> Drawing (+vertex)
//! Drawing --finish (enough vertices)--> Idle --(keep tool)--> Drawing(t, [])
//! Drawing --select_tool(any)--> Idle / Drawing(new, [])
//! Drawing --cancel--> Drawing(t, [])
//! ```

use std::sync::Arc;

use mapsketch_core::{
    DrawError, DrawEvent, DrawTool, EventBus, Geometry, MapEvent, Point, SessionEndReason,
    SessionId,
};

/// One drawing gesture
#[derive(Debug, Clone)]
pub struct DrawSession {
    id: SessionId,
    tool: DrawTool,
    vertices: Vec<Point>,
    cursor: Option<Point>,
    vertex_count: u64,
}

impl DrawSession {
    fn new(id: SessionId, tool: DrawTool) -> Self {
        Self {
            id,
            tool,
            vertices: Vec::new(),
            cursor: None,
            vertex_count: 0,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn tool(&self) -> DrawTool {
        self.tool
    }

    /// Committed vertices, in click order
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Rubber-band vertex following the pointer, if any
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    /// Number of vertices added since the session started
    pub fn vertex_count(&self) -> u64 {
        self.vertex_count
    }

    /// The sketch as currently displayed, rubber-band vertex included
    pub fn sketch(&self) -> Option<Geometry> {
        let mut chain = self.vertices.clone();
        chain.extend(self.cursor);
        match self.tool {
            DrawTool::None => None,
            DrawTool::Point => chain.first().copied().map(Geometry::Point),
            DrawTool::LineString => Some(Geometry::LineString(chain)),
            DrawTool::Polygon => Some(Geometry::Polygon(chain)),
        }
    }

    /// The committed vertices as a finished geometry
    fn finished(&self) -> Result<Geometry, DrawError> {
        let geometry = match self.tool {
            DrawTool::None => return Err(DrawError::NotDrawing),
            DrawTool::Point => match self.vertices.first() {
                Some(p) => Geometry::Point(*p),
                None => {
                    return Err(DrawError::TooFewVertices {
                        tool: self.tool,
                        required: 1,
                        actual: 0,
                    })
                }
            },
            DrawTool::LineString => Geometry::LineString(self.vertices.clone()),
            DrawTool::Polygon => Geometry::Polygon(self.vertices.clone()),
        };

        let required = self.tool.min_vertices();
        let actual = geometry.distinct_vertex_count();
        if actual < required {
            return Err(DrawError::TooFewVertices {
                tool: self.tool,
                required,
                actual,
            });
        }
        Ok(geometry)
    }
}

/// State of the drawing state machine
#[derive(Debug, Clone, Default)]
pub enum DrawState {
    /// No tool is armed
    #[default]
    Idle,
    /// A gesture is in progress
    Drawing(DrawSession),
}

/// Drives draw sessions from pointer and keyboard input
#[derive(Debug)]
pub struct DrawController {
    bus: Arc<EventBus>,
    tool: DrawTool,
    state: DrawState,
    next_session: SessionId,
    keep_tool_after_complete: bool,
}

impl DrawController {
    pub fn new(bus: Arc<EventBus>, keep_tool_after_complete: bool) -> Self {
        Self {
            bus,
            tool: DrawTool::None,
            state: DrawState::Idle,
            next_session: 1,
            keep_tool_after_complete,
        }
    }

    /// Currently armed tool
    pub fn tool(&self) -> DrawTool {
        self.tool
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawState::Drawing(_))
    }

    /// The in-progress session, if any
    pub fn session(&self) -> Option<&DrawSession> {
        match &self.state {
            DrawState::Drawing(session) => Some(session),
            DrawState::Idle => None,
        }
    }

    pub fn active_session(&self) -> Option<SessionId> {
        self.session().map(DrawSession::id)
    }

    /// Arm a tool, discarding any in-progress drawing
    ///
    /// Selecting the tool that is already armed still discards the sketch.
    pub fn select_tool(&mut self, tool: DrawTool) {
        self.end_session(SessionEndReason::ToolChanged);

        let from = self.tool;
        self.tool = tool;
        self.bus
            .publish(MapEvent::Draw(DrawEvent::ToolChanged { from, to: tool }));
        tracing::debug!("Draw tool changed: {} -> {}", from, tool);

        if tool != DrawTool::None {
            self.start_session();
        }
    }

    /// Add a committed vertex at the clicked coordinate
    ///
    /// Returns the finished geometry when the click completes the drawing,
    /// which only happens for the point tool.
    pub fn add_vertex(&mut self, p: Point) -> Result<Option<Geometry>, DrawError> {
        if !p.is_finite() {
            return Err(DrawError::InvalidCoordinate { x: p.x, y: p.y });
        }

        let session = self.session_mut()?;
        session.vertices.push(p);
        session.cursor = None;
        session.vertex_count += 1;
        let tool = session.tool;
        self.publish_sketch();

        if tool == DrawTool::Point {
            return self.finish().map(Some);
        }
        Ok(None)
    }

    /// Move the rubber-band vertex to the pointer position
    ///
    /// Ignored until the first vertex of a line or polygon is placed.
    pub fn move_pointer(&mut self, p: Point) -> Result<(), DrawError> {
        if !p.is_finite() {
            return Err(DrawError::InvalidCoordinate { x: p.x, y: p.y });
        }

        let session = self.session_mut()?;
        if !session.tool.is_path() || session.vertices.is_empty() {
            return Ok(());
        }
        session.cursor = Some(p);
        self.publish_sketch();
        Ok(())
    }

    /// Finish the drawing (double-click or Enter)
    ///
    /// Leaves the session untouched when it does not have enough distinct
    /// vertices yet.
    pub fn finish(&mut self) -> Result<Geometry, DrawError> {
        let session = self.session().ok_or(DrawError::NotDrawing)?;
        let geometry = session.finished()?;
        let id = session.id;

        self.bus.publish(MapEvent::Draw(DrawEvent::DrawCompleted {
            session: id,
            geometry: geometry.clone(),
        }));
        tracing::info!("Session {} completed a {}", id, geometry.kind());
        self.end_session(SessionEndReason::Completed);

        if self.keep_tool_after_complete {
            self.start_session();
        } else {
            let from = self.tool;
            self.tool = DrawTool::None;
            self.bus.publish(MapEvent::Draw(DrawEvent::ToolChanged {
                from,
                to: DrawTool::None,
            }));
        }
        Ok(geometry)
    }

    /// Abandon the current sketch and start over with the same tool
    ///
    /// Returns false when nothing was being drawn.
    pub fn cancel(&mut self, reason: SessionEndReason) -> bool {
        if !self.end_session(reason) {
            return false;
        }
        self.start_session();
        true
    }

    /// Replace a committed vertex of the in-progress sketch
    ///
    /// Returns the vertex that was replaced.
    pub fn set_vertex(&mut self, index: usize, p: Point) -> Result<Point, DrawError> {
        if !p.is_finite() {
            return Err(DrawError::InvalidCoordinate { x: p.x, y: p.y });
        }

        let session = self.session_mut()?;
        let count = session.vertices.len();
        let slot = session
            .vertices
            .get_mut(index)
            .ok_or(DrawError::VertexOutOfRange { index, count })?;
        let previous = std::mem::replace(slot, p);
        self.publish_sketch();
        Ok(previous)
    }

    fn session_mut(&mut self) -> Result<&mut DrawSession, DrawError> {
        match &mut self.state {
            DrawState::Drawing(session) => Ok(session),
            DrawState::Idle => Err(DrawError::NotDrawing),
        }
    }

    fn start_session(&mut self) {
        let id = self.next_session;
        self.next_session += 1;
        self.state = DrawState::Drawing(DrawSession::new(id, self.tool));
        self.bus.publish(MapEvent::Draw(DrawEvent::SessionStarted {
            session: id,
            tool: self.tool,
        }));
        tracing::debug!("Session {} started with {}", id, self.tool);
    }

    /// Publish `SessionEnded` and drop the session. Returns false when idle.
    fn end_session(&mut self, reason: SessionEndReason) -> bool {
        let DrawState::Drawing(session) = std::mem::take(&mut self.state) else {
            return false;
        };
        self.bus.publish(MapEvent::Draw(DrawEvent::SessionEnded {
            session: session.id,
            reason,
        }));
        tracing::debug!("Session {} ended: {:?}", session.id, reason);
        true
    }

    fn publish_sketch(&self) {
        let Some(session) = self.session() else {
            return;
        };
        if let Some(geometry) = session.sketch() {
            self.bus.publish(MapEvent::Draw(DrawEvent::GeometryChanged {
                session: session.id,
                geometry,
            }));
        }
    }
}
