//! Pointer gestures on the canvas.
//!
//! `GestureController` turns normalized input events into drag and resize
//! gestures over an `EditorSession`:
//!
//! ```text
//! Idle ──down on node──▶ Dragging ──up──▶ Idle   (one "move_element" step)
//!      ──down on handle─▶ Resizing ──up──▶ Idle   (one "resize_element" step)
//!                          └──cancel / Escape──▶ Idle (no change)
//! ```
//!
//! Moves only produce previews; the document is written once, on release.
//! While a gesture is live the controller holds pointer capture from the
//! host, so moves and the release arrive even when the pointer leaves the
//! element. Capture is released on every way out of a gesture, including
//! dropping the controller.
//!
//! ## Modifier behaviors
//!
//! | Modifier | Drag |
//! |----------|------|
//! | **Shift** | Axis-constrain to the dominant direction |

use crate::input::InputEvent;
use crate::session::EditorSession;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use sk_core::geometry::{canvas_point, centered_drop_position, drag_translate, handle_at, resize};
use sk_core::{Dimensions, ElementKind, ElementNode, ElementPatch, NodeId, Position, ResizeHandle};

/// Host hook for routing all pointer events to the canvas while a
/// gesture is live (`setPointerCapture`, window-level listeners, …).
pub trait PointerCapture {
    fn acquire(&mut self);
    fn release(&mut self);
}

/// For hosts that deliver window-level events anyway.
#[derive(Debug, Default)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn acquire(&mut self) {}
    fn release(&mut self) {}
}

/// Gesture state.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    Idle,
    Dragging {
        id: NodeId,
        start: (f32, f32),
        origin: Position,
        dimensions: Dimensions,
    },
    Resizing {
        id: NodeId,
        handle: ResizeHandle,
        start: (f32, f32),
        origin: Position,
        dimensions: Dimensions,
    },
}

/// Where the node would be if the gesture ended now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GesturePreview {
    pub id: NodeId,
    pub position: Position,
    pub dimensions: Dimensions,
}

/// What an event did.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Nothing observable.
    None,
    /// Selection changed (or was cleared) without starting a gesture.
    Selected(Option<NodeId>),
    Started { id: NodeId, resizing: bool },
    Preview(GesturePreview),
    /// The gesture was written to the document as one history step.
    Committed { id: NodeId, action: &'static str },
    /// The gesture ended without changes.
    Cancelled,
    /// A keyboard shortcut ran; `changed` reports whether it had effect.
    Shortcut { action: ShortcutAction, changed: bool },
}

pub struct GestureController<C: PointerCapture = NoCapture> {
    state: Interaction,
    capture: C,
}

impl Default for GestureController<NoCapture> {
    fn default() -> Self {
        Self::new(NoCapture)
    }
}

impl<C: PointerCapture> GestureController<C> {
    pub fn new(capture: C) -> Self {
        Self {
            state: Interaction::Idle,
            capture,
        }
    }

    pub fn state(&self) -> &Interaction {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != Interaction::Idle
    }

    pub fn capture(&self) -> &C {
        &self.capture
    }

    pub fn capture_mut(&mut self) -> &mut C {
        &mut self.capture
    }

    /// Feed one input event.
    pub fn handle(&mut self, event: &InputEvent, session: &mut EditorSession) -> GestureOutcome {
        match event {
            InputEvent::PointerDown { x, y, .. } => self.pointer_down(*x, *y, session),
            InputEvent::PointerMove { x, y, modifiers } => {
                match self.preview(*x, *y, modifiers.shift, session) {
                    Some(p) => GestureOutcome::Preview(p),
                    None => GestureOutcome::None,
                }
            }
            InputEvent::PointerUp { x, y, modifiers } => {
                self.pointer_up(*x, *y, modifiers.shift, session)
            }
            InputEvent::Cancel => self.cancel(),
            InputEvent::Key { key, modifiers } => {
                if self.is_active() {
                    return if key == "Escape" {
                        self.cancel()
                    } else {
                        GestureOutcome::None
                    };
                }
                match ShortcutMap::resolve(key, *modifiers) {
                    Some(action) => GestureOutcome::Shortcut {
                        action,
                        changed: session.run_shortcut(action),
                    },
                    None => GestureOutcome::None,
                }
            }
        }
    }

    /// Abandon any live gesture. The document is untouched.
    pub fn cancel(&mut self) -> GestureOutcome {
        if self.end() {
            GestureOutcome::Cancelled
        } else {
            GestureOutcome::None
        }
    }

    fn pointer_down(&mut self, x: f32, y: f32, session: &mut EditorSession) -> GestureOutcome {
        // A down without a matching up (lost event): drop the stale gesture.
        self.end();

        let tolerance = session.config().handle_tolerance;
        if let Some(node) = session.selected()
            && let Some(handle) = handle_at(node, x, y, tolerance)
        {
            let id = node.id;
            self.state = Interaction::Resizing {
                id,
                handle,
                start: (x, y),
                origin: node.position,
                dimensions: node.dimensions,
            };
            self.capture.acquire();
            return GestureOutcome::Started { id, resizing: true };
        }

        let Some(id) = session.document().hit_test(x, y) else {
            session.clear_selection();
            return GestureOutcome::Selected(None);
        };
        session.select(id);
        let Some(node) = session.document().get_by_id(id) else {
            return GestureOutcome::Selected(Some(id));
        };
        self.state = Interaction::Dragging {
            id,
            start: (x, y),
            origin: node.position,
            dimensions: node.dimensions,
        };
        self.capture.acquire();
        GestureOutcome::Started { id, resizing: false }
    }

    /// Where the node would land if the pointer were released at `(x, y)`.
    pub fn preview(
        &self,
        x: f32,
        y: f32,
        constrain: bool,
        session: &EditorSession,
    ) -> Option<GesturePreview> {
        let canvas = &session.document().canvas;
        match self.state {
            Interaction::Idle => None,
            Interaction::Dragging {
                id,
                start,
                origin,
                dimensions,
            } => {
                let (mut dx, mut dy) = (x - start.0, y - start.1);
                if constrain {
                    if dx.abs() > dy.abs() {
                        dy = 0.0;
                    } else {
                        dx = 0.0;
                    }
                }
                Some(GesturePreview {
                    id,
                    position: drag_translate(origin, dx, dy, canvas),
                    dimensions,
                })
            }
            Interaction::Resizing {
                id,
                handle,
                start,
                origin,
                dimensions,
            } => {
                let (position, dimensions) =
                    resize(origin, dimensions, handle, x - start.0, y - start.1);
                Some(GesturePreview {
                    id,
                    position,
                    dimensions,
                })
            }
        }
    }

    fn pointer_up(
        &mut self,
        x: f32,
        y: f32,
        constrain: bool,
        session: &mut EditorSession,
    ) -> GestureOutcome {
        let preview = self.preview(x, y, constrain, session);
        let (origin, dimensions, action) = match self.state {
            Interaction::Idle => return GestureOutcome::None,
            Interaction::Dragging {
                origin, dimensions, ..
            } => (origin, dimensions, "move_element"),
            Interaction::Resizing {
                origin, dimensions, ..
            } => (origin, dimensions, "resize_element"),
        };
        self.end();

        let Some(p) = preview else {
            return GestureOutcome::Cancelled;
        };
        let unchanged = p.position == origin && p.dimensions == dimensions;
        if unchanged || !session.document().contains(p.id) {
            return GestureOutcome::Cancelled;
        }
        session.update(p.id, &ElementPatch::geometry(p.position, p.dimensions));
        session.commit(action);
        GestureOutcome::Committed { id: p.id, action }
    }

    /// Back to idle, releasing capture. Returns whether a gesture was live.
    fn end(&mut self) -> bool {
        if self.state == Interaction::Idle {
            return false;
        }
        self.state = Interaction::Idle;
        self.capture.release();
        true
    }
}

impl<C: PointerCapture> Drop for GestureController<C> {
    fn drop(&mut self) {
        self.end();
    }
}

/// Create a default element of `kind` centered on a viewport drop point,
/// add it and commit `"add_element"`. The new node lands on top.
pub fn drop_new_element(
    session: &mut EditorSession,
    kind: ElementKind,
    client_point: (f32, f32),
    canvas_origin: (f32, f32),
) -> NodeId {
    let (px, py) = canvas_point(
        client_point.0,
        client_point.1,
        canvas_origin.0,
        canvas_origin.1,
    );
    let z = session.document().max_z().map_or(0, |z| z.saturating_add(1));
    let position = centered_drop_position(kind, px, py, z);
    let id = session.add(ElementNode::new(kind, position));
    session.commit("add_element");
    id
}
