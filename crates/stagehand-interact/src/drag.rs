//! Dragging meshes across the ground plane
//!
//! A primary-button press on a pickable, non-ground mesh starts a session
//! that moves the mesh's topmost ancestor by however far the pointer's
//! ground projection travels. Camera navigation is detached for the
//! duration of the session: the detach is deferred to the end of the
//! current dispatch turn, the reattach on release is immediate.

use crate::control::CameraControl;
use crate::deferred::{ControlTask, DeferredQueue};
use crate::picking::PickService;
use crate::pointer::{PointerButton, PointerEvent, PointerKind};
use stagehand_core::{NodeId, Vec3};
use stagehand_scene::SceneGraph;

/// An active drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Ground point under the pointer at the last processed event
    pub anchor: Vec3,
    /// Root of the hierarchy being moved
    pub target: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// What handling an event did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    Started { target: NodeId, anchor: Vec3 },
    Moved { target: NodeId, delta: Vec3 },
    Ended { target: NodeId },
    /// The ground was clicked; whatever is selected should be released
    Deselected,
    Ignored,
}

pub struct DragController {
    state: DragState,
    ground: NodeId,
    deferred: DeferredQueue,
}

impl DragController {
    /// `ground` is the reference plane node all drags project onto
    pub fn new(ground: NodeId) -> Self {
        Self {
            state: DragState::Idle,
            ground,
            deferred: DeferredQueue::new(),
        }
    }

    pub fn ground(&self) -> NodeId {
        self.ground
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session().is_some()
    }

    /// Control work still waiting for the end of the turn
    pub fn has_pending(&self) -> bool {
        !self.deferred.is_empty()
    }

    /// Handle one pointer event.
    ///
    /// Work deferred by the previous event runs first, so a detach
    /// scheduled on press always lands before the next event is looked at.
    pub fn handle<P, C>(
        &mut self,
        event: &PointerEvent,
        picker: &P,
        graph: &mut SceneGraph,
        control: &mut C,
    ) -> DragOutcome
    where
        P: PickService + ?Sized,
        C: CameraControl + ?Sized,
    {
        self.deferred.run(control);

        match event.kind {
            PointerKind::Down => self.pointer_down(event, picker, graph),
            PointerKind::Move => self.pointer_move(event, picker, graph),
            PointerKind::Up => self.pointer_up(control),
        }
    }

    /// End of the dispatch turn: run deferred control work
    pub fn flush<C: CameraControl + ?Sized>(&mut self, control: &mut C) {
        self.deferred.run(control);
    }

    /// Teardown. Pending work runs first; an active session is then closed
    /// with exactly one reattach.
    pub fn dispose<C: CameraControl + ?Sized>(&mut self, control: &mut C) {
        self.deferred.run(control);
        if let DragState::Dragging(session) = std::mem::take(&mut self.state) {
            control.attach_control();
            log::debug!("drag of {} closed on teardown", session.target);
        }
    }

    /// Ground point under the screen position, if the ray meets the ground
    pub fn ground_position<P: PickService + ?Sized>(&self, picker: &P, x: f32, y: f32) -> Option<Vec3> {
        let ground = self.ground;
        picker.pick(x, y, &|node| node == ground).map(|hit| hit.point)
    }

    fn pointer_down<P: PickService + ?Sized>(
        &mut self,
        event: &PointerEvent,
        picker: &P,
        graph: &SceneGraph,
    ) -> DragOutcome {
        if self.is_dragging() {
            return DragOutcome::Ignored;
        }

        let Some(hit) = event.pick else {
            return DragOutcome::Ignored;
        };
        if hit.node == self.ground {
            log::debug!("ground clicked, deselecting");
            return DragOutcome::Deselected;
        }
        if event.button != PointerButton::Primary {
            return DragOutcome::Ignored;
        }

        let Some(anchor) = self.ground_position(picker, event.x, event.y) else {
            return DragOutcome::Ignored;
        };

        let target = graph.topmost_ancestor(hit.node);
        self.state = DragState::Dragging(DragSession { anchor, target });
        self.deferred.push(ControlTask::Detach);
        log::info!(
            "drag started: {} (hit {})",
            graph.name(target).unwrap_or("?"),
            graph.name(hit.node).unwrap_or("?")
        );
        DragOutcome::Started { target, anchor }
    }

    fn pointer_move<P: PickService + ?Sized>(
        &mut self,
        event: &PointerEvent,
        picker: &P,
        graph: &mut SceneGraph,
    ) -> DragOutcome {
        let DragState::Dragging(session) = self.state else {
            return DragOutcome::Ignored;
        };
        let Some(current) = self.ground_position(picker, event.x, event.y) else {
            return DragOutcome::Ignored;
        };

        let delta = current - session.anchor;
        if let Err(err) = graph.translate(session.target, delta) {
            log::warn!("drag target vanished: {}", err);
            return DragOutcome::Ignored;
        }
        self.state = DragState::Dragging(DragSession {
            anchor: current,
            target: session.target,
        });
        DragOutcome::Moved {
            target: session.target,
            delta,
        }
    }

    fn pointer_up<C: CameraControl + ?Sized>(&mut self, control: &mut C) -> DragOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => {
                control.attach_control();
                log::info!("drag ended: {}", session.target);
                DragOutcome::Ended {
                    target: session.target,
                }
            }
            DragState::Idle => DragOutcome::Ignored,
        }
    }
}
