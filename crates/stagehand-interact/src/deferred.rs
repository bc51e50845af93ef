//! Camera-control work postponed to the end of the current dispatch turn

use crate::control::CameraControl;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlTask {
    Detach,
}

/// FIFO of control tasks. Whoever owns the event loop runs it once the
/// current event has been fully handled and before the next one starts.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    tasks: Vec<ControlTask>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: ControlTask) {
        self.tasks.push(task);
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run every pending task in order. Returns how many ran.
    pub fn run<C: CameraControl + ?Sized>(&mut self, control: &mut C) -> usize {
        let count = self.tasks.len();
        for task in self.tasks.drain(..) {
            match task {
                ControlTask::Detach => control.detach_control(),
            }
        }
        count
    }
}
