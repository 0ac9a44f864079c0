//! Window event pump
//!
//! Platform callbacks fire on whatever thread the windowing system uses.
//! They push into one unbounded channel and a single task applies the
//! events to the store in arrival order, so a window's moves, resizes and
//! close are never reordered.

use super::{WindowEvent, WindowInstance};
use crate::services::NotesService;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq)]
pub struct NoteWindowEvent {
    pub note_id: String,
    pub instance: WindowInstance,
    pub event: WindowEvent,
}

/// Sending half, cloned into every window's event callback
#[derive(Clone)]
pub struct WindowEventSender {
    tx: mpsc::UnboundedSender<NoteWindowEvent>,
}

impl WindowEventSender {
    pub fn send(&self, note_id: &str, instance: WindowInstance, event: WindowEvent) {
        let message = NoteWindowEvent {
            note_id: note_id.to_string(),
            instance,
            event,
        };
        if self.tx.send(message).is_err() {
            tracing::warn!(
                "Window event loop stopped, dropping {:?} for note {}",
                event,
                note_id
            );
        }
    }
}

pub struct WindowEventReceiver {
    rx: mpsc::UnboundedReceiver<NoteWindowEvent>,
}

impl WindowEventReceiver {
    /// Apply events until every sender is gone
    pub async fn run(mut self, notes: NotesService) {
        tracing::info!("Window event loop started");

        while let Some(message) = self.rx.recv().await {
            if let Err(e) = notes
                .window_event(&message.note_id, message.instance, message.event)
                .await
            {
                tracing::error!(
                    "Failed to apply {:?} for note {}: {}",
                    message.event,
                    message.note_id,
                    e
                );
            }
        }

        tracing::info!("Window event loop stopped");
    }

    pub fn spawn(self, notes: NotesService) -> JoinHandle<()> {
        tokio::spawn(self.run(notes))
    }
}

pub fn channel() -> (WindowEventSender, WindowEventReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (WindowEventSender { tx }, WindowEventReceiver { rx })
}
