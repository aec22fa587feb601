use std::{cell::RefCell, rc::Rc};

use glam::Vec2;
use serde::Serialize;

use crate::error::CollaboratorError;

/// Drawing collaborator. Scene dressing lives behind this trait; the core
/// only asks for fades, the actor sprite, prompts, captions, and one-off
/// effects at the moments the story needs them.
pub trait Renderer {
    fn fade_out(&mut self, duration_ms: u64) -> Result<(), CollaboratorError>;
    fn fade_in(&mut self, duration_ms: u64) -> Result<(), CollaboratorError>;
    fn draw_actor(&mut self, position: Vec2, texture: &str) -> Result<(), CollaboratorError>;
    fn show_prompt(&mut self, text: &str, anchor: Vec2) -> Result<(), CollaboratorError>;
    fn hide_prompt(&mut self) -> Result<(), CollaboratorError>;
    /// Show (or replace) the caption stored under `key`.
    fn show_text(&mut self, key: &str, text: &str) -> Result<(), CollaboratorError>;
    fn hide_text(&mut self, key: &str) -> Result<(), CollaboratorError>;
    fn effect(&mut self, name: &str, at: Option<Vec2>) -> Result<(), CollaboratorError>;
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderEvent {
    FadeOut { duration_ms: u64 },
    FadeIn { duration_ms: u64 },
    ShowPrompt { text: String, anchor: [f32; 2] },
    HidePrompt,
    ShowText { key: String, text: String },
    HideText { key: String },
    Effect { name: String, at: Option<[f32; 2]> },
}

#[derive(Debug, Default)]
struct Recording {
    events: Vec<RenderEvent>,
    actor: Option<(Vec2, String)>,
    actor_draws: u64,
}

/// Renderer that records every call. Actor draws happen every tick, so only
/// the latest one is kept alongside a running count.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    inner: Rc<RefCell<Recording>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RenderEvent> {
        self.inner.borrow().events.clone()
    }

    pub fn fade_outs(&self) -> usize {
        self.inner
            .borrow()
            .events
            .iter()
            .filter(|event| matches!(event, RenderEvent::FadeOut { .. }))
            .count()
    }

    pub fn last_actor(&self) -> Option<(Vec2, String)> {
        self.inner.borrow().actor.clone()
    }

    pub fn actor_draws(&self) -> u64 {
        self.inner.borrow().actor_draws
    }

    /// Every text shown under `key`, oldest first.
    pub fn texts_for(&self, key: &str) -> Vec<String> {
        self.inner
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                RenderEvent::ShowText { key: shown, text } if shown == key => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.inner
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                RenderEvent::ShowPrompt { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: RenderEvent) -> Result<(), CollaboratorError> {
        self.inner.borrow_mut().events.push(event);
        Ok(())
    }
}

impl Renderer for RecordingRenderer {
    fn fade_out(&mut self, duration_ms: u64) -> Result<(), CollaboratorError> {
        self.push(RenderEvent::FadeOut { duration_ms })
    }

    fn fade_in(&mut self, duration_ms: u64) -> Result<(), CollaboratorError> {
        self.push(RenderEvent::FadeIn { duration_ms })
    }

    fn draw_actor(&mut self, position: Vec2, texture: &str) -> Result<(), CollaboratorError> {
        let mut inner = self.inner.borrow_mut();
        inner.actor = Some((position, texture.to_string()));
        inner.actor_draws += 1;
        Ok(())
    }

    fn show_prompt(&mut self, text: &str, anchor: Vec2) -> Result<(), CollaboratorError> {
        self.push(RenderEvent::ShowPrompt {
            text: text.to_string(),
            anchor: anchor.to_array(),
        })
    }

    fn hide_prompt(&mut self) -> Result<(), CollaboratorError> {
        self.push(RenderEvent::HidePrompt)
    }

    fn show_text(&mut self, key: &str, text: &str) -> Result<(), CollaboratorError> {
        self.push(RenderEvent::ShowText {
            key: key.to_string(),
            text: text.to_string(),
        })
    }

    fn hide_text(&mut self, key: &str) -> Result<(), CollaboratorError> {
        self.push(RenderEvent::HideText {
            key: key.to_string(),
        })
    }

    fn effect(&mut self, name: &str, at: Option<Vec2>) -> Result<(), CollaboratorError> {
        self.push(RenderEvent::Effect {
            name: name.to_string(),
            at: at.map(|point| point.to_array()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_latest_actor_and_event_order() {
        let renderer = RecordingRenderer::new();
        let mut sink = renderer.clone();
        sink.fade_in(500).expect("fade in");
        sink.draw_actor(Vec2::new(1.0, 2.0), "idle-down")
            .expect("draw");
        sink.draw_actor(Vec2::new(3.0, 2.0), "walk-right-1")
            .expect("draw");
        sink.show_text("intro", "hello").expect("text");
        sink.show_text("intro", "again").expect("text");
        sink.fade_out(1000).expect("fade out");

        assert_eq!(renderer.actor_draws(), 2);
        assert_eq!(
            renderer.last_actor(),
            Some((Vec2::new(3.0, 2.0), "walk-right-1".to_string()))
        );
        assert_eq!(renderer.texts_for("intro"), vec!["hello", "again"]);
        assert_eq!(renderer.fade_outs(), 1);
        assert_eq!(renderer.events().len(), 4);
    }

    #[test]
    fn render_events_serialize_with_kind_tag() {
        let json = serde_json::to_value(RenderEvent::FadeOut { duration_ms: 1000 })
            .expect("serialize");
        assert_eq!(json["kind"], "fade_out");
        assert_eq!(json["duration_ms"], 1000);
    }
}
