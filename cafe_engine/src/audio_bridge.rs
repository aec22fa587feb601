use std::{cell::RefCell, rc::Rc};

use serde::Serialize;

use crate::error::CollaboratorError;

/// Opaque handle to a playing sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AudioHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayParams {
    pub volume: f32,
    pub looped: bool,
}

impl PlayParams {
    pub fn music(volume: f32) -> Self {
        Self {
            volume,
            looped: true,
        }
    }

    pub fn sfx(volume: f32) -> Self {
        Self {
            volume,
            looped: false,
        }
    }
}

/// Audio playback collaborator. The core starts and stops cues at location
/// boundaries and story beats but never decodes audio itself.
pub trait AudioSink {
    fn play(&mut self, cue: &str, params: PlayParams) -> Result<AudioHandle, CollaboratorError>;
    fn stop(&mut self, handle: AudioHandle) -> Result<(), CollaboratorError>;
    fn set_volume(&mut self, handle: AudioHandle, volume: f32) -> Result<(), CollaboratorError>;
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AudioEvent {
    Play {
        cue: String,
        handle: AudioHandle,
        volume: f32,
        looped: bool,
    },
    Stop {
        handle: AudioHandle,
    },
    Volume {
        handle: AudioHandle,
        volume: f32,
    },
}

#[derive(Debug, Default)]
struct Recording {
    events: Vec<AudioEvent>,
    next_handle: u32,
}

/// Audio sink that records every call; clones share one log.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    inner: Rc<RefCell<Recording>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AudioEvent> {
        self.inner.borrow().events.clone()
    }

    /// Cues started so far, in order.
    pub fn played_cues(&self) -> Vec<String> {
        self.inner
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                AudioEvent::Play { cue, .. } => Some(cue.clone()),
                _ => None,
            })
            .collect()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: &str, params: PlayParams) -> Result<AudioHandle, CollaboratorError> {
        let mut inner = self.inner.borrow_mut();
        inner.next_handle += 1;
        let handle = AudioHandle(inner.next_handle);
        inner.events.push(AudioEvent::Play {
            cue: cue.to_string(),
            handle,
            volume: params.volume,
            looped: params.looped,
        });
        Ok(handle)
    }

    fn stop(&mut self, handle: AudioHandle) -> Result<(), CollaboratorError> {
        self.inner
            .borrow_mut()
            .events
            .push(AudioEvent::Stop { handle });
        Ok(())
    }

    fn set_volume(&mut self, handle: AudioHandle, volume: f32) -> Result<(), CollaboratorError> {
        self.inner
            .borrow_mut()
            .events
            .push(AudioEvent::Volume { handle, volume });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_audio_tracks_events() {
        let audio = RecordingAudio::new();
        let mut sink = audio.clone();
        let music = sink
            .play("cafe-music", PlayParams::music(0.3))
            .expect("recording play");
        sink.set_volume(music, 0.0).expect("recording volume");
        sink.stop(music).expect("recording stop");
        sink.play("menu-click", PlayParams::sfx(1.0))
            .expect("recording play");

        assert_eq!(
            audio.events(),
            vec![
                AudioEvent::Play {
                    cue: "cafe-music".to_string(),
                    handle: AudioHandle(1),
                    volume: 0.3,
                    looped: true,
                },
                AudioEvent::Volume {
                    handle: AudioHandle(1),
                    volume: 0.0,
                },
                AudioEvent::Stop {
                    handle: AudioHandle(1)
                },
                AudioEvent::Play {
                    cue: "menu-click".to_string(),
                    handle: AudioHandle(2),
                    volume: 1.0,
                    looped: false,
                },
            ]
        );
        assert_eq!(audio.played_cues(), vec!["cafe-music", "menu-click"]);
    }
}
