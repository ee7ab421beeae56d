use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use super::config::ConfigError;
use crate::sprite::Direction;

/// Key names are configuration data, validated once at startup; an
/// unrecognized name in the config is a [`ConfigError`], while an unbound key
/// pressed at runtime is simply ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
    pub quit: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: "ArrowUp".to_string(),
            down: "ArrowDown".to_string(),
            left: "ArrowLeft".to_string(),
            right: "ArrowRight".to_string(),
            quit: "Escape".to_string(),
        }
    }
}

impl KeyBindings {
    pub(crate) fn resolve(&self) -> Result<ResolvedBindings, ConfigError> {
        let resolve_one = |role: &'static str, name: &str| {
            parse_key_name(name).ok_or_else(|| ConfigError::UnknownKeyBinding {
                role,
                name: name.to_string(),
            })
        };
        Ok(ResolvedBindings {
            up: resolve_one("up", &self.up)?,
            down: resolve_one("down", &self.down)?,
            left: resolve_one("left", &self.left)?,
            right: resolve_one("right", &self.right)?,
            quit: resolve_one("quit", &self.quit)?,
        })
    }
}

fn parse_key_name(name: &str) -> Option<KeyCode> {
    let code = match name {
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        "Escape" => KeyCode::Escape,
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        "KeyW" => KeyCode::KeyW,
        "KeyA" => KeyCode::KeyA,
        "KeyS" => KeyCode::KeyS,
        "KeyD" => KeyCode::KeyD,
        "KeyQ" => KeyCode::KeyQ,
        _ => return None,
    };
    Some(code)
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedBindings {
    up: KeyCode,
    down: KeyCode,
    left: KeyCode,
    right: KeyCode,
    quit: KeyCode,
}

impl ResolvedBindings {
    pub(crate) fn event_for_key(&self, key: KeyCode) -> Option<GameEvent> {
        if key == self.quit {
            Some(GameEvent::Quit)
        } else if key == self.up {
            Some(GameEvent::Face(Direction::Up))
        } else if key == self.down {
            Some(GameEvent::Face(Direction::Down))
        } else if key == self.left {
            Some(GameEvent::Face(Direction::Left))
        } else if key == self.right {
            Some(GameEvent::Face(Direction::Right))
        } else {
            None
        }
    }
}

/// Everything that may mutate scene state between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Face(Direction),
    AnimationTick,
    Quit,
}

/// Single-threaded message queue between the input/timer callbacks and the
/// frame loop. Producers only enqueue; the loop drains the whole queue once
/// per frame before composing, so the renderer never observes a
/// partially-applied mutation.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_resolve() {
        KeyBindings::default().resolve().expect("defaults resolve");
    }

    #[test]
    fn arrow_keys_map_to_facing_events() {
        let bindings = KeyBindings::default().resolve().expect("resolve");
        assert_eq!(
            bindings.event_for_key(KeyCode::ArrowUp),
            Some(GameEvent::Face(Direction::Up))
        );
        assert_eq!(
            bindings.event_for_key(KeyCode::ArrowLeft),
            Some(GameEvent::Face(Direction::Left))
        );
        assert_eq!(
            bindings.event_for_key(KeyCode::Escape),
            Some(GameEvent::Quit)
        );
    }

    #[test]
    fn unbound_key_is_ignored_not_an_error() {
        let bindings = KeyBindings::default().resolve().expect("resolve");
        assert_eq!(bindings.event_for_key(KeyCode::KeyZ), None);
    }

    #[test]
    fn unknown_binding_name_is_a_config_error() {
        let bindings = KeyBindings {
            up: "NotAKey".to_string(),
            ..KeyBindings::default()
        };
        assert_eq!(
            bindings.resolve().err(),
            Some(ConfigError::UnknownKeyBinding {
                role: "up",
                name: "NotAKey".to_string(),
            })
        );
    }

    #[test]
    fn wasd_rebinding_resolves() {
        let bindings = KeyBindings {
            up: "KeyW".to_string(),
            down: "KeyS".to_string(),
            left: "KeyA".to_string(),
            right: "KeyD".to_string(),
            quit: "KeyQ".to_string(),
        };
        let resolved = bindings.resolve().expect("resolve");
        assert_eq!(
            resolved.event_for_key(KeyCode::KeyW),
            Some(GameEvent::Face(Direction::Up))
        );
        assert_eq!(resolved.event_for_key(KeyCode::ArrowUp), None);
    }

    #[test]
    fn queue_drains_in_fifo_order_and_empties() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::Face(Direction::Up));
        queue.push(GameEvent::AnimationTick);
        queue.push(GameEvent::Face(Direction::Right));

        let drained = queue.drain();
        assert_eq!(
            drained,
            vec![
                GameEvent::Face(Direction::Up),
                GameEvent::AnimationTick,
                GameEvent::Face(Direction::Right),
            ]
        );
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }
}
