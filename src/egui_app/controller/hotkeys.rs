//! Maps raw egui input events to sorting commands.

use egui::{Event, Key};

use crate::categories::CategoryMap;
use crate::session::SortCommand;

/// Translate one frame's events into commands, in the order they arrived.
///
/// Held keys auto-repeat: arrows keep stepping, but a repeating character
/// never classifies or undoes a second sample.
pub(crate) fn commands_for_events(events: &[Event], categories: &CategoryMap) -> Vec<SortCommand> {
    // egui sends the text of a key press right after its `Key` event.
    let mut held = false;
    let mut commands = Vec::new();
    for event in events {
        match event {
            Event::Key {
                key: Key::ArrowLeft,
                pressed: true,
                ..
            } => commands.push(SortCommand::Previous),
            Event::Key {
                key: Key::ArrowRight,
                pressed: true,
                ..
            } => commands.push(SortCommand::Next),
            Event::Key {
                pressed: true,
                repeat,
                ..
            } => held = *repeat,
            Event::Text(text) => {
                if !held {
                    commands.extend(text.chars().filter_map(|ch| command_for_char(ch, categories)));
                }
                held = false;
            }
            _ => {}
        }
    }
    commands
}

fn command_for_char(ch: char, categories: &CategoryMap) -> Option<SortCommand> {
    if categories.is_undo_key(ch) {
        Some(SortCommand::Undo)
    } else if categories.lookup(ch).is_some() {
        Some(SortCommand::Classify(ch))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Modifiers;

    fn key(key: Key, repeat: bool) -> Event {
        Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat,
            modifiers: Modifiers::NONE,
        }
    }

    fn legend() -> CategoryMap {
        CategoryMap::parse("junk{0},rearing{r}", 'u').unwrap()
    }

    #[test]
    fn arrows_navigate_and_characters_classify() {
        let events = vec![
            key(Key::ArrowRight, false),
            Event::Text("R".into()),
            key(Key::ArrowLeft, true),
            Event::Text("u".into()),
        ];
        assert_eq!(
            commands_for_events(&events, &legend()),
            vec![
                SortCommand::Next,
                SortCommand::Classify('R'),
                SortCommand::Previous,
                SortCommand::Undo,
            ]
        );
    }

    #[test]
    fn unmapped_characters_are_ignored() {
        let events = vec![Event::Text("x9".into())];
        assert!(commands_for_events(&events, &legend()).is_empty());
    }

    #[test]
    fn repeating_character_does_not_classify_again() {
        let events = vec![key(Key::Num0, true), Event::Text("0".into())];
        assert!(commands_for_events(&events, &legend()).is_empty());
    }

    #[test]
    fn fresh_press_classifies_beside_a_held_key() {
        let events = vec![
            key(Key::Num0, true),
            Event::Text("0".into()),
            key(Key::R, false),
            Event::Text("r".into()),
        ];
        assert_eq!(
            commands_for_events(&events, &legend()),
            vec![SortCommand::Classify('r')]
        );
    }
}
