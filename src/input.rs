use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum HostAction {
    Sleep,
    Feed(&'static str),
    FeedFruit(&'static str),
    Give(&'static str),
    Vet,
    Play,
    Exercise,
    Pet,
    Bonk,
    NewGame,
    Quit,
}

#[derive(Clone, Debug)]
pub(crate) struct InputEvent {
    pub(crate) key: KeyCode,
    pub(crate) mods: KeyModifiers,
}

pub(crate) fn collect_input_nonblocking(max_frame_time: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if k.kind == KeyEventKind::Press {
                out.push(InputEvent {
                    key: k.code,
                    mods: k.modifiers,
                });
                if out.len() >= 32 {
                    break;
                }
            }
        }
    }
    Ok(out)
}

pub(crate) fn map_event_to_action(ev: &InputEvent) -> Option<HostAction> {
    if matches!(ev.key, KeyCode::Char('c')) && ev.mods.contains(KeyModifiers::CONTROL) {
        return Some(HostAction::Quit);
    }
    let KeyCode::Char(ch) = ev.key else {
        return matches!(ev.key, KeyCode::Esc).then_some(HostAction::Quit);
    };
    let action = match ch.to_ascii_lowercase() {
        's' => HostAction::Sleep,
        'f' => HostAction::Feed("kibble"),
        'h' => HostAction::Feed("burger"),
        'a' => HostAction::FeedFruit("golden apple"),
        'd' => HostAction::FeedFruit("shadow plum"),
        'g' => HostAction::Give("ball"),
        'v' => HostAction::Vet,
        'p' => HostAction::Play,
        'e' => HostAction::Exercise,
        't' => HostAction::Pet,
        'b' => HostAction::Bonk,
        'n' => HostAction::NewGame,
        'q' => HostAction::Quit,
        _ => return None,
    };
    Some(action)
}
