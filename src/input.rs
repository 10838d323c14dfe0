use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tamagotchi::{PlayerAction, SHOP};

#[derive(Clone, Debug)]
pub(crate) struct InputEvent {
    pub(crate) key: KeyCode,
    pub(crate) mods: KeyModifiers,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Command {
    Act(PlayerAction),
    Quit,
}

pub(crate) fn collect_input_nonblocking(max_wait: Duration) -> anyhow::Result<Vec<InputEvent>> {
    let mut out = Vec::new();

    let timeout = std::cmp::min(Duration::from_millis(1), max_wait);
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

pub(crate) fn map_event(ev: &InputEvent) -> Option<Command> {
    if ev.mods.contains(KeyModifiers::CONTROL) {
        return match ev.key {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }
    let action = match ev.key {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Some(Command::Quit),
        KeyCode::Char('f') | KeyCode::Char('F') => PlayerAction::Feed,
        KeyCode::Char('p') | KeyCode::Char('P') => PlayerAction::Play,
        KeyCode::Char('s') | KeyCode::Char('S') => PlayerAction::Sleep,
        KeyCode::Char('c') | KeyCode::Char('C') => PlayerAction::Clean,
        KeyCode::Char('b') | KeyCode::Char('B') => PlayerAction::Fight,
        KeyCode::Char('r') | KeyCode::Char('R') => PlayerAction::Restart,
        KeyCode::Char(d @ '1'..='4') => {
            let item = SHOP[d as usize - '1' as usize];
            PlayerAction::Buy(item.item_type, item.cost)
        }
        _ => return None,
    };
    Some(Command::Act(action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tamagotchi::ItemType;

    fn key(c: char) -> InputEvent {
        InputEvent {
            key: KeyCode::Char(c),
            mods: KeyModifiers::NONE,
        }
    }

    #[test]
    fn letters_map_to_actions() {
        assert_eq!(map_event(&key('f')), Some(Command::Act(PlayerAction::Feed)));
        assert_eq!(map_event(&key('B')), Some(Command::Act(PlayerAction::Fight)));
        assert_eq!(map_event(&key('q')), Some(Command::Quit));
        assert_eq!(map_event(&key('x')), None);
    }

    #[test]
    fn digits_buy_from_the_shop() {
        assert_eq!(
            map_event(&key('4')),
            Some(Command::Act(PlayerAction::Buy(ItemType::Energy, 500)))
        );
        assert_eq!(map_event(&key('5')), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let ev = InputEvent {
            key: KeyCode::Char('c'),
            mods: KeyModifiers::CONTROL,
        };
        assert_eq!(map_event(&ev), Some(Command::Quit));
    }
}
