use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};
use tamagotchi::{Band, Meter, PetState, StatusMessage, SHOP};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) text: String,
    pub(crate) fg: Color,
}

pub(crate) type Line = Vec<Span>;

fn plain(text: impl Into<String>) -> Span {
    Span {
        text: text.into(),
        fg: Color::White,
    }
}

fn colored(text: impl Into<String>, fg: Color) -> Span {
    Span {
        text: text.into(),
        fg,
    }
}

pub(crate) struct Terminal {
    out: io::Stdout,
    rows: u16,
    prev: Vec<Line>,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;
        let (_, rows) = terminal::size()?;
        Ok(Self {
            out,
            rows,
            prev: Vec::new(),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<()> {
        let (_, r) = terminal::size()?;
        if r != self.rows {
            self.rows = r;
            self.prev.clear();
            execute!(self.out, Clear(ClearType::All))?;
        }
        Ok(())
    }

    /// Redraw only the rows that differ from the previous frame.
    pub(crate) fn present(&mut self, frame: Vec<Line>, enable_color: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;
        let height = frame.len().max(self.prev.len()).min(self.rows as usize);
        for y in 0..height {
            let line = frame.get(y);
            if line == self.prev.get(y) {
                continue;
            }
            queue!(
                self.out,
                cursor::MoveTo(0, y as u16),
                Clear(ClearType::CurrentLine)
            )?;
            for span in line.into_iter().flatten() {
                let fg = if enable_color { span.fg } else { Color::White };
                queue!(self.out, SetForegroundColor(fg), Print(&span.text))?;
            }
        }
        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev = frame;
        Ok(())
    }
}

fn band_color(band: Band) -> Color {
    match band {
        Band::High => Color::Green,
        Band::Mid => Color::Yellow,
        Band::Low => Color::Red,
    }
}

fn bar(value: f64, width: usize) -> String {
    let v = (value / 100.0).clamp(0.0, 1.0);
    let fill = (v * width as f64 + 0.5) as usize;
    let mut s = String::with_capacity(width + 2);
    s.push('[');
    for i in 0..width {
        s.push(if i < fill { '█' } else { ' ' });
    }
    s.push(']');
    s
}

/// Lay out the whole screen for one frame.
pub(crate) fn compose(st: &PetState, notice: Option<&str>) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(vec![plain(format!(
        " Tamagotchi  |  Level {}  |  Progress {}/100  |  Coins {}",
        st.level, st.level_progress, st.coins
    ))]);
    lines.push(Vec::new());

    for m in Meter::ALL {
        let v = st.meter(m);
        lines.push(vec![
            plain(format!(" {:<10}", m.label())),
            colored(bar(v, 20), band_color(Band::of(v))),
            plain(format!(" {:>3}%", v.floor() as i64)),
        ]);
    }
    lines.push(Vec::new());

    let status = match st.status() {
        StatusMessage::GameOver => colored(" Game over. Press r to start again.", Color::Red),
        StatusMessage::Critical => colored(" Critical! Your pet needs care right now.", Color::Yellow),
        StatusMessage::Ok => colored(" All is well.", Color::Green),
    };
    lines.push(vec![status]);
    if !st.battle_result.is_empty() {
        lines.push(vec![plain(format!(" {}", st.battle_result))]);
    }
    if let Some(n) = notice {
        lines.push(vec![colored(format!(" {n}"), Color::Magenta)]);
    }
    lines.push(Vec::new());

    lines.push(vec![plain(" Shop")]);
    for (i, item) in SHOP.iter().enumerate() {
        let fg = if st.coins >= item.cost {
            Color::White
        } else {
            Color::DarkGrey
        };
        lines.push(vec![colored(
            format!(
                "  {} {:<10} +{:<10} {} coins",
                i + 1,
                item.name,
                item.item_type.meter().label(),
                item.cost
            ),
            fg,
        )]);
    }
    lines.push(Vec::new());
    lines.push(vec![plain(
        " Keys: f feed | p play | s sleep | c clean | b fight | 1-4 buy | r restart | q quit",
    )]);

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.iter().map(|s| s.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(bar(50.0, 4), "[██  ]");
        assert_eq!(bar(0.0, 2), "[  ]");
        assert_eq!(bar(250.0, 2), "[██]");
    }

    #[test]
    fn meters_are_floored_and_colored_by_band() {
        let mut st = PetState::default();
        st.health = 90.25;
        st.hunger = 10.0;
        let lines = compose(&st, None);
        let screen = text(&lines);
        assert!(screen.contains(" 90%"));

        let hunger = lines
            .iter()
            .find(|l| l.first().is_some_and(|s| s.text.contains("Hunger")))
            .unwrap();
        assert_eq!(hunger[1].fg, Color::Red);
    }

    #[test]
    fn game_over_and_notice_are_shown() {
        let mut st = PetState::default();
        st.game_over = true;
        st.battle_result = "You lost the fight".into();
        let screen = text(&compose(&st, Some("Not enough coins!")));
        assert!(screen.contains("Game over"));
        assert!(screen.contains("You lost the fight"));
        assert!(screen.contains("Not enough coins!"));
    }
}
