use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use pocketpet::{PetKind, PetSnapshot, PetState};
use std::io::{self, Stdout, Write};

pub(crate) struct Terminal {
    out: Stdout,
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;
        Ok(Self { out })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn present(&mut self, lines: &[(Color, String)]) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;
        for (y, (fg, text)) in lines.iter().enumerate() {
            queue!(
                self.out,
                cursor::MoveTo(0, y as u16),
                Clear(ClearType::CurrentLine),
                SetForegroundColor(*fg),
                Print(text)
            )?;
        }
        queue!(
            self.out,
            Clear(ClearType::FromCursorDown),
            ResetColor,
            EndSynchronizedUpdate
        )?;
        self.out.flush()?;
        Ok(())
    }
}

fn bar(value: i32, width: usize) -> String {
    let filled = (value.clamp(0, 100) as usize * width + 50) / 100;
    let mut s = String::with_capacity(width + 2);
    s.push('[');
    s.extend(std::iter::repeat('#').take(filled));
    s.extend(std::iter::repeat('.').take(width - filled));
    s.push(']');
    s
}

fn face(state: PetState) -> &'static str {
    match state {
        PetState::Normal => "(o.o)",
        PetState::Sit => "(-.-) _",
        PetState::Sleeping => "(u.u) zZ",
        PetState::Happy => "(^o^)",
        PetState::Angry => "(>.<)#",
        PetState::Hungry => "(o.O) ...",
        PetState::Dead => "(x.x)",
        PetState::Evolving => "*(@.@)*",
    }
}

fn kind_color(kind: PetKind) -> Color {
    match kind {
        PetKind::Red => Color::Red,
        PetKind::Blue => Color::Blue,
        PetKind::Green => Color::Green,
        PetKind::Hero => Color::Yellow,
        PetKind::Dark => Color::Magenta,
    }
}

pub(crate) fn panel(pet: &PetSnapshot, message: &str) -> Vec<(Color, String)> {
    let fg = Color::White;
    let v = pet.vitals;
    let mut lines = vec![
        (
            fg,
            format!(
                "PocketPet  |  {} ({})  |  {:?}  |  alignment {:+}",
                pet.name, pet.kind, pet.state, pet.alignment
            ),
        ),
        (fg, String::new()),
        (kind_color(pet.kind), format!("    {}", face(pet.state))),
        (fg, String::new()),
    ];
    for (name, val) in [
        ("Happy ", v.happiness()),
        ("Health", v.health()),
        ("Full  ", v.fullness()),
        ("Sleep ", v.sleep()),
    ] {
        lines.push((fg, format!("{name}: {} {:>3}", bar(val, 20), val)));
    }
    lines.push((fg, String::new()));
    lines.push((Color::Cyan, message.to_string()));
    lines.push((fg, String::new()));
    let help = if pet.state == PetState::Dead {
        "n new game | q quit"
    } else {
        "f/h feed | a/d fruit | g gift | p play | v vet | e exercise | t pet | b bonk | s sleep | q quit"
    };
    lines.push((Color::DarkGrey, help.to_string()));
    lines
}
