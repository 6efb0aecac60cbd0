//! Terminal UI example using crossterm and ratatui.
//!
//! Feeds terminal events to a small vim-like binding grammar and shows the
//! commands it produces.
//! Run with: cargo run --example tui_crossterm --features crossterm

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode as CKeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use keygrammar::{InputEvent, Value, Vm, syntax};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use std::io;

const BINDINGS: &str = r#"
bindings <- action / {numopt raction}'repeat -n $1 $2'
action   <- {'Z' 'Z'}'save; quit' / {move}'cursor-to [+ $pos [$1]]'
          / {'MouseLeft'}'click $0' / {'paste'}'insert $0'
raction  <- {'d' 'd'}'delete-line' / {'d' move}'delete-range $pos [+ $pos [$1]]'
          / {'D'}'exec \'d$\''
move     <- {numopt [wbehjkl]}'move -n $1'
          / {'G'}'cursor-end-buffer' / {num 'G'}'cursor-line-to $1'
num      <- {[0-9]+}'$0'
numopt   <- {[0-9]*}'$0'
"#;

const MAX_LOG: usize = 200;

struct App {
    vm: Vm,
    pending: Vec<String>,
    log: Vec<String>,
}

impl App {
    fn new() -> Result<Self, keygrammar::Error> {
        let program = syntax::parse_grammar(BINDINGS)?.compile()?;
        Ok(Self {
            vm: Vm::new(program),
            pending: Vec::new(),
            log: Vec::new(),
        })
    }

    fn handle_event(&mut self, event: InputEvent) {
        self.pending.push(describe(&event));
        let result = self.vm.exec(event);
        let matched = result.has_action();
        if let Some(action) = result.action {
            let vars: Vec<String> = action.vars.iter().map(describe_value).collect();
            self.log.push(format!("{}    [{}]", action.command, vars.join(", ")));
            if self.log.len() > MAX_LOG {
                self.log.remove(0);
            }
        }
        // the next command starts fresh after a match
        if matched || !result.may_continue {
            self.vm.reset();
            self.pending.clear();
        }
    }
}

fn describe(event: &InputEvent) -> String {
    match event {
        InputEvent::Key(key) => keygrammar::codec::format_key(key, &Default::default())
            .unwrap_or_else(|_| format!("{key:?}")),
        InputEvent::Mouse(m) => format!(
            "{}@{},{}",
            keygrammar::codec::format_mouse(m.mods, m.button),
            m.column,
            m.row
        ),
        InputEvent::Paste(text) => format!("paste({} chars)", text.chars().count()),
        InputEvent::Resize { width, height } => format!("resize {width}x{height}"),
    }
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::Empty => "-".to_string(),
        Value::Rune(c) => format!("{c:?}"),
        Value::Text(text) => format!("{text:?}"),
        Value::Key(key) => format!("{key:?}"),
        Value::Mouse { button, column, row } => format!("{button:?}@{column},{row}"),
        Value::Size { width, height } => format!("{width}x{height}"),
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(3), Constraint::Length(3)].as_ref())
        .split(f.size());

    let items: Vec<ListItem> = app
        .log
        .iter()
        .rev()
        .map(|line| ListItem::new(Line::from(line.as_str())))
        .collect();
    let log = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("commands (Esc quits)"),
    );
    f.render_widget(log, chunks[0]);

    let snapshot = app.vm.snapshot();
    let status = Line::from(vec![
        Span::styled(
            app.pending.join(" "),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("    {} branches", snapshot.machines.len())),
    ]);
    let status = Paragraph::new(status).block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[1]);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|f| ui(f, &app))?;

        let event = event::read()?;
        if let Event::Key(key) = &event
            && (key.code == CKeyCode::Esc
                || (key.code == CKeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)))
        {
            break;
        }
        if let Ok(input) = InputEvent::try_from(event) {
            app.handle_event(input);
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    Ok(())
}
