mod render;

use anyhow::Result;
use chatwidget_config::Config;
use chatwidget_engine::{ChatSession, FileStore, WebhookClient, format_reply};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::{
    env,
    fs::{self, OpenOptions},
    io::{self, stdout},
    process,
};

type Chat = ChatSession<FileStore, WebhookClient>;

struct App {
    chat: Chat,
    input: String,
    /// Lines scrolled up from the bottom of the transcript.
    scroll_back: u16,
    status: Option<String>,
}

impl App {
    fn new(chat: Chat) -> Self {
        Self {
            chat,
            input: String::new(),
            scroll_back: 0,
            status: None,
        }
    }

    fn take_input(&mut self) -> Option<String> {
        if self.input.trim().is_empty() {
            return None;
        }
        Some(std::mem::take(&mut self.input))
    }

    fn send(&mut self, text: &str) {
        self.scroll_back = 0;
        self.status = match self.chat.send(text) {
            Ok(_) => None,
            Err(e) => {
                log::error!("Failed to save conversation: {e}");
                Some(format!("Could not save conversation: {e}"))
            }
        };
    }

    fn start_new_conversation(&mut self) {
        self.scroll_back = 0;
        self.status = match self.chat.start_new_conversation() {
            Ok(()) => Some("Started a new conversation".to_string()),
            Err(e) => {
                log::error!("Failed to start new conversation: {e}");
                Some(format!("Could not start a new conversation: {e}"))
            }
        };
    }

    fn scroll_up(&mut self) {
        self.scroll_back = self.scroll_back.saturating_add(1);
    }

    fn scroll_down(&mut self) {
        self.scroll_back = self.scroll_back.saturating_sub(1);
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.get(1).map(String::as_str) == Some("format") {
        return format_stdin();
    }

    let config_path = Config::config_path();
    let config = match args.len() {
        // CLI argument overrides the webhook URL, keeping the rest of the config
        2 => {
            let url = args[1].clone();
            match Config::load() {
                Ok(Some(config)) => Config {
                    webhook_url: url,
                    ..config
                },
                Ok(None) => Config::new(url),
                Err(e) => {
                    eprintln!("Error: Failed to load config file: {e}");
                    process::exit(1);
                }
            }
        }
        1 => match Config::load() {
            Ok(Some(config)) => config,
            Ok(None) => {
                eprintln!("Error: No webhook URL provided and no config file found");
                eprintln!("Usage: {} <webhook-url>", args[0]);
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: Failed to load config file: {e}");
                eprintln!("Usage: {} <webhook-url>", args[0]);
                process::exit(1);
            }
        },
        _ => {
            eprintln!("Usage: {} [webhook-url]", args[0]);
            eprintln!("       {} format < reply.txt", args[0]);
            process::exit(1);
        }
    };

    init_file_logging()?;
    log::info!(
        "Starting chat with {} (history in {})",
        config.webhook_url,
        config.history_path.display()
    );

    let store = FileStore::new(&config.history_path);
    let assistant = WebhookClient::new(&config.webhook_url, config.timeout());
    let chat = ChatSession::open(store, assistant, config.chat_options())?;
    let mut app = App::new(chat);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Prints the node tree for a reply read from stdin.
fn format_stdin() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let raw = io::read_to_string(io::stdin())?;
    println!("{}", serde_json::to_string_pretty(&format_reply(&raw))?);
    Ok(())
}

/// Logs go to a file so they do not draw over the terminal UI.
fn init_file_logging() -> Result<()> {
    let log_path = Config::log_path();
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Esc => return Ok(()),
            KeyCode::Char('n') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.start_new_conversation();
            }
            KeyCode::Enter => {
                if let Some(text) = app.take_input() {
                    // Show the pending message while the webhook call blocks
                    app.status = Some("Waiting for reply...".to_string());
                    terminal.draw(|f| ui(f, app))?;
                    app.send(&text);
                }
            }
            KeyCode::Backspace => {
                app.input.pop();
            }
            KeyCode::Char(c) => app.input.push(c),
            KeyCode::Up => app.scroll_up(),
            KeyCode::Down => app.scroll_down(),
            _ => {}
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    // Transcript panel, pinned to the bottom unless scrolled back
    let title = format!("Chat [{}] {}", app.chat.language(), app.chat.session_id());
    let transcript = Paragraph::new(render::transcript_lines(app.chat.messages()))
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    let rows = transcript.line_count(chunks[0].width.saturating_sub(2));
    let offset = render::scroll_offset(rows, chunks[0].height, app.scroll_back);
    let transcript = transcript.scroll((offset, 0));
    f.render_widget(transcript, chunks[0]);

    // Input line
    let input = Paragraph::new(app.input.as_str())
        .block(Block::default().borders(Borders::ALL).title("Message"));
    f.render_widget(input, chunks[1]);

    // Help or status line
    let help_text = match &app.status {
        Some(status) => Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(vec![
            Span::raw("Enter: Send | "),
            Span::raw("Esc: Quit | "),
            Span::raw("Ctrl-N: New conversation | "),
            Span::raw("↑/↓: Scroll"),
        ]),
    };
    f.render_widget(Paragraph::new(help_text), chunks[2]);
}
