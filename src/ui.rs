use crate::app::{update, AppMsg, Effect};
use crate::config::AppConfig;
use crate::model::{Model, Payload};
use crate::services::payload::{load_payload, snapshot_json, write_snapshot};
use crate::theme::Theme;
use crate::widgets::form::FormEditor;
use crate::widgets::form_widget::FormWidget;
use crate::widgets::status_bar::draw_footer;
use crate::widgets::Widget;
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::widgets::*;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub text: String,
    pub level: ToastLevel,
    pub expires_at_tick: u64,
}

pub(crate) struct AppState {
    pub(crate) config: AppConfig,
    pub(crate) form: FormWidget,
    pub(crate) theme: Theme,
    pub(crate) tick: u64,
    pub(crate) toast: Option<Toast>,
    pub(crate) debug_log: VecDeque<String>,
    pub(crate) last_error: Option<String>,
    // Last snapshot handed out through a submit
    pub(crate) pending_snapshot: Option<Model>,
    pub(crate) should_quit: bool,
}

impl AppState {
    pub(crate) fn new(config: AppConfig, payload: Payload) -> Self {
        let form = FormEditor::new(config.title.clone(), payload.params, payload.model);
        info!(
            fields = form.definitions().len(),
            title = %form.title,
            "form ready"
        );
        Self {
            config,
            form: FormWidget::new(form),
            theme: Theme::synthwave_dark(),
            tick: 0,
            toast: None,
            debug_log: VecDeque::new(),
            last_error: None,
            pending_snapshot: None,
            should_quit: false,
        }
    }

    pub(crate) fn dbg(&mut self, msg: impl Into<String>) {
        const MAX_LOG_LINES: usize = 200;
        let msg = msg.into();
        debug!("{msg}");
        if self.debug_log.len() >= MAX_LOG_LINES {
            self.debug_log.pop_front();
        }
        self.debug_log.push_back(msg);
    }
}

pub(crate) fn run_effects(state: &mut AppState, effects: Vec<Effect>) {
    let mut queue: VecDeque<Effect> = effects.into();
    while let Some(eff) = queue.pop_front() {
        match eff {
            Effect::SubmitSnapshot(model) => {
                let path = state.config.output_path.clone();
                let outcome = match &path {
                    Some(p) => write_snapshot(p, &model).map_err(|e| e.to_string()),
                    None => Ok(()),
                };
                if outcome.is_ok() {
                    state.pending_snapshot = Some(model);
                }
                queue.extend(update(state, AppMsg::SnapshotSubmitted { path, outcome }));
            }
            Effect::ShowToast {
                text,
                level,
                seconds,
            } => {
                let ticks = seconds.saturating_mul(5); // ~200ms tick
                let exp = state.tick.saturating_add(ticks);
                state.toast = Some(Toast {
                    text,
                    level,
                    expires_at_tick: exp,
                });
            }
            Effect::Quit => {
                state.dbg("quit requested");
                state.should_quit = true;
            }
        }
    }
}

pub fn run() -> Result<()> {
    let cfg = AppConfig::from_env().context("reading configuration")?;
    let _log_guard = crate::logging::init(&cfg)?;
    let payload = match &cfg.payload_path {
        Some(path) => load_payload(path).with_context(|| format!("loading payload {path:?}"))?,
        None => {
            info!("no payload configured, using demo data");
            Payload::demo()
        }
    };
    let mut state = AppState::new(cfg, payload);
    if state.config.headless {
        return run_headless(&mut state);
    }
    run_interactive(&mut state)?;
    if state.config.print_on_exit {
        let json = snapshot_json(&state.form.form.snapshot_model())
            .context("encoding final snapshot")?;
        println!("{json}");
    }
    Ok(())
}

fn run_headless(state: &mut AppState) -> Result<()> {
    let backend = ratatui::backend::TestBackend::new(80, 24);
    let mut terminal = Terminal::new(backend)?;
    let mut script: VecDeque<KeyEvent> = state.config.keys.iter().cloned().collect();
    let frames = state.config.ticks.max(script.len() as u64);
    for _ in 0..frames {
        terminal.draw(|f| ui(f, state))?;
        if let Some(key) = script.pop_front() {
            let effects = update(state, AppMsg::Key(key));
            run_effects(state, effects);
        }
        if state.should_quit {
            break;
        }
        state.tick = state.tick.wrapping_add(1);
    }
    println!("{}", headless_summary(state));
    Ok(())
}

fn headless_summary(state: &AppState) -> serde_json::Value {
    let form = &state.form.form;
    serde_json::json!({
        "ok": state.last_error.is_none(),
        "dirty": form.is_dirty(),
        "editing": form.any_editing(),
        "submitted": state.pending_snapshot.is_some(),
        "model": form.snapshot_model(),
    })
}

fn run_interactive(state: &mut AppState) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let res = event_loop(&mut terminal, state);
    // Restore
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, state: &mut AppState) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();
    while !state.should_quit {
        terminal.draw(|f| ui(f, state))?;
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_millis(0));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let effects = update(state, AppMsg::Key(key));
                    run_effects(state, effects);
                }
            }
        }
        if last_tick.elapsed() >= tick_rate {
            state.tick = state.tick.wrapping_add(1);
            last_tick = Instant::now();
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, state: &mut AppState) {
    // Clear expired toast
    if let Some(t) = &state.toast {
        if state.tick >= t.expires_at_tick {
            state.toast = None;
        }
    }

    let screen = f.area();
    let bg = Block::default().style(state.theme.base_style());
    f.render_widget(bg, screen);

    const DEBUG_H: u16 = 6;
    let mut constraints = vec![Constraint::Min(3)];
    if state.config.debug_pane {
        constraints.push(Constraint::Length(DEBUG_H));
    }
    constraints.push(Constraint::Length(1)); // Footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(screen);

    state
        .form
        .render(f, chunks[0], true, state.tick, &state.theme);
    if state.config.debug_pane {
        draw_debug(f, chunks[1], state);
    }
    draw_footer(f, chunks[chunks.len() - 1], state);
}

fn draw_debug(f: &mut Frame, area: Rect, state: &AppState) {
    let b = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            "Debug",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        ));
    // Take last `area.height` lines
    let h = area.height as usize;
    let total = state.debug_log.len();
    let start = total.saturating_sub(h);
    let lines: Vec<Line> = state
        .debug_log
        .iter()
        .skip(start)
        .map(|s| Line::raw(s.clone()))
        .collect();
    let p = Paragraph::new(lines)
        .style(Style::default().fg(Color::Gray))
        .block(b)
        .wrap(Wrap { trim: true });
    f.render_widget(p, area);
}
