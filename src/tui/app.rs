//! Main TUI application state and event loop

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::{Frame, Terminal};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use crate::assistant::Assistant;
use crate::dashboard::DashboardState;
use crate::error::GenerationError;
use crate::generation::PlanGenerator;
use crate::model::{UserProfile, WeeklyPlan};
use crate::session::{Phase, Session};

use super::views::{
    draw_chat_panel, draw_dashboard_view, draw_onboarding_view, ChatAction, ChatPanel,
    FormOutcome, OnboardingForm,
};
use super::widgets::{draw_alert, draw_status_bar, StatusTone, COLOR_BG};

const TICK: Duration = Duration::from_millis(100);

const GENERATION_FAILED: &str = "生成计划失败，请检查 API Key 或稍后重试。";

/// Everything the TUI needs to talk to the model
pub struct TuiConfig {
    pub generator: Arc<PlanGenerator>,
    pub assistant: Arc<Assistant>,
}

type PlanOutcome = Result<WeeklyPlan, GenerationError>;

/// Main application state
struct App {
    session: Session,
    form: OnboardingForm,
    dashboard: DashboardState,
    chat: ChatPanel,

    generator: Arc<PlanGenerator>,
    assistant: Arc<Assistant>,
    runtime: Handle,

    /// Generation results come back to the event loop here
    outcomes_tx: UnboundedSender<PlanOutcome>,
    outcomes_rx: UnboundedReceiver<PlanOutcome>,

    /// Blocking alert, dismissed with Enter
    alert: Option<String>,

    status_message: String,
    status_tone: StatusTone,

    should_quit: bool,
}

impl App {
    fn new(config: TuiConfig, runtime: Handle) -> Self {
        let (outcomes_tx, outcomes_rx) = unbounded_channel();
        Self {
            session: Session::new(),
            form: OnboardingForm::new(),
            dashboard: DashboardState::new(),
            chat: ChatPanel::default(),
            generator: config.generator,
            assistant: config.assistant,
            runtime,
            outcomes_tx,
            outcomes_rx,
            alert: None,
            status_message: "欢迎来到 FitToon！填写资料，生成你的专属计划".to_string(),
            status_tone: StatusTone::Info,
            should_quit: false,
        }
    }

    fn set_status<S: Into<String>>(&mut self, message: S, tone: StatusTone) {
        self.status_message = message.into();
        self.status_tone = tone;
    }

    fn start_generation(&mut self, profile: UserProfile) {
        if let Err(e) = self.session.begin(profile.clone()) {
            self.set_status(e.to_string(), StatusTone::Warning);
            return;
        }
        self.set_status("AI生成中...", StatusTone::Info);

        let generator = self.generator.clone();
        let tx = self.outcomes_tx.clone();
        self.runtime.spawn(async move {
            let outcome = generator.generate(&profile).await;
            if tx.send(outcome).is_err() {
                warn!("Plan finished after the UI closed");
            }
        });
    }

    fn poll_generation(&mut self) {
        while let Ok(outcome) = self.outcomes_rx.try_recv() {
            let failed = outcome.is_err();
            match self.session.finish(outcome) {
                Ok(()) if failed => {
                    self.form.reset();
                    self.alert = Some(GENERATION_FAILED.to_string());
                    self.set_status("生成失败，请重新填写资料", StatusTone::Error);
                }
                Ok(()) => {
                    self.dashboard = DashboardState::new();
                    self.set_status("计划已生成！按 c 和教练聊聊 💬", StatusTone::Success);
                }
                Err(e) => warn!("Dropping plan outcome: {}", e),
            }
        }
    }

    fn send_chat(&mut self, text: String) {
        let assistant = self.assistant.clone();
        self.runtime.spawn(async move {
            assistant.send(&text).await;
        });
    }

    fn reset(&mut self) {
        match self.session.reset() {
            Ok(()) => {
                self.form.reset();
                self.dashboard = DashboardState::new();
                info!("Plan discarded by user");
                self.set_status("已重置，重新填写资料生成新计划", StatusTone::Info);
            }
            Err(e) => self.set_status(e.to_string(), StatusTone::Warning),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.alert = None;
            }
            return;
        }

        if key.code == KeyCode::F(2) {
            self.chat.toggle();
            return;
        }

        if self.chat.open {
            match self.chat.handle_key(key, self.assistant.is_typing()) {
                ChatAction::Send(text) => self.send_chat(text),
                ChatAction::Waiting => self.set_status("教练正在回复，请稍候...", StatusTone::Info),
                ChatAction::None | ChatAction::Close => {}
            }
            return;
        }

        match self.session.phase() {
            Phase::NoPlan => self.handle_onboarding_key(key),
            Phase::Loading => self.set_status("AI生成中，请稍候...", StatusTone::Info),
            Phase::PlanReady => self.handle_dashboard_key(key),
        }
    }

    fn handle_onboarding_key(&mut self, key: KeyEvent) {
        match self.form.handle_key(key, self.session.is_loading()) {
            FormOutcome::Idle => {}
            FormOutcome::Moved(step) => {
                self.set_status(format!("第 {} 步：{}", step.number(), step.title()), StatusTone::Info)
            }
            FormOutcome::Submitted(profile) => self.start_generation(profile),
            FormOutcome::Rejected(e) => self.set_status(e.to_string(), StatusTone::Warning),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        let Some(plan) = self.session.plan() else {
            return;
        };
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab => self.dashboard.tab = self.dashboard.tab.toggle(),
            KeyCode::Left | KeyCode::Char('h') => self.dashboard.previous_day(plan),
            KeyCode::Right | KeyCode::Char('l') => self.dashboard.next_day(plan),
            KeyCode::Char(c @ '1'..='7') => {
                let index = (c as u8 - b'1') as usize;
                self.dashboard.select_day(index, plan);
            }
            KeyCode::Char('c') => self.chat.toggle(),
            KeyCode::Char('r') => self.reset(),
            _ => {}
        }
    }

    fn help_line(&self) -> &'static str {
        if self.chat.open {
            return "Keys: Enter send · Esc/F2 close chat · Ctrl+C quit";
        }
        match self.session.phase() {
            Phase::NoPlan => "Keys: Tab field · ←/→ choose · Enter next · Esc back · F2 chat · Ctrl+C quit",
            Phase::Loading => "Keys: F2 chat · Ctrl+C quit",
            Phase::PlanReady => {
                "Keys: ←/→ day · 1-7 jump · Tab stats · c chat · r reset · q quit"
            }
        }
    }
}

/// Run the TUI until the user quits
pub fn run_tui(config: TuiConfig) -> Result<()> {
    let runtime = Handle::try_current().context("terminal UI needs a tokio runtime")?;
    let mut app = App::new(config, runtime);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app);

    cleanup_terminal(terminal)?;
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    while !app.should_quit {
        app.poll_generation();

        terminal.draw(|frame| draw_ui(frame, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
    }
    Ok(())
}

fn draw_ui(frame: &mut Frame<'_>, app: &App) {
    frame.render_widget(
        Block::default().style(Style::default().bg(COLOR_BG)),
        frame.size(),
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(10), Constraint::Length(4)])
        .split(frame.size());

    match (app.session.profile(), app.session.plan()) {
        (Some(profile), Some(plan)) => {
            draw_dashboard_view(frame, chunks[0], profile, plan, &app.dashboard)
        }
        _ => draw_onboarding_view(frame, chunks[0], &app.form, app.session.is_loading()),
    }

    draw_status_bar(
        frame,
        chunks[1],
        &app.status_message,
        app.status_tone,
        app.help_line(),
    );

    if app.chat.open {
        draw_chat_panel(
            frame,
            chunks[0],
            &app.chat,
            &app.assistant.transcript(),
            app.assistant.is_typing(),
        );
    }

    if let Some(message) = &app.alert {
        draw_alert(frame, message);
    }
}

fn cleanup_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
