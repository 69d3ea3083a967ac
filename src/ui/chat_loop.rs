//! Interactive terminal session.

use std::{
    error::Error,
    io::{self, Stdout},
    path::{Path, PathBuf},
    time::Duration,
};

use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, warn};

use crate::commands::{export_notice, process_input, save_notice, CommandContext, CommandResult};
use crate::core::controller::{
    ConversationController, SubmitOutcome, TurnView, EMPTY_MESSAGE_WARNING, GENERATION_ERROR,
};
use crate::core::session::SessionState;
use crate::ui::page::{self, Notice, PageState};

type ChatTerminal = Terminal<CrosstermBackend<Stdout>>;

const PAGE_SCROLL: u16 = 10;

/// What a key press asks the loop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Submit(String),
    CyclePersona,
    CycleModel,
    Clear,
    Save,
    Export,
    Quit,
}

/// Apply editing and scrolling keys to `page` and map the rest to actions.
pub fn handle_key(key: KeyEvent, page: &mut PageState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => KeyAction::Quit,
        KeyCode::Char('l') if ctrl => KeyAction::Clear,
        KeyCode::Char('s') if ctrl => KeyAction::Save,
        KeyCode::Char('e') if ctrl => KeyAction::Export,
        KeyCode::F(2) => KeyAction::CyclePersona,
        KeyCode::F(3) => KeyAction::CycleModel,
        KeyCode::Enter => KeyAction::Submit(std::mem::take(&mut page.input)),
        KeyCode::Char(c) if !ctrl => {
            page.input.push(c);
            KeyAction::None
        }
        KeyCode::Backspace => {
            page.input.pop();
            KeyAction::None
        }
        KeyCode::Up => {
            page.scroll_up(1);
            KeyAction::None
        }
        KeyCode::Down => {
            page.scroll_down(1);
            KeyAction::None
        }
        KeyCode::PageUp => {
            page.scroll_up(PAGE_SCROLL);
            KeyAction::None
        }
        KeyCode::PageDown => {
            page.scroll_down(PAGE_SCROLL);
            KeyAction::None
        }
        KeyCode::End => {
            page.scroll_to_bottom();
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

/// Redraws the page as a turn progresses.
struct TerminalView<'a> {
    terminal: &'a mut ChatTerminal,
    page: &'a mut PageState,
}

impl TerminalView<'_> {
    fn redraw(&mut self, session: &SessionState) {
        let page = &*self.page;
        if let Err(err) = self.terminal.draw(|f| page::draw(f, session, page)) {
            warn!(error = %err, "failed to redraw chat page");
        }
    }
}

impl TurnView for TerminalView<'_> {
    fn user_submitted(&mut self, session: &SessionState) {
        self.page.notice = None;
        self.page.scroll_to_bottom();
        self.redraw(session);
    }

    fn streaming(&mut self, session: &SessionState, visible: &str) {
        self.page.streaming = Some(visible.to_string());
        self.redraw(session);
    }

    fn committed(&mut self, session: &SessionState) {
        self.page.streaming = None;
        self.redraw(session);
    }
}

pub async fn run_chat(
    controller: ConversationController,
    export_dir: PathBuf,
) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err.into());
    }
    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(err) => {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
    };

    let result = event_loop(&mut terminal, controller, &export_dir).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    mut controller: ConversationController,
    export_dir: &Path,
) -> Result<(), Box<dyn Error>> {
    let mut page = PageState::default();

    loop {
        terminal.draw(|f| page::draw(f, controller.session(), &page))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_key(key, &mut page) {
            KeyAction::None => {}
            KeyAction::Quit => break,
            KeyAction::CyclePersona => {
                let persona = controller.cycle_persona();
                page.notice = Some(Notice::info(format!("Persona set: {}", persona.name)));
            }
            KeyAction::CycleModel => {
                let model = controller.cycle_model();
                page.notice = Some(Notice::info(format!("Model set: {}", model.display_name)));
            }
            KeyAction::Clear => {
                controller.clear();
                page.notice = Some(Notice::info("Conversation cleared"));
            }
            KeyAction::Save => page.notice = Some(save_notice(controller.save())),
            KeyAction::Export => {
                page.notice = Some(export_notice(controller.export_to_dir(export_dir)));
            }
            KeyAction::Submit(input) => {
                let mut context = CommandContext {
                    controller: &mut controller,
                    export_dir,
                };
                match process_input(&mut context, &input) {
                    CommandResult::Notice(notice) => page.notice = Some(notice),
                    CommandResult::Quit => break,
                    CommandResult::ProcessAsMessage(message) => {
                        let mut view = TerminalView {
                            terminal: &mut *terminal,
                            page: &mut page,
                        };
                        let outcome = controller.submit(&message, &mut view).await;
                        debug!(?outcome, "turn finished");
                        page.notice = match outcome {
                            SubmitOutcome::Rejected => Some(Notice::warning(EMPTY_MESSAGE_WARNING)),
                            SubmitOutcome::Failed => Some(Notice::error(GENERATION_ERROR)),
                            SubmitOutcome::Answered { .. } => None,
                        };
                    }
                }
            }
        }
    }

    Ok(())
}
