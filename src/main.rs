use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use quiz_garage::config::{Config, DEFAULT_DATA_DIR};
use quiz_garage::models::{LoadResponse, QuizPhase};
use quiz_garage::ui::MENU_ITEMS;
use quiz_garage::{
    draw_garage, draw_menu, draw_quit_confirmation, draw_quiz, draw_summary, handle_garage_input,
    handle_quiz_input, handle_summary_input, logger, spawn_load_worker, AppState, GarageController,
    QuizController, RandomIndices, Screen,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::Path;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

fn main() -> io::Result<()> {
    let config = Config::load(Path::new(DEFAULT_DATA_DIR)).map_err(io::Error::other)?;
    logger::init(&config.log_file);
    logger::log("Starting quiz-garage");

    let (request_tx, request_rx) = crossbeam_channel::unbounded();
    let (response_tx, response_rx) = crossbeam_channel::unbounded();
    let _worker = spawn_load_worker(response_tx, request_rx, config.load_timeout)?;

    let mut screen = Screen::default();
    let mut quiz = QuizController::new(
        RandomIndices::thread(),
        config.sample_size,
        config.questions_path(),
    )
    .with_load_channel(request_tx.clone());
    let mut garage =
        GarageController::new(config.schema, config.cars_path()).with_load_channel(request_tx);

    quiz.request_load(&mut screen);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(
        &mut terminal,
        &mut screen,
        &mut quiz,
        &mut garage,
        &response_rx,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    logger::log("Exiting quiz-garage");

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    screen: &mut Screen,
    quiz: &mut QuizController,
    garage: &mut GarageController,
    responses: &crossbeam_channel::Receiver<LoadResponse>,
) -> io::Result<()> {
    let mut app_state = AppState::Menu;
    let mut selected_menu_index: usize = 0;

    loop {
        for response in responses.try_iter() {
            match response {
                LoadResponse::Questions(result) => quiz.process_load_response(result, screen),
                LoadResponse::Cars(result) => garage.process_load_response(result, screen),
            }
        }

        terminal.draw(|f| match app_state {
            AppState::Menu => draw_menu(f, selected_menu_index, quiz.pool.len(), garage.list.len()),
            AppState::Quiz => draw_quiz(f, screen, quiz.selected),
            AppState::QuizQuitConfirm => draw_quit_confirmation(f),
            AppState::Summary => draw_summary(f, screen),
            AppState::Garage => draw_garage(f, screen, garage),
        })?;

        if !event::poll(TICK)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            break;
        }

        match app_state {
            AppState::Menu => match key.code {
                KeyCode::Up => selected_menu_index = selected_menu_index.saturating_sub(1),
                KeyCode::Down => {
                    if selected_menu_index + 1 < MENU_ITEMS.len() {
                        selected_menu_index += 1;
                    }
                }
                KeyCode::Enter => match selected_menu_index {
                    0 => {
                        app_state = if quiz.session.phase == QuizPhase::Finished {
                            AppState::Summary
                        } else {
                            AppState::Quiz
                        };
                    }
                    1 => {
                        garage.render_list(screen);
                        app_state = AppState::Garage;
                    }
                    _ => break,
                },
                KeyCode::Esc | KeyCode::Char('q') => break,
                _ => {}
            },
            AppState::Quiz => handle_quiz_input(quiz, key, &mut app_state, screen),
            AppState::QuizQuitConfirm => match key.code {
                KeyCode::Char('y') => {
                    quiz.back_to_start(screen);
                    app_state = AppState::Menu;
                }
                KeyCode::Char('n') | KeyCode::Esc => app_state = AppState::Quiz,
                _ => {}
            },
            AppState::Summary => handle_summary_input(quiz, key, &mut app_state, screen),
            AppState::Garage => handle_garage_input(garage, key, &mut app_state, screen),
        }
    }

    Ok(())
}
