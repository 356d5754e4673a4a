use crate::models::LoadTarget;
use crate::ui::layout::calculate_quiz_chunks;
use crate::ui::screen::Screen;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn key_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn draw_start(f: &mut Frame, screen: &Screen) {
    let layout = calculate_quiz_chunks(f.area());

    let header = Paragraph::new("Quiz")
        .style(key_style())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let mut text = Text::default();
    if screen.is_loading(LoadTarget::Questions) {
        text.push_line(Line::from("Loading questions..."));
    } else if screen.pool_size == 0 {
        text.push_line(Line::from("No questions loaded yet. Press Enter to load them."));
    } else {
        text.push_line(Line::from(format!(
            "{} questions available. Press Enter to start.",
            screen.pool_size
        )));
    }
    if let Some(error) = screen.error(LoadTarget::Questions) {
        text.push_line(Line::from(""));
        text.push_line(Line::from(Span::styled(
            error,
            Style::default().fg(Color::Red),
        )));
    }
    let body = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, layout.options_area);

    let help = Paragraph::new(Line::from(vec![
        Span::styled("Enter", key_style()),
        Span::from(" Start  "),
        Span::styled("l", key_style()),
        Span::from(" Reload  "),
        Span::styled("Esc", key_style()),
        Span::from(" Quit to Menu"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

pub fn draw_quiz(f: &mut Frame, screen: &Screen, selected: Option<usize>) {
    let Some(question) = &screen.question else {
        draw_start(f, screen);
        return;
    };
    let layout = calculate_quiz_chunks(f.area());

    let header = Paragraph::new(format!("Question {} / {}", question.number, question.total))
        .style(key_style())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let question_text = Paragraph::new(question.text.as_str())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question_text, layout.question_area);

    let mut options = Text::default();
    for (i, option) in question.options.iter().enumerate() {
        let marker = if selected == Some(i) { ">" } else { " " };
        let style = match &screen.feedback {
            Some(feedback) if i == feedback.correct_index => Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            Some(feedback) if i == feedback.chosen => Style::default().fg(Color::Red),
            None if selected == Some(i) => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            _ => Style::default(),
        };
        options.push_line(Line::from(Span::styled(
            format!("{} {}. {}", marker, i + 1, option),
            style,
        )));
    }

    if let Some(feedback) = &screen.feedback {
        options.push_line(Line::from(""));
        if feedback.correct {
            options.push_line(Line::from(Span::styled(
                "Correct!",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )));
        } else {
            options.push_line(Line::from(Span::styled(
                format!("Wrong. Correct answer: {}", feedback.correct_text),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
        }
    }
    if let Some(error) = screen.error(LoadTarget::Questions) {
        options.push_line(Line::from(""));
        options.push_line(Line::from(Span::styled(
            error,
            Style::default().fg(Color::Yellow),
        )));
    }

    let answers = Paragraph::new(options)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Answers"));
    f.render_widget(answers, layout.options_area);

    let help_spans = if screen.feedback.is_some() {
        vec![
            Span::styled("Enter", key_style()),
            Span::from(" Next  "),
            Span::styled("Esc", key_style()),
            Span::from(" Quit to Menu"),
        ]
    } else {
        vec![
            Span::styled("1-9 ↑/↓", key_style()),
            Span::from(" Choose  "),
            Span::styled("Enter", key_style()),
            Span::from(" Submit  "),
            Span::styled("→", key_style()),
            Span::from(" Skip  "),
            Span::styled("Esc", key_style()),
            Span::from(" Quit to Menu"),
        ]
    };
    let help = Paragraph::new(Line::from(help_spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Quit to Menu")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new("Abandon this quiz and return to the main menu?")
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help_text = vec![Line::from(vec![
        Span::styled(
            "y",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(" Yes (Return to Menu)  "),
        Span::styled(
            "n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::from(" No (Continue Quiz)  "),
        Span::styled("Ctrl+C", key_style()),
        Span::from(" Exit App"),
    ])];
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
