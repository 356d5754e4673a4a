use crate::errors::Field;
use crate::garage::{CarForm, GarageController};
use crate::models::{CarEntry, LoadTarget, SortCriterion, SortDirection};
use crate::ui::layout::calculate_garage_chunks;
use crate::ui::screen::Screen;
use crate::utils::pad_to_width;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

fn format_car_row(car: &CarEntry) -> String {
    let year = car.year.map(|y| y.to_string()).unwrap_or_else(|| "-".to_string());
    format!(
        "{} {} {:>4}  {:>4} KM",
        pad_to_width(car.brand.as_deref().unwrap_or("-"), 14),
        pad_to_width(&car.model, 18),
        year,
        car.power_hp
    )
}

fn sort_label(criterion: Option<SortCriterion>, direction: SortDirection) -> String {
    let Some(criterion) = criterion else {
        return "Sort: none".to_string();
    };
    let name = match criterion {
        SortCriterion::Brand => "brand",
        SortCriterion::Model => "model",
        SortCriterion::Name => "name",
        SortCriterion::Year => "year",
        SortCriterion::Power => "power",
    };
    let arrow = match direction {
        SortDirection::Ascending => "ascending",
        SortDirection::Descending => "descending",
    };
    format!("Sort: {} ({})", name, arrow)
}

pub fn draw_garage(f: &mut Frame, screen: &Screen, garage: &GarageController) {
    let layout = calculate_garage_chunks(f.area());

    let header = Paragraph::new(format!("Garage - {} cars", screen.cars.len()))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let items: Vec<ListItem> = if screen.cars.is_empty() {
        vec![ListItem::new("No cars yet. Press a to add one or l to load samples.").style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]
    } else {
        screen
            .cars
            .iter()
            .enumerate()
            .map(|(i, car)| {
                let style = if i == garage.selected_row && !garage.form.editing {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(format_car_row(car)).style(style)
            })
            .collect()
    };
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Cars"));
    f.render_widget(list, layout.list_area);

    let mut form_text = Text::default();
    for (i, field) in CarForm::fields(&garage.schema).into_iter().enumerate() {
        let focused = garage.form.editing && i == garage.form.focused;
        let label = match field {
            Field::Power => "power (kW)".to_string(),
            other => other.label().to_string(),
        };
        let style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        form_text.push_line(Line::from(Span::styled(
            format!("{}: {}", label, garage.form.value(field)),
            style,
        )));
    }
    let form_title = if garage.form.editing {
        "Add car (editing)"
    } else {
        "Add car"
    };
    let form = Paragraph::new(form_text).block(Block::default().borders(Borders::ALL).title(form_title));
    f.render_widget(form, layout.form_area);

    let status_line = if let Some(error) = screen.error(LoadTarget::Cars) {
        Line::from(Span::styled(error, Style::default().fg(Color::Red)))
    } else if screen.is_loading(LoadTarget::Cars) {
        Line::from("Loading sample cars...")
    } else {
        Line::from(sort_label(garage.criterion, garage.direction))
    };
    let status = Paragraph::new(status_line).block(Block::default().borders(Borders::ALL));
    f.render_widget(status, layout.status_area);

    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let help_spans = if garage.form.editing {
        vec![
            Span::styled("Tab", key),
            Span::from(" Next field  "),
            Span::styled("↑/↓", key),
            Span::from(" Year  "),
            Span::styled("Enter", key),
            Span::from(" Add  "),
            Span::styled("Esc", key),
            Span::from(" Cancel"),
        ]
    } else {
        vec![
            Span::styled("a", key),
            Span::from(" Add  "),
            Span::styled("d", key),
            Span::from(" Remove  "),
            Span::styled("b/m/y/p/n", key),
            Span::from(" Sort by  "),
            Span::styled("o", key),
            Span::from(" Direction  "),
            Span::styled("l", key),
            Span::from(" Load samples  "),
            Span::styled("Esc", key),
            Span::from(" Menu"),
        ]
    };
    let help = Paragraph::new(Line::from(help_spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CarId;

    #[test]
    fn test_format_car_row_handles_missing_fields() {
        let car = CarEntry {
            id: CarId(0),
            brand: None,
            model: "Civic".to_string(),
            year: None,
            power_kw: 96.0,
            power_hp: 129,
        };
        let row = format_car_row(&car);
        assert!(row.starts_with("- "));
        assert!(row.contains("Civic"));
        assert!(row.ends_with(" 129 KM"));
    }

    #[test]
    fn test_sort_label() {
        assert_eq!(sort_label(None, SortDirection::Descending), "Sort: none");
        assert_eq!(
            sort_label(Some(SortCriterion::Power), SortDirection::Descending),
            "Sort: power (descending)"
        );
    }
}
