use crate::cars::{year_options, CarList};
use crate::errors::{Field, LoadError, ValidationError};
use crate::logger;
use crate::models::{
    AppState, CarEntryDraft, CarId, CarRecord, FieldSchema, LoadRequest, LoadState, LoadTarget,
    SortCriterion, SortDirection, SortSpec,
};
use crate::render::{RenderInstruction, Renderer};
use crossbeam_channel::Sender;
use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;

/// Text typed into the add-car form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarForm {
    pub draft: CarEntryDraft,
    pub focused: usize,
    pub editing: bool,
}

impl CarForm {
    /// Fields shown for `schema`, in form order.
    pub fn fields(schema: &FieldSchema) -> Vec<Field> {
        let mut fields = Vec::with_capacity(4);
        if schema.require_brand {
            fields.push(Field::Brand);
        }
        fields.push(schema.model_field);
        if schema.require_year {
            fields.push(Field::Year);
        }
        fields.push(Field::Power);
        fields
    }

    pub fn focused_field(&self, schema: &FieldSchema) -> Field {
        let fields = Self::fields(schema);
        fields[self.focused.min(fields.len() - 1)]
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Brand => &self.draft.brand,
            Field::Model | Field::Name => &self.draft.model,
            Field::Year => &self.draft.year,
            Field::Power => &self.draft.power_kw,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Brand => &mut self.draft.brand,
            Field::Model | Field::Name => &mut self.draft.model,
            Field::Year => &mut self.draft.year,
            Field::Power => &mut self.draft.power_kw,
        }
    }

    fn focus_next(&mut self, schema: &FieldSchema, forward: bool) {
        let count = Self::fields(schema).len();
        self.focused = if forward {
            (self.focused + 1) % count
        } else {
            (self.focused + count - 1) % count
        };
    }

    /// Steps the year through the picker's options. Up moves to newer years.
    fn cycle_year(&mut self, schema: &FieldSchema, newer: bool) {
        let options = year_options(schema);
        let Some(&newest) = options.first() else {
            return;
        };
        let current = self.draft.year.trim().parse::<i32>().ok();
        let next = match current.and_then(|y| options.iter().position(|&o| o == y)) {
            Some(pos) if newer => options[pos.saturating_sub(1)],
            Some(pos) => options[(pos + 1).min(options.len() - 1)],
            None => newest,
        };
        self.draft.year = next.to_string();
    }
}

/// Owns the car list plus the sort controls and form of the garage screen.
#[derive(Debug)]
pub struct GarageController {
    pub list: CarList,
    pub schema: FieldSchema,
    pub criterion: Option<SortCriterion>,
    pub direction: SortDirection,
    pub form: CarForm,
    pub selected_row: usize,
    pub load_state: LoadState,
    pub cars_path: PathBuf,
    pub load_tx: Option<Sender<LoadRequest>>,
}

impl GarageController {
    pub fn new(schema: FieldSchema, cars_path: PathBuf) -> Self {
        Self {
            list: CarList::new(),
            schema,
            criterion: None,
            direction: SortDirection::Ascending,
            form: CarForm::default(),
            selected_row: 0,
            load_state: LoadState::Idle,
            cars_path,
            load_tx: None,
        }
    }

    pub fn with_load_channel(mut self, load_tx: Sender<LoadRequest>) -> Self {
        self.load_tx = Some(load_tx);
        self
    }

    pub fn add(
        &mut self,
        draft: &CarEntryDraft,
        renderer: &mut impl Renderer,
    ) -> Result<CarId, ValidationError> {
        match self.list.add_entry(draft, &self.schema) {
            Ok(id) => {
                self.render_list(renderer);
                Ok(id)
            }
            Err(e) => {
                logger::log(&format!("Car rejected: {}", e));
                renderer.render(RenderInstruction::ShowError(
                    LoadTarget::Cars,
                    e.to_string(),
                ));
                Err(e)
            }
        }
    }

    /// Adds the form's draft and clears the form when it is accepted.
    pub fn submit_form(&mut self, renderer: &mut impl Renderer) -> Result<CarId, ValidationError> {
        let draft = self.form.draft.clone();
        let id = self.add(&draft, renderer)?;
        self.form = CarForm::default();
        Ok(id)
    }

    pub fn remove(&mut self, id: CarId, renderer: &mut impl Renderer) {
        self.list.remove_entry(id);
        self.selected_row = self.selected_row.min(self.list.len().saturating_sub(1));
        self.render_list(renderer);
    }

    pub fn remove_selected(&mut self, renderer: &mut impl Renderer) {
        if let Some(id) = self.list.entries().get(self.selected_row).map(|e| e.id) {
            self.remove(id, renderer);
        }
    }

    pub fn set_criterion(&mut self, criterion: Option<SortCriterion>, renderer: &mut impl Renderer) {
        self.criterion = criterion;
        self.apply_sort(renderer);
    }

    pub fn set_direction(&mut self, direction: SortDirection, renderer: &mut impl Renderer) {
        self.direction = direction;
        self.apply_sort(renderer);
    }

    fn apply_sort(&mut self, renderer: &mut impl Renderer) {
        let direction = self.direction;
        self.list.set_sort(self.criterion.map(|criterion| SortSpec {
            criterion,
            direction,
        }));
        self.render_list(renderer);
    }

    /// Asks the worker for the sample cars. Returns false when a load is
    /// already pending or could not be sent.
    pub fn request_sample_load(&mut self, renderer: &mut impl Renderer) -> bool {
        if self.load_state == LoadState::Pending {
            logger::log("Car load already pending, ignoring request");
            return false;
        }

        let sent = self.load_tx.as_ref().is_some_and(|tx| {
            tx.send(LoadRequest::Cars {
                path: self.cars_path.clone(),
            })
            .is_ok()
        });
        if !sent {
            self.fail_load(LoadError::WorkerUnavailable, renderer);
            return false;
        }

        logger::log(&format!("Requested sample cars from {}", self.cars_path.display()));
        self.load_state = LoadState::Pending;
        renderer.render(RenderInstruction::ShowLoading(LoadTarget::Cars));
        true
    }

    pub fn process_load_response(
        &mut self,
        result: Result<Vec<CarRecord>, LoadError>,
        renderer: &mut impl Renderer,
    ) {
        match result {
            Ok(records) => {
                let added = self.list.bulk_load(&records);
                logger::log(&format!("Loaded {} sample cars", added));
                self.load_state = LoadState::Loaded;
                self.render_list(renderer);
            }
            Err(e) => self.fail_load(e, renderer),
        }
    }

    fn fail_load(&mut self, error: LoadError, renderer: &mut impl Renderer) {
        let message = format!("Could not load sample cars: {}", error);
        logger::log(&message);
        self.load_state = LoadState::Failed(message.clone());
        renderer.render(RenderInstruction::ShowError(LoadTarget::Cars, message));
    }

    pub fn render_list(&self, renderer: &mut impl Renderer) {
        renderer.render(RenderInstruction::ShowCars(self.list.entries().to_vec()));
    }
}

pub fn handle_garage_input(
    garage: &mut GarageController,
    key: KeyEvent,
    app_state: &mut AppState,
    renderer: &mut impl Renderer,
) {
    if garage.form.editing {
        handle_form_input(garage, key, renderer);
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => *app_state = AppState::Menu,
        KeyCode::Char('a') => garage.form.editing = true,
        KeyCode::Up => garage.selected_row = garage.selected_row.saturating_sub(1),
        KeyCode::Down => {
            if garage.selected_row + 1 < garage.list.len() {
                garage.selected_row += 1;
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => garage.remove_selected(renderer),
        KeyCode::Char('b') => garage.set_criterion(Some(SortCriterion::Brand), renderer),
        KeyCode::Char('m') => {
            let criterion = if garage.schema.model_field == Field::Name {
                SortCriterion::Name
            } else {
                SortCriterion::Model
            };
            garage.set_criterion(Some(criterion), renderer);
        }
        KeyCode::Char('y') => garage.set_criterion(Some(SortCriterion::Year), renderer),
        KeyCode::Char('p') => garage.set_criterion(Some(SortCriterion::Power), renderer),
        KeyCode::Char('n') => garage.set_criterion(None, renderer),
        KeyCode::Char('o') => {
            let direction = garage.direction.toggled();
            garage.set_direction(direction, renderer);
        }
        KeyCode::Char('l') => {
            garage.request_sample_load(renderer);
        }
        _ => {}
    }
}

fn handle_form_input(garage: &mut GarageController, key: KeyEvent, renderer: &mut impl Renderer) {
    let schema = garage.schema;
    let field = garage.form.focused_field(&schema);
    match key.code {
        KeyCode::Esc => garage.form = CarForm::default(),
        KeyCode::Tab => garage.form.focus_next(&schema, true),
        KeyCode::BackTab => garage.form.focus_next(&schema, false),
        KeyCode::Up if field == Field::Year => garage.form.cycle_year(&schema, true),
        KeyCode::Down if field == Field::Year => garage.form.cycle_year(&schema, false),
        KeyCode::Enter => {
            let _ = garage.submit_form(renderer);
        }
        KeyCode::Backspace => {
            garage.form.value_mut(field).pop();
        }
        KeyCode::Char(c) => garage.form.value_mut(field).push(c),
        _ => {}
    }
}
