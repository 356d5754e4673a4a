use crate::errors::{Field, ValidationError};
use crate::models::{
    CarEntry, CarEntryDraft, CarId, CarRecord, FieldSchema, SortCriterion, SortDirection, SortSpec,
};
use std::cmp::Ordering;

pub const KW_TO_HP: f64 = 1.34102;

pub fn kw_to_hp(kw: f64) -> u32 {
    (kw * KW_TO_HP).round() as u32
}

/// Horsepower for `kw` when it is a finite power whose rounded horsepower
/// lies in `1..=u32::MAX`.
pub fn checked_hp(kw: f64) -> Option<u32> {
    if !kw.is_finite() {
        return None;
    }
    let hp = (kw * KW_TO_HP).round();
    (1.0..=u32::MAX as f64).contains(&hp).then_some(hp as u32)
}

/// Years offered by the form picker, newest first.
pub fn year_options(schema: &FieldSchema) -> Vec<i32> {
    (schema.year_from..=schema.year_to).rev().collect()
}

#[derive(Debug, Clone, Default)]
pub struct CarList {
    entries: Vec<CarEntry>,
    next_id: u64,
    active_sort: Option<SortSpec>,
}

impl CarList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[CarEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn active_sort(&self) -> Option<SortSpec> {
        self.active_sort
    }

    pub fn get(&self, id: CarId) -> Option<&CarEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Validates the draft against `schema` and appends it. The list is
    /// untouched on error.
    pub fn add_entry(
        &mut self,
        draft: &CarEntryDraft,
        schema: &FieldSchema,
    ) -> Result<CarId, ValidationError> {
        let validated = validate_draft(draft, schema)?;
        let id = self.push(validated);
        self.apply_sort();
        Ok(id)
    }

    /// Removing an unknown id is a no-op.
    pub fn remove_entry(&mut self, id: CarId) {
        self.entries.retain(|entry| entry.id != id);
        self.apply_sort();
    }

    /// Appends trusted records without interactive validation. Records
    /// whose power has no representable horsepower are skipped; returns the
    /// number appended.
    pub fn bulk_load(&mut self, records: &[CarRecord]) -> usize {
        let mut added = 0;
        for record in records {
            if checked_hp(record.power_kw).is_none() {
                continue;
            }
            self.push(record.clone());
            added += 1;
        }
        self.apply_sort();
        added
    }

    pub fn set_sort(&mut self, spec: Option<SortSpec>) {
        self.active_sort = spec;
        self.apply_sort();
    }

    pub fn sort(&mut self, criterion: SortCriterion, direction: SortDirection) {
        self.set_sort(Some(SortSpec {
            criterion,
            direction,
        }));
    }

    fn push(&mut self, record: CarRecord) -> CarId {
        let id = CarId(self.next_id);
        self.next_id += 1;
        self.entries.push(CarEntry {
            id,
            power_hp: kw_to_hp(record.power_kw),
            brand: record.brand,
            model: record.model,
            year: record.year,
            power_kw: record.power_kw,
        });
        id
    }

    fn apply_sort(&mut self) {
        if let Some(spec) = self.active_sort {
            sort_entries(&mut self.entries, spec);
        }
    }
}

/// Stable sort; ties keep their current relative order.
pub fn sort_entries(entries: &mut [CarEntry], spec: SortSpec) {
    entries.sort_by(|a, b| {
        let ordering = compare_by(a, b, spec.criterion);
        match spec.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn compare_by(a: &CarEntry, b: &CarEntry, criterion: SortCriterion) -> Ordering {
    match criterion {
        SortCriterion::Brand => locale_compare(
            a.brand.as_deref().unwrap_or(""),
            b.brand.as_deref().unwrap_or(""),
        ),
        SortCriterion::Model | SortCriterion::Name => locale_compare(&a.model, &b.model),
        SortCriterion::Year => a.year.cmp(&b.year),
        SortCriterion::Power => a.power_hp.cmp(&b.power_hp),
    }
}

/// Compares by base letter first, then accents, then case (lowercase first).
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let base = |s: &str| -> Vec<char> {
        s.chars()
            .flat_map(char::to_lowercase)
            .map(fold_accent)
            .collect()
    };
    let accented = |s: &str| -> Vec<char> { s.chars().flat_map(char::to_lowercase).collect() };

    base(a)
        .cmp(&base(b))
        .then_with(|| accented(a).cmp(&accented(b)))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

fn fold_accent(c: char) -> char {
    match c {
        'ą' | 'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ć' | 'ç' | 'č' => 'c',
        'ę' | 'è' | 'é' | 'ê' | 'ë' | 'ě' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ł' => 'l',
        'ń' | 'ñ' | 'ň' => 'n',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'ś' | 'š' | 'ß' => 's',
        'ù' | 'ú' | 'û' | 'ü' | 'ů' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        'ř' => 'r',
        _ => c,
    }
}

fn validate_draft(draft: &CarEntryDraft, schema: &FieldSchema) -> Result<CarRecord, ValidationError> {
    let brand = draft.brand.trim();
    let model = draft.model.trim();
    let year = draft.year.trim();
    let power = draft.power_kw.trim();

    let mut missing = Vec::new();
    if schema.require_brand && brand.is_empty() {
        missing.push(Field::Brand);
    }
    if model.is_empty() {
        missing.push(schema.model_field);
    }
    if schema.require_year && year.is_empty() {
        missing.push(Field::Year);
    }
    if power.is_empty() {
        missing.push(Field::Power);
    }
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    let power_kw = match power.parse::<f64>() {
        Ok(kw) if checked_hp(kw).is_some() => kw,
        _ => return Err(ValidationError::InvalidPower(power.to_string())),
    };

    let year = if year.is_empty() {
        None
    } else {
        match year.parse::<i32>() {
            Ok(y) if (schema.year_from..=schema.year_to).contains(&y) => Some(y),
            _ => return Err(ValidationError::InvalidYear(year.to_string())),
        }
    };

    Ok(CarRecord {
        brand: (!brand.is_empty()).then(|| brand.to_string()),
        model: model.to_string(),
        year,
        power_kw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(name: &str, power: &str) -> CarEntryDraft {
        CarEntryDraft {
            model: name.to_string(),
            power_kw: power.to_string(),
            ..Default::default()
        }
    }

    fn full(brand: &str, model: &str, year: &str, power: &str) -> CarEntryDraft {
        CarEntryDraft {
            brand: brand.to_string(),
            model: model.to_string(),
            year: year.to_string(),
            power_kw: power.to_string(),
        }
    }

    fn record(brand: &str, model: &str, year: i32, power_kw: f64) -> CarRecord {
        CarRecord {
            brand: Some(brand.to_string()),
            model: model.to_string(),
            year: Some(year),
            power_kw,
        }
    }

    fn powers(list: &CarList) -> Vec<u32> {
        list.entries().iter().map(|e| e.power_hp).collect()
    }

    #[test]
    fn test_kw_to_hp_rounds() {
        assert_eq!(kw_to_hp(96.0), 129);
        assert_eq!(kw_to_hp(100.0), 134);
        assert_eq!(kw_to_hp(0.4), 1);
    }

    #[test]
    fn test_checked_hp_bounds() {
        assert_eq!(checked_hp(96.0), Some(129));
        assert_eq!(checked_hp(0.1), None);
        assert_eq!(checked_hp(-3.0), None);
        assert_eq!(checked_hp(f64::NAN), None);
        assert_eq!(checked_hp(1e10), None);
        assert!(checked_hp(3.0e9).is_some());
    }

    #[test]
    fn test_add_entry_computes_horsepower() {
        let mut list = CarList::new();
        let id = list.add_entry(&simple("Civic", "96"), &FieldSchema::SIMPLE).unwrap();
        let entry = list.get(id).unwrap();
        assert_eq!(entry.model, "Civic");
        assert_eq!(entry.power_hp, 129);
        assert_eq!(entry.power_kw, 96.0);
        assert_eq!(entry.brand, None);
    }

    #[test]
    fn test_add_entry_trims_input() {
        let mut list = CarList::new();
        let id = list
            .add_entry(&full("  Skoda ", " Octavia ", " 2019 ", " 110 "), &FieldSchema::FULL)
            .unwrap();
        let entry = list.get(id).unwrap();
        assert_eq!(entry.brand.as_deref(), Some("Skoda"));
        assert_eq!(entry.model, "Octavia");
        assert_eq!(entry.year, Some(2019));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut list = CarList::new();
        let err = list
            .add_entry(&simple("", "50"), &FieldSchema::SIMPLE)
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingFields(vec![Field::Name]));
        assert_eq!(err.to_string(), "name required");
        assert!(list.is_empty());
    }

    #[test]
    fn test_full_schema_reports_all_missing_fields() {
        let mut list = CarList::new();
        let err = list
            .add_entry(&full("", "Golf", "  ", "85"), &FieldSchema::FULL)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingFields(vec![Field::Brand, Field::Year])
        );
        assert!(list.is_empty());
    }

    #[test]
    fn test_invalid_power_is_distinct_from_missing() {
        let schema = FieldSchema::SIMPLE;
        let mut list = CarList::new();
        for bad in ["abc", "-5", "0", "NaN", "inf", "0.1", "1e10", "1e30"] {
            let err = list.add_entry(&simple("Fiat", bad), &schema).unwrap_err();
            assert_eq!(err, ValidationError::InvalidPower(bad.to_string()));
        }
        let err = list.add_entry(&simple("Fiat", "  "), &schema).unwrap_err();
        assert!(err.is_missing_field());
        assert!(list.is_empty());
    }

    #[test]
    fn test_year_outside_range_is_rejected() {
        let mut list = CarList::new();
        let err = list
            .add_entry(&full("Ford", "T", "1908", "15"), &FieldSchema::FULL)
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidYear("1908".to_string()));
    }

    #[test]
    fn test_remove_entry_and_absent_id_noop() {
        let mut list = CarList::new();
        let a = list.add_entry(&simple("A", "10"), &FieldSchema::SIMPLE).unwrap();
        let b = list.add_entry(&simple("B", "20"), &FieldSchema::SIMPLE).unwrap();

        list.remove_entry(a);
        assert_eq!(list.len(), 1);
        assert_eq!(list.entries()[0].id, b);

        list.remove_entry(a);
        list.remove_entry(CarId(999));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut list = CarList::new();
        let a = list.add_entry(&simple("A", "10"), &FieldSchema::SIMPLE).unwrap();
        list.remove_entry(a);
        let b = list.add_entry(&simple("B", "10"), &FieldSchema::SIMPLE).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_bulk_load_appends_and_keeps_existing() {
        let mut list = CarList::new();
        list.add_entry(&simple("Existing", "50"), &FieldSchema::SIMPLE).unwrap();
        let added = list.bulk_load(&[
            record("Audi", "A4", 2018, 110.0),
            record("BMW", "320d", 2020, 140.0),
        ]);
        assert_eq!(added, 2);
        assert_eq!(list.len(), 3);
        assert_eq!(list.entries()[0].model, "Existing");
        assert_eq!(list.entries()[2].power_hp, kw_to_hp(140.0));
    }

    #[test]
    fn test_bulk_load_skips_powers_without_horsepower() {
        let mut list = CarList::new();
        let added = list.bulk_load(&[
            record("Tiny", "t", 2000, 0.1),
            record("Fiat", "Panda", 2012, 51.0),
            record("Huge", "h", 2020, 1e30),
        ]);
        assert_eq!(added, 1);
        assert_eq!(list.len(), 1);
        assert_eq!(list.entries()[0].power_hp, 68);
    }

    #[test]
    fn test_large_powers_keep_distinct_order() {
        let mut list = CarList::new();
        list.add_entry(&simple("small", "1000000"), &FieldSchema::SIMPLE).unwrap();
        list.add_entry(&simple("big", "3000000000"), &FieldSchema::SIMPLE).unwrap();
        assert!(list.add_entry(&simple("huge", "1e30"), &FieldSchema::SIMPLE).is_err());
        list.sort(SortCriterion::Power, SortDirection::Descending);
        let models: Vec<&str> = list.entries().iter().map(|e| e.model.as_str()).collect();
        assert_eq!(models, vec!["big", "small"]);
        assert!(list.entries()[0].power_hp > list.entries()[1].power_hp);
    }

    #[test]
    fn test_sort_power_descending() {
        let mut list = CarList::new();
        list.bulk_load(&[
            record("A", "a", 2000, 100.0 / KW_TO_HP),
            record("B", "b", 2001, 150.0 / KW_TO_HP),
            record("C", "c", 2002, 120.0 / KW_TO_HP),
        ]);
        list.sort(SortCriterion::Power, SortDirection::Descending);
        assert_eq!(powers(&list), vec![150, 120, 100]);
    }

    #[test]
    fn test_sort_round_trip_reverses_without_ties() {
        let mut list = CarList::new();
        list.bulk_load(&[
            record("Opel", "Astra", 2010, 70.0),
            record("audi", "A3", 2015, 90.0),
            record("BMW", "M3", 2005, 250.0),
        ]);
        list.sort(SortCriterion::Brand, SortDirection::Ascending);
        let ascending: Vec<CarId> = list.entries().iter().map(|e| e.id).collect();
        list.sort(SortCriterion::Brand, SortDirection::Descending);
        let mut descending: Vec<CarId> = list.entries().iter().map(|e| e.id).collect();
        descending.reverse();
        assert_eq!(ascending, descending);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut list = CarList::new();
        list.bulk_load(&[
            record("X", "first", 2010, 100.0),
            record("Y", "second", 2000, 100.0),
            record("Z", "third", 2020, 100.0),
        ]);
        list.sort(SortCriterion::Power, SortDirection::Descending);
        let models: Vec<&str> = list.entries().iter().map(|e| e.model.as_str()).collect();
        assert_eq!(models, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_active_sort_applies_to_new_entries() {
        let mut list = CarList::new();
        list.sort(SortCriterion::Year, SortDirection::Ascending);
        list.add_entry(&full("Fiat", "Panda", "2012", "51"), &FieldSchema::FULL).unwrap();
        list.add_entry(&full("Fiat", "126p", "1975", "17"), &FieldSchema::FULL).unwrap();
        let years: Vec<Option<i32>> = list.entries().iter().map(|e| e.year).collect();
        assert_eq!(years, vec![Some(1975), Some(2012)]);
    }

    #[test]
    fn test_no_active_sort_keeps_insertion_order() {
        let mut list = CarList::new();
        list.bulk_load(&[record("B", "b", 2000, 50.0), record("A", "a", 1999, 40.0)]);
        list.set_sort(None);
        let models: Vec<&str> = list.entries().iter().map(|e| e.model.as_str()).collect();
        assert_eq!(models, vec!["b", "a"]);
    }

    #[test]
    fn test_missing_year_sorts_first_ascending() {
        let mut list = CarList::new();
        list.bulk_load(&[
            record("A", "a", 2000, 50.0),
            CarRecord {
                brand: None,
                model: "nameless".to_string(),
                year: None,
                power_kw: 30.0,
            },
        ]);
        list.sort(SortCriterion::Year, SortDirection::Ascending);
        assert_eq!(list.entries()[0].model, "nameless");
    }

    #[test]
    fn test_locale_compare_ignores_case_and_accents_first() {
        assert_eq!(locale_compare("audi", "BMW"), Ordering::Less);
        assert_eq!(locale_compare("Łada", "Mazda"), Ordering::Less);
        assert_eq!(locale_compare("Ąb", "Ac"), Ordering::Less);
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_year_options_newest_first() {
        let years = year_options(&FieldSchema::FULL);
        assert_eq!(years.first(), Some(&2024));
        assert_eq!(years.last(), Some(&1950));
        assert_eq!(years.len(), 75);
    }
}
