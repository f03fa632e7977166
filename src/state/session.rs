use std::cell::OnceCell;
use tracing::{error, info};

use super::data::{Barcode, FoodRecord};
use super::library::Readiness;
use crate::lookup::{ImageOutcome, ProductImage};

/// Shown instead of results while the dataset isn't ready
pub const NOT_LOADED_NOTICE: &str = "Database not loaded.";
/// Shown when a search matches nothing
pub const NO_RESULTS_NOTICE: &str = "No results found.";

/// What a search produced
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    NotLoaded,
    NoResults,
    Found(Vec<FoodRecord>),
}

/// Run one search against the dataset, if there is one.
///
/// A query error is logged and reported as no results.
pub fn search_foods(readiness: &Readiness, query: &str) -> SearchOutcome {
    let Some(store) = readiness.store() else {
        return SearchOutcome::NotLoaded;
    };

    match store.search(query) {
        Ok(foods) if foods.is_empty() => {
            info!("🔍 No foods match {query:?}");
            SearchOutcome::NoResults
        }
        Ok(foods) => {
            info!("🔍 {} foods match {query:?}", foods.len());
            SearchOutcome::Found(foods)
        }
        Err(e) => {
            error!("Search for {query:?} failed: {e}");
            SearchOutcome::NoResults
        }
    }
}

/// Image state of a display unit as seen by the UI
#[derive(Debug, Clone, Copy)]
pub enum ImageState<'a> {
    Pending,
    Resolved(&'a ProductImage),
    Unavailable,
}

/// Single-assignment cell for a display unit's picture
#[derive(Debug, Clone, Default)]
pub struct ImageSlot(OnceCell<ImageOutcome>);

impl ImageSlot {
    /// Record the outcome. Returns false if the slot was already settled.
    pub fn settle(&self, outcome: ImageOutcome) -> bool {
        self.0.set(outcome).is_ok()
    }

    pub fn state(&self) -> ImageState<'_> {
        match self.0.get() {
            None => ImageState::Pending,
            Some(ImageOutcome::Resolved(image)) => ImageState::Resolved(image),
            Some(ImageOutcome::Unavailable) => ImageState::Unavailable,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.0.get().is_none()
    }
}

/// One rendered search result
#[derive(Debug, Clone)]
pub struct DisplayUnit {
    record: FoodRecord,
    barcode: Barcode,
    image: ImageSlot,
}

impl DisplayUnit {
    pub fn new(record: FoodRecord) -> Self {
        let barcode = record.barcode();
        Self {
            record,
            barcode,
            image: ImageSlot::default(),
        }
    }

    pub fn record(&self) -> &FoodRecord {
        &self.record
    }

    pub fn barcode(&self) -> &Barcode {
        &self.barcode
    }

    pub fn image(&self) -> ImageState<'_> {
        self.image.state()
    }
}

/// The display units of one search and the progress of their pictures.
///
/// Pictures are resolved one at a time in result order: [`next_lookup`]
/// hands out at most one request until [`settle`] completes it.
///
/// [`next_lookup`]: SearchSession::next_lookup
/// [`settle`]: SearchSession::settle
#[derive(Debug, Clone)]
pub struct SearchSession {
    generation: u64,
    units: Vec<DisplayUnit>,
    cursor: usize,
    in_flight: Option<usize>,
}

impl SearchSession {
    pub fn new(generation: u64, records: Vec<FoodRecord>) -> Self {
        Self {
            generation,
            units: records.into_iter().map(DisplayUnit::new).collect(),
            cursor: 0,
            in_flight: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn units(&self) -> &[DisplayUnit] {
        &self.units
    }

    /// Next unit that needs a lookup request.
    ///
    /// Units with a barcode too short to look up are settled as unavailable
    /// on the way. Returns `None` while a request is in flight or once every
    /// unit is settled.
    pub fn next_lookup(&mut self) -> Option<(usize, Barcode)> {
        if self.in_flight.is_some() {
            return None;
        }

        while self.cursor < self.units.len() {
            let index = self.cursor;
            self.cursor += 1;

            let unit = &self.units[index];
            if unit.barcode.is_resolvable() {
                self.in_flight = Some(index);
                return Some((index, unit.barcode.clone()));
            }

            unit.image.settle(ImageOutcome::Unavailable);
        }

        None
    }

    /// Apply a finished lookup.
    ///
    /// Results from another generation, for a unit that isn't the one in
    /// flight, are dropped and return false.
    pub fn settle(&mut self, generation: u64, index: usize, outcome: ImageOutcome) -> bool {
        if generation != self.generation || self.in_flight != Some(index) {
            return false;
        }

        self.in_flight = None;
        self.units[index].image.settle(outcome)
    }

    /// Whether every unit has reached its final picture state
    pub fn is_complete(&self) -> bool {
        self.units.iter().all(|unit| !unit.image.is_pending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::library::tests::dataset_with;
    use crate::state::library::FoodStore;

    fn record(code: &str) -> FoodRecord {
        FoodRecord {
            code: Some(code.to_string()),
            product_name: Some(format!("Food {code}")),
            ..Default::default()
        }
    }

    #[test]
    fn test_slot_settles_exactly_once() {
        let slot = ImageSlot::default();
        assert!(matches!(slot.state(), ImageState::Pending));

        assert!(slot.settle(ImageOutcome::Unavailable));
        assert!(!slot.settle(ImageOutcome::Unavailable));
        assert!(matches!(slot.state(), ImageState::Unavailable));
    }

    #[test]
    fn test_search_before_load_runs_no_query() {
        assert_eq!(search_foods(&Readiness::Loading, "milk"), SearchOutcome::NotLoaded);
        assert_eq!(
            search_foods(&Readiness::Failed, "milk"),
            SearchOutcome::NotLoaded
        );
    }

    #[test]
    fn test_search_without_matches() {
        let (_dir, path) = dataset_with(&["Oat Milk"]);
        let readiness = Readiness::Ready(FoodStore::open(&path).unwrap());

        assert_eq!(search_foods(&readiness, "zzzzz"), SearchOutcome::NoResults);
    }

    #[test]
    fn test_search_with_matches() {
        let (_dir, path) = dataset_with(&["Oat Milk", "Rye Bread"]);
        let readiness = Readiness::Ready(FoodStore::open(&path).unwrap());

        match search_foods(&readiness, "bread") {
            SearchOutcome::Found(foods) => {
                assert_eq!(foods.len(), 1);
                assert_eq!(foods[0].product_name.as_deref(), Some("Rye Bread"));
            }
            other => panic!("expected matches, got {other:?}"),
        }
    }

    #[test]
    fn test_new_units_start_pending() {
        let session = SearchSession::new(1, vec![record("12345678"), record("42")]);

        assert!(session
            .units()
            .iter()
            .all(|unit| matches!(unit.image(), ImageState::Pending)));
        assert!(!session.is_complete());
    }

    #[test]
    fn test_lookups_are_issued_one_at_a_time_in_order() {
        let mut session = SearchSession::new(1, vec![record("11111111"), record("22222222")]);

        let (first, barcode) = session.next_lookup().unwrap();
        assert_eq!((first, barcode.as_str()), (0, "11111111"));
        assert!(session.next_lookup().is_none());

        assert!(session.settle(1, first, ImageOutcome::Unavailable));
        let (second, _) = session.next_lookup().unwrap();
        assert_eq!(second, 1);

        assert!(session.settle(1, second, ImageOutcome::Unavailable));
        assert!(session.next_lookup().is_none());
        assert!(session.is_complete());
    }

    #[test]
    fn test_short_barcodes_settle_without_lookup() {
        let mut session = SearchSession::new(1, vec![record("123"), record(""), record("87654321")]);

        let (index, _) = session.next_lookup().unwrap();

        assert_eq!(index, 2);
        assert!(matches!(session.units()[0].image(), ImageState::Unavailable));
        assert!(matches!(session.units()[1].image(), ImageState::Unavailable));
        assert!(matches!(session.units()[2].image(), ImageState::Pending));
    }

    #[test]
    fn test_session_of_short_barcodes_completes_immediately() {
        let mut session = SearchSession::new(1, vec![record("1"), record("22")]);

        assert!(session.next_lookup().is_none());
        assert!(session.is_complete());
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let mut session = SearchSession::new(2, vec![record("11111111")]);
        let (index, _) = session.next_lookup().unwrap();

        assert!(!session.settle(1, index, ImageOutcome::Unavailable));
        assert!(matches!(session.units()[0].image(), ImageState::Pending));

        assert!(session.settle(2, index, ImageOutcome::Unavailable));
    }

    #[test]
    fn test_result_for_unit_not_in_flight_is_discarded() {
        let mut session = SearchSession::new(1, vec![record("11111111"), record("22222222")]);
        session.next_lookup();

        assert!(!session.settle(1, 1, ImageOutcome::Unavailable));
        assert!(matches!(session.units()[1].image(), ImageState::Pending));
    }
}
