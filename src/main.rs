use iced::widget::{button, column, container, row, scrollable, text, text_input, Column};
use iced::{Element, Length, Task, Theme};
use std::sync::Arc;
use tracing::{debug, error};
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod error;
mod lookup;
mod state;
mod ui;

use config::Settings;
use lookup::{resolve_image, ImageOutcome, OpenFoodFacts};
use state::library::{load_dataset, FoodStore, Readiness};
use state::session::{search_foods, SearchOutcome, SearchSession, NOT_LOADED_NOTICE, NO_RESULTS_NOTICE};

/// What the results area currently holds
#[derive(Debug)]
enum Results {
    /// Nothing searched yet
    Empty,
    Notice(&'static str),
    Foods(SearchSession),
}

/// Main application state
struct FoodLookup {
    settings: Settings,
    /// Product service used for pictures
    lookup: Arc<OpenFoodFacts>,
    /// Set once by the startup load
    readiness: Readiness,
    /// Current contents of the search box
    query: String,
    results: Results,
    /// Bumped on every search; picture results from older searches are dropped
    generation: u64,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User edited the search box
    QueryChanged(String),
    /// User pressed Enter or clicked "Search"
    Search,
    /// Background dataset load finished
    DatasetLoaded(Result<FoodStore, String>),
    /// A picture lookup for the given search finished
    ImageResolved {
        generation: u64,
        index: usize,
        outcome: ImageOutcome,
    },
}

impl FoodLookup {
    /// Create the application and start loading the dataset in the background
    fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let app = FoodLookup::with_settings(settings);

        let dataset_path = app.settings.dataset_path.clone();
        let load = Task::perform(load_dataset(dataset_path), |result| {
            Message::DatasetLoaded(result.map_err(|e| e.to_string()))
        });

        (app, load)
    }

    fn with_settings(settings: Settings) -> Self {
        let lookup = Arc::new(OpenFoodFacts::new(&settings));

        FoodLookup {
            settings,
            lookup,
            readiness: Readiness::Loading,
            query: String::new(),
            results: Results::Empty,
            generation: 0,
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::QueryChanged(query) => {
                self.query = query;
                Task::none()
            }
            Message::Search => self.search(),
            Message::DatasetLoaded(Ok(store)) => {
                self.readiness = Readiness::Ready(store);
                Task::none()
            }
            Message::DatasetLoaded(Err(e)) => {
                error!(
                    "❌ Failed to load dataset from {}: {e}",
                    self.settings.dataset_path.display()
                );
                self.readiness = Readiness::Failed;
                Task::none()
            }
            Message::ImageResolved {
                generation,
                index,
                outcome,
            } => {
                let Results::Foods(session) = &mut self.results else {
                    debug!("Dropping picture for search #{generation}, results were cleared");
                    return Task::none();
                };

                if let ImageOutcome::Resolved(image) = &outcome {
                    debug!("🖼️  Picture for result {index} from {}", image.url);
                }

                if !session.settle(generation, index, outcome) {
                    debug!("Dropping stale picture for search #{generation}, result {index}");
                    return Task::none();
                }

                self.next_image()
            }
        }
    }

    /// Replace the results area with the outcome of the current query
    fn search(&mut self) -> Task<Message> {
        let query = self.query.trim().to_string();
        self.generation += 1;

        self.results = match search_foods(&self.readiness, &query) {
            SearchOutcome::NotLoaded => Results::Notice(NOT_LOADED_NOTICE),
            SearchOutcome::NoResults => Results::Notice(NO_RESULTS_NOTICE),
            SearchOutcome::Found(foods) => Results::Foods(SearchSession::new(self.generation, foods)),
        };

        self.next_image()
    }

    /// Start the next picture lookup of the current search, if any is left
    fn next_image(&mut self) -> Task<Message> {
        let Results::Foods(session) = &mut self.results else {
            return Task::none();
        };

        let generation = session.generation();
        let Some((index, barcode)) = session.next_lookup() else {
            if session.is_complete() {
                debug!("All pictures settled for search #{generation}");
            }
            return Task::none();
        };

        let lookup = Arc::clone(&self.lookup);
        let thumbnail_size = self.settings.thumbnail_size;

        Task::perform(
            async move { resolve_image(&*lookup, &barcode, thumbnail_size).await },
            move |outcome| Message::ImageResolved {
                generation,
                index,
                outcome,
            },
        )
    }

    /// Status line under the search bar
    fn status(&self) -> String {
        match &self.readiness {
            Readiness::Loading => "Loading database...".to_string(),
            Readiness::Ready(store) => format!("Ready. {} foods in dataset.", store.row_count()),
            Readiness::Failed => NOT_LOADED_NOTICE.to_string(),
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let search_bar = row![
            text_input("Search foods by name...", &self.query)
                .on_input(Message::QueryChanged)
                .on_submit(Message::Search)
                .padding(10),
            button("Search").on_press(Message::Search).padding(10),
        ]
        .spacing(10);

        let results: Element<Message> = match &self.results {
            Results::Empty => column![].into(),
            Results::Notice(notice) => text(*notice).size(18).into(),
            Results::Foods(session) => {
                Column::with_children(session.units().iter().map(ui::card::food_card))
                    .spacing(12)
                    .into()
            }
        };

        let content: Column<Message> = column![
            text("Food Lookup").size(40),
            search_bar,
            text(self.status()).size(14),
            scrollable(results).height(Length::Fill),
        ]
        .spacing(20)
        .padding(30);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("food_lookup=info")),
        )
        .init();

    iced::application("Food Lookup", FoodLookup::update, FoodLookup::view)
        .theme(FoodLookup::theme)
        .centered()
        .run_with(FoodLookup::new)
}
