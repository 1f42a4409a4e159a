use crate::config::Config;
use crate::db::{SavedSelection, SelectionStore};
use crate::models::{australian_suburbs, ResolvedLocation, Salon, Suburb};
use crate::ranker::{find_nearest, Located, RankedResult};
use crate::search::search_salons;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{error, info};

/// Sent when nothing nearby turned up, so the user can ask a person instead.
pub const WHATSAPP_INQUIRY_URL: &str =
    "https://wa.me/?text=Hi,%20I%20would%20like%20to%20know%20if%20you%20offer%20services%20in%20my%20area.";

#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub enum ViewMode {
    #[default]
    Nearby,
    Suburbs,
    Search,
}

impl ViewMode {
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "suburbs" => ViewMode::Suburbs,
            "search" => ViewMode::Search,
            _ => ViewMode::Nearby,
        }
    }
}

/// Where the IP lookup stands.
#[derive(Debug, Clone, PartialEq)]
pub enum NearbyState {
    Resolving,
    /// The user couldn't be placed at all.
    Unresolved,
    Resolved {
        location: ResolvedLocation,
        nearest: Option<RankedResult<Salon>>,
    },
}

/// Outcome of picking a suburb from the list.
#[derive(Debug, Clone, PartialEq)]
pub struct SuburbOutcome {
    pub suburb: Suburb,
    pub nearest: Option<RankedResult<Salon>>,
    /// Whether the hit made it into the selection store.
    pub saved: bool,
}

pub struct App {
    pub config: Config,
    pub view_mode: ViewMode,
    pub salons: Vec<Salon>,
    pub dataset_available: bool,
    pub nearby: NearbyState,

    pub suburbs: Vec<Suburb>,
    pub suburb_index: usize,
    pub suburb_outcome: Option<SuburbOutcome>,

    pub search_query: String,
    pub search_index: usize,

    pub saved: Option<SavedSelection>,
    pub status_message: Option<String>,
    pub tick_count: usize,
    pub should_quit: bool,

    store: Option<SelectionStore>,
}

impl App {
    /// `salons` is `None` when the dataset couldn't be loaded; every lookup
    /// then reports "not found" rather than an error.
    pub fn new(config: Config, salons: Option<Vec<Salon>>, store: Option<SelectionStore>) -> Self {
        let saved = store.as_ref().and_then(|s| match s.load() {
            Ok(saved) => saved,
            Err(e) => {
                error!("Could not read saved selection: {}", e);
                None
            }
        });

        Self {
            view_mode: ViewMode::from_name(&config.ui.default_view),
            config,
            dataset_available: salons.is_some(),
            salons: salons.unwrap_or_default(),
            nearby: NearbyState::Resolving,
            suburbs: australian_suburbs(),
            suburb_index: 0,
            suburb_outcome: None,
            search_query: String::new(),
            search_index: 0,
            saved,
            status_message: None,
            tick_count: 0,
            should_quit: false,
            store,
        }
    }

    pub fn on_tick(&mut self) {
        self.tick_count += 1;
    }

    /// Ranks the dataset against the resolved location. Nothing is saved
    /// automatically; the user confirms with Enter.
    pub fn on_location_resolved(&mut self, location: Option<ResolvedLocation>) {
        self.nearby = match location {
            Some(location) => {
                let nearest = find_nearest(
                    location.coordinate(),
                    &self.salons,
                    self.config.search.nearby_radius_km,
                );
                info!(
                    found = nearest.is_some(),
                    place = %location.label(),
                    "Ranked branches against resolved location"
                );
                NearbyState::Resolved { location, nearest }
            }
            None => NearbyState::Unresolved,
        };
    }

    pub fn search_results(&self) -> Vec<&Salon> {
        search_salons(&self.search_query, &self.salons)
    }

    pub fn search_selected_suburb(&mut self) {
        let Some(suburb) = self.suburbs.get(self.suburb_index).cloned() else {
            return;
        };
        let nearest = find_nearest(
            suburb.coordinate(),
            &self.salons,
            Some(self.config.search.suburb_radius_km),
        );
        let saved = match nearest {
            Some(ref hit) => {
                let (salon, distance) = (hit.candidate.clone(), hit.distance_km);
                self.save_selection(&salon, Some(distance), Some(&suburb))
            }
            None => false,
        };
        self.suburb_outcome = Some(SuburbOutcome { suburb, nearest, saved });
    }

    /// Returns whether the selection was stored.
    fn save_selection(&mut self, salon: &Salon, distance_km: Option<u32>, suburb: Option<&Suburb>) -> bool {
        let Some(store) = self.store.as_ref() else {
            self.status_message = Some("Selection not saved (no store)".to_string());
            return false;
        };
        match store.save(salon, distance_km, suburb) {
            Ok(saved) => {
                self.status_message = Some("Location saved for checkout".to_string());
                self.saved = Some(saved);
                true
            }
            Err(e) => {
                error!("Failed to save selection: {}", e);
                self.status_message = Some("Could not save selection".to_string());
                false
            }
        }
    }

    pub fn clear_selection(&mut self) {
        if let Some(store) = self.store.as_ref() {
            if let Err(e) = store.clear() {
                error!("Failed to clear selection: {}", e);
            }
        }
        self.saved = None;
        self.status_message = Some("Selection cleared".to_string());
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // The search box swallows printable keys.
        if self.view_mode == ViewMode::Search {
            self.handle_search_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.view_mode = ViewMode::Nearby,
            KeyCode::Char('2') => self.view_mode = ViewMode::Suburbs,
            KeyCode::Char('3') => self.view_mode = ViewMode::Search,
            KeyCode::Char('c') => self.clear_selection(),
            KeyCode::Down | KeyCode::Char('j') if self.view_mode == ViewMode::Suburbs => {
                if !self.suburbs.is_empty() {
                    self.suburb_index = (self.suburb_index + 1) % self.suburbs.len();
                }
            }
            KeyCode::Up | KeyCode::Char('k') if self.view_mode == ViewMode::Suburbs => {
                if !self.suburbs.is_empty() {
                    self.suburb_index = self
                        .suburb_index
                        .checked_sub(1)
                        .unwrap_or(self.suburbs.len() - 1);
                }
            }
            KeyCode::Enter => match self.view_mode {
                ViewMode::Suburbs => self.search_selected_suburb(),
                ViewMode::Nearby => {
                    if let NearbyState::Resolved { nearest: Some(hit), .. } = &self.nearby {
                        let (salon, distance) = (hit.candidate.clone(), hit.distance_km);
                        self.save_selection(&salon, Some(distance), None);
                    }
                }
                ViewMode::Search => {}
            },
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.view_mode = ViewMode::Nearby,
            KeyCode::Tab => self.view_mode = ViewMode::Suburbs,
            KeyCode::Backspace => {
                self.search_query.pop();
                self.search_index = 0;
            }
            KeyCode::Down => {
                let count = self.search_results().len();
                if count > 0 {
                    self.search_index = (self.search_index + 1) % count;
                }
            }
            KeyCode::Up => {
                let count = self.search_results().len();
                if count > 0 {
                    self.search_index = self.search_index.checked_sub(1).unwrap_or(count - 1);
                }
            }
            KeyCode::Enter => {
                let picked = self.search_results().get(self.search_index).map(|s| (*s).clone());
                if let Some(salon) = picked {
                    self.save_selection(&salon, None, None);
                    self.search_query.clear();
                    self.search_index = 0;
                }
            }
            KeyCode::Char(c) => {
                self.search_query.push(c);
                self.search_index = 0;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;
    use serde_json::json;

    fn salons() -> Vec<Salon> {
        serde_json::from_value(json!([
            {"id": 1, "name": "Parra", "address": "Church St", "suburb": "Parramatta",
             "state": "NSW", "postcode": "2150", "lat": -33.8121, "lon": 151.0049},
            {"id": 2, "name": "Collins", "address": "Collins St", "suburb": "Melbourne",
             "state": "VIC", "postcode": "3000", "lat": -37.8136, "lon": 144.9631}
        ]))
        .unwrap()
    }

    fn app() -> App {
        let store = SelectionStore::open_in_memory().unwrap();
        App::new(Config::default(), Some(salons()), Some(store))
    }

    fn press(app: &mut App, code: KeyCode) {
        let mut key = KeyEvent::new(code, KeyModifiers::NONE);
        key.kind = KeyEventKind::Press;
        app.handle_key(key);
    }

    fn sydney() -> ResolvedLocation {
        ResolvedLocation {
            latitude: -33.8688,
            longitude: 151.2093,
            city: Some("Sydney".into()),
            region: None,
            country: None,
        }
    }

    #[test]
    fn resolved_location_ranks_dataset() {
        let mut app = app();
        app.on_location_resolved(Some(sydney()));
        match &app.nearby {
            NearbyState::Resolved { nearest: Some(hit), .. } => {
                assert_eq!(hit.candidate.id().as_deref(), Some("1"))
            }
            other => panic!("unexpected state {other:?}"),
        }
        assert!(app.saved.is_none(), "nothing is saved until the user confirms");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.saved.as_ref().and_then(|s| s.salon.id()).as_deref(), Some("1"));
    }

    #[test]
    fn failed_lookup_is_unresolved_not_an_error() {
        let mut app = app();
        app.on_location_resolved(None);
        assert_eq!(app.nearby, NearbyState::Unresolved);
    }

    #[test]
    fn suburb_pick_applies_radius_and_saves_hit() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));

        let darwin = app.suburbs.iter().position(|s| s.name == "Darwin").unwrap();
        app.suburb_index = darwin;
        press(&mut app, KeyCode::Enter);
        let outcome = app.suburb_outcome.clone().unwrap();
        assert!(outcome.nearest.is_none(), "Darwin is far beyond 200 km");
        assert!(!outcome.saved);
        assert!(app.saved.is_none());

        let penrith = app.suburbs.iter().position(|s| s.name == "Penrith").unwrap();
        app.suburb_index = penrith;
        press(&mut app, KeyCode::Enter);
        let outcome = app.suburb_outcome.clone().unwrap();
        assert!(outcome.saved);
        assert_eq!(outcome.nearest.and_then(|n| n.candidate.id()).as_deref(), Some("1"));
        let saved = app.saved.as_ref().unwrap();
        assert_eq!(saved.suburb.as_ref().map(|s| s.name.as_str()), Some("Penrith"));
    }

    #[test]
    fn suburb_hit_without_a_store_is_not_marked_saved() {
        let mut app = App::new(Config::default(), Some(salons()), None);
        press(&mut app, KeyCode::Char('2'));
        app.suburb_index = app.suburbs.iter().position(|s| s.name == "Penrith").unwrap();
        press(&mut app, KeyCode::Enter);

        let outcome = app.suburb_outcome.clone().unwrap();
        assert!(outcome.nearest.is_some());
        assert!(!outcome.saved);
        assert!(app.saved.is_none());
        assert_eq!(app.status_message.as_deref(), Some("Selection not saved (no store)"));
    }

    #[test]
    fn search_view_types_and_selects() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        for c in "collins".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.search_results().len(), 1);

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.saved.as_ref().and_then(|s| s.salon.id()).as_deref(), Some("2"));
        assert!(app.search_query.is_empty());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view_mode, ViewMode::Nearby);
        press(&mut app, KeyCode::Char('c'));
        assert!(app.saved.is_none());
    }

    #[test]
    fn missing_dataset_degrades_to_not_found() {
        let mut app = App::new(Config::default(), None, None);
        app.on_location_resolved(Some(sydney()));
        assert!(matches!(app.nearby, NearbyState::Resolved { nearest: None, .. }));
        assert!(!app.dataset_available);
    }

    #[test]
    fn default_view_comes_from_config() {
        let mut config = Config::default();
        config.ui.default_view = "Search".to_string();
        let app = App::new(config, Some(salons()), None);
        assert_eq!(app.view_mode, ViewMode::Search);
    }
}
