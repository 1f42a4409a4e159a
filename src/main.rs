use color_eyre::Result;
use ratatui::{backend::CrosstermBackend, Terminal};
use salon_finder::{
    app::App,
    config::Config,
    dataset,
    db::SelectionStore,
    events::{Event, EventHandler},
    logging, ui, LocationResolver,
};
use std::{io, path::Path};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // Instrumentation and safety
    let _log_guard = logging::initialize_logging(Path::new("logs"));
    color_eyre::install()?;
    install_panic_hook();

    let config = Config::load();

    // A missing dataset or store only disables features; the UI still runs.
    let salons = match dataset::load_salons(Path::new(&config.search.dataset_path)) {
        Ok(salons) => Some(salons),
        Err(e) => {
            error!("Could not load salon dataset: {:?}", e);
            None
        }
    };
    let store = match SelectionStore::open(&config.store.db_path) {
        Ok(store) => Some(store),
        Err(e) => {
            error!("Could not open selection store: {:?}", e);
            None
        }
    };
    let resolver = LocationResolver::from_config(&config.resolver)?;

    // Ready terminal and state
    let mut terminal = setup_terminal()?;
    let mut app = App::new(config, salons, store);
    let mut event_handler = EventHandler::new(150);

    // One-shot location lookup; the result comes back as an event.
    let location_tx = event_handler.tx.clone();
    tokio::spawn(async move {
        let location = resolver.resolve_default().await;
        info!(resolved = location.is_some(), "Location lookup finished");
        let _ = location_tx.send(Event::LocationResolved(location));
    });

    // Main loop
    while !app.should_quit {
        terminal.draw(|f| ui::render(f, &app))?;

        match event_handler.next().await {
            Some(Event::Tick) => app.on_tick(),
            Some(Event::Input(key)) => app.handle_key(key),
            Some(Event::LocationResolved(location)) => app.on_location_resolved(location),
            Some(Event::InputClosed) | None => break,
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen, crossterm::cursor::Hide)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen, crossterm::cursor::Show)?;
    Ok(())
}

fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Force terminal cleanup!
        crossterm::terminal::disable_raw_mode().ok();
        crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen, crossterm::cursor::Show).ok();
        original_hook(panic_info);
    }));
}
