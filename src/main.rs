use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Arg, Command};

use clientele::auth::session::SessionStore;
use clientele::auth::store::FileStorage;
use clientele::ui::App;
use clientele::utils::logging::initialize_logging;
use clientele::utils::time::SystemClock;
use clientele::HttpApiClient;

fn main() {
    let matches = Command::new("clientele")
        .about("Terminal client for the customer-management service")
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Base URL of the backend API")
                .value_name("URL")
                .default_value("http://localhost:8000"),
        )
        .arg(
            Arg::new("session-file")
                .long("session-file")
                .help("Where the persisted session state lives")
                .value_name("PATH")
                .default_value("session.json"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Application log file")
                .value_name("PATH")
                .default_value("clientele.log"),
        )
        .get_matches();

    let api_url = matches.get_one::<String>("api-url").unwrap();
    let session_file = PathBuf::from(matches.get_one::<String>("session-file").unwrap());
    let log_file = PathBuf::from(matches.get_one::<String>("log-file").unwrap());

    if let Err(e) = initialize_logging(&log_file) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    let client = match HttpApiClient::new(api_url) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to set up the API client: {}", e);
            process::exit(1);
        }
    };

    let clock = Arc::new(SystemClock);
    let store = SessionStore::new(Box::new(FileStorage::open(&session_file)), clock.clone());

    App::new(Box::new(client), store, clock).run();
}
