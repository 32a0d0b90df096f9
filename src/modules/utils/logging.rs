use env_logger::{Builder, WriteStyle};
use log::{info, warn, LevelFilter};
use std::fs::OpenOptions;
use std::path::Path;

/// Initialize the logging system, writing to the given log file
pub fn initialize_logging(log_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    // Create or append to the log file
    let file = OpenOptions::new().create(true).append(true).open(log_path)?;

    // Configure the logging system
    Builder::new()
        // Set default log level
        .filter_level(LevelFilter::Info)
        // Enable timestamps
        .format_timestamp_secs()
        // Enable module path in logs
        .format_module_path(true)
        .write_style(WriteStyle::Never)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();

    info!("Logging system initialized");
    Ok(())
}

/// Helper function to mask identifiers before they reach the log.
/// Counts characters, not bytes, so multibyte identifiers mask cleanly.
fn format_sensitive(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}

/// Structured logging for authentication events
pub fn log_auth_event(event_type: &str, subject: &str, success: bool, details: Option<&str>) {
    if success {
        info!(
            "Auth event: type={}, subject={}, success=true, details={:?}",
            event_type,
            format_sensitive(subject),
            details
        );
    } else {
        warn!(
            "Auth event: type={}, subject={}, success=false, details={:?}",
            event_type,
            format_sensitive(subject),
            details
        );
    }
}

/// Structured logging for navigation decisions
pub fn log_navigation(from: &str, to: &str, reason: &str) {
    info!("Navigation: from={}, to={}, reason={}", from, to, reason);
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;
    use std::fs::OpenOptions;
    use tempfile::NamedTempFile;

    #[test]
    fn test_sensitive_data_formatting() {
        assert_eq!(format_sensitive("password"), "pa***rd");
        assert_eq!(format_sensitive("key"), "***");
        assert_eq!(format_sensitive("longpassword"), "lo***rd");
        assert_eq!(format_sensitive(""), "");
    }

    #[test]
    fn test_sensitive_formatting_handles_multibyte() {
        // Email local parts can carry accented characters; masking must cut
        // on character boundaries, not byte offsets.
        assert_eq!(format_sensitive("héllo"), "hé***lo");
        assert_eq!(format_sensitive("ülrich"), "ül***ch");
        assert_eq!(format_sensitive("ééé"), "***");
    }

    #[test]
    fn test_auth_event_accepts_multibyte_subject() {
        log_auth_event("login", "héllo", true, None);
        log_auth_event("login", "héllo", false, Some("rejected"));
    }

    #[test]
    fn test_logging_initialization() {
        // Create temporary log file
        let log_file = NamedTempFile::new().unwrap();

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file.path())
            .unwrap();

        // Initialize logging
        let result = Builder::new()
            .filter_level(LevelFilter::Info)
            .format_timestamp_secs()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .try_init();

        // Verify initialization succeeded or logger was already initialized
        assert!(
            result.is_ok()
                || result
                    .unwrap_err()
                    .to_string()
                    .contains("already initialized")
        );
    }
}
