use jsdrop_api_client::{AlertId, AlertSink, AlertStyle};

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// ANSI escape for an alert background.
pub fn ansi_background(background: &str) -> &'static str {
    match background {
        "red" => "\x1b[41m",
        "green" => "\x1b[42m",
        _ => "\x1b[44m",
    }
}

/// One alert rendered as a coloured terminal line.
pub fn render_alert(message: &str, style: AlertStyle) -> String {
    format!(
        "{}\x1b[97m {} \x1b[0m",
        ansi_background(style.background),
        message
    )
}

/// Prints alerts to stdout.
pub struct TerminalSink;

impl AlertSink for TerminalSink {
    fn mount(&self, _id: AlertId, message: &str, style: AlertStyle) {
        println!("{}", render_alert(message, style));
    }

    fn fade_out(&self, _id: AlertId) {}

    fn detach(&self, _id: AlertId) {}
}
