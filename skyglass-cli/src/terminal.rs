use std::{
    io::{self, Write},
    time::Duration,
};

use skyglass_core::{DisplaySink, UnitPreference, WeatherSnapshot, WeatherView};

/// Prints session updates to the terminal.
#[derive(Debug, Default)]
pub struct TerminalDisplay {
    /// Print the recent-search list whenever it changes.
    show_recent: bool,
}

impl TerminalDisplay {
    pub fn new(show_recent: bool) -> Self {
        Self { show_recent }
    }
}

pub fn print_recent(cities: &[String]) {
    if cities.is_empty() {
        println!("No recent searches.");
        return;
    }

    println!("Recent searches:");
    for (i, city) in cities.iter().enumerate() {
        println!("  {}. {city}", i + 1);
    }
}

impl DisplaySink for TerminalDisplay {
    fn loading(&self, active: bool) {
        let mut err = io::stderr();
        if active {
            let _ = write!(err, "Loading…\r");
        } else {
            let _ = write!(err, "        \r");
        }
        let _ = err.flush();
    }

    fn weather(&self, snapshot: &WeatherSnapshot, unit: UnitPreference) {
        let view = WeatherView::render(snapshot, unit, chrono::Utc::now());

        println!();
        println!("{}  {}", view.icon.glyph(), view.place);
        println!("   {}", view.local_time);
        println!("   {}  {} (feels like {})", view.temperature, view.description, view.feels_like);
        println!(
            "   Humidity {}   Wind {}   Pressure {}",
            view.humidity, view.wind, view.pressure
        );
        println!();
    }

    fn error(&self, message: &str, _window: Duration) {
        // A terminal can't take a line back, so the display window is moot here.
        eprintln!("error: {message}");
    }

    fn clear_error(&self) {}

    fn recent_searches(&self, cities: &[String]) {
        if self.show_recent && !cities.is_empty() {
            println!("Recent: {}", cities.join(" · "));
        }
    }
}
