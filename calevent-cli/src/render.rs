//! TUI rendering traits for calevent types.
//!
//! Extension traits adding colored terminal rendering to calevent-core types
//! using owo_colors.

use calevent_core::CalendarEvent;
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for CalendarEvent {
    fn render(&self) -> String {
        let uid = match &self.uid {
            Some(uid) => uid.cyan().to_string(),
            None => "no uid".dimmed().to_string(),
        };

        let mut line = format!("{} {} {}", self.id.dimmed(), self.title, uid);

        if let Some(span) = self.time_span() {
            line.push_str(&format!(" {}", span.dimmed()));
        }

        if let Some(organizer) = render_organizer(self) {
            line.push_str(&format!(" {}", organizer));
        }
        if self.is_system_event {
            line.push_str(&format!(" {}", "(system)".yellow()));
        }

        line
    }
}

fn render_organizer(event: &CalendarEvent) -> Option<String> {
    let email = event.organizer_email()?;
    let name = event.organizer_display_name().unwrap_or(email);

    let linked = match event.organizer_user {
        Some(user) => format!(" [{}]", user).green().to_string(),
        None => String::new(),
    };

    Some(format!("organized by {} <{}>{}", name, email, linked))
}

/// Render a master followed by its instances, indented.
pub fn render_family(master: &CalendarEvent, instances: &[&CalendarEvent]) -> String {
    let mut lines = vec![format!("📅 {}", master.render())];
    lines.extend(instances.iter().map(|e| format!("   ↳ {}", e.render())));
    lines.join("\n")
}
