//! Terminal rendering for eventual types.
//!
//! Extension traits adding colored output with owo_colors, kept out of the
//! command bodies.

use chrono::Local;
use owo_colors::OwoColorize;

use eventual_core::event::Event;
use eventual_core::logs::{LogEntry, LogStats, Pagination};

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let time = self.timestamp.with_timezone(&Local).format("%H:%M");
        let categoria = format!("[{}]", self.categoria);
        format!(
            "{:>7} {} {} {}",
            time,
            self.nombre,
            categoria.dimmed(),
            render_precio(self.precio).cyan()
        )
    }
}

impl Render for LogEntry {
    fn render(&self) -> String {
        let when = self
            .timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S");
        let ip = self.ip_address.as_deref().unwrap_or("-");
        format!(
            "{} {} {} {}",
            when.to_string().dimmed(),
            self.usuario,
            format!("({})", self.provider).dimmed(),
            ip.dimmed()
        )
    }
}

pub fn render_precio(precio: f64) -> String {
    if precio <= 0.0 {
        "Gratis".to_string()
    } else {
        format!("{:.2}€", precio)
    }
}

/// Print events in their given order, labelling each new day. Order is
/// whatever the backend (or the filter pass) produced; we never re-sort.
pub fn render_event_list(events: &[Event]) {
    if events.is_empty() {
        println!("{}", "No hay eventos disponibles".dimmed());
        return;
    }

    let mut current_date: Option<String> = None;

    for event in events {
        let date_label = event
            .timestamp
            .with_timezone(&Local)
            .format("%a %-d %b %Y")
            .to_string();

        if current_date.as_ref() != Some(&date_label) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date_label.bold());
            current_date = Some(date_label);
        }

        println!("  {}  {}", event.render(), event.id.dimmed());
    }
}

/// Full detail view for a single event.
pub fn render_event_detail(event: &Event) -> String {
    let mut lines = Vec::new();

    lines.push(event.nombre.bold().to_string());
    lines.push(format!(
        "  {}  {}",
        "Fecha:".dimmed(),
        event
            .timestamp
            .with_timezone(&Local)
            .format("%A %-d de %B de %Y, %H:%M")
    ));
    lines.push(format!("  {}  {}", "Lugar:".dimmed(), event.lugar));
    lines.push(format!(
        "  {}  {:.4}, {:.4}",
        "Coordenadas:".dimmed(),
        event.lat,
        event.lon
    ));
    lines.push(format!("  {}  {}", "Categoría:".dimmed(), event.categoria));
    lines.push(format!(
        "  {}  {}",
        "Precio:".dimmed(),
        render_precio(event.precio)
    ));
    if let Some(capacidad) = event.capacidad {
        lines.push(format!("  {}  {} personas", "Capacidad:".dimmed(), capacidad));
    }
    lines.push(format!("  {}  {}", "Organizador:".dimmed(), event.organizador));
    if let Some(descripcion) = &event.descripcion {
        lines.push(String::new());
        lines.push(format!("  {}", descripcion));
    }
    if let Some(imagen) = &event.imagen {
        lines.push(format!("  {}  {}", "Imagen:".dimmed(), imagen));
    }

    lines.join("\n")
}

pub fn render_stats(stats: &LogStats) {
    println!("{}", "Estadísticas".bold());
    println!("  {} {}", "Total de accesos:".dimmed(), stats.total);
    println!("  {} {}", "Usuarios únicos:".dimmed(), stats.unique_users);
    println!("  {} {}", "Última semana:".dimmed(), stats.logs_last_week);
    if let Some(breakdown) = &stats.breakdown {
        for (provider, count) in &breakdown.by_provider {
            println!("  {} {}", format!("{}:", provider).dimmed(), count);
        }
    }
}

pub fn render_pagination(pagination: &Pagination) {
    println!(
        "{}",
        format!(
            "Página {} de {} ({} registros)",
            pagination.page, pagination.pages, pagination.total
        )
        .dimmed()
    );
}
