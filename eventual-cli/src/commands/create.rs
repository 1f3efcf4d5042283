use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;

use eventual_core::event::EventForm;
use eventual_core::validate::validate;

use super::{Context, create_spinner};
use crate::render::render_event_detail;

pub async fn run(ctx: &Context, form: EventForm) -> Result<()> {
    ctx.require_user()?;

    // Validation blocks submission without contacting the backend
    let errors = validate(&form, Utc::now());
    if !errors.is_empty() {
        eprintln!("{}", "El formulario tiene errores:".red().bold());
        for (field, message) in &errors {
            eprintln!("  {} {}", format!("{}:", field).bold(), message.red());
        }
        anyhow::bail!("Evento no creado");
    }

    let spinner = create_spinner("Creando evento...".to_string());
    let result = ctx.api.create_event(&form).await;
    spinner.finish_and_clear();

    let event = result?;
    println!("{}", "¡Evento creado exitosamente!".green().bold());
    println!();
    println!("{}", render_event_detail(&event));
    println!();
    println!("{}", "Ya está visible para otros usuarios.".dimmed());

    Ok(())
}
