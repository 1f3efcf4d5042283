use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use eventual_core::error::EventualError;

use super::{Context, create_spinner};

pub async fn run(ctx: &Context, id: &str, yes: bool) -> Result<()> {
    let user = ctx.require_user()?;

    let spinner = create_spinner("Cargando evento...".to_string());
    let result = ctx.api.get_event(id).await;
    spinner.finish_and_clear();
    let event = result?;

    // Ownership gate; the backend re-enforces this on the DELETE
    if !event.is_owned_by(&user.email) {
        return Err(EventualError::Permission(
            "Solo el organizador puede eliminar este evento".to_string(),
        )
        .into());
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("¿Eliminar \"{}\"?", event.nombre))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelado.");
            return Ok(());
        }
    }

    let spinner = create_spinner("Eliminando evento...".to_string());
    let result = ctx.api.delete_event(id).await;
    spinner.finish_and_clear();
    result?;

    println!("{} {}", "Evento eliminado:".green(), event.nombre);
    Ok(())
}
