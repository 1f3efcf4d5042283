use anyhow::Result;
use owo_colors::OwoColorize;

use super::{Context, create_spinner};
use crate::render::render_event_list;

pub async fn run(ctx: &Context) -> Result<()> {
    let user = ctx.require_user()?;

    let spinner = create_spinner("Cargando tus eventos...".to_string());
    let result = ctx.api.my_events().await;
    spinner.finish_and_clear();

    let events = result?;
    if events.is_empty() {
        println!("{}", "Todavía no organizas ningún evento.".dimmed());
        println!("  eventual create --help");
        return Ok(());
    }

    println!(
        "{}",
        format!("Eventos organizados por {} ({})", user.display_name(), events.len()).bold()
    );
    println!();
    render_event_list(&events);
    println!();
    println!(
        "{}",
        "Usa `eventual edit <id>` o `eventual delete <id>` para gestionarlos.".dimmed()
    );

    Ok(())
}
