use anyhow::Result;
use owo_colors::OwoColorize;

use super::{Context, create_spinner};
use crate::render::render_event_detail;

pub async fn run(ctx: &Context, id: &str) -> Result<()> {
    let spinner = create_spinner("Cargando evento...".to_string());
    let result = ctx.api.get_event(id).await;
    spinner.finish_and_clear();

    let event = result?;
    println!("{}", render_event_detail(&event));

    // Edit/delete affordances only for the organizer
    let session = ctx.store.snapshot();
    if let Some(user) = &session.user {
        if session.is_authenticated() && event.is_owned_by(&user.email) {
            println!();
            println!("{}", "Este evento es tuyo:".dimmed());
            println!("  eventual edit {}", event.id);
            println!("  eventual delete {}", event.id);
        }
    }

    Ok(())
}
