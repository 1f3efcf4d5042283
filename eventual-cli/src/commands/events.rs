use anyhow::Result;
use owo_colors::OwoColorize;

use eventual_client::EventDirectory;
use eventual_core::filter::FilterCriteria;

use super::{Context, create_spinner};
use crate::render::render_event_list;

pub async fn run(ctx: &Context, direccion: Option<&str>, criteria: FilterCriteria) -> Result<()> {
    let mut directory = EventDirectory::new();

    let spinner = create_spinner("Buscando eventos...".to_string());
    let result = match direccion {
        Some(address) => directory.search(&ctx.api, address).await,
        None => directory.load_all(&ctx.api).await,
    };
    spinner.finish_and_clear();

    if let Err(err) = result {
        // The list keeps whatever it had; the failure is a banner, not a crash
        eprintln!("{}", err.to_string().red());
        return Ok(());
    }

    directory.set_criteria(criteria);

    if let Some((lat, lon)) = directory.map_center() {
        println!(
            "{}",
            format!("Eventos cercanos a ({:.4}, {:.4})", lat, lon).dimmed()
        );
        println!();
    }

    if let Some(notice) = directory.notice() {
        println!("{}", notice.message().yellow());
        return Ok(());
    }

    let shown = directory.events().len();
    let total = directory.raw_len();
    if shown < total {
        println!(
            "{}",
            format!("Mostrando {} de {} eventos", shown, total).dimmed()
        );
        println!();
    }

    render_event_list(directory.events());
    Ok(())
}
