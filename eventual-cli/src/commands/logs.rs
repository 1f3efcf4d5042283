use std::path::PathBuf;

use anyhow::Result;
use owo_colors::OwoColorize;

use eventual_core::logs::LogQuery;

use super::{Context, create_spinner};
use crate::render::{Render, render_pagination, render_stats};

pub async fn run(ctx: &Context, query: LogQuery, export: Option<PathBuf>) -> Result<()> {
    ctx.require_user()?;

    if let Some(path) = export {
        let spinner = create_spinner("Exportando logs...".to_string());
        let result = ctx.api.export_logs(&query).await;
        spinner.finish_and_clear();

        std::fs::write(&path, result?)?;
        println!("{} {}", "Logs exportados a".green(), path.display());
        return Ok(());
    }

    let spinner = create_spinner("Cargando logs...".to_string());
    // Independent fetches; either may settle first and each fills its own
    // slice of the output
    let (logs, stats) = tokio::join!(ctx.api.get_logs(&query), ctx.api.get_log_stats());
    spinner.finish_and_clear();

    match stats {
        Ok(stats) => {
            render_stats(&stats);
            println!();
        }
        Err(err) => {
            eprintln!("{}", format!("Estadísticas no disponibles: {}", err).dimmed());
        }
    }

    let page = logs?;
    if page.logs.is_empty() {
        println!("{}", "No hay registros para esos filtros".dimmed());
        return Ok(());
    }

    for entry in &page.logs {
        println!("{}", entry.render());
    }

    if let Some(pagination) = &page.pagination {
        println!();
        render_pagination(pagination);
    }

    Ok(())
}
