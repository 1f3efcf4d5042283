mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;

use eventual_core::error::EventualError;
use eventual_core::event::Categoria;
use eventual_core::filter::FilterCriteria;
use eventual_core::logs::LogQuery;

use commands::Context;
use commands::auth::AuthAction;
use commands::edit::EventUpdates;

#[derive(Parser)]
#[command(name = "eventual")]
#[command(about = "Descubre y gestiona eventos de tu comunidad desde el terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse events, optionally near an address
    Events {
        /// Search events near this address (geocoded by the backend)
        #[arg(short, long)]
        direccion: Option<String>,

        /// Only events in this category
        #[arg(long)]
        categoria: Option<Categoria>,

        /// Only events on or after this date (YYYY-MM-DD)
        #[arg(long)]
        desde: Option<NaiveDate>,

        /// Only events on or before this date (YYYY-MM-DD)
        #[arg(long)]
        hasta: Option<NaiveDate>,

        /// Only events costing at most this much
        #[arg(long)]
        precio_max: Option<f64>,
    },
    /// Show one event in full
    Show { id: String },
    /// Create a new event
    Create {
        #[arg(long)]
        nombre: String,

        /// Date and time, e.g. "2026-09-20T19:00" (local) or RFC 3339
        #[arg(long)]
        fecha: String,

        #[arg(long)]
        lugar: String,

        #[arg(long)]
        descripcion: Option<String>,

        #[arg(long, default_value = "otro")]
        categoria: Categoria,

        #[arg(long)]
        precio: Option<f64>,

        #[arg(long)]
        capacidad: Option<u32>,

        /// Path to a poster image (max 5MB)
        #[arg(long)]
        imagen: Option<PathBuf>,
    },
    /// Edit one of your events
    Edit {
        id: String,

        #[arg(long)]
        nombre: Option<String>,

        #[arg(long)]
        fecha: Option<String>,

        #[arg(long)]
        lugar: Option<String>,

        #[arg(long)]
        descripcion: Option<String>,

        #[arg(long)]
        categoria: Option<Categoria>,

        #[arg(long)]
        precio: Option<f64>,

        #[arg(long)]
        capacidad: Option<u32>,

        #[arg(long)]
        imagen: Option<PathBuf>,
    },
    /// Delete one of your events
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// List the events you organize
    Mine,
    /// Authentication log viewer
    Logs {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 50)]
        limit: u32,

        /// Filter by user email
        #[arg(long)]
        usuario: Option<String>,

        /// Filter by OAuth provider
        #[arg(long)]
        provider: Option<String>,

        #[arg(long)]
        login_type: Option<String>,

        /// Logs from this date (YYYY-MM-DD)
        #[arg(long)]
        desde: Option<NaiveDate>,

        /// Logs until this date (YYYY-MM-DD)
        #[arg(long)]
        hasta: Option<NaiveDate>,

        /// Write the CSV export to this path instead of listing
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Session management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Events {
            direccion,
            categoria,
            desde,
            hasta,
            precio_max,
        } => {
            let ctx = Context::build("/").await?;
            let criteria = FilterCriteria {
                categoria,
                fecha_inicio: desde,
                fecha_fin: hasta,
                precio_max,
            };
            commands::events::run(&ctx, direccion.as_deref(), criteria).await
        }
        Commands::Show { id } => {
            let ctx = Context::build("/event").await?;
            commands::show::run(&ctx, &id).await
        }
        Commands::Create {
            nombre,
            fecha,
            lugar,
            descripcion,
            categoria,
            precio,
            capacidad,
            imagen,
        } => {
            let ctx = Context::build("/create").await?;
            let form = commands::build_form(
                nombre,
                &fecha,
                lugar,
                descripcion,
                categoria,
                precio,
                capacidad,
                imagen,
            )?;
            commands::create::run(&ctx, form).await
        }
        Commands::Edit {
            id,
            nombre,
            fecha,
            lugar,
            descripcion,
            categoria,
            precio,
            capacidad,
            imagen,
        } => {
            let ctx = Context::build("/edit").await?;
            let updates = EventUpdates {
                nombre,
                fecha,
                lugar,
                descripcion,
                categoria,
                precio,
                capacidad,
                imagen,
            };
            commands::edit::run(&ctx, &id, updates).await
        }
        Commands::Delete { id, yes } => {
            let ctx = Context::build("/my-events").await?;
            commands::delete::run(&ctx, &id, yes).await
        }
        Commands::Mine => {
            let ctx = Context::build("/my-events").await?;
            commands::mine::run(&ctx).await
        }
        Commands::Logs {
            page,
            limit,
            usuario,
            provider,
            login_type,
            desde,
            hasta,
            export,
        } => {
            let ctx = Context::build("/logs").await?;
            let query = LogQuery {
                page,
                limit,
                usuario,
                provider,
                login_type,
                start_date: desde,
                end_date: hasta,
            };
            commands::logs::run(&ctx, query, export).await
        }
        Commands::Auth { action } => {
            let ctx = Context::build("/auth/callback").await?;
            commands::auth::run(&ctx, action).await
        }
    };

    if let Err(err) = result {
        if let Some(EventualError::SessionExpired { redirect: true }) =
            err.downcast_ref::<EventualError>()
        {
            eprintln!(
                "{}",
                "Tu sesión ha expirado. Inicia sesión de nuevo con `eventual auth login`.".red()
            );
            std::process::exit(1);
        }
        return Err(err);
    }

    Ok(())
}
