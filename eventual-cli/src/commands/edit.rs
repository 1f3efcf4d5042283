use std::path::PathBuf;

use anyhow::{Context as _, Result};
use chrono::Utc;
use owo_colors::OwoColorize;

use eventual_core::error::EventualError;
use eventual_core::event::{Categoria, EventForm, ImageFile};
use eventual_core::validate::validate;

use super::{Context, create_spinner, parse_fecha};

/// Fields the user wants to change; anything `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct EventUpdates {
    pub nombre: Option<String>,
    pub fecha: Option<String>,
    pub lugar: Option<String>,
    pub descripcion: Option<String>,
    pub categoria: Option<Categoria>,
    pub precio: Option<f64>,
    pub capacidad: Option<u32>,
    pub imagen: Option<PathBuf>,
}

pub async fn run(ctx: &Context, id: &str, updates: EventUpdates) -> Result<()> {
    let user = ctx.require_user()?;

    let spinner = create_spinner("Cargando evento...".to_string());
    let result = ctx.api.get_event(id).await;
    spinner.finish_and_clear();
    let event = result?;

    // Ownership gate; the backend re-enforces this on the PUT
    if !event.is_owned_by(&user.email) {
        return Err(EventualError::Permission(
            "Solo el organizador puede editar este evento".to_string(),
        )
        .into());
    }

    let form = apply_updates(EventForm::from_event(&event), updates)?;

    let errors = validate(&form, Utc::now());
    if !errors.is_empty() {
        eprintln!("{}", "El formulario tiene errores:".red().bold());
        for (field, message) in &errors {
            eprintln!("  {} {}", format!("{}:", field).bold(), message.red());
        }
        anyhow::bail!("Evento no actualizado");
    }

    let spinner = create_spinner("Actualizando evento...".to_string());
    let result = ctx.api.update_event(id, &form).await;
    spinner.finish_and_clear();

    let updated = result?;
    println!(
        "{} {}",
        "Evento actualizado:".green(),
        updated.nombre.bold()
    );

    Ok(())
}

fn apply_updates(mut form: EventForm, updates: EventUpdates) -> Result<EventForm> {
    if let Some(nombre) = updates.nombre {
        form.nombre = nombre;
    }
    if let Some(fecha) = updates.fecha {
        form.timestamp = Some(parse_fecha(&fecha)?);
    }
    if let Some(lugar) = updates.lugar {
        form.lugar = lugar;
    }
    if let Some(descripcion) = updates.descripcion {
        form.descripcion = Some(descripcion);
    }
    if let Some(categoria) = updates.categoria {
        form.categoria = categoria;
    }
    if let Some(precio) = updates.precio {
        form.precio = Some(precio);
    }
    if let Some(capacidad) = updates.capacidad {
        form.capacidad = Some(capacidad);
    }
    if let Some(path) = updates.imagen {
        let imagen = ImageFile::from_path(&path)
            .with_context(|| format!("No se pudo leer la imagen {}", path.display()))?;
        form.imagen = Some(imagen);
    }
    Ok(form)
}
