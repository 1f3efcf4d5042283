use anyhow::Result;
use clap::Subcommand;
use owo_colors::OwoColorize;

use eventual_client::callback;

use super::{Context, create_spinner};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Log in with Google
    Login,
    /// Log out and clear the stored session
    Logout,
    /// Show the current session
    Status,
    /// Request a fresh token
    Refresh,
    /// Re-fetch your profile
    Profile,
}

pub async fn run(ctx: &Context, action: AuthAction) -> Result<()> {
    match action {
        AuthAction::Login => login(ctx).await,
        AuthAction::Logout => logout(ctx).await,
        AuthAction::Status => status(ctx),
        AuthAction::Refresh => refresh(ctx).await,
        AuthAction::Profile => profile(ctx).await,
    }
}

async fn login(ctx: &Context) -> Result<()> {
    let auth_url = ctx.api.google_login_url(&callback::redirect_uri())?;

    println!("Abre esta URL en tu navegador para iniciar sesión con Google:\n");
    println!("{}\n", auth_url);

    if open::that(&auth_url).is_err() {
        println!("(No se pudo abrir el navegador automáticamente; copia la URL de arriba)");
    }

    let spinner = create_spinner("Completando autenticación...".to_string());
    let result = callback::complete_login(&ctx.store).await;
    spinner.finish_and_clear();

    let user = result?;
    println!(
        "{} {}",
        "Autenticado como:".green(),
        user.display_name().bold()
    );

    Ok(())
}

async fn logout(ctx: &Context) -> Result<()> {
    ctx.store.logout(&ctx.api).await;
    println!("Sesión cerrada.");
    Ok(())
}

fn status(ctx: &Context) -> Result<()> {
    let session = ctx.store.snapshot();

    if session.is_authenticated() {
        // require_user holds here by construction
        let user = ctx.require_user()?;
        println!("{} {}", "Sesión activa:".green(), user.display_name().bold());
        println!("  {}  {}", "Email:".dimmed(), user.email);
        if let Some(picture) = &user.picture {
            println!("  {}  {}", "Foto:".dimmed(), picture);
        }
    } else {
        println!("{}", "No has iniciado sesión.".dimmed());
        if let Some(error) = &session.error {
            println!("  {}", error.yellow());
        }
        println!("  eventual auth login");
    }

    Ok(())
}

async fn refresh(ctx: &Context) -> Result<()> {
    ctx.require_user()?;

    let spinner = create_spinner("Renovando token...".to_string());
    let result = ctx.store.refresh(&ctx.api).await;
    spinner.finish_and_clear();

    result?;
    println!("{}", "Token renovado.".green());
    Ok(())
}

async fn profile(ctx: &Context) -> Result<()> {
    ctx.require_user()?;

    let spinner = create_spinner("Cargando perfil...".to_string());
    let result = ctx.store.get_profile(&ctx.api).await;
    spinner.finish_and_clear();

    let user = result?;
    println!("{}", user.display_name().bold());
    println!("  {}  {}", "Email:".dimmed(), user.email);
    if let Some(picture) = &user.picture {
        println!("  {}  {}", "Foto:".dimmed(), picture);
    }

    Ok(())
}
