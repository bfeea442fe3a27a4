//! `rollbook` - CLI for the students service
//!
//! `rollbook serve` runs the HTTP service; the other commands act as a
//! client against it.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;

use rollbook::cli::{
    AddCommand, Cli, Command, ConfigCommand, DeleteCommand, ListCommand, ServeCommand,
    UpdateCommand,
};
use rollbook::client::{render_table, Field};
use rollbook::server::{self, AllowedOrigins};
use rollbook::{init_logging, ClientApp, Config, Storage, StudentId, StudentsApi};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let mut config = Config::load_from(cli.config.clone())?;
    if let Some(url) = cli.api_url.clone() {
        config.client.api_url = url;
        config.validate()?;
    }

    match cli.command {
        Command::Serve(cmd) => handle_serve(config, cmd).await,
        Command::List(cmd) => handle_list(&config, &cmd).await,
        Command::Add(cmd) => handle_add(&config, cmd).await,
        Command::Update(cmd) => handle_update(&config, cmd).await,
        Command::Delete(cmd) => handle_delete(&config, &cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

async fn handle_serve(mut config: Config, cmd: ServeCommand) -> anyhow::Result<()> {
    if let Some(host) = cmd.host {
        config.server.host = host;
    }
    if let Some(port) = cmd.port {
        config.server.port = port;
    }
    if let Some(path) = cmd.database {
        config.storage.database_path = Some(path);
    }
    config.validate()?;

    // An unreachable store keeps the service from starting at all.
    let storage = Storage::open(config.database_path()).context("record store unavailable")?;
    let addr = config.bind_addr()?;
    let allowed = AllowedOrigins::new(&config.server.allowed_origins);

    server::bind_and_serve(addr, storage, allowed)
        .await
        .with_context(|| format!("failed to serve on {addr}"))
}

fn client(config: &Config) -> anyhow::Result<ClientApp> {
    let api = StudentsApi::new(config.client.api_url.clone(), config.client_timeout())?;
    Ok(ClientApp::new(api))
}

fn parse_id(raw: &str) -> anyhow::Result<StudentId> {
    Ok(raw.parse()?)
}

async fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let mut app = client(config)?;
    app.refresh().await?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(app.view().students())?);
    } else {
        print!("{}", render_table(app.view().students()));
    }
    Ok(())
}

async fn handle_add(config: &Config, cmd: AddCommand) -> anyhow::Result<()> {
    let mut app = client(config)?;
    app.set_field(Field::Name, cmd.name);
    app.set_field(Field::Age, cmd.age);
    app.set_field(Field::Course, cmd.course);

    if let Some(student) = app.submit().await? {
        println!("Added {}", student.id);
    }
    print!("{}", render_table(app.view().students()));
    Ok(())
}

async fn handle_update(config: &Config, cmd: UpdateCommand) -> anyhow::Result<()> {
    let id = parse_id(&cmd.id)?;
    let mut app = client(config)?;

    app.refresh().await?;
    app.select_for_edit(id)?;
    if let Some(name) = cmd.name {
        app.set_field(Field::Name, name);
    }
    if let Some(age) = cmd.age {
        app.set_field(Field::Age, age);
    }
    if let Some(course) = cmd.course {
        app.set_field(Field::Course, course);
    }

    match app.submit().await? {
        Some(student) => println!("Updated {}", student.id),
        None => println!("No student with id {id}"),
    }
    print!("{}", render_table(app.view().students()));
    Ok(())
}

async fn handle_delete(config: &Config, cmd: &DeleteCommand) -> anyhow::Result<()> {
    let id = parse_id(&cmd.id)?;
    let mut app = client(config)?;

    app.delete(id).await?;
    println!("Student deleted");
    print!("{}", render_table(app.view().students()));
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:    {}", config.database_path().display());
                println!();
                println!("[Server]");
                println!("  Bind address:     {}:{}", config.server.host, config.server.port);
                println!(
                    "  Allowed origins:  {}",
                    config.server.allowed_origins.join(", ")
                );
                println!();
                println!("[Client]");
                println!("  API URL:          {}", config.client.api_url);
                println!("  Timeout (secs):   {}", config.client.timeout_secs);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
