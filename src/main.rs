mod cli;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

use cli::{Cli, Commands, ConfigAction, ListArgs, OutputFormat};
use project_catalog::config::Config;
use project_catalog::models::{AnnotationUpdate, ProjectId};
use project_catalog::operations::{Launcher, OpenTarget, ProjectManager};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 日志写到 stderr，不干扰 JSON 输出
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_config_path()?,
    };
    let config = Config::load_or_create(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    match cli.command.unwrap_or(Commands::List(ListArgs::default())) {
        Commands::List(args) => list_projects(&config, args).await?,
        Commands::Annotate {
            id,
            path,
            focus,
            favorite,
            notes,
        } => {
            let id = match (id, path) {
                (Some(id), _) => ProjectId::from(id),
                (None, Some(path)) => ProjectId::from_path(&absolute(&path)?),
                (None, None) => anyhow::bail!("either a project id or --path is required"),
            };

            let update = AnnotationUpdate {
                is_focus: focus,
                is_favorite: favorite,
                notes,
            };
            if update.is_empty() {
                anyhow::bail!("nothing to update, pass --focus, --favorite or --notes");
            }

            let manager = ProjectManager::from_config(&config).await;
            let annotation = manager.update_annotation(id.clone(), update).await?;
            println!(
                "{}: focus={} favorite={} notes={:?}",
                id, annotation.is_focus, annotation.is_favorite, annotation.notes
            );
        }
        Commands::Archive { project_path } => {
            let manager = ProjectManager::from_config(&config).await;
            let destination = manager.archive(&absolute(&project_path)?).await?;
            println!("Archived to {}", destination.display());
        }
        Commands::Open {
            project_path,
            target,
        } => {
            let target = target.unwrap_or_else(|| OpenTarget::from_settings(&config.settings));
            Launcher::open(&config.settings, &absolute(&project_path)?, target).await?;
        }
        Commands::Config { action } => handle_config(config, &config_path, action).await?,
    }

    Ok(())
}

async fn list_projects(config: &Config, args: ListArgs) -> Result<()> {
    if config.settings.root().is_none() {
        eprintln!(
            "Root path is not configured. Run `project-catalog config set-root <path>` first."
        );
    }

    let manager = ProjectManager::from_config(config).await;

    let progress = if args.format == OutputFormat::Table {
        create_spinner("Scanning projects...")
    } else {
        ProgressBar::hidden()
    };
    let listing = manager.list(args.refresh).await;
    progress.finish_and_clear();

    let mut projects: Vec<_> = listing
        .filter_projects(|p| {
            args.category
                .as_deref()
                .map_or(true, |category| p.category.eq_ignore_ascii_case(category))
                && (!args.favorites || p.is_favorite)
                && (!args.focus || p.is_focus)
        })
        .into_iter()
        .cloned()
        .collect();

    output::sort_projects(
        &mut projects,
        args.sort.unwrap_or(config.display.default_sort),
    );

    match args.format {
        OutputFormat::Table => output::print_table(&listing, &projects, &config.display.time_format),
        OutputFormat::Json => output::print_json(&listing, projects)?,
    }

    manager.wait_for_cache_write().await;
    Ok(())
}

async fn handle_config(
    mut config: Config,
    config_path: &Path,
    action: ConfigAction,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("# config file: {}", config_path.display());
            println!("# data dir:    {}", config.data_dir().display());
            println!("{}", toml::to_string_pretty(&config)?);

            let manager = ProjectManager::from_config(&config).await;
            let categories = manager.categories();
            if !categories.is_empty() {
                println!("# categories: {}", categories.join(", "));
            }
            return Ok(());
        }
        ConfigAction::SetRoot { path } => {
            let root = std::fs::canonicalize(&path)
                .with_context(|| format!("cannot resolve {}", path.display()))?;
            if !root.is_dir() {
                anyhow::bail!("{} is not a directory", root.display());
            }
            config.settings.root_path = root.display().to_string();
        }
        ConfigAction::Ignore { name } => {
            config.settings.ignored_folders.insert(name);
        }
        ConfigAction::Unignore { name } => {
            config.settings.ignored_folders.remove(&name);
        }
        ConfigAction::Editor { editor } => config.settings.editor = editor,
        ConfigAction::Action { action } => config.settings.default_action = action,
        ConfigAction::Reset => config = Config::default(),
    }

    config.save_to_file(config_path)?;

    // 扫描范围可能已经改变
    ProjectManager::from_config(&config)
        .await
        .invalidate_cache()
        .await;

    println!("Saved {}", config_path.display());
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("cannot resolve {}", path.display()))
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
    {
        pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
