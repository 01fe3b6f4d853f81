use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::{
    application::{RuntimeConfig, tree_view::TreeView},
    cli::Command,
    config::{ConfigStatus, ConfigurationOverlay, get_sidecar_path},
    ext::{PathDisplayExt, SystemTimeExt},
    filesystem::{DeleteOptions, FileAccess, FsError, RenameOptions, WriteOptions},
    tree::TreeBuilder,
    watch::{WatchError, WatchOptions, watch},
};

pub struct Application;

impl Application {
    pub async fn run(runtime_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let config: RuntimeConfig = runtime_config.into();
        colored::control::set_override(config.colors);
        debug!("Runtime config: {:?}", config);

        let fs = FileAccess::new();
        match &config.command {
            Command::Tree { depth } => {
                let overlay = load_overlay(&fs, &config).await;
                let builder = TreeBuilder::new(fs, Some(config.root.clone()));
                let lines = TreeView::new(&builder, overlay.snapshot())
                    .with_max_depth(*depth)
                    .with_colors(config.colors)
                    .render()
                    .await
                    .context(FilesystemSnafu)?;
                lines.iter().for_each(|line| println!("{line}"));
            }
            Command::Describe { name } => {
                let overlay = load_overlay(&fs, &config).await;
                match (overlay.describe(name), overlay.tooltip(name)) {
                    (Some(description), Some(tooltip)) => {
                        println!("{description}\n\n{tooltip}");
                    }
                    _ => println!("No annotation for '{name}'"),
                }
            }
            Command::Stat { path } => {
                let path = config.resolve(path);
                let stat = fs.stat(&path).await.context(FilesystemSnafu)?;
                println!("path:     {}", path.lexical_display());
                println!("kind:     {}", stat.kind);
                println!("size:     {}", stat.size);
                println!("created:  {}", format_time(stat.created));
                println!("modified: {}", format_time(stat.modified));
            }
            Command::Ls { path } => {
                let entries = fs
                    .read_directory(&config.resolve(path))
                    .await
                    .context(FilesystemSnafu)?;
                for (name, kind) in entries {
                    println!("{:<9} {name}", kind.to_string());
                }
            }
            Command::Cat { path } => {
                let contents = fs
                    .read_file(&config.resolve(path))
                    .await
                    .context(FilesystemSnafu)?;
                print!("{}", String::from_utf8_lossy(&contents));
            }
            Command::Write {
                path,
                content,
                no_create,
                overwrite,
            } => {
                let options = WriteOptions {
                    create: !no_create,
                    overwrite: *overwrite,
                };
                fs.write_file(&config.resolve(path), content.clone().into_bytes(), options)
                    .await
                    .context(FilesystemSnafu)?;
            }
            Command::Mkdir { path } => {
                fs.create_directory(&config.resolve(path))
                    .await
                    .context(FilesystemSnafu)?;
            }
            Command::Rm { path, recursive } => {
                let options = DeleteOptions {
                    recursive: *recursive,
                };
                fs.delete(&config.resolve(path), options)
                    .await
                    .context(FilesystemSnafu)?;
            }
            Command::Mv {
                from,
                to,
                overwrite,
            } => {
                let options = RenameOptions {
                    overwrite: *overwrite,
                };
                fs.rename(&config.resolve(from), &config.resolve(to), options)
                    .await
                    .context(FilesystemSnafu)?;
            }
            Command::Watch {
                no_recursive,
                excludes,
            } => {
                let options = WatchOptions {
                    recursive: !no_recursive,
                    excludes: excludes.clone(),
                };
                watch_tree(&fs, &config, &options).await?;
            }
        }

        Ok(())
    }
}

async fn load_overlay(fs: &FileAccess, config: &RuntimeConfig) -> ConfigurationOverlay {
    let overlay = ConfigurationOverlay::new();
    report_status(&overlay.reload(fs, &config.root).await);
    overlay
}

fn report_status(status: &ConfigStatus) {
    match status.diagnostic() {
        Some(diagnostic) => eprintln!("{diagnostic}"),
        None => debug!("Configuration status: {:?}", status),
    }
}

async fn watch_tree(
    fs: &FileAccess,
    config: &RuntimeConfig,
    options: &WatchOptions,
) -> Result<(), ApplicationError> {
    let overlay = load_overlay(fs, config).await;
    let mut subscription = watch(&config.root, options).context(WatchSnafu)?;
    let sidecar = get_sidecar_path(subscription.root());
    info!("Watching {}", subscription.root().lexical_display());

    while let Some(event) = subscription.next_event().await {
        let name = event.path.base_name();
        match overlay.describe(&name) {
            Some(description) => println!(
                "{:<7} {}  {}",
                event.kind.to_string(),
                event.path.display(),
                description
            ),
            None => println!("{:<7} {}", event.kind.to_string(), event.path.display()),
        }

        if event.path == sidecar {
            info!("Sidecar document {}, reloading annotations", event.kind);
            report_status(&overlay.reload(fs, &config.root).await);
        }
    }

    warn!("Watch on {} ended", subscription.root().lexical_display());
    Ok(())
}

fn format_time(time: Option<std::time::SystemTime>) -> String {
    time.and_then(|time| time.unix_millis())
        .map(|millis| format!("{millis} ms since epoch"))
        .unwrap_or_else(|| "unavailable".to_string())
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Filesystem operation failed"))]
    FilesystemError { source: FsError },
    #[snafu(display("Failed to subscribe to filesystem changes"))]
    WatchError { source: WatchError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn runtime_config(root: &std::path::Path, command: Command) -> RuntimeConfig {
        RuntimeConfig {
            root: root.to_path_buf(),
            command,
            colors: false,
        }
    }

    #[compio::test]
    async fn write_then_move_inside_root() {
        let dir = TempDir::new().expect("Failed to create temp directory");

        let write = Command::Write {
            path: "notes/todo.txt".into(),
            content: "ship it".into(),
            no_create: false,
            overwrite: false,
        };
        Application::run(runtime_config(dir.path(), write))
            .await
            .expect("Write failed");

        let mv = Command::Mv {
            from: "notes/todo.txt".into(),
            to: "done/todo.txt".into(),
            overwrite: false,
        };
        Application::run(runtime_config(dir.path(), mv))
            .await
            .expect("Move failed");

        let moved = std::fs::read_to_string(dir.path().join("done/todo.txt"))
            .expect("Failed to read moved file");
        assert_eq!(moved, "ship it");
        assert!(!dir.path().join("notes/todo.txt").exists());
    }

    #[compio::test]
    async fn filesystem_errors_surface_through_the_application() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::create_dir(dir.path().join("full")).expect("Failed to create dir");
        std::fs::write(dir.path().join("full/file.txt"), "").expect("Failed to write file");

        let rm = Command::Rm {
            path: "full".into(),
            recursive: false,
        };
        let result = Application::run(runtime_config(dir.path(), rm)).await;
        assert!(matches!(result, Err(ApplicationError::FilesystemError { .. })));
        assert!(dir.path().join("full/file.txt").exists());
    }

    #[compio::test]
    async fn tree_of_missing_root_fails_with_not_found() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let command = Command::Tree { depth: None };

        let result = Application::run(runtime_config(&dir.path().join("absent"), command)).await;
        assert!(matches!(
            result,
            Err(ApplicationError::FilesystemError {
                source: FsError::NotFound { .. }
            })
        ));
    }

    #[test]
    fn missing_times_are_reported_as_unavailable() {
        assert_eq!(format_time(None), "unavailable");
        assert_eq!(
            format_time(Some(std::time::UNIX_EPOCH + std::time::Duration::from_millis(1500))),
            "1500 ms since epoch"
        );
    }
}
