use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::config::{DefaultAction, Editor, Settings};
use crate::error::CatalogError;
use crate::operations::guard::ensure_within_root;

/// 打开项目的方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OpenTarget {
    Vscode,
    Cursor,
    Explorer,
    Terminal,
}

impl OpenTarget {
    /// 根据用户设置得到默认的打开方式
    pub fn from_settings(settings: &Settings) -> Self {
        match settings.default_action {
            DefaultAction::Editor => match settings.editor {
                Editor::Vscode => OpenTarget::Vscode,
                Editor::Cursor => OpenTarget::Cursor,
            },
            DefaultAction::Explorer => OpenTarget::Explorer,
            DefaultAction::Terminal => OpenTarget::Terminal,
        }
    }
}

/// 在编辑器、文件管理器或终端中打开项目
pub struct Launcher;

impl Launcher {
    /// 打开项目，路径必须位于根目录之内
    pub async fn open(
        settings: &Settings,
        path: &Path,
        target: OpenTarget,
    ) -> Result<(), CatalogError> {
        ensure_within_root(settings, path)?;

        let mut command = Self::command(target, path);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        // 不等待子进程结束
        command
            .spawn()
            .map_err(|err| CatalogError::io(path, err))?;

        tracing::info!("opened {} with {:?}", path.display(), target);
        Ok(())
    }

    /// 构造对应平台的启动命令
    pub fn command(target: OpenTarget, path: &Path) -> Command {
        match target {
            OpenTarget::Vscode => Self::editor_command("code", path),
            OpenTarget::Cursor => Self::editor_command("cursor", path),
            OpenTarget::Explorer => {
                let program = if cfg!(windows) {
                    "explorer"
                } else if cfg!(target_os = "macos") {
                    "open"
                } else {
                    "xdg-open"
                };
                let mut command = Command::new(program);
                command.arg(path);
                command
            }
            OpenTarget::Terminal => {
                if cfg!(windows) {
                    let mut command = Command::new("wt");
                    command.arg("-d").arg(path);
                    command
                } else if cfg!(target_os = "macos") {
                    let mut command = Command::new("open");
                    command.arg("-a").arg("Terminal").arg(path);
                    command
                } else {
                    let mut command = Command::new("x-terminal-emulator");
                    command.current_dir(path);
                    command
                }
            }
        }
    }

    fn editor_command(program: &str, path: &Path) -> Command {
        // Windows 上的 code/cursor 是 .cmd 脚本，需要通过 cmd 启动
        if cfg!(windows) {
            let mut command = Command::new("cmd");
            command.arg("/C").arg(program).arg(path);
            command
        } else {
            let mut command = Command::new(program);
            command.arg(path);
            command
        }
    }
}
