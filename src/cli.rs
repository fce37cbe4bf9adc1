use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

use project_catalog::config::{DefaultAction, Editor, SortField};
use project_catalog::operations::OpenTarget;

#[derive(Parser)]
#[command(name = "project-catalog")]
#[command(about = "Discover, annotate and organise the projects under a root folder")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 配置文件路径
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 详细输出
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 列出根目录下的所有项目
    List(ListArgs),

    /// 修改项目的收藏、关注和备注
    #[command(group(ArgGroup::new("project").required(true).args(["id", "path"])))]
    Annotate {
        /// 项目 ID
        id: Option<String>,

        /// 用项目路径代替 ID
        #[arg(long)]
        path: Option<PathBuf>,

        /// 标记为当前关注
        #[arg(long)]
        focus: Option<bool>,

        /// 标记为收藏
        #[arg(long)]
        favorite: Option<bool>,

        /// 备注
        #[arg(long)]
        notes: Option<String>,
    },

    /// 把项目移动到根目录下的 _Archive
    Archive {
        /// 项目路径
        project_path: PathBuf,
    },

    /// 在编辑器、文件管理器或终端中打开项目
    Open {
        /// 项目路径
        project_path: PathBuf,

        /// 打开方式，默认取自设置
        #[arg(long = "with", value_enum)]
        target: Option<OpenTarget>,
    },

    /// 管理配置
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Default)]
pub struct ListArgs {
    /// 忽略缓存，重新扫描
    #[arg(short, long)]
    pub refresh: bool,

    /// 输出格式
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// 排序字段，默认取自配置
    #[arg(short, long, value_enum)]
    pub sort: Option<SortField>,

    /// 只显示指定分类
    #[arg(long)]
    pub category: Option<String>,

    /// 只显示收藏的项目
    #[arg(long)]
    pub favorites: bool,

    /// 只显示关注的项目
    #[arg(long)]
    pub focus: bool,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// 显示当前配置
    Show,

    /// 设置项目根目录
    SetRoot {
        /// 根目录路径
        path: PathBuf,
    },

    /// 添加忽略的目录名
    Ignore {
        /// 目录名
        name: String,
    },

    /// 移除忽略的目录名
    Unignore {
        /// 目录名
        name: String,
    },

    /// 设置编辑器
    Editor {
        #[arg(value_enum)]
        editor: Editor,
    },

    /// 设置打开项目时的默认操作
    Action {
        #[arg(value_enum)]
        action: DefaultAction,
    },

    /// 重置为默认配置
    Reset,
}

#[derive(clap::ValueEnum, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// 表格格式
    #[default]
    Table,
    /// JSON 格式
    Json,
}
