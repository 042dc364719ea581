//! Taskdesk CLI - Command-line interface for the Taskdesk HTTP API

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::{ColoredString, Colorize};
use tabled::{Table, Tabled};
use taskdesk_sdk::{
    CreateTaskRequest, SdkError, Task, TaskStatus, TaskdeskClient, UpdateTaskRequest,
};

const DEFAULT_URL: &str = "http://127.0.0.1:8000";

#[derive(Parser)]
#[command(name = "taskdesk")]
#[command(about = "Taskdesk CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Server URL
    #[arg(long, env = "TASKDESK_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Bearer token (from `taskdesk login`)
    #[arg(long, env = "TASKDESK_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print a bearer token
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// Create an account and print a bearer token
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// List all tasks
    List,

    /// Show one task
    Get {
        /// Task ID
        id: String,
    },

    /// Create a task
    Create {
        /// Title (3-100 characters)
        title: String,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,
    },

    /// Change fields of a task
    Update {
        /// Task ID
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },

    /// Check that the server is up
    Health,
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    Pending,
    InProgress,
    Completed,
}

impl From<StatusArg> for TaskStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => TaskStatus::Pending,
            StatusArg::InProgress => TaskStatus::InProgress,
            StatusArg::Completed => TaskStatus::Completed,
        }
    }
}

#[derive(Tabled)]
struct TaskRow {
    id: String,
    title: String,
    status: String,
    created_by: String,
    updated_at: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            status: task.status.to_string(),
            created_by: task.created_by.clone(),
            updated_at: task.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

fn colored_status(status: TaskStatus) -> ColoredString {
    let label = status.to_string();
    match status {
        TaskStatus::Pending => label.yellow(),
        TaskStatus::InProgress => label.cyan(),
        TaskStatus::Completed => label.green(),
    }
}

fn print_task(task: &Task) {
    println!("  {} {}", "ID:".bold(), task.id);
    println!("  {} {}", "Title:".bold(), task.title);
    if !task.description.is_empty() {
        println!("  {} {}", "Description:".bold(), task.description);
    }
    println!("  {} {}", "Status:".bold(), colored_status(task.status));
    println!("  {} {}", "Created by:".bold(), task.created_by);
    println!("  {} {}", "Created:".bold(), task.created_at);
    println!("  {} {}", "Updated:".bold(), task.updated_at);
}

/// One-line rendering of an API failure, with field details if any
fn describe(err: &SdkError) -> String {
    match err {
        SdkError::Api {
            status,
            kind,
            message,
            details,
        } => {
            let mut out = format!("{} ({} {})", message, status, kind);
            for (field, detail) in details {
                out.push_str(&format!("\n    {}: {}", field, detail));
            }
            out
        }
        other => other.to_string(),
    }
}

async fn run(cli: Cli) -> std::result::Result<(), SdkError> {
    let mut client = TaskdeskClient::new(&cli.url)?;
    if let Some(token) = cli.token {
        client = client.with_token(token);
    }

    match cli.command {
        Commands::Login { username, password } => {
            let token = client.login(&username, &password).await?;
            println!("{}", "✓ Logged in".green().bold());
            println!("  {} {}s", "Expires in:".bold(), token.expires_in);
            println!();
            println!("export TASKDESK_TOKEN={}", token.token);
        }

        Commands::Register { username, password } => {
            let token = client.register(&username, &password).await?;
            println!("{}", format!("✓ Registered {}", username).green().bold());
            println!();
            println!("export TASKDESK_TOKEN={}", token.token);
        }

        Commands::List => {
            let tasks = client.list_tasks().await?;
            if tasks.is_empty() {
                println!("{}", "No tasks".yellow());
            } else {
                let rows: Vec<TaskRow> = tasks.iter().map(TaskRow::from).collect();
                println!("{}", Table::new(rows));
                println!("{} task(s)", tasks.len());
            }
        }

        Commands::Get { id } => {
            let task = client.get_task(&id).await?;
            print_task(&task);
        }

        Commands::Create {
            title,
            description,
            status,
        } => {
            let task = client
                .create_task(&CreateTaskRequest {
                    title,
                    description,
                    status: status.map(TaskStatus::from),
                })
                .await?;
            println!("{}", "✓ Task created".green().bold());
            print_task(&task);
        }

        Commands::Update {
            id,
            title,
            description,
            status,
        } => {
            let task = client
                .update_task(
                    &id,
                    &UpdateTaskRequest {
                        title,
                        description,
                        status: status.map(TaskStatus::from),
                    },
                )
                .await?;
            println!("{}", "✓ Task updated".green().bold());
            print_task(&task);
        }

        Commands::Delete { id } => {
            client.delete_task(&id).await?;
            println!("{}", format!("✓ Task {} deleted", id).green().bold());
        }

        Commands::Health => {
            let health = client.health().await?;
            println!("  {} {}", "URL:".bold(), cli.url);
            println!("  {} {}", "Status:".bold(), health.status.to_uppercase().green());
            println!("  {} {}", "Version:".bold(), health.version);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        if err.is_unauthorized() {
            eprintln!("{} Run `taskdesk login` and export TASKDESK_TOKEN", "hint:".yellow());
        }
        anyhow::bail!("{} {}", "✗".red(), describe(&err));
    }

    Ok(())
}
