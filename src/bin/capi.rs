//! Cloud Controller API CLI binary.
//!
//! A command-line interface for inspecting an app and running tasks.

use std::collections::BTreeMap;
use std::process::ExitCode;
use std::time::Duration;

use capi::cli::{Cli, Command, TaskCommand};
use capi::{
    CapiClient, Context, PrettyPrint, Process, ProcessStats, Task, TaskListQuery, TaskRequest,
};
use clap::Parser;
use serde::Serialize;
use tabled::{Table, Tabled};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = match CapiClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set CAPI_ADDR environment variable");
            return ExitCode::FAILURE;
        }
    };

    let mut ctx = Context::background();
    if let Some(secs) = cli.timeout {
        ctx = ctx.with_timeout(Duration::from_secs(secs));
    }

    let interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    match run(&client, &ctx, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: &CapiClient, ctx: &Context, cli: Cli) -> capi::Result<()> {
    let json = cli.json;
    let app = |app: Option<String>| app.unwrap_or_default();

    match cli.command {
        Command::Processes { app: guid } => {
            let processes = client.processes(ctx, &app(guid)).await?;
            output_list(&processes, json, |p| ProcessRow::from(p))?;
        }
        Command::Stats { process } => {
            let stats = client.process_stats(ctx, &process).await?;
            output_list(&stats, json, |s| StatsRow::from(s))?;
        }
        Command::AppGuid { name } => {
            let guid = client.app_guid(ctx, &name).await?;
            output_value(&guid, json)?;
        }
        Command::Droplet { app: guid } => {
            let guid = client.droplet_guid(ctx, &app(guid)).await?;
            output_value(&guid, json)?;
        }
        Command::Package { app: guid } => {
            let package = client.package_guid(ctx, &app(guid)).await?;
            output_single(&package, json)?;
        }
        Command::Env { app: guid } => {
            let vars: BTreeMap<_, _> = client
                .environment_variables(ctx, &app(guid))
                .await?
                .into_iter()
                .collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&vars)?);
            } else {
                for (key, value) in vars {
                    println!("{key}={value}");
                }
            }
        }
        Command::Task { action } => handle_task(client, ctx, action, json).await?,
    }
    Ok(())
}

async fn handle_task(
    client: &CapiClient,
    ctx: &Context,
    action: TaskCommand,
    json: bool,
) -> capi::Result<()> {
    match action {
        TaskCommand::Get { guid } => {
            let task = client.task(ctx, &guid).await?;
            output_single(&task, json)?;
        }
        TaskCommand::List { app, names, states } => {
            let query = TaskListQuery {
                names,
                states,
                ..Default::default()
            };
            let tasks = client
                .list_tasks(ctx, &app.unwrap_or_default(), &query)
                .await?;
            output_list(&tasks, json, |t| TaskRow::from(t))?;
        }
        TaskCommand::Run {
            command,
            name,
            droplet,
            app,
            wait,
        } => {
            let request = TaskRequest {
                command,
                name: name.unwrap_or_default(),
                droplet_guid: droplet.unwrap_or_default(),
                app_guid: app.unwrap_or_default(),
            };
            let task = if wait {
                client.run_task_and_wait(ctx, &request).await?
            } else {
                client.run_task(ctx, &request).await?
            };
            output_single(&task, json)?;
        }
    }
    Ok(())
}

fn output_value(value: &str, json: bool) -> capi::Result<()> {
    if json {
        println!("{}", serde_json::to_string(value)?);
    } else {
        println!("{value}");
    }
    Ok(())
}

fn output_single<T: Serialize + PrettyPrint>(item: &T, json: bool) -> capi::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

fn output_list<T, R, F>(items: &[T], json: bool, to_row: F) -> capi::Result<()>
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else {
        let rows: Vec<R> = items.iter().map(to_row).collect();
        println!("{}", Table::new(rows));
        println!("\n{} total", items.len());
    }
    Ok(())
}

// Table row types for non-JSON output

#[derive(Tabled)]
struct ProcessRow {
    guid: String,
    #[tabled(rename = "type")]
    process_type: String,
    instances: u32,
    memory: String,
}

impl From<&Process> for ProcessRow {
    fn from(p: &Process) -> Self {
        Self {
            guid: p.guid.clone(),
            process_type: p.process_type.clone(),
            instances: p.instances,
            memory: format!("{} MB", p.memory_in_mb),
        }
    }
}

#[derive(Tabled)]
struct StatsRow {
    index: u32,
    state: String,
    cpu: String,
    memory: String,
    host: String,
    uptime: u64,
}

impl From<&ProcessStats> for StatsRow {
    fn from(s: &ProcessStats) -> Self {
        Self {
            index: s.index,
            state: s.state.clone(),
            cpu: format!("{:.1}%", s.usage.cpu * 100.0),
            memory: s
                .mem_utilization()
                .map(|u| format!("{:.1}%", u * 100.0))
                .unwrap_or_else(|| format!("{:.0} B", s.usage.mem)),
            host: s.host.clone().unwrap_or_default(),
            uptime: s.uptime,
        }
    }
}

#[derive(Tabled)]
struct TaskRow {
    sequence: u64,
    guid: String,
    name: String,
    state: String,
}

impl From<&Task> for TaskRow {
    fn from(t: &Task) -> Self {
        Self {
            sequence: t.sequence_id,
            guid: t.guid.clone(),
            name: t.name.clone(),
            state: t.state.to_string(),
        }
    }
}
