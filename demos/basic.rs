//! Basic example demonstrating the Cloud Controller client.
//!
//! Run with:
//! ```
//! CAPI_ADDR=https://api.example.com CAPI_APP_GUID=your-app cargo run --example basic
//! ```

use capi::{CapiClient, Context, TaskListQuery, TaskRequest};

#[tokio::main]
async fn main() -> capi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating client...");
    let client = CapiClient::from_env()?;
    println!("Connected to: {}", client.addr());

    let ctx = Context::background();

    // Processes of the default app
    println!("\n--- Processes ---");
    let processes = client.processes(&ctx, "").await?;
    println!("Found {} processes", processes.len());

    for process in &processes {
        println!(
            "  - {} {} x{} ({} MB)",
            process.guid, process.process_type, process.instances, process.memory_in_mb
        );
    }

    // Stats of the first one
    if let Some(first) = processes.first() {
        println!("\n--- Stats for {} ---", first.process_type);
        let stats = client.process_stats(&ctx, &first.guid).await?;
        for instance in &stats {
            let mem = instance
                .mem_utilization()
                .map(|u| format!("{:.1}%", u * 100.0))
                .unwrap_or_else(|| "unknown".to_string());
            println!(
                "  #{} {} cpu {:.1}% mem {}",
                instance.index,
                instance.state,
                instance.usage.cpu * 100.0,
                mem
            );
        }
    }

    // Where the app's bits live
    println!("\n--- Droplet ---");
    let droplet = client.droplet_guid(&ctx, "").await?;
    println!("  Droplet: {}", droplet);
    let package = client.package_guid(&ctx, "").await?;
    println!("  Package: {} ({})", package.guid, package.download_href);

    // Run a task and wait for it
    println!("\n--- Running Task ---");
    let task = client
        .run_task_and_wait(&ctx, &TaskRequest::new("echo hello").name("hello"))
        .await?;
    println!("  {} finished {}", task.guid, task.state);

    // Recent failures
    let failed = TaskListQuery {
        states: vec!["FAILED".to_string()],
        ..Default::default()
    };
    let tasks = client.list_tasks(&ctx, "", &failed).await?;
    println!("\n{} failed tasks", tasks.len());

    println!("\nDone!");
    Ok(())
}
