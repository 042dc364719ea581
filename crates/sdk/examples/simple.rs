//! Simple SDK Example
//!
//! Demonstrates basic usage of the Taskdesk SDK.
//!
//! # Usage
//!
//! 1. Start the server:
//!    ```bash
//!    TASKDESK_DATABASE__BACKEND=memory cargo run --package taskdesk-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --package taskdesk-sdk --example simple
//!    ```

use taskdesk_sdk::{CreateTaskRequest, TaskStatus, TaskdeskClient, UpdateTaskRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Taskdesk SDK - Simple Example");
    println!("=============================\n");

    // 1. Log in with the demo account
    println!("1. Logging in...");
    let client = TaskdeskClient::new("http://127.0.0.1:8000")?;
    let token = client.login("admin", "password").await?;
    println!("   ✓ Token valid for {}s\n", token.expires_in);
    let client = client.with_token(token.token);

    // 2. Create a task
    println!("2. Creating a task...");
    let task = client
        .create_task(&CreateTaskRequest {
            title: "Write the quarterly report".to_string(),
            description: Some("Numbers from finance first".to_string()),
            ..Default::default()
        })
        .await?;
    println!("   ✓ Task created:");
    println!("     - ID: {}", task.id);
    println!("     - Status: {}\n", task.status);

    // 3. Move it along
    println!("3. Marking it in progress...");
    let task = client
        .update_task(
            &task.id,
            &UpdateTaskRequest {
                status: Some(TaskStatus::InProgress),
                ..Default::default()
            },
        )
        .await?;
    println!("   ✓ Status: {} (updated {})\n", task.status, task.updated_at);

    // 4. List everything
    println!("4. Listing tasks...");
    for task in client.list_tasks().await? {
        println!("     | {} [{}] {}", task.id, task.status, task.title);
    }
    println!();

    // 5. Clean up
    println!("5. Deleting the task...");
    client.delete_task(&task.id).await?;
    match client.get_task(&task.id).await {
        Err(e) if e.is_not_found() => println!("   ✓ Task gone"),
        Err(e) => return Err(e.into()),
        Ok(_) => println!("   ⚠ Task still present"),
    }

    println!("\n✓ Example completed successfully!");

    Ok(())
}
