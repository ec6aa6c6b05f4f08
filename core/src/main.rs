//! Runs every API operation once against a live server and logs the outcome.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rest_client::{
    ApiClient, ClientError, CreatePost, CreateUser, PatchUser, Post, UpdateUser, User,
};

#[derive(Debug, Parser)]
#[command(name = "rest-client", about = "Exercise the users and posts API end to end")]
struct Args {
    #[arg(long, env = "API_BASE_URL")]
    base_url: String,

    #[arg(long, env = "BEARER_TOKEN", hide_env_values = true)]
    bearer_token: String,

    /// Per-request timeout.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    timeout_secs: u64,

    /// Deadline for the whole run; pending requests are cancelled when it passes.
    #[arg(long, env = "RUN_DEADLINE_SECS", default_value_t = 30)]
    deadline_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment and flags still apply.
    let _ = dotenv::dotenv();
    init_tracing();

    let args = Args::parse();
    let client = ApiClient::new(
        &args.base_url,
        &args.bearer_token,
        Duration::from_secs(args.timeout_secs),
    );

    let deadline = Duration::from_secs(args.deadline_secs);
    let failures = match tokio::time::timeout(deadline, run(&client)).await {
        Ok(failures) => failures,
        Err(_) => {
            tracing::error!(?deadline, "run deadline exceeded");
            anyhow::bail!("run deadline of {deadline:?} exceeded");
        }
    };

    if failures > 0 {
        anyhow::bail!("{failures} operation(s) failed");
    }
    tracing::info!("all operations completed");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Run each step in order, returning how many failed.
async fn run(client: &ApiClient) -> usize {
    let mut failures = 0;

    let user: Result<Option<User>, _> = client.get("/users/1").await;
    failures += report("GET /users/1", user, |u| {
        tracing::info!(id = u.id, name = %u.name, email = %u.email, "user")
    });

    let post: Result<Option<Post>, _> = client.get("/posts/1").await;
    failures += report("GET /posts/1", post, |p| {
        tracing::info!(id = p.id, title = %p.title, "post")
    });

    let new_user = CreateUser {
        name: "Jane Smith".to_string(),
        email: "jane.smith@example.com".to_string(),
        username: "janesmith".to_string(),
    };
    let created: Result<Option<User>, _> = client.post("/users", &new_user).await;
    failures += report("POST /users", created, |u| {
        tracing::info!(id = u.id, name = %u.name, email = %u.email, "created user")
    });

    let new_post = CreatePost {
        user_id: 1,
        title: "New Post Title".to_string(),
        body: "This is the body of the new post created via API".to_string(),
    };
    let created: Result<Option<Post>, _> = client.post("/posts", &new_post).await;
    failures += report("POST /posts", created, |p| {
        tracing::info!(id = p.id, title = %p.title, "created post")
    });

    let update = UpdateUser {
        name: "John Updated".to_string(),
        email: "john.updated@example.com".to_string(),
        username: "johnupdated".to_string(),
    };
    let updated: Result<Option<User>, _> = client.put("/users/1", &update).await;
    failures += report("PUT /users/1", updated, |u| {
        tracing::info!(id = u.id, name = %u.name, email = %u.email, "updated user")
    });

    let update = CreatePost {
        user_id: 1,
        title: "Updated Post Title".to_string(),
        body: "This post has been updated via PUT request".to_string(),
    };
    let updated: Result<Option<Post>, _> = client.put("/posts/1", &update).await;
    failures += report("PUT /posts/1", updated, |p| {
        tracing::info!(id = p.id, title = %p.title, "updated post")
    });

    let patch = PatchUser {
        name: Some("John Patched".to_string()),
        email: None,
    };
    let patched: Result<Option<User>, _> = client.patch("/users/1", &patch).await;
    failures += report("PATCH /users/1", patched, |u| {
        tracing::info!(id = u.id, name = %u.name, email = %u.email, "patched user")
    });

    failures += report("DELETE /users/1", client.delete("/users/1").await.map(Some), |()| {
        tracing::info!("user deleted")
    });
    failures += report("DELETE /posts/1", client.delete("/posts/1").await.map(Some), |()| {
        tracing::info!("post deleted")
    });

    failures
}

fn report<T>(step: &str, result: Result<Option<T>, ClientError>, on_success: impl FnOnce(T)) -> usize {
    match result {
        Ok(Some(value)) => {
            tracing::info!(step, "ok");
            on_success(value);
            0
        }
        Ok(None) => {
            tracing::info!(step, "ok (empty response)");
            0
        }
        Err(err) => {
            tracing::error!(step, error = %err, "failed");
            1
        }
    }
}
