//! Small seed tool: creates an administrator account.
//!
//! Usage: `create_admin [email] [password] [name]` — defaults are provided
//! for local development. Refuses to touch an email that already exists.

use cookbook::auth::hash_password;
use cookbook::models::UserRepository;
use sqlx::postgres::PgPoolOptions;
use std::env;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init();

    let mut args = env::args().skip(1);
    let email = args.next().unwrap_or_else(|| "admin@example.com".to_string());
    let password = args.next().unwrap_or_else(|| "ChangeMe!2024Admin".to_string());
    let name = args.next();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let users = UserRepository::new(pool.clone());
    let hash = hash_password(&password).expect("Failed to hash password");

    match users.create_admin(&email, &hash, name.as_deref()).await {
        Ok(true) => {
            println!("Administrator created.");
            println!("Login email: {}", email);
            if let Some(name) = name {
                println!("Display name: {}", name);
            }
        }
        Ok(false) => {
            println!("A user with email {} already exists. No admin created.", email);
        }
        Err(e) => {
            eprintln!("Failed to create administrator: {}", e);
            std::process::exit(1);
        }
    }
}
