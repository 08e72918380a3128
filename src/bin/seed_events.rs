use aiverse_portal::db;
use aiverse_portal::events::{fallback_events, EventStore, PgEventStore};
use dotenvy::dotenv;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🎓 AIverse - Seed Events");
    println!("==========================================");

    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set in .env file")?;

    // Also applies pending migrations.
    let pool = db::create_pool(&database_url).await?;
    let store = PgEventStore::new(pool);

    let mut inserted = 0;
    for event in fallback_events() {
        if store.insert_event(&event).await? {
            println!("✅ Added {} ({})", event.title, event.date);
            inserted += 1;
        } else {
            println!("⏭️  {} already exists, skipping", event.title);
        }
    }

    println!("==========================================");
    println!("Seeded {} new event(s)", inserted);
    Ok(())
}
