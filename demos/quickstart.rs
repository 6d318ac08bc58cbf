//! Quickstart: map an entity, insert a row, query it back.
//!
//! Expects a reachable PostgreSQL instance configured via `rowhaus.toml`
//! (or the file named by `ROWHAUS_CONFIG`), with a table:
//!
//! ```sql
//! CREATE TABLE users (
//!     id        BIGSERIAL PRIMARY KEY,
//!     user_name TEXT NOT NULL,
//!     active    BOOLEAN NOT NULL DEFAULT true
//! );
//! ```

use rowhaus::prelude::*;

#[derive(Debug, Default, Entity)]
#[table(name = "users")]
pub struct User {
    #[field(name = "id")]
    #[auto_increment]
    pub id: i64,

    #[field(name = "user_name")]
    pub name: String,

    #[field]
    pub active: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::load()?;
    let rowhaus = RowHaus::new(config.database).await?;
    rowhaus.health_check().await?;

    let mut users = rowhaus.entities::<User>()?;

    let user = User {
        id: 0,
        name: "John Doe".to_string(),
        active: true,
    };
    let id: i64 = users.insert_returning_id(&user).await?;
    println!("inserted user {id}");

    users.filter(vec![("active", FilterValue::scalar(true))])?;
    users.order_by(&["name"])?;
    let active = users.get().await?;
    println!("{} active users", active.len());

    users.filter(vec![("id", FilterValue::scalar(id))])?;
    let found = users.first_or_default().await?;
    println!("found: {found:?}");

    let page = rowhaus.entities::<User>()?.paginate(1, 10).await?;
    println!(
        "page 1 of {}: {} users of {}",
        page.page_count(),
        page.items.len(),
        page.total_count
    );

    Ok(())
}
