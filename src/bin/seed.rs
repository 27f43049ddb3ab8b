use hotel_order_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin12345", "admin").await?;
    let user_id = ensure_user(&pool, "guest@example.com", "guest12345", "user").await?;
    let courier_id = ensure_user(&pool, "courier@example.com", "courier12345", "delivery").await?;
    let hotel_owner = ensure_user(&pool, "hotel@example.com", "hotel12345", "hotel").await?;
    let restaurant_owner =
        ensure_user(&pool, "kitchen@example.com", "kitchen12345", "restaurant").await?;

    let hotel_id = ensure_hotel(&pool, hotel_owner).await?;
    let restaurant_id = ensure_restaurant(&pool, restaurant_owner).await?;
    seed_menu(&pool, restaurant_id).await?;

    println!(
        "Seed completed. Admin: {admin_id}, guest: {user_id}, courier: {courier_id}, hotel: {hotel_id}, restaurant: {restaurant_id}"
    );
    println!(
        "Hotel menu: {}",
        hotel_order_api::domain::qr::hotel_menu_url(&config.frontend_base_url, hotel_id)
    );
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(id)
}

async fn ensure_hotel(pool: &sqlx::PgPool, owner_id: Uuid) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO hotels (id, owner_id, name, address, latitude, longitude)
        VALUES ($1, $2, 'Grand Harbour Hotel', '1 Quay Street', -6.2000, 106.8166)
        ON CONFLICT (name) DO UPDATE SET owner_id = EXCLUDED.owner_id
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn ensure_restaurant(pool: &sqlx::PgPool, owner_id: Uuid) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO restaurants (id, owner_id, name, address, latitude, longitude)
        VALUES ($1, $2, 'Warung Nusantara', '22 Market Road', -6.2088, 106.8456)
        ON CONFLICT (name) DO UPDATE SET owner_id = EXCLUDED.owner_id
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn seed_menu(pool: &sqlx::PgPool, restaurant_id: Uuid) -> anyhow::Result<()> {
    let items = vec![
        ("Nasi Goreng", "Fried rice with egg and chicken", 4500000_i64),
        ("Mie Ayam", "Chicken noodles", 3500000),
        ("Sate Ayam", "Ten chicken skewers with peanut sauce", 5400000),
        ("Es Teh Manis", "Sweet iced tea", 800000),
    ];

    for (name, desc, price) in items {
        sqlx::query(
            r#"
            INSERT INTO menu_items (id, restaurant_id, name, description, price)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (restaurant_id, name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(restaurant_id)
        .bind(name)
        .bind(desc)
        .bind(price)
        .execute(pool)
        .await?;
    }

    println!("Seeded menu");
    Ok(())
}
