use crate::models::MenuCatalogEntry;
use bigdecimal::BigDecimal;
use sqlx::PgPool;
use uuid::Uuid;

/// 查询所有在售菜单条目
pub async fn list_menu_items(pool: &PgPool) -> Result<Vec<MenuCatalogEntry>, sqlx::Error> {
    sqlx::query_as::<_, MenuCatalogEntry>(
        r#"
        SELECT id, name, coalesce(category, '') as category
        FROM menu_items
        WHERE is_active IS NOT FALSE
        "#
    )
    .fetch_all(pool)
    .await
}

/// 查询已定义配方的菜单条目ID
pub async fn list_recipe_holder_ids(pool: &PgPool) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT DISTINCT menu_item_id
        FROM recipes
        WHERE menu_item_id IS NOT NULL
        "#
    )
    .fetch_all(pool)
    .await
}

/// 新增在售菜单条目
pub async fn insert_menu_item(
    pool: &PgPool,
    name: &str,
    category: &str,
    selling_price: &BigDecimal,
) -> Result<MenuCatalogEntry, sqlx::Error> {
    sqlx::query_as::<_, MenuCatalogEntry>(
        r#"
        INSERT INTO menu_items (name, category, selling_price_ttc, is_active)
        VALUES ($1, $2, $3, true)
        RETURNING id, name, coalesce(category, '') as category
        "#
    )
    .bind(name)
    .bind(category)
    .bind(selling_price)
    .fetch_one(pool)
    .await
}
