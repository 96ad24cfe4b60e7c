use sqlx::PgPool;

use crate::database::entities::product::ProductEntity;

const PRODUCT_COLUMNS: &str =
    "product_id, tenant_id, product_name, category_id, price, image_path, is_deleted, created_at";

/// 产品存储库实现
pub struct ProductRepository;

impl ProductRepository {
    /// 按租户和产品ID查询未删除的产品
    pub async fn find_active(
        pool: &PgPool,
        tenant_id: i32,
        product_id: i32,
    ) -> Result<Option<ProductEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProductEntity>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE product_id = $1 AND tenant_id = $2 AND is_deleted = false"
        ))
        .bind(product_id)
        .bind(tenant_id)
        .fetch_optional(pool)
        .await
    }

    /// 按产品ID查询，包含已软删除的行（失效时需要其分类信息）
    pub async fn find_any(
        pool: &PgPool,
        product_id: i32,
    ) -> Result<Option<ProductEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProductEntity>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1"
        ))
        .bind(product_id)
        .fetch_optional(pool)
        .await
    }

    /// 按分类分页查询产品，按名称排序
    pub async fn list_by_category(
        pool: &PgPool,
        tenant_id: i32,
        category_id: i32,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<ProductEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProductEntity>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE category_id = $1 AND tenant_id = $2 AND is_deleted = false \
             ORDER BY product_name OFFSET $3 LIMIT $4"
        ))
        .bind(category_id)
        .bind(tenant_id)
        .bind((page - 1) * page_size)
        .bind(page_size)
        .fetch_all(pool)
        .await
    }

    /// 分页查询租户的全部产品，按名称排序
    pub async fn list_all(
        pool: &PgPool,
        tenant_id: i32,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<ProductEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProductEntity>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE tenant_id = $1 AND is_deleted = false \
             ORDER BY product_name OFFSET $2 LIMIT $3"
        ))
        .bind(tenant_id)
        .bind((page - 1) * page_size)
        .bind(page_size)
        .fetch_all(pool)
        .await
    }

    /// 查询分类下全部产品ID，用于分区桶填充
    pub async fn list_category_product_ids(
        pool: &PgPool,
        tenant_id: i32,
        category_id: i32,
    ) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT product_id FROM products \
             WHERE category_id = $1 AND tenant_id = $2 AND is_deleted = false",
        )
        .bind(category_id)
        .bind(tenant_id)
        .fetch_all(pool)
        .await
    }

    /// 按产品数量取前N个分类，用于缓存预热
    pub async fn top_categories(
        pool: &PgPool,
        tenant_id: i32,
        limit: i64,
    ) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar::<_, i32>(
            "SELECT category_id FROM products \
             WHERE tenant_id = $1 AND is_deleted = false \
             GROUP BY category_id ORDER BY COUNT(*) DESC LIMIT $2",
        )
        .bind(tenant_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// 创建产品
    pub async fn create(
        pool: &PgPool,
        tenant_id: i32,
        product_name: &str,
        category_id: i32,
        price: f64,
        image_path: Option<&str>,
    ) -> Result<ProductEntity, sqlx::Error> {
        sqlx::query_as::<_, ProductEntity>(&format!(
            "INSERT INTO products (tenant_id, product_name, category_id, price, image_path, is_deleted) \
             VALUES ($1, $2, $3, $4, $5, false) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(tenant_id)
        .bind(product_name)
        .bind(category_id)
        .bind(price)
        .bind(image_path)
        .fetch_one(pool)
        .await
    }

    /// 更新产品，返回更新后的行
    pub async fn update(
        pool: &PgPool,
        tenant_id: i32,
        product_id: i32,
        product_name: &str,
        category_id: i32,
        price: f64,
        image_path: Option<&str>,
    ) -> Result<Option<ProductEntity>, sqlx::Error> {
        sqlx::query_as::<_, ProductEntity>(&format!(
            "UPDATE products \
             SET product_name = $3, category_id = $4, price = $5, image_path = $6 \
             WHERE product_id = $1 AND tenant_id = $2 AND is_deleted = false \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(product_id)
        .bind(tenant_id)
        .bind(product_name)
        .bind(category_id)
        .bind(price)
        .bind(image_path)
        .fetch_optional(pool)
        .await
    }

    /// 软删除产品，返回受影响的行数
    pub async fn soft_delete(
        pool: &PgPool,
        tenant_id: i32,
        product_id: i32,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE products SET is_deleted = true \
             WHERE product_id = $1 AND tenant_id = $2 AND is_deleted = false",
        )
        .bind(product_id)
        .bind(tenant_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
