/// 生成单个产品缓存键
pub fn product_key(tenant_id: i32, product_id: i32) -> String {
    format!("tenant:{}:product:{}", tenant_id, product_id)
}

/// 生成分类产品分页缓存键
pub fn category_products_page_key(tenant_id: i32, category_id: i32, page: i64, size: i64) -> String {
    format!(
        "tenant:{}:category:{}:products:page:{}:size:{}",
        tenant_id, category_id, page, size
    )
}

/// 生成分类产品缓存键前缀，用于批量失效
pub fn category_products_prefix(tenant_id: i32, category_id: i32) -> String {
    format!("tenant:{}:category:{}:products:", tenant_id, category_id)
}

/// 生成全部产品分页缓存键
pub fn all_products_page_key(tenant_id: i32, page: i64, size: i64) -> String {
    format!("tenant:{}:all:products:page:{}:size:{}", tenant_id, page, size)
}

/// 生成全部产品缓存键前缀，用于批量失效
pub fn all_products_prefix(tenant_id: i32) -> String {
    format!("tenant:{}:all:products:", tenant_id)
}

/// 生成产品分区缓存键
pub fn partition_key(tenant_id: i32, partition: i32) -> String {
    format!("tenant:{}:products:partition:{}", tenant_id, partition)
}

/// 计算产品ID所属的分区索引
pub fn partition_index(product_id: i32, partition_size: i32) -> i32 {
    product_id / partition_size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_key_format() {
        assert_eq!(product_key(3, 42), "tenant:3:product:42");
    }

    #[test]
    fn category_page_key_format() {
        assert_eq!(
            category_products_page_key(1, 7, 2, 50),
            "tenant:1:category:7:products:page:2:size:50"
        );
    }

    #[test]
    fn all_products_page_key_format() {
        assert_eq!(
            all_products_page_key(1, 1, 50),
            "tenant:1:all:products:page:1:size:50"
        );
    }

    #[test]
    fn partition_key_format() {
        assert_eq!(partition_key(9, 2), "tenant:9:products:partition:2");
    }

    #[test]
    fn prefixes_cover_page_keys() {
        assert!(category_products_page_key(1, 7, 2, 50).starts_with(&category_products_prefix(1, 7)));
        assert!(all_products_page_key(1, 1, 50).starts_with(&all_products_prefix(1)));
    }

    #[test]
    fn partition_index_buckets_by_width() {
        assert_eq!(partition_index(0, 1000), 0);
        assert_eq!(partition_index(999, 1000), 0);
        assert_eq!(partition_index(1000, 1000), 1);
        assert_eq!(partition_index(2500, 1000), 2);
    }

    #[test]
    fn tenants_never_share_keys() {
        // 同一产品ID在不同租户下必须产生不同的键
        assert_ne!(product_key(1, 42), product_key(2, 42));
        assert_ne!(partition_key(1, 0), partition_key(2, 0));
    }
}
