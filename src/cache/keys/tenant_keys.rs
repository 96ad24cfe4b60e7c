/// 租户域名缓存键前缀
const TENANT_DOMAIN_PREFIX: &str = "tenant_domain_";

/// 租户ID缓存键前缀
const TENANT_ID_PREFIX: &str = "tenant_id_";

/// 生成租户域名缓存键，域名统一转为小写
pub fn tenant_domain_key(domain: &str) -> String {
    format!("{}{}", TENANT_DOMAIN_PREFIX, domain.to_lowercase())
}

/// 生成租户ID缓存键
pub fn tenant_id_key(tenant_id: i32) -> String {
    format!("{}{}", TENANT_ID_PREFIX, tenant_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_key_is_case_insensitive() {
        assert_eq!(
            tenant_domain_key("Shop.Example.COM"),
            "tenant_domain_shop.example.com"
        );
        assert_eq!(tenant_domain_key("shop.example.com"), tenant_domain_key("SHOP.EXAMPLE.COM"));
    }

    #[test]
    fn id_key_format() {
        assert_eq!(tenant_id_key(7), "tenant_id_7");
    }
}
