#[macro_export]
macro_rules! products {
    ($($id:expr => $category:expr, $price:expr),+) => {{
        use catalog_cached::catalog::product::ProductBuilder;
        let mut products = Vec::new();
        $(products.push(
            ProductBuilder::new($id)
                .name(&format!("{} {}", $category, $id))
                .description(&format!("A {} from the catalog", $category))
                .category($category)
                .brand("dressden")
                .price($price)
                .rating(4.0)
                .build()
        );)+
        products
    }};
}
