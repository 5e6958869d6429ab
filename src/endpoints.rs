//! The API endpoint URIs.

/// The route for listing and creating categories.
pub const CATEGORIES: &str = "/categories";
/// The route for getting, updating and deleting a single category.
pub const CATEGORY: &str = "/categories/{category_id}";
/// The route for listing and creating products.
pub const PRODUCTS: &str = "/products";
/// The route for listing the products of one category.
pub const PRODUCTS_BY_CATEGORY: &str = "/products/category/{category_id}";
/// The route for getting, updating and deleting a single product.
pub const PRODUCT: &str = "/products/{product_id}";
/// The route for listing and creating orders.
pub const ORDERS: &str = "/orders";
/// The route for getting and deleting a single order.
pub const ORDER: &str = "/orders/{order_id}";
/// The route for updating the status of an order.
pub const ORDER_STATUS: &str = "/orders/{order_id}/status";
/// The health check route.
pub const HEALTH: &str = "/health";
