pub mod cart_lines;
pub mod carts;
pub mod order_lines;
pub mod orders;
pub mod products;
pub mod stock_entries;

pub use cart_lines::Entity as CartLines;
pub use carts::Entity as Carts;
pub use order_lines::Entity as OrderLines;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use stock_entries::Entity as StockEntries;
