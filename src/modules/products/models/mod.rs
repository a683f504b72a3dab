mod product;

pub use product::{Product, ProductPayload};
