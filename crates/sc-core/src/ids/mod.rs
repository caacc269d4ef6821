//! ID type wrappers for type safety.

mod id_macro;
pub mod item_token;

pub use item_token::ItemToken;
