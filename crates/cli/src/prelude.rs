pub use anstream::println;
pub use color_eyre::eyre::{eyre, Result};
