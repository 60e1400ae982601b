mod content;
mod form;
mod preferences;
mod relay;

pub use content::*;
pub use form::*;
pub use preferences::*;
pub use relay::*;

rust_i18n::i18n!("locales", fallback = "en");
