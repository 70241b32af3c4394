// SPDX-License-Identifier: GPL-3.0-only

//! Localization support
//!
//! Fluent resources live under `i18n/<lang>/lensflip.ftl` and are embedded
//! into the binary. Use the [`fl!`](crate::fl) macro to look up strings.

use i18n_embed::fluent::{FluentLanguageLoader, fluent_language_loader};
use i18n_embed::unic_langid::LanguageIdentifier;
use i18n_embed::{DefaultLocalizer, LanguageLoader, Localizer};
use rust_embed::RustEmbed;
use std::sync::LazyLock;
use tracing::warn;

/// Select the best matching localization for the requested languages
pub fn init(requested_languages: &[LanguageIdentifier]) {
    if let Err(err) = localizer().select(requested_languages) {
        warn!(error = %err, "Failed to load fluent localizations");
    }
}

/// Localizer backed by the embedded Fluent resources
#[must_use]
pub fn localizer() -> Box<dyn Localizer> {
    Box::from(DefaultLocalizer::new(&*LANGUAGE_LOADER, &Localizations))
}

#[derive(RustEmbed)]
#[folder = "i18n/"]
struct Localizations;

pub static LANGUAGE_LOADER: LazyLock<FluentLanguageLoader> = LazyLock::new(|| {
    let loader: FluentLanguageLoader = fluent_language_loader!();

    // The fallback language is compiled in, so a failure here is a packaging bug
    if let Err(err) = loader.load_fallback_language(&Localizations) {
        warn!(error = %err, "Failed to load fallback language");
    }

    loader
});

/// Request a localized string by ID from the i18n/ directory
#[macro_export]
macro_rules! fl {
    ($message_id:literal) => {{
        i18n_embed_fl::fl!($crate::i18n::LANGUAGE_LOADER, $message_id)
    }};

    ($message_id:literal, $($args:expr),*) => {{
        i18n_embed_fl::fl!($crate::i18n::LANGUAGE_LOADER, $message_id, $($args), *)
    }};
}
