use rust_i18n::t;

use crate::{Field, Language};

/// Localized copy of the contact section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactLabels {
    pub title: String,
    pub subtitle: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub send: String,
    pub sending: String,
    pub info_email: String,
    pub info_phone: String,
    pub info_location: String,
}

impl ContactLabels {
    pub fn for_language(language: Language) -> Self {
        let locale = language.as_ref();

        Self {
            title: t!("contact.title", locale = locale).to_string(),
            subtitle: t!("contact.subtitle", locale = locale).to_string(),
            name: t!("contact.form.name", locale = locale).to_string(),
            email: t!("contact.form.email", locale = locale).to_string(),
            subject: t!("contact.form.subject", locale = locale).to_string(),
            message: t!("contact.form.message", locale = locale).to_string(),
            send: t!("contact.form.send", locale = locale).to_string(),
            sending: t!("contact.form.sending", locale = locale).to_string(),
            info_email: t!("contact.info.email", locale = locale).to_string(),
            info_phone: t!("contact.info.phone", locale = locale).to_string(),
            info_location: t!("contact.info.location", locale = locale).to_string(),
        }
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Subject => &self.subject,
            Field::Message => &self.message,
        }
    }

    /// Submit button caption for the current loading state.
    pub fn submit_caption(&self, loading: bool) -> &str {
        if loading { &self.sending } else { &self.send }
    }
}
