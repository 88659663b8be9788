//! Spanish/English strings and language selection.

use fruit_core::{CardLabels, UiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Spanish,
    English,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguagePreference {
    System,
    Spanish,
    English,
}

impl LanguagePreference {
    /// Parses the `language` config value; unknown values fall back to system.
    pub fn from_config(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "es" | "spanish" | "español" => LanguagePreference::Spanish,
            "en" | "english" => LanguagePreference::English,
            "system" | "" => LanguagePreference::System,
            other => {
                tracing::warn!("Unknown language {other:?} in config, using system");
                LanguagePreference::System
            }
        }
    }

    pub fn resolve(self) -> Language {
        match self {
            LanguagePreference::System => {
                language_from_locale(sys_locale::get_locale().as_deref())
            }
            LanguagePreference::Spanish => Language::Spanish,
            LanguagePreference::English => Language::English,
        }
    }
}

/// English for `en*` locales, Spanish otherwise.
pub fn language_from_locale(locale: Option<&str>) -> Language {
    match locale {
        Some(l) if l.to_ascii_lowercase().starts_with("en") => Language::English,
        _ => Language::Spanish,
    }
}

impl Language {
    pub fn pick<'a>(self, spanish: &'a str, english: &'a str) -> &'a str {
        match self {
            Language::Spanish => spanish,
            Language::English => english,
        }
    }

    pub fn error_text(self, err: &UiError) -> String {
        match err {
            UiError::InvalidFileType => self
                .pick(
                    "Por favor selecciona un archivo de imagen válido",
                    "Please select a valid image file",
                )
                .to_string(),
            UiError::MissingFile => self
                .pick("Por favor selecciona una imagen", "Please select an image")
                .to_string(),
            UiError::Decode => self
                .pick(
                    "No se pudo leer la imagen",
                    "The image could not be read",
                )
                .to_string(),
            UiError::Prediction(Some(message)) => message.clone(),
            UiError::Prediction(None) => self
                .pick("Error en la predicción", "Prediction failed")
                .to_string(),
        }
    }

    pub fn card_labels(self) -> CardLabels {
        CardLabels {
            heading: self.pick("Clasificación:", "Classification:").into(),
            confidence: self.pick("Confianza", "Confidence").into(),
            time: self.pick("Tiempo", "Time").into(),
        }
    }
}
