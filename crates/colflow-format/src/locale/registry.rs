/// Separator conventions used when rendering and parsing numbers in a column.
///
/// Only the separators matter for column text: month/day names are always English and date
/// layouts come from explicit format strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLocale {
    pub id: &'static str,
    pub decimal_separator: char,
    pub thousands_separator: Option<char>,
}

impl NumberLocale {
    /// Map a locale-formatted numeric string onto the `.`-decimal, ungrouped spelling understood
    /// by Rust's `str::parse`.
    ///
    /// Thousands separators are dropped wherever they appear. A literal `.` in a locale whose
    /// decimal separator is something else is left alone only when it is not that locale's
    /// grouping character, so `1.234,5` parses as `1234.5` in `de-DE`.
    pub fn normalize_numeric_text(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        for ch in text.trim().chars() {
            if Some(ch) == self.thousands_separator && ch != self.decimal_separator {
                continue;
            }
            // Grouping with a no-break space is often typed as a plain or narrow space.
            if self.thousands_separator == Some('\u{00A0}') && (ch == ' ' || ch == '\u{202F}') {
                continue;
            }
            if ch == self.decimal_separator {
                out.push('.');
            } else {
                out.push(ch);
            }
        }
        out
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        EN_US
    }
}

pub static EN_US: NumberLocale = NumberLocale {
    id: "en-US",
    decimal_separator: '.',
    thousands_separator: Some(','),
};

/// British English uses the same separators as `en-US`.
pub static EN_GB: NumberLocale = NumberLocale {
    id: "en-GB",
    decimal_separator: '.',
    thousands_separator: Some(','),
};

pub static DE_DE: NumberLocale = NumberLocale {
    id: "de-DE",
    decimal_separator: ',',
    thousands_separator: Some('.'),
};

/// French (France) groups with U+00A0 NO-BREAK SPACE.
pub static FR_FR: NumberLocale = NumberLocale {
    id: "fr-FR",
    decimal_separator: ',',
    thousands_separator: Some('\u{00A0}'),
};

pub static ES_ES: NumberLocale = NumberLocale {
    id: "es-ES",
    decimal_separator: ',',
    thousands_separator: Some('.'),
};

/// Spanish (Mexico) commonly uses `.` for decimals and `,` for thousands grouping.
pub static ES_MX: NumberLocale = NumberLocale {
    id: "es-MX",
    decimal_separator: '.',
    thousands_separator: Some(','),
};

pub static IT_IT: NumberLocale = NumberLocale {
    id: "it-IT",
    decimal_separator: ',',
    thousands_separator: Some('.'),
};

/// Swiss German (`'` grouping, `.` decimal).
pub static DE_CH: NumberLocale = NumberLocale {
    id: "de-CH",
    decimal_separator: '.',
    thousands_separator: Some('\''),
};

/// Swiss French (`'` grouping, `.` decimal).
pub static FR_CH: NumberLocale = NumberLocale {
    id: "fr-CH",
    decimal_separator: '.',
    thousands_separator: Some('\''),
};

/// Swiss Italian (`'` grouping, `.` decimal).
pub static IT_CH: NumberLocale = NumberLocale {
    id: "it-CH",
    decimal_separator: '.',
    thousands_separator: Some('\''),
};

fn canonical_locale_id(id: &str) -> Option<&'static str> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return None;
    }

    // `de_DE.UTF-8`, `de-de@euro` and `de-DE-u-nu-latn` all name the same separators.
    let mut key: String = trimmed
        .chars()
        .map(|ch| if ch == '_' { '-' } else { ch.to_ascii_lowercase() })
        .collect();
    for marker in [".", "@", "-u-", "-x-"] {
        if let Some(idx) = key.find(marker) {
            key.truncate(idx);
        }
    }

    let exact = match key.as_str() {
        "en-us" | "en" | "c" | "posix" => Some("en-US"),
        "en-gb" | "en-uk" => Some("en-GB"),
        "de-de" | "de" => Some("de-DE"),
        "de-ch" => Some("de-CH"),
        "fr-fr" | "fr" => Some("fr-FR"),
        "fr-ch" => Some("fr-CH"),
        "es-es" | "es" => Some("es-ES"),
        "es-mx" => Some("es-MX"),
        "it-it" | "it" => Some("it-IT"),
        "it-ch" => Some("it-CH"),
        _ => None,
    };
    if exact.is_some() {
        return exact;
    }

    // Region variants we don't list (`fr-CA`, `de-AT`, `en-AU`) fall back to the language.
    match key.split('-').next().unwrap_or("") {
        "en" => Some("en-US"),
        "de" => Some("de-DE"),
        "fr" => Some("fr-FR"),
        "es" => Some("es-ES"),
        "it" => Some("it-IT"),
        _ => None,
    }
}

/// Look up the separators for a BCP-47 / POSIX locale tag.
pub fn get_locale(id: &str) -> Option<&'static NumberLocale> {
    match canonical_locale_id(id)? {
        "en-US" => Some(&EN_US),
        "en-GB" => Some(&EN_GB),
        "de-DE" => Some(&DE_DE),
        "de-CH" => Some(&DE_CH),
        "fr-FR" => Some(&FR_FR),
        "fr-CH" => Some(&FR_CH),
        "es-ES" => Some(&ES_ES),
        "es-MX" => Some(&ES_MX),
        "it-IT" => Some(&IT_IT),
        "it-CH" => Some(&IT_CH),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalizes_posix_and_bcp47_tags() {
        assert_eq!(canonical_locale_id("en_US.UTF-8"), Some("en-US"));
        assert_eq!(canonical_locale_id("C"), Some("en-US"));
        assert_eq!(canonical_locale_id("de_DE@euro"), Some("de-DE"));
        assert_eq!(canonical_locale_id("de-AT"), Some("de-DE"));
        assert_eq!(canonical_locale_id("fr-FR-u-nu-latn"), Some("fr-FR"));
        assert_eq!(canonical_locale_id("it_ch"), Some("it-CH"));
        assert_eq!(canonical_locale_id("ja-JP"), None);
        assert_eq!(canonical_locale_id("  "), None);
    }

    #[test]
    fn normalizes_grouped_decimal_text() {
        assert_eq!(DE_DE.normalize_numeric_text(" 1.234,5 "), "1234.5");
        assert_eq!(EN_US.normalize_numeric_text("1,234.5"), "1234.5");
        assert_eq!(FR_FR.normalize_numeric_text("1 234,5"), "1234.5");
        assert_eq!(DE_CH.normalize_numeric_text("1'234.5"), "1234.5");
    }
}
