//! Text cleanup applied after recognition (`--postprocess`)

/// Arabic-script code points Tesseract tends to emit for Persian text,
/// mapped to their Persian forms. An empty replacement deletes the character.
const FARSI_REPLACEMENTS: &[(char, &str)] = &[
    ('ي', "ی"), // arabic yeh
    ('ك', "ک"), // arabic kaf
    ('ۀ', "ه"),
    ('ﻻ', "لا"),
    ('ﺓ', "ة"),
    ('ـ', ""), // tatweel
    ('ﺵ', "ش"),
    ('ﺖ', "ت"),
    ('ﺅ', "ؤ"),
];

/// Normalize Persian characters, collapse whitespace runs to a single space
/// and trim both ends.
pub fn normalize_text(text: &str) -> String {
    let mut mapped = String::with_capacity(text.len());
    for c in text.chars() {
        match FARSI_REPLACEMENTS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => mapped.push_str(to),
            None => mapped.push(c),
        }
    }

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}
