//! OCR text normalization ahead of pattern matching.

/// Common OCR misreads, applied after uppercasing.
const OCR_FIXES: &[(&str, &str)] = &[
    ("APPENIDX", "APPENDIX"),
    ("APENDIX", "APPENDIX"),
    ("APPENOIX", "APPENDIX"),
    ("INSPECTI0N", "INSPECTION"),
    ("TRANSF0NDER", "TRANSPONDER"),
    ("TRANSP0NDER", "TRANSPONDER"),
    ("ALTLMETER", "ALTIMETER"),
    ("EI.T", "ELT"),
    ("E.L.T", "ELT"),
];

/// Normalize OCR text for pattern matching: uppercase, fold French
/// accents, fix common OCR confusions, collapse whitespace runs.
///
/// Pure; empty or whitespace-only input yields an empty string.
pub fn normalize_text(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let mut upper = String::with_capacity(text.len());
    for c in text.chars() {
        for u in c.to_uppercase() {
            upper.push(fold_accent(u));
        }
    }

    for (from, to) in OCR_FIXES {
        if upper.contains(from) {
            upper = upper.replace(from, to);
        }
    }

    let mut collapsed = String::with_capacity(upper.len());
    let mut in_space = false;
    for c in upper.chars() {
        if c.is_whitespace() {
            if !in_space {
                collapsed.push(' ');
            }
            in_space = true;
        } else {
            collapsed.push(c);
            in_space = false;
        }
    }

    collapsed.trim().to_string()
}

/// Fold the accented characters seen in French maintenance entries so
/// the pattern table can stay accent-free.
pub fn fold_accent(c: char) -> char {
    match c {
        'À' | 'Â' | 'Ä' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Î' | 'Ï' => 'I',
        'Ô' | 'Ö' => 'O',
        'Ù' | 'Û' | 'Ü' => 'U',
        'Ç' => 'C',
        _ => c,
    }
}
