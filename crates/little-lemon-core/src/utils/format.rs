/// Folder holding the dish photos of the published menu.
pub const DEFAULT_IMAGE_BASE_URL: &str =
    "https://github.com/Meta-Mobile-Developer-PC/Working-With-Data-API/blob/main/images";

/// Characters of description shown in a menu row.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 50;

/// Resolve a menu item's relative image name into a displayable URL.
pub fn image_url(base: &str, image: &str) -> String {
    format!("{}/{}?raw=true", base.trim_end_matches('/'), image)
}

/// Format a price with two decimals, e.g. `$12.99`
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// Cut a description down to `max_chars` characters, adding an ellipsis
/// when anything was removed.
pub fn truncate_description(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{}...", truncated.trim_end())
    }
}

/// Digits in a full phone number.
const PHONE_DIGITS: usize = 10;

/// Lay the digits of `input` into the `(999) 999-9999` input mask.
///
/// Partial input yields a partial mask (`"5551"` becomes `"(555) 1"`);
/// non-digits are dropped and anything past ten digits is ignored.
pub fn mask_phone(input: &str) -> String {
    let mut masked = String::new();
    for (i, digit) in input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(PHONE_DIGITS)
        .enumerate()
    {
        match i {
            0 => masked.push('('),
            3 => masked.push_str(") "),
            6 => masked.push('-'),
            _ => {}
        }
        masked.push(digit);
    }
    masked
}

/// Format a phone number for display
/// Handles various input formats and normalizes to (XXX) XXX-XXXX
pub fn format_phone(phone: &str) -> String {
    // Extract just the digits
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    match digits.len() {
        10 => format!(
            "({}) {}-{}",
            &digits[0..3],
            &digits[3..6],
            &digits[6..10]
        ),
        11 if digits.starts_with('1') => format!(
            "({}) {}-{}",
            &digits[1..4],
            &digits[4..7],
            &digits[7..11]
        ),
        _ => phone.to_string(), // Return original if can't format
    }
}
