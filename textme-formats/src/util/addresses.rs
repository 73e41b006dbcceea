/*!
 This module contains logic to normalize message addresses
*/

/// Normalize an address by simplifying a phone number to its last 10 digits
/// without the country code. Addresses which are not phone numbers, like
/// short codes, alphanumeric sender IDs, or emails, are left unchanged.
///
/// This function makes several assumptions and should be used with caution.
///
/// # Example:
///
/// ```
/// use textme_formats::util::addresses::normalize;
///
/// assert_eq!(normalize("+1 (123) 456-7890"), "1234567890");
/// assert_eq!(normalize("BANK-ALERTS"), "BANK-ALERTS");
/// ```
pub fn normalize(address: &str) -> String {
    let phone_shaped = address
        .chars()
        .all(|c| matches!(c, '0'..='9' | '(' | ')' | ' ' | '+' | '-'));

    if phone_shaped {
        let digits: String = address.chars().filter(char::is_ascii_digit).collect();
        digits[digits.len().saturating_sub(10)..].to_string()
    } else {
        address.to_string()
    }
}
