/// String helpers shared by the user entity and the registration DTOs.
///
/// Brazilian conventions: CPF and phone numbers are stored digits-only and
/// formatted on the way out, personal names are title-cased with the usual
/// Portuguese connector words kept lowercase.

/// Connector words that stay lowercase inside a name ("João da Silva").
const NAME_CONNECTORS: [&str; 8] = ["da", "de", "do", "di", "dos", "das", "e", "d'"];

/// Symbols accepted by the password complexity rule.
const PASSWORD_SYMBOLS: &str = "@#$%^&+=!";

/// Title-case a full name: every word gets an uppercase initial except the
/// connector words, which stay lowercase unless they are the very first word.
/// Repeated spaces are collapsed. Empty or whitespace-only input yields "".
pub fn format_name(raw: &str) -> String {
    let mut parts: Vec<String> = Vec::new();
    for (i, word) in raw.split(' ').enumerate() {
        let word = word.trim();
        if word.is_empty() {
            continue;
        }
        let lowered = word.to_lowercase();
        if i != 0 && NAME_CONNECTORS.contains(&lowered.as_str()) {
            parts.push(lowered);
        } else {
            parts.push(titlecase(word));
        }
    }
    parts.join(" ")
}

fn titlecase(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Strip a phone number down to its digits (DDD + number). A single leftover
/// digit is a form-widget artifact and is coerced to empty.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.trim().chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 1 { String::new() } else { digits }
}

/// Format a digits-only phone for display:
/// 10 digits -> (DD)NNNN-NNNN (landline), 11 digits -> (DD)N.NNNN-NNNN.
/// Anything else is returned unchanged.
pub fn format_phone(digits: &str) -> String {
    match digits.len() {
        10 => format!("({}){}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        11 => format!("({}){}.{}-{}", &digits[..2], &digits[2..3], &digits[3..7], &digits[7..]),
        _ => digits.to_string(),
    }
}

/// Strip a CPF down to its 11 digits.
pub fn normalize_cpf(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format a digits-only CPF as NNN.NNN.NNN-NN; other lengths pass through.
pub fn format_cpf(digits: &str) -> String {
    if digits.len() == 11 && digits.chars().all(|c| c.is_ascii_digit()) {
        format!("{}.{}.{}-{}", &digits[..3], &digits[3..6], &digits[6..9], &digits[9..])
    } else {
        digits.to_string()
    }
}

/// Validate a CPF with the standard mod-11 check digits.
/// Input may be formatted or not; repeated-digit sequences are rejected.
pub fn validate_cpf(raw: &str) -> bool {
    let cpf = normalize_cpf(raw);
    if cpf.len() != 11 {
        return false;
    }
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.windows(2).all(|w| w[0] == w[1]) {
        return false;
    }
    let check = |count: usize| -> u32 {
        let sum: u32 = digits[..count]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (count as u32 + 1 - i as u32))
            .sum();
        let rest = (sum * 10) % 11;
        if rest == 10 { 0 } else { rest }
    };
    check(9) == digits[9] && check(10) == digits[10]
}

/// Strip a birth date down to its digits (stored as ddmmyyyy).
pub fn normalize_birth_date(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Format a digits-only birth date as dd/mm/yyyy; other lengths pass through.
pub fn format_birth_date(digits: &str) -> String {
    if digits.len() == 8 && digits.chars().all(|c| c.is_ascii_digit()) {
        format!("{}/{}/{}", &digits[..2], &digits[2..4], &digits[4..])
    } else {
        digits.to_string()
    }
}

/// Uppercase only the first character, leaving the rest untouched.
/// Used to normalize role names on write.
pub fn capitalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase-trim an email address for storage.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Password rule: at least 8 chars with an uppercase letter, a lowercase
/// letter, a digit and one of `@#$%^&+=!`.
pub fn validate_password_strength(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_name_connectors_stay_lowercase() {
        assert_eq!(format_name("joão  da  silva"), "João da Silva");
        assert_eq!(format_name("MARIA DE souza E lima"), "Maria de Souza e Lima");
    }

    #[test]
    fn test_format_name_first_word_is_always_titlecased() {
        assert_eq!(format_name("da silva"), "Da Silva");
    }

    #[test]
    fn test_format_name_fails_soft() {
        assert_eq!(format_name(""), "");
        assert_eq!(format_name("   "), "");
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("(92) 9.9999-8888"), "92999998888");
        assert_eq!(normalize_phone("  (92) 3333-4444 "), "9233334444");
        // lone digit left behind by the form widget
        assert_eq!(normalize_phone("0"), "");
    }

    #[test]
    fn test_format_phone_ten_digits() {
        assert_eq!(format_phone("9233334444"), "(92)3333-4444");
    }

    #[test]
    fn test_format_phone_eleven_digits() {
        assert_eq!(format_phone("92999998888"), "(92)9.9999-8888");
    }

    #[test]
    fn test_format_phone_other_lengths_pass_through() {
        assert_eq!(format_phone("1234"), "1234");
        assert_eq!(format_phone(""), "");
    }

    #[test]
    fn test_cpf_round_trip() {
        let inputs = ["529.982.247-25", "52998224725", "111aaa444777-35"];
        for raw in inputs {
            let clean = normalize_cpf(raw);
            assert_eq!(normalize_cpf(&format_cpf(&clean)), clean);
        }
        assert_eq!(format_cpf("52998224725"), "529.982.247-25");
    }

    #[test]
    fn test_validate_cpf() {
        assert!(validate_cpf("529.982.247-25"));
        assert!(validate_cpf("52998224725"));
        assert!(!validate_cpf("52998224724"));
        assert!(!validate_cpf("11111111111"));
        assert!(!validate_cpf("123"));
    }

    #[test]
    fn test_birth_date_round_trip() {
        assert_eq!(normalize_birth_date("01/12/1990"), "01121990");
        assert_eq!(format_birth_date("01121990"), "01/12/1990");
        assert_eq!(format_birth_date("1990"), "1990");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("administrador"), "Administrador");
        assert_eq!(capitalize("  gerente"), "Gerente");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Fulano@Email.COM "), "fulano@email.com");
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password_strength("Minha$enha1"));
        assert!(!validate_password_strength("short1!"));
        assert!(!validate_password_strength("semnumero@A"));
        assert!(!validate_password_strength("SEMMINUSCULA1!"));
        assert!(!validate_password_strength("semsimbolo1A"));
    }
}
