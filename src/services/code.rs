use rand::{RngCore, rngs::OsRng};

pub const CODE_LEN: usize = 6;

/// Upper-case RFC 4648 base-32: no 0/O or 1/I look-alikes.
const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> Result<String, rand::Error>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> Result<String, rand::Error> {
        let mut bytes = [0u8; CODE_LEN];
        OsRng.try_fill_bytes(&mut bytes)?;
        // 256 is a multiple of 32, so the low five bits are uniform.
        Ok(bytes
            .iter()
            .map(|b| ALPHABET[(b & 0x1F) as usize] as char)
            .collect())
    }
}

pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LEN && code.bytes().all(|b| ALPHABET.contains(&b))
}

/// Join codes are typed by hand; accept surrounding spaces and lower case.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{CodeGenerator, RandomCodeGenerator, is_valid_code, normalize_code};

    #[test]
    fn generated_codes_use_base32_alphabet() {
        let generator = RandomCodeGenerator;
        for _ in 0..500 {
            let code = generator.generate().expect("os rng should work");
            assert!(is_valid_code(&code), "bad code {code}");
        }
    }

    #[test]
    fn generated_codes_vary() {
        let generator = RandomCodeGenerator;
        let codes: HashSet<String> = (0..200)
            .map(|_| generator.generate().expect("os rng should work"))
            .collect();
        assert!(codes.len() > 190);
    }

    #[test]
    fn validity_check_rejects_lookalikes_and_wrong_length() {
        assert!(is_valid_code("ABC234"));
        assert!(!is_valid_code("ABC23"));
        assert!(!is_valid_code("ABC2345"));
        assert!(!is_valid_code("ABC0O1"));
        assert!(!is_valid_code("abc234"));
    }

    #[test]
    fn normalizes_hand_typed_codes() {
        assert_eq!(normalize_code("  abc234 "), "ABC234");
    }
}
