//! VIN(차대번호) 타입과 형식 검증
//!
//! [`Vin`]은 검증을 통과한 17자 VIN만 표현합니다. 생성 경로는 [`Vin::parse`] 하나뿐이며,
//! 입력은 앞뒤 공백을 제거하고 대문자로 정규화한 뒤 검사합니다.
//!
//! # 형식 규칙
//! - 정확히 17자
//! - 숫자 `0-9` 와 대문자 `A-Z` 중 `I`, `O`, `Q` 를 제외한 문자만 허용

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// VIN 길이
pub const VIN_LENGTH: usize = 17;

/// 검증된 VIN
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Vin(String);

impl Vin {
    /// 문자열을 정규화(trim + 대문자)하고 VIN 형식을 검증합니다.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_uppercase();

        let len = normalized.chars().count();
        if len != VIN_LENGTH {
            return Err(ValidationError::VinLength { len });
        }

        if let Some((idx, ch)) = normalized
            .chars()
            .enumerate()
            .find(|(_, c)| !is_vin_char(*c))
        {
            return Err(ValidationError::VinCharacter {
                ch,
                position: idx + 1,
            });
        }

        Ok(Self(normalized))
    }

    /// 형식 검증만 수행합니다.
    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }

    /// VIN 문자열을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 1부터 시작하는 위치의 문자를 반환합니다.
    pub fn char_at(&self, position: usize) -> Option<char> {
        position
            .checked_sub(1)
            .and_then(|idx| self.0.as_bytes().get(idx))
            .map(|b| char::from(*b))
    }

    /// 앞에서 `len`자 접두사를 반환합니다.
    pub fn prefix(&self, len: usize) -> &str {
        // 검증된 VIN은 ASCII 17자이므로 바이트 경계가 곧 문자 경계
        &self.0[..len.min(VIN_LENGTH)]
    }

    /// WMI(World Manufacturer Identifier, 앞 3자리)를 반환합니다.
    pub fn wmi(&self) -> &str {
        self.prefix(3)
    }

    /// 연식 코드(10번째 문자)를 반환합니다.
    pub fn model_year_code(&self) -> Option<char> {
        self.char_at(10)
    }
}

/// VIN에 허용되는 문자인지 확인합니다.
pub fn is_vin_char(c: char) -> bool {
    c.is_ascii_digit() || (c.is_ascii_uppercase() && !matches!(c, 'I' | 'O' | 'Q'))
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Vin {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Vin {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Vin> for String {
    fn from(vin: Vin) -> Self {
        vin.0
    }
}

impl AsRef<str> for Vin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_accepts_valid_vin() {
        let vin = Vin::parse("1N4AL3AP8JC231503").unwrap();
        assert_eq!(vin.as_str(), "1N4AL3AP8JC231503");
    }

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let vin = Vin::parse("  1hgcm82633a004352 \n").unwrap();
        assert_eq!(vin.as_str(), "1HGCM82633A004352");
    }

    #[test]
    fn parse_rejects_short_vin() {
        let err = Vin::parse("1HGCM8263").unwrap_err();
        assert_eq!(err, ValidationError::VinLength { len: 9 });
    }

    #[test]
    fn parse_rejects_excluded_letters() {
        let err = Vin::parse("1HGCM82633A00435O").unwrap_err();
        assert_eq!(
            err,
            ValidationError::VinCharacter {
                ch: 'O',
                position: 17
            }
        );
    }

    #[test]
    fn parse_rejects_lowercase_excluded_after_normalization() {
        assert!(Vin::parse("1hgcm82633a00435q").is_err());
    }

    #[test]
    fn parse_rejects_symbols() {
        assert!(Vin::parse("1HGCM8263-A004352").is_err());
    }

    #[test]
    fn accessors_use_one_based_positions() {
        let vin = Vin::parse("1N4AL3AP8JC231503").unwrap();
        assert_eq!(vin.char_at(1), Some('1'));
        assert_eq!(vin.char_at(10), Some('J'));
        assert_eq!(vin.char_at(0), None);
        assert_eq!(vin.char_at(18), None);
        assert_eq!(vin.wmi(), "1N4");
        assert_eq!(vin.prefix(4), "1N4A");
        assert_eq!(vin.model_year_code(), Some('J'));
    }

    #[test]
    fn serde_roundtrip_and_rejects_invalid() {
        let vin = Vin::parse("5YJ3E1EA7KF317000").unwrap();
        let json = serde_json::to_string(&vin).unwrap();
        assert_eq!(json, "\"5YJ3E1EA7KF317000\"");
        let back: Vin = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vin);

        assert!(serde_json::from_str::<Vin>("\"TOO-SHORT\"").is_err());
    }

    const VIN_ALPHABET: &str = "0123456789ABCDEFGHJKLMNPRSTUVWXYZ";

    proptest! {
        #[test]
        fn rejects_any_17_chars_containing_excluded_letter(
            base in proptest::collection::vec(proptest::sample::select(VIN_ALPHABET.chars().collect::<Vec<_>>()), 17),
            pos in 0usize..17,
            bad in proptest::sample::select(vec!['I', 'O', 'Q']),
        ) {
            let mut chars = base;
            chars[pos] = bad;
            let candidate: String = chars.into_iter().collect();
            prop_assert!(Vin::parse(&candidate).is_err());
        }

        #[test]
        fn rejects_any_length_other_than_17(
            chars in proptest::collection::vec(proptest::sample::select(VIN_ALPHABET.chars().collect::<Vec<_>>()), 0..40),
        ) {
            prop_assume!(chars.len() != VIN_LENGTH);
            let candidate: String = chars.into_iter().collect();
            prop_assert!(Vin::parse(&candidate).is_err());
        }

        #[test]
        fn accepts_any_17_chars_from_alphabet(
            chars in proptest::collection::vec(proptest::sample::select(VIN_ALPHABET.chars().collect::<Vec<_>>()), 17),
        ) {
            let candidate: String = chars.into_iter().collect();
            prop_assert!(Vin::parse(&candidate).is_ok());
        }
    }
}
