//! 정적 룩업 테이블
//!
//! VIN 접두사와 문자 코드를 차량 속성으로 매핑하는 순수 데이터입니다.
//! 모든 테이블은 선형 탐색되며 먼저 등록된 엔트리가 우선합니다.
//!
//! | 테이블 | 키 |
//! |---|---|
//! | 지역별 WMI | 앞 3자리, 없으면 앞 2자리 |
//! | 모델/차체 | 앞 4자리 (WMI + VDS 첫 문자) |
//! | 엔진 | (제조사, 8번째 문자) |
//! | 트림 | (제조사, 7번째 문자) |
//! | 닛산 엔진 / 트림 | 5번째 문자 / 7번째 문자 |
//! | 연식 | 10번째 문자 |

use junkyard_core::types::BodyType;

/// 테이블에 없는 모델/엔진/트림 자리표시자
pub const UNKNOWN: &str = "UNKNOWN";

/// 연식 코드를 해석할 수 없을 때의 기본 연식
pub const DEFAULT_MODEL_YEAR: i32 = 2000;

/// 닛산 전용 디코더로 보내는 2자리 접두사
pub const NISSAN_PREFIXES: &[&str] = &["1N", "3N", "5N", "JN"];

/// 닛산 제조사명
pub const NISSAN: &str = "NISSAN";

/// 연식 문자 코드 (2010년부터 순서대로, I/O/Q/U/Z 제외)
const YEAR_LETTERS: &str = "ABCDEFGHJKLMNPRSTVWXY";

/// 모델 테이블 엔트리
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelEntry {
    pub prefix: &'static str,
    pub model: &'static str,
    pub body: BodyType,
}

const fn model(prefix: &'static str, model: &'static str, body: BodyType) -> ModelEntry {
    ModelEntry {
        prefix,
        model,
        body,
    }
}

// --- WMI → 제조사 ---

pub const US_WMI: &[(&str, &str)] = &[
    ("1FA", "FORD"),
    ("1FT", "FORD"),
    ("1FM", "FORD"),
    ("1G1", "CHEVROLET"),
    ("1GC", "CHEVROLET"),
    ("1GN", "CHEVROLET"),
    ("1GT", "GMC"),
    ("1HG", "HONDA"),
    ("1J4", "JEEP"),
    ("1C4", "JEEP"),
    ("1C6", "RAM"),
    ("1D7", "DODGE"),
    ("1N4", "NISSAN"),
    ("1N6", "NISSAN"),
    ("4T1", "TOYOTA"),
    ("4S4", "SUBARU"),
    ("4JG", "MERCEDES-BENZ"),
    ("5YJ", "TESLA"),
    ("5FN", "HONDA"),
    ("5TD", "TOYOTA"),
    ("5TF", "TOYOTA"),
    ("5UX", "BMW"),
    ("5N1", "NISSAN"),
    ("1G", "GENERAL MOTORS"),
    ("1F", "FORD"),
];

pub const JAPAN_WMI: &[(&str, &str)] = &[
    ("JHM", "HONDA"),
    ("JT2", "TOYOTA"),
    ("JTD", "TOYOTA"),
    ("JTE", "TOYOTA"),
    ("JTM", "TOYOTA"),
    ("JTH", "LEXUS"),
    ("JF1", "SUBARU"),
    ("JF2", "SUBARU"),
    ("JM1", "MAZDA"),
    ("JM3", "MAZDA"),
    ("JA3", "MITSUBISHI"),
    ("JA4", "MITSUBISHI"),
    ("JS2", "SUZUKI"),
    ("JN", "NISSAN"),
];

pub const GERMANY_WMI: &[(&str, &str)] = &[
    ("WBA", "BMW"),
    ("WBS", "BMW"),
    ("WDD", "MERCEDES-BENZ"),
    ("WDB", "MERCEDES-BENZ"),
    ("WDC", "MERCEDES-BENZ"),
    ("WAU", "AUDI"),
    ("WA1", "AUDI"),
    ("WVW", "VOLKSWAGEN"),
    ("WVG", "VOLKSWAGEN"),
    ("WP0", "PORSCHE"),
    ("WP1", "PORSCHE"),
    ("WF0", "FORD"),
];

pub const KOREA_WMI: &[(&str, &str)] = &[
    ("KMH", "HYUNDAI"),
    ("KM8", "HYUNDAI"),
    ("MAL", "HYUNDAI"),
    ("KNA", "KIA"),
    ("KND", "KIA"),
    ("KL", "CHEVROLET"),
];

// --- 모델/차체 (앞 4자리) ---

pub const MODELS: &[ModelEntry] = &[
    model("1FTF", "F-150", BodyType::Truck),
    model("1FTE", "F-150", BodyType::Truck),
    model("1FM5", "EXPLORER", BodyType::Suv),
    model("1FAD", "FOCUS", BodyType::Car),
    model("1FA6", "MUSTANG", BodyType::Car),
    model("1GCU", "SILVERADO", BodyType::Truck),
    model("1G1Z", "MALIBU", BodyType::Car),
    model("1G1F", "CAMARO", BodyType::Car),
    model("1GNS", "TAHOE", BodyType::Suv),
    model("1GTU", "SIERRA", BodyType::Truck),
    model("1HGC", "ACCORD", BodyType::Car),
    model("1HGF", "CIVIC", BodyType::Car),
    model("5FNY", "PILOT", BodyType::Suv),
    model("5FNR", "ODYSSEY", BodyType::Van),
    model("4T1B", "CAMRY", BodyType::Car),
    model("5TFN", "TACOMA", BodyType::Truck),
    model("5TDK", "HIGHLANDER", BodyType::Suv),
    model("1D7H", "RAM 1500", BodyType::Truck),
    model("1C6R", "RAM 1500", BodyType::Truck),
    model("1C4R", "GRAND CHEROKEE", BodyType::Suv),
    model("1J4G", "GRAND CHEROKEE", BodyType::Suv),
    model("5YJ3", "MODEL 3", BodyType::Car),
    model("5YJS", "MODEL S", BodyType::Car),
    model("5YJY", "MODEL Y", BodyType::Suv),
    model("4S4B", "OUTBACK", BodyType::Suv),
    model("5UXK", "X5", BodyType::Suv),
    model("4JGD", "GLE", BodyType::Suv),
    model("JHMC", "ACCORD", BodyType::Car),
    model("JHMF", "CIVIC", BodyType::Car),
    model("JT2B", "CAMRY", BodyType::Car),
    model("JTDK", "PRIUS", BodyType::Car),
    model("JTEB", "4RUNNER", BodyType::Suv),
    model("JTMB", "RAV4", BodyType::Suv),
    model("JTHB", "ES 350", BodyType::Car),
    model("JF1G", "IMPREZA", BodyType::Car),
    model("JF2S", "FORESTER", BodyType::Suv),
    model("JM1B", "MAZDA3", BodyType::Car),
    model("JM3K", "CX-5", BodyType::Suv),
    model("JA3A", "LANCER", BodyType::Car),
    model("JA4A", "OUTLANDER", BodyType::Suv),
    model("JS2Y", "SX4", BodyType::Car),
    model("WBA3", "3 SERIES", BodyType::Car),
    model("WBA5", "5 SERIES", BodyType::Car),
    model("WBSW", "M3", BodyType::Car),
    model("WDDG", "C-CLASS", BodyType::Car),
    model("WDDH", "E-CLASS", BodyType::Car),
    model("WDC0", "GLC", BodyType::Suv),
    model("WDB9", "SPRINTER", BodyType::Van),
    model("WAUA", "A4", BodyType::Car),
    model("WA1L", "Q5", BodyType::Suv),
    model("WVWZ", "JETTA", BodyType::Car),
    model("WVGA", "TIGUAN", BodyType::Suv),
    model("WP0A", "911", BodyType::Car),
    model("WP1A", "CAYENNE", BodyType::Suv),
    model("WF0X", "FOCUS", BodyType::Car),
    model("KMHD", "ELANTRA", BodyType::Car),
    model("KMHE", "SONATA", BodyType::Car),
    model("KM8J", "TUCSON", BodyType::Suv),
    model("KM8S", "SANTA FE", BodyType::Suv),
    model("KNAD", "RIO", BodyType::Car),
    model("KNAF", "FORTE", BodyType::Car),
    model("KNDJ", "SOUL", BodyType::Car),
    model("KNDM", "SEDONA", BodyType::Van),
    model("KL1T", "AVEO", BodyType::Car),
];

// --- 엔진: (제조사, 8번째 문자) ---

pub const ENGINES: &[(&str, char, &str)] = &[
    ("FORD", '5', "5.0L V8"),
    ("FORD", 'E', "3.5L V6 ECOBOOST"),
    ("FORD", 'G', "2.7L V6 ECOBOOST"),
    ("FORD", 'P', "2.0L I4"),
    ("FORD", 'D', "2.3L I4 ECOBOOST"),
    ("CHEVROLET", 'C', "5.3L V8"),
    ("CHEVROLET", 'K', "5.3L V8"),
    ("CHEVROLET", 'B', "1.5L I4 TURBO"),
    ("CHEVROLET", 'X', "3.6L V6"),
    ("GMC", 'C', "5.3L V8"),
    ("HONDA", '2', "1.8L I4"),
    ("HONDA", '3', "2.4L I4"),
    ("HONDA", '6', "3.0L V6"),
    ("HONDA", '5', "3.5L V6"),
    ("TOYOTA", 'K', "2.5L I4"),
    ("TOYOTA", 'E', "3.5L V6"),
    ("TOYOTA", 'F', "2.7L I4"),
    ("TOYOTA", 'U', "1.8L I4 HYBRID"),
    ("LEXUS", 'Z', "3.5L V6"),
    ("JEEP", 'G', "3.6L V6"),
    ("JEEP", 'T', "5.7L V8 HEMI"),
    ("RAM", 'T', "5.7L V8 HEMI"),
    ("DODGE", 'T', "5.7L V8 HEMI"),
    ("DODGE", 'N', "4.7L V8"),
    ("SUBARU", 'C', "2.5L H4"),
    ("SUBARU", 'G', "2.0L H4"),
    ("MAZDA", 'L', "2.5L I4 SKYACTIV"),
    ("MITSUBISHI", 'U', "2.0L I4"),
    ("SUZUKI", 'B', "2.0L I4"),
    ("TESLA", 'A', "ELECTRIC SINGLE MOTOR"),
    ("TESLA", 'B', "ELECTRIC DUAL MOTOR"),
    ("BMW", 'A', "2.0L I4 TURBO"),
    ("BMW", 'C', "3.0L I6 TURBO"),
    ("MERCEDES-BENZ", 'B', "2.0L I4 TURBO"),
    ("MERCEDES-BENZ", 'E', "3.0L V6 TURBO"),
    ("AUDI", 'F', "2.0L I4 TFSI"),
    ("VOLKSWAGEN", 'A', "2.0L I4 TSI"),
    ("VOLKSWAGEN", 'C', "1.8L I4 TSI"),
    ("PORSCHE", 'A', "3.0L H6 TURBO"),
    ("HYUNDAI", 'D', "2.0L I4"),
    ("HYUNDAI", 'E', "2.4L I4"),
    ("KIA", 'C', "2.4L I4"),
    ("KIA", 'E', "2.0L I4"),
];

// --- 트림: (제조사, 7번째 문자) ---

pub const TRIMS: &[(&str, char, &str)] = &[
    ("FORD", 'C', "XL"),
    ("FORD", 'E', "XLT"),
    ("FORD", 'W', "LARIAT"),
    ("FORD", 'P', "SE"),
    ("CHEVROLET", '1', "LS"),
    ("CHEVROLET", '2', "LT"),
    ("CHEVROLET", '5', "LTZ"),
    ("HONDA", '2', "EX"),
    ("HONDA", '4', "LX"),
    ("HONDA", '8', "EX-L"),
    ("TOYOTA", 'E', "LE"),
    ("TOYOTA", 'F', "SE"),
    ("TOYOTA", 'K', "XLE"),
    ("TESLA", 'E', "STANDARD RANGE"),
    ("TESLA", 'F', "LONG RANGE"),
    ("TESLA", 'G', "PERFORMANCE"),
    ("BMW", '3', "328I"),
    ("BMW", '5', "M SPORT"),
    ("MERCEDES-BENZ", '4', "4MATIC"),
    ("VOLKSWAGEN", '7', "SE"),
    ("VOLKSWAGEN", '2', "S"),
    ("HYUNDAI", '4', "GLS"),
    ("HYUNDAI", 'F', "SE"),
    ("KIA", '4', "LX"),
    ("KIA", '5', "EX"),
    ("SUBARU", 'A', "PREMIUM"),
    ("SUBARU", 'B', "LIMITED"),
];

// --- 닛산 전용 ---

pub const NISSAN_MODELS: &[ModelEntry] = &[
    model("1N4A", "ALTIMA", BodyType::Car),
    model("1N4B", "MAXIMA", BodyType::Car),
    model("3N1A", "SENTRA", BodyType::Car),
    model("3N1C", "VERSA", BodyType::Car),
    model("1N6A", "TITAN", BodyType::Truck),
    model("1N6B", "FRONTIER", BodyType::Truck),
    model("1N6D", "FRONTIER", BodyType::Truck),
    model("5N1A", "PATHFINDER", BodyType::Suv),
    model("5N1B", "MURANO", BodyType::Suv),
    model("JN8A", "ROGUE", BodyType::Suv),
    model("JN1A", "370Z", BodyType::Car),
    model("JN1C", "LEAF", BodyType::Car),
];

/// 닛산 엔진 (5번째 문자)
pub const NISSAN_ENGINES: &[(char, &str)] = &[
    ('L', "2.5L I4 QR25DE"),
    ('B', "1.8L I4 MR18DE"),
    ('C', "1.6L I4 HR16DE"),
    ('R', "3.5L V6 VQ35DE"),
    ('A', "5.6L V8 VK56DE"),
    ('D', "4.0L V6 VQ40DE"),
    ('Z', "ELECTRIC EM57"),
];

/// 닛산 트림 (7번째 문자)
pub const NISSAN_TRIMS: &[(char, &str)] = &[
    ('A', "S"),
    ('B', "SV"),
    ('C', "SL"),
    ('D', "SR"),
    ('E', "PLATINUM"),
    ('N', "NISMO"),
];

// --- 범용 디코더 ---

/// 첫 문자 → 제조사 추정
pub const GENERIC_MAKES: &[(char, &str)] = &[
    ('1', "CHEVROLET"),
    ('2', "FORD"),
    ('3', "VOLKSWAGEN"),
    ('4', "HONDA"),
    ('5', "TOYOTA"),
    ('J', "TOYOTA"),
    ('K', "HYUNDAI"),
    ('S', "LAND ROVER"),
    ('V', "RENAULT"),
    ('W', "VOLKSWAGEN"),
    ('Y', "VOLVO"),
    ('Z', "FIAT"),
];

/// 제조사별 모델 후보
pub const GENERIC_MODELS: &[(&str, &[&str])] = &[
    ("FORD", &["F-150", "EXPLORER", "FOCUS", "MUSTANG"]),
    ("CHEVROLET", &["SILVERADO", "EQUINOX", "MALIBU", "CAMARO"]),
    ("TOYOTA", &["CAMRY", "COROLLA", "RAV4", "TACOMA"]),
    ("HONDA", &["CIVIC", "ACCORD", "CR-V", "PILOT"]),
    ("DODGE", &["CHARGER", "CHALLENGER", "DURANGO", "RAM 1500"]),
    ("VOLKSWAGEN", &["JETTA", "PASSAT", "GOLF", "TIGUAN"]),
    ("HYUNDAI", &["ELANTRA", "SONATA", "TUCSON", "SANTA FE"]),
    ("LAND ROVER", &["RANGE ROVER", "DISCOVERY", "DEFENDER"]),
    ("RENAULT", &["CLIO", "MEGANE", "CAPTUR"]),
    ("VOLVO", &["XC90", "S60", "V70"]),
    ("FIAT", &["500", "PANDA", "PUNTO"]),
];

/// 제조사를 추정할 수 없을 때의 모델 후보
pub const GENERIC_FALLBACK_MODELS: &[&str] = &["SEDAN", "HATCHBACK", "WAGON", "COUPE"];

pub const GENERIC_ENGINES: &[&str] = &["V6 3.5L", "V8 5.0L", "I4 2.0L", "V6 3.0L"];

pub const GENERIC_TRIMS: &[&str] = &["Base", "LT", "Sport", "Limited"];

pub const GENERIC_COLORS: &[&str] = &["Black", "White", "Silver", "Red", "Blue"];

// --- 조회 함수 ---

/// 접두사 테이블에서 제조사를 찾습니다 (3자리 우선, 그다음 2자리).
pub fn lookup_wmi(table: &[(&str, &'static str)], vin: &str) -> Option<&'static str> {
    [3usize, 2]
        .into_iter()
        .filter_map(|len| vin.get(..len))
        .find_map(|prefix| {
            table
                .iter()
                .find(|(key, _)| *key == prefix)
                .map(|(_, make)| *make)
        })
}

/// 앞 4자리로 모델 엔트리를 찾습니다.
pub fn lookup_model(table: &'static [ModelEntry], vin: &str) -> Option<&'static ModelEntry> {
    let prefix = vin.get(..4)?;
    table.iter().find(|entry| entry.prefix == prefix)
}

/// (제조사, 문자) 키 테이블을 조회합니다.
pub fn lookup_keyed(
    table: &[(&str, char, &'static str)],
    make: &str,
    code: char,
) -> Option<&'static str> {
    table
        .iter()
        .find(|(m, c, _)| *c == code && m.eq_ignore_ascii_case(make))
        .map(|(_, _, value)| *value)
}

/// 문자 키 테이블을 조회합니다.
pub fn lookup_char(table: &[(char, &'static str)], code: char) -> Option<&'static str> {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, value)| *value)
}

/// 10번째 문자의 연식 코드를 해석합니다.
///
/// `'1'..='9'` → 2001–2009, `A`–`Y`(I/O/Q/U/Z 제외) → 2010–2030.
/// 해석할 수 없으면 `None` 입니다.
pub fn model_year(code: char) -> Option<i32> {
    if let Some(digit) = code.to_digit(10) {
        return (digit >= 1).then(|| 2000 + digit as i32);
    }
    YEAR_LETTERS
        .chars()
        .position(|c| c == code)
        .map(|idx| 2010 + idx as i32)
}

/// 연식 코드를 해석하고, 실패 시 [`DEFAULT_MODEL_YEAR`]를 반환합니다.
pub fn model_year_or_default(code: Option<char>) -> i32 {
    code.and_then(model_year).unwrap_or(DEFAULT_MODEL_YEAR)
}

/// 범용 디코더용 제조사 추정
pub fn generic_make(first: char) -> &'static str {
    lookup_char(GENERIC_MAKES, first).unwrap_or(UNKNOWN)
}

/// 범용 디코더용 모델 후보
pub fn generic_models(make: &str) -> &'static [&'static str] {
    GENERIC_MODELS
        .iter()
        .find(|(m, _)| *m == make)
        .map(|(_, models)| *models)
        .unwrap_or(GENERIC_FALLBACK_MODELS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_codes_cover_digits_and_letters() {
        assert_eq!(model_year('1'), Some(2001));
        assert_eq!(model_year('9'), Some(2009));
        assert_eq!(model_year('A'), Some(2010));
        assert_eq!(model_year('L'), Some(2020));
        assert_eq!(model_year('Y'), Some(2030));
    }

    #[test]
    fn unrecognized_year_codes_default() {
        for code in ['0', 'U', 'Z', 'I', 'O', 'Q'] {
            assert_eq!(model_year(code), None, "code {code}");
        }
        assert_eq!(model_year_or_default(Some('U')), DEFAULT_MODEL_YEAR);
        assert_eq!(model_year_or_default(None), DEFAULT_MODEL_YEAR);
    }

    #[test]
    fn year_letters_are_unique_and_span_21_years() {
        let letters: Vec<char> = YEAR_LETTERS.chars().collect();
        assert_eq!(letters.len(), 21);
        let mut sorted = letters.clone();
        sorted.dedup();
        assert_eq!(sorted.len(), letters.len());
    }

    #[test]
    fn wmi_prefers_three_char_match() {
        assert_eq!(lookup_wmi(US_WMI, "1FTFW1E50JFA00000"), Some("FORD"));
        assert_eq!(lookup_wmi(US_WMI, "1GNSK00000000000"), Some("CHEVROLET"));
        // 3자리 엔트리가 없으면 2자리
        assert_eq!(lookup_wmi(US_WMI, "1GZ00000000000000"), Some("GENERAL MOTORS"));
        assert_eq!(lookup_wmi(KOREA_WMI, "KL1TD5DE0BB000000"), Some("CHEVROLET"));
        assert_eq!(lookup_wmi(GERMANY_WMI, "WXX00000000000000"), None);
    }

    #[test]
    fn keyed_lookup_is_case_insensitive_on_make() {
        assert_eq!(lookup_keyed(ENGINES, "honda", '3'), Some("2.4L I4"));
        assert_eq!(lookup_keyed(ENGINES, "HONDA", '#'), None);
    }

    #[test]
    fn model_prefixes_are_four_chars_and_unique() {
        for table in [MODELS, NISSAN_MODELS] {
            for (i, entry) in table.iter().enumerate() {
                assert_eq!(entry.prefix.len(), 4, "{}", entry.prefix);
                assert!(
                    table[i + 1..].iter().all(|e| e.prefix != entry.prefix),
                    "duplicate prefix {}",
                    entry.prefix
                );
            }
        }
    }

    #[test]
    fn generic_models_fall_back_for_unknown_make() {
        assert_eq!(generic_models("FORD").len(), 4);
        assert_eq!(generic_models(UNKNOWN), GENERIC_FALLBACK_MODELS);
        assert_eq!(generic_make('Q'), UNKNOWN);
    }
}
