//! Structured-to-scalar encoding for flat SQLite cells.

/// Encodes a list of strings as a JSON array cell. The empty list encodes
/// to `"[]"`, never NULL, so decode never fails on an empty collection.
pub fn encode_list(values: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(values)
}

pub fn decode_list(cell: &str) -> Result<Vec<String>, serde_json::Error> {
    serde_json::from_str(cell)
}

pub fn encode_bool(value: bool) -> i64 {
    i64::from(value)
}

/// Any nonzero cell decodes as true.
pub fn decode_bool(cell: i64) -> bool {
    cell != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_round_trips() {
        for values in [
            vec![],
            vec!["09:00".to_string(), "18:00".to_string()],
            vec!["с пробелом".to_string(), "a,b".to_string(), "\"q\"".to_string()],
        ] {
            let cell = encode_list(&values).unwrap();
            assert_eq!(decode_list(&cell).unwrap(), values);
        }
    }

    #[test]
    fn empty_list_is_an_explicit_marker() {
        assert_eq!(encode_list(&[]).unwrap(), "[]");
    }

    #[test]
    fn bool_round_trips() {
        assert_eq!(encode_bool(false), 0);
        assert_eq!(encode_bool(true), 1);
        assert!(!decode_bool(encode_bool(false)));
        assert!(decode_bool(encode_bool(true)));
    }

    #[test]
    fn any_nonzero_decodes_true() {
        assert!(decode_bool(7));
        assert!(decode_bool(-1));
    }
}
