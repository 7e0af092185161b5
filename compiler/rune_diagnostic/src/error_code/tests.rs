use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E2001.to_string(), "E2001");
    assert_eq!(ErrorCode::E5003.as_str(), "E5003");
}

#[test]
fn test_error_code_ranges() {
    assert!(ErrorCode::E2004.is_type_error());
    assert!(!ErrorCode::E2004.is_call_error());
    assert!(ErrorCode::E3002.is_call_error());
    assert!(ErrorCode::E4004.is_transformer_error());
    assert!(ErrorCode::E5001.is_unresolved());
    assert!(!ErrorCode::E5001.is_type_error());
    assert!(ErrorCode::E9001.is_internal_error());
}

#[test]
fn test_parse_round_trips_all_codes() {
    for code in ErrorCode::ALL {
        assert_eq!(code.as_str().parse::<ErrorCode>(), Ok(*code));
    }
    assert_eq!("e3001".parse::<ErrorCode>(), Ok(ErrorCode::E3001));
    assert_eq!("E0000".parse::<ErrorCode>(), Err(()));
}
