#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::CoercionError;
use pretty_assertions::assert_eq;

#[test]
fn test_builtins_are_registered_singletons() {
    assert_eq!(int32(), int32());
    assert_eq!(crate::lookup(INT32_NAME).unwrap(), int32());
    assert_eq!(crate::lookup(STRING_NAME).unwrap(), string());
    assert_ne!(int32(), int64());
}

#[test]
fn test_builtins_validate_their_tag() {
    assert!(int32().validate(&Data::Int32(1)));
    assert!(!int32().validate(&Data::Int64(1)));
    assert!(int64().validate(&Data::Int64(1)));
    assert!(boolean().validate(&Data::Bool(false)));
    assert!(!boolean().validate(&Data::Int32(0)));
    assert!(string().validate(&Data::from("s")));
    assert!(!string().validate(&Data::opaque(1u8)));
}

#[test]
fn test_widening_and_narrowing() {
    let wide = int32().coerce(&int64(), &Data::Int32(-7)).unwrap();
    assert_eq!(wide.as_i64(), Some(-7));

    let narrow = int64().coerce(&int32(), &Data::Int64(12)).unwrap();
    assert_eq!(narrow.as_i32(), Some(12));

    let overflow = int64().try_coerce(&int32(), &Data::Int64(i64::MAX));
    assert!(matches!(overflow, Err(CoercionError::ConversionFailed { .. })));
}

#[test]
fn test_string_conversions() {
    assert_eq!(
        int32().coerce(&string(), &Data::Int32(42)).unwrap().as_str(),
        Some("42")
    );
    assert_eq!(
        boolean().coerce(&string(), &Data::Bool(true)).unwrap().as_str(),
        Some("true")
    );
    assert_eq!(
        string().coerce(&int64(), &Data::from(" 9000 ")).unwrap().as_i64(),
        Some(9000)
    );
    assert!(string().coerce(&int64(), &Data::from("nine")).is_none());
    assert_eq!(
        string().coerce(&boolean(), &Data::from("false")).unwrap().as_bool(),
        Some(false)
    );
}

#[test]
fn test_multi_hop_builtin_paths() {
    // bool -> i32 -> i64
    assert_eq!(boolean().shortest_distance(&int64(), 8), Some(1));
    assert_eq!(
        boolean().coerce(&int64(), &Data::Bool(true)).unwrap().as_i64(),
        Some(1)
    );
    // string -> i64 -> i32
    assert_eq!(
        string().coerce(&int32(), &Data::from("-3")).unwrap().as_i32(),
        Some(-3)
    );
}
