use super::*;
use pretty_assertions::assert_eq;

#[test]
fn modifiers_drop_derived_bits() {
    let flags = TypeFlags::SECRET | TypeFlags::CONCRETE | TypeFlags::IS_NUMBER;
    assert_eq!(flags.modifiers(), TypeFlags::SECRET);
}

#[test]
fn default_is_empty() {
    assert_eq!(TypeFlags::default(), TypeFlags::empty());
    assert!(!TypeFlags::default().is_concrete());
}

#[test]
fn queries() {
    let flags = TypeFlags::NULLABLE | TypeFlags::CONCRETE;
    assert!(flags.is_nullable());
    assert!(flags.is_concrete());
    assert!(!flags.is_secret());
}
