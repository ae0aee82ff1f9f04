use super::*;
use std::str::FromStr;

#[test]
fn test_typed_id_new() {
    let id = VoucherId::new(42);
    assert_eq!(id.into_inner(), 42);
}

#[test]
fn test_typed_id_from_i64() {
    let id: CompanyId = 7.into();
    assert_eq!(id, CompanyId(7));
}

#[test]
fn test_typed_id_display() {
    let id = BranchId::new(12);
    assert_eq!(format!("{}", id), "12");
}

#[test]
fn test_typed_id_from_str() {
    assert_eq!(CompanyId::from_str("15").unwrap(), CompanyId(15));
    assert_eq!(CompanyId::from_str(" 15 ").unwrap(), CompanyId(15));
}

#[test]
fn test_typed_id_from_str_error() {
    assert!(CompanyId::from_str("ACME").is_err());
    assert!(CompanyId::from_str("").is_err());
    assert!(CompanyId::from_str("1.5").is_err());
}

#[test]
fn test_typed_id_ordering() {
    assert!(VoucherId(1) < VoucherId(2));
}
