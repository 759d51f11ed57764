use crate::{
    decimal_to_unit, format_ether, format_ether_fixed, parse_ether, unit_to_decimal,
    unit_to_fixed, Amount, LedgerError, U256, WEI_PER_ETHER,
};

fn invalid(input: &str) -> bool {
    matches!(
        parse_ether(input),
        Err(LedgerError::InvalidAmountFormat { .. })
    )
}

#[test]
fn test_parse_one_and_a_half_ether() {
    let amount = parse_ether("1.5").unwrap();
    assert_eq!(amount, Amount::from_wei(1_500_000_000_000_000_000));
    assert_eq!(unit_to_decimal(amount, 18), "1.5");
}

#[test]
fn test_parse_whole_ether() {
    assert_eq!(parse_ether("15").unwrap(), Amount::from_wei(15 * WEI_PER_ETHER));
    assert_eq!(parse_ether("0").unwrap(), Amount::ZERO);
    assert_eq!(parse_ether("000.000").unwrap(), Amount::ZERO);
}

#[test]
fn test_one_wei_roundtrips() {
    let one_wei = parse_ether("0.000000000000000001").unwrap();
    assert_eq!(one_wei, Amount::from_wei(1));
    assert_eq!(unit_to_decimal(one_wei, 18), "0.000000000000000001");
    assert_eq!(parse_ether(&unit_to_decimal(one_wei, 18)).unwrap(), one_wei);
}

#[test]
fn test_nineteen_fractional_digits_rejected() {
    let err = parse_ether("1.0000000000000000001").unwrap_err();
    match err {
        LedgerError::InvalidAmountFormat { input, reason } => {
            assert_eq!(input, "1.0000000000000000001");
            assert_eq!(reason, "too many fractional digits");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_bare_point_forms() {
    assert_eq!(parse_ether(".5").unwrap(), Amount::from_wei(WEI_PER_ETHER / 2));
    assert_eq!(parse_ether("5.").unwrap(), Amount::from_wei(5 * WEI_PER_ETHER));
}

#[test]
fn test_malformed_inputs_rejected() {
    for input in [
        "", ".", "-1", "+1", "1e18", "1,5", " 1", "1 ", "1.2.3", "abc", "0x10", "١",
    ] {
        assert!(invalid(input), "{input:?} should be rejected");
    }
}

#[test]
fn test_out_of_range_rejected() {
    let huge = "1".repeat(70);
    assert!(invalid(&huge));
}

#[test]
fn test_format_trims_trailing_zeros() {
    assert_eq!(format_ether(Amount::from_ether(20)).as_str(), "20");
    assert_eq!(format_ether(Amount::ZERO).as_str(), "0");
    assert_eq!(
        format_ether(Amount::from_wei(8_500_000_000_000_000_000)).as_str(),
        "8.5"
    );
    assert_eq!(
        format_ether(Amount::from_wei(250_000_000_000_000_000)).as_str(),
        "0.25"
    );
}

#[test]
fn test_display_amount_parses_back() {
    let amount = parse_ether("12.345").unwrap();
    let display = format_ether(amount);
    assert_eq!(display.to_string(), "12.345");
    assert_eq!(display.parse(18).unwrap(), amount);
}

#[test]
fn test_fixed_rounds_half_up() {
    assert_eq!(format_ether_fixed(parse_ether("8.5").unwrap(), 2).as_str(), "8.50");
    assert_eq!(format_ether_fixed(parse_ether("1.005").unwrap(), 2).as_str(), "1.01");
    assert_eq!(format_ether_fixed(parse_ether("1.004999").unwrap(), 2).as_str(), "1.00");
    assert_eq!(format_ether_fixed(parse_ether("0.0001").unwrap(), 4).as_str(), "0.0001");
    assert_eq!(format_ether_fixed(Amount::ZERO, 2).as_str(), "0.00");
    assert_eq!(format_ether_fixed(parse_ether("2.5").unwrap(), 0).as_str(), "3");
}

#[test]
fn test_fixed_beyond_native_decimals_pads() {
    let one_wei = Amount::from_wei(1);
    assert_eq!(
        format_ether_fixed(one_wei, 20).as_str(),
        "0.00000000000000000100"
    );
}

#[test]
fn test_fixed_with_very_wide_places() {
    let rendered = format_ether_fixed(Amount::from_wei(1), 200);
    let (whole, fraction) = rendered.as_str().split_once('.').unwrap();
    assert_eq!(whole, "0");
    assert_eq!(fraction.len(), 200);
    assert_eq!(&fraction[..18], "000000000000000001");
    assert!(fraction[18..].chars().all(|c| c == '0'));
}

#[test]
fn test_fixed_with_very_large_decimals() {
    let max = Amount::new(U256::MAX);
    assert_eq!(unit_to_fixed(max, 300, 2).as_str(), "0.00");
    assert_eq!(unit_to_fixed(max, 78, 0).as_str(), "0");
    // U256::MAX is about 1.16e77.
    assert_eq!(unit_to_fixed(max, 77, 0).as_str(), "1");
    assert_eq!(unit_to_fixed(max, 77, 1).as_str(), "1.2");
}

#[test]
fn test_other_decimals() {
    // 6-decimal token
    let amount = decimal_to_unit("2.75", 6).unwrap();
    assert_eq!(amount, Amount::from_wei(2_750_000));
    assert_eq!(unit_to_decimal(amount, 6), "2.75");
    assert!(decimal_to_unit("1.0000001", 6).is_err());

    assert_eq!(decimal_to_unit("42", 0).unwrap(), Amount::from_wei(42));
    assert!(decimal_to_unit("4.2", 0).is_err());
    assert_eq!(unit_to_decimal(Amount::from_wei(42), 0), "42");
}
