use crate::{
    CalendarDate, DateEnumerator, DecodedPesel, Error, Fragment, FragmentSearch, IDS_PER_DATE,
    Pesel, Sex, checksum_digit, decode, encode_month, validate,
};
use std::collections::BTreeSet;

fn date(y: u16, m: u8, d: u8) -> CalendarDate {
    CalendarDate::new(y, m, d).unwrap()
}

fn dates_between(from: CalendarDate, to: CalendarDate) -> impl Iterator<Item = CalendarDate> {
    core::iter::successors(Some(from), |d| d.succ()).take_while(move |d| *d <= to)
}

#[test]
fn decoded_fields_reencode_to_the_same_prefix() {
    // One sample identifier per month across every supported century.
    for year in (CalendarDate::MIN_YEAR..=CalendarDate::MAX_YEAR).step_by(7) {
        for month in 1..=12 {
            let day = (year % 28) as u8 + 1;
            let serial = year % 1000;
            let sex_digit = month % 10;
            let original = Pesel::from_components(&date(year, month, day), serial, sex_digit);

            let decoded = original.validate().unwrap();
            let rebuilt = Pesel::from_components(
                &decoded.date,
                decoded.pesel.serial(),
                decoded.pesel.sex_digit(),
            );
            assert_eq!(rebuilt.prefix(), original.prefix());
            assert_eq!(rebuilt, original);
        }
    }
}

#[test]
fn month_code_round_trip_through_decoder() {
    for year in [1800, 1899, 1900, 1999, 2000, 2099, 2100, 2199, 2200, 2299] {
        for month in 1..=12 {
            let code = encode_month(year, month).unwrap();
            let yy = (year % 100) as u8;
            let mut digits = [yy / 10, yy % 10, code / 10, code % 10, 0, 1, 0, 0, 0, 0, 0];
            let mut prefix = [0_u8; 10];
            prefix.copy_from_slice(&digits[..10]);
            digits[10] = checksum_digit(&prefix);

            let decoded = Pesel::from_digits(digits).unwrap().validate().unwrap();
            assert_eq!(decoded.date, date(year, month, 1));
        }
    }
}

#[test]
fn enumeration_is_complete_for_leap_day() {
    let leap_day = date(2024, 2, 29);
    let all: Vec<DecodedPesel> = DateEnumerator::new(leap_day).collect();
    assert_eq!(all.len(), IDS_PER_DATE);
    assert!(all.iter().all(|d| d.valid && d.date == leap_day));
    assert_eq!(all.iter().filter(|d| d.sex == Sex::Male).count(), 5_000);
    assert!(all.iter().all(|d| d.pesel.to_string().starts_with("242229")));
}

#[test]
fn fragment_search_matches_filtered_enumeration_across_century_boundary() {
    let from = date(1899, 12, 20);
    let to = date(1900, 1, 10);

    for raw in ["00000", "12345", "31337", "99999"] {
        let fragment: Fragment = raw.parse().unwrap();

        let searched: BTreeSet<Pesel> = FragmentSearch::within(fragment, from, to)
            .map(|d| d.pesel)
            .collect();
        let enumerated: BTreeSet<Pesel> = dates_between(from, to)
            .flat_map(DateEnumerator::new)
            .filter(|d| d.pesel.fragment() == fragment)
            .map(|d| d.pesel)
            .collect();

        assert_eq!(searched, enumerated, "fragment {raw}");
    }
}

#[test]
fn each_date_matches_exactly_one_checksum_digit() {
    // For a fixed serial and sex digit, every date completes exactly one of
    // the ten possible fragments.
    let from = date(2099, 12, 1);
    let to = date(2100, 1, 31);
    let days = dates_between(from, to).count();

    let total: usize = (0..10)
        .map(|check| {
            let fragment: Fragment = format!("0420{check}").parse().unwrap();
            FragmentSearch::within(fragment, from, to).count()
        })
        .sum();
    assert_eq!(total, days);
}

#[test]
fn known_identifier_scenario() {
    let decoded = decode("44051401458").unwrap();
    assert_eq!(decoded.date, date(1944, 5, 14));
    // Digit 9 is 5, which is odd.
    assert_eq!(decoded.sex, Sex::Male);
    assert!(decoded.valid);
}

#[test]
fn checksum_failure_rejects_even_with_sound_date() {
    for wrong in 0..10 {
        if wrong == 8 {
            continue;
        }
        let raw = format!("4405140145{wrong}");
        assert_eq!(
            validate(&raw),
            Err(Error::ChecksumMismatch {
                expected: 8,
                found: wrong
            })
        );
    }
}
