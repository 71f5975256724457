use super::*;

#[test]
fn xor_into_updates_prefix_of_given_length() {
    let mut target = vec![0xFFu8; 8];
    let source = vec![0x0Fu8; 8];
    xor_into(&mut target, &source, 4);
    assert_eq!(target, vec![0xF0, 0xF0, 0xF0, 0xF0, 0xFF, 0xFF, 0xFF, 0xFF]);
}

#[test]
fn xor_into_handles_odd_lengths_with_scalar_tail() {
    let mut target = vec![0xAAu8; 37];
    let source = vec![0x55u8; 37];
    xor_into(&mut target, &source, 37);
    assert!(target.iter().all(|&b| b == 0xFF));
}

#[test]
fn xor_into_is_commutative_and_associative() {
    let a = vec![0x01u8, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0x10, 0x20];
    let b = vec![0xFFu8, 0x00, 0xFF, 0x00, 0xAA, 0x55, 0xAA, 0x55, 0x01, 0x02];
    let c = vec![0x10u8, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80, 0x90, 0xA0];

    let mut left_first = a.clone();
    xor_into(&mut left_first, &b, a.len());
    xor_into(&mut left_first, &c, a.len());

    let mut right_first = a.clone();
    xor_into(&mut right_first, &c, a.len());
    xor_into(&mut right_first, &b, a.len());

    assert_eq!(left_first, right_first);
}

#[test]
fn xor_into_large_buffer_matches_naive_xor() {
    let len = 1 << 16;
    let target: Vec<u8> = (0..len).map(|i| (i * 7) as u8).collect();
    let source: Vec<u8> = (0..len).map(|i| (i * 13 + 1) as u8).collect();

    let mut got = target.clone();
    xor_into(&mut got, &source, len);

    let expected: Vec<u8> = target
        .iter()
        .zip(source.iter())
        .map(|(&t, &s)| t ^ s)
        .collect();
    assert_eq!(got, expected);
}

#[test]
fn xor_into_zero_length_is_noop() {
    let mut target = vec![1u8, 2, 3];
    let source = vec![9u8, 9, 9];
    xor_into(&mut target, &source, 0);
    assert_eq!(target, vec![1, 2, 3]);
}

#[test]
#[should_panic(expected = "target shorter than length")]
fn xor_into_panics_when_target_too_short() {
    let mut target = vec![0u8; 2];
    let source = vec![0u8; 4];
    xor_into(&mut target, &source, 4);
}
