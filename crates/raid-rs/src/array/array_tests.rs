use super::*;
use crate::disk::MemoryDisk;

fn array_of(n: usize, u: usize, disk_len: u64) -> Raid5Array {
    let disks: Vec<Box<dyn BackingDisk>> = (0..n)
        .map(|_| Box::new(MemoryDisk::new(disk_len)) as Box<dyn BackingDisk>)
        .collect();
    Raid5Array::new(disks, u).unwrap()
}

#[test]
fn rejects_too_few_disks() {
    let disks: Vec<Box<dyn BackingDisk>> =
        vec![Box::new(MemoryDisk::new(16)), Box::new(MemoryDisk::new(16))];
    let err = Raid5Array::new(disks, 4).unwrap_err();
    assert!(matches!(err, RaidError::Argument(_)));
}

#[test]
fn rejects_zero_stripe_unit() {
    let disks: Vec<Box<dyn BackingDisk>> = (0..3)
        .map(|_| Box::new(MemoryDisk::new(16)) as Box<dyn BackingDisk>)
        .collect();
    let err = Raid5Array::new(disks, 0).unwrap_err();
    assert!(matches!(err, RaidError::Argument(_)));
}

#[test]
fn write_then_read_round_trips() {
    let mut arr = array_of(4, 4, 16);
    let addr = arr.geometry().locate(0);
    arr.write_slice(addr, 4, b"abcd").unwrap();

    let mut out = [0u8; 4];
    arr.read_slice(addr, 4, &mut out).unwrap();
    assert_eq!(&out, b"abcd");
}

#[test]
fn read_reconstructs_through_one_failed_disk() {
    let mut arr = array_of(4, 4, 16);
    let addr = arr.geometry().locate(0);
    arr.write_slice(addr, 4, b"abcd").unwrap();

    arr.fail(addr.data_disk).unwrap();

    let mut out = [0u8; 4];
    arr.read_slice(addr, 4, &mut out).unwrap();
    assert_eq!(&out, b"abcd");
}

#[test]
fn read_fails_integrity_with_two_failed_disks() {
    let mut arr = array_of(4, 4, 16);
    let addr = arr.geometry().locate(0);
    arr.write_slice(addr, 4, b"abcd").unwrap();

    arr.fail(addr.data_disk).unwrap();
    let other = (0..arr.geometry().n).find(|&i| i != addr.data_disk).unwrap();
    arr.fail(other).unwrap();

    let mut out = [0u8; 4];
    let err = arr.read_slice(addr, 4, &mut out).unwrap_err();
    assert!(matches!(err, RaidError::Integrity { failed_count: 2 }));
}

#[test]
fn write_refuses_when_data_disk_failed() {
    let mut arr = array_of(4, 4, 16);
    let addr = arr.geometry().locate(0);
    arr.fail(addr.data_disk).unwrap();

    let err = arr.write_slice(addr, 4, b"abcd").unwrap_err();
    assert!(matches!(err, RaidError::DiskFailed { disk } if disk == addr.data_disk));
}

#[test]
fn write_refuses_when_parity_disk_failed() {
    let mut arr = array_of(4, 4, 16);
    let addr = arr.geometry().locate(0);
    arr.fail(addr.parity_disk).unwrap();

    let err = arr.write_slice(addr, 4, b"abcd").unwrap_err();
    assert!(matches!(err, RaidError::DiskFailed { disk } if disk == addr.parity_disk));
}

#[test]
fn recover_rebuilds_failed_disk_from_peers() {
    let mut arr = array_of(4, 4, 16);
    for s in 0..4u64 {
        let addr = arr.geometry().locate(s * 4 * 3);
        arr.write_slice(addr, 4, &[s as u8; 4]).unwrap();
    }

    let victim = arr.geometry().locate(0).data_disk;
    arr.fail(victim).unwrap();
    arr.recover(victim).unwrap();
    assert!(!arr.is_failed(victim).unwrap());

    for s in 0..4u64 {
        let addr = arr.geometry().locate(s * 4 * 3);
        let mut out = [0u8; 4];
        arr.read_slice(addr, 4, &mut out).unwrap();
        assert_eq!(out, [s as u8; 4]);
    }
}

#[test]
fn recover_on_healthy_disk_is_a_no_op() {
    let mut arr = array_of(3, 4, 16);
    arr.recover(0).unwrap();
    assert!(!arr.is_failed(0).unwrap());
}
