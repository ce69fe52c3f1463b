//! Behaviour of `Mmap` against real files and anonymous memory.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::os::fd::AsRawFd;

use tempfile::NamedTempFile;
use vmap::{
    Advice, Errno, MapError, MapFlags, Mmap, Protection, SyncMode, UncheckedAdvice, page_size,
};

const CONTENT: &[u8] = b"0123456789ABCDEF";

fn fixture() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(CONTENT).unwrap();
    file.flush().unwrap();
    file
}

fn map_shared(file: &File, prot: Protection) -> Mmap {
    unsafe { Mmap::map(file.as_raw_fd(), prot, MapFlags::SHARED) }.unwrap()
}

fn contents(file: &mut File) -> Vec<u8> {
    let mut buf = Vec::new();
    file.seek(SeekFrom::Start(0)).unwrap();
    file.read_to_end(&mut buf).unwrap();
    buf
}

#[test]
fn test_unmap_retires_region() {
    let file = fixture();
    let mut map = map_shared(file.as_file(), Protection::READ | Protection::WRITE);
    assert!(map.is_live());

    map.unmap().unwrap();
    assert!(!map.is_live());
    assert!(map.as_slice().is_empty());
    assert_eq!(map.len(), CONTENT.len());

    assert_eq!(map.unmap(), Err(MapError::Unmapped));
    assert_eq!(map.flush(SyncMode::SYNC), Err(MapError::Unmapped));
    assert_eq!(map.advise(Advice::Normal), Err(MapError::Unmapped));
    assert_eq!(map.lock(), Err(MapError::Unmapped));
    assert_eq!(map.unlock(), Err(MapError::Unmapped));
    assert_eq!(map.in_core(), Err(MapError::Unmapped));
    assert_eq!(unsafe { map.protect(Protection::READ) }, Err(MapError::Unmapped));
}

#[test]
fn test_read_write_reaches_file() {
    let mut file = fixture();
    let mut map = map_shared(file.as_file(), Protection::READ | Protection::WRITE);
    assert_eq!(&map[..], CONTENT);

    map[9] = b'X';
    map.flush(SyncMode::SYNC).unwrap();
    map.unmap().unwrap();

    assert_eq!(contents(file.as_file_mut()), b"012345678XABCDEF");
}

#[test]
fn test_flush_slice_from_page_start() {
    let mut file = fixture();
    let mut map = map_shared(file.as_file(), Protection::READ | Protection::WRITE);
    map[0] = b'-';
    map.flush_slice(&map[..4], SyncMode::SYNC).unwrap();
    drop(map);
    assert_eq!(contents(file.as_file_mut()), b"-123456789ABCDEF");
}

#[test]
fn test_foreign_regions_never_reach_kernel() {
    let file = fixture();
    let map = map_shared(file.as_file(), Protection::READ | Protection::WRITE);
    let mut sentinel = Mmap::map_anonymous(page_size(), MapFlags::PRIVATE).unwrap();
    sentinel[0] = 42;
    let heap = vec![0u8; 8];

    for region in [&sentinel[..], &heap[..], &sentinel[..1]] {
        assert_eq!(map.flush_slice(region, SyncMode::SYNC), Err(MapError::OutOfBounds));
        assert_eq!(map.advise_slice(region, Advice::WillNeed), Err(MapError::OutOfBounds));
        assert_eq!(
            unsafe { map.advise_slice_unchecked(region, UncheckedAdvice::DONT_NEED) },
            Err(MapError::OutOfBounds)
        );
        assert_eq!(map.lock_slice(region), Err(MapError::OutOfBounds));
        assert_eq!(map.unlock_slice(region), Err(MapError::OutOfBounds));
        assert_eq!(map.in_core_slice(region), Err(MapError::OutOfBounds));
        assert_eq!(map.is_resident_slice(region), Err(MapError::OutOfBounds));
        assert_eq!(
            unsafe { map.protect_slice(region, Protection::NONE) },
            Err(MapError::OutOfBounds)
        );
        assert_eq!(unsafe { map.unmap_slice(region) }, Err(MapError::OutOfBounds));
    }

    // Still mapped, still readable and writable.
    assert_eq!(sentinel[0], 42);
    sentinel[1] = 43;
    assert!(map.is_live());
    assert_eq!(&map[..], CONTENT);
}

#[test]
fn test_write_mapping_of_read_only_fd_is_refused() {
    let file = fixture();
    let read_only = File::open(file.path()).unwrap();
    let err = unsafe {
        Mmap::map(read_only.as_raw_fd(), Protection::READ | Protection::WRITE, MapFlags::SHARED)
    }
    .unwrap_err();
    assert_eq!(err, MapError::Kernel(Errno::EACCES));

    let map = map_shared(&read_only, Protection::READ);
    assert_eq!(&map[..], CONTENT);
}

#[test]
fn test_private_writes_stay_private() {
    let mut file = fixture();
    let mut map = unsafe {
        Mmap::map(
            file.as_file().as_raw_fd(),
            Protection::READ | Protection::WRITE,
            MapFlags::PRIVATE,
        )
    }
    .unwrap();
    map[0] = b'#';
    map.flush(SyncMode::SYNC).unwrap();
    assert_eq!(map[0], b'#');
    map.unmap().unwrap();
    assert_eq!(contents(file.as_file_mut()), CONTENT);
}

#[test]
fn test_unknown_advice_is_rejected_by_kernel() {
    let file = fixture();
    let map = map_shared(file.as_file(), Protection::READ);
    map.advise(Advice::Random).unwrap();
    map.advise(Advice::Sequential).unwrap();
    assert_eq!(
        unsafe { map.advise_unchecked(UncheckedAdvice::from_raw(9999)) },
        Err(MapError::Kernel(Errno::EINVAL))
    );
}

#[test]
fn test_protect_upgrades_to_writable() {
    let mut file = fixture();
    let mut map = map_shared(file.as_file(), Protection::READ);
    unsafe { map.protect(Protection::READ | Protection::WRITE) }.unwrap();
    map[15] = b'!';
    map.flush(SyncMode::SYNC).unwrap();
    drop(map);
    assert_eq!(contents(file.as_file_mut()), b"0123456789ABCDE!");
}

#[test]
fn test_lock_and_unlock_are_idempotent() {
    let file = fixture();
    let map = map_shared(file.as_file(), Protection::READ);
    map.lock().unwrap();
    map.lock().unwrap();
    map.unlock().unwrap();
    map.unlock().unwrap();
}

#[test]
fn test_in_core_after_touch() {
    let file = fixture();
    let map = map_shared(file.as_file(), Protection::READ);
    assert_eq!(map[0], b'0');

    let pages = map.in_core().unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0] & 1, 1);
    assert_eq!(map.is_resident().unwrap(), vec![true]);
}

#[test]
fn test_residency_per_page() {
    // Best effort: the kernel is free to fault in neighbouring pages.
    let ps = page_size();
    let mut map = Mmap::map_anonymous(2 * ps, MapFlags::PRIVATE).unwrap();
    map[2 * ps - 1] = 1;
    assert_eq!(map.is_resident().unwrap(), vec![false, true]);
    assert_eq!(map.in_core().unwrap()[1] & 1, 1);
}

#[test]
fn test_safe_advice_keeps_file_contents() {
    let file = fixture();
    let mut map = unsafe {
        Mmap::map(
            file.as_file().as_raw_fd(),
            Protection::READ | Protection::WRITE,
            MapFlags::PRIVATE,
        )
    }
    .unwrap();
    map[0] = b'#';
    map.advise(Advice::WillNeed).unwrap();
    map.advise(Advice::Sequential).unwrap();
    assert_eq!(&map[..2], b"#1");

    // Discarding a private copy falls back to the file.
    unsafe { map.advise_unchecked(UncheckedAdvice::DONT_NEED) }.unwrap();
    assert_eq!(&map[..2], b"01");
}

#[test]
fn test_map_region_at_page_offset() {
    let ps = page_size();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&vec![b'.'; ps]).unwrap();
    file.write_all(CONTENT).unwrap();
    file.flush().unwrap();
    let fd = file.as_file().as_raw_fd();

    let window =
        unsafe { Mmap::map_region(fd, ps as u64, Some(4), Protection::READ, MapFlags::SHARED) }
            .unwrap();
    assert_eq!(&window[..], b"0123");

    let tail =
        unsafe { Mmap::map_region(fd, ps as u64, None, Protection::READ, MapFlags::SHARED) }
            .unwrap();
    assert_eq!(tail.len(), CONTENT.len());
    assert_eq!(&tail[..], CONTENT);
}

#[test]
fn test_misaligned_offset() {
    let file = fixture();
    let fd = file.as_file().as_raw_fd();
    let err = unsafe { Mmap::map_region(fd, 1, Some(4), Protection::READ, MapFlags::SHARED) }
        .unwrap_err();
    if cfg!(target_arch = "x86") {
        assert_eq!(err, MapError::Misaligned);
    } else {
        assert_eq!(err, MapError::Kernel(Errno::EINVAL));
    }
}

#[test]
fn test_size_query_failure_maps_nothing() {
    let err = unsafe { Mmap::map(-1, Protection::READ, MapFlags::SHARED) }.unwrap_err();
    assert_eq!(err, MapError::SizeQuery(Errno::EBADF));
}

#[test]
fn test_empty_file_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    let err = unsafe { Mmap::map(file.as_file().as_raw_fd(), Protection::READ, MapFlags::SHARED) }
        .unwrap_err();
    assert_eq!(err, MapError::Kernel(Errno::EINVAL));
}

#[test]
fn test_partial_unmap_keeps_region_live() {
    let ps = page_size();
    let mut map = Mmap::map_anonymous(2 * ps, MapFlags::PRIVATE).unwrap();
    map[0] = 9;

    unsafe { map.unmap_slice(&map[ps..]) }.unwrap();
    assert!(map.is_live());
    assert_eq!(map.len(), 2 * ps);
    assert_eq!(map[0], 9);

    // The released page is gone from the kernel's view.
    assert_eq!(map.in_core(), Err(MapError::Kernel(Errno::ENOMEM)));
    assert_eq!(map.is_resident_slice(&map[..ps]).unwrap(), vec![true]);

    map.unmap().unwrap();
    assert!(!map.is_live());
}

#[test]
fn test_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Mmap>();

    let file = fixture();
    let map = map_shared(file.as_file(), Protection::READ);
    std::thread::scope(|s| {
        for i in 0..4 {
            let map = &map;
            s.spawn(move || assert_eq!(map[i], CONTENT[i]));
        }
    });
}
