//! End-to-end scenarios driven entirely through the public `IndexFile`
//! surface, against an in-memory backing store. Keys are 4-digit
//! zero-padded decimals; `rid = (k, k+1)`, matching the driver convention.

use btree::maintenance::PrintOption;
use btree::{IndexFile, RecordId};
use buffer::buffer::BufferManager;
use file::file_catalog::FileCatalog;
use file::in_memory_file_manager::InMemoryFileManager;
use file::index_catalog::IndexCatalog;
use page::page_id::PageId;
use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::rc::Rc;
use std::sync::Arc;
use storage_api::storage_manager::StorageManager;

fn open(name: &str) -> IndexFile<InMemoryFileManager> {
    let file_catalog = Arc::new(FileCatalog::new());
    let fm = Rc::new(InMemoryFileManager::new(file_catalog.clone()));
    let bm = Rc::new(BufferManager::new(fm, 64));
    let storage = Rc::new(StorageManager::new(bm));
    let index_catalog = Rc::new(IndexCatalog::new());
    IndexFile::open(name, storage, index_catalog, &file_catalog, format!("{name}.tbl").into()).unwrap()
}

fn key(n: u32) -> String {
    format!("{n:04}")
}

fn rid(n: u32) -> RecordId {
    RecordId::new(PageId::new(0, n), n + 1)
}

fn scan_all(index: &IndexFile<InMemoryFileManager>) -> Vec<String> {
    let mut cursor = index.open_scan(None, None).unwrap();
    let mut out = Vec::new();
    while let Some((k, _)) = cursor.get_next().unwrap() {
        out.push(String::from_utf8(k).unwrap());
    }
    out
}

#[test]
fn scenario_1_empty_index_destroys_cleanly() {
    let index = open("t0");
    let stats = index.dump_statistics().unwrap();
    assert_eq!(stats.leaf_pages, 0);
    assert_eq!(stats.index_pages, 0);
    assert_eq!(stats.height, 0);
    index.destroy().unwrap();
}

#[test]
fn scenario_2_single_page_of_fifty_keys() {
    let index = open("t1");
    for k in 1..=50u32 {
        index.insert(key(k).as_bytes(), rid(k)).unwrap();
    }
    let stats = index.dump_statistics().unwrap();
    assert_eq!(stats.leaf_pages, 1);
    assert_eq!(stats.leaf_entries, 50);

    let scanned = scan_all(&index);
    let expected: Vec<String> = (1..=50).map(key).collect();
    assert_eq!(scanned, expected);
}

#[test]
fn scenario_3_single_page_with_holes() {
    let index = open("t2");
    for k in 1..=50u32 {
        index.insert(key(k).as_bytes(), rid(k)).unwrap();
    }
    for k in (3..=48).step_by(3) {
        index.delete(key(k).as_bytes(), rid(k)).unwrap();
    }
    for k in 101..=110u32 {
        index.insert(key(k).as_bytes(), rid(k)).unwrap();
    }

    let stats = index.dump_statistics().unwrap();
    assert_eq!(stats.leaf_pages, 1);
    assert_eq!(stats.leaf_entries, 44);

    let scanned = scan_all(&index);
    let mut expected: Vec<u32> = (1..=50).filter(|k| !(3..=48).contains(k) || k % 3 != 0).collect();
    expected.extend(101..=110);
    let expected: Vec<String> = expected.into_iter().map(key).collect();
    assert_eq!(scanned, expected);

    for k in 51..=100u32 {
        assert!(index.delete(key(k).as_bytes(), rid(k)).is_err());
    }
}

#[test]
fn scenario_4_leaf_split_with_padded_keys() {
    let index = open("t3");
    for n in 1..=31u32 {
        let padded = format!("{n:020}");
        index.insert(padded.as_bytes(), rid(n)).unwrap();
    }
    let stats = index.dump_statistics().unwrap();
    assert_eq!(stats.leaf_pages, 2);

    let scanned = scan_all(&index);
    let expected: Vec<String> = (1..=31).map(|n| format!("{n:020}")).collect();
    assert_eq!(scanned, expected);
}

#[test]
fn scenario_5_large_workload_ordering() {
    let index = open("t4");

    for k in (1001..=2000u32).rev() {
        index.insert(key(k).as_bytes(), rid(k)).unwrap();
    }
    for k in (1..=1000u32).rev() {
        index.insert(key(k).as_bytes(), rid(k)).unwrap();
    }
    for k in 5001..=6000u32 {
        index.insert(key(k).as_bytes(), rid(k)).unwrap();
    }
    for k in 2001..=4000u32 {
        index.insert(key(k).as_bytes(), rid(k)).unwrap();
    }

    let stats = index.dump_statistics().unwrap();
    assert_eq!(stats.leaf_entries, 5000);

    let scanned = scan_all(&index);
    let mut expected: Vec<String> = (1..=4000).map(key).collect();
    expected.extend((5001..=6000).map(key));
    assert_eq!(scanned, expected);
}

#[test]
fn scenario_6_random_subrange_scans() {
    let index = open("t5");
    let mut present: Vec<u32> = Vec::new();

    for k in (1001..=2000u32).rev() {
        index.insert(key(k).as_bytes(), rid(k)).unwrap();
        present.push(k);
    }
    for k in (1..=1000u32).rev() {
        index.insert(key(k).as_bytes(), rid(k)).unwrap();
        present.push(k);
    }
    for k in 5001..=6000u32 {
        index.insert(key(k).as_bytes(), rid(k)).unwrap();
        present.push(k);
    }
    for k in 2001..=4000u32 {
        index.insert(key(k).as_bytes(), rid(k)).unwrap();
        present.push(k);
    }
    present.sort_unstable();

    let mut rng = StdRng::seed_from_u64(0xB7EE);
    for _ in 0..100 {
        let a = present[rng.gen_range(0..present.len())];
        let b = present[rng.gen_range(0..present.len())];
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

        let use_lo = rng.gen_range(0..5) != 0;
        let use_hi = rng.gen_range(0..5) != 0;

        let lo_key = use_lo.then(|| key(lo));
        let hi_key = use_hi.then(|| key(hi));

        let mut cursor = index
            .open_scan(lo_key.as_deref().map(str::as_bytes), hi_key.as_deref().map(str::as_bytes))
            .unwrap();
        let mut seen = Vec::new();
        while let Some((k, _)) = cursor.get_next().unwrap() {
            seen.push(String::from_utf8(k).unwrap());
        }

        let expected: Vec<String> = present
            .iter()
            .filter(|&&k| use_lo.then(|| k >= lo).unwrap_or(true))
            .filter(|&&k| use_hi.then(|| k <= hi).unwrap_or(true))
            .map(|&k| key(k))
            .collect();

        assert_eq!(seen, expected, "lo={lo_key:?} hi={hi_key:?}");
    }
}

#[test]
fn duplicate_keys_are_independently_deletable() {
    let index = open("t6");
    index.insert(b"0005", rid(1)).unwrap();
    index.insert(b"0005", rid(2)).unwrap();

    index.delete(b"0005", rid(1)).unwrap();
    let scanned = scan_all(&index);
    assert_eq!(scanned, vec!["0005".to_string()]);

    index.delete(b"0005", rid(2)).unwrap();
    assert_eq!(scan_all(&index), Vec::<String>::new());
}

#[test]
fn reverse_order_insertion_still_scans_sorted() {
    let index = open("t7");
    for k in (1..=200u32).rev() {
        index.insert(key(k).as_bytes(), rid(k)).unwrap();
    }
    let scanned = scan_all(&index);
    let expected: Vec<String> = (1..=200).map(key).collect();
    assert_eq!(scanned, expected);
}

#[test]
fn destroy_then_reopen_yields_an_empty_index() {
    let file_catalog = Arc::new(FileCatalog::new());
    let fm = Rc::new(InMemoryFileManager::new(file_catalog.clone()));
    let bm = Rc::new(BufferManager::new(fm, 64));
    let storage = Rc::new(StorageManager::new(bm));
    let index_catalog = Rc::new(IndexCatalog::new());

    let index = IndexFile::open("t8", storage.clone(), index_catalog.clone(), &file_catalog, "t8.tbl".into()).unwrap();
    for k in 1..=100u32 {
        index.insert(key(k).as_bytes(), rid(k)).unwrap();
    }
    index.destroy().unwrap();

    let reopened = IndexFile::open("t8", storage, index_catalog, &file_catalog, "t8.tbl".into()).unwrap();
    assert_eq!(scan_all(&reopened), Vec::<String>::new());
    assert_eq!(reopened.dump_statistics().unwrap().leaf_pages, 0);
}

#[test]
fn print_whole_lists_every_allocated_page() {
    let index = open("t9");
    for k in 1..=60u32 {
        index.insert(key(k).as_bytes(), rid(k)).unwrap();
    }
    let dump = index.print_whole().unwrap();
    assert!(dump.contains("header"));
    assert!(dump.lines().count() >= 2);
}

#[test]
fn disk_backed_index_survives_close_and_reopen() {
    use file::disk_file_manager::DiskFileManager;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("disk.tbl");

    {
        let file_catalog = Arc::new(FileCatalog::new());
        let fm = Rc::new(DiskFileManager::new(file_catalog.clone()));
        let bm = Rc::new(BufferManager::new(fm, 64));
        let storage = Rc::new(StorageManager::new(bm));
        let index_catalog = Rc::new(IndexCatalog::new());

        let index = IndexFile::open("disk", storage, index_catalog, &file_catalog, path.clone()).unwrap();
        for k in 1..=40u32 {
            index.insert(key(k).as_bytes(), rid(k)).unwrap();
        }
        assert_eq!(index.dump_statistics().unwrap().leaf_entries, 40);
    }

    {
        let file_catalog = Arc::new(FileCatalog::new());
        file_catalog.add_file(0, path.clone());
        let fm = Rc::new(DiskFileManager::new(file_catalog.clone()));
        let bm = Rc::new(BufferManager::new(fm, 64));
        let storage = Rc::new(StorageManager::new(bm));
        let index_catalog = Rc::new(IndexCatalog::new());
        index_catalog.add_file_entry("disk", PageId::new(0, 0));

        let reopened = IndexFile::open("disk", storage, index_catalog, &file_catalog, path).unwrap();
        let scanned = scan_all(&reopened);
        let expected: Vec<String> = (1..=40).map(key).collect();
        assert_eq!(scanned, expected);
    }
}

#[test]
fn print_tree_single_mode_omits_children() {
    let index = open("t10");
    for k in 1..=60u32 {
        index.insert(key(k).as_bytes(), rid(k)).unwrap();
    }
    let single = index.print_tree(PrintOption::Single).unwrap();
    let recursive = index.print_tree(PrintOption::Recursive).unwrap();
    assert!(single.len() < recursive.len());
}
