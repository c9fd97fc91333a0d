//! Readers racing a writer that keeps reloading the list.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use suffixdb::{Database, Fnv1a};

const SMALL_LIST: &str = include_str!("../testdata/small.dat");

const PROBES: &[(&str, &str)] = &[
    ("www.example.co.uk", "example.co.uk"),
    ("google.org.ac", "google.org.ac"),
    ("foo.bar.ck", "foo.bar.ck"),
    ("www.city.kobe.jp", "city.kobe.jp"),
    ("thing.dyndns.org", "thing.dyndns.org"),
    ("пример.рф", "пример.рф"),
];

#[test]
fn test_readers_see_complete_rule_sets() {
    let db = Arc::new(Database::new(Fnv1a));
    db.load_from_str(SMALL_LIST).unwrap();
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let db = Arc::clone(&db);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut rounds = 0usize;
                while !done.load(Ordering::Relaxed) || rounds == 0 {
                    for (host, etld1) in PROBES {
                        assert_eq!(db.etld1_str(host).unwrap(), *etld1, "{host}");
                    }
                    let reader = db.read().unwrap();
                    assert_eq!(reader.parse(b"a.b.example.co.uk").etld, b"co.uk");
                    drop(reader);
                    rounds += 1;
                }
                rounds
            })
        })
        .collect();

    for _ in 0..200 {
        db.reload_from_reader(SMALL_LIST.as_bytes()).unwrap();
    }
    done.store(true, Ordering::Relaxed);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
    assert_eq!(db.stats().unwrap().negative, 3);
}

#[test]
fn test_concurrent_add_rule() {
    let db = Arc::new(Database::new(Fnv1a));
    let writers: Vec<_> = (0..4)
        .map(|i| {
            let db = Arc::clone(&db);
            thread::spawn(move || {
                for j in 0..50 {
                    db.add_rule_str(&format!("tld{}x{}", i, j), true).unwrap();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    assert_eq!(db.stats().unwrap().positive, 200);
    assert_eq!(db.etld1_str("www.example.tld3x49").unwrap(), "example.tld3x49");
}
