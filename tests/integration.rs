//! Integration tests against the public API.

use std::io::Write;

use suffixdb::{
    AHash64, Database, DatabaseConfig, Error, Fnv1a, RuleLines, StrParts, UnlistedPolicy,
};

const SMALL_LIST: &str = include_str!("../testdata/small.dat");

fn check(db: &Database, host: &str, tld: &str, etld: &str, etld1: &str, icann: bool) {
    assert_eq!(
        db.parse_str(host).unwrap(),
        StrParts {
            tld,
            etld,
            etld1,
            icann
        },
        "{host}"
    );
}

#[test]
fn test_known_hostnames() {
    let db = Database::new(AHash64::new());
    db.load_from_str(SMALL_LIST).unwrap();

    check(&db, "google.org.ac", "ac", "org.ac", "google.org.ac", true);
    check(&db, "example.com", "com", "", "example.com", true);
    check(&db, "github.ae", "ae", "", "github.ae", true);
    check(&db, "go.dev", "dev", "", "go.dev", true);
    check(&db, "www.ck", "ck", "", "www.ck", true);
    check(&db, "city.kobe.jp", "jp", "kobe.jp", "city.kobe.jp", true);
    check(&db, "thing.dyndns.org", "org", "dyndns.org", "thing.dyndns.org", false);
    check(&db, "unknown.no-tld", "", "", "", false);
}

#[test]
fn test_unlisted_policies() {
    for (policy, expected) in [
        (UnlistedPolicy::Empty, ""),
        (UnlistedPolicy::WholeHostname, "unknown.no-tld"),
    ] {
        let db = Database::builder()
            .hasher(Fnv1a)
            .config(DatabaseConfig::with_unlisted(policy))
            .build()
            .unwrap();
        db.load_from_str(SMALL_LIST).unwrap();
        assert_eq!(db.etld1_str("unknown.no-tld").unwrap(), expected, "{}", policy.name());
    }
}

#[test]
fn test_hashers_agree() {
    let fnv = Database::new(Fnv1a);
    let ahash = Database::new(AHash64::with_seeds(1, 2, 3, 4));
    fnv.load_from_str(SMALL_LIST).unwrap();
    ahash.load_from_str(SMALL_LIST).unwrap();

    for host in [
        "a.b.c.example.co.uk",
        "foo.bar.ck",
        "www.city.kawasaki.jp",
        "octocat.github.io",
        "пример.рф",
        "xn--e1afmkfd.xn--p1ai",
        "localhost",
    ] {
        assert_eq!(fnv.parse_str(host).unwrap(), ahash.parse_str(host).unwrap(), "{host}");
    }
}

#[test]
fn test_rule_count_matches_source() {
    let lines = RuleLines::new(SMALL_LIST.as_bytes()).count();
    let db = Database::new(Fnv1a);
    let stats = db.load_from_str(SMALL_LIST).unwrap();
    assert_eq!(stats.lines, lines);
    assert!(stats.entries > stats.lines);
}

#[test]
fn test_load_gzip_file() {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("public_suffix_list.dat.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(SMALL_LIST.as_bytes()).unwrap();
    std::fs::write(&path, encoder.finish().unwrap()).unwrap();

    let db = Database::new(Fnv1a);
    db.load_file(&path).unwrap();
    check(&db, "www.example.co.uk", "uk", "co.uk", "example.co.uk", true);
}

#[test]
fn test_lookups_after_invalidate() {
    let db = Database::new(Fnv1a);
    db.load_from_str(SMALL_LIST).unwrap();
    db.invalidate();
    assert!(matches!(db.etld1_str("example.com"), Err(Error::Uninitialized)));
    assert!(matches!(db.load_file("testdata/small.dat"), Err(Error::Uninitialized)));
}

#[test]
fn test_frozen_database() {
    let db = Database::new(Fnv1a);
    db.load_from_str(SMALL_LIST).unwrap();
    let frozen = db.freeze().unwrap();

    let parts = frozen.parse(b"foo.blogspot.com");
    assert_eq!(parts.tld, b"com");
    assert_eq!(parts.etld, b"blogspot.com");
    assert_eq!(parts.etld1, b"foo.blogspot.com");
    assert!(!parts.icann);
}
