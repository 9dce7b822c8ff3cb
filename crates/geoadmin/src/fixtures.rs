//! Shared in-crate test fixtures: a small but complete dataset directory

use crate::dataset::{DatasetState, DatasetVersion, FileRef, DB_FILENAME, INDEX_FILENAME};
use crate::ngram::NgramIndex;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;

pub(crate) const USA: i64 = 1;
pub(crate) const ILLINOIS: i64 = 5;
pub(crate) const TEXAS: i64 = 6;
pub(crate) const FRANCE: i64 = 7;
pub(crate) const IDF: i64 = 11;
pub(crate) const SPRINGFIELD: i64 = 42;
pub(crate) const PARIS_TX: i64 = 66;
pub(crate) const PARIS_FR: i64 = 77;
pub(crate) const METROPOLIS: i64 = 99;
pub(crate) const GERMANY: i64 = 200;
pub(crate) const MUNICH: i64 = 300;

/// Alias rows: (name_id, normalized name, area id). "usa" appears twice so
/// dedup behavior is exercised; "metropolis" is deliberately absent.
const ALIASES: &[(u32, &str, i64)] = &[
    (0, "united states", USA),
    (1, "usa", USA),
    (2, "illinois", ILLINOIS),
    (3, "texas", TEXAS),
    (4, "springfield", SPRINGFIELD),
    (5, "paris", PARIS_TX),
    (6, "paris", PARIS_FR),
    (7, "france", FRANCE),
    (8, "ile-de-france", IDF),
    (9, "paname", PARIS_FR),
    (10, "deutschland", GERMANY),
    (11, "münchen", MUNICH),
    (12, "munich", MUNICH),
    (13, "usa", USA),
];

/// Area rows: (id, name, level, lat, lon, level vector)
#[allow(clippy::type_complexity)]
const AREAS: &[(i64, &str, i64, Option<f64>, Option<f64>, [Option<i64>; 6])] = &[
    (USA, "united states", 0, Some(39.8), Some(-98.6), [Some(USA), None, None, None, None, None]),
    (ILLINOIS, "illinois", 1, Some(40.0), Some(-89.2), [Some(USA), Some(ILLINOIS), None, None, None, None]),
    (TEXAS, "texas", 1, Some(31.0), Some(-100.0), [Some(USA), Some(TEXAS), None, None, None, None]),
    (FRANCE, "france", 0, Some(46.0), Some(2.0), [Some(FRANCE), None, None, None, None, None]),
    (IDF, "ile-de-france", 1, Some(48.7), Some(2.5), [Some(FRANCE), Some(IDF), None, None, None, None]),
    (SPRINGFIELD, "springfield", 2, Some(39.8), Some(-89.6), [Some(USA), Some(ILLINOIS), Some(SPRINGFIELD), None, None, None]),
    (PARIS_TX, "paris", 2, Some(33.7), Some(-95.6), [Some(USA), Some(TEXAS), Some(PARIS_TX), None, None, None]),
    (PARIS_FR, "paris", 2, Some(48.9), Some(2.4), [Some(FRANCE), Some(IDF), Some(PARIS_FR), None, None, None]),
    (METROPOLIS, "metropolis", 2, None, None, [Some(USA), Some(ILLINOIS), Some(METROPOLIS), None, None, None]),
    (GERMANY, "deutschland", 0, Some(51.2), Some(10.4), [Some(GERMANY), None, None, None, None, None]),
    (MUNICH, "münchen", 1, Some(48.1), Some(11.6), [Some(GERMANY), Some(MUNICH), None, None, None, None]),
];

/// Write a complete dataset (relation, fuzzy index, state record) into `dir`.
pub(crate) fn sample_dataset(dir: &Path) {
    std::fs::create_dir_all(dir).expect("create dataset dir");
    create_relation(&dir.join(DB_FILENAME));
    create_index(&dir.join(INDEX_FILENAME));
    create_state(dir, "2024.1");
}

fn create_relation(db_path: &Path) {
    let conn = Connection::open(db_path).expect("create fixture relation");
    conn.execute_batch(
        "CREATE TABLE admins (
             id INTEGER PRIMARY KEY,
             name TEXT NOT NULL,
             level INTEGER NOT NULL,
             latitude REAL,
             longitude REAL,
             country INTEGER,
             admin1 INTEGER,
             admin2 INTEGER,
             admin3 INTEGER,
             admin4 INTEGER,
             admin5 INTEGER
         );
         CREATE TABLE names (
             id INTEGER NOT NULL,
             name TEXT NOT NULL,
             name_id INTEGER NOT NULL
         );
         CREATE TABLE rtree_admins_shape (
             id INTEGER PRIMARY KEY,
             minx REAL,
             maxx REAL,
             miny REAL,
             maxy REAL
         );",
    )
    .expect("create fixture schema");

    for (id, name, level, lat, lon, levels) in AREAS {
        conn.execute(
            "INSERT INTO admins (id, name, level, latitude, longitude,
                                 country, admin1, admin2, admin3, admin4, admin5)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                id, name, level, lat, lon, levels[0], levels[1], levels[2], levels[3], levels[4],
                levels[5]
            ],
        )
        .expect("insert fixture area");
    }

    for (name_id, name, id) in ALIASES {
        conn.execute(
            "INSERT INTO names (id, name, name_id) VALUES (?1, ?2, ?3)",
            params![id, name, name_id],
        )
        .expect("insert fixture alias");
    }

    // Springfield has a full box; Paris (FR) only a partial one, which
    // readers must treat as absent.
    conn.execute(
        "INSERT INTO rtree_admins_shape (id, minx, maxx, miny, maxy)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![SPRINGFIELD, -91.0, -89.0, 39.0, 40.0],
    )
    .expect("insert fixture bounds");
    conn.execute(
        "INSERT INTO rtree_admins_shape (id, minx, maxx, miny, maxy)
         VALUES (?1, ?2, NULL, NULL, NULL)",
        params![PARIS_FR, 2.2],
    )
    .expect("insert fixture partial bounds");
}

fn create_index(path: &Path) {
    let index = NgramIndex::build(ALIASES.iter().map(|(name_id, name, _)| (*name_id, *name)));
    index.save(path).expect("save fixture index");
}

fn create_state(dir: &Path, version: &str) {
    let state = DatasetState {
        version: 1,
        data: DatasetVersion {
            version: version.to_string(),
            files: HashMap::from([
                (
                    DB_FILENAME.to_string(),
                    FileRef {
                        url: format!("https://example.org/{DB_FILENAME}"),
                        sha1: "da39a3ee5e6b4b0d3255bfef95601890afd80709".to_string(),
                    },
                ),
                (
                    INDEX_FILENAME.to_string(),
                    FileRef {
                        url: format!("https://example.org/{INDEX_FILENAME}"),
                        sha1: "da39a3ee5e6b4b0d3255bfef95601890afd80709".to_string(),
                    },
                ),
            ]),
        },
    };
    state.save(dir).expect("save fixture state");
}

/// Insert an extra `admins` row directly, bypassing validation. Used to
/// stage corrupt level vectors.
pub(crate) fn insert_raw_area(
    dir: &Path,
    id: i64,
    name: &str,
    level: i64,
    levels: [Option<i64>; 6],
) {
    let conn = Connection::open(dir.join(DB_FILENAME)).expect("open fixture relation");
    conn.execute(
        "INSERT INTO admins (id, name, level, latitude, longitude,
                             country, admin1, admin2, admin3, admin4, admin5)
         VALUES (?1, ?2, ?3, NULL, NULL, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            id, name, level, levels[0], levels[1], levels[2], levels[3], levels[4], levels[5]
        ],
    )
    .expect("insert raw area");
}
