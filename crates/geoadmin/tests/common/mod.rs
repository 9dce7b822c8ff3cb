//! Fixture dataset shared by the integration tests

use geoadmin::dataset::{DatasetState, DatasetVersion, DB_FILENAME, INDEX_FILENAME};
use geoadmin::NgramIndex;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;

pub const USA: i64 = 1;
pub const ILLINOIS: i64 = 5;
pub const TEXAS: i64 = 6;
pub const FRANCE: i64 = 7;
pub const IDF: i64 = 11;
pub const SPRINGFIELD: i64 = 42;
pub const PARIS_TX: i64 = 66;
pub const PARIS_FR: i64 = 77;

/// (name_id, normalized name, area id)
pub const ALIASES: &[(u32, &str, i64)] = &[
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
];

/// (id, name, level, level vector)
const AREAS: &[(i64, &str, i64, [Option<i64>; 6])] = &[
    (USA, "united states", 0, [Some(USA), None, None, None, None, None]),
    (ILLINOIS, "illinois", 1, [Some(USA), Some(ILLINOIS), None, None, None, None]),
    (TEXAS, "texas", 1, [Some(USA), Some(TEXAS), None, None, None, None]),
    (FRANCE, "france", 0, [Some(FRANCE), None, None, None, None, None]),
    (IDF, "ile-de-france", 1, [Some(FRANCE), Some(IDF), None, None, None, None]),
    (
        SPRINGFIELD,
        "springfield",
        2,
        [Some(USA), Some(ILLINOIS), Some(SPRINGFIELD), None, None, None],
    ),
    (
        PARIS_TX,
        "paris",
        2,
        [Some(USA), Some(TEXAS), Some(PARIS_TX), None, None, None],
    ),
    (
        PARIS_FR,
        "paris",
        2,
        [Some(FRANCE), Some(IDF), Some(PARIS_FR), None, None, None],
    ),
];

/// Write a complete dataset (relation, fuzzy index, state record) into `dir`.
pub fn build_dataset(dir: &Path) {
    std::fs::create_dir_all(dir).expect("create dataset dir");

    let conn = Connection::open(dir.join(DB_FILENAME)).expect("create relation");
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
    .expect("create schema");

    for (id, name, level, levels) in AREAS {
        conn.execute(
            "INSERT INTO admins (id, name, level, latitude, longitude,
                                 country, admin1, admin2, admin3, admin4, admin5)
             VALUES (?1, ?2, ?3, NULL, NULL, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                id, name, level, levels[0], levels[1], levels[2], levels[3], levels[4], levels[5]
            ],
        )
        .expect("insert area");
    }
    for (name_id, name, id) in ALIASES {
        conn.execute(
            "INSERT INTO names (id, name, name_id) VALUES (?1, ?2, ?3)",
            params![id, name, name_id],
        )
        .expect("insert alias");
    }

    let index = NgramIndex::build(ALIASES.iter().map(|(name_id, name, _)| (*name_id, *name)));
    index
        .save(dir.join(INDEX_FILENAME))
        .expect("save fuzzy index");

    let state = DatasetState {
        version: 1,
        data: DatasetVersion {
            version: "2024.1".to_string(),
            files: HashMap::new(),
        },
    };
    state.save(dir).expect("save state record");
}
