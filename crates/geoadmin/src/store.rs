//! Embedded administrative-geography store
//!
//! Owns the on-disk relation (`admins.gpkg`) and hands out per-thread
//! read-only connections. SQLite connections must never cross threads, so a
//! thread-local registry keyed by store path lazily opens one connection per
//! calling thread; the published dataset is immutable, which makes parallel
//! reads safe without further coordination.

use crate::dataset::DB_FILENAME;
use crate::error::{GeoError, Result};
use rusqlite::{params, params_from_iter, Connection, OpenFlags, Row};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

thread_local! {
    // One lazily-opened connection per (thread, store path). Entries live
    // for the thread's lifetime and are reclaimed when the thread ends.
    static CONNECTIONS: RefCell<HashMap<PathBuf, Rc<Connection>>> =
        RefCell::new(HashMap::new());
}

/// Columns selected for every area row, bounds joined in
const AREA_COLUMNS: &str = "admins.id, name, level, latitude, longitude, \
     country, admin1, admin2, admin3, admin4, admin5, \
     minx, maxx, miny, maxy";

/// Ancestor-id columns, country tier first
pub(crate) const LEVEL_COLUMNS: [&str; 6] =
    ["country", "admin1", "admin2", "admin3", "admin4", "admin5"];

/// Raw area record as stored in the relation
#[derive(Debug, Clone)]
pub(crate) struct AreaRow {
    pub id: i64,
    pub name: String,
    pub level: i64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub levels: [Option<i64>; 6],
    pub bounds: Option<(f64, f64, f64, f64)>,
}

/// Handle to the on-disk relation
pub(crate) struct GeoStore {
    db_path: PathBuf,
}

impl GeoStore {
    /// Open the store inside a dataset directory.
    ///
    /// Fails with [`GeoError::NotFound`] if the relation file is absent;
    /// resolution requires a downloaded dataset.
    pub fn open(data_path: &Path) -> Result<Self> {
        let db_path = data_path.join(DB_FILENAME);
        if !db_path.exists() {
            return Err(GeoError::not_found(db_path.display().to_string()));
        }
        // Canonical path keys the per-thread registry, so two handles to the
        // same dataset share the thread's connection.
        let db_path = db_path.canonicalize()?;
        Ok(Self { db_path })
    }

    /// Run `f` with the calling thread's connection, opening it on first use.
    ///
    /// The registry borrow is released before `f` runs, so store calls may
    /// nest (alias loading while a result set is being iterated).
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = CONNECTIONS.with(|cell| -> Result<Rc<Connection>> {
            let mut map = cell.borrow_mut();
            if let Some(conn) = map.get(&self.db_path) {
                return Ok(Rc::clone(conn));
            }
            debug!(
                path = %self.db_path.display(),
                thread = ?std::thread::current().id(),
                "Opening store connection"
            );
            let conn = Rc::new(Connection::open_with_flags(
                &self.db_path,
                OpenFlags::SQLITE_OPEN_READ_ONLY,
            )?);
            map.insert(self.db_path.clone(), Rc::clone(&conn));
            Ok(conn)
        })?;
        f(&conn)
    }

    /// Ids of every area whose alias set contains `name` (pre-normalized),
    /// deduplicated, in store order.
    pub fn area_ids_by_alias(&self, name: &str) -> Result<Vec<i64>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached("SELECT DISTINCT id FROM names WHERE name = ?1")?;
            let ids = stmt
                .query_map(params![name], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<i64>>>()?;
            Ok(ids)
        })
    }

    /// Fetch one area row by identifier
    pub fn area_by_id(&self, id: i64) -> Result<Option<AreaRow>> {
        self.with_conn(|conn| query_area(conn, "admins.id = ?1", params![id]))
    }

    /// Fetch the area row backing a fuzzy-index entry
    pub fn area_by_name_id(&self, name_id: u32) -> Result<Option<AreaRow>> {
        self.with_conn(|conn| {
            query_area(
                conn,
                "admins.id = (SELECT id FROM names WHERE name_id = ?1)",
                params![name_id],
            )
        })
    }

    /// Fetch the area whose level vector starts with exactly `prefix`.
    ///
    /// The target's own level is the last slot of the prefix; ancestors are
    /// not stored by id, so this prefix match is how they are reconstructed.
    pub fn area_by_level_prefix(&self, prefix: &[i64]) -> Result<Option<AreaRow>> {
        debug_assert!((1..=LEVEL_COLUMNS.len()).contains(&prefix.len()));
        let mut clause = format!("level = {}", prefix.len() - 1);
        for (i, column) in LEVEL_COLUMNS.iter().take(prefix.len()).enumerate() {
            clause.push_str(&format!(" AND {} = ?{}", column, i + 1));
        }
        self.with_conn(|conn| query_area(conn, &clause, params_from_iter(prefix.iter())))
    }

    /// All alias strings recorded for an area
    pub fn alias_names(&self, id: i64) -> Result<HashSet<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare_cached("SELECT name FROM names WHERE id = ?1")?;
            let names = stmt
                .query_map(params![id], |row| row.get(0))?
                .collect::<rusqlite::Result<HashSet<String>>>()?;
            Ok(names)
        })
    }
}

/// Run the area select with `where_clause`, returning the first row if any
fn query_area<P: rusqlite::Params>(
    conn: &Connection,
    where_clause: &str,
    params: P,
) -> Result<Option<AreaRow>> {
    let sql = format!(
        "SELECT {AREA_COLUMNS} FROM admins \
         LEFT OUTER JOIN rtree_admins_shape ON admins.id = rtree_admins_shape.id \
         WHERE {where_clause}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params)?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_area(row)?)),
        None => Ok(None),
    }
}

fn row_to_area(row: &Row<'_>) -> rusqlite::Result<AreaRow> {
    let mut levels = [None; 6];
    for (i, slot) in levels.iter_mut().enumerate() {
        *slot = row.get(5 + i)?;
    }

    let minx: Option<f64> = row.get(11)?;
    let maxx: Option<f64> = row.get(12)?;
    let miny: Option<f64> = row.get(13)?;
    let maxy: Option<f64> = row.get(14)?;
    // Bounding box is all-or-nothing; a partially stored box counts as absent
    let bounds = match (minx, maxx, miny, maxy) {
        (Some(minx), Some(maxx), Some(miny), Some(maxy)) => Some((minx, maxx, miny, maxy)),
        _ => None,
    };

    Ok(AreaRow {
        id: row.get(0)?,
        name: row.get(1)?,
        level: row.get(2)?,
        latitude: row.get(3)?,
        longitude: row.get(4)?,
        levels,
        bounds,
    })
}
