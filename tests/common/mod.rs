#![allow(dead_code)]

use std::borrow::Borrow;
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use sql_template::prelude::*;
use tracing_subscriber::fmt::writer::MakeWriter;

pub const FIND_ALL_SQL: &str = "SELECT id, name, description, price, creation_date FROM products";
pub const FIND_BY_ID_SQL: &str =
    "SELECT id, name, description, price, creation_date FROM products WHERE id = ?";
pub const ADD_SQL: &str =
    "INSERT INTO products (name, description, price, creation_date) VALUES (?, ?, ?, ?)";
pub const DELETE_BY_ID_SQL: &str = "DELETE FROM products WHERE id = ?";
pub const UPDATE_BY_ID_SQL: &str =
    "UPDATE products SET name = ?, description = ?, price = ? WHERE id = ?";

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub creation_date: NaiveDateTime,
}

pub struct ProductRowMapper;

impl RowDecoder<Product> for ProductRowMapper {
    fn decode(&self, row: &ResultRow<'_>) -> Result<Product, SqlTemplateError> {
        Ok(Product {
            id: row.get_int("id")?,
            name: row.get_string("name")?,
            description: row.get_string("description")?,
            price: row.get_double("price")?,
            creation_date: row.get_timestamp("creation_date")?.to_local_date_time(),
        })
    }
}

pub fn launch_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 2, 24)
        .and_then(|d| d.and_hms_opt(4, 0, 0))
        .expect("valid date")
}

fn product(id: i32, name: &str, description: &str, price: f64) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: description.to_string(),
        price,
        creation_date: launch_date(),
    }
}

pub fn samsung() -> Product {
    product(
        1,
        "Samsung Galaxy M52",
        "6.7 inches, Qualcomm SM7325 Snapdragon 778G 5G",
        13499.0,
    )
}

pub fn xiaomi() -> Product {
    product(
        2,
        "Xiaomi Redmi Note 9 Pro",
        "6.67 inches, Qualcomm SM7125 Snapdragon 720G Octa-core",
        11699.0,
    )
}

pub fn apple() -> Product {
    product(3, "Apple iPhone 14", "6.1 inches, Apple A15 Bionic", 41499.0)
}

pub fn nokia() -> Product {
    product(4, "Nokia G11", "6.5 inches, Unisoc T606", 4499.0)
}

pub fn expected_products() -> Vec<Product> {
    vec![samsung(), xiaomi(), apple()]
}

static NEXT_DB: AtomicUsize = AtomicUsize::new(0);

/// Seeded in-memory products database.
///
/// The database is a shared-cache memory URI, so it lives as long as `keeper` stays open.
pub struct ProductDb {
    pub provider: SqliteProvider,
    keeper: Connection,
}

impl ProductDb {
    pub fn new() -> Self {
        let uri = format!(
            "file:products_{}_{}?mode=memory&cache=shared",
            std::process::id(),
            NEXT_DB.fetch_add(1, Ordering::SeqCst)
        );
        Self::open(uri)
    }

    /// Seed a database at `db_path` (file path or URI).
    pub fn open(db_path: String) -> Self {
        let provider = SqliteProvider::builder(db_path)
            .build()
            .expect("valid sqlite options");
        let keeper = provider.open().expect("open keeper connection");
        keeper
            .execute_batch(include_str!("../sqlite/products/schema.sql"))
            .expect("create schema");
        keeper
            .execute_batch(include_str!("../sqlite/products/seed.sql"))
            .expect("seed products");
        Self { provider, keeper }
    }

    pub fn template(&self) -> SqlTemplate<SqliteProvider> {
        SqlTemplate::new(self.provider.clone())
    }

    pub fn counting(&self) -> CountingProvider {
        CountingProvider::new(self.provider.clone())
    }

    pub fn row_count(&self) -> i64 {
        self.keeper
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
            .expect("count products")
    }
}

#[derive(Debug, Default)]
pub struct Counters {
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
}

/// Wraps a provider and tracks how many connections are handed out and given back.
pub struct CountingProvider {
    inner: SqliteProvider,
    pub counters: Arc<Counters>,
}

impl CountingProvider {
    pub fn new(inner: SqliteProvider) -> Self {
        Self {
            inner,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn acquired(&self) -> usize {
        self.counters.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.counters.released.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.counters.max_active.load(Ordering::SeqCst)
    }
}

pub struct CountedConnection {
    conn: Connection,
    counters: Arc<Counters>,
}

impl Borrow<Connection> for CountedConnection {
    fn borrow(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for CountedConnection {
    fn drop(&mut self) {
        self.counters.active.fetch_sub(1, Ordering::SeqCst);
        self.counters.released.fetch_add(1, Ordering::SeqCst);
    }
}

impl ConnectionProvider for CountingProvider {
    type Connection = CountedConnection;

    fn acquire(&self) -> Result<CountedConnection, SqlTemplateError> {
        let conn = self.inner.acquire()?;
        self.counters.acquired.fetch_add(1, Ordering::SeqCst);
        let active = self.counters.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_active.fetch_max(active, Ordering::SeqCst);
        Ok(CountedConnection {
            conn,
            counters: Arc::clone(&self.counters),
        })
    }
}

/// Log sink for `tracing_subscriber::fmt`, kept in memory for assertions.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

pub struct CapturedWriter(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        let buf = self.0.lock().expect("log buffer lock");
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter(Arc::clone(&self.0))
    }
}

impl Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut handle = self.0.lock().expect("log buffer lock");
        handle.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a debug-level subscriber installed for this thread and return its log output.
pub fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, logs.contents())
}
