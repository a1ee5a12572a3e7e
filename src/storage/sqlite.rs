use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use rusqlite::{params, types::Type, Connection, OptionalExtension};
use std::{path::Path, str::FromStr};

use super::{
    traits::{Storage, StorageRead, StorageTx, StorageWrite},
    Category, Customer, CustomerFilter, CustomerId, CustomerSave, Payment, PaymentId,
    PaymentSave, PaymentView, StorageError, StorageResult, Village,
};

const DB_SCHEMA_VERSION: i64 = 1;

#[derive(Clone)]
pub struct SqliteStorage {
    pub path: String,
}

pub struct SqliteTx {
    conn: Connection,
}

impl StorageTx for SqliteTx {
    fn commit(self) -> StorageResult<()> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }
}

impl Drop for SqliteTx {
    fn drop(&mut self) {
        if !self.conn.is_autocommit() {
            if let Err(err) = self.conn.execute_batch("ROLLBACK") {
                log::warn!("rollback of abandoned transaction failed: {}", err);
            }
        }
    }
}

fn conversion_failure<E>(col: usize, ty: Type, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(col, ty, Box::new(err))
}

fn encode_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn decode_timestamp(col: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|err| conversion_failure(col, Type::Text, err))
}

fn decode_amount(col: usize, raw: Option<String>) -> rusqlite::Result<Option<Decimal>> {
    raw.map(|s| Decimal::from_str(&s).map_err(|err| conversion_failure(col, Type::Text, err)))
        .transpose()
}

fn map_village_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Village> {
    Ok(Village {
        id: row.get(0)?,
        name: row.get(1)?,
        key: row.get(2)?,
    })
}

fn map_customer_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Customer> {
    let id: i64 = row.get(0)?;
    let category_str: String = row.get(3)?;
    let category = Category::from_str(&category_str)
        .map_err(|err| conversion_failure(3, Type::Text, err))?;
    Ok(Customer {
        id: CustomerId(id),
        name: row.get(1)?,
        village: row.get(2)?,
        category,
        phone: row.get(4)?,
    })
}

fn map_payment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Payment> {
    let paid_at: String = row.get(2)?;
    Ok(Payment {
        id: PaymentId(row.get(0)?),
        customer_id: CustomerId(row.get(1)?),
        paid_at: decode_timestamp(2, &paid_at)?,
        period: row.get(3)?,
        amount: decode_amount(4, row.get(4)?)?,
    })
}

fn map_payment_view_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PaymentView> {
    let paid_at: String = row.get(4)?;
    Ok(PaymentView {
        payment_id: PaymentId(row.get(0)?),
        customer_id: CustomerId(row.get(1)?),
        period: row.get(2)?,
        amount: decode_amount(3, row.get(3)?)?,
        paid_at: decode_timestamp(4, &paid_at)?,
        customer_name: row.get(5)?,
    })
}

fn db_load_village(conn: &Connection, key: &str) -> rusqlite::Result<Option<Village>> {
    conn.query_row(
        "SELECT id, name, key FROM villages WHERE key = ?1",
        params![key],
        map_village_row,
    )
    .optional()
}

fn db_list_villages(conn: &Connection) -> rusqlite::Result<Vec<Village>> {
    let mut stmt = conn.prepare("SELECT id, name, key FROM villages ORDER BY key")?;
    let rows = stmt
        .query_map([], map_village_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn db_insert_village_if_absent(conn: &Connection, key: &str, name: &str) -> rusqlite::Result<bool> {
    let inserted = conn.execute(
        "INSERT INTO villages (key, name) VALUES (?1, ?2) ON CONFLICT(key) DO NOTHING",
        params![key, name],
    )?;
    Ok(inserted == 1)
}

fn db_load_customer(conn: &Connection, id: CustomerId) -> rusqlite::Result<Option<Customer>> {
    conn.query_row(
        "SELECT id, name, village, category, phone FROM customers WHERE id = ?1",
        params![id.0],
        map_customer_row,
    )
    .optional()
}

fn db_list_customers(conn: &Connection, filter: &CustomerFilter) -> rusqlite::Result<Vec<Customer>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, name, village, category, phone
        FROM customers
        WHERE ?1 IS NULL OR category = ?1
        ORDER BY id
        "#,
    )?;
    let category = filter.category.map(|c| c.as_str());
    let mut rows = stmt
        .query_map(params![category], map_customer_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    // SQLite LIKE only folds ASCII, so text predicates are applied here.
    if !filter.is_empty() {
        rows.retain(|customer| filter.matches(customer));
    }
    Ok(rows)
}

fn db_insert_customer(conn: &Connection, customer: &CustomerSave<'_>) -> rusqlite::Result<Customer> {
    conn.execute(
        "INSERT INTO customers (id, name, village, category, phone) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            customer.id.map(|id| id.0),
            customer.name,
            customer.village,
            customer.category.as_str(),
            customer.phone
        ],
    )?;
    let id = customer
        .id
        .unwrap_or_else(|| CustomerId(conn.last_insert_rowid()));
    Ok(Customer {
        id,
        name: customer.name.to_string(),
        village: customer.village.to_string(),
        category: customer.category,
        phone: customer.phone.to_string(),
    })
}

fn db_delete_customer(conn: &Connection, id: CustomerId) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM customers WHERE id = ?1", params![id.0])?;
    Ok(rows > 0)
}

fn db_list_payments_by_customer(
    conn: &Connection,
    customer_id: CustomerId,
) -> rusqlite::Result<Vec<Payment>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, customer_id, paid_at, period, amount
        FROM payments
        WHERE customer_id = ?1
        ORDER BY id
        "#,
    )?;
    let rows = stmt
        .query_map(params![customer_id.0], map_payment_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn db_list_payment_views_by_customer(
    conn: &Connection,
    customer_id: CustomerId,
) -> rusqlite::Result<Vec<PaymentView>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT p.id, p.customer_id, p.period, p.amount, p.paid_at, c.name
        FROM payments p
        JOIN customers c ON c.id = p.customer_id
        WHERE p.customer_id = ?1
        ORDER BY p.id
        "#,
    )?;
    let rows = stmt
        .query_map(params![customer_id.0], map_payment_view_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn db_list_payment_views_by_period(
    conn: &Connection,
    period: &str,
) -> rusqlite::Result<Vec<PaymentView>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT p.id, p.customer_id, p.period, p.amount, p.paid_at, c.name
        FROM payments p
        JOIN customers c ON c.id = p.customer_id
        WHERE p.period = ?1
        ORDER BY p.id
        "#,
    )?;
    let rows = stmt
        .query_map(params![period], map_payment_view_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn db_insert_payment(conn: &Connection, payment: &PaymentSave<'_>) -> rusqlite::Result<Payment> {
    conn.execute(
        "INSERT INTO payments (customer_id, paid_at, period, amount) VALUES (?1, ?2, ?3, ?4)",
        params![
            payment.customer_id.0,
            encode_timestamp(&payment.paid_at),
            payment.period,
            payment.amount.map(|a| a.to_string())
        ],
    )?;
    Ok(Payment {
        id: PaymentId(conn.last_insert_rowid()),
        customer_id: payment.customer_id,
        paid_at: payment.paid_at,
        period: payment.period.to_string(),
        amount: payment.amount,
    })
}

fn db_delete_payments_by_customer(
    conn: &Connection,
    customer_id: CustomerId,
) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM payments WHERE customer_id = ?1",
        params![customer_id.0],
    )
}

impl StorageRead for SqliteTx {
    fn load_village(&self, key: &str) -> StorageResult<Option<Village>> {
        Ok(db_load_village(&self.conn, key)?)
    }

    fn list_villages(&self) -> StorageResult<Vec<Village>> {
        Ok(db_list_villages(&self.conn)?)
    }

    fn load_customer(&self, id: CustomerId) -> StorageResult<Option<Customer>> {
        Ok(db_load_customer(&self.conn, id)?)
    }

    fn list_customers(&self, filter: &CustomerFilter) -> StorageResult<Vec<Customer>> {
        Ok(db_list_customers(&self.conn, filter)?)
    }

    fn list_payments_by_customer(&self, customer_id: CustomerId) -> StorageResult<Vec<Payment>> {
        Ok(db_list_payments_by_customer(&self.conn, customer_id)?)
    }

    fn list_payment_views_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> StorageResult<Vec<PaymentView>> {
        Ok(db_list_payment_views_by_customer(&self.conn, customer_id)?)
    }

    fn list_payment_views_by_period(&self, period: &str) -> StorageResult<Vec<PaymentView>> {
        Ok(db_list_payment_views_by_period(&self.conn, period)?)
    }
}

impl StorageWrite for SqliteTx {
    fn insert_village_if_absent(&self, key: &str, name: &str) -> StorageResult<bool> {
        Ok(db_insert_village_if_absent(&self.conn, key, name)?)
    }

    fn insert_customer(&self, customer: CustomerSave<'_>) -> StorageResult<Customer> {
        Ok(db_insert_customer(&self.conn, &customer)?)
    }

    fn delete_customer(&self, id: CustomerId) -> StorageResult<bool> {
        Ok(db_delete_customer(&self.conn, id)?)
    }

    fn insert_payment(&self, payment: PaymentSave<'_>) -> StorageResult<Payment> {
        Ok(db_insert_payment(&self.conn, &payment)?)
    }

    fn delete_payments_by_customer(&self, customer_id: CustomerId) -> StorageResult<usize> {
        Ok(db_delete_payments_by_customer(&self.conn, customer_id)?)
    }
}

impl Storage for SqliteStorage {
    type Tx = SqliteTx;

    fn begin_tx(&self) -> StorageResult<Self::Tx> {
        let conn = Self::connect(&self.path)?;
        Self::migrate(&conn)?;
        conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(SqliteTx { conn })
    }
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }

    pub fn reset_all(&self) -> StorageResult<()> {
        if !Path::new(&self.path).exists() {
            return Ok(());
        }
        std::fs::remove_file(&self.path)
            .map_err(|err| StorageError::Unavailable(format!("removing {}: {}", self.path, err)))?;
        Ok(())
    }

    pub fn init(&self) -> StorageResult<()> {
        self.with_conn(|_conn| Ok(()))
    }

    fn connect(path: &str) -> rusqlite::Result<Connection> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(std::time::Duration::from_millis(500))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(conn)
    }

    fn with_conn<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = Self::connect(&self.path)?;
        Self::migrate(&conn)?;
        Ok(f(&conn)?)
    }

    fn schema_version(conn: &Connection) -> StorageResult<i64> {
        Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
    }

    fn migrate(conn: &Connection) -> StorageResult<()> {
        if Self::schema_version(conn)? == DB_SCHEMA_VERSION {
            return Ok(());
        }

        // Another process may be creating the schema; recheck under the write lock.
        conn.execute_batch("BEGIN IMMEDIATE")?;
        let version = Self::schema_version(conn)?;
        if version == DB_SCHEMA_VERSION {
            conn.execute_batch("COMMIT")?;
            return Ok(());
        }
        if version != 0 {
            conn.execute_batch("ROLLBACK")?;
            return Err(StorageError::SchemaMismatch {
                found: version,
                expected: DB_SCHEMA_VERSION,
            });
        }

        log::info!(
            "SQLite schema migration: {} -> {}",
            version,
            DB_SCHEMA_VERSION
        );

        let created = conn.execute_batch(
            r#"
            CREATE TABLE villages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                key TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL
            );
            CREATE TABLE customers (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                village TEXT NOT NULL,
                category TEXT NOT NULL CHECK (category IN ('gold', 'silver', 'bronze')),
                phone TEXT NOT NULL
            );
            CREATE TABLE payments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                customer_id INTEGER NOT NULL REFERENCES customers(id),
                paid_at TEXT NOT NULL,
                period TEXT NOT NULL,
                amount TEXT
            );
            CREATE INDEX payments_customer_idx ON payments(customer_id);
            CREATE INDEX payments_period_idx ON payments(period);
            PRAGMA user_version = 1;
            COMMIT;
            "#,
        );
        if let Err(err) = created {
            if !conn.is_autocommit() {
                let _ = conn.execute_batch("ROLLBACK");
            }
            return Err(err.into());
        }
        Ok(())
    }
}

impl StorageRead for SqliteStorage {
    fn load_village(&self, key: &str) -> StorageResult<Option<Village>> {
        self.with_conn(|conn| db_load_village(conn, key))
    }

    fn list_villages(&self) -> StorageResult<Vec<Village>> {
        self.with_conn(db_list_villages)
    }

    fn load_customer(&self, id: CustomerId) -> StorageResult<Option<Customer>> {
        self.with_conn(|conn| db_load_customer(conn, id))
    }

    fn list_customers(&self, filter: &CustomerFilter) -> StorageResult<Vec<Customer>> {
        self.with_conn(|conn| db_list_customers(conn, filter))
    }

    fn list_payments_by_customer(&self, customer_id: CustomerId) -> StorageResult<Vec<Payment>> {
        self.with_conn(|conn| db_list_payments_by_customer(conn, customer_id))
    }

    fn list_payment_views_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> StorageResult<Vec<PaymentView>> {
        self.with_conn(|conn| db_list_payment_views_by_customer(conn, customer_id))
    }

    fn list_payment_views_by_period(&self, period: &str) -> StorageResult<Vec<PaymentView>> {
        self.with_conn(|conn| db_list_payment_views_by_period(conn, period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_file(prefix: &str, ext: &str) -> std::path::PathBuf {
        let mut p = std::env::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        p.push(format!("{}_{}.{}", prefix, nanos, ext));
        p
    }

    fn fresh_storage(prefix: &str) -> SqliteStorage {
        let repo = SqliteStorage::new(unique_temp_file(prefix, "db"));
        repo.init().unwrap();
        repo
    }

    fn save_customer<'a>(id: Option<i64>, name: &'a str, village: &'a str) -> CustomerSave<'a> {
        CustomerSave {
            id: id.map(CustomerId),
            name,
            village,
            category: Category::Gold,
            phone: "",
        }
    }

    #[test]
    fn sqlite_reset_all_ok_when_missing() {
        let path = unique_temp_file("ledger_reset", "db");
        let repo = SqliteStorage::new(&path);
        repo.reset_all().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn sqlite_reset_all_removes_existing_file() {
        let path = unique_temp_file("ledger_reset", "db");
        std::fs::write(&path, b"dummy").unwrap();
        let repo = SqliteStorage::new(&path);
        repo.reset_all().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn sqlite_init_initializes_schema() {
        let path = unique_temp_file("ledger_init", "db");
        let repo = SqliteStorage::new(&path);
        repo.init().unwrap();

        let conn = Connection::open(&path).unwrap();
        for table in ["villages", "customers", "payments"] {
            let found = conn
                .query_row(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    params![table],
                    |row| row.get::<_, String>(0),
                )
                .optional()
                .unwrap();
            assert_eq!(found.as_deref(), Some(table));
        }

        let version: i64 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, DB_SCHEMA_VERSION);
    }

    #[test]
    fn sqlite_fails_on_mismatched_schema_version() {
        let path = unique_temp_file("ledger_bad_version", "db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 999;").unwrap();

        let err = SqliteStorage::new(&path)
            .init()
            .expect_err("init should fail on version mismatch");
        assert!(matches!(
            err,
            StorageError::SchemaMismatch { found: 999, .. }
        ));
        assert!(err.to_string().contains("--reset"));
    }

    #[test]
    fn sqlite_village_insert_if_absent_is_idempotent() {
        let repo = fresh_storage("ledger_village");
        let tx = repo.begin_tx().unwrap();
        assert!(tx.insert_village_if_absent("rampur", "Rampur").unwrap());
        assert!(!tx.insert_village_if_absent("rampur", "RAMPUR").unwrap());
        tx.commit().unwrap();

        let villages = repo.list_villages().unwrap();
        assert_eq!(villages.len(), 1);
        assert_eq!(villages[0].name, "Rampur");
        assert_eq!(repo.load_village("rampur").unwrap(), Some(villages[0].clone()));
    }

    #[test]
    fn sqlite_customer_primary_key_violation_is_conflict() {
        let repo = fresh_storage("ledger_pk");
        let tx = repo.begin_tx().unwrap();
        tx.insert_customer(save_customer(Some(101), "Asha", "Rampur"))
            .unwrap();
        let err = tx
            .insert_customer(save_customer(Some(101), "Other", "Rampur"))
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[test]
    fn sqlite_assigns_next_customer_id_when_missing() {
        let repo = fresh_storage("ledger_autoid");
        let tx = repo.begin_tx().unwrap();
        tx.insert_customer(save_customer(Some(7), "Asha", "Rampur"))
            .unwrap();
        let assigned = tx
            .insert_customer(save_customer(None, "Ravi", "Rampur"))
            .unwrap();
        tx.commit().unwrap();

        assert_eq!(assigned.id, CustomerId(8));
        assert_eq!(repo.load_customer(CustomerId(8)).unwrap(), Some(assigned));
    }

    #[test]
    fn sqlite_dropped_transaction_rolls_back() {
        let repo = fresh_storage("ledger_rollback");
        {
            let tx = repo.begin_tx().unwrap();
            tx.insert_customer(save_customer(Some(1), "Asha", "Rampur"))
                .unwrap();
        }
        assert_eq!(repo.load_customer(CustomerId(1)).unwrap(), None);
    }

    #[test]
    fn sqlite_payments_keep_exact_amounts_and_join_names() {
        let repo = fresh_storage("ledger_payments");
        let paid_at = Utc::now();
        let tx = repo.begin_tx().unwrap();
        tx.insert_customer(save_customer(Some(1), "Asha", "Rampur"))
            .unwrap();
        let stored = tx
            .insert_payment(PaymentSave {
                customer_id: CustomerId(1),
                paid_at,
                period: "Jan",
                amount: Some(Decimal::new(10001, 2)),
            })
            .unwrap();
        tx.insert_payment(PaymentSave {
            customer_id: CustomerId(1),
            paid_at,
            period: "Feb",
            amount: None,
        })
        .unwrap();
        tx.commit().unwrap();

        let payments = repo.list_payments_by_customer(CustomerId(1)).unwrap();
        assert_eq!(payments.len(), 2);
        assert_eq!(payments[0], stored);
        assert_eq!(payments[0].amount.unwrap().to_string(), "100.01");
        assert_eq!(payments[1].amount, None);

        let views = repo.list_payment_views_by_period("Jan").unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].customer_name, "Asha");
        assert_eq!(views[0].payment_id, stored.id);
        assert!(repo.list_payment_views_by_period("jan").unwrap().is_empty());
    }

    #[test]
    fn sqlite_refuses_to_delete_customer_with_payments() {
        let repo = fresh_storage("ledger_fk");
        let tx = repo.begin_tx().unwrap();
        tx.insert_customer(save_customer(Some(1), "Asha", "Rampur"))
            .unwrap();
        tx.insert_payment(PaymentSave {
            customer_id: CustomerId(1),
            paid_at: Utc::now(),
            period: "Jan",
            amount: Some(Decimal::ONE),
        })
        .unwrap();
        assert!(tx.delete_customer(CustomerId(1)).is_err());

        assert_eq!(tx.delete_payments_by_customer(CustomerId(1)).unwrap(), 1);
        assert!(tx.delete_customer(CustomerId(1)).unwrap());
        tx.commit().unwrap();
    }
}
