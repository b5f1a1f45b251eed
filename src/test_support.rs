//! Test fixtures: temporary on-disk databases and a small catalog seeder.

use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::db::schema::ensure_schema;
use crate::db::{Database, PoolSettings};

/// A fresh database file without any tables. Keep the [TempDir] alive for
/// as long as the database is used.
pub async fn empty_database() -> (Database, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let url = format!("sqlite://{}", dir.path().join("catalog.db").display());
    let db = Database::connect(&url, &PoolSettings::default())
        .await
        .expect("open test database");
    (db, dir)
}

/// A fresh database with the catalog schema and no rows.
pub async fn catalog_database() -> (Database, TempDir) {
    let (db, dir) = empty_database().await;
    let result = ensure_schema(db.pool()).await;
    assert!(result.errors.is_empty(), "schema errors: {:?}", result.errors);
    (db, dir)
}

/// 120 spells with ids 1..=120:
///
/// - schools: even ids are "Fire", odd ids are "Water", multiples of 3 are also "Air"
/// - types cycle "Area", "Regular", "Missile" by `id % 3`
/// - `cost_numeric` is `(id * 7) % 25`, missing for multiples of 40
/// - `magery_level` is `id % 4`
/// - every spell has a `pt-BR` translation; multiples of 10 lack `en-US`
/// - each multiple of 5 requires the previous spell; 3 and 4 require each other;
///   11 requires 10, which has no `en-US` translation
pub async fn standard_catalog() -> (Database, TempDir) {
    let (db, dir) = catalog_database().await;
    let seed = Seeder::new(db.pool());

    let fire = seed.school("Fire").await;
    let water = seed.school("Water").await;
    let air = seed.school("Air").await;
    let types = [
        seed.spell_type("Area").await,
        seed.spell_type("Regular").await,
        seed.spell_type("Missile").await,
    ];

    for i in 1..=120i64 {
        let cost = if i % 40 == 0 { None } else { Some((i * 7) % 25) };
        let id = seed
            .spell(&format!("spell-{:03}", i), types[(i % 3) as usize], cost, i % 4)
            .await;
        assert_eq!(id, i);

        seed.link_school(id, if i % 2 == 0 { fire } else { water }).await;
        if i % 3 == 0 {
            seed.link_school(id, air).await;
        }

        seed.translate(id, "pt-BR", &format!("Magia {:03}", 121 - i)).await;
        if i % 10 != 0 {
            let word = ["Bolt", "aura", "Cloud", "ward", "Echo"][(i % 5) as usize];
            seed.translate(id, "en-US", &format!("{} {}", word, i)).await;
        }

        if i % 5 == 0 {
            seed.link_prerequisite(id, id - 1).await;
        }
    }
    seed.link_prerequisite(3, 4).await;
    seed.link_prerequisite(4, 3).await;
    seed.link_prerequisite(11, 10).await;

    (db, dir)
}

/// Inserts catalog rows. Panics on failure; for tests only.
pub struct Seeder<'a> {
    pool: &'a SqlitePool,
}

impl<'a> Seeder<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn school(&self, name: &str) -> i64 {
        sqlx::query_scalar("INSERT INTO schools (name) VALUES (?) RETURNING id")
            .bind(name)
            .fetch_one(self.pool)
            .await
            .expect("insert school")
    }

    pub async fn sub_school(&self, name: &str, parent_id: i64) -> i64 {
        sqlx::query_scalar("INSERT INTO schools (name, parent_id) VALUES (?, ?) RETURNING id")
            .bind(name)
            .bind(parent_id)
            .fetch_one(self.pool)
            .await
            .expect("insert sub-school")
    }

    pub async fn spell_type(&self, name: &str) -> i64 {
        sqlx::query_scalar("INSERT INTO spell_types (name) VALUES (?) RETURNING id")
            .bind(name)
            .fetch_one(self.pool)
            .await
            .expect("insert spell type")
    }

    pub async fn spell(
        &self,
        name_unique: &str,
        type_id: i64,
        cost_numeric: Option<i64>,
        magery_level: i64,
    ) -> i64 {
        sqlx::query_scalar(
            r#"
            INSERT INTO spells (name_unique, type_id, cost_numeric, resistance, magery_level,
                                casting_time, duration, reference)
            VALUES (?, ?, ?, 'HT', ?, '1 sec', 'Instant', 'M1')
            RETURNING id
            "#,
        )
        .bind(name_unique)
        .bind(type_id)
        .bind(cost_numeric)
        .bind(magery_level)
        .fetch_one(self.pool)
        .await
        .expect("insert spell")
    }

    pub async fn translate(&self, spell_id: i64, language_code: &str, name: &str) {
        sqlx::query(
            r#"
            INSERT INTO spell_translations (spell_id, language_code, name, description,
                                            cost_text, maintenance_cost_text)
            VALUES (?, ?, ?, ?, '1', 'Same')
            "#,
        )
        .bind(spell_id)
        .bind(language_code)
        .bind(name)
        .bind(format!("{} ({})", name, language_code))
        .execute(self.pool)
        .await
        .expect("insert translation");
    }

    pub async fn link_school(&self, spell_id: i64, school_id: i64) {
        sqlx::query("INSERT INTO spell_schools (spell_id, school_id) VALUES (?, ?)")
            .bind(spell_id)
            .bind(school_id)
            .execute(self.pool)
            .await
            .expect("link school");
    }

    pub async fn link_prerequisite(&self, spell_id: i64, prerequisite_id: i64) {
        sqlx::query("INSERT INTO spell_prerequisites (spell_id, prerequisite_id) VALUES (?, ?)")
            .bind(spell_id)
            .bind(prerequisite_id)
            .execute(self.pool)
            .await
            .expect("link prerequisite");
    }
}
