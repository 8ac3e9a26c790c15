use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{BotError, Result};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub photo_reference: Option<String>,
    pub position_id: i64,
}

/// Values collected for an employee before the position is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub position_name: String,
    pub photo_reference: Option<String>,
}

/// Row shape returned by [`Employee::list`].
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmployeeListing {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub position_name: String,
}

/// Row shape returned by [`Employee::born_on`].
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq, Eq)]
pub struct BirthdayMatch {
    pub first_name: String,
    pub last_name: String,
    pub photo_reference: Option<String>,
    pub position_name: String,
}

impl Employee {
    /// Resolves `position_name` and inserts the employee in one transaction.
    ///
    /// Fails with [`BotError::UnknownPosition`] when no position carries that
    /// name; nothing is written in that case.
    pub async fn insert(pool: &sqlx::SqlitePool, new: &NewEmployee) -> Result<Self> {
        let mut tx = pool.begin().await?;

        let position_id = sqlx::query_scalar::<_, i64>("SELECT id FROM positions WHERE name = ?")
            .bind(new.position_name.trim())
            .fetch_optional(&mut tx)
            .await?;

        let Some(position_id) = position_id else {
            tx.rollback().await?;
            return Err(BotError::UnknownPosition(new.position_name.trim().to_string()));
        };

        let id = sqlx::query(
            r#"
            INSERT INTO employees (first_name, last_name, birth_date, photo_reference, position_id)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(new.birth_date)
        .bind(&new.photo_reference)
        .bind(position_id)
        .execute(&mut tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;

        Ok(Employee {
            id,
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            birth_date: new.birth_date,
            photo_reference: new.photo_reference.clone(),
            position_id,
        })
    }

    pub async fn list(pool: &sqlx::SqlitePool) -> Result<Vec<EmployeeListing>, sqlx::Error> {
        sqlx::query_as::<_, EmployeeListing>(
            r#"
            SELECT e.first_name, e.last_name, e.birth_date, p.name AS position_name
            FROM employees e
            JOIN positions p ON p.id = e.position_id
            ORDER BY e.last_name, e.first_name
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// Employees whose birth date falls on `month`/`day` in any year.
    pub async fn born_on(
        pool: &sqlx::SqlitePool,
        month: u32,
        day: u32,
    ) -> Result<Vec<BirthdayMatch>, sqlx::Error> {
        sqlx::query_as::<_, BirthdayMatch>(
            r#"
            SELECT e.first_name, e.last_name, e.photo_reference, p.name AS position_name
            FROM employees e
            JOIN positions p ON p.id = e.position_id
            WHERE CAST(strftime('%m', e.birth_date) AS INTEGER) = ?
              AND CAST(strftime('%d', e.birth_date) AS INTEGER) = ?
            ORDER BY e.last_name, e.first_name
            "#,
        )
        .bind(i64::from(month))
        .bind(i64::from(day))
        .fetch_all(pool)
        .await
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
            .fetch_one(pool)
            .await
    }
}
