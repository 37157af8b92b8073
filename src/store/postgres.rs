//! PostgreSQL store: statements from `crate::sql`, executed on a `PgPool`.

use crate::error::{AppError, ConfigError};
use crate::model::{Course, NewStudent, Student, StudentPatch};
use crate::query::{ListSpec, Populate};
use crate::sql::{self, QueryBuf};
use crate::store::StudentStore;
use async_trait::async_trait;
use sqlx::postgres::PgConnectOptions;
use sqlx::types::Json;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

#[derive(Clone)]
pub struct PgStudentStore {
    pool: PgPool,
}

/// Student row followed by the `courses` json column of the include subquery.
#[derive(sqlx::FromRow)]
struct StudentWithCourses {
    #[sqlx(flatten)]
    student: Student,
    courses: Json<Vec<Course>>,
}

impl StudentWithCourses {
    fn into_student(self) -> Student {
        let mut student = self.student;
        student.courses = Some(self.courses.0);
        student
    }
}

impl PgStudentStore {
    pub fn new(pool: PgPool) -> Self {
        PgStudentStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_students(&self, q: &QueryBuf, populate: Populate) -> Result<Vec<Student>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        if populate.courses() {
            let mut query = sqlx::query_as::<_, StudentWithCourses>(&q.sql);
            for p in &q.params {
                query = query.bind(p.clone());
            }
            let rows = query.fetch_all(&self.pool).await?;
            Ok(rows.into_iter().map(StudentWithCourses::into_student).collect())
        } else {
            let mut query = sqlx::query_as::<_, Student>(&q.sql);
            for p in &q.params {
                query = query.bind(p.clone());
            }
            Ok(query.fetch_all(&self.pool).await?)
        }
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<Student>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<_, Student>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_optional(&self.pool).await?)
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn create(&self, body: NewStudent) -> Result<Student, AppError> {
        let q = sql::insert(&body);
        self.fetch_optional(&q)
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    async fn find_all(&self, spec: &ListSpec) -> Result<Vec<Student>, AppError> {
        let q = sql::select_list(spec);
        self.fetch_students(&q, spec.populate).await
    }

    async fn count(&self) -> Result<u64, AppError> {
        let q = sql::count();
        tracing::debug!(sql = %q.sql, "query");
        let (n,): (i64,) = sqlx::query_as(&q.sql).fetch_one(&self.pool).await?;
        Ok(u64::try_from(n).unwrap_or(0))
    }

    async fn find_by_pk(&self, id: i64, populate: Populate) -> Result<Option<Student>, AppError> {
        let q = sql::select_by_id(id, populate);
        Ok(self.fetch_students(&q, populate).await?.into_iter().next())
    }

    async fn update(&self, id: i64, patch: StudentPatch) -> Result<Option<Student>, AppError> {
        let q = sql::update(id, &patch);
        self.fetch_optional(&q).await
    }

    async fn destroy(&self, id: i64) -> Result<bool, AppError> {
        let q = sql::delete(id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Create `students` and `courses` when missing. Courses cascade with their student.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    let students = format!(
        r#"
        CREATE TABLE IF NOT EXISTS "{}" (
            id BIGSERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT,
            age INT4,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
        sql::STUDENTS_TABLE
    );
    sqlx::query(&students).execute(pool).await?;

    let courses = format!(
        r#"
        CREATE TABLE IF NOT EXISTS "{}" (
            id BIGSERIAL PRIMARY KEY,
            student_id BIGINT NOT NULL REFERENCES "{}" (id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            code TEXT
        )
        "#,
        sql::COURSES_TABLE,
        sql::STUDENTS_TABLE
    );
    sqlx::query(&courses).execute(pool).await?;

    let index = format!(
        r#"CREATE INDEX IF NOT EXISTS "{0}_student_id_idx" ON "{0}" (student_id)"#,
        sql::COURSES_TABLE
    );
    sqlx::query(&index).execute(pool).await?;
    tracing::info!("schema ready");
    Ok(())
}

/// Create the target database through the `postgres` maintenance database if it does not exist.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin, target) = admin_options(database_url)?;
    let Some(db_name) = target else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Options for the maintenance connection plus the database to create, if any.
/// No path (server picks the default) or `postgres` itself means nothing to create.
fn admin_options(database_url: &str) -> Result<(PgConnectOptions, Option<String>), ConfigError> {
    let opts = PgConnectOptions::from_str(database_url).map_err(|e| ConfigError::Invalid {
        key: "DATABASE_URL",
        value: e.to_string(),
    })?;
    let target = opts
        .get_database()
        .map(str::trim)
        .filter(|db| !db.is_empty() && *db != "postgres")
        .map(str::to_string);
    Ok((opts.database("postgres"), target))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
