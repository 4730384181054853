use std::{env, error, fmt, result};

use model::zone::ServiceZone;
use utility::id::Id;

pub mod data_model;
pub mod queries;
pub mod writer;

#[derive(Debug)]
pub enum DatabaseError {
    NotFound,
    /// A stored row can not be turned back into a model.
    Corrupt(String),
    Other(Box<dyn error::Error + Send + Sync>),
}

impl error::Error for DatabaseError {}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "row not found"),
            Self::Corrupt(why) => write!(f, "corrupt row: {why}"),
            Self::Other(why) => write!(f, "database error: {why}"),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(why: sqlx::migrate::MigrateError) -> Self {
        Self::Other(Box::new(why))
    }
}

pub type Result<T> = result::Result<T, DatabaseError>;

pub struct DatabaseConnectionInfo {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        Some(Self {
            username,
            password,
            hostname,
            port,
            database,
        })
    }

    pub(self) fn postgres_url(self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.hostname, self.port, self.database
        )
    }
}

#[derive(Clone)]
pub struct PgDatabase {
    connection: sqlx::PgPool,
}

impl PgDatabase {
    pub async fn connect(database_connection_info: DatabaseConnectionInfo) -> Result<Self> {
        let url = database_connection_info.postgres_url();
        let pool = sqlx::postgres::PgPool::connect(&url)
            .await
            .map_err(queries::convert_error)?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { connection: pool })
    }

    /// Every persisted zone, ordered by id (which is creation order).
    pub async fn load_zones(&self) -> Result<Vec<ServiceZone>> {
        queries::zone::get_all(&self.connection).await
    }

    pub async fn upsert_zone(&self, zone: &ServiceZone) -> Result<ServiceZone> {
        queries::zone::put(&self.connection, zone).await
    }

    pub async fn delete_zone(&self, id: Id<ServiceZone>) -> Result<()> {
        queries::zone::delete(&self.connection, id).await
    }
}
